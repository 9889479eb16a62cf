//! Merge of sorted flat rows into one record per company.
//!
//! A company is identified by (name, address). Two companies that share a name
//! but sit at different addresses are distinct and never merged.

use crate::models::{AggregatedCompany, FlatCompanyRow};

/// Collapse consecutive rows with the same (name, address) into one
/// [`AggregatedCompany`].
///
/// Input must already be ordered by [`super::sort_rows`]; this is not
/// re-checked. Rubric ids are kept in scan order and are not de-duplicated.
pub fn aggregate_rows(rows: Vec<FlatCompanyRow>) -> Vec<AggregatedCompany> {
    let mut companies: Vec<AggregatedCompany> = Vec::new();

    for row in rows {
        match companies.last_mut() {
            Some(active) if active.name == row.name && active.address == row.address => {
                active.rubrics.push(row.rubric_id);
            }
            _ => companies.push(AggregatedCompany {
                name: row.name,
                phones: row.phones,
                address: row.address,
                rubrics: vec![row.rubric_id],
            }),
        }
    }

    companies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate_rows(Vec::new()).is_empty());
    }

    #[test]
    fn merges_rubrics_per_company() {
        let rows = vec![
            FlatCompanyRow::new("A", "p1", "addr1", 5),
            FlatCompanyRow::new("A", "p1", "addr1", 7),
            FlatCompanyRow::new("B", "p2", "addr2", 5),
        ];

        let companies = aggregate_rows(rows);

        assert_eq!(
            companies,
            vec![
                AggregatedCompany {
                    name: "A".into(),
                    phones: "p1".into(),
                    address: "addr1".into(),
                    rubrics: vec![5, 7],
                },
                AggregatedCompany {
                    name: "B".into(),
                    phones: "p2".into(),
                    address: "addr2".into(),
                    rubrics: vec![5],
                },
            ]
        );
    }

    #[test]
    fn same_name_different_address_stays_separate() {
        let rows = vec![
            FlatCompanyRow::new("Cafe", "111", "Arbat 1", 1),
            FlatCompanyRow::new("Cafe", "222", "Mira 5", 1),
        ];

        let companies = aggregate_rows(rows);

        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].address, "Arbat 1");
        assert_eq!(companies[1].address, "Mira 5");
        assert_eq!(companies[1].phones, "222");
    }

    #[test]
    fn duplicate_rubric_ids_are_preserved() {
        let rows = vec![
            FlatCompanyRow::new("Cafe", "1", "Arbat 1", 3),
            FlatCompanyRow::new("Cafe", "1", "Arbat 1", 3),
            FlatCompanyRow::new("Cafe", "1", "Arbat 1", 8),
        ];

        let companies = aggregate_rows(rows);

        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].rubrics, vec![3, 3, 8]);
    }

    #[test]
    fn phones_come_from_first_row_of_group() {
        let rows = vec![
            FlatCompanyRow::new("Cafe", "first", "Arbat 1", 1),
            FlatCompanyRow::new("Cafe", "second", "Arbat 1", 2),
        ];

        let companies = aggregate_rows(rows);
        assert_eq!(companies[0].phones, "first");
    }
}
