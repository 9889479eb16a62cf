//! Deterministic (name, address) ordering of flat rows.

use std::cmp::Ordering;

use crate::models::FlatCompanyRow;

/// Name first, address as the tie-break. Byte order on both.
pub fn compare_rows(a: &FlatCompanyRow, b: &FlatCompanyRow) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.address.cmp(&b.address))
}

/// Stable sort: rows of one company keep the order the store returned them in.
pub fn sort_rows(rows: &mut [FlatCompanyRow]) {
    rows.sort_by(compare_rows);
}
