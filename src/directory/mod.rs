//! Directory core: ordering, grouping and rubric closure over flat rows.
//!
//! Storage queries return one row per (company, rubric) pair. Before those
//! rows leave the service they are put in (name, address) order with
//! [`sort_rows`] and merged per company with [`aggregate_rows`]. Rubric
//! lookups first widen the rubric to its whole subtree with
//! [`resolve_rubric_closure`].

pub mod aggregate;
pub mod closure;
pub mod sort;

pub use aggregate::aggregate_rows;
pub use closure::{resolve_rubric_closure, ClosureLimits};
pub use sort::{compare_rows, sort_rows};

use crate::models::{AggregatedCompany, FlatCompanyRow};

/// Sort then aggregate: the shape every read operation returns.
pub fn group_companies(mut rows: Vec<FlatCompanyRow>) -> Vec<AggregatedCompany> {
    sort_rows(&mut rows);
    aggregate_rows(rows)
}
