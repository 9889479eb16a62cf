//! Storage port for the directory.
//!
//! The façade and the closure resolver operate exclusively through
//! [`DirectoryStore`], enabling pluggable backends (`MemoryDirectoryStore` for
//! tests and local runs, `PgDirectoryStore` for production).

mod memory;

pub use memory::MemoryDirectoryStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Building, FlatCompanyRow, InsertedBuilding};

#[async_trait]
pub trait DirectoryStore: Send + Sync {
    // ── Writes ──

    /// Persist a building, its companies and their rubric associations as one
    /// unit. Either everything is stored or nothing is.
    ///
    /// Rubric ids are linked as given; they are not checked against the
    /// rubric table.
    async fn insert_building(&self, building: &Building) -> Result<InsertedBuilding>;

    // ── Natural-key lookups ──

    /// `NotFound` when no building has this address, `Ambiguous` when several do.
    async fn lookup_building_id_by_address(&self, address: &str) -> Result<i64>;

    /// `NotFound` when no company has this name, `Ambiguous` when several do.
    async fn lookup_company_id_by_name(&self, name: &str) -> Result<i64>;

    // ── Flat row queries ──

    async fn select_rows_by_company(&self, company_id: i64) -> Result<Vec<FlatCompanyRow>>;
    async fn select_rows_by_building(&self, building_id: i64) -> Result<Vec<FlatCompanyRow>>;

    /// Rows directly tagged with `rubric_id` (no descendants).
    async fn select_rows_by_rubric(&self, rubric_id: i64) -> Result<Vec<FlatCompanyRow>>;

    // ── Rubric hierarchy ──

    /// Rubrics whose parent is `rubric_id`.
    async fn select_child_rubric_ids(&self, rubric_id: i64) -> Result<Vec<i64>>;

    // ── Health ──

    async fn ping(&self) -> Result<()>;
}
