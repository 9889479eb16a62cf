//! In-process directory store.
//!
//! Mirrors the Postgres schema with plain maps behind one `RwLock`. Writes take
//! the lock for the whole insert, so a building is either fully visible or not
//! at all. Building coordinates are not kept since no read path returns them.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::DirectoryStore;
use crate::error::{DirectoryError, Result};
use crate::models::{Building, FlatCompanyRow, InsertedBuilding};

#[derive(Debug, Clone)]
struct BuildingRecord {
    address: String,
}

#[derive(Debug, Clone)]
struct CompanyRecord {
    name: String,
    phones: String,
    building_id: i64,
}

#[derive(Debug, Default)]
struct MemoryState {
    buildings: BTreeMap<i64, BuildingRecord>,
    companies: BTreeMap<i64, CompanyRecord>,
    /// rubric id -> parent id
    rubrics: BTreeMap<i64, Option<i64>>,
    /// (company id, rubric id), in insertion order
    associations: Vec<(i64, i64)>,
    last_building_id: i64,
    last_company_id: i64,
}

impl MemoryState {
    /// Flat rows for every association whose company matches `filter`,
    /// ordered like the Postgres queries: company id, then rubric id.
    fn rows_where(&self, filter: impl Fn(i64, &CompanyRecord, i64) -> bool) -> Vec<FlatCompanyRow> {
        let mut matched: Vec<(i64, i64, FlatCompanyRow)> = self
            .associations
            .iter()
            .filter_map(|&(company_id, rubric_id)| {
                let company = self.companies.get(&company_id)?;
                let building = self.buildings.get(&company.building_id)?;
                filter(company_id, company, rubric_id).then(|| {
                    (
                        company_id,
                        rubric_id,
                        FlatCompanyRow::new(
                            company.name.clone(),
                            company.phones.clone(),
                            building.address.clone(),
                            rubric_id,
                        ),
                    )
                })
            })
            .collect();
        matched.sort_by_key(|(company_id, rubric_id, _)| (*company_id, *rubric_id));
        matched.into_iter().map(|(_, _, row)| row).collect()
    }
}

/// Directory store kept entirely in memory.
///
/// Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct MemoryDirectoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryDirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rubric with an optional parent. Re-registering replaces the
    /// parent, which also allows building cyclic hierarchies for tests.
    pub async fn add_rubric(&self, rubric_id: i64, parent_id: Option<i64>) {
        let mut state = self.state.write().await;
        state.rubrics.insert(rubric_id, parent_id);
    }
}

fn unique_id(ids: Vec<i64>, what: &str) -> Result<i64> {
    match ids.as_slice() {
        [] => Err(DirectoryError::NotFound(what.to_string())),
        [id] => Ok(*id),
        _ => Err(DirectoryError::Ambiguous(format!(
            "{what} matches {} rows",
            ids.len()
        ))),
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectoryStore {
    async fn insert_building(&self, building: &Building) -> Result<InsertedBuilding> {
        let mut state = self.state.write().await;

        state.last_building_id += 1;
        let building_id = state.last_building_id;
        state.buildings.insert(
            building_id,
            BuildingRecord {
                address: building.address.clone(),
            },
        );

        let mut company_ids = Vec::with_capacity(building.companies.len());
        for company in &building.companies {
            state.last_company_id += 1;
            let company_id = state.last_company_id;
            state.companies.insert(
                company_id,
                CompanyRecord {
                    name: company.name.clone(),
                    phones: company.phones.clone(),
                    building_id,
                },
            );
            state
                .associations
                .extend(company.rubrics.iter().map(|rubric_id| (company_id, *rubric_id)));
            company_ids.push(company_id);
        }

        Ok(InsertedBuilding {
            building_id,
            company_ids,
        })
    }

    async fn lookup_building_id_by_address(&self, address: &str) -> Result<i64> {
        let state = self.state.read().await;
        let ids = state
            .buildings
            .iter()
            .filter(|(_, b)| b.address == address)
            .map(|(id, _)| *id)
            .collect();
        unique_id(ids, &format!("building at address '{address}'"))
    }

    async fn lookup_company_id_by_name(&self, name: &str) -> Result<i64> {
        let state = self.state.read().await;
        let ids = state
            .companies
            .iter()
            .filter(|(_, c)| c.name == name)
            .map(|(id, _)| *id)
            .collect();
        unique_id(ids, &format!("company named '{name}'"))
    }

    async fn select_rows_by_company(&self, company_id: i64) -> Result<Vec<FlatCompanyRow>> {
        let state = self.state.read().await;
        Ok(state.rows_where(|id, _, _| id == company_id))
    }

    async fn select_rows_by_building(&self, building_id: i64) -> Result<Vec<FlatCompanyRow>> {
        let state = self.state.read().await;
        Ok(state.rows_where(|_, company, _| company.building_id == building_id))
    }

    async fn select_rows_by_rubric(&self, rubric_id: i64) -> Result<Vec<FlatCompanyRow>> {
        let state = self.state.read().await;
        Ok(state.rows_where(|_, _, rubric| rubric == rubric_id))
    }

    async fn select_child_rubric_ids(&self, rubric_id: i64) -> Result<Vec<i64>> {
        let state = self.state.read().await;
        Ok(state
            .rubrics
            .iter()
            .filter(|(_, parent)| **parent == Some(rubric_id))
            .map(|(id, _)| *id)
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
