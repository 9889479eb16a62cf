//! DirectoryService: the façade every transport calls.
//!
//! Takes the store via `Arc<dyn DirectoryStore>` so that the same logic works
//! against Postgres or the in-memory store. Every read returns companies in
//! (name, address) order with their rubric ids merged.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::directory::{group_companies, resolve_rubric_closure, ClosureLimits};
use crate::error::{DirectoryError, Result};
use crate::models::{AggregatedCompany, Building, InsertedBuilding};
use crate::store::DirectoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceOptions {
    pub closure: ClosureLimits,
    /// Run every operation under one process-wide lock. Off by default; the
    /// store's transactions already keep inserts consistent.
    pub serialize_access: bool,
}

pub struct DirectoryService {
    store: Arc<dyn DirectoryStore>,
    options: ServiceOptions,
    access: Option<Mutex<()>>,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn DirectoryStore>, options: ServiceOptions) -> Self {
        Self {
            store,
            access: options.serialize_access.then(|| Mutex::new(())),
            options,
        }
    }

    pub fn options(&self) -> ServiceOptions {
        self.options
    }

    /// Held for the whole operation body when serialized access is enabled.
    async fn enter(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.access {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    /// Store a building with its companies and rubric links.
    pub async fn insert_building(&self, building: &Building) -> Result<InsertedBuilding> {
        validate_building(building)?;
        let _guard = self.enter().await;

        debug!(
            address = %building.address,
            companies = building.companies.len(),
            "inserting building"
        );
        let inserted = self.store.insert_building(building).await?;
        info!(
            building_id = inserted.building_id,
            companies = inserted.company_ids.len(),
            "building inserted"
        );
        Ok(inserted)
    }

    /// The company with this id and all of its rubrics.
    ///
    /// A company with no rows (unknown id, or no rubric links) is `NotFound`.
    pub async fn get_company(&self, company_id: i64) -> Result<AggregatedCompany> {
        let _guard = self.enter().await;

        debug!(company_id, "fetching company");
        let rows = self.store.select_rows_by_company(company_id).await?;
        group_companies(rows)
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::NotFound(format!("company {company_id}")))
    }

    /// Every company housed in a building. Empty when the building has none.
    pub async fn get_companies_from_building(
        &self,
        building_id: i64,
    ) -> Result<Vec<AggregatedCompany>> {
        let _guard = self.enter().await;

        debug!(building_id, "fetching companies in building");
        let rows = self.store.select_rows_by_building(building_id).await?;
        let companies = group_companies(rows);
        debug!(building_id, count = companies.len(), "companies in building");
        Ok(companies)
    }

    /// Every company tagged with this rubric or any rubric below it.
    pub async fn get_companies_from_rubric(
        &self,
        rubric_id: i64,
    ) -> Result<Vec<AggregatedCompany>> {
        let _guard = self.enter().await;

        debug!(rubric_id, "fetching companies under rubric");
        let rows =
            resolve_rubric_closure(self.store.as_ref(), rubric_id, self.options.closure).await?;
        let companies = group_companies(rows);
        debug!(rubric_id, count = companies.len(), "companies under rubric");
        Ok(companies)
    }

    /// Store connectivity probe.
    pub async fn health(&self) -> Result<()> {
        self.store.ping().await
    }
}

fn validate_building(building: &Building) -> Result<()> {
    if building.address.trim().is_empty() {
        return Err(DirectoryError::InvalidInput(
            "building address must not be empty".into(),
        ));
    }
    if let Some(pos) = building
        .companies
        .iter()
        .position(|c| c.name.trim().is_empty())
    {
        return Err(DirectoryError::InvalidInput(format!(
            "company #{} has an empty name",
            pos + 1
        )));
    }
    Ok(())
}
