//! Postgres implementation of the directory store.
//!
//! All SQL is runtime-checked (sqlx::query, not sqlx::query!) to avoid a
//! compile-time database requirement. Generated ids come back from
//! `INSERT ... RETURNING`, so no insert needs a follow-up lookup.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};

use crate::error::{DirectoryError, Result};
use crate::models::{Building, FlatCompanyRow, InsertedBuilding};
use crate::store::DirectoryStore;

/// Shared projection for every flat-row query: one row per company/rubric pair.
const FLAT_ROW_SELECT: &str = r#"
    SELECT hc.name, hc.phones,
           hb.address AS address,
           hroc.rubric_id AS rubric
    FROM handbook.company AS hc
    INNER JOIN handbook.rubricsofcompany AS hroc ON hroc.company_id = hc.company_id
    INNER JOIN handbook.building AS hb ON hb.building_id = hc.building_id
"#;

const FLAT_ROW_ORDER: &str = "ORDER BY hc.company_id, hroc.rubric_id";

#[derive(Clone)]
pub struct PgDirectoryStore {
    pool: PgPool,
}

impl PgDirectoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn select_rows(&self, filter: &str, id: i64) -> Result<Vec<FlatCompanyRow>> {
        let query = format!("{FLAT_ROW_SELECT} WHERE {filter} = $1 {FLAT_ROW_ORDER}");
        let rows = sqlx::query_as::<_, FlatCompanyRow>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to select rows where {filter} = {id}"))?;
        Ok(rows)
    }

    // ============================================
    // Insert steps (run inside one transaction)
    // ============================================

    async fn insert_building_row(
        tx: &mut Transaction<'_, Postgres>,
        address: &str,
        coordinates: &str,
    ) -> Result<i64> {
        let (building_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO handbook.building (address, coordinates)
            VALUES ($1, $2)
            RETURNING building_id
            "#,
        )
        .bind(address)
        .bind(coordinates)
        .fetch_one(&mut **tx)
        .await
        .context("Failed to insert building")?;

        Ok(building_id)
    }

    async fn insert_company_row(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        phones: &str,
        building_id: i64,
    ) -> Result<i64> {
        let (company_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO handbook.company (name, phones, building_id)
            VALUES ($1, $2, $3)
            RETURNING company_id
            "#,
        )
        .bind(name)
        .bind(phones)
        .bind(building_id)
        .fetch_one(&mut **tx)
        .await
        .with_context(|| format!("Failed to insert company '{name}'"))?;

        Ok(company_id)
    }

    async fn insert_rubric_association(
        tx: &mut Transaction<'_, Postgres>,
        company_id: i64,
        rubric_id: i64,
    ) -> Result<()> {
        // Rubric existence is not checked; orphan associations are accepted.
        sqlx::query(
            r#"
            INSERT INTO handbook.rubricsofcompany (company_id, rubric_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(company_id)
        .bind(rubric_id)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to link company {company_id} to rubric {rubric_id}"))?;

        Ok(())
    }

    async fn lookup_unique_id(&self, query: &str, key: &str, what: &str) -> Result<i64> {
        let ids: Vec<(i64,)> = sqlx::query_as(query)
            .bind(key)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to look up {what}"))?;

        match ids.as_slice() {
            [] => Err(DirectoryError::NotFound(what.to_string())),
            [(id,)] => Ok(*id),
            _ => Err(DirectoryError::Ambiguous(format!(
                "{what} matches {} rows",
                ids.len()
            ))),
        }
    }
}

#[async_trait]
impl DirectoryStore for PgDirectoryStore {
    async fn insert_building(&self, building: &Building) -> Result<InsertedBuilding> {
        // Dropping `tx` on an early return rolls everything back.
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let building_id =
            Self::insert_building_row(&mut tx, &building.address, &building.coordinates).await?;
        debug!(building_id, "inserted building row");

        let mut company_ids = Vec::with_capacity(building.companies.len());
        for company in &building.companies {
            let company_id =
                Self::insert_company_row(&mut tx, &company.name, &company.phones, building_id)
                    .await?;
            for rubric_id in &company.rubrics {
                Self::insert_rubric_association(&mut tx, company_id, *rubric_id).await?;
            }
            company_ids.push(company_id);
        }

        tx.commit().await.context("Failed to commit building insert")?;

        info!(
            "Building {} stored with {} companies",
            building_id,
            company_ids.len()
        );

        Ok(InsertedBuilding {
            building_id,
            company_ids,
        })
    }

    async fn lookup_building_id_by_address(&self, address: &str) -> Result<i64> {
        self.lookup_unique_id(
            r#"SELECT building_id FROM handbook.building WHERE address = $1"#,
            address,
            &format!("building at address '{address}'"),
        )
        .await
    }

    async fn lookup_company_id_by_name(&self, name: &str) -> Result<i64> {
        self.lookup_unique_id(
            r#"SELECT company_id FROM handbook.company WHERE name = $1"#,
            name,
            &format!("company named '{name}'"),
        )
        .await
    }

    async fn select_rows_by_company(&self, company_id: i64) -> Result<Vec<FlatCompanyRow>> {
        self.select_rows("hc.company_id", company_id).await
    }

    async fn select_rows_by_building(&self, building_id: i64) -> Result<Vec<FlatCompanyRow>> {
        self.select_rows("hc.building_id", building_id).await
    }

    async fn select_rows_by_rubric(&self, rubric_id: i64) -> Result<Vec<FlatCompanyRow>> {
        self.select_rows("hroc.rubric_id", rubric_id).await
    }

    async fn select_child_rubric_ids(&self, rubric_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<(i64,)> = sqlx::query_as(
            r#"SELECT rubric_id FROM handbook.rubric WHERE parent_id = $1 ORDER BY rubric_id"#,
        )
        .bind(rubric_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to select children of rubric {rubric_id}"))?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }
}
