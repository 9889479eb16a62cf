//! Route handlers. Each one parses its input, calls the façade and wraps the
//! result in an [`ApiEnvelope`].

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Extension, Json,
};

use super::{envelope::ApiEnvelope, error::AppError};
use crate::error::DirectoryError;
use crate::models::{AggregatedCompany, Building, InsertedBuilding};
use crate::services::DirectoryService;

type Service = Extension<Arc<DirectoryService>>;

fn parse_id(kind: &str, raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|e| {
        AppError(DirectoryError::InvalidInput(format!(
            "{kind} id '{raw}': {e}"
        )))
    })
}

/// POST /building
pub async fn add_building(
    Extension(service): Service,
    payload: Result<Json<Building>, JsonRejection>,
) -> Result<ApiEnvelope<InsertedBuilding>, AppError> {
    let Json(building) = payload?;
    let inserted = service.insert_building(&building).await?;
    Ok(ApiEnvelope::created(
        format!(
            "building {} created with {} companies",
            inserted.building_id,
            inserted.company_ids.len()
        ),
        inserted,
    ))
}

/// GET /building/:id
pub async fn get_companies_from_building(
    Extension(service): Service,
    Path(raw): Path<String>,
) -> Result<ApiEnvelope<Vec<AggregatedCompany>>, AppError> {
    let building_id = parse_id("building", &raw)?;
    let companies = service.get_companies_from_building(building_id).await?;
    Ok(ApiEnvelope::ok("OK", companies))
}

/// GET /rubric/:id
pub async fn get_companies_from_rubric(
    Extension(service): Service,
    Path(raw): Path<String>,
) -> Result<ApiEnvelope<Vec<AggregatedCompany>>, AppError> {
    let rubric_id = parse_id("rubric", &raw)?;
    let companies = service.get_companies_from_rubric(rubric_id).await?;
    Ok(ApiEnvelope::ok("OK", companies))
}

/// GET /company/:id
pub async fn get_company(
    Extension(service): Service,
    Path(raw): Path<String>,
) -> Result<ApiEnvelope<AggregatedCompany>, AppError> {
    let company_id = parse_id("company", &raw)?;
    let company = service.get_company(company_id).await?;
    Ok(ApiEnvelope::ok("OK", company))
}

/// GET /health
pub async fn health(Extension(service): Service) -> Result<ApiEnvelope<()>, AppError> {
    service.health().await?;
    Ok(ApiEnvelope::empty(StatusCode::OK, "OK"))
}
