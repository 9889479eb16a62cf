//! Handbook - building / company / rubric directory service
//!
//! Buildings house companies; companies are tagged with rubrics, and rubrics
//! form a parent/child hierarchy. The crate persists buildings with their
//! companies and answers company lookups by building, by company id, and by
//! rubric (including every descendant rubric).
//!
//! ## Call chain
//! HTTP route -> `DirectoryService` -> `DirectoryStore` (Postgres or memory)
//! -> flat rows -> sort -> aggregate -> JSON envelope
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use handbook::models::{Building, CompanyInput};
//! use handbook::services::{DirectoryService, ServiceOptions};
//! use handbook::store::MemoryDirectoryStore;
//!
//! # async fn demo() -> Result<(), handbook::error::DirectoryError> {
//! let service = DirectoryService::new(
//!     Arc::new(MemoryDirectoryStore::new()),
//!     ServiceOptions::default(),
//! );
//! let building = Building {
//!     address: "Lenina 1".into(),
//!     coordinates: "55.75,37.61".into(),
//!     companies: vec![CompanyInput {
//!         name: "Cafe".into(),
//!         phones: "+7 900 000 00 00".into(),
//!         rubrics: vec![1],
//!     }],
//! };
//! let inserted = service.insert_building(&building).await?;
//! let companies = service.get_companies_from_building(inserted.building_id).await?;
//! assert_eq!(companies.len(), 1);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Row / record types shared by every layer
pub mod models;

// Sort, aggregate and rubric closure
pub mod directory;

// Storage port and the in-process store
pub mod store;

// Postgres store (when enabled)
#[cfg(feature = "database")]
pub mod database;

// Directory façade
pub mod services;

// HTTP surface and server configuration
#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;

pub use error::{DirectoryError, Result};
pub use models::{AggregatedCompany, Building, CompanyInput, FlatCompanyRow, InsertedBuilding};
pub use services::{DirectoryService, ServiceOptions};
pub use store::{DirectoryStore, MemoryDirectoryStore};

#[cfg(feature = "database")]
pub use database::{DatabaseConfig, DatabaseManager, PgDirectoryStore};
