//! Services layered over the directory store.

pub mod directory_service;

pub use directory_service::{DirectoryService, ServiceOptions};
