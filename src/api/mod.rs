//! HTTP surface for the directory service.
//!
//! ## Endpoints
//!
//! - `POST /building`      - store a building with its companies
//! - `GET  /building/:id`  - companies housed in a building
//! - `GET  /rubric/:id`    - companies under a rubric and its descendants
//! - `GET  /company/:id`   - one company with all its rubrics
//! - `GET  /health`        - store connectivity
//!
//! Every response body is an [`ApiEnvelope`].

pub mod envelope;
pub mod error;
pub mod handlers;
pub mod router;

pub use envelope::ApiEnvelope;
pub use error::AppError;
pub use router::build_router;
