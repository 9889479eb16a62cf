//! Error type for the directory service
//!
//! Every layer (store, closure resolver, façade, HTTP) reports failures through
//! [`DirectoryError`]. The HTTP layer maps each variant to a status code with
//! [`DirectoryError::http_status`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("ambiguous: {0}")]
    Ambiguous(String),

    #[error("rubric hierarchy below {rubric_id} is deeper than {max_depth} levels")]
    HierarchyTooDeep { rubric_id: i64, max_depth: usize },

    #[error("storage: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl DirectoryError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Ambiguous(_) => 409,
            Self::HierarchyTooDeep { .. } => 500,
            Self::Storage(_) => 500,
        }
    }

    /// True for failures caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for DirectoryError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(anyhow::Error::new(err))
    }
}
