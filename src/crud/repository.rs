use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use super::model::CrudModel;

/// Field name to expected value, as received in the query string.
pub type Filters = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness or integrity constraint was violated.
    #[error("The value for field '{0}' must be unique.")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("storage error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    pub fn backend(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Backend(message.into())
    }
}

/// Persistence for one model.
///
/// Repositories perform no permission checks; the route layer checks every
/// record before it is written and after it is read.
#[async_trait]
pub trait Repository<M: CrudModel>: Send + Sync + 'static {
    /// Records whose fields match every filter.
    async fn query(&self, filters: &Filters) -> Result<Vec<M>, RepositoryError>;

    async fn find_by(&self, field: &str, value: &str) -> Result<Option<M>, RepositoryError>;

    /// Persist a new record, returning it with its identifier assigned.
    async fn save(&self, record: M) -> Result<M, RepositoryError>;

    async fn update(&self, record: M) -> Result<M, RepositoryError>;

    async fn delete(&self, record: &M) -> Result<(), RepositoryError>;
}
