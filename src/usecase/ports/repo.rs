use async_trait::async_trait;

use crate::domain::entities::query::{InvalidQuery, PageResult, Query};
use crate::domain::entities::record::Record;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },
    #[error("server responded {code}: {message}")]
    Status { code: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    InvalidQuery(#[from] InvalidQuery),
}

impl RepoError {
    pub fn not_found<R: Record>(id: &R::Id) -> Self {
        RepoError::NotFound {
            resource: R::RESOURCE.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound { .. })
    }
}

/// Data source for one record type. The mock, HTTP and SQLite backends are
/// interchangeable behind this trait and chosen at the composition root.
///
/// Mutations are never merged into earlier `list` results; callers re-issue
/// `list` to observe them.
#[async_trait(?Send)]
pub trait Repository<R: Record> {
    async fn list(&self, query: &Query) -> Result<PageResult<R>, RepoError>;

    async fn get(&self, id: &R::Id) -> Result<R, RepoError>;

    async fn create(&self, payload: R::Payload) -> Result<R, RepoError>;

    async fn update(&self, id: &R::Id, payload: R::Payload) -> Result<R, RepoError>;

    async fn delete(&self, id: &R::Id) -> Result<(), RepoError>;

    /// Allowed values of a select-type field.
    async fn options(&self, field: &str) -> Result<Vec<String>, RepoError>;
}
