use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::record::Record;
use crate::usecase::ports::repo::{RepoError, Repository};

pub struct EditService<R: Record> {
    repo: Arc<dyn Repository<R>>,
}

impl<R: Record> Clone for EditService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: Record> EditService<R> {
    pub fn new(repo: Arc<dyn Repository<R>>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, payload: R::Payload) -> Result<R, RepoError> {
        match self.repo.create(payload).await {
            Ok(created) => {
                info!(resource = R::RESOURCE, id = %created.id(), "created record");
                Ok(created)
            }
            Err(err) => {
                warn!(resource = R::RESOURCE, "create failed: {err}");
                Err(err)
            }
        }
    }

    pub async fn update(&self, id: &R::Id, payload: R::Payload) -> Result<R, RepoError> {
        match self.repo.update(id, payload).await {
            Ok(updated) => {
                info!(resource = R::RESOURCE, id = %id, "updated record");
                Ok(updated)
            }
            Err(err) => {
                warn!(resource = R::RESOURCE, id = %id, "update failed: {err}");
                Err(err)
            }
        }
    }

    pub async fn delete(&self, id: &R::Id) -> Result<(), RepoError> {
        match self.repo.delete(id).await {
            Ok(()) => {
                info!(resource = R::RESOURCE, id = %id, "deleted record");
                Ok(())
            }
            Err(err) => {
                warn!(resource = R::RESOURCE, id = %id, "delete failed: {err}");
                Err(err)
            }
        }
    }
}
