use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::query::{PageResult, Query};
use crate::domain::entities::record::Record;
use crate::platform::desktop::timer::sleep;
use crate::usecase::ports::repo::{RepoError, Repository};
use crate::usecase::services::query_service::{field_options, run_query};

/// Mock backend over an owned collection. Each instance is its own fake
/// database; nothing is shared between instances.
pub struct MemoryRepository<R: Record> {
    records: RwLock<Vec<R>>,
    latency: Duration,
}

impl<R: Record> MemoryRepository<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
            latency: Duration::ZERO,
        }
    }

    /// Delays every call, the way a remote backend would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
    }
}

fn poisoned() -> RepoError {
    RepoError::Storage("mock collection lock poisoned".to_string())
}

#[async_trait(?Send)]
impl<R: Record> Repository<R> for MemoryRepository<R> {
    async fn list(&self, query: &Query) -> Result<PageResult<R>, RepoError> {
        self.simulate_latency().await;
        let records = self.records.read().map_err(|_| poisoned())?;
        run_query(&records, query)
    }

    async fn get(&self, id: &R::Id) -> Result<R, RepoError> {
        self.simulate_latency().await;
        let records = self.records.read().map_err(|_| poisoned())?;
        records
            .iter()
            .find(|record| &record.id() == id)
            .cloned()
            .ok_or_else(|| RepoError::not_found::<R>(id))
    }

    async fn create(&self, payload: R::Payload) -> Result<R, RepoError> {
        self.simulate_latency().await;
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let id = R::next_id(&records);
        let created = R::from_payload(id, payload, None);
        records.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &R::Id, payload: R::Payload) -> Result<R, RepoError> {
        self.simulate_latency().await;
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let slot = records
            .iter_mut()
            .find(|record| &record.id() == id)
            .ok_or_else(|| RepoError::not_found::<R>(id))?;
        let updated = R::from_payload(id.clone(), payload, Some(&*slot));
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &R::Id) -> Result<(), RepoError> {
        self.simulate_latency().await;
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let position = records
            .iter()
            .position(|record| &record.id() == id)
            .ok_or_else(|| RepoError::not_found::<R>(id))?;
        records.remove(position);
        Ok(())
    }

    async fn options(&self, field: &str) -> Result<Vec<String>, RepoError> {
        self.simulate_latency().await;
        let records = self.records.read().map_err(|_| poisoned())?;
        field_options(&records, field)
    }
}
