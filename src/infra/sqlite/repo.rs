use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::domain::entities::query::{PageResult, Query};
use crate::domain::entities::record::Record;
use crate::infra::sqlite::queries::{
    count_rows, delete_row, insert_rows, load_row, load_rows, update_row, StoredRow,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{RepoError, Repository};
use crate::usecase::services::query_service::{field_options, run_query};

/// Local persistent backend. Records are stored as JSON bodies per resource
/// and queried with the same pipeline as the mock backend.
pub struct SqliteRepository<R: Record> {
    pub db_path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

fn storage(err: anyhow::Error) -> RepoError {
    RepoError::Storage(format!("{err:#}"))
}

fn encode<R: Record>(record: &R) -> Result<StoredRow, RepoError> {
    let body = serde_json::to_string(record).map_err(|err| {
        RepoError::Storage(format!("failed to encode {} {}: {err}", R::RESOURCE, record.id()))
    })?;
    Ok(StoredRow {
        record_id: record.id().to_string(),
        body,
    })
}

fn decode<R: Record>(row: &StoredRow) -> Result<R, RepoError> {
    serde_json::from_str(&row.body).map_err(|err| {
        RepoError::Decode(format!("{} {}: {err}", R::RESOURCE, row.record_id))
    })
}

impl<R: Record> SqliteRepository<R> {
    pub fn open(db_path: &Path) -> Result<Self> {
        init_db(db_path)?;
        Ok(Self {
            db_path: db_path.to_path_buf(),
            _record: PhantomData,
        })
    }

    /// Populates an empty resource; leaves existing data untouched.
    pub fn seed_if_empty(&self, records: &[R]) -> Result<bool, RepoError> {
        let existing = count_rows(&self.db_path, R::RESOURCE).map_err(storage)?;
        if existing > 0 {
            return Ok(false);
        }
        let rows = records.iter().map(encode::<R>).collect::<Result<Vec<_>, _>>()?;
        insert_rows(&self.db_path, R::RESOURCE, &rows).map_err(storage)?;
        info!(resource = R::RESOURCE, count = rows.len(), "seeded sqlite store");
        Ok(true)
    }

    fn load_all(&self) -> Result<Vec<R>, RepoError> {
        load_rows(&self.db_path, R::RESOURCE)
            .map_err(storage)?
            .iter()
            .map(decode::<R>)
            .collect()
    }

    fn load_one(&self, id: &R::Id) -> Result<R, RepoError> {
        let row = load_row(&self.db_path, R::RESOURCE, &id.to_string())
            .map_err(storage)?
            .ok_or_else(|| RepoError::not_found::<R>(id))?;
        decode(&row)
    }
}

#[async_trait(?Send)]
impl<R: Record> Repository<R> for SqliteRepository<R> {
    async fn list(&self, query: &Query) -> Result<PageResult<R>, RepoError> {
        let records = self.load_all()?;
        run_query(&records, query)
    }

    async fn get(&self, id: &R::Id) -> Result<R, RepoError> {
        self.load_one(id)
    }

    async fn create(&self, payload: R::Payload) -> Result<R, RepoError> {
        let records = self.load_all()?;
        let created = R::from_payload(R::next_id(&records), payload, None);
        let row = encode(&created)?;
        insert_rows(&self.db_path, R::RESOURCE, &[row]).map_err(storage)?;
        Ok(created)
    }

    async fn update(&self, id: &R::Id, payload: R::Payload) -> Result<R, RepoError> {
        let existing = self.load_one(id)?;
        let updated = R::from_payload(id.clone(), payload, Some(&existing));
        let row = encode(&updated)?;
        let changed = update_row(&self.db_path, R::RESOURCE, &row).map_err(storage)?;
        if changed == 0 {
            return Err(RepoError::not_found::<R>(id));
        }
        Ok(updated)
    }

    async fn delete(&self, id: &R::Id) -> Result<(), RepoError> {
        let removed = delete_row(&self.db_path, R::RESOURCE, &id.to_string()).map_err(storage)?;
        if removed == 0 {
            return Err(RepoError::not_found::<R>(id));
        }
        Ok(())
    }

    async fn options(&self, field: &str) -> Result<Vec<String>, RepoError> {
        let records = self.load_all()?;
        field_options(&records, field)
    }
}
