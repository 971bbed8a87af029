use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::query::{PageResult, Query, SortDirection};
use crate::domain::entities::record::{
    collate, compare_values, matches_filter, FieldKind, Record,
};
use crate::usecase::ports::repo::{RepoError, Repository};

/// Filter, then sort, then paginate an in-memory collection.
///
/// A page past the end yields no items and the full filtered total. Filters on
/// attributes the schema does not know are ignored.
pub fn run_query<R: Record>(records: &[R], query: &Query) -> Result<PageResult<R>, RepoError> {
    query.validate()?;

    let filters = query
        .active_filters()
        .filter_map(|(field, needle)| match R::field(field) {
            Some(def) => Some((def, needle)),
            None => {
                debug!(resource = R::RESOURCE, field, "ignoring filter on unknown field");
                None
            }
        })
        .collect::<Vec<_>>();

    let mut matched = records
        .iter()
        .filter(|record| {
            filters.iter().all(|(def, needle)| {
                matches_filter(record.value(def.name).as_ref(), def.kind, needle)
            })
        })
        .collect::<Vec<_>>();

    sort_records(&mut matched, &query.sort_field, query.sort_direction);

    let total = matched.len() as u64;
    let items = matched
        .into_iter()
        .skip(query.offset())
        .take(query.page_size as usize)
        .cloned()
        .collect();

    Ok(PageResult {
        items,
        total,
        page: query.page,
        page_size: query.page_size,
    })
}

/// Stable sort on one attribute. Descending negates the comparator, so
/// records that compare equal keep their original relative order.
pub fn sort_records<R: Record>(records: &mut [&R], field: &str, direction: SortDirection) {
    if R::field(field).is_none() {
        return;
    }
    records.sort_by(|a, b| {
        let ordering = compare_values(a.value(field).as_ref(), b.value(field).as_ref());
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Declared options for enumerated fields; for free-form fields, the distinct
/// values currently stored.
pub fn field_options<R: Record>(records: &[R], field: &str) -> Result<Vec<String>, RepoError> {
    let def = R::field(field).ok_or_else(|| RepoError::NotFound {
        resource: format!("{}/{field}-options", R::RESOURCE),
        id: field.to_string(),
    })?;

    if let FieldKind::Enum(options) = def.kind {
        return Ok(options.iter().map(|option| option.to_string()).collect());
    }

    let distinct = records
        .iter()
        .filter_map(|record| record.value(field))
        .map(|value| value.display())
        .collect::<BTreeSet<_>>();
    let mut values = distinct.into_iter().collect::<Vec<_>>();
    values.sort_by(|a, b| collate(a, b));
    Ok(values)
}

pub struct QueryService<R: Record> {
    repo: Arc<dyn Repository<R>>,
}

impl<R: Record> Clone for QueryService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: Record> QueryService<R> {
    pub fn new(repo: Arc<dyn Repository<R>>) -> Self {
        Self { repo }
    }

    pub async fn fetch(&self, query: &Query) -> Result<PageResult<R>, RepoError> {
        let result = self.repo.list(query).await;
        match &result {
            Ok(page) => info!(
                resource = R::RESOURCE,
                page = query.page,
                page_size = query.page_size,
                sort = %query.sort_field,
                returned = page.items.len(),
                total = page.total,
                "fetched page"
            ),
            Err(err) => info!(resource = R::RESOURCE, page = query.page, "fetch failed: {err}"),
        }
        result
    }

    pub async fn options(&self, field: &str) -> Result<Vec<String>, RepoError> {
        let result = self.repo.options(field).await;
        if let Err(err) = &result {
            debug!(resource = R::RESOURCE, field, "options lookup failed: {err}");
        }
        result
    }
}
