use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidQuery {
    #[error("page must be at least 1")]
    PageOutOfRange,
    #[error("page size must be greater than zero")]
    EmptyPageSize,
}

/// Complete filter/sort/page specification for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub page: u32,
    pub page_size: u32,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    pub filters: BTreeMap<String, String>,
}

impl Query {
    pub fn new(sort_field: impl Into<String>, page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            sort_field: sort_field.into(),
            sort_direction: SortDirection::Asc,
            filters: BTreeMap::new(),
        }
    }

    /// Filters with a non-blank value; blank ones do not constrain anything.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .map(|(field, value)| (field.as_str(), value.trim()))
            .filter(|(_, value)| !value.is_empty())
    }

    pub fn validate(&self) -> Result<(), InvalidQuery> {
        if self.page == 0 {
            return Err(InvalidQuery::PageOutOfRange);
        }
        if self.page_size == 0 {
            return Err(InvalidQuery::EmptyPageSize);
        }
        Ok(())
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize)
    }
}

/// Number of pages needed for `total` records; zero when there is nothing.
pub fn page_count(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size)).min(u64::from(u32::MAX)) as u32
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<R> {
    pub items: Vec<R>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<R> PageResult<R> {
    pub fn empty(query: &Query) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: query.page,
            page_size: query.page_size,
        }
    }
}
