use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::entities::draft::{Draft, FieldErrors};
use crate::domain::entities::query::{PageResult, Query, SortDirection};
use crate::domain::entities::record::{FieldKind, Record};
use crate::usecase::ports::repo::RepoError;
use crate::usecase::services::fetch_guard::{
    DebounceTicket, Debouncer, RequestSequencer, RequestTicket,
};

/// Edit lifecycle of the table. At most one row is ever in `Editing`.
#[derive(Debug, Clone, PartialEq)]
pub enum EditState<R: Record> {
    Viewing,
    Editing {
        id: R::Id,
        draft: Draft,
        errors: FieldErrors,
        saving: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateState {
    pub open: bool,
    pub draft: Draft,
    pub errors: FieldErrors,
    pub saving: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    Unchanged,
    /// The query changed; fetch now.
    Immediate,
    /// Wait for the debounce window, then call `debounce_elapsed`.
    Debounced(DebounceTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// A newer fetch was issued after this one; the result was dropped.
    Stale,
}

/// State owned by a screen hosting one table: the query, the last page
/// result, and the edit/create/delete interactions around it.
///
/// Methods returning `bool` report whether the caller has to re-fetch.
#[derive(Debug, Clone)]
pub struct CollectionState<R: Record> {
    query: Query,
    pending_filters: BTreeMap<String, String>,
    result: Option<PageResult<R>>,
    loading: bool,
    banner: Option<String>,
    notice: Option<String>,
    edit: EditState<R>,
    create: CreateState,
    pending_delete: Option<R::Id>,
    options: BTreeMap<String, Vec<String>>,
    sequencer: RequestSequencer,
    debouncer: Debouncer,
}

impl<R: Record> CollectionState<R> {
    pub fn new(page_size: u32, debounce: Duration) -> Self {
        Self {
            query: Query::new(R::ID_FIELD, page_size.max(1)),
            pending_filters: BTreeMap::new(),
            result: None,
            loading: false,
            banner: None,
            notice: None,
            edit: EditState::Viewing,
            create: CreateState::default(),
            pending_delete: None,
            options: BTreeMap::new(),
            sequencer: RequestSequencer::default(),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn result(&self) -> Option<&PageResult<R>> {
        self.result.as_ref()
    }

    pub fn items(&self) -> &[R] {
        self.result
            .as_ref()
            .map(|result| result.items.as_slice())
            .unwrap_or_default()
    }

    pub fn has_loaded(&self) -> bool {
        self.result.is_some()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn edit(&self) -> &EditState<R> {
        &self.edit
    }

    pub fn create(&self) -> &CreateState {
        &self.create
    }

    pub fn debounce_window(&self) -> Duration {
        self.debouncer.window()
    }

    pub fn find_item(&self, row_id: &str) -> Option<&R> {
        self.items()
            .iter()
            .find(|record| record.id().to_string() == row_id)
    }

    // Query

    pub fn sort_requested(&mut self, field: &str) -> bool {
        if R::field(field).is_none() {
            return false;
        }
        if self.query.sort_field == field {
            self.query.sort_direction = self.query.sort_direction.toggled();
        } else {
            self.query.sort_field = field.to_string();
            self.query.sort_direction = SortDirection::Asc;
        }
        self.query.page = 1;
        true
    }

    pub fn page_requested(&mut self, page: u32) -> bool {
        if page == 0 || page == self.query.page {
            return false;
        }
        self.query.page = page;
        true
    }

    /// A new page size invalidates the current offset, so the page resets.
    pub fn page_size_requested(&mut self, page_size: u32) -> bool {
        if page_size == 0 || (page_size == self.query.page_size && self.query.page == 1) {
            return false;
        }
        self.query.page_size = page_size;
        self.query.page = 1;
        true
    }

    pub fn pending_filter(&self, field: &str) -> &str {
        self.pending_filters
            .get(field)
            .or_else(|| self.query.filters.get(field))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Select filters apply at once; free-text filters wait for the debounce
    /// window so a burst of keystrokes costs a single fetch.
    pub fn filter_changed(&mut self, field: &str, value: String) -> FilterChange {
        let Some(def) = R::field(field) else {
            return FilterChange::Unchanged;
        };
        self.pending_filters.insert(field.to_string(), value.clone());
        if def.kind.matches_exactly() {
            if self.apply_filter(field, &value) {
                FilterChange::Immediate
            } else {
                FilterChange::Unchanged
            }
        } else {
            FilterChange::Debounced(self.debouncer.bump())
        }
    }

    pub fn debounce_elapsed(&mut self, ticket: DebounceTicket) -> bool {
        if !self.debouncer.is_current(ticket) {
            return false;
        }
        let pending = self
            .pending_filters
            .iter()
            .filter(|(field, _)| {
                R::field(field).is_some_and(|def| !def.kind.matches_exactly())
            })
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect::<Vec<_>>();
        let mut changed = false;
        for (field, value) in pending {
            changed |= self.apply_filter(&field, &value);
        }
        changed
    }

    pub fn reset_filters(&mut self) -> bool {
        let had_filters = self.query.active_filters().next().is_some();
        self.pending_filters.clear();
        self.query.filters.clear();
        self.debouncer.bump();
        if had_filters {
            self.query.page = 1;
        }
        had_filters
    }

    fn apply_filter(&mut self, field: &str, value: &str) -> bool {
        let value = value.trim();
        let current = self
            .query
            .filters
            .get(field)
            .map(|current| current.trim())
            .unwrap_or("");
        if current == value {
            return false;
        }
        if value.is_empty() {
            self.query.filters.remove(field);
        } else {
            self.query.filters.insert(field.to_string(), value.to_string());
        }
        self.query.page = 1;
        true
    }

    // Fetch

    pub fn begin_fetch(&mut self) -> (RequestTicket, Query) {
        let ticket = self.sequencer.issue();
        self.loading = true;
        (ticket, self.query.clone())
    }

    /// Publishes a fetch result unless a newer fetch was issued since. A
    /// failure keeps the previous page on screen and raises the banner.
    pub fn complete_fetch(
        &mut self,
        ticket: RequestTicket,
        result: Result<PageResult<R>, RepoError>,
    ) -> FetchOutcome {
        if !self.sequencer.is_current(ticket) {
            debug!(resource = R::RESOURCE, ?ticket, "dropping stale page result");
            return FetchOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.result = Some(page);
                self.banner = None;
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!(resource = R::RESOURCE, "keeping previous page after failed fetch: {err}");
                self.banner = Some(format!("Failed to load {}: {err}", R::RESOURCE));
                FetchOutcome::Failed
            }
        }
    }

    // Inline edit

    pub fn is_editing(&self, id: &R::Id) -> bool {
        matches!(&self.edit, EditState::Editing { id: editing, .. } if editing == id)
    }

    /// Opens `record` for editing. Any other open draft is discarded first.
    pub fn begin_edit(&mut self, record: &R) {
        let id = record.id();
        if let EditState::Editing { id: current, .. } = &self.edit {
            if *current == id {
                return;
            }
            debug!(resource = R::RESOURCE, %current, "discarding unsaved draft");
        }
        self.edit = EditState::Editing {
            id,
            draft: record.to_draft(),
            errors: FieldErrors::default(),
            saving: false,
        };
    }

    pub fn edit_field(&mut self, field: &str, value: String) {
        if let EditState::Editing { draft, .. } = &mut self.edit {
            draft.set(field, value);
        }
    }

    /// Validates the open draft. On failure the fields are annotated and the
    /// row stays in edit mode; on success the draft is marked as saving.
    pub fn commit_edit(&mut self) -> Option<(R::Id, R::Payload)> {
        let EditState::Editing {
            id,
            draft,
            errors,
            saving,
        } = &mut self.edit
        else {
            return None;
        };
        if *saving {
            return None;
        }
        match R::payload_from_draft(draft) {
            Ok(payload) => {
                *errors = FieldErrors::default();
                *saving = true;
                Some((id.clone(), payload))
            }
            Err(found) => {
                debug!(resource = R::RESOURCE, invalid = found.len(), "edit failed validation");
                *errors = found;
                None
            }
        }
    }

    /// A failed update keeps the draft open with the user's edits.
    pub fn edit_committed(&mut self, result: Result<R, RepoError>) -> bool {
        match result {
            Ok(updated) => {
                self.notice = Some(format!("Updated {} {}", R::LABEL, updated.id()));
                self.edit = EditState::Viewing;
                true
            }
            Err(err) => {
                if let EditState::Editing { saving, .. } = &mut self.edit {
                    *saving = false;
                }
                self.banner = Some(format!("Failed to update {}: {err}", R::LABEL));
                false
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Viewing;
    }

    // Create

    pub fn open_create(&mut self) {
        self.create = CreateState {
            open: true,
            draft: Draft::blank_for::<R>(),
            errors: FieldErrors::default(),
            saving: false,
        };
    }

    pub fn create_field(&mut self, field: &str, value: String) {
        if self.create.open {
            self.create.draft.set(field, value);
        }
    }

    pub fn submit_create(&mut self) -> Option<R::Payload> {
        if !self.create.open || self.create.saving {
            return None;
        }
        match R::payload_from_draft(&self.create.draft) {
            Ok(payload) => {
                self.create.errors = FieldErrors::default();
                self.create.saving = true;
                Some(payload)
            }
            Err(found) => {
                debug!(resource = R::RESOURCE, invalid = found.len(), "new record failed validation");
                self.create.errors = found;
                None
            }
        }
    }

    /// A failed create keeps the form open with what was typed.
    pub fn create_finished(&mut self, result: Result<R, RepoError>) -> bool {
        match result {
            Ok(created) => {
                self.notice = Some(format!("Created {} {}", R::LABEL, created.id()));
                self.create = CreateState::default();
                true
            }
            Err(err) => {
                self.create.saving = false;
                self.banner = Some(format!("Failed to create {}: {err}", R::LABEL));
                false
            }
        }
    }

    pub fn close_create(&mut self) {
        self.create = CreateState::default();
    }

    // Delete

    /// Arms the confirmation step; nothing is deleted until `confirm_delete`.
    pub fn request_delete(&mut self, id: R::Id) {
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<&R::Id> {
        self.pending_delete.as_ref()
    }

    pub fn confirm_delete(&mut self) -> Option<R::Id> {
        self.pending_delete.take()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// A failed delete leaves the current page untouched.
    pub fn delete_finished(&mut self, id: &R::Id, result: Result<(), RepoError>) -> bool {
        match result {
            Ok(()) => {
                if self.is_editing(id) {
                    self.edit = EditState::Viewing;
                }
                self.notice = Some(format!("Deleted {} {id}", R::LABEL));
                true
            }
            Err(err) if err.is_not_found() => {
                self.banner = Some(format!(
                    "Could not delete {} {id}: it no longer exists",
                    R::LABEL
                ));
                false
            }
            Err(err) => {
                self.banner = Some(format!("Failed to delete {} {id}: {err}", R::LABEL));
                false
            }
        }
    }

    // Options

    pub fn options_loaded(&mut self, field: &str, result: Result<Vec<String>, RepoError>) {
        match result {
            Ok(values) => {
                self.options.insert(field.to_string(), values);
            }
            Err(err) => {
                warn!(resource = R::RESOURCE, field, "falling back to declared options: {err}");
            }
        }
    }

    /// Loaded options for `field`, else the values its schema declares.
    pub fn options(&self, field: &str) -> Vec<String> {
        if let Some(values) = self.options.get(field) {
            return values.clone();
        }
        match R::field(field).map(|def| def.kind) {
            Some(FieldKind::Enum(values)) => values.iter().map(|value| value.to_string()).collect(),
            Some(FieldKind::Bool) => vec!["true".to_string(), "false".to_string()],
            _ => Vec::new(),
        }
    }
}
