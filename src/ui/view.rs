use crate::domain::entities::query::page_count;
use crate::domain::entities::record::{FieldKind, Record};
use crate::ui::state::collection_state::{CollectionState, EditState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Number,
    Select,
    DateTime,
}

impl InputKind {
    pub fn for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => InputKind::Text,
            FieldKind::Number => InputKind::Number,
            FieldKind::Bool | FieldKind::Enum(_) => InputKind::Select,
            FieldKind::Timestamp => InputKind::DateTime,
        }
    }

    /// `type` attribute of the `<input>` element; unused for selects.
    pub fn html_type(self) -> &'static str {
        match self {
            InputKind::Text | InputKind::Select => "text",
            InputKind::Email => "email",
            InputKind::Number => "number",
            InputKind::DateTime => "datetime-local",
        }
    }
}

/// One displayed column of a screen's table.
pub struct Column<R> {
    pub field: &'static str,
    pub header: &'static str,
    pub sortable: bool,
    /// Cell text; defaults to the field's display value.
    pub render: Option<fn(&R) -> String>,
    /// `None` keeps the cell read-only while its row is edited.
    pub input: Option<InputKind>,
}

impl<R: Record> Column<R> {
    pub fn from_schema(field: &'static str) -> Self {
        let def = R::field(field);
        Self {
            field,
            header: def.map(|def| def.label).unwrap_or(field),
            sortable: def.is_some(),
            render: None,
            input: def
                .filter(|def| def.editable)
                .map(|def| InputKind::for_kind(def.kind)),
        }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn render(mut self, render: fn(&R) -> String) -> Self {
        self.render = Some(render);
        self
    }

    pub fn input(mut self, input: InputKind) -> Self {
        self.input = Some(input);
        self
    }

    pub fn cell_text(&self, record: &R) -> String {
        match self.render {
            Some(render) => render(record),
            None => record
                .value(self.field)
                .map(|value| value.display())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDef {
    pub field: &'static str,
    pub label: &'static str,
    pub select: bool,
}

impl FilterDef {
    pub fn for_field<R: Record>(field: &'static str) -> Self {
        let def = R::field(field);
        Self {
            field,
            label: def.map(|def| def.label).unwrap_or(field),
            select: def.is_some_and(|def| def.kind.matches_exactly()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub field: String,
    pub header: String,
    /// False while a fetch is in flight, even for sortable columns.
    pub sortable: bool,
    pub sort_indicator: Option<&'static str>,
    pub input: Option<InputKind>,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub text: String,
    pub edit_value: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<CellView>,
    pub editing: bool,
    pub saving: bool,
}

/// What the table body shows. An empty result is distinct from a first load
/// still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    Loading,
    Empty,
    Rows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    pub total: u64,
    pub first_item: u64,
    pub last_item: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub page_size_choices: Vec<u32>,
    /// Every control is inert while a fetch is in flight.
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
    pub body: BodyState,
    /// Sort and paging controls are disabled while a fetch is in flight.
    pub loading: bool,
    pub pagination: Option<PaginationView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterView {
    pub field: String,
    pub label: String,
    pub value: String,
    /// Present for select filters; the first entry means "any".
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormFieldView {
    pub field: String,
    pub label: String,
    pub input: InputKind,
    pub value: String,
    pub error: Option<String>,
    pub required: bool,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateView {
    pub open: bool,
    pub saving: bool,
    pub fields: Vec<FormFieldView>,
}

/// Pagination bar model; `None` when there is nothing to page through.
pub fn pagination_view(
    current_page: u32,
    page_size: u32,
    total: u64,
    page_size_choices: &[u32],
) -> Option<PaginationView> {
    if total == 0 || page_size == 0 {
        return None;
    }
    let total_pages = page_count(total, page_size);
    let offset = u64::from(current_page.saturating_sub(1)) * u64::from(page_size);
    let (first_item, last_item) = if offset < total {
        (offset + 1, (offset + u64::from(page_size)).min(total))
    } else {
        (0, 0)
    };
    let mut choices = page_size_choices.to_vec();
    if !choices.contains(&page_size) {
        choices.push(page_size);
        choices.sort_unstable();
    }
    Some(PaginationView {
        current_page,
        total_pages,
        page_size,
        total,
        first_item,
        last_item,
        has_prev: current_page > 1,
        has_next: current_page < total_pages,
        page_size_choices: choices,
        disabled: false,
    })
}

/// Choices for a select input. Optional fields get a leading blank entry so a
/// record without a value is shown as such.
fn select_options<R: Record>(state: &CollectionState<R>, field: &str) -> Vec<String> {
    let options = state.options(field);
    if R::field(field).is_some_and(|def| def.required) {
        return options;
    }
    std::iter::once(String::new()).chain(options).collect()
}

pub fn table_view<R: Record>(
    state: &CollectionState<R>,
    columns: &[Column<R>],
    page_size_choices: &[u32],
) -> TableView {
    let query = state.query();
    let loading = state.loading();
    let column_views = columns
        .iter()
        .map(|column| ColumnView {
            field: column.field.to_string(),
            header: column.header.to_string(),
            sortable: column.sortable && !loading,
            sort_indicator: (column.sortable && query.sort_field == column.field)
                .then(|| query.sort_direction.indicator()),
            input: column.input,
            options: match column.input {
                Some(InputKind::Select) => select_options(state, column.field),
                _ => Vec::new(),
            },
        })
        .collect();

    let rows = state
        .items()
        .iter()
        .map(|record| {
            let id = record.id();
            let editing = match state.edit() {
                EditState::Editing {
                    id: editing,
                    draft,
                    errors,
                    saving,
                } if *editing == id => Some((draft, errors, *saving)),
                _ => None,
            };
            let cells = columns
                .iter()
                .map(|column| {
                    let text = column.cell_text(record);
                    match editing {
                        Some((draft, errors, _)) if column.input.is_some() => CellView {
                            edit_value: draft.get(column.field).to_string(),
                            error: errors.get(column.field).map(str::to_string),
                            text,
                        },
                        _ => CellView {
                            edit_value: text.clone(),
                            error: None,
                            text,
                        },
                    }
                })
                .collect();
            RowView {
                id: id.to_string(),
                cells,
                editing: editing.is_some(),
                saving: editing.is_some_and(|(_, _, saving)| saving),
            }
        })
        .collect::<Vec<_>>();

    let body = if !rows.is_empty() {
        BodyState::Rows
    } else if loading && !state.has_loaded() {
        BodyState::Loading
    } else {
        BodyState::Empty
    };

    let pagination = state.result().and_then(|result| {
        pagination_view(query.page, query.page_size, result.total, page_size_choices)
            .map(|view| PaginationView {
                disabled: loading,
                ..view
            })
    });

    TableView {
        columns: column_views,
        rows,
        body,
        loading,
        pagination,
    }
}

pub fn filter_views<R: Record>(state: &CollectionState<R>, filters: &[FilterDef]) -> Vec<FilterView> {
    filters
        .iter()
        .map(|filter| FilterView {
            field: filter.field.to_string(),
            label: filter.label.to_string(),
            value: state.pending_filter(filter.field).to_string(),
            options: filter.select.then(|| {
                let mut options = vec![String::new()];
                options.extend(state.options(filter.field));
                options
            }),
        })
        .collect()
}

pub fn create_view<R: Record>(state: &CollectionState<R>) -> CreateView {
    let create = state.create();
    let fields = R::schema()
        .iter()
        .filter(|def| def.editable)
        .map(|def| {
            let input = match (def.name, def.kind) {
                ("email", FieldKind::Text) => InputKind::Email,
                (_, kind) => InputKind::for_kind(kind),
            };
            FormFieldView {
                field: def.name.to_string(),
                label: def.label.to_string(),
                input,
                value: create.draft.get(def.name).to_string(),
                error: create.errors.get(def.name).map(str::to_string),
                required: def.required,
                options: match input {
                    InputKind::Select => select_options(state, def.name),
                    _ => Vec::new(),
                },
            }
        })
        .collect();
    CreateView {
        open: create.open,
        saving: create.saving,
        fields,
    }
}
