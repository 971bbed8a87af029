use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use dioxus::core::Task;
use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::domain::entities::record::{FieldKind, Record};
use crate::platform::desktop::dialog::confirm;
use crate::platform::desktop::timer::sleep;
use crate::ui::components::banner::Banner;
use crate::ui::components::create_modal::CreateModal;
use crate::ui::components::data_table::DataTable;
use crate::ui::components::filters::Filters;
use crate::ui::state::collection_state::{CollectionState, FetchOutcome, FilterChange};
use crate::ui::styles::{button_style, screen_style, toolbar_style, BannerKind};
use crate::ui::view::{create_view, filter_views, table_view, Column, FilterDef};
use crate::usecase::ports::repo::Repository;
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::query_service::QueryService;

/// Columns and filters one screen shows for its record type.
pub struct ScreenDef<R> {
    pub title: &'static str,
    pub columns: Vec<Column<R>>,
    pub filters: Vec<FilterDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSettings {
    pub page_size: u32,
    pub page_size_choices: Vec<u32>,
    pub filter_debounce: Duration,
}

impl ScreenSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            page_size_choices: config.page_size_options(),
            filter_debounce: config.filter_debounce(),
        }
    }
}

/// Fields whose allowed values are fetched once when the screen mounts.
fn option_fields<R: Record>(filters: &[FilterDef]) -> BTreeSet<&'static str> {
    filters
        .iter()
        .filter(|filter| filter.select)
        .map(|filter| filter.field)
        .chain(
            R::schema()
                .iter()
                .filter(|def| def.editable && matches!(def.kind, FieldKind::Enum(_)))
                .map(|def| def.name),
        )
        .collect()
}

/// Renders a full CRUD table for `R`. Must be called from a component body,
/// at the same position on every render.
pub fn crud_screen<R: Record>(
    def: ScreenDef<R>,
    repo: Arc<dyn Repository<R>>,
    settings: ScreenSettings,
) -> Element {
    let query_service = use_hook(|| QueryService::new(repo.clone()));
    let edit_service = use_hook(|| EditService::new(repo.clone()));
    let mut state =
        use_signal(|| CollectionState::<R>::new(settings.page_size, settings.filter_debounce));
    let mut in_flight = use_signal(|| None::<Task>);

    // Only the newest fetch may publish. Superseded tasks are also cancelled
    // so their futures stop early.
    let query_service_for_refresh = query_service.clone();
    let refresh = use_callback(move |()| {
        if let Some(previous) = in_flight.write().take() {
            previous.cancel();
        }
        let (ticket, query) = state.write().begin_fetch();
        let service = query_service_for_refresh.clone();
        let task = spawn(async move {
            let result = service.fetch(&query).await;
            let outcome = state.write().complete_fetch(ticket, result);
            if outcome != FetchOutcome::Stale {
                in_flight.set(None);
            }
        });
        in_flight.set(Some(task));
    });

    use_effect(move || refresh.call(()));

    let fields_to_load = option_fields::<R>(&def.filters);
    let query_service_for_options = query_service.clone();
    use_hook(move || {
        for field in fields_to_load {
            let service = query_service_for_options.clone();
            spawn(async move {
                let result = service.options(field).await;
                state.write().options_loaded(field, result);
            });
        }
    });

    let on_sort = move |field: String| {
        let changed = state.write().sort_requested(&field);
        if changed {
            refresh.call(());
        }
    };

    let on_page = move |page: u32| {
        let changed = state.write().page_requested(page);
        if changed {
            refresh.call(());
        }
    };

    let on_page_size = move |page_size: u32| {
        let changed = state.write().page_size_requested(page_size);
        if changed {
            refresh.call(());
        }
    };

    let on_filter = move |(field, value): (String, String)| {
        let change = state.write().filter_changed(&field, value);
        match change {
            FilterChange::Unchanged => {}
            FilterChange::Immediate => refresh.call(()),
            FilterChange::Debounced(ticket) => {
                let window = state.peek().debounce_window();
                spawn(async move {
                    sleep(window).await;
                    let changed = state.write().debounce_elapsed(ticket);
                    if changed {
                        refresh.call(());
                    }
                });
            }
        }
    };

    let on_reset = move |_: ()| {
        let changed = state.write().reset_filters();
        if changed {
            refresh.call(());
        }
    };

    let on_edit = move |row_id: String| {
        let record = state.peek().find_item(&row_id).cloned();
        if let Some(record) = record {
            state.write().begin_edit(&record);
        }
    };

    let on_edit_field = move |(field, value): (String, String)| {
        state.write().edit_field(&field, value);
    };

    let edit_service_for_save = edit_service.clone();
    let on_save = move |_: ()| {
        let commit = state.write().commit_edit();
        let Some((id, payload)) = commit else {
            return;
        };
        let service = edit_service_for_save.clone();
        spawn(async move {
            let result = service.update(&id, payload).await;
            let changed = state.write().edit_committed(result);
            if changed {
                refresh.call(());
            }
        });
    };

    let on_cancel = move |_: ()| state.write().cancel_edit();

    let edit_service_for_delete = edit_service.clone();
    let on_delete = move |row_id: String| {
        let Ok(id) = row_id.parse::<R::Id>() else {
            return;
        };
        state.write().request_delete(id);
        let confirmed = confirm(
            &format!("Delete {}", R::LABEL),
            &format!("Delete {} {row_id}? This cannot be undone.", R::LABEL),
        );
        let target = if confirmed {
            state.write().confirm_delete()
        } else {
            state.write().cancel_delete();
            None
        };
        let Some(id) = target else {
            return;
        };
        let service = edit_service_for_delete.clone();
        spawn(async move {
            let result = service.delete(&id).await;
            let changed = state.write().delete_finished(&id, result);
            if changed {
                refresh.call(());
            }
        });
    };

    let on_open_create = move |_: MouseEvent| state.write().open_create();

    let on_create_field = move |(field, value): (String, String)| {
        state.write().create_field(&field, value);
    };

    let edit_service_for_create = edit_service.clone();
    let on_create_submit = move |_: ()| {
        let submitted = state.write().submit_create();
        let Some(payload) = submitted else {
            return;
        };
        let service = edit_service_for_create.clone();
        spawn(async move {
            let result = service.create(payload).await;
            let changed = state.write().create_finished(result);
            if changed {
                refresh.call(());
            }
        });
    };

    let on_create_close = move |_: ()| state.write().close_create();

    let (table, filters, create, banner, notice) = {
        let snapshot = state.read();
        (
            table_view(&snapshot, &def.columns, &settings.page_size_choices),
            filter_views(&snapshot, &def.filters),
            create_view(&snapshot),
            snapshot.banner().map(str::to_string),
            snapshot.notice().map(str::to_string),
        )
    };
    let add_label = format!("Add {}", R::LABEL);
    let create_title = format!("New {}", R::LABEL);

    rsx! {
        div { style: "{screen_style()}",
            div { style: "{toolbar_style()} justify-content: space-between;",
                h2 { style: "margin: 0;", "{def.title}" }
                button {
                    style: "{button_style(false)}",
                    onclick: on_open_create,
                    "{add_label}"
                }
            }
            if let Some(message) = banner {
                Banner {
                    message,
                    kind: BannerKind::Error,
                    on_dismiss: move |_| state.write().dismiss_banner(),
                }
            }
            if let Some(message) = notice {
                Banner {
                    message,
                    kind: BannerKind::Notice,
                    on_dismiss: move |_| state.write().dismiss_notice(),
                }
            }
            Filters { filters, on_change: on_filter, on_reset }
            DataTable {
                view: table,
                on_sort,
                on_page,
                on_page_size,
                on_edit,
                on_edit_field,
                on_save,
                on_cancel,
                on_delete,
            }
            CreateModal {
                title: create_title,
                view: create,
                on_field: on_create_field,
                on_submit: on_create_submit,
                on_close: on_create_close,
            }
        }
    }
}
