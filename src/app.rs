use std::sync::Arc;

use anyhow::Result;
use dioxus::prelude::*;
use tracing::{error, info, warn};

use crate::config::{AppConfig, DataSourceKind};
use crate::domain::entities::alarm::Alarm;
use crate::domain::entities::task::Task;
use crate::domain::entities::user::User;
use crate::infra::http::repo::{HttpConfig, HttpRepository};
use crate::infra::memory::repo::MemoryRepository;
use crate::infra::memory::seed::{seed_alarms, seed_tasks, seed_users};
use crate::infra::sqlite::repo::SqliteRepository;
use crate::ui::components::banner::Banner;
use crate::ui::screens::alarms::AlarmsScreen;
use crate::ui::screens::crud_screen::ScreenSettings;
use crate::ui::screens::tasks::TasksScreen;
use crate::ui::screens::users::UsersScreen;
use crate::ui::styles::{nav_bar_style, nav_button_style, root_container_style, BannerKind};
use crate::usecase::ports::repo::Repository;

/// One repository per screen plus the table settings, shared via context.
#[derive(Clone)]
pub struct Backends {
    pub users: Arc<dyn Repository<User>>,
    pub tasks: Arc<dyn Repository<Task>>,
    pub alarms: Arc<dyn Repository<Alarm>>,
    pub settings: ScreenSettings,
}

impl PartialEq for Backends {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.users, &other.users)
            && Arc::ptr_eq(&self.tasks, &other.tasks)
            && Arc::ptr_eq(&self.alarms, &other.alarms)
            && self.settings == other.settings
    }
}

pub fn build_backends(config: &AppConfig) -> Result<Backends> {
    let settings = ScreenSettings::from_config(config);
    let backends = match config.data_source {
        DataSourceKind::Mock => {
            let latency = config.mock_latency();
            Backends {
                users: Arc::new(MemoryRepository::new(seed_users()?).with_latency(latency)),
                tasks: Arc::new(MemoryRepository::new(seed_tasks()?).with_latency(latency)),
                alarms: Arc::new(MemoryRepository::new(seed_alarms()?).with_latency(latency)),
                settings,
            }
        }
        DataSourceKind::Http => {
            let mut http = HttpConfig::new(config.api_base_url.clone())
                .with_timeout(config.request_timeout());
            if let Some(token) = &config.bearer_token {
                http = http.with_bearer_token(token.clone());
            }
            Backends {
                users: Arc::new(HttpRepository::<User>::new(http.clone())?),
                tasks: Arc::new(HttpRepository::<Task>::new(http.clone())?),
                alarms: Arc::new(HttpRepository::<Alarm>::new(http)?),
                settings,
            }
        }
        DataSourceKind::Sqlite => {
            let db_path = config.resolved_db_path()?;
            let users = SqliteRepository::<User>::open(&db_path)?;
            users.seed_if_empty(&seed_users()?)?;
            let tasks = SqliteRepository::<Task>::open(&db_path)?;
            tasks.seed_if_empty(&seed_tasks()?)?;
            let alarms = SqliteRepository::<Alarm>::open(&db_path)?;
            alarms.seed_if_empty(&seed_alarms()?)?;
            Backends {
                users: Arc::new(users),
                tasks: Arc::new(tasks),
                alarms: Arc::new(alarms),
                settings,
            }
        }
    };
    info!(data_source = ?config.data_source, "backends ready");
    Ok(backends)
}

/// Backends for `kind`, keeping every other setting of `config`.
pub fn switch_backends(config: &AppConfig, kind: DataSourceKind) -> Result<Backends> {
    info!(from = ?config.data_source, to = ?kind, "switching data source");
    build_backends(&config.with_data_source(kind)?)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Users,
    Tasks,
    Alarms,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Users, Screen::Tasks, Screen::Alarms];

    pub fn label(self) -> &'static str {
        match self {
            Screen::Users => "Users",
            Screen::Tasks => "Tasks",
            Screen::Alarms => "Alarms",
        }
    }
}

#[component]
pub fn App() -> Element {
    let startup = use_hook(|| {
        AppConfig::load()
            .and_then(|config| build_backends(&config).map(|backends| (config, backends)))
            .map_err(|err| {
                error!("startup failed: {err:#}");
                format!("{err:#}")
            })
    });

    match startup {
        Ok((config, backends)) => rsx! { Shell { config, initial: backends } },
        Err(message) => rsx! {
            div { style: "{root_container_style()} padding: 24px;",
                h2 { "Admin Console could not start" }
                pre { style: "white-space: pre-wrap;", "{message}" }
            }
        },
    }
}

/// Navigation plus the data source picker. Switching sources rebuilds every
/// repository and remounts the screens, so no page state crosses backends.
#[component]
fn Shell(config: AppConfig, initial: Backends) -> Element {
    let mut active = use_signal(|| Screen::Users);
    let mut current = use_signal(|| (config.data_source, initial.clone()));
    let mut switch_error = use_signal(|| None::<String>);

    let switch = use_callback(move |kind: DataSourceKind| {
        if current.peek().0 == kind {
            return;
        }
        match switch_backends(&config, kind) {
            Ok(backends) => {
                current.set((kind, backends));
                switch_error.set(None);
            }
            Err(err) => {
                warn!(to = ?kind, "data source switch failed: {err:#}");
                switch_error.set(Some(format!("Could not switch to {}: {err:#}", kind.label())));
            }
        }
    });

    let screen = active();
    let (source, backends) = current();
    let source_key = source.key();
    let error = switch_error();

    rsx! {
        div { style: "{root_container_style()}",
            nav { style: "{nav_bar_style()}",
                {Screen::ALL.iter().map(|tab| {
                    let tab = *tab;
                    let label = tab.label();
                    rsx!(
                        button {
                            key: "{label}",
                            style: "{nav_button_style(screen == tab)}",
                            onclick: move |_| active.set(tab),
                            "{label}"
                        }
                    )
                })}
                label { style: "margin-left: auto;",
                    "Data source "
                    select {
                        value: "{source_key}",
                        onchange: move |event| {
                            if let Ok(kind) = event.value().parse::<DataSourceKind>() {
                                switch.call(kind);
                            }
                        },
                        {DataSourceKind::ALL.iter().map(|kind| {
                            let selected = *kind == source;
                            let (value, caption) = (kind.key(), kind.label());
                            rsx!(option { value: "{value}", selected, "{caption}" })
                        })}
                    }
                }
            }
            if let Some(message) = error {
                Banner {
                    message,
                    kind: BannerKind::Error,
                    on_dismiss: move |_| switch_error.set(None),
                }
            }
            {std::iter::once(rsx!(
                Workspace { key: "{source_key}", backends, screen }
            ))}
        }
    }
}

#[component]
fn Workspace(backends: Backends, screen: Screen) -> Element {
    use_context_provider(|| backends.clone());
    match screen {
        Screen::Users => rsx! { UsersScreen {} },
        Screen::Tasks => rsx! { TasksScreen {} },
        Screen::Alarms => rsx! { AlarmsScreen {} },
    }
}
