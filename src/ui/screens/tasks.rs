use dioxus::prelude::*;

use crate::app::Backends;
use crate::domain::entities::task::Task;
use crate::ui::screens::crud_screen::{crud_screen, ScreenDef};
use crate::ui::view::{Column, FilterDef};

fn status_label(task: &Task) -> String {
    let status = task.status.as_str();
    let mut chars = status.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn task_screen() -> ScreenDef<Task> {
    ScreenDef {
        title: "Tasks",
        columns: vec![
            Column::from_schema("id"),
            Column::from_schema("title"),
            Column::from_schema("description").unsortable(),
            Column::from_schema("status").render(status_label),
            Column::from_schema("userId"),
        ],
        filters: vec![
            FilterDef::for_field::<Task>("title"),
            FilterDef::for_field::<Task>("status"),
        ],
    }
}

#[component]
pub fn TasksScreen() -> Element {
    let backends = use_context::<Backends>();
    crud_screen(task_screen(), backends.tasks.clone(), backends.settings.clone())
}
