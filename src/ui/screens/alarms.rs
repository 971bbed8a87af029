use dioxus::prelude::*;

use crate::app::Backends;
use crate::domain::entities::alarm::Alarm;
use crate::ui::screens::crud_screen::{crud_screen, ScreenDef};
use crate::ui::view::{Column, FilterDef};

/// `2876` reads as `47m 56s`.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    match (seconds / 3600, (seconds % 3600) / 60, seconds % 60) {
        (0, 0, secs) => format!("{secs}s"),
        (0, mins, secs) => format!("{mins}m {secs:02}s"),
        (hours, mins, secs) => format!("{hours}h {mins:02}m {secs:02}s"),
    }
}

fn duration_label(alarm: &Alarm) -> String {
    format_duration(alarm.duration_seconds)
}

fn charge_label(alarm: &Alarm) -> String {
    format!("${:.2}", alarm.charge_amount)
}

pub fn alarm_screen() -> ScreenDef<Alarm> {
    ScreenDef {
        title: "Alarms",
        columns: vec![
            Column::from_schema("call_id"),
            Column::from_schema("caller_number"),
            Column::from_schema("called_number"),
            Column::from_schema("start_time"),
            Column::from_schema("end_time"),
            Column::from_schema("duration_seconds").render(duration_label),
            Column::from_schema("call_type"),
            Column::from_schema("carrier"),
            Column::from_schema("charge_amount").render(charge_label),
            Column::from_schema("call_status"),
        ],
        filters: vec![
            FilterDef::for_field::<Alarm>("caller_number"),
            FilterDef::for_field::<Alarm>("called_number"),
            FilterDef::for_field::<Alarm>("call_type"),
            FilterDef::for_field::<Alarm>("carrier"),
            FilterDef::for_field::<Alarm>("call_status"),
        ],
    }
}

#[component]
pub fn AlarmsScreen() -> Element {
    let backends = use_context::<Backends>();
    crud_screen(alarm_screen(), backends.alarms.clone(), backends.settings.clone())
}
