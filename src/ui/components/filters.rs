use dioxus::prelude::*;

use crate::ui::styles::{button_style, toolbar_style};
use crate::ui::view::FilterView;

#[component]
pub fn Filters(
    filters: Vec<FilterView>,
    on_change: EventHandler<(String, String)>,
    on_reset: EventHandler<()>,
) -> Element {
    rsx! {
        div { style: "{toolbar_style()}",
            {filters.iter().map(|filter| {
                let field = filter.field.clone();
                let field_for_change = filter.field.clone();
                let value = filter.value.clone();
                match filter.options.clone() {
                    Some(options) => rsx!(
                        label { key: "{field}", style: "{toolbar_style()}",
                            "{filter.label}"
                            select {
                                value: "{value}",
                                onchange: move |event| on_change.call((field_for_change.clone(), event.value())),
                                {options.into_iter().map(|choice| {
                                    let selected = choice == value;
                                    let caption = if choice.is_empty() { "All".to_string() } else { choice.clone() };
                                    rsx!(option { value: "{choice}", selected, "{caption}" })
                                })}
                            }
                        }
                    ),
                    None => rsx!(
                        label { key: "{field}", style: "{toolbar_style()}",
                            "{filter.label}"
                            input {
                                r#type: "search",
                                placeholder: "Search {filter.label}",
                                value: "{value}",
                                oninput: move |event| on_change.call((field_for_change.clone(), event.value())),
                            }
                        }
                    ),
                }
            })}
            button {
                style: "{button_style(false)}",
                onclick: move |_| on_reset.call(()),
                "Reset filters"
            }
        }
    }
}
