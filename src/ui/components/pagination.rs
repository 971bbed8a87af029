use dioxus::prelude::*;

use crate::ui::styles::{button_style, toolbar_style};
use crate::ui::view::PaginationView;

#[component]
pub fn Pagination(
    view: PaginationView,
    on_page: EventHandler<u32>,
    on_page_size: EventHandler<u32>,
) -> Element {
    let disabled = view.disabled;
    let current = view.current_page;
    let prev_disabled = disabled || !view.has_prev;
    let next_disabled = disabled || !view.has_next;
    let page_size = view.page_size;

    rsx! {
        div { style: "{toolbar_style()} justify-content: space-between;",
            span { "Showing {view.first_item}–{view.last_item} of {view.total}" }
            div { style: "{toolbar_style()}",
                button {
                    style: "{button_style(prev_disabled)}",
                    disabled: prev_disabled,
                    onclick: move |_| on_page.call(current.saturating_sub(1)),
                    "Previous"
                }
                span { "Page {current} of {view.total_pages}" }
                button {
                    style: "{button_style(next_disabled)}",
                    disabled: next_disabled,
                    onclick: move |_| on_page.call(current + 1),
                    "Next"
                }
                label { "Rows per page" }
                select {
                    disabled,
                    value: "{page_size}",
                    onchange: move |event| {
                        if let Ok(size) = event.value().parse::<u32>() {
                            on_page_size.call(size);
                        }
                    },
                    {view.page_size_choices.iter().map(|size| {
                        let selected = *size == page_size;
                        rsx!(option { value: "{size}", selected, "{size}" })
                    })}
                }
            }
        }
    }
}
