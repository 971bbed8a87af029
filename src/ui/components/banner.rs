use dioxus::prelude::*;

use crate::ui::styles::{banner_style, button_style, BannerKind};

#[component]
pub fn Banner(message: String, kind: BannerKind, on_dismiss: EventHandler<()>) -> Element {
    rsx! {
        div { style: "{banner_style(kind)}",
            span { "{message}" }
            button {
                style: "{button_style(false)}",
                onclick: move |_| on_dismiss.call(()),
                "Dismiss"
            }
        }
    }
}
