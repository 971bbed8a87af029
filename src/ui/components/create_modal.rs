use dioxus::prelude::*;

use crate::ui::styles::{
    button_style, field_error_style, modal_backdrop_style, modal_style, toolbar_style,
};
use crate::ui::view::{CreateView, InputKind};

#[component]
pub fn CreateModal(
    title: String,
    view: CreateView,
    on_field: EventHandler<(String, String)>,
    on_submit: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    if !view.open {
        return rsx! {};
    }
    let saving = view.saving;

    rsx! {
        div { style: "{modal_backdrop_style()}",
            div {
                style: "{modal_style()}",
                onclick: move |event| event.stop_propagation(),
                h3 { style: "margin: 0;", "{title}" }
                {view.fields.iter().map(|field| {
                    let name = field.field.clone();
                    let value = field.value.clone();
                    let marker = if field.required { " *" } else { "" };
                    let control = if field.input == InputKind::Select {
                        let name = name.clone();
                        rsx!(
                            select {
                                value: "{value}",
                                onchange: move |event| on_field.call((name.clone(), event.value())),
                                {field.options.iter().map(|choice| {
                                    let selected = *choice == value;
                                    let caption = if choice.is_empty() { "(none)" } else { choice.as_str() };
                                    rsx!(option { value: "{choice}", selected, "{caption}" })
                                })}
                            }
                        )
                    } else {
                        let name = name.clone();
                        rsx!(
                            input {
                                r#type: field.input.html_type(),
                                value: "{value}",
                                oninput: move |event| on_field.call((name.clone(), event.value())),
                            }
                        )
                    };
                    rsx!(
                        div { key: "{name}", style: "display: flex; flex-direction: column; gap: 4px;",
                            label { "{field.label}{marker}" }
                            {control}
                            if let Some(error) = field.error.as_ref() {
                                div { style: "{field_error_style()}", "{error}" }
                            }
                        }
                    )
                })}
                div { style: "{toolbar_style()} justify-content: flex-end;",
                    button {
                        style: "{button_style(saving)}",
                        disabled: saving,
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        style: "{button_style(saving)}",
                        disabled: saving,
                        onclick: move |_| on_submit.call(()),
                        if saving { "Saving…" } else { "Create" }
                    }
                }
            }
        }
    }
}
