use leptos::prelude::*;

use crate::forms::FieldErrors;

/// Messages attached to one input, rendered under it.
#[component]
pub fn FieldMessages(
    #[prop(into)] errors: Signal<FieldErrors>,
    #[prop(into)] field: String,
) -> impl IntoView {
    view! {
        <ul class="field-errors">
            {move || {
                errors
                    .get()
                    .messages_for(&field)
                    .into_iter()
                    .map(|message| view! { <li>{message}</li> })
                    .collect_view()
            }}
        </ul>
    }
}

/// Messages not tied to any input, like a rejected login.
#[component]
pub fn FormMessages(#[prop(into)] errors: Signal<FieldErrors>) -> impl IntoView {
    view! {
        <ul class="form-errors">
            {move || {
                errors
                    .get()
                    .messages_for(crate::forms::FORM_FIELD)
                    .into_iter()
                    .map(|message| view! { <li>{message}</li> })
                    .collect_view()
            }}
        </ul>
    }
}
