use leptos::leptos_dom::helpers::TimeoutHandle;
use leptos::prelude::*;
use std::time::Duration;

/// Debounced free-text search box for the catalogue and console lists.
#[component]
pub fn SearchBox(
    #[prop(into)] on_search: Callback<String>,
    #[prop(into, optional)] placeholder: String,
) -> impl IntoView {
    let (search_term, set_search_term) = signal(String::new());
    let timeout_handle: StoredValue<Option<TimeoutHandle>> = StoredValue::new(None);

    // debounce keystrokes so each pause produces one query
    Effect::new(move |_| {
        let current = search_term.get();

        if let Some(handle) = timeout_handle.get_value() {
            handle.clear();
        }

        let handle = set_timeout_with_handle(
            move || {
                on_search.run(current);
            },
            Duration::from_millis(400),
        )
        .expect("Failed to set timeout");

        timeout_handle.set_value(Some(handle));
    });

    let clear_search = move |_| {
        on_search.run(String::new());
        set_search_term.set(String::new());
    };

    let placeholder = if placeholder.is_empty() {
        "Search...".to_string()
    } else {
        placeholder
    };

    view! {
        <div class="search-box">
            <input
                type="text"
                placeholder=placeholder
                prop:value=search_term
                on:input=move |ev| {
                    set_search_term.set(event_target_value(&ev));
                }
                class="search-input"
            />
            {move || {
                (!search_term.get().is_empty())
                    .then(|| {
                        view! {
                            <button class="search-clear" on:click=clear_search>
                                "×"
                            </button>
                        }
                    })
            }}
        </div>
    }
}
