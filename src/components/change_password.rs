use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::auth::{AuthContext, ChangePasswordFn};
use crate::components::field_errors::{FieldMessages, FormMessages};
use crate::forms::{FieldErrors, FormOutcome, PasswordChangeData};

/// Password change form. On success the server rotates the session, every
/// other signed-in browser goes stale, and this one returns to the profile.
#[component]
pub fn ChangePasswordPage() -> impl IntoView {
    let auth = AuthContext::expect();
    let navigate = use_navigate();

    let (old_password, set_old_password) = signal(String::new());
    let (new_password1, set_new_password1) = signal(String::new());
    let (new_password2, set_new_password2) = signal(String::new());
    let (errors, set_errors) = signal(FieldErrors::new());

    let action = ServerAction::<ChangePasswordFn>::new();

    Effect::new(move |_| {
        if let Some(result) = action.value().get() {
            match result {
                Ok(FormOutcome::Success(())) => {
                    auth.refresh();
                    navigate("/profile", Default::default());
                }
                Ok(FormOutcome::Invalid(field_errors)) => {
                    set_errors.set(field_errors);
                }
                Err(_) => {
                    let mut field_errors = FieldErrors::new();
                    field_errors.add_form("Something went wrong. Please try again.");
                    set_errors.set(field_errors);
                }
            }
        }
    });

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        action.dispatch(ChangePasswordFn {
            data: PasswordChangeData {
                old_password: old_password.get(),
                new_password1: new_password1.get(),
                new_password2: new_password2.get(),
            },
        });
    };

    view! {
        <div class="change-password-page">
            <h1>"Change password"</h1>
            <form class="change-password-form" on:submit=submit>
                <FormMessages errors=errors />

                <label>
                    "Old password"
                    <input
                        type="password"
                        prop:value=old_password
                        on:input=move |ev| set_old_password.set(event_target_value(&ev))
                    />
                </label>
                <FieldMessages errors=errors field="old_password" />

                <label>
                    "New password"
                    <input
                        type="password"
                        prop:value=new_password1
                        on:input=move |ev| set_new_password1.set(event_target_value(&ev))
                    />
                </label>
                <FieldMessages errors=errors field="new_password1" />

                <label>
                    "Repeat new password"
                    <input
                        type="password"
                        prop:value=new_password2
                        on:input=move |ev| set_new_password2.set(event_target_value(&ev))
                    />
                </label>
                <FieldMessages errors=errors field="new_password2" />

                <button type="submit" disabled=move || action.pending().get()>
                    "Change password"
                </button>
            </form>
        </div>
    }
}
