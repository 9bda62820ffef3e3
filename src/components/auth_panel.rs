use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::auth::{AuthContext, LoginFn, RegisterFn};
use crate::components::field_errors::{FieldMessages, FormMessages};
use crate::forms::{FieldErrors, FormOutcome, LoginData, RegisterData};

/// Sign-in and sign-up on one page. Submitting either form keeps that panel
/// open when validation fails, so the visitor sees the messages next to
/// what they typed.
#[component]
pub fn AuthPage() -> impl IntoView {
    let auth = AuthContext::expect();
    let navigate = use_navigate();

    let (register_open, set_register_open) = signal(false);
    let (login_errors, set_login_errors) = signal(FieldErrors::new());
    let (register_errors, set_register_errors) = signal(FieldErrors::new());

    let login_action = ServerAction::<LoginFn>::new();
    let register_action = ServerAction::<RegisterFn>::new();

    {
        let navigate = navigate.clone();
        Effect::new(move |_| {
            if let Some(result) = login_action.value().get() {
                match result {
                    Ok(FormOutcome::Success(_)) => {
                        auth.refresh();
                        navigate("/", Default::default());
                    }
                    Ok(FormOutcome::Invalid(errors)) => {
                        set_register_open.set(false);
                        set_login_errors.set(errors);
                    }
                    Err(_) => {
                        let mut errors = FieldErrors::new();
                        errors.add_form("Something went wrong. Please try again.");
                        set_login_errors.set(errors);
                    }
                }
            }
        });
    }

    Effect::new(move |_| {
        if let Some(result) = register_action.value().get() {
            match result {
                Ok(FormOutcome::Success(_)) => {
                    auth.refresh();
                    navigate("/", Default::default());
                }
                Ok(FormOutcome::Invalid(errors)) => {
                    set_register_open.set(true);
                    set_register_errors.set(errors);
                }
                Err(_) => {
                    let mut errors = FieldErrors::new();
                    errors.add_form("Something went wrong. Please try again.");
                    set_register_errors.set(errors);
                }
            }
        }
    });

    view! {
        <div class="auth-page">
            <div class="auth-tabs">
                <button
                    class="auth-tab"
                    class:active=move || !register_open.get()
                    on:click=move |_| set_register_open.set(false)
                >
                    "Sign in"
                </button>
                <button
                    class="auth-tab"
                    class:active=move || register_open.get()
                    on:click=move |_| set_register_open.set(true)
                >
                    "Sign up"
                </button>
            </div>

            <div class="auth-panel" class:hidden=move || register_open.get()>
                <LoginForm action=login_action errors=login_errors />
            </div>
            <div class="auth-panel" class:hidden=move || !register_open.get()>
                <RegisterForm action=register_action errors=register_errors />
            </div>
        </div>
    }
}

#[component]
fn LoginForm(
    action: ServerAction<LoginFn>,
    #[prop(into)] errors: Signal<FieldErrors>,
) -> impl IntoView {
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        action.dispatch(LoginFn {
            data: LoginData {
                username: username.get(),
                password: password.get(),
            },
        });
    };

    view! {
        <form class="auth-form" on:submit=submit>
            <FormMessages errors=errors />

            <label>
                "Username"
                <input
                    type="text"
                    prop:value=username
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
            </label>
            <FieldMessages errors=errors field="username" />

            <label>
                "Password"
                <input
                    type="password"
                    prop:value=password
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
            </label>
            <FieldMessages errors=errors field="password" />

            <button type="submit" disabled=move || action.pending().get()>
                "Sign in"
            </button>
        </form>
    }
}

#[component]
fn RegisterForm(
    action: ServerAction<RegisterFn>,
    #[prop(into)] errors: Signal<FieldErrors>,
) -> impl IntoView {
    let (first_name, set_first_name) = signal(String::new());
    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password1, set_password1) = signal(String::new());
    let (password2, set_password2) = signal(String::new());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        action.dispatch(RegisterFn {
            data: RegisterData {
                first_name: first_name.get(),
                username: username.get(),
                email: email.get(),
                password1: password1.get(),
                password2: password2.get(),
            },
        });
    };

    view! {
        <form class="auth-form" on:submit=submit>
            <FormMessages errors=errors />

            <label>
                "First name"
                <input
                    type="text"
                    prop:value=first_name
                    on:input=move |ev| set_first_name.set(event_target_value(&ev))
                />
            </label>
            <FieldMessages errors=errors field="first_name" />

            <label>
                "Username"
                <input
                    type="text"
                    prop:value=username
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
            </label>
            <FieldMessages errors=errors field="username" />

            <label>
                "Email"
                <input
                    type="email"
                    prop:value=email
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
            </label>
            <FieldMessages errors=errors field="email" />

            <label>
                "Password"
                <input
                    type="password"
                    prop:value=password1
                    on:input=move |ev| set_password1.set(event_target_value(&ev))
                />
            </label>
            <FieldMessages errors=errors field="password1" />

            <label>
                "Repeat password"
                <input
                    type="password"
                    prop:value=password2
                    on:input=move |ev| set_password2.set(event_target_value(&ev))
                />
            </label>
            <FieldMessages errors=errors field="password2" />

            <button type="submit" disabled=move || action.pending().get()>
                "Sign up"
            </button>
        </form>
    }
}
