use leptos::prelude::*;
use leptos_router::components::A;

use crate::auth::AuthContext;
use crate::components::catalogue::SelectedCity;
use crate::components::city_picker::CityPicker;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = AuthContext::expect();
    let selected = expect_context::<SelectedCity>().0;

    view! {
        <nav class="navbar">
            <A href="/" attr:class="navbar-brand">
                "DiceDesk"
            </A>

            <CityPicker
                selected=Signal::derive(move || selected.get())
                on_select=Callback::new(move |city| selected.set(Some(city)))
            />

            <div class="navbar-links">
                <A href="/about_us">"About us"</A>

                <Suspense fallback=|| view! { <span class="navbar-auth-loading"></span> }>
                    {move || {
                        auth.user
                            .get()
                            .map(|user| match user {
                                Some(user) => {
                                    view! {
                                        <div class="navbar-user">
                                            {user
                                                .is_staff
                                                .then(|| view! { <A href="/admin">"Console"</A> })}
                                            <A href="/profile" attr:class="navbar-profile">
                                                <img
                                                    src=user.avatar_url.clone()
                                                    alt="Avatar"
                                                    class="navbar-avatar"
                                                />
                                                {user.first_name.clone()}
                                            </A>
                                        </div>
                                    }
                                        .into_any()
                                }
                                None => view! { <A href="/auth">"Sign in"</A> }.into_any(),
                            })
                    }}
                </Suspense>
            </div>
        </nav>
    }
}
