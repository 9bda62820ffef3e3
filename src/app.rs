use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::StaticSegment;

use crate::admin::AdminConsole;
use crate::auth::AuthContext;
use crate::components::auth_panel::AuthPage;
use crate::components::catalogue::{Catalogue, SelectedCity};
use crate::components::change_password::ChangePasswordPage;
use crate::components::navbar::Navbar;
use crate::components::profile_page::ProfilePage;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    AuthContext::provide();
    provide_context(SelectedCity(RwSignal::new(None)));

    view! {
        <Stylesheet id="leptos" href="/pkg/dicedesk.css" />
        <Title text="DiceDesk" />

        <Router>
            <Navbar />
            <main class="page">
                <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                    <Route path=StaticSegment("") view=Catalogue />
                    // legacy path, renders the catalogue as well
                    <Route path=StaticSegment("about_us") view=Catalogue />
                    <Route path=StaticSegment("auth") view=AuthPage />
                    <Route path=StaticSegment("profile") view=ProfilePage />
                    <Route
                        path=(StaticSegment("profile"), StaticSegment("change_password"))
                        view=ChangePasswordPage
                    />
                    <Route path=StaticSegment("admin") view=AdminConsole />
                </Routes>
            </main>
        </Router>
    }
}
