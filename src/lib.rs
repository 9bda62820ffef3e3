pub mod admin;
pub mod app;
pub mod auth;
pub mod components;
#[cfg(feature = "ssr")]
pub mod database;
pub mod forms;
pub mod media;
pub mod models;
#[cfg(feature = "ssr")]
pub mod schema;
pub mod state;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
