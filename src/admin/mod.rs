pub mod api;
pub mod components;
pub mod filters;

pub use components::*;
