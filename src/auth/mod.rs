mod types;
mod api;
mod context;
#[cfg(feature = "ssr")]
pub mod server;

pub use api::*;
pub use context::*;
pub use types::*;
