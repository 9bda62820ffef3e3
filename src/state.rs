use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::extract::FromRef;
        use leptos::prelude::{use_context, LeptosOptions, ServerFnError};

        use crate::database::{DbConn, DbPool};
        use crate::media::MediaConfig;

        #[derive(FromRef, Clone)]
        pub struct AppState {
            pub leptos_options: LeptosOptions,
            pub pool: DbPool,
            pub media: MediaConfig,
        }

        /// Grabs a pooled connection from the `AppState` provided to the
        /// current server function. Pool exhaustion and missing context are
        /// both fatal for the request.
        pub async fn db_conn() -> Result<DbConn, ServerFnError> {
            let app_state = use_context::<AppState>()
                .ok_or_else(|| ServerFnError::new("AppState not found in context"))?;

            app_state
                .pool
                .get()
                .await
                .map_err(|e| ServerFnError::new(format!("Pool error: {e}")))
        }

        pub fn media_config() -> Result<MediaConfig, ServerFnError> {
            use_context::<AppState>()
                .map(|state| state.media)
                .ok_or_else(|| ServerFnError::new("AppState not found in context"))
        }
    }
}
