use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::{
            body::Body as AxumBody,
            extract::State,
            http::Request,
            response::IntoResponse,
            routing::get,
            Router,
        };
        use dotenv::dotenv;
        use env_logger::Env;
        use leptos::prelude::*;
        use leptos_axum::{generate_route_list, handle_server_fns_with_context, LeptosRoutes};
        use tower_http::services::ServeDir;

        use dicedesk::app::{shell, App};
        use dicedesk::database::establish_connection;
        use dicedesk::media::MediaConfig;
        use dicedesk::state::AppState;

        async fn server_fn_handler(
            State(app_state): State<AppState>,
            request: Request<AxumBody>,
        ) -> impl IntoResponse {
            handle_server_fns_with_context(
                move || {
                    provide_context(app_state.clone());
                },
                request,
            )
            .await
        }

        #[tokio::main]
        async fn main() {
            dotenv().ok();
            env_logger::init_from_env(Env::default().default_filter_or("info"));

            let conf = get_configuration(None).unwrap();
            let leptos_options = conf.leptos_options;
            let addr = leptos_options.site_addr;
            let routes = generate_route_list(App);

            let database_url = std::env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set");
            let _ = std::env::var("SESSION_SECRET")
                .expect("SESSION_SECRET must be set");

            let pool = establish_connection(&database_url)
                .expect("failed to build database pool");
            let media = MediaConfig::from_env();

            let app_state = AppState {
                leptos_options: leptos_options.clone(),
                pool,
                media: media.clone(),
            };

            let mut app = Router::new()
                .route(
                    "/api/*fn_name",
                    get(server_fn_handler).post(server_fn_handler),
                )
                .leptos_routes_with_handler(routes, get(|State(app_state): State<AppState>, request: Request<AxumBody>| async move {
                    let handler = leptos_axum::render_app_to_stream_with_context(
                        move || {
                            provide_context(app_state.clone());
                        },
                        move || shell(leptos_options.clone())
                    );
                    handler(request).await.into_response()
                }));

            // room photos and avatars; a front proxy can take this over in
            // production by unsetting SERVE_MEDIA
            if media.serve_media {
                app = app.nest_service(&media.mount_path(), ServeDir::new(&media.media_root));
            }

            let app = app
                .fallback(leptos_axum::file_and_error_handler::<AppState, _>(shell))
                .with_state(app_state);

            log::info!("Starting server at {}", addr);

            let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
            log::info!("listening on http://{}", &addr);
            axum::serve(listener, app.into_make_service()).await.unwrap();
        }
    } else {
        pub fn main() {
            // no client-side main function
            // see lib.rs for the hydration entry point
        }
    }
}
