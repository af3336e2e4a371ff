use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::logging,
    routes::{activity, health, threads, users},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let user_routes = Router::new()
        .route("/users/me", get(users::get_me).put(users::upsert_me))
        .route("/users/:identity_id", get(users::get_user))
        .route("/users/:identity_id/threads", get(users::get_user_threads))
        .route("/search", get(users::search_users));

    let thread_routes = Router::new()
        .route("/threads", get(threads::list_threads).post(threads::create_thread))
        .route("/threads/:thread_id", get(threads::get_thread))
        .route("/threads/:thread_id/replies", post(threads::add_reply))
        .route("/activity", get(activity::list_activity));

    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .route("/health", get(health::health_check))
        .merge(user_routes)
        .merge(thread_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<axum::http::HeaderValue> = config.cors.origins
                .iter()
                .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}
