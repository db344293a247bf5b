use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the application router. Call `.with_state(state)` on the result.
pub fn create_router() -> Router<AppState> {
    let api_routes = Router::new()
        .route(
            "/research",
            post(crate::api::handlers::research::research),
        )
        .route("/plan", post(crate::api::handlers::research::plan))
        .route(
            "/session",
            get(crate::api::handlers::session::get_session),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(crate::api::handlers::health::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
