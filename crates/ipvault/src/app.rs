use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        admin::flush_cache,
        error::ErrorBody,
        events::events_sse,
        files::{create_file, delete_file, read_file, update_file},
        health::livez,
        resources::{
            create_resource, delete_resource, get_resource, list_resources, update_resource,
        },
    },
    state::AppState,
};

async fn route_not_found() -> Response {
    ErrorBody::new(StatusCode::NOT_FOUND, "Route not found").into_response()
}

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        // Resource routes
        .route("/resources", get(list_resources).post(create_resource))
        .route(
            "/resources/{id}",
            get(get_resource)
                .patch(update_resource)
                .delete(delete_resource),
        )
        // File routes
        .route(
            "/files/{name}",
            get(read_file)
                .post(create_file)
                .put(update_file)
                .delete(delete_file),
        )
        .route("/events", get(events_sse))
        .route("/admin/cache/flush", post(flush_cache))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
