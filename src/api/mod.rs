pub mod books;
pub mod docs;
pub mod middleware;
pub mod response;
pub mod server;

use axum::{
    http::StatusCode,
    middleware::from_fn,
    response::Response,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::state::AppState;
use response::error_response;

async fn route_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "route not found")
}

/// Build the application router with the full middleware chain / 构建路由
///
/// Outermost first: CORS headers, OPTIONS short-circuit, access log, panic guard.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(server::home))
        .route("/api/health", get(server::health_check))
        .route("/api/books", get(books::list_books))
        .route("/api/books", post(books::create_book))
        .route("/api/books/search", get(books::search_books))
        .route("/api/books/:id", get(books::get_book))
        .route("/api/books/:id", put(books::update_book))
        .route("/api/books/:id", patch(books::patch_book))
        .route("/api/books/:id", delete(books::delete_book))
        // API docs
        .route("/api/doc", get(docs::swagger_ui))
        .route("/api/doc/", get(docs::swagger_ui))
        .route("/api/doc/openapi.json", get(docs::openapi_json))
        .fallback(route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(from_fn(middleware::access_log))
        .layer(from_fn(middleware::preflight));

    for layer in middleware::cors_headers() {
        app = app.layer(layer);
    }
    app
}
