pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;
pub mod store;
pub mod validation;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(view_routes())
        .route("/health", get(handlers::health))
        .route("/api-docs", get(handlers::docs::api_docs))
        .merge(auth_routes())
        .merge(book_routes())
        .merge(author_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Session-gated home view. The API surface below is unauthenticated;
/// only the view route carries the session middleware.
fn view_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home::home))
        .route_layer(axum_middleware::from_fn(middleware::session::session_middleware))
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", get(auth::logout))
}

fn book_routes() -> Router<AppState> {
    use handlers::books;

    Router::new()
        .route("/books", get(books::list).post(books::create))
        .route(
            "/books/:id",
            get(books::get).put(books::update).delete(books::delete),
        )
}

fn author_routes() -> Router<AppState> {
    use handlers::authors;

    Router::new()
        .route("/authors", get(authors::list).post(authors::create))
        .route(
            "/authors/:id",
            get(authors::get).put(authors::update).delete(authors::delete),
        )
}
