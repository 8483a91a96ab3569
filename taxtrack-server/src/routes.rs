use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{delete, get};

use crate::handlers;
use crate::middleware::{cors, log_requests};
use crate::state::AppState;

fn api() -> Router<AppState> {
    Router::new()
        .route(
            "/incomes",
            get(handlers::list_incomes).post(handlers::create_income),
        )
        .route("/incomes/{id}", delete(handlers::delete_income))
        .route("/tax-summary", get(handlers::tax_summary))
}

/// The full application: every route is served at the root and again under
/// `/api`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api())
        .nest("/api", api())
        .layer(from_fn(cors))
        .layer(from_fn(log_requests))
        .with_state(state)
}
