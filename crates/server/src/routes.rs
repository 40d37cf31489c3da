//! Router assembly.

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, categories, users, variables};
use crate::state::AppState;

/// Builds the full router with tracing and request-id layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(users::root))
        .route("/users", post(users::create_user))
        .route("/users/me", get(users::me))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/variables", get(variables::list).post(variables::create))
        .route(
            "/variables/{id}",
            get(variables::get)
                .put(variables::update)
                .delete(variables::delete),
        )
        .route("/variables/{id}/resolved", get(variables::resolved))
        .route("/variables/{id}/dependencies", get(variables::dependencies))
        .route(
            "/variables/by-identifier/{identifier}/resolved",
            get(variables::resolved_by_identifier),
        )
        .route("/resolve", post(variables::preview))
        .route(
            "/admin/users/{user_id}/variables",
            get(admin::list_user_variables).delete(admin::delete_user_variables),
        )
        .route(
            "/admin/users/{user_id}/categories",
            get(admin::list_user_categories).delete(admin::delete_user_categories),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}
