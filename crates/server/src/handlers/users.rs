//! User and welcome endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};
use shortpress_application::use_cases::{CreateUser, CreateUserInput};
use shortpress_domain::User;

use crate::error::ApiResult;
use crate::extract::{Authenticated, MaybeAuthenticated};
use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the ShortPress variable API" }))
}

/// Open to anonymous callers; only admins may create admins.
pub async fn create_user(
    State(state): State<AppState>,
    MaybeAuthenticated(caller): MaybeAuthenticated,
    Json(input): Json<CreateUserInput>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let caller = caller.map(|auth| auth.principal);
    let user = CreateUser::new(state.store.as_ref())
        .execute(caller.as_ref(), input)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn me(auth: Authenticated) -> Json<User> {
    Json(auth.user)
}
