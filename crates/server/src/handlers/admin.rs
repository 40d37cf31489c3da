//! Admin endpoints acting on another user's data.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use shortpress_application::use_cases::{
    DeleteAllUserCategories, DeleteAllUserVariables, ListUserCategories, ListUserVariables,
    VariableView,
};
use shortpress_domain::{Category, UserId};

use crate::error::ApiResult;
use crate::extract::Authenticated;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Deleted {
    deleted: usize,
}

pub async fn list_user_variables(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(user_id): Path<u64>,
) -> ApiResult<Json<Vec<VariableView>>> {
    let store = state.store.as_ref();
    let views = ListUserVariables::new(store, store, state.resolver)
        .execute(&auth.principal, UserId(user_id))
        .await?;
    Ok(Json(views))
}

pub async fn delete_user_variables(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(user_id): Path<u64>,
) -> ApiResult<Json<Deleted>> {
    let store = state.store.as_ref();
    let deleted = DeleteAllUserVariables::new(store, store)
        .execute(&auth.principal, UserId(user_id))
        .await?;
    Ok(Json(Deleted { deleted }))
}

pub async fn list_user_categories(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(user_id): Path<u64>,
) -> ApiResult<Json<Vec<Category>>> {
    let store = state.store.as_ref();
    let categories = ListUserCategories::new(store, store)
        .execute(&auth.principal, UserId(user_id))
        .await?;
    Ok(Json(categories))
}

pub async fn delete_user_categories(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(user_id): Path<u64>,
) -> ApiResult<Json<Deleted>> {
    let store = state.store.as_ref();
    let deleted = DeleteAllUserCategories::new(store, store)
        .execute(&auth.principal, UserId(user_id))
        .await?;
    Ok(Json(Deleted { deleted }))
}
