//! Category endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use shortpress_application::ApplicationError;
use shortpress_application::ports::{CategoryDeletion, Page};
use shortpress_application::use_cases::{
    CreateCategory, CreateCategoryInput, DeleteCategory, GetCategory, ListCategories,
    UpdateCategory, UpdateCategoryInput,
};
use shortpress_domain::{Category, CategoryId};

use crate::error::ApiResult;
use crate::extract::Authenticated;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DeleteAction {
    #[default]
    Delete,
    Reassign,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    action: DeleteAction,
    new_category_id: Option<u64>,
}

impl DeleteParams {
    fn mode(&self) -> Result<CategoryDeletion, ApplicationError> {
        match (self.action, self.new_category_id) {
            (DeleteAction::Delete, _) => Ok(CategoryDeletion::Cascade),
            (DeleteAction::Reassign, Some(id)) => Ok(CategoryDeletion::Reassign(CategoryId(id))),
            (DeleteAction::Reassign, None) => Err(ApplicationError::InvalidInput(
                "new_category_id is required to reassign".into(),
            )),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = ListCategories::new(state.store.as_ref())
        .execute(&auth.principal, page)
        .await?;
    Ok(Json(categories))
}

pub async fn create(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(input): Json<CreateCategoryInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = CreateCategory::new(state.store.as_ref())
        .execute(&auth.principal, input)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<u64>,
) -> ApiResult<Json<Category>> {
    let category = GetCategory::new(state.store.as_ref())
        .execute(&auth.principal, CategoryId(id))
        .await?;
    Ok(Json(category))
}

pub async fn update(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<u64>,
    Json(input): Json<UpdateCategoryInput>,
) -> ApiResult<Json<Category>> {
    let category = UpdateCategory::new(state.store.as_ref())
        .execute(&auth.principal, CategoryId(id), input)
        .await?;
    Ok(Json(category))
}

/// `?action=delete` cascades to the category's variables,
/// `?action=reassign&new_category_id=N` moves them first.
pub async fn delete(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<u64>,
    Query(params): Query<DeleteParams>,
) -> ApiResult<StatusCode> {
    let mode = params.mode()?;
    DeleteCategory::new(state.store.as_ref())
        .execute(&auth.principal, CategoryId(id), mode)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
