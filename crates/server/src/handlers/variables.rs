//! Variable and resolution endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use shortpress_application::ports::Page;
use shortpress_application::use_cases::{
    CreateVariable, CreateVariableInput, DeleteVariable, GetVariable, ListVariables, PreviewInput,
    PreviewOutput, PreviewResolution, ResolveVariable, ResolveVariableByIdentifier,
    ResolvedVariable, UpdateVariable, UpdateVariableInput, VariableDependencies,
    VariableDependenciesOutput, VariableView,
};
use shortpress_domain::{UserId, Variable, VariableId};

use crate::error::ApiResult;
use crate::extract::Authenticated;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OwnerParams {
    owner_id: Option<u64>,
}

pub async fn list(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<VariableView>>> {
    let views = ListVariables::new(state.store.as_ref(), state.resolver)
        .execute(&auth.principal, page)
        .await?;
    Ok(Json(views))
}

pub async fn create(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(input): Json<CreateVariableInput>,
) -> ApiResult<(StatusCode, Json<Variable>)> {
    let store = state.store.as_ref();
    let variable = CreateVariable::new(store, store, &state.clock)
        .execute(&auth.principal, input)
        .await?;
    Ok((StatusCode::CREATED, Json(variable)))
}

pub async fn get(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<u64>,
) -> ApiResult<Json<VariableView>> {
    let view = GetVariable::new(state.store.as_ref(), state.resolver)
        .execute(&auth.principal, VariableId(id))
        .await?;
    Ok(Json(view))
}

pub async fn update(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<u64>,
    Json(input): Json<UpdateVariableInput>,
) -> ApiResult<Json<Variable>> {
    let store = state.store.as_ref();
    let variable = UpdateVariable::new(store, store, &state.clock)
        .execute(&auth.principal, VariableId(id), input)
        .await?;
    Ok(Json(variable))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    DeleteVariable::new(state.store.as_ref())
        .execute(&auth.principal, VariableId(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn resolved(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<u64>,
) -> ApiResult<Json<ResolvedVariable>> {
    let resolved = ResolveVariable::new(state.store.as_ref(), state.resolver)
        .execute(&auth.principal, VariableId(id))
        .await?;
    Ok(Json(resolved))
}

pub async fn resolved_by_identifier(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(identifier): Path<String>,
    Query(params): Query<OwnerParams>,
) -> ApiResult<Json<ResolvedVariable>> {
    let resolved = ResolveVariableByIdentifier::new(state.store.as_ref(), state.resolver)
        .execute(&auth.principal, &identifier, params.owner_id.map(UserId))
        .await?;
    Ok(Json(resolved))
}

pub async fn dependencies(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<u64>,
) -> ApiResult<Json<VariableDependenciesOutput>> {
    let output = VariableDependencies::new(state.store.as_ref())
        .execute(&auth.principal, VariableId(id))
        .await?;
    Ok(Json(output))
}

/// Resolves a draft value without storing it.
pub async fn preview(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(input): Json<PreviewInput>,
) -> ApiResult<Json<PreviewOutput>> {
    let output = PreviewResolution::new(state.store.as_ref(), state.resolver)
        .execute(&auth.principal, input)
        .await?;
    Ok(Json(output))
}
