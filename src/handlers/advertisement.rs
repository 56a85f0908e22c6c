//! Advertisement CRUD handlers: create, read, update, delete, search.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::AppError;
use crate::model::{Advertisement, NewAdvertisement, SearchFilters, UpdateAdvertisement};
use crate::state::AppState;

/// Path ids are parsed here rather than via a typed extractor so a
/// non-integer id maps to 422 like any other malformed input.
fn parse_id(id_str: &str) -> Result<i32, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::Validation("id must be an integer".into()))
}

fn from_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Advertisement>, AppError> {
    let new: NewAdvertisement = from_body(body)?;
    let ad = state.store.insert(&new).await?;
    Ok(Json(ad))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Advertisement>, AppError> {
    let id = parse_id(&id_str)?;
    let ad = state.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(ad))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Advertisement>, AppError> {
    let id = parse_id(&id_str)?;
    let fields: UpdateAdvertisement = from_body(body)?;
    let ad = state
        .store
        .update_fields(id, &fields)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ad))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id_str)?;
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(Json(serde_json::json!({
        "message": "Advertisement deleted successfully"
    })))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Advertisement>>, AppError> {
    let filters = SearchFilters::from_query(&params)?;
    let ads = state.store.search(&filters).await?;
    Ok(Json(ads))
}
