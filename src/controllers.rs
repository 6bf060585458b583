use super::{
    errors::{not_found, ServerError},
    extractors::ValidJson,
    models::{AppState, NoteCreate, NoteUpdate, NotesList},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Healthy" }))
}

pub async fn list_notes(
    State(AppState { notes }): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
    let items = notes.list_all().await?;

    Ok(Json(NotesList { items }))
}

pub async fn create_note(
    State(AppState { notes }): State<AppState>,
    ValidJson(payload): ValidJson<NoteCreate>,
) -> Result<impl IntoResponse, ServerError> {
    let note = notes.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn get_note(
    State(AppState { notes }): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServerError> {
    Ok(match notes.get(id).await? {
        Some(note) => Json(note).into_response(),
        None => not_found(),
    })
}

pub async fn update_note(
    State(AppState { notes }): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<NoteUpdate>,
) -> Result<Response, ServerError> {
    Ok(match notes.update(id, &payload).await? {
        Some(note) => Json(note).into_response(),
        None => not_found(),
    })
}

pub async fn delete_note(
    State(AppState { notes }): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServerError> {
    Ok(if notes.delete(id).await? {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    })
}
