//! API handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::api::AppState;
use crate::types::{Song, SongId};

type ErrorBody = (StatusCode, Json<serde_json::Value>);

/// Uniform 500 response for unexpected store failures.
///
/// The underlying cause is logged server-side and never leaked to the client.
fn store_failure(message: &'static str, err: crate::Error) -> ErrorBody {
    tracing::error!(error = %err, "{message}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

/// Health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Count all songs in the collection
pub async fn count(State(state): State<AppState>) -> Result<Json<CountResponse>, ErrorBody> {
    let count = state
        .store
        .count()
        .await
        .map_err(|e| store_failure("Failed to count documents", e))?;

    Ok(Json(CountResponse { count }))
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Retrieve all songs
pub async fn list_songs(
    State(state): State<AppState>,
) -> Result<Json<SongListResponse>, ErrorBody> {
    let songs = state
        .store
        .list()
        .await
        .map_err(|e| store_failure("Failed to retrieve songs", e))?;

    Ok(Json(SongListResponse { songs }))
}

#[derive(Debug, Serialize)]
pub struct SongListResponse {
    pub songs: Vec<Song>,
}

/// Retrieve a song by its id
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<SongId>,
) -> Result<Response, ErrorBody> {
    let song = state
        .store
        .find(id)
        .await
        .map_err(|e| store_failure("Failed to retrieve song by ID", e))?;

    match song {
        Some(song) => Ok(Json(song).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "song with id not found" })),
        )
            .into_response()),
    }
}

/// Create a new song
///
/// The duplicate check and the insert are two separate store calls; a race
/// between concurrent creates with the same id can still produce duplicates.
/// The body is parsed by hand so that malformed payloads (invalid JSON,
/// missing or non-integer `id`) degrade to the uniform 500 response.
pub async fn create_song(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ErrorBody> {
    let song: Song = serde_json::from_slice(&body)
        .map_err(|e| store_failure("Failed to create song", e.into()))?;

    let existing = state
        .store
        .find(song.id)
        .await
        .map_err(|e| store_failure("Failed to create song", e))?;

    if existing.is_some() {
        // Existing clients depend on the 302 status and the capitalized
        // "Message" key; do not normalize either.
        return Ok((
            StatusCode::FOUND,
            Json(json!({
                "Message": format!("song with id {} already present", song.id)
            })),
        )
            .into_response());
    }

    let inserted_id = state
        .store
        .insert(song)
        .await
        .map_err(|e| store_failure("Failed to create song", e))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSongResponse { inserted_id }),
    )
        .into_response())
}

#[derive(Debug, Serialize)]
pub struct CreateSongResponse {
    #[serde(rename = "inserted id")]
    pub inserted_id: String,
}

/// Delete a song by its id
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<SongId>,
) -> Result<Response, ErrorBody> {
    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(|e| store_failure("Failed to delete song", e))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "song not found" })),
        )
            .into_response())
    }
}
