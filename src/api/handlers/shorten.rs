//! Handler for link shortening endpoint.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::owner::OwnerId;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "id": 1,
///   "original_url": "https://example.com/page",
///   "short_code": "aB3dE6gH",
///   "short_url": "https://s.example.com/r/aB3dE6gH",
///   "created_at": "2025-04-28T20:30:23Z"
/// }
/// ```
///
/// The link is attributed to the caller's owner cookie, see
/// [`crate::api::middleware::owner`].
///
/// # Errors
///
/// Returns 400 Bad Request if the body cannot be read as a request or the URL
/// is invalid.
/// Returns 500 Internal Server Error if no unique code could be found or
/// storage fails.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(OwnerId(owner_id)): Extension<OwnerId>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state.shortener.shorten(&payload.url, &owner_id).await?;
    let short_url = state.short_url(&record.short_code);

    Ok(Json(ShortenResponse::from_record(record, short_url)))
}
