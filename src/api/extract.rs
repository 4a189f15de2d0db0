//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;

/// The acting character, read from the `X-Character-Id` header. Session
/// authentication happens upstream; this service receives the already
/// resolved character id and still enforces per-row ownership checks.
pub struct CharacterId(pub i64);

impl<S> FromRequestParts<S> for CharacterId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-character-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i64>().ok())
            .map(CharacterId)
            .ok_or(ApiError::Identity)
    }
}
