//! Caller identity at the HTTP boundary.
//!
//! Login and sessions are handled upstream of this service. By the time a
//! request reaches the typeahead routes, the session layer has attached the
//! caller's provider token as `Authorization: Bearer <token>` and the
//! account's provider as `X-Git-Provider`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};

use crate::models::{Caller, Token};

pub const PROVIDER_HEADER: &str = "x-git-provider";

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    "Missing or invalid authorization header".to_string(),
                )
            })?;

        let provider = parts
            .headers
            .get(PROVIDER_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    "Missing provider header".to_string(),
                )
            })?;

        Ok(Caller::new(provider, Token::new(token)))
    }
}
