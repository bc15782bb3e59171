use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::Provider;

/// Longest upstream error body kept in a [`ProviderError`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Failure talking to an upstream provider API.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: Provider,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode {provider} response: {source}")]
    Decode {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid {provider} request URL: {source}")]
    Url {
        provider: Provider,
        #[source]
        source: url::ParseError,
    },

    #[error("{provider} rejects repository name {repo:?}")]
    InvalidRepo { provider: Provider, repo: String },
}

impl ProviderError {
    pub fn status(provider: Provider, status: reqwest::StatusCode, body: &str) -> Self {
        let body = match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        };
        ProviderError::Status {
            provider,
            status,
            body,
        }
    }
}

/// Errors surfaced by the typeahead operations.
#[derive(Debug, thiserror::Error)]
pub enum TypeaheadError {
    #[error("unsupported provider: {0:?}")]
    UnsupportedProvider(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Every typeahead failure looks the same to the end user: a bare 404.
/// The detail only goes to the log.
impl IntoResponse for TypeaheadError {
    fn into_response(self) -> Response {
        tracing::warn!("Typeahead request failed: {}", self);
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_maps_to_not_found() {
        let errors = vec![
            TypeaheadError::UnsupportedProvider("svn".into()),
            TypeaheadError::InvalidArgument("repo"),
            TypeaheadError::Provider(ProviderError::InvalidRepo {
                provider: Provider::GitHub,
                repo: "../admin".into(),
            }),
            TypeaheadError::Provider(ProviderError::status(
                Provider::GitHub,
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                "secret upstream detail",
            )),
        ];
        for err in errors {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn test_status_error_truncates_long_bodies() {
        let body = "x".repeat(2000);
        let err = ProviderError::status(Provider::GitLab, reqwest::StatusCode::BAD_GATEWAY, &body);
        match err {
            ProviderError::Status { body, .. } => {
                assert_eq!(body.len(), MAX_ERROR_BODY_CHARS + 3);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_provider_error_display_names_provider() {
        let err = ProviderError::status(Provider::GitLab, reqwest::StatusCode::UNAUTHORIZED, "no");
        assert!(err.to_string().starts_with("gitlab returned 401"));
    }
}
