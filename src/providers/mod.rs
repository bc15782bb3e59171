//! Provider adapters: one implementation of [`ProviderAdapter`] per hosting
//! provider, each wrapping that provider's REST API.

pub mod github;
pub mod gitlab;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::models::{Provider, RepositoryMatch, Token};

pub use github::GitHubAdapter;
pub use gitlab::GitLabAdapter;

/// Branches requested per page when listing.
pub(crate) const BRANCH_PAGE_SIZE: usize = 100;

/// Uniform search and branch lookup over a hosting provider.
///
/// Implementations make a single attempt per call; failures are returned as
/// they happen.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    /// Search repositories visible to `token`. `query` is already normalized
    /// for this provider. Results keep upstream order.
    async fn search(&self, token: &Token, query: &str)
        -> Result<Vec<RepositoryMatch>, ProviderError>;

    async fn default_branch(&self, token: &Token, repo_full_name: &str)
        -> Result<String, ProviderError>;

    /// All branch names of the repository, in upstream order.
    async fn branches(&self, token: &Token, repo_full_name: &str)
        -> Result<Vec<String>, ProviderError>;
}

/// Send `request` with bearer auth and decode a JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: Provider,
    request: reqwest::RequestBuilder,
    token: &Token,
) -> Result<T, ProviderError> {
    let resp = request
        .bearer_auth(token.expose())
        .send()
        .await
        .map_err(|source| ProviderError::Transport { provider, source })?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(ProviderError::status(provider, status, &body));
    }

    resp.json::<T>()
        .await
        .map_err(|source| ProviderError::Decode { provider, source })
}

/// Join `path` onto an API base URL, keeping any path the base already has.
pub(crate) fn endpoint(
    provider: Provider,
    api_url: &str,
    path: &str,
) -> Result<url::Url, ProviderError> {
    let base = format!("{}/", api_url.trim_end_matches('/'));
    url::Url::parse(&base)
        .and_then(|base| base.join(path.trim_start_matches('/')))
        .map_err(|source| ProviderError::Url { provider, source })
}
