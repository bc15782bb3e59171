use axum::extract::{RawQuery, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::error::TypeaheadError;
use crate::models::{BranchListing, Caller, Provider, RepositoryMatch};
use crate::state::AppState;

/// First `repo` value of a raw query string, if any.
fn repo_param(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    url::form_urlencoded::parse(raw.as_bytes())
        .find(|(key, _)| key == "repo")
        .map(|(_, value)| value.into_owned())
}

/// Cache headers for a successful response to `caller`.
fn cache_headers(state: &AppState, caller: &Caller) -> HeaderMap {
    match caller.provider.parse::<Provider>() {
        Ok(provider) => state.cache.headers(provider),
        Err(_) => HeaderMap::new(),
    }
}

/// GET /api/typeahead/repos?repo=<query> - Repository search
pub async fn search_repos(
    State(state): State<AppState>,
    caller: Caller,
    RawQuery(query): RawQuery,
) -> Result<(HeaderMap, Json<Vec<RepositoryMatch>>), TypeaheadError> {
    let search = repo_param(query.as_deref()).unwrap_or_default();
    let matches = state.typeahead.search_repositories(&caller, &search).await?;
    Ok((cache_headers(&state, &caller), Json(matches)))
}

/// GET /api/typeahead/branches?repo=<owner/name> - Default branch and branch names
pub async fn list_branches(
    State(state): State<AppState>,
    caller: Caller,
    RawQuery(query): RawQuery,
) -> Result<(HeaderMap, Json<BranchListing>), TypeaheadError> {
    let repo = repo_param(query.as_deref()).unwrap_or_default();
    let listing = state.typeahead.branch_lookup(&caller, &repo).await?;
    Ok((cache_headers(&state, &caller), Json(listing)))
}
