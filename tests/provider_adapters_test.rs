//! The GitHub and GitLab adapters against local servers that imitate the
//! upstream REST endpoints.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use repo_typeahead::error::ProviderError;
use repo_typeahead::models::{Provider, Token};
use repo_typeahead::providers::{GitHubAdapter, GitLabAdapter, ProviderAdapter};

const TOKEN: &str = "upstream-token";

#[derive(Clone, Default)]
struct Seen {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(|h| h == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Bad credentials"})),
    )
}

// ─── Fake GitHub ─────────────────────────────────────────

fn fake_github(seen: Seen) -> Router {
    Router::new()
        .route(
            "/search/repositories",
            get(
                |State(seen): State<Seen>,
                 headers: HeaderMap,
                 Query(q): Query<HashMap<String, String>>| async move {
                    if !authorized(&headers) {
                        return unauthorized();
                    }
                    seen.queries.lock().unwrap().push(q);
                    (
                        StatusCode::OK,
                        Json(json!({
                            "total_count": 2,
                            "items": [
                                {"name": "partial", "full_name": "owner/partial",
                                 "description": "First", "homepage": null, "id": 1},
                                {"name": "partial-two", "full_name": "owner/partial-two",
                                 "description": null, "homepage": "https://two.dev", "id": 2}
                            ]
                        })),
                    )
                },
            ),
        )
        .route(
            "/repos/{owner}/{repo}",
            get(
                |headers: HeaderMap, Path((owner, repo)): Path<(String, String)>| async move {
                    if !authorized(&headers) {
                        return unauthorized();
                    }
                    if repo == "missing" {
                        return (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"})));
                    }
                    (
                        StatusCode::OK,
                        Json(json!({"full_name": format!("{owner}/{repo}"), "default_branch": "trunk"})),
                    )
                },
            ),
        )
        .route(
            "/repos/{owner}/{repo}/branches",
            get(
                |State(seen): State<Seen>,
                 headers: HeaderMap,
                 Query(q): Query<HashMap<String, String>>| async move {
                    if !authorized(&headers) {
                        return unauthorized();
                    }
                    let page: usize = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
                    seen.queries.lock().unwrap().push(q);
                    let names: Vec<Value> = match page {
                        1 => (0..100).map(|i| json!({"name": format!("b{i:03}")})).collect(),
                        2 => vec![json!({"name": "trunk"}), json!({"name": "zz-last"})],
                        _ => Vec::new(),
                    };
                    (StatusCode::OK, Json(Value::Array(names)))
                },
            ),
        )
        .with_state(seen)
}

fn github_adapter(base: &str) -> GitHubAdapter {
    GitHubAdapter::new(reqwest::Client::new(), base, 30, 10)
}

#[tokio::test]
async fn test_github_search_sends_qualifiers_and_maps_items() {
    let seen = Seen::default();
    let base = spawn(fake_github(seen.clone())).await;
    let adapter = github_adapter(&base);

    let results = adapter
        .search(&Token::new(TOKEN), "myrepo+partial+user:owner")
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "partial");
    assert_eq!(results[0].full_name, "owner/partial");
    assert_eq!(results[0].homepage, "");
    assert_eq!(results[1].description, "");
    assert_eq!(results[1].homepage, "https://two.dev");

    let queries = seen.queries.lock().unwrap();
    // `+` reaches GitHub as the term separator
    assert_eq!(queries[0]["q"], "myrepo partial user:owner");
    assert_eq!(queries[0]["per_page"], "30");
}

#[tokio::test]
async fn test_github_default_branch() {
    let base = spawn(fake_github(Seen::default())).await;
    let adapter = github_adapter(&base);

    let branch = adapter
        .default_branch(&Token::new(TOKEN), "owner/repo")
        .await
        .unwrap();
    assert_eq!(branch, "trunk");
}

#[tokio::test]
async fn test_github_branches_follow_pages_in_order() {
    let seen = Seen::default();
    let base = spawn(fake_github(seen.clone())).await;
    let adapter = github_adapter(&base);

    let branches = adapter
        .branches(&Token::new(TOKEN), "owner/repo")
        .await
        .unwrap();

    assert_eq!(branches.len(), 102);
    assert_eq!(branches[0], "b000");
    assert_eq!(branches[99], "b099");
    assert_eq!(branches[100], "trunk");
    assert_eq!(branches[101], "zz-last");
    // Short second page ends the walk
    assert_eq!(seen.queries.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_github_branches_stop_at_page_limit() {
    let seen = Seen::default();
    let base = spawn(fake_github(seen.clone())).await;
    let adapter = GitHubAdapter::new(reqwest::Client::new(), base, 30, 1);

    let branches = adapter
        .branches(&Token::new(TOKEN), "owner/repo")
        .await
        .unwrap();

    assert_eq!(branches.len(), 100);
    assert_eq!(seen.queries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_github_not_found_is_status_error() {
    let base = spawn(fake_github(Seen::default())).await;
    let adapter = github_adapter(&base);

    let err = adapter
        .default_branch(&Token::new(TOKEN), "owner/missing")
        .await
        .unwrap_err();
    match err {
        ProviderError::Status { provider, status, body } => {
            assert_eq!(provider, Provider::GitHub);
            assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
            assert!(body.contains("Not Found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_github_bad_token_is_status_error() {
    let base = spawn(fake_github(Seen::default())).await;
    let adapter = github_adapter(&base);

    let err = adapter
        .search(&Token::new("wrong"), "anything")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Status { status, .. } if status == reqwest::StatusCode::UNAUTHORIZED
    ));
}

#[tokio::test]
async fn test_github_undecodable_body_is_decode_error() {
    let router = Router::new().route("/search/repositories", get(|| async { "not json" }));
    let base = spawn(router).await;
    let adapter = github_adapter(&base);

    let err = adapter
        .search(&Token::new(TOKEN), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Decode { provider: Provider::GitHub, .. }));
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport_error() {
    let adapter = github_adapter("http://127.0.0.1:1");

    let err = adapter
        .search(&Token::new(TOKEN), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Transport { provider: Provider::GitHub, .. }));
}

#[tokio::test]
async fn test_github_repo_with_dot_segments_never_leaves_api_base() {
    let hits: Arc<Mutex<Vec<String>>> = Arc::default();
    let recorded = hits.clone();
    let router = Router::new().fallback(move |uri: axum::http::Uri| {
        let recorded = recorded.clone();
        async move {
            recorded.lock().unwrap().push(uri.path().to_string());
            Json(json!({"default_branch": "leak"}))
        }
    });
    let base = spawn(router).await;
    let adapter = GitHubAdapter::new(reqwest::Client::new(), format!("{base}/api/v3"), 30, 1);

    for repo in ["../../../admin", "owner/../../admin", "owner/..", "owner"] {
        let err = adapter
            .default_branch(&Token::new(TOKEN), repo)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRepo { provider: Provider::GitHub, .. }));

        let err = adapter
            .branches(&Token::new(TOKEN), repo)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRepo { provider: Provider::GitHub, .. }));
    }

    assert!(hits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_github_enterprise_base_path_is_kept() {
    let hits: Arc<Mutex<Vec<String>>> = Arc::default();
    let recorded = hits.clone();
    let router = Router::new().fallback(move |uri: axum::http::Uri| {
        let recorded = recorded.clone();
        async move {
            recorded.lock().unwrap().push(uri.path().to_string());
            Json(json!({"default_branch": "main"}))
        }
    });
    let base = spawn(router).await;
    let adapter = GitHubAdapter::new(reqwest::Client::new(), format!("{base}/api/v3"), 30, 1);

    let branch = adapter
        .default_branch(&Token::new(TOKEN), "owner/repo")
        .await
        .unwrap();
    assert_eq!(branch, "main");
    assert_eq!(hits.lock().unwrap().as_slice(), ["/api/v3/repos/owner/repo"]);
}

// ─── Fake GitLab ─────────────────────────────────────────

fn fake_gitlab(seen: Seen) -> Router {
    Router::new()
        .route(
            "/api/v4/projects",
            get(
                |State(seen): State<Seen>,
                 headers: HeaderMap,
                 Query(q): Query<HashMap<String, String>>| async move {
                    if !authorized(&headers) {
                        return unauthorized();
                    }
                    seen.queries.lock().unwrap().push(q);
                    (
                        StatusCode::OK,
                        Json(json!([
                            {"id": 7, "path": "proj", "path_with_namespace": "group/proj",
                             "description": "Group project", "web_url": "https://gitlab.com/group/proj",
                             "default_branch": "main"},
                            {"id": 8, "path": "other", "path_with_namespace": "group/other",
                             "description": null, "web_url": null}
                        ])),
                    )
                },
            ),
        )
        .route(
            "/api/v4/projects/{id}",
            get(|headers: HeaderMap, Path(id): Path<String>| async move {
                if !authorized(&headers) {
                    return unauthorized();
                }
                (
                    StatusCode::OK,
                    Json(json!({"id": 7, "path": "proj", "path_with_namespace": id,
                                "default_branch": "develop"})),
                )
            }),
        )
        .route(
            "/api/v4/projects/{id}/repository/branches",
            get(|headers: HeaderMap, Path(id): Path<String>| async move {
                if !authorized(&headers) {
                    return unauthorized();
                }
                if id != "group/sub/proj" {
                    return (StatusCode::NOT_FOUND, Json(json!({"message": "404 Project Not Found"})));
                }
                (
                    StatusCode::OK,
                    Json(json!([
                        {"name": "develop", "default": true, "commit": {"id": "abc"}},
                        {"name": "release/1.0", "default": false, "commit": {"id": "def"}}
                    ])),
                )
            }),
        )
        .with_state(seen)
}

fn gitlab_adapter(base: &str) -> GitLabAdapter {
    GitLabAdapter::new(reqwest::Client::new(), format!("{base}/api/v4"), 20, 10)
}

#[tokio::test]
async fn test_gitlab_search_passes_query_and_maps_projects() {
    let seen = Seen::default();
    let base = spawn(fake_gitlab(seen.clone())).await;
    let adapter = gitlab_adapter(&base);

    let results = adapter
        .search(&Token::new(TOKEN), "group/pr oj")
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "proj");
    assert_eq!(results[0].full_name, "group/proj");
    assert_eq!(results[0].homepage, "https://gitlab.com/group/proj");
    assert_eq!(results[1].description, "");

    let queries = seen.queries.lock().unwrap();
    assert_eq!(queries[0]["search"], "group/pr oj");
    assert_eq!(queries[0]["membership"], "true");
    assert_eq!(queries[0]["per_page"], "20");
}

#[tokio::test]
async fn test_gitlab_default_branch_uses_encoded_project_path() {
    let base = spawn(fake_gitlab(Seen::default())).await;
    let adapter = gitlab_adapter(&base);

    let branch = adapter
        .default_branch(&Token::new(TOKEN), "group/sub/proj")
        .await
        .unwrap();
    assert_eq!(branch, "develop");
}

#[tokio::test]
async fn test_gitlab_branches_are_plain_names() {
    let base = spawn(fake_gitlab(Seen::default())).await;
    let adapter = gitlab_adapter(&base);

    let branches = adapter
        .branches(&Token::new(TOKEN), "group/sub/proj")
        .await
        .unwrap();
    assert_eq!(branches, vec!["develop", "release/1.0"]);
}

#[tokio::test]
async fn test_gitlab_unknown_project_is_status_error() {
    let base = spawn(fake_gitlab(Seen::default())).await;
    let adapter = gitlab_adapter(&base);

    let err = adapter
        .branches(&Token::new(TOKEN), "nobody/nothing")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Status { provider: Provider::GitLab, status, .. }
            if status == reqwest::StatusCode::NOT_FOUND
    ));
}
