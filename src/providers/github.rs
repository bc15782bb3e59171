use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use super::{endpoint, get_json, ProviderAdapter, BRANCH_PAGE_SIZE};
use crate::error::ProviderError;
use crate::models::{Provider, RepositoryMatch, Token};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// GitHub REST v3 adapter.
pub struct GitHubAdapter {
    client: reqwest::Client,
    api_url: String,
    search_page_size: usize,
    max_branch_pages: usize,
}

impl GitHubAdapter {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        search_page_size: usize,
        max_branch_pages: usize,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            search_page_size,
            max_branch_pages,
        }
    }

    /// `owner/name` as URL path segments. Anything else is rejected before a
    /// request is built, since dot segments would escape the API base path.
    fn repo_path(repo_full_name: &str) -> Result<String, ProviderError> {
        match repo_full_name.split_once('/') {
            Some((owner, name)) if is_plain_segment(owner) && is_plain_segment(name) => Ok(
                format!("{}/{}", urlencoding::encode(owner), urlencoding::encode(name)),
            ),
            _ => Err(ProviderError::InvalidRepo {
                provider: Provider::GitHub,
                repo: repo_full_name.to_string(),
            }),
        }
    }

    fn get(&self, url: url::Url) -> reqwest::RequestBuilder {
        self.client.get(url).header(ACCEPT, GITHUB_MEDIA_TYPE)
    }
}

// ─── Wire types ─────────────────────────────────────────

#[derive(Deserialize)]
struct SearchResponse {
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    name: String,
    full_name: String,
    description: Option<String>,
    homepage: Option<String>,
}

#[derive(Deserialize)]
struct RepoResponse {
    default_branch: String,
}

#[derive(Deserialize)]
struct BranchItem {
    name: String,
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains('/')
}

/// Percent-encode each `+`-separated term, keeping `+` as the term separator.
fn encode_search_terms(query: &str) -> String {
    query
        .split('+')
        .map(|term| urlencoding::encode(term).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

#[async_trait]
impl ProviderAdapter for GitHubAdapter {
    fn provider(&self) -> Provider {
        Provider::GitHub
    }

    async fn search(
        &self,
        token: &Token,
        query: &str,
    ) -> Result<Vec<RepositoryMatch>, ProviderError> {
        let mut url = endpoint(Provider::GitHub, &self.api_url, "search/repositories")?;
        url.set_query(Some(&format!(
            "q={}&per_page={}",
            encode_search_terms(query),
            self.search_page_size
        )));

        let body: SearchResponse = get_json(Provider::GitHub, self.get(url), token).await?;
        Ok(body
            .items
            .into_iter()
            .map(|item| RepositoryMatch {
                name: item.name,
                full_name: item.full_name,
                description: item.description.unwrap_or_default(),
                homepage: item.homepage.unwrap_or_default(),
            })
            .collect())
    }

    async fn default_branch(
        &self,
        token: &Token,
        repo_full_name: &str,
    ) -> Result<String, ProviderError> {
        let path = format!("repos/{}", Self::repo_path(repo_full_name)?);
        let url = endpoint(Provider::GitHub, &self.api_url, &path)?;
        let repo: RepoResponse = get_json(Provider::GitHub, self.get(url), token).await?;
        Ok(repo.default_branch)
    }

    /// GitHub lists the default branch among the others.
    async fn branches(
        &self,
        token: &Token,
        repo_full_name: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let path = format!("repos/{}/branches", Self::repo_path(repo_full_name)?);
        let mut names = Vec::new();

        for page in 1..=self.max_branch_pages {
            let mut url = endpoint(Provider::GitHub, &self.api_url, &path)?;
            url.set_query(Some(&format!("per_page={BRANCH_PAGE_SIZE}&page={page}")));

            let items: Vec<BranchItem> = get_json(Provider::GitHub, self.get(url), token).await?;
            let fetched = items.len();
            names.extend(items.into_iter().map(|b| b.name));
            if fetched < BRANCH_PAGE_SIZE {
                break;
            }
        }

        Ok(names)
    }
}
