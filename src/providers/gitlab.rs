use async_trait::async_trait;
use serde::Deserialize;

use super::{endpoint, get_json, ProviderAdapter, BRANCH_PAGE_SIZE};
use crate::error::ProviderError;
use crate::models::{Provider, RepositoryMatch, Token};

/// GitLab REST v4 adapter. `api_url` includes the `/api/v4` prefix.
pub struct GitLabAdapter {
    client: reqwest::Client,
    api_url: String,
    search_page_size: usize,
    max_branch_pages: usize,
}

impl GitLabAdapter {
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

    /// GitLab addresses a project by its URL-encoded `namespace/path`.
    fn project_path(repo_full_name: &str) -> String {
        format!("projects/{}", urlencoding::encode(repo_full_name))
    }
}

#[derive(Deserialize)]
struct Project {
    path: String,
    path_with_namespace: String,
    description: Option<String>,
    web_url: Option<String>,
    default_branch: Option<String>,
}

#[derive(Deserialize)]
struct BranchItem {
    name: String,
}

#[async_trait]
impl ProviderAdapter for GitLabAdapter {
    fn provider(&self) -> Provider {
        Provider::GitLab
    }

    async fn search(
        &self,
        token: &Token,
        query: &str,
    ) -> Result<Vec<RepositoryMatch>, ProviderError> {
        let mut url = endpoint(Provider::GitLab, &self.api_url, "projects")?;
        url.set_query(Some(&format!(
            "search={}&membership=true&simple=true&per_page={}",
            urlencoding::encode(query),
            self.search_page_size
        )));

        let projects: Vec<Project> =
            get_json(Provider::GitLab, self.client.get(url), token).await?;
        Ok(projects
            .into_iter()
            .map(|p| RepositoryMatch {
                name: p.path,
                full_name: p.path_with_namespace,
                description: p.description.unwrap_or_default(),
                homepage: p.web_url.unwrap_or_default(),
            })
            .collect())
    }

    /// Empty projects have no default branch; that surfaces as an empty name.
    async fn default_branch(
        &self,
        token: &Token,
        repo_full_name: &str,
    ) -> Result<String, ProviderError> {
        let url = endpoint(Provider::GitLab, &self.api_url, &Self::project_path(repo_full_name))?;
        let project: Project = get_json(Provider::GitLab, self.client.get(url), token).await?;
        Ok(project.default_branch.unwrap_or_default())
    }

    /// Branch objects are reduced to their names here; callers never see refs.
    async fn branches(
        &self,
        token: &Token,
        repo_full_name: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let path = format!("{}/repository/branches", Self::project_path(repo_full_name));
        let mut names = Vec::new();

        for page in 1..=self.max_branch_pages {
            let mut url = endpoint(Provider::GitLab, &self.api_url, &path)?;
            url.set_query(Some(&format!("per_page={BRANCH_PAGE_SIZE}&page={page}")));

            let items: Vec<BranchItem> =
                get_json(Provider::GitLab, self.client.get(url), token).await?;
            let fetched = items.len();
            names.extend(items.into_iter().map(|b| b.name));
            if fetched < BRANCH_PAGE_SIZE {
                break;
            }
        }

        Ok(names)
    }
}
