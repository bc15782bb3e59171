use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::cache::CachePolicy;
use crate::config::Config;
use crate::providers::{GitHubAdapter, GitLabAdapter, ProviderAdapter};
use crate::service::TypeaheadService;

/// Shared application state. Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub typeahead: TypeaheadService,
    pub cache: CachePolicy,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
            .timeout(Duration::from_secs(config.http.request_timeout_secs))
            .user_agent(config.http.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        let github = GitHubAdapter::new(
            http_client.clone(),
            config.github.api_url.clone(),
            config.search_page_size,
            config.max_branch_pages,
        );
        let gitlab = GitLabAdapter::new(
            http_client,
            config.gitlab.api_url.clone(),
            config.search_page_size,
            config.max_branch_pages,
        );

        Ok(Self::with_adapters(config, Arc::new(github), Arc::new(gitlab)))
    }

    /// Build state around explicit adapters.
    pub fn with_adapters(
        config: Config,
        github: Arc<dyn ProviderAdapter>,
        gitlab: Arc<dyn ProviderAdapter>,
    ) -> Self {
        Self {
            typeahead: TypeaheadService::new(github, gitlab),
            cache: CachePolicy::new(config.run_mode),
        }
    }
}
