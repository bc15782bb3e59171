//! Provider-agnostic typeahead operations.

use std::sync::Arc;

use crate::error::TypeaheadError;
use crate::models::{BranchListing, Caller, Provider, RepositoryMatch};
use crate::normalize::normalize;
use crate::providers::ProviderAdapter;

/// Routes typeahead requests to the adapter of the caller's provider.
#[derive(Clone)]
pub struct TypeaheadService {
    github: Arc<dyn ProviderAdapter>,
    gitlab: Arc<dyn ProviderAdapter>,
}

impl TypeaheadService {
    /// Panics if an adapter is wired into the other provider's slot.
    pub fn new(github: Arc<dyn ProviderAdapter>, gitlab: Arc<dyn ProviderAdapter>) -> Self {
        assert_eq!(github.provider(), Provider::GitHub, "github adapter slot");
        assert_eq!(gitlab.provider(), Provider::GitLab, "gitlab adapter slot");
        Self { github, gitlab }
    }

    fn adapter(&self, provider: Provider) -> &dyn ProviderAdapter {
        match provider {
            Provider::GitHub => self.github.as_ref(),
            Provider::GitLab => self.gitlab.as_ref(),
        }
    }

    /// Search repositories matching `raw_query` on the caller's provider.
    ///
    /// Results are returned in upstream order, unfiltered.
    pub async fn search_repositories(
        &self,
        caller: &Caller,
        raw_query: &str,
    ) -> Result<Vec<RepositoryMatch>, TypeaheadError> {
        let provider: Provider = caller.provider.parse()?;
        let query = normalize(provider, raw_query);
        tracing::debug!("Searching {provider} repositories for {query:?}");

        let matches = self.adapter(provider).search(&caller.token, &query).await?;
        tracing::info!("{provider} search returned {} repositories", matches.len());
        Ok(matches)
    }

    /// Default branch plus all branch names of `repo_full_name`.
    ///
    /// Both lookups must succeed; the branch list is only fetched once the
    /// default branch is known.
    pub async fn branch_lookup(
        &self,
        caller: &Caller,
        repo_full_name: &str,
    ) -> Result<BranchListing, TypeaheadError> {
        if repo_full_name.is_empty() {
            return Err(TypeaheadError::InvalidArgument("repo"));
        }
        let provider: Provider = caller.provider.parse()?;
        let adapter = self.adapter(provider);

        let default_branch = adapter.default_branch(&caller.token, repo_full_name).await?;
        let branches = adapter.branches(&caller.token, repo_full_name).await?;
        tracing::info!(
            "{provider} repository {repo_full_name} has {} branches (default {default_branch})",
            branches.len()
        );

        Ok(BranchListing {
            default_branch,
            branches,
        })
    }
}
