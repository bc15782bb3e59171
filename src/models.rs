use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeaheadError;

/// A source-control hosting provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    GitHub,
    GitLab,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::GitHub => "github",
            Provider::GitLab => "gitlab",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = TypeaheadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "github" => Ok(Provider::GitHub),
            "gitlab" => Ok(Provider::GitLab),
            _ => Err(TypeaheadError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// Opaque access token of the calling user. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for building the upstream `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Identity resolved by the session layer for the current request
#[derive(Debug, Clone)]
pub struct Caller {
    /// Provider as recorded on the caller's account, not yet validated
    pub provider: String,
    pub token: Token,
}

impl Caller {
    pub fn new(provider: impl Into<String>, token: Token) -> Self {
        Self {
            provider: provider.into(),
            token,
        }
    }
}

/// A candidate repository returned by a provider search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryMatch {
    /// Short repository identifier
    pub name: String,
    /// Canonical `owner/name` path on the provider
    pub full_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub homepage: String,
}

/// Branches of a repository.
///
/// Whether `default_branch` also appears inside `branches` depends on the
/// provider; callers must not assume either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchListing {
    pub default_branch: String,
    pub branches: Vec<String>,
}
