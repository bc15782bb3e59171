//! # repo-typeahead
//!
//! Repository and branch typeahead for users signed in with GitHub or GitLab.
//! One HTTP contract covers both providers; the differences in query syntax,
//! response shape and error conventions are absorbed here.
//!
//! ## Request flow
//!
//! ```text
//!   GET /api/typeahead/repos?repo=..        GET /api/typeahead/branches?repo=..
//!                 │                                      │
//!                 └──────────────┬───────────────────────┘
//!                                ▼
//!                     ┌─────────────────────┐
//!                     │  Caller (provider,  │
//!                     │  bearer token)      │
//!                     └──────────┬──────────┘
//!                                ▼
//!                     ┌─────────────────────┐
//!                     │  TypeaheadService   │── normalize(provider, query)
//!                     └──────────┬──────────┘
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!            ┌──────────────┐        ┌──────────────┐
//!            │ GitHubAdapter│        │ GitLabAdapter│
//!            └──────┬───────┘        └──────┬───────┘
//!                   └───────────┬───────────┘
//!                               ▼
//!                   JSON body + CachePolicy headers
//! ```
//!
//! Every failure reaches the client as a bare 404; details are logged.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration: bind address, run mode, provider API URLs
//! - [`models`] - `Provider`, `Token`, `Caller`, `RepositoryMatch`, `BranchListing`
//! - [`error`] - `TypeaheadError` / `ProviderError` and the uniform 404 mapping
//! - [`normalize`] - Provider-specific query rewriting (`owner/name` → `name+user:owner`)
//! - [`providers`] - The `ProviderAdapter` trait with GitHub and GitLab REST implementations
//! - [`service`] - Search and branch lookup orchestration
//! - [`cache`] - Whether and how responses are marked cacheable
//! - [`api`] - Axum handlers and the caller-identity extractor
//! - [`digest`] - Digest email assembly on top of pluggable renderer and sender
//! - [`state`] - Shared application state

pub mod api;
pub mod cache;
pub mod config;
pub mod digest;
pub mod error;
pub mod models;
pub mod normalize;
pub mod providers;
pub mod service;
pub mod state;
