//! Rewrites a typed query into the search syntax each provider expects.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Provider;

/// `owner/partial-name`, Unicode-letter aware. The name part may be empty.
static OWNER_REPO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\d_-]+/[\p{L}\d_.-]*").expect("owner/repo pattern is valid"));

/// Normalize `raw` for `provider`'s repository search endpoint.
pub fn normalize(provider: Provider, raw: &str) -> String {
    match provider {
        Provider::GitHub => normalize_github(raw),
        // GitLab's project search takes the query as typed
        Provider::GitLab => raw.to_string(),
    }
}

/// GitHub joins terms with `+` and filters by owner through `user:<owner>`.
/// Only the first `owner/name` occurrence is rewritten.
fn normalize_github(raw: &str) -> String {
    let query = raw.replace(' ', "+");
    if !query.contains('/') {
        return query;
    }

    let Some(found) = OWNER_REPO.find(&query) else {
        return query;
    };
    let Some((owner, fragment)) = found.as_str().split_once('/') else {
        return query;
    };

    format!(
        "{}{fragment}+user:{owner}{}",
        &query[..found.start()],
        &query[found.end()..]
    )
}
