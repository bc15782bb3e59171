//! HTTP cache directives for typeahead responses.

use axum::http::header::{CACHE_CONTROL, EXPIRES, LAST_MODIFIED};
use axum::http::{HeaderMap, HeaderValue};
use chrono::{DateTime, Duration, Utc};

use crate::config::RunMode;
use crate::models::Provider;

/// How long a cacheable typeahead response stays fresh.
const CACHE_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// IMF-fixdate, the preferred HTTP-date format.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Whether responses for `provider` may be cached in `run_mode`.
///
/// GitLab results are never cached.
pub fn should_cache(provider: Provider, run_mode: RunMode) -> bool {
    run_mode != RunMode::Development && provider != Provider::GitLab
}

#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    run_mode: RunMode,
}

impl CachePolicy {
    pub fn new(run_mode: RunMode) -> Self {
        Self { run_mode }
    }

    pub fn should_cache(&self, provider: Provider) -> bool {
        should_cache(provider, self.run_mode)
    }

    /// Cache headers for a `provider` response, empty when caching does not apply.
    pub fn headers(&self, provider: Provider) -> HeaderMap {
        if self.should_cache(provider) {
            cache_headers(Utc::now())
        } else {
            HeaderMap::new()
        }
    }
}

/// Headers that let clients cache a response for one day starting at `now`.
pub fn cache_headers(now: DateTime<Utc>) -> HeaderMap {
    let until = now + Duration::seconds(CACHE_LIFETIME_SECS);
    let max_age = (until - now).num_seconds();

    let mut headers = HeaderMap::new();
    headers.insert(EXPIRES, http_date(until));
    headers.insert(LAST_MODIFIED, http_date(now));
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_str(&format!("max-age={max_age}, public"))
            .unwrap_or_else(|_| HeaderValue::from_static("no-cache")),
    );
    headers
}

fn http_date(at: DateTime<Utc>) -> HeaderValue {
    // The formatted date is plain ASCII
    HeaderValue::from_str(&at.format(HTTP_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("Thu, 01 Jan 1970 00:00:00 GMT"))
}
