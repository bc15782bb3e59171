use serde::{Deserialize, Serialize};

/// Deployment environment. Development disables response caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Development,
    Production,
}

impl From<&str> for RunMode {
    /// `dev` / `development` select development; anything else is production.
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => RunMode::Development,
            _ => RunMode::Production,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    pub run_mode: RunMode,
    /// Scheme prefix of the public site, e.g. "https://"
    pub server_proto: String,
    /// Host (and optional port) of the public site
    pub server_host: String,
    pub github: ProviderEndpoint,
    pub gitlab: ProviderEndpoint,
    pub http: HttpConfig,
    /// Repositories requested per search call (capped at 100)
    pub search_page_size: usize,
    /// Upper bound on pages fetched when listing branches
    pub max_branch_pages: usize,
}

/// Where a provider's REST API lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEndpoint {
    /// Base URL of the REST API, without trailing path components
    pub api_url: String,
}

/// Outbound HTTP transport settings shared by all provider adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9000".to_string(),
            run_mode: RunMode::Development,
            server_proto: "http://".to_string(),
            server_host: "localhost:9000".to_string(),
            github: ProviderEndpoint {
                api_url: "https://api.github.com".to_string(),
            },
            gitlab: ProviderEndpoint {
                api_url: "https://gitlab.com/api/v4".to_string(),
            },
            http: HttpConfig::default(),
            search_page_size: 30,
            max_branch_pages: 10,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            user_agent: concat!("repo-typeahead/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("REPO_TYPEAHEAD_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(mode) = std::env::var("REPO_TYPEAHEAD_RUN_MODE") {
            config.run_mode = RunMode::from(mode.as_str());
        }
        if let Ok(proto) = std::env::var("REPO_TYPEAHEAD_SERVER_PROTO") {
            config.server_proto = proto;
        }
        if let Ok(host) = std::env::var("REPO_TYPEAHEAD_SERVER_HOST") {
            config.server_host = host;
        }
        if let Ok(url) = std::env::var("GITHUB_API_URL") {
            config.github.api_url = url;
        }
        if let Ok(url) = std::env::var("GITLAB_API_URL") {
            config.gitlab.api_url = url;
        }
        if let Ok(val) = std::env::var("REPO_TYPEAHEAD_CONNECT_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.http.connect_timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("REPO_TYPEAHEAD_REQUEST_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.http.request_timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("REPO_TYPEAHEAD_SEARCH_PAGE_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.search_page_size = v.clamp(1, 100);
            }
        }
        if let Ok(val) = std::env::var("REPO_TYPEAHEAD_MAX_BRANCH_PAGES") {
            if let Ok(v) = val.parse::<usize>() {
                config.max_branch_pages = v.max(1);
            }
        }

        config
    }

    /// Public site root used in outgoing mail, e.g. "https://gitnotify.com".
    pub fn website_url(&self) -> String {
        format!("{}{}", self.server_proto, self.server_host)
    }
}
