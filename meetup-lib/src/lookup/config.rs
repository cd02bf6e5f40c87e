use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_SHORTLINK_BASE: &str = "https://cmpf.re";
pub const DEFAULT_GRAPHQL_URL: &str = "https://niantic-social-api.nianticlabs.com/graphql";

/// Large enough to fetch every member of a meetup in one page.
pub const DEFAULT_MEMBERS_PAGE_SIZE: i64 = 10_000_000;

/// Endpoints and request settings of the remote event lookup.
///
/// Both bases can point at a proxy; the short link path is appended to
/// `shortlink_base` unchanged.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LookupConfig {
    pub shortlink_base: String,
    pub graphql_url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub members_page_size: i64,
    pub timeout_secs: u64,
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            shortlink_base: DEFAULT_SHORTLINK_BASE.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            user_agent: concat!("campfire-lottery/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            members_page_size: DEFAULT_MEMBERS_PAGE_SIZE,
            timeout_secs: 30,
        }
    }
}
