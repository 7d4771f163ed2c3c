use std::time::Duration;

/// Root of the public ONS dataset API.
pub const DEFAULT_BASE_URL: &str = "https://api.beta.ons.gov.uk/v1";

/// Edition queried when a dataset publishes several.
pub const DEFAULT_EDITION: &str = "time-series";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base API URL, without trailing slash.
    pub base_url: String,
    /// Edition whose latest version is queried; falls back to the dataset's latest version.
    pub preferred_edition: String,
    /// `limit` sent with every paged listing (datasets, editions, dimensions, options).
    pub page_size: u32,
    /// Total request timeout of the HTTP transport.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            preferred_edition: DEFAULT_EDITION.into(),
            page_size: 100,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.preferred_edition = edition.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
