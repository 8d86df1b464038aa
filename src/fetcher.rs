use anyhow::{Context, Result};
use rand::Rng;
use std::future::Future;
use url::Url;

/// Browser user agents rotated across requests
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
];

/// Source of page HTML for the pager.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Picks the User-Agent header sent with each request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAgent {
    Rotate,
    Fixed(String),
}

impl UserAgent {
    pub fn pick(&self) -> &str {
        match self {
            UserAgent::Rotate => {
                let mut rng = rand::rng();
                USER_AGENTS[rng.random_range(0..USER_AGENTS.len())]
            }
            UserAgent::Fixed(agent) => agent.as_str(),
        }
    }
}

impl From<Option<String>> for UserAgent {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(agent) if !agent.trim().is_empty() => UserAgent::Fixed(agent),
            _ => UserAgent::Rotate,
        }
    }
}

/// Fetches pages over HTTP without connection reuse or a cookie store.
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: UserAgent,
}

impl HttpFetcher {
    pub fn new(user_agent: UserAgent) -> Result<Self> {
        // Each fetch opens its own connection; nothing carries over between pages.
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, user_agent })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let url = Url::parse(url).with_context(|| format!("Invalid page URL: {}", url))?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", self.user_agent.pick())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
            .context("Failed to fetch page")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        response.text().await.context("Failed to read response body")
    }
}
