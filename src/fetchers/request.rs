use super::{DocumentSource, Page};
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; GenawSearch/1.0)";

/// Fetches pages over HTTP.
pub struct HttpDocumentSource {
    client: Client,
}

impl HttpDocumentSource {
    pub fn new(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()?;

        Ok(Self { client })
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::new(
            Some(Duration::from_secs(config.timeout)),
            Some(config.user_agent.as_str()),
        )
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, url: &str) -> Result<Page> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(SearchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        // location follows redirects, like the address a browser would show
        let location = response.url().to_string();
        let markup = response.text().await?;
        debug!("Fetched {} ({} bytes)", location, markup.len());

        Ok(Page::new(location, markup))
    }
}
