use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, warn};

use crate::config::Config;

/// A single blocking GET. `Ok(None)` means the server answered with a non-success status.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Option<String>>;
}

pub struct HttpTransport {
    client: Client,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            user_agent: config.user_agent.clone(),
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Option<String>> {
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .with_context(|| format!("request failed: {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%url, %status, "page fetch returned non-success status");
            return Ok(None);
        }
        let body = resp.text().context("failed reading body")?;
        debug!(%url, bytes = body.len(), "page fetched");
        Ok(Some(body))
    }
}

pub fn http_client(config: &Config) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("failed to build http client")
}
