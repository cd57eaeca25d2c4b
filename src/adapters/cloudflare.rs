use crate::domain::model::AddressRange;
use crate::domain::ports::RangeSource;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const CLOUDFLARE_IPV4_URL: &str = "https://www.cloudflare.com/ips-v4/";
pub const CLOUDFLARE_IPV6_URL: &str = "https://www.cloudflare.com/ips-v6/";

/// Fetches plain-text range lists (one CIDR per line) over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRangeSource {
    client: Client,
}

impl HttpRangeSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cf-firewall-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RangeSource for HttpRangeSource {
    async fn fetch_ranges(&self, url: &str) -> Result<Vec<AddressRange>> {
        tracing::debug!("Making range request to: {}", url);

        let fetch_error = |reason: String| SyncError::FetchError {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        tracing::debug!("Range response status: {}", response.status());

        if response.status() != StatusCode::OK {
            return Err(fetch_error(format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        Ok(parse_range_list(&body))
    }
}

/// One range per line; `\n` and `\r\n` both work, blank lines are dropped.
pub fn parse_range_list(body: &str) -> Vec<AddressRange> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
