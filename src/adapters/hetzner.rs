//! Hetzner Cloud firewall API client.
//!
//! Only the two calls a sync run needs: renaming a firewall and replacing its
//! rule set through the `set_rules` action.

use crate::domain::model::FirewallRule;
use crate::domain::ports::FirewallApi;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

pub const HETZNER_API_BASE: &str = "https://api.hetzner.cloud/v1";

#[derive(Debug, Serialize)]
struct RenameRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct SetRulesRequest<'a> {
    rules: &'a [FirewallRule],
}

pub struct HetznerClient {
    client: Client,
    api_base: String,
    api_token: String,
}

impl HetznerClient {
    pub fn new(api_base: &str, api_token: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cf-firewall-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    fn firewall_url(&self, firewall_id: &str) -> String {
        format!("{}/firewalls/{}", self.api_base, firewall_id)
    }
}

/// Body of a rejected call. A body that cannot be read is reported in its place.
async fn error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Could not read error response body: {}", e);
            format!("<unreadable response body: {}>", e)
        }
    }
}

#[async_trait]
impl FirewallApi for HetznerClient {
    async fn rename(&self, firewall_id: &str, name: &str) -> Result<()> {
        let url = self.firewall_url(firewall_id);
        tracing::debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&RenameRequest { name })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = error_body(response).await;
            tracing::error!("Failed to update firewall name: {}", body);
            return Err(SyncError::RenameError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    async fn set_rules(
        &self,
        firewall_id: &str,
        rules: &[FirewallRule],
    ) -> Result<serde_json::Value> {
        let url = format!("{}/actions/set_rules", self.firewall_url(firewall_id));
        tracing::debug!("POST {} ({} rules)", url, rules.len());

        // 改名已經成功，從這裡開始的失敗都不能當成防火牆未變動
        let unconfirmed = |reason: String| SyncError::ApplyRulesUnconfirmedError { reason };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&SetRulesRequest { rules })
            .send()
            .await
            .map_err(|e| unconfirmed(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = error_body(response).await;
            tracing::error!("Failed to apply firewall rules: {}", body);
            return Err(SyncError::ApplyRulesError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| unconfirmed(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            unconfirmed(format!("HTTP {} with a body that is not JSON ({}): {}", status, e, body))
        })
    }
}
