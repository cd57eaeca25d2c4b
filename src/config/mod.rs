#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;

use crate::adapters::cloudflare::{CLOUDFLARE_IPV4_URL, CLOUDFLARE_IPV6_URL};
use crate::adapters::hetzner::HETZNER_API_BASE;
use crate::core::rules::split_ports;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{validate_range, validate_required_field, validate_url, Validate};
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoints {
    pub ipv4_url: String,
    pub ipv6_url: String,
    pub api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ipv4_url: CLOUDFLARE_IPV4_URL.to_string(),
            ipv6_url: CLOUDFLARE_IPV6_URL.to_string(),
            api_base: HETZNER_API_BASE.to_string(),
        }
    }
}

/// Everything one sync run needs, resolved once at the process boundary.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SyncConfig {
    #[serde(skip)]
    pub api_token: String,
    pub ports: Vec<String>,
    pub firewall_id: String,
    pub endpoints: Endpoints,
    pub request_timeout_secs: u64,
}

// 不要把 token 印到日誌裡
impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("api_token", &"***")
            .field("ports", &self.ports)
            .field("firewall_id", &self.firewall_id)
            .field("endpoints", &self.endpoints)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl SyncConfig {
    /// Resolves configuration from a key lookup such as the process environment.
    ///
    /// Required keys are checked in the order `API_TOKEN`, `PORTS`,
    /// `FIREWALL_ID`; the first one missing or empty is reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = validate_required_field("API_TOKEN", lookup("API_TOKEN"))?;
        let ports = validate_required_field("PORTS", lookup("PORTS"))?;
        let firewall_id = validate_required_field("FIREWALL_ID", lookup("FIREWALL_ID"))?;

        let defaults = Endpoints::default();
        let endpoints = Endpoints {
            ipv4_url: non_empty(lookup("CLOUDFLARE_IPV4_URL")).unwrap_or(defaults.ipv4_url),
            ipv6_url: non_empty(lookup("CLOUDFLARE_IPV6_URL")).unwrap_or(defaults.ipv6_url),
            api_base: non_empty(lookup("HETZNER_API_BASE")).unwrap_or(defaults.api_base),
        };

        let request_timeout_secs = match non_empty(lookup("REQUEST_TIMEOUT_SECS")) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| SyncError::InvalidConfigValueError {
                    field: "REQUEST_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                    reason: "Expected a whole number of seconds".to_string(),
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            api_token,
            ports: split_ports(&ports),
            firewall_id,
            endpoints,
            request_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validate_url("CLOUDFLARE_IPV4_URL", &self.endpoints.ipv4_url)?;
        validate_url("CLOUDFLARE_IPV6_URL", &self.endpoints.ipv6_url)?;
        validate_url("HETZNER_API_BASE", &self.endpoints.api_base)?;
        validate_range("REQUEST_TIMEOUT_SECS", self.request_timeout_secs, 1, 300)?;

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
