// Adapters layer: concrete implementations of the domain ports over HTTP.

pub mod cloudflare;
pub mod hetzner;

pub use cloudflare::HttpRangeSource;
pub use hetzner::HetznerClient;

use crate::config::SyncConfig;
use crate::core::sync::FirewallSync;
use crate::utils::error::Result;

pub type HttpFirewallSync = FirewallSync<HttpRangeSource, HetznerClient>;

/// Wires the HTTP adapters into a sync run for `config`.
pub fn http_sync(config: SyncConfig) -> Result<HttpFirewallSync> {
    let timeout = config.request_timeout();
    let ranges = HttpRangeSource::new(timeout)?;
    let firewall = HetznerClient::new(&config.endpoints.api_base, config.api_token.clone(), timeout)?;
    Ok(FirewallSync::new(ranges, firewall, config))
}
