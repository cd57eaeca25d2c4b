use crate::domain::model::{AddressRange, FirewallRule};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where published address ranges come from.
#[async_trait]
pub trait RangeSource: Send + Sync {
    async fn fetch_ranges(&self, url: &str) -> Result<Vec<AddressRange>>;
}

/// The two firewall operations a sync run needs.
#[async_trait]
pub trait FirewallApi: Send + Sync {
    async fn rename(&self, firewall_id: &str, name: &str) -> Result<()>;

    /// Replaces the whole rule set. Returns the provider's action payload.
    async fn set_rules(
        &self,
        firewall_id: &str,
        rules: &[FirewallRule],
    ) -> Result<serde_json::Value>;
}
