use serde::{Deserialize, Serialize};

/// CIDR text exactly as published by the CDN. Never parsed.
pub type AddressRange = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
}

/// One inbound-allow entry in the shape the Hetzner `set_rules` action expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub direction: Direction,
    pub source_ips: Vec<AddressRange>,
    pub protocol: Protocol,
    pub port: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub firewall_name: String,
    pub ipv4_count: usize,
    pub ipv6_count: usize,
    pub rule_count: usize,
    /// Action descriptor returned by the provider.
    pub action: serde_json::Value,
}
