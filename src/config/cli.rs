use crate::config::SyncConfig;
use crate::utils::error::{Result, SyncError};
use clap::Parser;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "cf-firewall-sync")]
#[command(about = "Restrict a Hetzner Cloud firewall to Cloudflare's published IP ranges")]
#[command(version)]
pub struct CliConfig {
    /// Hetzner Cloud API token
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Comma-separated TCP ports to open, e.g. 80,443
    #[arg(long, env = "PORTS")]
    pub ports: Option<String>,

    /// Firewall ID as shown in the Hetzner console
    #[arg(long, env = "FIREWALL_ID")]
    pub firewall_id: Option<String>,

    #[arg(long, env = "CLOUDFLARE_IPV4_URL")]
    pub ipv4_url: Option<String>,

    #[arg(long, env = "CLOUDFLARE_IPV6_URL")]
    pub ipv6_url: Option<String>,

    #[arg(long, env = "HETZNER_API_BASE")]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    /// Env file to read; defaults to ./.env when present
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Flag values, then process environment, then the env file.
    pub fn to_sync_config(&self) -> Result<SyncConfig> {
        let file_vars = self.load_env_file()?;
        self.resolve(|key| std::env::var(key).ok().or_else(|| file_vars.get(key).cloned()))
    }

    pub fn resolve<F>(&self, fallback: F) -> Result<SyncConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        SyncConfig::from_lookup(|key| self.flag_value(key).or_else(|| fallback(key)))
    }

    fn flag_value(&self, key: &str) -> Option<String> {
        match key {
            "API_TOKEN" => self.api_token.clone(),
            "PORTS" => self.ports.clone(),
            "FIREWALL_ID" => self.firewall_id.clone(),
            "CLOUDFLARE_IPV4_URL" => self.ipv4_url.clone(),
            "CLOUDFLARE_IPV6_URL" => self.ipv6_url.clone(),
            "HETZNER_API_BASE" => self.api_base.clone(),
            "REQUEST_TIMEOUT_SECS" => self.timeout.map(|t| t.to_string()),
            _ => None,
        }
    }

    fn load_env_file(&self) -> Result<HashMap<String, String>> {
        match &self.env_file {
            Some(path) => read_env_file(path),
            None => {
                let default = Path::new(".env");
                if default.exists() {
                    read_env_file(default)
                } else {
                    Ok(HashMap::new())
                }
            }
        }
    }
}

/// Parses `KEY=value` lines without touching the process environment.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    tracing::debug!("Reading env file {}", path.display());
    dotenvy::from_path_iter(path)?
        .map(|item| item.map_err(SyncError::from))
        .collect()
}
