pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{http_sync, HetznerClient, HttpFirewallSync, HttpRangeSource};
pub use config::{lambda::TriggerEnv, Endpoints, SyncConfig};
pub use crate::core::{rules::compile_rules, sync::FirewallSync};
pub use domain::model::{Direction, FirewallRule, Protocol, SyncReport};
pub use utils::error::{Result, SyncError};
