use crate::config::SyncConfig;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::env;

/// Environment of the remotely triggered handler.
///
/// Unlike the CLI, missing sync settings are not fatal at startup; they are
/// reported per invocation so the HTTP caller gets a response.
#[derive(Clone, Default)]
pub struct TriggerEnv {
    vars: HashMap<String, String>,
}

impl TriggerEnv {
    pub fn from_env() -> Self {
        Self { vars: env::vars().collect() }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Shared secret for manual calls. Unset means manual calls are open.
    pub fn worker_secret(&self) -> Option<&str> {
        self.vars.get("WORKER_SECRET").map(String::as_str)
    }

    pub fn has_api_token(&self) -> bool {
        self.vars.get("API_TOKEN").is_some_and(|token| !token.is_empty())
    }

    pub fn sync_config(&self) -> Result<SyncConfig> {
        SyncConfig::from_lookup(|key| self.vars.get(key).cloned())
    }
}

impl std::fmt::Debug for TriggerEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.vars.keys().collect();
        keys.sort();
        f.debug_struct("TriggerEnv").field("keys", &keys).finish()
    }
}
