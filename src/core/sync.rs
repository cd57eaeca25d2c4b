use crate::config::SyncConfig;
use crate::core::rules::{compile_rules, firewall_name, FIREWALL_NAME_PREFIX};
use crate::domain::model::SyncReport;
use crate::domain::ports::{FirewallApi, RangeSource};
use crate::utils::error::Result;
use chrono::Utc;

/// Runs fetch -> compile -> rename -> set_rules once.
///
/// The firewall is renamed before its rules are replaced. If the rule
/// replacement then fails, the firewall keeps the new name together with its
/// previous rules; nothing is rolled back.
pub struct FirewallSync<R: RangeSource, F: FirewallApi> {
    ranges: R,
    firewall: F,
    config: SyncConfig,
}

impl<R: RangeSource, F: FirewallApi> FirewallSync<R, F> {
    pub fn new(ranges: R, firewall: F, config: SyncConfig) -> Self {
        Self {
            ranges,
            firewall,
            config,
        }
    }

    pub async fn run(&self) -> Result<SyncReport> {
        let config = &self.config;
        tracing::info!("Starting firewall update for ID: {}", config.firewall_id);
        tracing::info!("Ports: {}", config.ports.join(","));

        // 兩個清單都必須成功才會繼續
        tracing::info!("Fetching Cloudflare IP ranges...");
        let (ipv4, ipv6) = tokio::try_join!(
            self.ranges.fetch_ranges(&config.endpoints.ipv4_url),
            self.ranges.fetch_ranges(&config.endpoints.ipv6_url),
        )?;
        tracing::info!(
            "Found {} IPv4 ranges and {} IPv6 ranges",
            ipv4.len(),
            ipv6.len()
        );

        let (ipv4_count, ipv6_count) = (ipv4.len(), ipv6.len());
        let rules = compile_rules(&[ipv4, ipv6], &config.ports);
        tracing::info!("Created {} firewall rules", rules.len());

        let name = firewall_name(FIREWALL_NAME_PREFIX, Utc::now());
        tracing::info!("Updating firewall name...");
        self.firewall.rename(&config.firewall_id, &name).await?;
        tracing::debug!("Firewall renamed to {:?}", name);

        tracing::info!("Applying firewall rules...");
        let action = self
            .firewall
            .set_rules(&config.firewall_id, &rules)
            .await?;
        tracing::info!("Firewall rules applied successfully");
        tracing::debug!("Provider action: {}", action);

        Ok(SyncReport {
            firewall_name: name,
            ipv4_count,
            ipv6_count,
            rule_count: rules.len(),
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Endpoints, SyncConfig};
    use crate::domain::model::{AddressRange, FirewallRule};
    use crate::utils::error::SyncError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct MockRanges {
        lists: HashMap<String, Vec<AddressRange>>,
    }

    #[async_trait]
    impl RangeSource for MockRanges {
        async fn fetch_ranges(&self, url: &str) -> Result<Vec<AddressRange>> {
            self.lists
                .get(url)
                .cloned()
                .ok_or_else(|| SyncError::FetchError {
                    url: url.to_string(),
                    reason: "HTTP 500 Internal Server Error".to_string(),
                })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Rename(String, String),
        SetRules(String, Vec<FirewallRule>),
    }

    #[derive(Clone, Default)]
    struct MockFirewall {
        calls: Arc<Mutex<Vec<Call>>>,
        fail_rename: bool,
        fail_set_rules: bool,
    }

    impl MockFirewall {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FirewallApi for MockFirewall {
        async fn rename(&self, firewall_id: &str, name: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Rename(firewall_id.to_string(), name.to_string()));
            if self.fail_rename {
                return Err(SyncError::RenameError {
                    status: 404,
                    body: "not_found".to_string(),
                });
            }
            Ok(())
        }

        async fn set_rules(
            &self,
            firewall_id: &str,
            rules: &[FirewallRule],
        ) -> Result<serde_json::Value> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::SetRules(firewall_id.to_string(), rules.to_vec()));
            if self.fail_set_rules {
                return Err(SyncError::ApplyRulesError {
                    status: 400,
                    body: "invalid_input".to_string(),
                });
            }
            Ok(serde_json::json!({ "actions": [{ "id": 13, "command": "set_firewall_rules" }] }))
        }
    }

    fn config() -> SyncConfig {
        SyncConfig {
            api_token: "token".to_string(),
            ports: vec!["80".to_string(), "443".to_string()],
            firewall_id: "4711".to_string(),
            endpoints: Endpoints {
                ipv4_url: "v4".to_string(),
                ipv6_url: "v6".to_string(),
                api_base: "http://unused".to_string(),
            },
            request_timeout_secs: 30,
        }
    }

    fn ranges() -> MockRanges {
        let mut lists = HashMap::new();
        lists.insert("v4".to_string(), vec!["10.0.0.0/8".to_string()]);
        lists.insert("v6".to_string(), vec!["2400:cb00::/32".to_string()]);
        MockRanges { lists }
    }

    #[tokio::test]
    async fn test_run_renames_then_sets_rules() {
        let firewall = MockFirewall::default();
        let sync = FirewallSync::new(ranges(), firewall.clone(), config());

        let report = sync.run().await.unwrap();

        assert_eq!(report.ipv4_count, 1);
        assert_eq!(report.ipv6_count, 1);
        assert_eq!(report.rule_count, 2);
        assert!(report.firewall_name.starts_with("Cloudflare "));
        assert_eq!(report.action["actions"][0]["id"], 13);

        let calls = firewall.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            Call::Rename("4711".to_string(), report.firewall_name.clone())
        );
        match &calls[1] {
            Call::SetRules(id, rules) => {
                assert_eq!(id, "4711");
                assert_eq!(rules.len(), 2);
                assert_eq!(rules[0].source_ips, vec!["10.0.0.0/8", "2400:cb00::/32"]);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_never_touches_firewall() {
        let mut source = ranges();
        source.lists.remove("v6");
        let firewall = MockFirewall::default();
        let sync = FirewallSync::new(source, firewall.clone(), config());

        let err = sync.run().await.unwrap_err();

        assert!(matches!(err, SyncError::FetchError { ref url, .. } if url == "v6"));
        assert!(firewall.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rename_failure_skips_rules() {
        let firewall = MockFirewall {
            fail_rename: true,
            ..Default::default()
        };
        let sync = FirewallSync::new(ranges(), firewall.clone(), config());

        let err = sync.run().await.unwrap_err();

        assert!(matches!(err, SyncError::RenameError { status: 404, .. }));
        assert_eq!(firewall.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_set_rules_failure_is_not_retried() {
        let firewall = MockFirewall {
            fail_set_rules: true,
            ..Default::default()
        };
        let sync = FirewallSync::new(ranges(), firewall.clone(), config());

        let err = sync.run().await.unwrap_err();

        assert!(err.firewall_modified());
        let calls = firewall.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], Call::Rename(..)));
        assert!(matches!(calls[1], Call::SetRules(..)));
    }
}
