use crate::domain::model::{AddressRange, Direction, FirewallRule, Protocol};
use chrono::{DateTime, SecondsFormat, Utc};

pub const FIREWALL_NAME_PREFIX: &str = "Cloudflare";

/// Builds one inbound TCP rule per port, each carrying every range from
/// every list in the order given.
///
/// Nothing is de-duplicated or validated here; malformed ports or ranges are
/// left for the provider to reject.
pub fn compile_rules(lists: &[Vec<AddressRange>], ports: &[String]) -> Vec<FirewallRule> {
    let source_ips: Vec<AddressRange> = lists.iter().flatten().cloned().collect();

    ports
        .iter()
        .map(|port| FirewallRule {
            direction: Direction::In,
            source_ips: source_ips.clone(),
            protocol: Protocol::Tcp,
            port: port.clone(),
        })
        .collect()
}

/// Splits the comma-separated `PORTS` value. Entries are kept verbatim.
pub fn split_ports(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

/// `"<prefix> 2024-01-02T03:04:05.678Z"`
pub fn firewall_name(prefix: &str, timestamp: DateTime<Utc>) -> String {
    format!(
        "{} {}",
        prefix,
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ranges(items: &[&str]) -> Vec<AddressRange> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compile_rules_one_rule_per_port() {
        let rules = compile_rules(
            &[ranges(&["10.0.0.0/8"])],
            &split_ports("80,443"),
        );

        assert_eq!(
            rules,
            vec![
                FirewallRule {
                    direction: Direction::In,
                    source_ips: ranges(&["10.0.0.0/8"]),
                    protocol: Protocol::Tcp,
                    port: "80".to_string(),
                },
                FirewallRule {
                    direction: Direction::In,
                    source_ips: ranges(&["10.0.0.0/8"]),
                    protocol: Protocol::Tcp,
                    port: "443".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_compile_rules_concatenates_lists_in_order() {
        let ipv4 = ranges(&["173.245.48.0/20", "103.21.244.0/22", "173.245.48.0/20"]);
        let ipv6 = ranges(&["2400:cb00::/32", "2606:4700::/32"]);
        let ports = split_ports("443,80,8443");

        let rules = compile_rules(&[ipv4.clone(), ipv6.clone()], &ports);

        let expected: Vec<AddressRange> = ipv4.iter().chain(ipv6.iter()).cloned().collect();
        assert_eq!(rules.len(), ports.len());
        for (rule, port) in rules.iter().zip(ports.iter()) {
            assert_eq!(rule.direction, Direction::In);
            assert_eq!(rule.protocol, Protocol::Tcp);
            assert_eq!(&rule.port, port);
            // 不去重，重複的範圍也保留
            assert_eq!(rule.source_ips, expected);
        }
    }

    #[test]
    fn test_compile_rules_is_deterministic() {
        let lists = [ranges(&["1.1.1.1/32"]), ranges(&["::1/128"])];
        let ports = split_ports("22,80");

        assert_eq!(compile_rules(&lists, &ports), compile_rules(&lists, &ports));
    }

    #[test]
    fn test_compile_rules_passes_garbage_through() {
        let rules = compile_rules(&[ranges(&["not-a-cidr"])], &split_ports(""));

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].port, "");
        assert_eq!(rules[0].source_ips, ranges(&["not-a-cidr"]));
    }

    #[test]
    fn test_split_ports_keeps_entries_verbatim() {
        assert_eq!(split_ports("80, 443,80"), vec!["80", " 443", "80"]);
        assert_eq!(split_ports("443"), vec!["443"]);
    }

    #[test]
    fn test_firewall_name_uses_iso_timestamp() {
        let ts = Utc
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap()
            + chrono::Duration::milliseconds(678);

        assert_eq!(
            firewall_name(FIREWALL_NAME_PREFIX, ts),
            "Cloudflare 2024-01-02T03:04:05.678Z"
        );
    }
}
