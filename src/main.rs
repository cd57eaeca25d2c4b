use cf_firewall_sync::utils::logger;
use cf_firewall_sync::{http_sync, CliConfig, SyncError};
use clap::Parser;

fn report_failure(e: &SyncError) -> ! {
    tracing::error!("Firewall update failed: {} (Category: {:?})", e, e.category());
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("✗ Error: {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    // 在任何網路請求之前完成設定檢查
    let config = match cli.to_sync_config() {
        Ok(config) => config,
        Err(e) => report_failure(&e),
    };
    tracing::debug!("CLI config: {:?}", config);

    tracing::info!("Starting Hetzner Firewall update...");
    tracing::info!("Firewall ID: {}", config.firewall_id);

    let sync = match http_sync(config) {
        Ok(sync) => sync,
        Err(e) => report_failure(&e),
    };

    match sync.run().await {
        Ok(report) => {
            tracing::info!("Firewall renamed to: {}", report.firewall_name);
            if cli.verbose {
                match serde_json::to_string_pretty(&report.action) {
                    Ok(action) => tracing::debug!("Provider response:\n{}", action),
                    Err(e) => tracing::warn!("Could not render provider response: {}", e),
                }
            }
            println!("✓ Firewall updated successfully!");
        }
        Err(e) => report_failure(&e),
    }
}
