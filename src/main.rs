//! teams-notify - Send a pipeline execution notification to Microsoft Teams.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use teams_notify::cli::{Cli, LogFormat};
use teams_notify::config::Config;
use teams_notify::{Notification, TeamsNotificationService};

/// Initialize the tracing subscriber with the specified log format.
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    match format {
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .with_env_filter(filter)
                .init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_format);

    info!(config_path = %cli.config.display(), "Loading configuration");

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, path = %cli.config.display(), "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(errors) = config.validate() {
        for e in &errors {
            error!(error = %e, "Configuration validation error");
        }
        error!(
            error_count = errors.len(),
            "Configuration validation failed"
        );
        std::process::exit(1);
    }

    if cli.validate {
        println!("Configuration is valid: {}", cli.config.display());
        println!(
            "  Enabled: {}",
            if config.enabled { "yes" } else { "no" }
        );
        println!("  Webhook base URL: {}", config.webhook_base_url);
        println!(
            "  Sender: {} (timeout {}s, {} attempts)",
            config.sender.endpoint, config.sender.timeout_secs, config.sender.max_retries
        );
        println!("  Default destinations: {}", config.destinations.len());
        return Ok(());
    }

    let notification_path = cli
        .notification
        .context("--notification is required unless --validate is given")?;
    let content = std::fs::read_to_string(&notification_path)
        .with_context(|| format!("failed to read {}", notification_path.display()))?;
    let mut notification = Notification::from_json_str(&content)?;

    if notification.to.is_empty() {
        let defaults = config
            .resolve_destinations()
            .map_err(|errors| anyhow::anyhow!("{} invalid default destination(s)", errors.len()))?;
        info!(
            destination_count = defaults.len(),
            "No destinations in notification, using configured defaults"
        );
        notification.to = defaults.iter().map(|d| d.expose().to_string()).collect();
    }

    let http_client = reqwest::Client::builder()
        .timeout(config.sender.timeout())
        .build()?;
    let service = TeamsNotificationService::from_config(&config, http_client);

    if !service.supports_type(&notification.notification_type) {
        error!(
            notification_type = %notification.notification_type,
            "Unsupported notification type"
        );
        std::process::exit(1);
    }

    if cli.dry_run {
        let card = service.build_card(&notification);
        println!("{}", serde_json::to_string_pretty(&card)?);
        return Ok(());
    }

    if !config.enabled {
        info!("Microsoft Teams notifications are disabled, nothing sent");
        return Ok(());
    }

    if notification.to.is_empty() {
        warn!("Notification has no destinations, nothing sent");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let results = runtime.block_on(service.handle(&notification));

    let failed = results.iter().filter(|r| !r.is_success()).count();
    info!(
        delivered = results.len() - failed,
        failed = failed,
        "Notification processed"
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
