use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use api_failover::config::load_config;
use api_failover::health::HealthProbe;
use api_failover::services::ServiceRegistry;

#[derive(Parser)]
#[command(name = "failover-cli")]
#[command(about = "Diagnostics for configured backend services", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "failover.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every configured service once
    Probe,
    /// Re-probe on an interval and report health transitions
    Watch {
        #[arg(long, default_value_t = 5)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let registry = ServiceRegistry::from_config(&config.services)?;
    let probe = HealthProbe::new(
        reqwest::Client::new(),
        Duration::from_secs(config.health_check.timeout_secs),
    );

    match cli.command {
        Commands::Probe => {
            for service in registry.services() {
                let healthy = probe.check(service).await;
                println!(
                    "{:<20} {:<40} {}",
                    service.name,
                    service.base_url,
                    if healthy { "healthy" } else { "UNREACHABLE" }
                );
            }
        }
        Commands::Watch { interval_secs } => {
            let mut last: Vec<Option<bool>> = vec![None; registry.len()];
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
            loop {
                ticker.tick().await;
                for (i, service) in registry.services().iter().enumerate() {
                    let healthy = probe.check(service).await;
                    if last[i] != Some(healthy) {
                        println!(
                            "{:<20} -> {}",
                            service.name,
                            if healthy { "healthy" } else { "UNREACHABLE" }
                        );
                        last[i] = Some(healthy);
                    }
                }
            }
        }
    }

    Ok(())
}
