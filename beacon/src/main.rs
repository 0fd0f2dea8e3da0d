use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod config;

use config::{Config, MetricsConfig};

#[derive(Parser)]
#[command(about = "Reverse proxy for browser analytics traffic")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_file(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    // Guard must stay alive for the lifetime of the process.
    let _sentry_guard = config.common.logging.as_ref().map(|logging| {
        sentry::init((
            logging.sentry_dsn.clone(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    if let Some(metrics_config) = &config.common.metrics {
        if let Err(err) = install_statsd_recorder(metrics_config) {
            tracing::error!(error = %err, "failed to install statsd recorder");
            return ExitCode::FAILURE;
        }
    }

    if let Err(err) = ingest_proxy::run(config.proxy).await {
        tracing::error!(error = %err, "proxy terminated");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[derive(thiserror::Error, Debug)]
enum MetricsSetupError {
    #[error("could not build statsd recorder: {0}")]
    Build(#[from] metrics_exporter_statsd::StatsdError),
    #[error("a metrics recorder was already installed")]
    AlreadyInstalled,
}

fn install_statsd_recorder(config: &MetricsConfig) -> Result<(), MetricsSetupError> {
    let recorder = metrics_exporter_statsd::StatsdBuilder::from(
        config.statsd_host.as_str(),
        config.statsd_port,
    )
    .build(Some("beacon"))?;

    metrics::set_global_recorder(recorder).map_err(|_| MetricsSetupError::AlreadyInstalled)?;
    Ok(())
}
