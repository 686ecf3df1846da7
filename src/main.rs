//! CallSum - call-recording summarization client
//!
#![doc = "CallSum - call-recording summarization client"]
#![doc = "Main entry point for the callsum command-line application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use callsum::cli::{Cli, LogFormat};
use callsum::commands;
use callsum::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.log_format);

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path, &cli)?;
    config.validate()?;

    tracing::debug!("Using backend at {}", config.api.base_url);
    commands::dispatch(cli, config).await
}

/// Initialize tracing subscriber with environment filter
///
/// Diagnostics go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "callsum=debug" } else { "callsum=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
