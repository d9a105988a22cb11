//! Binary entry point for `slack-dify-relay`.
//!
//! This module provides the command-line interface for the relay with options
//! for configuration file paths, logging verbosity, and trace export. It
//! initializes the necessary components and starts the service.

use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use slack_dify_relay::base::{config::Config, types::Void};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Slack-dify-relay – answers Slack mentions with a Dify chat app.
///
/// Configuration can come from `config.toml` or environment variables
/// (`SLACK_BOT_TOKEN`, `SLACK_BOT_USER_ID`, `DIFY_API_KEY`, ...).
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the relay will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level (DEBUG if `verbose` is set in the config)
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP/HTTP (endpoint from the standard `OTEL_EXPORTER_OTLP_*` variables).
    #[arg(long)]
    otlp: bool,
}

/// Main entry point for the relay binary.
///
/// Loads configuration, sets up logging based on verbosity, and starts the relay.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;

    // Construct the level filter.

    let verbosity = if config.verbose { args.verbose.max(1) } else { args.verbose };

    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stdout = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer, if requested.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_batch_exporter(exporter).build().tracer("slack-dify-relay");
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).init();

    slack_dify_relay::start(config).await
}
