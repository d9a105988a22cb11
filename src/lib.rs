//! Library root for `slack-dify-relay`.
//!
//! The relay answers Slack mentions with a Dify chat app:
//! - Answers the Events API URL verification handshake
//! - Acknowledges every delivery immediately so Slack does not redeliver
//! - Posts a placeholder into the thread, asks Dify, and overwrites the placeholder with the answer
//!
//! The architecture is built around small traits for the chat platform and the
//! AI backend, so either side can be swapped out or mocked.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the relay runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the LLM and chat clients
/// - Serves the webhook endpoint until shutdown
pub async fn start(config: Config) -> Void {
    info!("Starting slack-dify-relay ...");

    // Start the crypto provider.
    crypto::ring::default_provider().install_default().map_err(|_| anyhow::anyhow!("Failed to install the rustls crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
