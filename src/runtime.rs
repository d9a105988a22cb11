//! Runtime services and shared state for the relay.

use axum::{Router, routing::any};
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::webhook,
    service::{chat::ChatClient, llm::LlmClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the chat client, LLM client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        if config.slack_bot_token.is_empty() {
            warn!("`SLACK_BOT_TOKEN` is not set; Slack calls will fail to authenticate.");
        }

        if config.dify_api_key.is_empty() {
            warn!("`DIFY_API_KEY` is not set; Dify calls will fail to authenticate.");
        }

        // Initialize the LLM client.
        let llm = LlmClient::dify(&config)?;

        // Initialize the slack client.
        let chat = ChatClient::slack(&config).await?;

        Ok(Self { config, llm, chat })
    }

    /// Build the HTTP router serving the webhook endpoint.
    pub fn router(&self) -> Router {
        Router::new().route(&self.config.webhook_path, any(webhook::handle_webhook)).with_state(self.clone())
    }

    /// Serve webhook deliveries until Ctrl-C.
    pub async fn start(&self) -> Void {
        let listener = TcpListener::bind(&self.config.listen_address).await?;

        info!("Listening for events on http://{}{} ...", listener.local_addr()?, self.config.webhook_path);

        axum::serve(listener, self.router()).with_graceful_shutdown(shutdown_signal()).await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }

    info!("Shutting down ...");
}
