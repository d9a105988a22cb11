//! Slack implementation of the chat port.
//!
//! Wraps the `slack-morphism` client to post the placeholder message and
//! later overwrite it with the backend's answer.

use crate::base::{
    config::Config,
    types::{Res, Void},
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{info, instrument};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config) -> Res<Self> {
        let client = SlackChatClient::new(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// Slack client implementation.
struct SlackChatClient {
    bot_token: SlackApiToken,
    bot_user_id: String,
    client: Arc<FullClient>,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID, unless it was configured.

        let bot_user_id = if config.slack_bot_user_id.is_empty() {
            let session = client.open_session(&bot_token);
            let bot_user = session.auth_test().await.map_err(|e| anyhow::anyhow!("Failed to resolve the bot user ID: {}", e))?;
            bot_user.user_id.0
        } else {
            config.slack_bot_user_id.clone()
        };

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self { bot_token, bot_user_id, client })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    #[instrument(skip(self, text))]
    async fn post_message(&self, channel_id: &str, thread_ts: &str, text: &str) -> Res<String> {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let mut request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message);

        if !thread_ts.is_empty() {
            request = request.with_thread_ts(SlackTs(thread_ts.to_string()));
        }

        let session = self.client.open_session(&self.bot_token);

        let response = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to post message: {}", e))?;

        Ok(response.ts.0)
    }

    #[instrument(skip(self, text))]
    async fn update_message(&self, channel_id: &str, ts: &str, text: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let request = SlackApiChatUpdateRequest::new(SlackChannelId(channel_id.to_string()), message, SlackTs(ts.to_string()));

        let session = self.client.open_session(&self.bot_token);

        session.chat_update(&request).await.map_err(|e| anyhow::anyhow!("Failed to update message: {}", e))?;

        Ok(())
    }
}
