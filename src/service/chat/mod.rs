pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Res, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the outbound operations the relay needs from a chat
/// platform like Slack. Implementing this trait allows different chat services
/// (or test doubles) to be used with the relay.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot user ID.
    ///
    /// Returns the unique identifier for the bot in the chat platform,
    /// which is used to detect when the bot is mentioned.
    fn bot_user_id(&self) -> &str;

    /// Post a message to a channel, optionally inside a thread.
    ///
    /// An empty `thread_ts` posts at the top level. Returns the timestamp of
    /// the new message, which identifies it for later updates.
    async fn post_message(&self, channel_id: &str, thread_ts: &str, text: &str) -> Res<String>;

    /// Overwrite the text of a previously posted message.
    async fn update_message(&self, channel_id: &str, ts: &str, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
