//! The placeholder, query, and update sequence run after a mention is acknowledged.

use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, instrument, warn};

use crate::{
    base::{
        config::Config,
        types::{RelayRequest, Void},
    },
    service::{chat::ChatClient, llm::LlmClient},
};

/// Handles a qualifying mention in the background.
///
/// The work runs on its own task so the webhook can be acknowledged right away.
/// Errors never reach the caller; they are only logged.
#[instrument(skip_all)]
pub fn handle_relay(request: RelayRequest, config: Config, chat: ChatClient, llm: LlmClient) -> JoinHandle<()> {
    tokio::spawn(async move {
        // Process the event.
        let result = handle_relay_internal(&request, &config, &chat, &llm).in_current_span().await;

        // Log any errors.
        if let Err(err) = &result {
            error!("Error while relaying: {}", err);
        }
    })
}

#[instrument(skip_all, fields(channel_id = %request.channel_id, thread_ts = %request.thread_ts))]
async fn handle_relay_internal(request: &RelayRequest, config: &Config, chat: &ChatClient, llm: &LlmClient) -> Void {
    // Post the placeholder first; without it there is nothing to update later.

    let placeholder_ts = chat.post_message(&request.channel_id, &request.thread_ts, &config.placeholder_text).await?;

    info!("Posted placeholder message {} ...", placeholder_ts);

    // Ask the backend.

    let answer = match llm.get_answer(&request.query, &request.user_id).await {
        Ok(answer) if !answer.trim().is_empty() => answer,
        Ok(_) => {
            warn!("Backend returned no answer.");
            config.fallback_reply.clone()
        }
        Err(err) => {
            error!("Backend query failed: {}", err);
            format!("{} ({})", config.error_reply, err)
        }
    };

    // Overwrite the placeholder with the answer.

    chat.update_message(&request.channel_id, &placeholder_ts, &answer).await?;

    info!("Updated placeholder message {} with the answer.", placeholder_ts);

    Ok(())
}
