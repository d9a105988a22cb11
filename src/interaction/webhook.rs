//! Inbound endpoint for Slack Events API deliveries.
//!
//! Slack redelivers an event when it is not acknowledged within a few seconds,
//! so every delivery is answered before any outbound call is made. Only the
//! URL verification handshake and malformed bodies produce a non-empty or
//! non-200 response.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    base::types::RelayRequest,
    interaction::relay,
    runtime::Runtime,
};

/// How a delivery should be answered.
#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    /// The body could not be understood.
    Malformed(String),
    /// URL verification handshake; the challenge is echoed back.
    Challenge(String),
    /// Well-formed but nothing to do.
    Ignored(&'static str),
    /// A mention of the bot with a non-empty query.
    Relay(RelayRequest),
}

/// The substring Slack uses to mention `bot_user_id`.
pub fn mention_token(bot_user_id: &str) -> String {
    format!("<@{bot_user_id}>")
}

/// Read `key` from a JSON object as a non-empty string.
///
/// Fields of another type (Slack sends `user` and `channel` as objects on
/// some events) read as absent.
fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Classify a raw delivery body.
///
/// Only a body that is not valid JSON is malformed; any well-formed delivery
/// without the expected shape is ignored.
pub fn classify(body: &[u8], bot_user_id: &str) -> Inbound {
    let payload: Value = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(err) => return Inbound::Malformed(err.to_string()),
    };

    // Challenge payloads carry no `event`, so this comes first.
    if payload.get("type").and_then(Value::as_str) == Some("url_verification") {
        return match payload.get("challenge").and_then(Value::as_str) {
            Some(challenge) => Inbound::Challenge(challenge.to_string()),
            None => Inbound::Malformed("url_verification without a challenge".to_string()),
        };
    }

    let Some(event) = payload.get("event").filter(|e| e.is_object()) else {
        return Inbound::Ignored("no event");
    };

    let Some(text) = str_field(event, "text") else {
        return Inbound::Ignored("no text");
    };

    let Some(channel_id) = str_field(event, "channel") else {
        return Inbound::Ignored("no channel");
    };

    let mention = mention_token(bot_user_id);

    if !text.contains(&mention) {
        return Inbound::Ignored("bot not mentioned");
    }

    let query = text.replacen(&mention, "", 1).trim().to_string();

    if query.is_empty() {
        return Inbound::Ignored("nothing besides the mention");
    }

    Inbound::Relay(RelayRequest {
        channel_id,
        user_id: str_field(event, "user").unwrap_or_default(),
        thread_ts: str_field(event, "thread_ts").or_else(|| str_field(event, "ts")).unwrap_or_default(),
        query,
    })
}

/// Handles a webhook delivery.
#[instrument(skip_all, fields(method = %method))]
pub async fn handle_webhook(State(runtime): State<Runtime>, method: Method, body: Bytes) -> Response {
    if method != Method::POST {
        warn!("Rejecting {} request.", method);

        return if runtime.config.reject_non_post {
            (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
        } else {
            StatusCode::OK.into_response()
        };
    }

    debug!("Received webhook body: {}", String::from_utf8_lossy(&body));

    match classify(&body, runtime.chat.bot_user_id()) {
        Inbound::Malformed(reason) => {
            warn!("Rejecting malformed body: {}", reason);
            StatusCode::BAD_REQUEST.into_response()
        }
        Inbound::Challenge(challenge) => {
            info!("Answering URL verification challenge ...");
            ([(header::CONTENT_TYPE, "text/plain")], challenge).into_response()
        }
        Inbound::Ignored(reason) => {
            debug!("Ignoring event: {}", reason);
            StatusCode::OK.into_response()
        }
        Inbound::Relay(request) => {
            info!("Received mention in {} ...", request.channel_id);

            // Acknowledge now; the relay continues on its own task.
            relay::handle_relay(request, runtime.config.clone(), runtime.chat.clone(), runtime.llm.clone());

            StatusCode::OK.into_response()
        }
    }
}

// Tests.
