//! Dify implementation of the LLM port.
//!
//! Talks to the `chat-messages` endpoint of a Dify chat app in blocking
//! response mode, so a single JSON object carries the final answer.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::base::{
    config::{Config, DifyQueryFields},
    types::Res,
};

use super::{GenericLlmClient, LlmClient};

/// Key Dify exposes the user's message under in `inputs`.
const SYS_QUERY_INPUT: &str = "sys.query";

// Extra methods on `LlmClient` applied by the dify implementation.

impl LlmClient {
    pub fn dify(config: &Config) -> Res<Self> {
        let client = DifyLlmClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Wire types.

#[derive(Debug, Serialize)]
struct ChatMessagesRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    inputs: BTreeMap<&'static str, &'a str>,
    user: &'a str,
    response_mode: &'static str,
}

impl<'a> ChatMessagesRequest<'a> {
    fn new(fields: DifyQueryFields, query: &'a str, user: &'a str) -> Self {
        let mut inputs = BTreeMap::new();

        if fields != DifyQueryFields::Query {
            inputs.insert(SYS_QUERY_INPUT, query);
        }

        Self {
            query: (fields != DifyQueryFields::Inputs).then_some(query),
            inputs,
            user,
            response_mode: "blocking",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatMessagesResponse {
    #[serde(default)]
    answer: Option<String>,
}

/// Error body Dify returns alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// Specific implementations.

/// Dify LLM client implementation.
#[derive(Clone)]
pub struct DifyLlmClient {
    http: reqwest::Client,
    config: Config,
}

impl DifyLlmClient {
    /// Create a new Dify LLM client.
    #[instrument(name = "DifyLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(config.dify_timeout_secs)).build()?;

        Ok(Self { http, config: config.clone() })
    }

    fn chat_messages_url(&self) -> String {
        format!("{}/chat-messages", self.config.dify_base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl GenericLlmClient for DifyLlmClient {
    #[instrument(name = "DifyLlmClient::get_answer", skip_all)]
    async fn get_answer(&self, query: &str, user_id: &str) -> Res<String> {
        let request = ChatMessagesRequest::new(self.config.dify_query_fields, query, user_id);

        let response = self.http.post(self.chat_messages_url()).bearer_auth(&self.config.dify_api_key).json(&request).send().await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            let detail = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(ErrorResponse { code, message: Some(message) }) => format!("{}: {}", code.unwrap_or_default(), message),
                _ => body.chars().take(200).collect(),
            };

            return Err(anyhow::anyhow!("Dify returned {}: {}", status, detail));
        }

        let data: ChatMessagesResponse = response.json().await?;

        debug!("Dify answered with {} characters.", data.answer.as_deref().map(str::len).unwrap_or_default());

        Ok(data.answer.unwrap_or_default())
    }
}

// Tests.
