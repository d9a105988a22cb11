//! Load configuration via `config` crate with env-override support.

use std::{net::SocketAddr, ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::replies;

use super::types::Res;

/// Default Dify API base URL.
fn default_dify_base_url() -> String {
    "https://api.dify.ai/v1".to_string()
}

/// Default Dify request timeout, in seconds.
fn default_dify_timeout_secs() -> u64 {
    120
}

/// Default socket address for the webhook listener.
fn default_listen_address() -> String {
    "0.0.0.0:3000".to_string()
}

/// Default path Slack delivers events to.
fn default_webhook_path() -> String {
    "/api/chat".to_string()
}

fn default_reject_non_post() -> bool {
    true
}

fn default_placeholder_text() -> String {
    replies::PLACEHOLDER_TEXT.to_string()
}

fn default_fallback_reply() -> String {
    replies::FALLBACK_REPLY.to_string()
}

fn default_error_reply() -> String {
    replies::ERROR_REPLY.to_string()
}

/// Which request fields carry the cleaned query to Dify.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DifyQueryFields {
    /// Send both `query` and `inputs["sys.query"]`.
    #[default]
    Both,
    /// Send only `query` (with empty `inputs`).
    Query,
    /// Send only `inputs["sys.query"]`.
    Inputs,
}

/// Configuration for the relay.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    #[serde(default)]
    pub slack_bot_token: String,
    /// The bot's own Slack user ID (`SLACK_BOT_USER_ID`).
    /// Resolved via `auth.test` at startup when left empty.
    #[serde(default)]
    pub slack_bot_user_id: String,
    /// Dify app API key (`DIFY_API_KEY`).
    #[serde(default)]
    pub dify_api_key: String,
    /// Dify API base URL (`DIFY_BASE_URL`).
    #[serde(default = "default_dify_base_url")]
    pub dify_base_url: String,
    /// Fields used to carry the query (`DIFY_QUERY_FIELDS`): `both`, `query`, or `inputs`.
    #[serde(default)]
    pub dify_query_fields: DifyQueryFields,
    /// Dify request timeout in seconds (`DIFY_TIMEOUT_SECS`).
    #[serde(default = "default_dify_timeout_secs")]
    pub dify_timeout_secs: u64,
    /// Socket address the webhook listener binds to (`LISTEN_ADDRESS`).
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    /// Path Slack delivers events to (`WEBHOOK_PATH`).
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    /// Answer non-POST requests with 405 instead of 200 (`REJECT_NON_POST`).
    #[serde(default = "default_reject_non_post")]
    pub reject_non_post: bool,
    /// Placeholder posted before the backend is queried (`PLACEHOLDER_TEXT`).
    #[serde(default = "default_placeholder_text")]
    pub placeholder_text: String,
    /// Reply used when the backend returns no answer (`FALLBACK_REPLY`).
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
    /// Reply prefix used when the backend call fails (`ERROR_REPLY`).
    #[serde(default = "default_error_reply")]
    pub error_reply: String,
    /// Log at debug level, including raw webhook bodies (`VERBOSE`).
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            slack_bot_token: String::new(),
            slack_bot_user_id: String::new(),
            dify_api_key: String::new(),
            dify_base_url: default_dify_base_url(),
            dify_query_fields: DifyQueryFields::default(),
            dify_timeout_secs: default_dify_timeout_secs(),
            listen_address: default_listen_address(),
            webhook_path: default_webhook_path(),
            reject_non_post: default_reject_non_post(),
            placeholder_text: default_placeholder_text(),
            fallback_reply: default_fallback_reply(),
            error_reply: default_error_reply(),
            verbose: false,
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // Environment variables take precedence over the file.
        cfg = cfg.add_source(config::Environment::default());

        Self::from_builder(cfg)
    }

    /// Build and validate a configuration from an assembled set of sources.
    pub fn from_builder(cfg: config::ConfigBuilder<config::builder::DefaultState>) -> Res<Self> {
        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        if result.placeholder_text.trim().is_empty() {
            return Err(anyhow::anyhow!("Placeholder text must not be empty."));
        }

        if result.fallback_reply.trim().is_empty() || result.error_reply.trim().is_empty() {
            return Err(anyhow::anyhow!("Fallback and error replies must not be empty."));
        }

        if !result.webhook_path.starts_with('/') {
            return Err(anyhow::anyhow!("Webhook path must start with `/`."));
        }

        if result.listen_address.parse::<SocketAddr>().is_err() {
            return Err(anyhow::anyhow!("Listen address `{}` is not a valid socket address.", result.listen_address));
        }

        if result.dify_timeout_secs < 1 {
            return Err(anyhow::anyhow!("Dify timeout must be at least 1 second."));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Res<Config> {
        Config::from_builder(config::Config::builder().add_source(config::File::from_str(toml, config::FileFormat::Toml)))
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = from_toml("").unwrap();

        assert_eq!(config.dify_base_url, "https://api.dify.ai/v1");
        assert_eq!(config.dify_query_fields, DifyQueryFields::Both);
        assert_eq!(config.webhook_path, "/api/chat");
        assert_eq!(config.placeholder_text, replies::PLACEHOLDER_TEXT);
        assert!(config.reject_non_post);
        assert!(!config.verbose);
        assert!(config.slack_bot_token.is_empty());
    }

    #[test]
    fn file_values_override_defaults() {
        let config = from_toml(
            r#"
            slack_bot_token = "xoxb-test"
            slack_bot_user_id = "U123"
            dify_query_fields = "inputs"
            reject_non_post = false
            listen_address = "127.0.0.1:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.slack_bot_token, "xoxb-test");
        assert_eq!(config.slack_bot_user_id, "U123");
        assert_eq!(config.dify_query_fields, DifyQueryFields::Inputs);
        assert!(!config.reject_non_post);
        assert_eq!(config.listen_address, "127.0.0.1:8080");
    }

    #[test]
    fn environment_overrides_file_and_coerces_strings() {
        let env = [
            ("SLACK_BOT_TOKEN", "xoxb-env"),
            ("REJECT_NON_POST", "false"),
            ("DIFY_TIMEOUT_SECS", "7"),
            ("VERBOSE", "true"),
            ("DIFY_QUERY_FIELDS", "query"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let cfg = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                slack_bot_token = "xoxb-file"
                dify_api_key = "app-file"
                reject_non_post = true
                dify_timeout_secs = 30
                "#,
                config::FileFormat::Toml,
            ))
            .add_source(config::Environment::default().source(Some(env)));

        let config = Config::from_builder(cfg).unwrap();

        assert_eq!(config.slack_bot_token, "xoxb-env");
        assert_eq!(config.dify_api_key, "app-file");
        assert!(!config.reject_non_post);
        assert_eq!(config.dify_timeout_secs, 7);
        assert!(config.verbose);
        assert_eq!(config.dify_query_fields, DifyQueryFields::Query);
    }

    #[test]
    fn rejects_empty_placeholder() {
        assert!(from_toml(r#"placeholder_text = "  ""#).is_err());
    }

    #[test]
    fn rejects_relative_webhook_path() {
        assert!(from_toml(r#"webhook_path = "api/chat""#).is_err());
    }

    #[test]
    fn rejects_bad_listen_address() {
        assert!(from_toml(r#"listen_address = "localhost""#).is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(from_toml("dify_timeout_secs = 0").is_err());
    }
}
