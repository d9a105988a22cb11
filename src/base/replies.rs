//! Default user-visible texts posted into Slack threads.

/// Placeholder posted while the backend is working on an answer.
pub const PLACEHOLDER_TEXT: &str = "考え中…🤔";

/// Reply used when the backend answers without any text.
pub const FALLBACK_REPLY: &str = "エラー: 返答が取れませんでした。";

/// Reply prefix used when the backend call itself fails.
pub const ERROR_REPLY: &str = "エラー: AIの呼び出しに失敗しました。";
