pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// A qualifying mention, ready to be relayed to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    /// Channel the mention was posted in.
    pub channel_id: String,
    /// User who mentioned the bot (empty if the event did not carry one).
    pub user_id: String,
    /// Thread anchor to reply under (empty for a top-level reply).
    pub thread_ts: String,
    /// The message text with the bot mention stripped and trimmed.
    pub query: String,
}
