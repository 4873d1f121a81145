use serde::{Deserialize, Serialize};

/// Wire-level event names used by the threads/runs protocol.
pub mod wire {
    /// Incremental assistant message content.
    pub const MESSAGE_DELTA: &str = "thread.message.delta";
    /// The remote run failed; the stream may still end with [`DONE`].
    pub const RUN_FAILED: &str = "thread.run.failed";
    /// Recoverable stream-level error; not terminal by itself.
    pub const ERROR: &str = "error";
    /// Terminal marker; nothing follows.
    pub const DONE: &str = "done";
}

/// One raw frame from a run's event stream, exactly as the channel
/// delivered it: an event name plus an uninterpreted JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRunEvent {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl RawRunEvent {
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Decoded run-stream events.
///
/// Invariant: at most one `Done` per stream, always last when present.
/// Accumulated text is the ordered concatenation of `Delta` payloads seen
/// before `Done` (or before the stream ends, when no `Done` arrives).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental chunk of generated text; append in arrival order.
    Delta(String),
    /// Recoverable failure signal; the stream continues.
    Error(String),
    /// Remote execution failed; a trailing `Done` may still arrive.
    RunFailed(String),
    /// Terminal: the run completed and nothing follows.
    Done,
    /// Unrecognized wire event, skipped for forward compatibility.
    Ignored,
}
