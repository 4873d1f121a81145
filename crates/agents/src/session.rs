//! One request/response exchange against a remote agent.
//!
//! [`AgentSession::execute`] opens a fresh thread, posts the prompt,
//! starts a run, and drains the event stream in arrival order into a
//! [`StageOutcome`]. It never retries; retry and fallback policy belong
//! to the caller.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use {
    tokio_stream::StreamExt,
    tracing::{debug, warn},
};

use {
    docmill_channel::{AgentChannel, AgentHandle, Result, RunEventStream},
    docmill_protocol::{StreamEvent, decode},
};

/// Resolved result of one agent exchange.
///
/// `succeeded` requires all three: the stream delivered its terminal
/// completion marker, no error or run failure was observed, and the
/// trimmed text is non-empty. Partial text without completion is never
/// success — a bounded-wait expiry counts as an incomplete stream.
#[derive(Debug, Clone, Default)]
pub struct StageOutcome {
    pub text: String,
    pub succeeded: bool,
    pub error: Option<String>,
}

pub struct AgentSession {
    channel: Arc<dyn AgentChannel>,
    stage_timeout: Duration,
}

impl AgentSession {
    pub fn new(channel: Arc<dyn AgentChannel>, stage_timeout: Duration) -> Self {
        Self {
            channel,
            stage_timeout,
        }
    }

    /// Execute exactly one exchange and resolve its outcome.
    ///
    /// Thread creation, message posting, and run start failures propagate
    /// as channel errors — the caller decides whether that is fatal or a
    /// fallback case. Everything after a stream is obtained resolves to a
    /// [`StageOutcome`], failed or not.
    pub async fn execute(&self, agent: &AgentHandle, prompt: &str) -> Result<StageOutcome> {
        let thread_id = self.channel.create_thread().await?;
        self.channel.post_user_message(&thread_id, prompt).await?;
        let stream = self.channel.start_run(&thread_id, agent).await?;

        let outcome = drain_run_stream(stream, self.stage_timeout, &agent.name).await;
        debug!(
            agent = %agent.name,
            succeeded = outcome.succeeded,
            chars = outcome.text.len(),
            error = outcome.error.as_deref().unwrap_or(""),
            "exchange resolved"
        );
        Ok(outcome)
    }
}

/// Drain a run stream under a bounded wait.
///
/// Events are consumed strictly in arrival order. Error and run-failure
/// frames are recorded but do not abort the drain: trailing deltas and the
/// terminal marker may still arrive, and accumulated text stays useful as
/// a best-effort result for the caller's fallback decision.
async fn drain_run_stream(
    mut stream: RunEventStream,
    budget: Duration,
    agent_name: &str,
) -> StageOutcome {
    let started = Instant::now();
    let mut text = String::new();
    let mut completed = false;
    let mut failure: Option<String> = None;

    loop {
        let remaining = budget.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            warn!(agent = %agent_name, "run stream exceeded stage budget");
            break;
        }

        let next = match tokio::time::timeout(remaining, stream.next()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => break,
            Err(_) => {
                warn!(agent = %agent_name, "run stream exceeded stage budget");
                break;
            },
        };

        match decode(&next) {
            StreamEvent::Delta(chunk) => text.push_str(&chunk),
            StreamEvent::Error(message) => {
                warn!(agent = %agent_name, %message, "stream error event");
                if failure.is_none() {
                    failure = Some(message);
                }
            },
            StreamEvent::RunFailed(message) => {
                warn!(agent = %agent_name, %message, "run failed");
                if failure.is_none() {
                    failure = Some(message);
                }
            },
            StreamEvent::Done => {
                completed = true;
                break;
            },
            StreamEvent::Ignored => {},
        }
    }

    let trimmed_empty = text.trim().is_empty();
    let succeeded = completed && failure.is_none() && !trimmed_empty;
    let error = failure.or_else(|| {
        if !completed {
            Some("stream ended before completion".to_string())
        } else if trimmed_empty {
            Some("agent produced no text".to_string())
        } else {
            None
        }
    });

    StageOutcome {
        text,
        succeeded,
        error,
    }
}
