//! The remote conversational-agent boundary.
//!
//! [`AgentChannel`] is the capability the core needs from the remote side:
//! open a thread, post a user turn, start a run and consume its event
//! stream. [`http::HttpAgentChannel`] implements it over REST + SSE; tests
//! and the pipeline test-benches substitute scripted in-memory channels.

use std::pin::Pin;

use {async_trait::async_trait, tokio_stream::Stream};

use docmill_protocol::RawRunEvent;

pub mod error;
pub mod http;

pub use {
    error::{Error as ChannelError, Result},
    http::HttpAgentChannel,
};

/// An opaque remote agent identity, as returned by agent provisioning.
#[derive(Debug, Clone)]
pub struct AgentHandle {
    pub id: String,
    pub name: String,
}

impl AgentHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A run's event stream: finite, single-consumer, forward-only, not
/// restartable. Transport failures mid-stream surface as a synthetic
/// `error` frame followed by end-of-stream (no `done`).
pub type RunEventStream = Pin<Box<dyn Stream<Item = RawRunEvent> + Send>>;

/// Capability contract for the remote agent service.
#[async_trait]
pub trait AgentChannel: Send + Sync {
    /// Open a new conversation thread.
    async fn create_thread(&self) -> Result<String>;

    /// Append a user turn to a thread.
    async fn post_user_message(&self, thread_id: &str, content: &str) -> Result<()>;

    /// Start a run of `agent` against a thread and obtain its event stream.
    async fn start_run(&self, thread_id: &str, agent: &AgentHandle) -> Result<RunEventStream>;

    /// Provision a new remote agent with fixed instructions.
    async fn create_agent(
        &self,
        model: &str,
        name: &str,
        instructions: &str,
    ) -> Result<AgentHandle>;
}
