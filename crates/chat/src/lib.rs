//! Single-turn chat over the agent channel.
//!
//! Unlike the document pipeline there is no fallback chain here: a
//! synthesized answer is not an acceptable substitute for a
//! conversational turn, so any failure surfaces to the caller.

use std::{sync::Arc, time::Duration};

use tracing::debug;

use {
    docmill_agents::{AgentRegistry, AgentSession},
    docmill_channel::AgentChannel,
};

pub mod error;

pub use error::{Error as ChatError, Result};

pub struct ChatService {
    session: AgentSession,
    registry: Arc<AgentRegistry>,
}

impl ChatService {
    pub fn new(
        channel: Arc<dyn AgentChannel>,
        registry: Arc<AgentRegistry>,
        timeout: Duration,
    ) -> Self {
        Self {
            session: AgentSession::new(channel, timeout),
            registry,
        }
    }

    /// Run one chat exchange and return the assistant's reply.
    pub async fn respond(&self, user_message: &str) -> Result<String> {
        let outcome = self
            .session
            .execute(&self.registry.chat, user_message)
            .await?;

        if !outcome.succeeded {
            return Err(ChatError::Failed(
                outcome
                    .error
                    .unwrap_or_else(|| "agent produced no response".to_string()),
            ));
        }

        debug!(chars = outcome.text.len(), "chat reply");
        Ok(outcome.text.trim().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {async_trait::async_trait, serde_json::json};

    use {
        docmill_channel::{AgentHandle, ChannelError, Result as ChannelResult, RunEventStream},
        docmill_protocol::{RawRunEvent, wire},
    };

    use super::*;

    struct OneShotChannel {
        events: Vec<RawRunEvent>,
        unreachable: bool,
    }

    #[async_trait]
    impl AgentChannel for OneShotChannel {
        async fn create_thread(&self) -> ChannelResult<String> {
            if self.unreachable {
                return Err(ChannelError::message("connection refused"));
            }
            Ok("thread_chat".into())
        }

        async fn post_user_message(&self, _thread_id: &str, _content: &str) -> ChannelResult<()> {
            Ok(())
        }

        async fn start_run(
            &self,
            _thread_id: &str,
            _agent: &AgentHandle,
        ) -> ChannelResult<RunEventStream> {
            Ok(Box::pin(tokio_stream::iter(self.events.clone())))
        }

        async fn create_agent(
            &self,
            _model: &str,
            name: &str,
            _instructions: &str,
        ) -> ChannelResult<AgentHandle> {
            Ok(AgentHandle::new("agent_test", name))
        }
    }

    fn registry() -> Arc<AgentRegistry> {
        Arc::new(AgentRegistry {
            chat: AgentHandle::new("agent_chat", "chat-agent"),
            extract: AgentHandle::new("agent_extract", "extract-agent"),
            summarize: AgentHandle::new("agent_summarize", "summarize-agent"),
            title: AgentHandle::new("agent_title", "title-agent"),
        })
    }

    fn service(channel: OneShotChannel) -> ChatService {
        ChatService::new(Arc::new(channel), registry(), Duration::from_millis(200))
    }

    fn delta(text: &str) -> RawRunEvent {
        RawRunEvent::new(
            wire::MESSAGE_DELTA,
            json!({"delta": {"content": [{"type": "text", "text": {"value": text}}]}}),
        )
    }

    #[tokio::test]
    async fn returns_trimmed_reply() {
        let svc = service(OneShotChannel {
            events: vec![
                delta("  Hello there. "),
                RawRunEvent::new(wire::DONE, json!("[DONE]")),
            ],
            unreachable: false,
        });
        assert_eq!(svc.respond("hi").await.unwrap(), "Hello there.");
    }

    #[tokio::test]
    async fn failed_run_surfaces_no_fallback() {
        let svc = service(OneShotChannel {
            events: vec![
                delta("partial"),
                RawRunEvent::new(wire::RUN_FAILED, json!({"error": {"message": "quota"}})),
                RawRunEvent::new(wire::DONE, json!("[DONE]")),
            ],
            unreachable: false,
        });
        let err = svc.respond("hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Failed(ref m) if m == "quota"));
    }

    #[tokio::test]
    async fn incomplete_stream_is_a_failure() {
        let svc = service(OneShotChannel {
            events: vec![delta("cut off")],
            unreachable: false,
        });
        assert!(matches!(
            svc.respond("hi").await.unwrap_err(),
            ChatError::Failed(_)
        ));
    }

    #[tokio::test]
    async fn channel_error_propagates() {
        let svc = service(OneShotChannel {
            events: vec![],
            unreachable: true,
        });
        assert!(matches!(
            svc.respond("hi").await.unwrap_err(),
            ChatError::Channel(_)
        ));
    }
}
