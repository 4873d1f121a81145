//! HTTP implementation of [`AgentChannel`] for a threads/runs agent API.
//!
//! Thread and message management are plain JSON POSTs; starting a run
//! returns a `text/event-stream` body that is reframed into
//! [`RawRunEvent`]s without interpreting payloads (decoding is the
//! consumer's job, see `docmill-protocol`).

use {
    async_trait::async_trait,
    futures::StreamExt,
    secrecy::{ExposeSecret, Secret},
    serde_json::json,
    tracing::{debug, trace, warn},
};

use docmill_protocol::{RawRunEvent, wire};

use crate::{
    AgentChannel, AgentHandle, RunEventStream,
    error::{Context, Error, Result},
};

/// HTTP/SSE-backed agent channel.
pub struct HttpAgentChannel {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<Secret<String>>,
}

impl HttpAgentChannel {
    /// Create a channel for the given API base URL.
    ///
    /// No overall request timeout is set: run streams are long-lived and
    /// the session layer owns the bounded wait. Connection establishment
    /// is still capped.
    pub fn new(base_url: impl Into<String>, api_key: Option<Secret<String>>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client for agent channel")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.post(format!("{}{path}", self.base_url));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key.expose_secret());
        }
        req
    }

    /// Send a POST and fail with the response body on a non-success status.
    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let resp = self
            .post(path)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {path} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            warn!(%status, path, body = %body_text, "agent API error");
            return Err(Error::message(format!(
                "agent API returned HTTP {status} for {path}: {body_text}"
            )));
        }
        Ok(resp)
    }
}

#[async_trait]
impl AgentChannel for HttpAgentChannel {
    async fn create_thread(&self) -> Result<String> {
        let resp = self.post_json("/threads", json!({})).await?;
        let body: serde_json::Value = resp.json().await?;
        let id = body["id"]
            .as_str()
            .context("thread response missing 'id'")?
            .to_string();
        debug!(thread_id = %id, "created thread");
        Ok(id)
    }

    async fn post_user_message(&self, thread_id: &str, content: &str) -> Result<()> {
        self.post_json(
            &format!("/threads/{thread_id}/messages"),
            json!({ "role": "user", "content": content }),
        )
        .await?;
        debug!(thread_id, chars = content.len(), "posted user message");
        Ok(())
    }

    async fn start_run(&self, thread_id: &str, agent: &AgentHandle) -> Result<RunEventStream> {
        let resp = self
            .post_json(
                &format!("/threads/{thread_id}/runs"),
                json!({ "assistant_id": agent.id, "stream": true }),
            )
            .await?;
        debug!(thread_id, agent_id = %agent.id, "run started");

        Ok(Box::pin(async_stream::stream! {
            let mut byte_stream = resp.bytes_stream();
            let mut buf = String::new();

            while let Some(chunk) = byte_stream.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        // Surface transport loss as a stream-level error
                        // frame; the missing `done` marks it incomplete.
                        yield RawRunEvent::new(wire::ERROR, json!(e.to_string()));
                        return;
                    },
                };
                buf.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(pos) = buf.find("\n\n") {
                    let block = buf[..pos].to_string();
                    buf = buf[pos + 2..].to_string();

                    if let Some(event) = parse_sse_block(&block) {
                        trace!(event = %event.event, "run stream frame");
                        yield event;
                    }
                }
            }
        }))
    }

    async fn create_agent(
        &self,
        model: &str,
        name: &str,
        instructions: &str,
    ) -> Result<AgentHandle> {
        let resp = self
            .post_json(
                "/assistants",
                json!({ "model": model, "name": name, "instructions": instructions }),
            )
            .await?;
        let body: serde_json::Value = resp.json().await?;
        let id = body["id"]
            .as_str()
            .with_context(|| format!("assistant response for '{name}' missing 'id'"))?
            .to_string();
        debug!(agent_id = %id, name, "created agent");
        Ok(AgentHandle::new(id, name))
    }
}

/// Parse one SSE block (the lines between blank-line separators) into a
/// raw event. Blocks without an `event:` field (comments, keep-alives)
/// are skipped. `data:` payloads that are not valid JSON are carried as
/// JSON strings.
fn parse_sse_block(block: &str) -> Option<RawRunEvent> {
    let mut event_name: Option<&str> = None;
    let mut data = String::new();

    for line in block.lines() {
        if let Some(rest) = line.strip_prefix("event:") {
            event_name = Some(rest.trim());
        } else if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.trim_start());
        }
    }

    let event_name = event_name?;
    let payload = serde_json::from_str(&data)
        .unwrap_or_else(|_| serde_json::Value::String(data.clone()));
    Some(RawRunEvent::new(event_name, payload))
}
