//! The four named agent handles and their provisioning.
//!
//! Handles are resolved once at startup and treated as read-only
//! configuration afterwards; sessions borrow them but never mutate.

use tracing::info;

use {
    docmill_channel::{AgentChannel, AgentHandle, Result},
    docmill_config::{AgentsConfig, StageAgentConfig},
};

const CHAT_INSTRUCTIONS: &str =
    "You are a helpful AI assistant that provides clear and concise responses.";

const EXTRACT_INSTRUCTIONS: &str =
    "Process and clean text content while maintaining structure and important information.";

const SUMMARIZE_INSTRUCTIONS: &str =
    "Create concise summaries that capture main points and key details.";

const TITLE_INSTRUCTIONS: &str = "You are a specialized title generation assistant.
Your task is to create titles for documents following these rules:
1. Generate ONLY the title text, no additional explanations
2. Maximum length of 50 characters
3. Focus on the main topic or theme
4. Use proper capitalization (Title Case)
5. Avoid special characters and quotes
6. Make titles clear and descriptive
7. Respond with nothing but the title itself

Example good responses:
Digital Transformation Strategy 2025
Market Analysis: Premium Chai Tea
Cloud Computing Implementation Guide

Example bad responses:
\"Here's a title for your document: Digital Strategy\" (no explanations needed)
This document appears to be about digital transformation (just the title needed)
The title is: Market Analysis (no extra text)";

/// The named agent handles used by the pipeline and chat services.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    pub chat: AgentHandle,
    pub extract: AgentHandle,
    pub summarize: AgentHandle,
    pub title: AgentHandle,
}

impl AgentRegistry {
    /// Resolve all four handles: pinned ids are taken from config as-is,
    /// missing agents are created against the channel with their built-in
    /// instructions.
    pub async fn provision(channel: &dyn AgentChannel, config: &AgentsConfig) -> Result<Self> {
        let registry = Self {
            chat: resolve(channel, config, &config.chat, "chat-agent", CHAT_INSTRUCTIONS).await?,
            extract: resolve(
                channel,
                config,
                &config.extract,
                "extract-agent",
                EXTRACT_INSTRUCTIONS,
            )
            .await?,
            summarize: resolve(
                channel,
                config,
                &config.summarize,
                "summarize-agent",
                SUMMARIZE_INSTRUCTIONS,
            )
            .await?,
            title: resolve(
                channel,
                config,
                &config.title,
                "title-agent",
                TITLE_INSTRUCTIONS,
            )
            .await?,
        };
        info!(
            chat = %registry.chat.id,
            extract = %registry.extract.id,
            summarize = %registry.summarize.id,
            title = %registry.title.id,
            "agent registry ready"
        );
        Ok(registry)
    }
}

async fn resolve(
    channel: &dyn AgentChannel,
    config: &AgentsConfig,
    agent: &StageAgentConfig,
    name: &str,
    instructions: &str,
) -> Result<AgentHandle> {
    if let Some(id) = &agent.id {
        return Ok(AgentHandle::new(id, name));
    }
    channel.create_agent(&config.model, name, instructions).await
}
