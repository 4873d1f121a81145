use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocmillConfig {
    pub channel: ChannelConfig,
    pub agents: AgentsConfig,
    pub pipeline: PipelineConfig,
}

/// Remote agent service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Base URL of the threads/runs API.
    pub base_url: String,
    /// Bearer token for the API (optional for local endpoints).
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<Secret<String>>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8642/v1".into(),
            api_key: None,
        }
    }
}

/// Agent provisioning configuration.
///
/// Each stage agent is created at startup with its built-in instructions
/// unless an existing agent id is pinned here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Model used when provisioning agents.
    pub model: String,
    pub chat: StageAgentConfig,
    pub extract: StageAgentConfig,
    pub summarize: StageAgentConfig,
    pub title: StageAgentConfig,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            chat: StageAgentConfig::default(),
            extract: StageAgentConfig::default(),
            summarize: StageAgentConfig::default(),
            title: StageAgentConfig::default(),
        }
    }
}

/// Per-agent overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StageAgentConfig {
    /// Existing agent id; when set, provisioning skips creation.
    pub id: Option<String>,
}

/// Pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bounded wait per stage exchange, in seconds. A stage that exceeds
    /// it is treated as a stream that ended without completing.
    pub stage_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout_secs: 120,
        }
    }
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let cfg = DocmillConfig::default();
        assert!(cfg.channel.base_url.starts_with("http"));
        assert_eq!(cfg.agents.model, "gpt-4o-mini");
        assert_eq!(cfg.pipeline.stage_timeout_secs, 120);
        assert!(cfg.agents.extract.id.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: DocmillConfig = toml::from_str(
            r#"
            [channel]
            base_url = "https://agents.example.com/v1"

            [agents.title]
            id = "agent_title_7"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.channel.base_url, "https://agents.example.com/v1");
        assert_eq!(cfg.agents.title.id.as_deref(), Some("agent_title_7"));
        assert!(cfg.agents.chat.id.is_none());
        assert_eq!(cfg.pipeline.stage_timeout_secs, 120);
    }

    #[test]
    fn api_key_round_trips_through_toml() {
        let cfg: DocmillConfig = toml::from_str(
            r#"
            [channel]
            api_key = "sk-secret"
            "#,
        )
        .unwrap();
        let serialized = toml::to_string(&cfg).unwrap();
        assert!(serialized.contains("sk-secret"));
    }
}
