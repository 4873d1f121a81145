//! Sequences the document stages and absorbs their failures.
//!
//! Each stage feeds the next; a failed stage is replaced by its local
//! fallback and the chain continues. The only error that ever crosses the
//! pipeline boundary is a channel that was never available at all.

use std::{sync::Arc, time::Duration};

use {
    serde::Serialize,
    tracing::{info, warn},
};

use {
    docmill_agents::{AgentRegistry, AgentSession},
    docmill_channel::{AgentChannel, AgentHandle, ChannelError},
};

use crate::{
    Stage,
    fallback::fallback,
    normalize::{clean_title, normalize, title_candidate},
    prompt::stage_prompt,
};

/// Aggregate pipeline output. Every field is non-empty by construction
/// for non-empty input; the title degrades to a fixed literal otherwise.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub processed_text: String,
    pub summary: String,
    pub title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The first stage could not even open its exchange — the channel
    /// never became available, so there is no partial result to degrade to.
    #[error("agent channel unavailable: {source}")]
    ChannelUnavailable {
        #[source]
        source: ChannelError,
    },
}

/// Orchestrator for the extract → summarize → title document pipeline.
///
/// Holds only read-only state; concurrent `run` calls share nothing
/// mutable and stages within one call execute strictly in order.
pub struct DocumentPipeline {
    session: AgentSession,
    registry: Arc<AgentRegistry>,
}

impl DocumentPipeline {
    pub fn new(
        channel: Arc<dyn AgentChannel>,
        registry: Arc<AgentRegistry>,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            session: AgentSession::new(channel, stage_timeout),
            registry,
        }
    }

    /// Run the full document pipeline over raw text.
    pub async fn run(&self, raw_text: &str) -> Result<PipelineResult, PipelineError> {
        info!(chars = raw_text.len(), "document pipeline start");
        let cleaned = normalize(raw_text);

        let processed = self
            .run_stage(Stage::Extract, &self.registry.extract, &cleaned, raw_text, true)
            .await?;
        let summary = self
            .run_stage(
                Stage::Summarize,
                &self.registry.summarize,
                &processed,
                &processed,
                false,
            )
            .await?;
        let title_input = title_candidate(&summary);
        let title = self
            .run_stage(Stage::Title, &self.registry.title, &title_input, raw_text, false)
            .await?;

        info!(
            processed_chars = processed.len(),
            summary_chars = summary.len(),
            title = %title,
            "document pipeline complete"
        );
        Ok(PipelineResult {
            processed_text: processed,
            summary,
            title,
        })
    }

    /// Execute one stage, substituting its fallback on any stage-local
    /// failure. Only a channel error on the first stage escapes.
    async fn run_stage(
        &self,
        stage: Stage,
        agent: &AgentHandle,
        input: &str,
        fallback_basis: &str,
        first_stage: bool,
    ) -> Result<String, PipelineError> {
        let prompt = stage_prompt(stage, input);
        match self.session.execute(agent, &prompt).await {
            Ok(outcome) if outcome.succeeded => {
                let text = finish_stage_output(stage, &outcome.text);
                if text.is_empty() {
                    // Title cleanup can reduce a label-only response to
                    // nothing; that is an empty result like any other.
                    warn!(stage = stage.name(), "stage output empty after cleanup");
                    return Ok(fallback(stage, fallback_basis, &outcome.text));
                }
                Ok(text)
            },
            Ok(outcome) => {
                warn!(
                    stage = stage.name(),
                    error = outcome.error.as_deref().unwrap_or("unknown"),
                    "stage failed, substituting fallback"
                );
                Ok(fallback(stage, fallback_basis, &outcome.text))
            },
            Err(source) if first_stage => Err(PipelineError::ChannelUnavailable { source }),
            Err(e) => {
                warn!(
                    stage = stage.name(),
                    error = %e,
                    "channel error mid-pipeline, substituting fallback"
                );
                Ok(fallback(stage, fallback_basis, ""))
            },
        }
    }
}

fn finish_stage_output(stage: Stage, text: &str) -> String {
    match stage {
        Stage::Title => clean_title(text),
        Stage::Extract | Stage::Summarize => text.trim().to_string(),
    }
}
