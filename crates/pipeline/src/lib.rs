//! The staged document pipeline: normalization, prompts, fallbacks, and
//! the orchestrator that chains extract → summarize → title without ever
//! letting a stage failure cross the pipeline boundary.

pub mod fallback;
pub mod normalize;
pub mod orchestrator;
pub mod prompt;

pub use orchestrator::{DocumentPipeline, PipelineError, PipelineResult};

/// One named step of the document pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Summarize,
    Title,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Summarize => "summarize",
            Stage::Title => "title",
        }
    }
}
