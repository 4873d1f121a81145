//! Fixed instruction templates for the pipeline stages.

use crate::Stage;

/// Build the full prompt for a stage: its instruction template followed by
/// the stage input.
pub fn stage_prompt(stage: Stage, input: &str) -> String {
    format!("{}\n\n{input}", instruction(stage))
}

fn instruction(stage: Stage) -> &'static str {
    match stage {
        Stage::Extract => {
            "Process and clean the provided text while maintaining structure \
             and important information:"
        },
        Stage::Summarize => {
            "Create a clear and concise summary of this text, capturing the \
             main points:"
        },
        Stage::Title => {
            "Generate a clear, descriptive title (maximum 50 characters) for \
             this content:"
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_input_after_instruction() {
        let prompt = stage_prompt(Stage::Summarize, "body text");
        assert!(prompt.starts_with("Create a clear and concise summary"));
        assert!(prompt.ends_with("\n\nbody text"));
    }

    #[test]
    fn instructions_differ_per_stage() {
        let all = [Stage::Extract, Stage::Summarize, Stage::Title].map(instruction);
        assert_ne!(all[0], all[1]);
        assert_ne!(all[1], all[2]);
    }
}
