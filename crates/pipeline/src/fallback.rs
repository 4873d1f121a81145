//! Deterministic per-stage fallbacks.
//!
//! These are the correctness backstop for the pipeline's "always
//! non-empty" guarantee: whenever a stage fails or returns nothing
//! usable, its fallback derives substitute output locally from text the
//! pipeline already holds.

use tracing::debug;

use crate::{Stage, normalize::normalize};

/// Upper bound on a fallback summary, ellipsis included.
const SUMMARY_MAX_CHARS: usize = 1000;

/// Maximum title length in characters.
const TITLE_MAX_CHARS: usize = 50;

const UNTITLED: &str = "Untitled Document";

/// Compute the substitute output for a failed stage.
///
/// `basis` is the text the fallback derives from: the raw document for
/// extract and title, the stage's own input for summarize. The attempted
/// output is only recorded for diagnostics — partial remote text is never
/// good enough to ship as-is.
pub fn fallback(stage: Stage, basis: &str, attempted: &str) -> String {
    debug!(
        stage = stage.name(),
        attempted_chars = attempted.len(),
        "substituting local fallback"
    );
    match stage {
        Stage::Extract => cleaned_text(basis),
        Stage::Summarize => basic_summary(basis),
        Stage::Title => fallback_title(basis),
    }
}

/// Extract fallback: the normalized document, or the raw text when
/// normalization leaves nothing (pathological all-artifact input).
fn cleaned_text(basis: &str) -> String {
    let cleaned = normalize(basis);
    if cleaned.is_empty() {
        basis.trim().to_string()
    } else {
        cleaned
    }
}

/// Summarize fallback: the first few sentences, bounded.
fn basic_summary(basis: &str) -> String {
    let sentences: Vec<&str> = basis
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(3)
        .collect();
    let joined = sentences.join(". ");
    if joined.is_empty() {
        return basis.trim().to_string();
    }
    if joined.chars().count() > SUMMARY_MAX_CHARS {
        let cut: String = joined.chars().take(SUMMARY_MAX_CHARS - 3).collect();
        format!("{}...", cut.trim_end())
    } else {
        format!("{joined}.")
    }
}

/// Title fallback: the first non-empty line of the original document,
/// cut before its first sentence terminator, capped at 50 characters.
fn fallback_title(basis: &str) -> String {
    let Some(line) = basis.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return UNTITLED.to_string();
    };
    let head = line
        .split_once(['.', '!', '?'])
        .map(|(head, _)| head)
        .unwrap_or(line);
    let truncated: String = head.chars().take(TITLE_MAX_CHARS).collect();
    let title = truncated.trim();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}
