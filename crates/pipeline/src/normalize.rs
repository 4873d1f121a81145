//! Pure text-cleaning transforms.
//!
//! Used both as pre-processing before the extract stage and as the
//! degraded output when that stage fails, so every function here is total
//! and idempotent: a second pass over its own output changes nothing.

use std::sync::LazyLock;

use regex::Regex;

/// Bracketed field-code artifacts left over from document conversion,
/// e.g. `[PAGE]`, `[TOC 1-3]`.
#[allow(clippy::unwrap_used, clippy::expect_used)]
static FIELD_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[\w \-]+\]").unwrap());

/// Leading label phrases models prepend to generated titles.
#[allow(clippy::unwrap_used, clippy::expect_used)]
static TITLE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(title:|the title is:|here'?s?( a)? title:?)\s*").unwrap()
});

/// Clean raw document text while preserving paragraph structure.
///
/// Transform order matters:
/// - line/paragraph separators (U+2028, U+2029, NEL) become spaces before
///   control stripping would delete them outright;
/// - bullets are replaced before field codes are removed, so a bracketed
///   bullet cannot surface a fresh field-code match on a later pass;
/// - whitespace is collapsed within lines first, and runs of blank lines
///   are reduced afterwards, so paragraph breaks survive the collapse.
pub fn normalize(text: &str) -> String {
    let text: String = text
        .chars()
        .map(|c| match c {
            '\u{2028}' | '\u{2029}' | '\u{0085}' => ' ',
            '•' | '●' | '■' => '-',
            other => other,
        })
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect();
    let text = FIELD_CODE.replace_all(&text, "");
    let text = collapse_intra_line_whitespace(&text);
    let text = collapse_blank_lines(&text);
    text.trim().to_string()
}

/// Reduce the input to title-candidate material: the first 5 non-empty
/// lines, with intra-line whitespace collapsed.
pub fn title_candidate(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| !c.is_control() || c == '\n')
        .collect();
    cleaned
        .lines()
        .map(collapse_intra_line_whitespace)
        .filter(|line| !line.trim().is_empty())
        .take(5)
        .map(|line| line.trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip label phrases, quotes, and embedded newlines from a generated
/// title. Returns an empty string when nothing usable remains.
pub fn clean_title(text: &str) -> String {
    let unlabeled = TITLE_LABEL.replace(text, "");
    let flat: String = unlabeled
        .chars()
        .filter(|&c| c != '"' && c != '\'')
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    collapse_all_whitespace(&flat).trim().to_string()
}

/// Collapse runs of spaces and tabs to a single space, leaving newlines
/// untouched.
fn collapse_intra_line_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = false;
    for c in text.chars() {
        if c == ' ' || c == '\t' {
            in_gap = true;
            continue;
        }
        if in_gap {
            out.push(' ');
            in_gap = false;
        }
        out.push(c);
    }
    if in_gap {
        out.push(' ');
    }
    out
}

/// Reduce whitespace runs containing 3+ newlines to exactly one blank
/// line; smaller runs pass through unchanged.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();
    for c in text.chars() {
        if c.is_whitespace() {
            run.push(c);
            continue;
        }
        flush_whitespace_run(&mut out, &run);
        run.clear();
        out.push(c);
    }
    flush_whitespace_run(&mut out, &run);
    out
}

fn flush_whitespace_run(out: &mut String, run: &str) {
    if run.chars().filter(|&c| c == '\n').count() >= 3 {
        out.push_str("\n\n");
    } else {
        out.push_str(run);
    }
}

fn collapse_all_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = false;
    for c in text.chars() {
        if c.is_whitespace() {
            in_gap = true;
            continue;
        }
        if in_gap && !out.is_empty() {
            out.push(' ');
        }
        in_gap = false;
        out.push(c);
    }
    out
}
