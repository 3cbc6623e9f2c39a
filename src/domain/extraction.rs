//! Pulls a structured JSON object out of free-form model output.
//!
//! Fenced code blocks are tried first, in order of appearance; only if none
//! parses does the raw text get scanned for brace-delimited candidates.

use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};
use regex::Regex;
use serde_json::Value;

/// Brace-delimited candidates with at most one level of nested braces. Deeper
/// nesting is out of scope for the direct scan, matching the fenced-block
/// fallback role it plays.
static BRACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^{}]*(?:\{[^{}]*\})*[^{}]*\}").unwrap());

/// Fence-delimited spans, with or without a language tag. Catches fences the
/// markdown parser rejects, e.g. backticks that do not start a line.
static FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:[A-Za-z0-9_+-]+)?\s*(.*?)```").unwrap());

/// Extract the first valid JSON value from markdown or plain text.
///
/// Returns `None` for empty input, for text with no parsable candidate, and
/// for candidates that parse to JSON `null`. A `0` or `false` is still a
/// found value. Never errors.
pub fn extract_json(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }

    for block in fenced_code_blocks(text) {
        if let Some(value) = parse_non_null(block.trim()) {
            return Some(value);
        }
    }

    for span in FENCE_PATTERN.captures_iter(text) {
        if let Some(value) = parse_non_null(span[1].trim()) {
            return Some(value);
        }
    }

    for candidate in BRACE_PATTERN.find_iter(text) {
        if let Some(value) = parse_non_null(candidate.as_str()) {
            return Some(value);
        }
    }

    None
}

fn parse_non_null(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Null) | Err(_) => None,
        Ok(value) => Some(value),
    }
}

/// Inner text of fenced code blocks (with or without a language tag), in
/// order of appearance. Indented code blocks are not considered fenced.
fn fenced_code_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => {
                current = Some(String::new());
            }
            Event::End(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            Event::Text(t) => {
                if let Some(ref mut block) = current {
                    block.push_str(&t);
                }
            }
            _ => {}
        }
    }

    blocks
}
