//! Shortcut detection and placeholder expansion.
//!
//! Placeholders: `{content}` (argument text after the shortcut, clipboard
//! when no argument was typed), `{clipboard}`, `{date}` (`YYYY-MM-DD`),
//! `{time}` (`HH:MM:SS`, local clock).

use std::fmt::Debug;

use chrono::Local;

use super::settings::Template;

const CONTENT_PLACEHOLDER: &str = "{content}";
const CLIPBOARD_PLACEHOLDER: &str = "{clipboard}";
const DATE_PLACEHOLDER: &str = "{date}";
const TIME_PLACEHOLDER: &str = "{time}";

/// Source of clipboard text for the `{content}`/`{clipboard}` placeholders.
pub trait ClipboardReader: Send + Sync + Debug {
    /// `None` when the clipboard is unavailable or holds no text.
    fn read_text(&self) -> Option<String>;
}

/// Result of applying (or passing through) a shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateExpansion {
    pub text: String,
    pub response_key: Option<String>,
    pub applied: bool,
}

impl TemplateExpansion {
    fn pass_through(raw: &str) -> Self {
        Self {
            text: raw.to_string(),
            response_key: None,
            applied: false,
        }
    }
}

/// Expands `/shortcut` input against the stored template list.
#[derive(Debug)]
pub struct TemplateEngine<C: ClipboardReader> {
    clipboard: C,
}

impl<C: ClipboardReader> TemplateEngine<C> {
    pub fn new(clipboard: C) -> Self {
        Self { clipboard }
    }

    /// Expand `raw` if it names a stored shortcut.
    ///
    /// Input that does not start with `/`, and shortcuts with no stored
    /// template, pass through unchanged with `applied = false`. An unmatched
    /// shortcut is not an error.
    pub fn apply(&self, raw: &str, templates: &[Template]) -> TemplateExpansion {
        let Some(rest) = raw.strip_prefix('/') else {
            return TemplateExpansion::pass_through(raw);
        };

        let (shortcut, args) = match rest.split_once(char::is_whitespace) {
            Some((shortcut, args)) => (shortcut, args.trim()),
            None => (rest.trim(), ""),
        };

        let Some(template) = templates.iter().find(|t| t.shortcut == shortcut) else {
            return TemplateExpansion::pass_through(raw);
        };

        let mut text = template.body.clone();

        // Clipboard is read lazily and at most once per expansion.
        let mut clipboard_cache: Option<String> = None;
        let clipboard = |cache: &mut Option<String>| -> String {
            cache
                .get_or_insert_with(|| self.clipboard.read_text().unwrap_or_default())
                .clone()
        };

        if text.contains(CONTENT_PLACEHOLDER) {
            let content = if args.is_empty() {
                clipboard(&mut clipboard_cache)
            } else {
                args.to_string()
            };
            text = text.replace(CONTENT_PLACEHOLDER, &content);
        }

        if text.contains(CLIPBOARD_PLACEHOLDER) {
            let content = clipboard(&mut clipboard_cache);
            text = text.replace(CLIPBOARD_PLACEHOLDER, &content);
        }

        if text.contains(DATE_PLACEHOLDER) {
            text = text.replace(DATE_PLACEHOLDER, &Local::now().format("%Y-%m-%d").to_string());
        }

        if text.contains(TIME_PLACEHOLDER) {
            text = text.replace(TIME_PLACEHOLDER, &Local::now().format("%H:%M:%S").to_string());
        }

        TemplateExpansion {
            text,
            response_key: template.response_key.clone(),
            applied: true,
        }
    }
}
