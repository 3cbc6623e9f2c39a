use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// A saved prompt template, triggered by a `/shortcut` prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Unique lookup key, typed by the user after the slash.
    pub shortcut: String,
    pub name: String,
    /// Body text with zero or more placeholders.
    pub body: String,
    /// Field to pull out of the model's JSON reply, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_key: Option<String>,
    /// Global hotkey bound by the UI collaborator; opaque here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<String>,
}

impl Template {
    pub fn new(
        shortcut: impl Into<String>,
        name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            shortcut: shortcut.into(),
            name: name.into(),
            body: body.into(),
            response_key: None,
            hotkey: None,
        }
    }

    pub fn with_response_key(mut self, key: impl Into<String>) -> Self {
        self.response_key = Some(key.into());
        self
    }

    pub fn with_hotkey(mut self, hotkey: impl Into<String>) -> Self {
        self.hotkey = Some(hotkey.into());
        self
    }
}

/// Read side of the persisted-settings collaborator.
///
/// The core only reads: `api_key`, `model`, `host_url` at client
/// construction, `templates` at shortcut-expansion time. Writes stay with the
/// UI layer.
pub trait SettingsStore: Send + Sync + Debug {
    fn api_key(&self) -> String;
    fn model(&self) -> String;
    fn host_url(&self) -> Option<String>;
    fn hotkey(&self) -> String;
    fn templates(&self) -> Vec<Template>;
}
