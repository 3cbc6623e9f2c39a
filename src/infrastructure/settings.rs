use std::sync::RwLock;

use crate::domain::settings::{SettingsStore, Template};

/// Values held by the settings collaborator, with the shipped defaults.
#[derive(Debug, Clone)]
pub struct SettingsValues {
    pub api_key: String,
    pub model: String,
    pub host_url: String,
    pub hotkey: String,
    pub templates: Vec<Template>,
}

impl Default for SettingsValues {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-1-5-pro".to_string(),
            host_url: String::new(),
            hotkey: "Shift+Space".to_string(),
            templates: Vec::new(),
        }
    }
}

/// In-memory settings store. The UI collaborator owns writes; the core only
/// reads through [`SettingsStore`].
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    values: RwLock<SettingsValues>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: SettingsValues) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    pub fn set_api_key(&self, api_key: impl Into<String>) {
        self.values.write().unwrap().api_key = api_key.into();
    }

    pub fn set_model(&self, model: impl Into<String>) {
        self.values.write().unwrap().model = model.into();
    }

    pub fn set_host_url(&self, host_url: impl Into<String>) {
        self.values.write().unwrap().host_url = host_url.into();
    }

    pub fn set_hotkey(&self, hotkey: impl Into<String>) {
        self.values.write().unwrap().hotkey = hotkey.into();
    }

    pub fn set_templates(&self, templates: Vec<Template>) {
        self.values.write().unwrap().templates = templates;
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn api_key(&self) -> String {
        self.values.read().unwrap().api_key.clone()
    }

    fn model(&self) -> String {
        self.values.read().unwrap().model.clone()
    }

    fn host_url(&self) -> Option<String> {
        let url = self.values.read().unwrap().host_url.clone();
        if url.is_empty() { None } else { Some(url) }
    }

    fn hotkey(&self) -> String {
        self.values.read().unwrap().hotkey.clone()
    }

    fn templates(&self) -> Vec<Template> {
        self.values.read().unwrap().templates.clone()
    }
}
