//! User-facing model identifier to vendor model name mapping.
//!
//! Loaded once per process from `res/model.json`. A missing or unparsable
//! file degrades to an empty mapping; every lookup then falls back to the
//! provider default. Load failures are logged, never fatal.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::OnceCell;

use crate::domain::DomainError;

/// Mapping value marking a privately hosted deployment.
pub const PRIVATE_MARKER: &str = "private";

const DEFAULT_MAPPING_PATH: &str = "res/model.json";

static GLOBAL: OnceCell<ModelMappings> = OnceCell::new();

/// Model identifier → vendor model name table.
#[derive(Debug, Clone, Default)]
pub struct ModelMappings {
    map: HashMap<String, String>,
}

impl ModelMappings {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_map(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        let map: HashMap<String, String> = serde_json::from_str(json).map_err(|e| {
            DomainError::configuration(format!("Invalid model mapping JSON: {}", e))
        })?;
        Ok(Self { map })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read model mapping file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Load from `path`, degrading to an empty mapping on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::from_path(path.as_ref()) {
            Ok(mappings) => mappings,
            Err(e) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    error = %e,
                    "Model mapping load failed, falling back to empty mapping"
                );
                Self::empty()
            }
        }
    }

    /// Process-wide mapping cache; first access loads `res/model.json`.
    /// Initialization is race-guarded and runs at most once.
    pub fn global() -> &'static ModelMappings {
        GLOBAL.get_or_init(|| Self::load_or_default(DEFAULT_MAPPING_PATH))
    }

    /// Vendor model name for `model_id`, if mapped.
    pub fn resolve(&self, model_id: &str) -> Option<&str> {
        self.map.get(model_id).map(String::as_str)
    }

    /// Whether `model_id` maps to a privately hosted deployment.
    pub fn is_private(&self, model_id: &str) -> bool {
        self.resolve(model_id) == Some(PRIVATE_MARKER)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
