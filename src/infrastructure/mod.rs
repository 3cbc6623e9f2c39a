//! Infrastructure layer - concrete implementations

pub mod clipboard;
pub mod llm;
pub mod logging;
pub mod services;
pub mod settings;

pub use clipboard::SystemClipboard;
pub use logging::init_logging;
pub use services::{ResponseEvent, SpotlightService};
pub use settings::{InMemorySettingsStore, SettingsValues};
