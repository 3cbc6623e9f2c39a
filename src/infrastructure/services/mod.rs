//! Orchestration services

mod spotlight_service;

pub use spotlight_service::{response_channel, ResponseEvent, SpotlightService};
