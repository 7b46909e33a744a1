// src/processing/mod.rs
pub mod config;
pub mod messages;
pub mod orchestrator;
pub mod stage;

pub use config::{ProcessingConfig, StageTimings};
pub use orchestrator::{ProcessingOrchestrator, RunOutcome, TeardownHandle};
pub use stage::{ProgressState, Stage};
