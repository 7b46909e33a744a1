// src/processing/stage.rs
use serde::Serialize;
use std::fmt;

/// One phase of the menu-processing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    Upload,
    Ocr,
    Enrichment,
    Completion,
    Error,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Upload,
        Stage::Ocr,
        Stage::Enrichment,
        Stage::Completion,
        Stage::Error,
    ];

    /// Progress shown when the stage is entered. `None` for `Error`, which
    /// leaves the bar wherever the run got to.
    pub fn percent(self) -> Option<u8> {
        match self {
            Stage::Upload => Some(20),
            Stage::Ocr => Some(45),
            Stage::Enrichment => Some(75),
            Stage::Completion => Some(100),
            Stage::Error => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Upload => "upload",
            Stage::Ocr => "ocr",
            Stage::Enrichment => "enrichment",
            Stage::Completion => "completion",
            Stage::Error => "error",
        };
        f.write_str(label)
    }
}

/// What the loading view renders. Only the orchestrator (and the cycler it
/// owns) writes this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub stage: Stage,
    pub percent: u8,
    pub status_text: String,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            stage: Stage::Upload,
            percent: 0,
            status_text: String::new(),
        }
    }
}

impl ProgressState {
    /// Move to `stage`. Percent never goes backwards within a run.
    pub fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        if let Some(percent) = stage.percent() {
            self.percent = self.percent.max(percent);
        }
    }
}
