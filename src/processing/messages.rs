// src/processing/messages.rs
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use super::config::ERROR_STATUS;
use super::stage::Stage;
use crate::error::ProcessingError;

/// Receives every status line the cycler emits, tagged with the stage whose
/// set it came from. A ticker aborted mid-emit may still deliver one line of
/// an old stage; receivers drop lines whose stage is no longer current.
pub type StatusEmitter = Arc<dyn Fn(Stage, &str) + Send + Sync>;

/// Static table of status lines per stage. Every set is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMessages {
    sets: [Vec<String>; 5],
}

impl Default for StageMessages {
    fn default() -> Self {
        let owned = |lines: &[&str]| lines.iter().map(|l| l.to_string()).collect::<Vec<_>>();
        Self {
            sets: [
                owned(&[
                    "Uploading image...",
                    "Sending your menu to the kitchen...",
                    "Making sure nothing got lost in transit...",
                ]),
                owned(&[
                    "Processing with OCR...",
                    "Reading the menu...",
                    "Spotting dish names...",
                    "Deciphering the chef's handwriting...",
                ]),
                owned(&[
                    "Enriching dishes...",
                    "Looking up descriptions...",
                    "Tagging dietary information...",
                    "Finding pictures of each dish...",
                ]),
                owned(&["Analysis complete!"]),
                owned(&[ERROR_STATUS]),
            ],
        }
    }
}

impl StageMessages {
    /// Replace the set for `stage`. Empty sets are rejected.
    pub fn with_messages<I, S>(mut self, stage: Stage, messages: I) -> Result<Self, ProcessingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages: Vec<String> = messages.into_iter().map(Into::into).collect();
        if messages.is_empty() {
            return Err(ProcessingError::EmptyMessageSet(stage));
        }
        self.sets[slot(stage)] = messages;
        Ok(self)
    }

    pub fn for_stage(&self, stage: Stage) -> &[String] {
        &self.sets[slot(stage)]
    }
}

fn slot(stage: Stage) -> usize {
    match stage {
        Stage::Upload => 0,
        Stage::Ocr => 1,
        Stage::Enrichment => 2,
        Stage::Completion => 3,
        Stage::Error => 4,
    }
}

/// Rotates through a stage's status lines on a fixed interval.
///
/// The recurrence is a spawned task whose handle the cycler owns, so it dies
/// with `stop()`, a restart, or the cycler itself being dropped.
pub struct StatusMessageCycler {
    messages: StageMessages,
    interval: Duration,
    emit: StatusEmitter,
    ticker: Option<JoinHandle<()>>,
}

impl StatusMessageCycler {
    pub fn new(messages: StageMessages, interval: Duration, emit: StatusEmitter) -> Self {
        Self {
            messages,
            interval,
            emit,
            ticker: None,
        }
    }

    /// Emit the first line of `stage` now and the following ones every
    /// interval, wrapping around. Any previous cycling is cancelled.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, stage: Stage) {
        self.stop();

        let set: Arc<[String]> = self.messages.for_stage(stage).into();
        debug!("Status [{}]: {}", stage, set[0]);
        (self.emit)(stage, set[0].as_str());

        if self.interval.is_zero() {
            return;
        }

        let emit = Arc::clone(&self.emit);
        let period = self.interval;
        let first_tick = Instant::now() + period;
        self.ticker = Some(tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, period);
            let mut index = 0;
            loop {
                ticker.tick().await;
                index = (index + 1) % set.len();
                debug!("Status [{}]: {}", stage, set[index]);
                emit(stage, set[index].as_str());
            }
        }));
    }

    /// Cancel the recurrence. Safe to call when nothing is scheduled.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }
}

impl Drop for StatusMessageCycler {
    fn drop(&mut self) {
        self.stop();
    }
}
