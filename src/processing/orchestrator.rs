// src/processing/orchestrator.rs
//! Drives one menu photo through upload, OCR, enrichment and completion.
//!
//! The upload runs concurrently with a cosmetic timer that moves the label
//! from Upload to OCR; the real completion always ends that race. Every timer
//! of a run lives in its `RunContext` and is released on the terminal
//! transition, on teardown, or when the run future is dropped.

use anyhow::Result;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

use super::config::{ProcessingConfig, StageTimings, ERROR_STATUS};
use super::messages::{StageMessages, StatusEmitter, StatusMessageCycler};
use super::stage::{ProgressState, Stage};
use crate::ai::connector::DishExtractor;
use crate::ai::dish::DishList;
use crate::ai::upload_client::UploadClient;
use crate::capture::ImageRef;
use crate::error::ProcessingError;
use crate::presenter::{Navigator, ResultsPayload};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Results were handed to the navigator.
    Navigated { dish_count: usize },
    /// The run failed and the navigator was sent back.
    FellBack(ProcessingError),
    /// The owner tore the orchestrator down; no navigation happened.
    Cancelled,
}

/// Signals the owning view is gone. Any active run stops at its next
/// suspension point and later runs end immediately.
#[derive(Clone)]
pub struct TeardownHandle(Arc<watch::Sender<bool>>);

impl TeardownHandle {
    pub fn tear_down(&self) {
        self.0.send_replace(true);
    }

    pub fn is_torn_down(&self) -> bool {
        *self.0.borrow()
    }
}

pub struct ProcessingOrchestrator {
    extractor: Arc<dyn DishExtractor>,
    navigator: Arc<dyn Navigator>,
    timings: StageTimings,
    messages: StageMessages,
    progress: Arc<watch::Sender<ProgressState>>,
    teardown: Arc<watch::Sender<bool>>,
}

/// Per-run state: the status cycler, the progress writer and the teardown
/// signal. Dropping it cancels every outstanding timer of the run.
struct RunContext {
    cycler: StatusMessageCycler,
    progress: Arc<watch::Sender<ProgressState>>,
    teardown: watch::Receiver<bool>,
}

struct TornDown;

impl RunContext {
    fn enter(&mut self, stage: Stage) {
        self.progress.send_modify(|p| p.enter(stage));
        info!("Stage -> {} ({}%)", stage, self.progress.borrow().percent);
        self.cycler.start(stage);
    }

    fn enter_error(&mut self, status: &str) {
        self.cycler.stop();
        self.progress.send_modify(|p| {
            p.enter(Stage::Error);
            p.status_text = status.to_string();
        });
        info!("Stage -> {}", Stage::Error);
    }

    async fn torn_down(&mut self) {
        let closed = self.teardown.wait_for(|down| *down).await.is_err();
        if closed {
            // Sender gone means nobody can tear us down any more.
            std::future::pending::<()>().await;
        }
    }

    async fn pause(&mut self, delay: Duration) -> Result<(), TornDown> {
        tokio::select! {
            biased;
            _ = self.torn_down() => Err(TornDown),
            _ = sleep(delay) => Ok(()),
        }
    }

    fn release(&mut self) {
        self.cycler.stop();
    }
}

impl ProcessingOrchestrator {
    pub fn new(
        extractor: Arc<dyn DishExtractor>,
        navigator: Arc<dyn Navigator>,
        timings: StageTimings,
        messages: StageMessages,
    ) -> Self {
        let (progress, _) = watch::channel(ProgressState::default());
        let (teardown, _) = watch::channel(false);
        Self {
            extractor,
            navigator,
            timings,
            messages,
            progress: Arc::new(progress),
            teardown: Arc::new(teardown),
        }
    }

    /// Wire the real upload client from configuration.
    pub fn from_config(config: &ProcessingConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let client = UploadClient::new(&config.base_url)?;
        Ok(Self::new(
            Arc::new(client),
            navigator,
            config.timings,
            config.messages.clone(),
        ))
    }

    /// Live view of the loading screen state.
    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.progress.subscribe()
    }

    pub fn progress(&self) -> ProgressState {
        self.progress.borrow().clone()
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        TeardownHandle(Arc::clone(&self.teardown))
    }

    /// Process one menu photo to its terminal transition.
    ///
    /// Taking `&mut self` keeps a single run in flight per orchestrator.
    pub async fn run(&mut self, image: Option<ImageRef>) -> RunOutcome {
        let mut ctx = self.begin_run();
        let already_down = *ctx.teardown.borrow();
        if already_down {
            warn!("Orchestrator already torn down; not starting a run");
            return Self::cancel(ctx);
        }

        let Some(image) = image else {
            return self.fall_back(ctx, ProcessingError::MissingInput).await;
        };

        ctx.enter(Stage::Upload);

        let result = {
            let upload = self.extractor.submit(&image);
            tokio::pin!(upload);
            let ocr_timer = sleep(self.timings.upload_to_ocr);
            tokio::pin!(ocr_timer);
            let mut ocr_shown = false;

            loop {
                tokio::select! {
                    biased;
                    _ = ctx.torn_down() => return Self::cancel(ctx),
                    result = &mut upload => break result,
                    _ = &mut ocr_timer, if !ocr_shown => {
                        ocr_shown = true;
                        ctx.enter(Stage::Ocr);
                    }
                }
            }
        };

        match result {
            Ok(dishes) => self.complete(ctx, image, dishes).await,
            Err(e) => self.fall_back(ctx, e).await,
        }
    }

    fn begin_run(&self) -> RunContext {
        self.progress.send_replace(ProgressState::default());

        RunContext {
            cycler: StatusMessageCycler::new(
                self.messages.clone(),
                self.timings.message_interval,
                progress_emitter(Arc::clone(&self.progress)),
            ),
            progress: Arc::clone(&self.progress),
            teardown: self.teardown.subscribe(),
        }
    }

    async fn complete(&self, mut ctx: RunContext, image: ImageRef, dishes: DishList) -> RunOutcome {
        ctx.enter(Stage::Enrichment);
        if ctx.pause(self.timings.enrichment_to_completion).await.is_err() {
            return Self::cancel(ctx);
        }

        ctx.enter(Stage::Completion);
        if ctx.pause(self.timings.completion_to_navigate).await.is_err() {
            return Self::cancel(ctx);
        }

        ctx.release();
        let dish_count = dishes.len();
        info!("Navigating to results with {} dish(es)", dish_count);
        self.navigator.show_results(ResultsPayload {
            results: dishes,
            image_uri: image,
        });
        RunOutcome::Navigated { dish_count }
    }

    async fn fall_back(&self, mut ctx: RunContext, err: ProcessingError) -> RunOutcome {
        error!("Menu processing failed: {}", err);

        let status = self
            .messages
            .for_stage(Stage::Error)
            .first()
            .map(String::as_str)
            .unwrap_or(ERROR_STATUS);
        ctx.enter_error(status);

        if ctx.pause(self.timings.error_to_back).await.is_err() {
            return Self::cancel(ctx);
        }

        ctx.release();
        self.navigator.go_back();
        RunOutcome::FellBack(err)
    }

    fn cancel(mut ctx: RunContext) -> RunOutcome {
        ctx.release();
        info!("Run torn down before reaching a terminal screen");
        RunOutcome::Cancelled
    }
}

/// Status lines only land on the stage they were cycled for. A line from a
/// stage already left, or any line once Error is showing, is dropped.
fn progress_emitter(writer: Arc<watch::Sender<ProgressState>>) -> StatusEmitter {
    Arc::new(move |stage: Stage, line: &str| {
        writer.send_if_modified(|p| {
            if p.stage != stage {
                return false;
            }
            p.status_text = line.to_string();
            true
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_from_a_left_stage_are_dropped() {
        let (tx, rx) = watch::channel(ProgressState::default());
        let tx = Arc::new(tx);
        let emit = progress_emitter(Arc::clone(&tx));

        tx.send_modify(|p| p.enter(Stage::Ocr));
        emit(Stage::Ocr, "Reading the menu...");
        tx.send_modify(|p| p.enter(Stage::Enrichment));
        emit(Stage::Enrichment, "Enriching dishes...");
        emit(Stage::Ocr, "Spotting dish names...");

        let p = rx.borrow().clone();
        assert_eq!(p.stage, Stage::Enrichment);
        assert_eq!(p.status_text, "Enriching dishes...");
    }

    #[test]
    fn error_status_is_never_overwritten() {
        let (tx, rx) = watch::channel(ProgressState::default());
        let tx = Arc::new(tx);
        let emit = progress_emitter(Arc::clone(&tx));

        tx.send_modify(|p| {
            p.enter(Stage::Error);
            p.status_text = ERROR_STATUS.to_string();
        });
        emit(Stage::Upload, "Uploading image...");
        emit(Stage::Ocr, "Reading the menu...");

        assert_eq!(rx.borrow().status_text, ERROR_STATUS);
    }
}
