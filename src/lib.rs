// src/lib.rs
//! Menu photo → recognition service → dish list, with a staged loading
//! screen in between.

pub mod ai;
pub mod capture;
pub mod error;
pub mod presenter;
pub mod processing;

pub use ai::connector::DishExtractor;
pub use ai::dish::{Dish, DishList};
pub use ai::upload_client::UploadClient;
pub use capture::ImageRef;
pub use error::ProcessingError;
pub use presenter::{Navigator, ResultsPayload, TerminalPresenter};
pub use processing::{
    ProcessingConfig, ProcessingOrchestrator, ProgressState, RunOutcome, Stage, StageTimings,
    TeardownHandle,
};
