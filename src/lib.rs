//! pr-copilot library crate: a client for a pull request analysis service.
//!
//! The library validates a GitHub repository URL and pull request number,
//! submits them to the analysis service, and keeps the resulting state in a
//! [`Session`] driven by the [`RequestController`]. Persisted inputs, the
//! clipboard, and the service itself sit behind small traits so the
//! controller can run against in-memory collaborators.

pub mod analysis;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod session;
pub mod storage;
pub mod telemetry;

pub use analysis::{
    AnalysisReport, AnalysisRequest, AnalysisService, HttpAnalysisService, RiskSummary,
};
pub use clipboard::{ClipboardSink, SystemClipboard};
pub use config::CopilotConfig;
pub use controller::{ControllerTimings, RequestController, SubmissionPhase};
pub use error::CopilotError;
pub use session::{ProgressEstimate, Session, Theme};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageKey};
