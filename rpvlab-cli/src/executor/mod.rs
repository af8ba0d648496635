//! Analysis Executor
//!
//! Runs one comparison and renders it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! GroupInput x 2 (CLI flags + rpvlab.toml)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  analysis   │  Derive metrics, sample, summarise
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build Report with run metadata
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output + ASCII histogram
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`analysis`] - Metric derivation and sampling with progress display
//! - [`report`] - Report building
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - System metadata collection
//! - [`methodology`] - Description of how the numbers are computed

mod analysis;
mod formatting;
mod metadata;
mod methodology;
mod report;

// Re-export public API
pub use analysis::{AnalysisInputs, ProgressBarReporter, run_analysis};
pub use formatting::{HumanOptions, format_human_output, render_histogram};
pub use methodology::methodology_text;
pub use report::build_report;
