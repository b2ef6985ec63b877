//! High-level facade crate for the `qubit-response-*` workspace.
//!
//! This crate provides:
//! - re-exports of the grid primitives and the f01/f12 detector
//! - batch analysis of plotly-style figure files, in parallel with `rayon`
//! - (feature-gated) PNG export of annotated heatmaps
//!
//! ## Quickstart
//!
//! ```no_run
//! use qubit_response::batch::analyze_files;
//! use qubit_response::{DetectorParams, QubitResponseDetector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let params = DetectorParams::load_json("config.json")?;
//! let detector = QubitResponseDetector::new(params)?;
//!
//! for report in analyze_files(&["qubit_001.json"], &detector, None) {
//!     println!("{}: {:?}", report.qubit_id, report.record.f01_frequency);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `qubit_response::core`: grids, axes, standardization, region labeling.
//! - `qubit_response::detector`: parameters, detector, results, figure I/O.
//! - `qubit_response::batch`: per-file and multi-file analysis.
//! - `qubit_response::render` (feature `image`): heatmap and mask PNGs.

pub use qubit_response_core as core;
pub use qubit_response_detector as detector;

pub use qubit_response_detector::{
    DetectorParams, QubitResponse, QubitResponseDetector, QubitResponseError, ResultRecord, Status,
};

pub mod batch;

#[cfg(feature = "image")]
pub mod render;
