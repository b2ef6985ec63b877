//! Resonance detection for qubit spectroscopy maps.
//!
//! Given a phase-shift grid over frequency × drive level, the detector
//! - standardizes and thresholds the grid,
//! - keeps only regions hanging down from the top (highest-level) row,
//! - picks the tallest region as the f01 resonance and scores its prominence,
//! - searches a window below f01 for the f12 resonance.
//!
//! Grid types and segmentation primitives live in `qubit-response-core`.

mod detector;
mod io;

pub use detector::{
    Analysis, ConfigError, DetectorParams, MomentWeighting, QubitResponse, QubitResponseDetector,
    QubitResponseError, ResultRecord, Status, F01, F12,
};
pub use detector::{detect, quality_level, region_moment};
pub use io::{DetectorIoError, FigureDocument, FigureError, FigureLayout, FigureTitle, HeatmapTrace};

pub use qubit_response_core::{Axis, Cell, Grid, GridError, RegionId};
