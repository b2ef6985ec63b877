//! Core types and utilities for qubit spectroscopy map analysis.
//!
//! This crate knows nothing about f01/f12 semantics. It provides:
//! - validated frequency × level grids ([`Grid`], [`Axis`]),
//! - z-score standardization and two-sided sigma thresholding,
//! - 4-connected region labeling with a compact region arena,
//! - the top-row boundary filter used to reject noise regions,
//! - a minimal `log` backend (and an optional `tracing` subscriber).

mod grid;
mod labeling;
mod logger;
mod standardize;
mod threshold;

pub use grid::{Axis, AxisError, Grid, GridError, Plane};
pub use labeling::{label_components, retain_top_connected, Cell, Region, RegionId, Regions};
pub use standardize::{mean_std, standardize, SampleMoments, StandardizeError, MIN_STD_DEV};
pub use threshold::{binarize, SigmaThresholds};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, parse_level_filter};
