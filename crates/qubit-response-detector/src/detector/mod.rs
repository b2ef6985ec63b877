//! Detection pipeline.
//!
//! This module wires together standardization, thresholding, region
//! labeling, the top-row boundary filter, f01 selection, moment scoring and
//! the f12 window search.

mod error;
mod moment;
mod params;
mod pipeline;
mod primary;
mod result;
mod secondary;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
pub(crate) use params::sample_params;

pub use error::{ConfigError, QubitResponseError};
pub use moment::{quality_level, region_moment};
pub use params::{DetectorParams, MomentWeighting};
pub use pipeline::{detect, Analysis, QubitResponseDetector};
pub use result::{QubitResponse, ResultRecord, Status, F01, F12};
