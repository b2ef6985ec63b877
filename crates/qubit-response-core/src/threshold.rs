//! Two-sided sigma thresholding of z-score planes.

use serde::{Deserialize, Serialize};

use crate::grid::Plane;

/// Sigma cutoffs: a cell is foreground when `z > plus` or `z < minus`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SigmaThresholds {
    pub plus: f64,
    pub minus: f64,
}

impl SigmaThresholds {
    #[inline]
    pub fn is_foreground(&self, z: f64) -> bool {
        z > self.plus || z < self.minus
    }
}

/// Threshold a z-score plane into a foreground mask.
pub fn binarize(z: &Plane<f64>, thresholds: SigmaThresholds) -> Plane<bool> {
    let mask = z.map(|v| thresholds.is_foreground(v));
    log::debug!(
        "binarize: {} of {} cells outside ({}, {}) sigma",
        mask.data.iter().filter(|&&on| on).count(),
        mask.data.len(),
        thresholds.minus,
        thresholds.plus
    );
    mask
}
