use qubit_response_core::SigmaThresholds;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// How each member cell contributes to the f01 moment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentWeighting {
    /// `arm * |sample|` per cell.
    #[default]
    Cell,
    /// `arm * |sample| * level spacing of the cell's row`, i.e. the moment
    /// integrated over the level axis. Useful for unevenly spaced sweeps.
    RowSpacing,
}

/// Configuration for the resonance detector.
///
/// Level quantities (`top_level`, heights) are in level-axis units, distances
/// in frequency-axis units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorParams {
    /// Foreground when `z > binarize_threshold_sigma_plus`.
    pub binarize_threshold_sigma_plus: f64,
    /// Foreground when `z < binarize_threshold_sigma_minus`.
    pub binarize_threshold_sigma_minus: f64,
    /// Level-axis pivot that heights and moment arms are measured from.
    ///
    /// Must not be below the highest level of the analyzed grid.
    #[serde(alias = "top_power")]
    pub top_level: f64,
    /// Minimal height of the tallest region for f01 to be reported.
    pub f01_height_min: f64,
    /// Strictly ascending moment thresholds; `k` thresholds give levels `0..=k`.
    pub f01_moment_thresholds: Vec<f64>,
    /// f12 must lie at least this far below f01.
    pub f12_distance_min: f64,
    /// f12 must lie at most this far below f01.
    pub f12_distance_max: f64,
    /// Minimal height of the region containing f12.
    pub f12_height_min: f64,
    #[serde(default)]
    pub moment_weighting: MomentWeighting,
}

impl DetectorParams {
    /// Check every field; the first violation is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("binarize_threshold_sigma_plus", self.binarize_threshold_sigma_plus),
            ("binarize_threshold_sigma_minus", self.binarize_threshold_sigma_minus),
            ("top_level", self.top_level),
            ("f01_height_min", self.f01_height_min),
            ("f12_distance_min", self.f12_distance_min),
            ("f12_distance_max", self.f12_distance_max),
            ("f12_height_min", self.f12_height_min),
        ];
        if let Some(&(field, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite { field });
        }

        if self.binarize_threshold_sigma_plus <= 0.0 {
            return Err(ConfigError::SigmaPlus(self.binarize_threshold_sigma_plus));
        }
        if self.binarize_threshold_sigma_minus >= 0.0 {
            return Err(ConfigError::SigmaMinus(self.binarize_threshold_sigma_minus));
        }
        if self.f01_height_min <= 0.0 {
            return Err(ConfigError::F01HeightMin(self.f01_height_min));
        }

        let thresholds = &self.f01_moment_thresholds;
        if thresholds.is_empty() {
            return Err(ConfigError::EmptyThresholds);
        }
        if thresholds.iter().any(|t| !t.is_finite()) {
            return Err(ConfigError::NonFinite {
                field: "f01_moment_thresholds",
            });
        }
        if let Some(i) = thresholds.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ConfigError::ThresholdsNotAscending { index: i + 1 });
        }

        if self.f12_distance_min < 0.0 || self.f12_distance_min > self.f12_distance_max {
            return Err(ConfigError::DistanceRange {
                min: self.f12_distance_min,
                max: self.f12_distance_max,
            });
        }
        if self.f12_height_min <= 0.0 {
            return Err(ConfigError::F12HeightMin(self.f12_height_min));
        }
        Ok(())
    }

    /// Number of distinct quality levels (`thresholds + 1`).
    #[inline]
    pub fn quality_levels(&self) -> usize {
        self.f01_moment_thresholds.len() + 1
    }

    #[inline]
    pub fn sigma_thresholds(&self) -> SigmaThresholds {
        SigmaThresholds {
            plus: self.binarize_threshold_sigma_plus,
            minus: self.binarize_threshold_sigma_minus,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_params() -> DetectorParams {
    DetectorParams {
        binarize_threshold_sigma_plus: 2.0,
        binarize_threshold_sigma_minus: -2.0,
        top_level: 0.0,
        f01_height_min: 5.0,
        f01_moment_thresholds: vec![100.0, 1000.0, 10000.0],
        f12_distance_min: 0.05,
        f12_distance_max: 0.3,
        f12_height_min: 5.0,
        moment_weighting: MomentWeighting::Cell,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_params_are_valid() {
        assert_eq!(sample_params().validate(), Ok(()));
        assert_eq!(sample_params().quality_levels(), 4);
    }

    fn assert_rejected(mutate: impl FnOnce(&mut DetectorParams), expected: ConfigError) {
        let mut params = sample_params();
        mutate(&mut params);
        assert_eq!(params.validate(), Err(expected));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_rejected(
            |p| p.binarize_threshold_sigma_plus = 0.0,
            ConfigError::SigmaPlus(0.0),
        );
        assert_rejected(
            |p| p.binarize_threshold_sigma_minus = 0.5,
            ConfigError::SigmaMinus(0.5),
        );
        assert_rejected(|p| p.f01_height_min = -1.0, ConfigError::F01HeightMin(-1.0));
        assert_rejected(
            |p| p.f01_moment_thresholds.clear(),
            ConfigError::EmptyThresholds,
        );
        assert_rejected(
            |p| p.f01_moment_thresholds = vec![1.0, 3.0, 3.0],
            ConfigError::ThresholdsNotAscending { index: 2 },
        );
        assert_rejected(
            |p| p.f12_distance_min = 0.5,
            ConfigError::DistanceRange { min: 0.5, max: 0.3 },
        );
        assert_rejected(|p| p.f12_height_min = 0.0, ConfigError::F12HeightMin(0.0));
        assert_rejected(
            |p| p.top_level = f64::NAN,
            ConfigError::NonFinite { field: "top_level" },
        );
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let mut params = sample_params();
        params.f01_moment_thresholds = vec![1.0, f64::INFINITY];
        assert_eq!(
            params.validate(),
            Err(ConfigError::NonFinite {
                field: "f01_moment_thresholds"
            })
        );
    }
}
