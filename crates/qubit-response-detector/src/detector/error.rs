use qubit_response_core::{GridError, StandardizeError};

/// Configuration validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("binarize_threshold_sigma_plus must be positive, got {0}")]
    SigmaPlus(f64),
    #[error("binarize_threshold_sigma_minus must be negative, got {0}")]
    SigmaMinus(f64),
    #[error("f01_height_min must be > 0, got {0}")]
    F01HeightMin(f64),
    #[error("f01_moment_thresholds must not be empty")]
    EmptyThresholds,
    #[error("f01_moment_thresholds must be strictly increasing (index {index})")]
    ThresholdsNotAscending { index: usize },
    #[error("bad f12 distance range [{min}, {max}]; need 0 <= min <= max")]
    DistanceRange { min: f64, max: f64 },
    #[error("f12_height_min must be > 0, got {0}")]
    F12HeightMin(f64),
    #[error("top_level {top_level} is below the highest level-axis value {max_level}")]
    TopLevelBelowGrid { top_level: f64, max_level: f64 },
}

/// Errors that abort a detection run.
///
/// "No resonance found" is not an error; it is an `Ok` response with
/// `quality_level == 0`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QubitResponseError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("invalid input data: {0}")]
    InvalidInputData(#[from] GridError),
    #[error("degenerate input: standard deviation {std_dev:e} is zero")]
    DegenerateInput { std_dev: f64 },
}

impl QubitResponseError {
    /// Map a standardization failure on a grid of the given width.
    pub(crate) fn from_standardize(err: StandardizeError, width: usize) -> Self {
        match err {
            StandardizeError::Degenerate { std_dev } => Self::DegenerateInput { std_dev },
            StandardizeError::NonFinite { index } => {
                Self::InvalidInputData(GridError::NonFiniteSample {
                    row: index / width.max(1),
                    col: index % width.max(1),
                })
            }
            StandardizeError::Empty => Self::InvalidInputData(GridError::ShapeMismatch {
                rows: 0,
                cols: width,
                got: 0,
            }),
        }
    }
}
