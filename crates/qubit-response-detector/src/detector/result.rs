use qubit_response_core::{Cell, RegionId};
use serde::{Deserialize, Serialize};

use super::QubitResponseError;

/// Primary (f01) resonance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct F01 {
    pub frequency: f64,
    /// Deepest cell of the winning region that fixes the frequency.
    pub cell: Cell,
    pub region: RegionId,
    /// `top_level - level(cell.row)`.
    pub height: f64,
    pub moment: f64,
    pub quality_level: usize,
}

/// Secondary (f12) resonance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct F12 {
    pub frequency: f64,
    /// Deepest member of the region in the f12 column.
    pub cell: Cell,
    pub region: RegionId,
    pub height: f64,
    /// `f01.frequency - frequency`.
    pub distance: f64,
}

/// Output of a successful detection run.
///
/// `quality_level == 0` exactly when `f01` is absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QubitResponse {
    pub f01: Option<F01>,
    pub f12: Option<F12>,
    pub quality_level: usize,
}

impl QubitResponse {
    /// Response for a grid without a qualifying f01 region.
    pub fn not_found() -> Self {
        Self {
            f01: None,
            f12: None,
            quality_level: 0,
        }
    }

    #[inline]
    pub fn f01_frequency(&self) -> Option<f64> {
        self.f01.as_ref().map(|f| f.frequency)
    }

    #[inline]
    pub fn f12_frequency(&self) -> Option<f64> {
        self.f12.as_ref().map(|f| f.frequency)
    }

    /// f01 moment, `0.0` when f01 is absent.
    #[inline]
    pub fn moment(&self) -> f64 {
        self.f01.as_ref().map_or(0.0, |f| f.moment)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Error,
}

/// Flat, serializable view of a detection outcome.
///
/// On `Status::Error` the three data fields are `None` and `error` carries
/// the message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub f01_frequency: Option<f64>,
    pub f12_frequency: Option<f64>,
    pub quality_level: Option<usize>,
    pub status: Status,
    pub error: Option<String>,
}

impl ResultRecord {
    pub fn ok(response: &QubitResponse) -> Self {
        Self {
            f01_frequency: response.f01_frequency(),
            f12_frequency: response.f12_frequency(),
            quality_level: Some(response.quality_level),
            status: Status::Ok,
            error: None,
        }
    }

    /// Error record with an arbitrary message (e.g. an unreadable input file).
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            f01_frequency: None,
            f12_frequency: None,
            quality_level: None,
            status: Status::Error,
            error: Some(message.into()),
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl From<&Result<QubitResponse, QubitResponseError>> for ResultRecord {
    fn from(result: &Result<QubitResponse, QubitResponseError>) -> Self {
        match result {
            Ok(response) => Self::ok(response),
            Err(err) => Self::error(err.to_string()),
        }
    }
}
