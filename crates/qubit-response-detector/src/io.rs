//! JSON configuration and input figure helpers.

use crate::DetectorParams;
use qubit_response_core::{Axis, Grid, GridError};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum DetectorIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DetectorParams {
    /// Load parameters from a JSON file. The result is not validated.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DetectorIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write parameters to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DetectorIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FigureError {
    #[error("figure has no heatmap trace")]
    NoTrace,
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Heatmap trace of a plotly-style figure.
///
/// `z` is indexed `[y][x]`. Missing coordinate arrays are generated from
/// `x0`/`dx` (`y0`/`dy`), defaulting to `0` and `1`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeatmapTrace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dy: Option<f64>,
    /// `null` entries are read as NaN and rejected by [`HeatmapTrace::to_grid`].
    pub z: Vec<Vec<Option<f64>>>,
}

fn resolve_axis(
    values: Option<&[f64]>,
    start: Option<f64>,
    step: Option<f64>,
    len: usize,
) -> Result<Axis, qubit_response_core::AxisError> {
    match values {
        Some(values) => Axis::new(values.to_vec()),
        None => Axis::linear(start.unwrap_or(0.0), step.unwrap_or(1.0), len),
    }
}

impl HeatmapTrace {
    /// Build a validated grid: columns follow `x`, rows follow `y`.
    pub fn to_grid(&self) -> Result<Grid, GridError> {
        let rows = self.z.len();
        let cols = self.z.first().map_or(0, Vec::len);
        let frequencies = resolve_axis(self.x.as_deref(), self.x0, self.dx, cols)
            .map_err(GridError::FrequencyAxis)?;
        let levels = resolve_axis(self.y.as_deref(), self.y0, self.dy, rows)
            .map_err(GridError::LevelAxis)?;
        let samples = self
            .z
            .iter()
            .map(|row| row.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
            .collect();
        Grid::with_rows(frequencies, levels, samples)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FigureTitle {
    Text(String),
    Object {
        #[serde(default)]
        text: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FigureLayout {
    #[serde(default)]
    pub title: Option<FigureTitle>,
}

/// Plotly-style figure document holding one heatmap.
///
/// Keys other than the ones modeled here are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureDocument {
    pub data: Vec<HeatmapTrace>,
    #[serde(default)]
    pub layout: Option<FigureLayout>,
}

impl FigureDocument {
    /// Load a figure from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, FigureError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Grid of the first trace.
    pub fn to_grid(&self) -> Result<Grid, FigureError> {
        let trace = self.data.first().ok_or(FigureError::NoTrace)?;
        Ok(trace.to_grid()?)
    }

    pub fn title(&self) -> Option<&str> {
        match self.layout.as_ref()?.title.as_ref()? {
            FigureTitle::Text(text) => Some(text),
            FigureTitle::Object { text } => text.as_deref(),
        }
    }

    /// Qubit identifier: the last three characters of the title, or
    /// `fallback` when the title is missing or empty.
    pub fn qubit_id(&self, fallback: &str) -> String {
        match self.title().map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => {
                let skip = title.chars().count().saturating_sub(3);
                title.chars().skip(skip).collect()
            }
            None => fallback.to_string(),
        }
    }
}
