//! Frequency × level sample grids.
//!
//! Layout follows the measurement: columns run along the frequency axis,
//! rows run along the level axis (ascending), and samples are stored
//! row-major. The last row has the highest level and is the "top" row that
//! resonance regions hang down from.

use serde::{Deserialize, Serialize};

/// Row-major 2D buffer, `data[row * width + col]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane<T> {
    pub width: usize,
    pub height: usize,
    pub data: Vec<T>,
}

impl<T: Copy> Plane<T> {
    /// Plane filled with a single value.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[self.index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map<U, F: Fn(T) -> U>(&self, f: F) -> Plane<U> {
        Plane {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

/// Axis validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AxisError {
    #[error("axis needs at least 2 values, got {len}")]
    TooShort { len: usize },
    #[error("axis value at index {index} is not finite")]
    NonFinite { index: usize },
    #[error("axis must be strictly increasing (index {index})")]
    NotAscending { index: usize },
    #[error("axis step must be finite and > 0, got {step}")]
    InvalidStep { step: f64 },
}

/// Strictly ascending, finite coordinate axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Axis {
    values: Vec<f64>,
}

impl Axis {
    /// Validate explicit axis values.
    pub fn new(values: Vec<f64>) -> Result<Self, AxisError> {
        if values.len() < 2 {
            return Err(AxisError::TooShort { len: values.len() });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(AxisError::NonFinite { index });
        }
        if let Some(index) = values.windows(2).position(|w| w[1] <= w[0]) {
            return Err(AxisError::NotAscending { index: index + 1 });
        }
        Ok(Self { values })
    }

    /// Evenly spaced axis, `value(i) = start + i * step`.
    ///
    /// Every value is computed from its index so that long sweeps do not
    /// accumulate rounding drift.
    pub fn linear(start: f64, step: f64, len: usize) -> Result<Self, AxisError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(AxisError::InvalidStep { step });
        }
        if !start.is_finite() {
            return Err(AxisError::NonFinite { index: 0 });
        }
        let values = (0..len).map(|i| start + i as f64 * step).collect();
        Self::new(values)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }
}

impl TryFrom<Vec<f64>> for Axis {
    type Error = AxisError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Axis> for Vec<f64> {
    fn from(axis: Axis) -> Self {
        axis.values
    }
}

/// Grid validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("frequency axis: {0}")]
    FrequencyAxis(AxisError),
    #[error("level axis: {0}")]
    LevelAxis(AxisError),
    #[error("sample count {got} does not match levels x frequencies = {rows} x {cols}")]
    ShapeMismatch { rows: usize, cols: usize, got: usize },
    #[error("row {row} has {got} samples, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("sample at (row={row}, col={col}) is NaN or infinite")]
    NonFiniteSample { row: usize, col: usize },
}

/// Phase-shift samples over a frequency axis (columns) and a level axis (rows).
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    frequencies: Axis,
    levels: Axis,
    samples: Plane<f64>,
}

impl Grid {
    /// Build a grid from a row-major sample buffer.
    pub fn new(frequencies: Axis, levels: Axis, samples: Vec<f64>) -> Result<Self, GridError> {
        let rows = levels.len();
        let cols = frequencies.len();
        if samples.len() != rows * cols {
            return Err(GridError::ShapeMismatch {
                rows,
                cols,
                got: samples.len(),
            });
        }
        if let Some(idx) = samples.iter().position(|v| !v.is_finite()) {
            return Err(GridError::NonFiniteSample {
                row: idx / cols,
                col: idx % cols,
            });
        }
        Ok(Self {
            frequencies,
            levels,
            samples: Plane {
                width: cols,
                height: rows,
                data: samples,
            },
        })
    }

    /// Build a grid from one `Vec` per level (row), each spanning the frequency axis.
    pub fn from_rows(
        frequencies: Vec<f64>,
        levels: Vec<f64>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, GridError> {
        let frequencies = Axis::new(frequencies).map_err(GridError::FrequencyAxis)?;
        let levels = Axis::new(levels).map_err(GridError::LevelAxis)?;
        Self::with_rows(frequencies, levels, rows)
    }

    /// Like [`Grid::from_rows`] for axes that are already validated.
    pub fn with_rows(
        frequencies: Axis,
        levels: Axis,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, GridError> {
        if rows.len() != levels.len() {
            return Err(GridError::ShapeMismatch {
                rows: levels.len(),
                cols: frequencies.len(),
                got: rows.iter().map(Vec::len).sum(),
            });
        }
        let mut samples = Vec::with_capacity(levels.len() * frequencies.len());
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != frequencies.len() {
                return Err(GridError::RaggedRows {
                    row,
                    expected: frequencies.len(),
                    got: values.len(),
                });
            }
            samples.extend(values);
        }
        Self::new(frequencies, levels, samples)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.samples.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.samples.height
    }

    /// Index of the top row (highest level).
    #[inline]
    pub fn top_row(&self) -> usize {
        self.samples.height - 1
    }

    #[inline]
    pub fn frequencies(&self) -> &Axis {
        &self.frequencies
    }

    #[inline]
    pub fn levels(&self) -> &Axis {
        &self.levels
    }

    #[inline]
    pub fn frequency(&self, col: usize) -> f64 {
        self.frequencies.value(col)
    }

    #[inline]
    pub fn level(&self, row: usize) -> f64 {
        self.levels.value(row)
    }

    #[inline]
    pub fn sample(&self, row: usize, col: usize) -> f64 {
        self.samples.get(row, col)
    }

    #[inline]
    pub fn samples(&self) -> &Plane<f64> {
        &self.samples
    }
}
