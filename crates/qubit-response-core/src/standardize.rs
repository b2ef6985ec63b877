//! Global z-score standardization.

use crate::grid::Plane;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Standard deviations below this are treated as a constant grid.
pub const MIN_STD_DEV: f64 = 1e-12;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StandardizeError {
    #[error("cannot standardize an empty sample buffer")]
    Empty,
    #[error("sample at index {index} is NaN or infinite")]
    NonFinite { index: usize },
    #[error("degenerate standard deviation ({std_dev:e}); grid is constant")]
    Degenerate { std_dev: f64 },
}

/// Global mean and population standard deviation of a sample buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleMoments {
    pub mean: f64,
    pub std_dev: f64,
}

/// Mean and population (`1/N`) standard deviation.
pub fn mean_std(samples: &[f64]) -> Result<SampleMoments, StandardizeError> {
    if samples.is_empty() {
        return Err(StandardizeError::Empty);
    }
    if let Some(index) = samples.iter().position(|v| !v.is_finite()) {
        return Err(StandardizeError::NonFinite { index });
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    Ok(SampleMoments {
        mean,
        std_dev: var.sqrt(),
    })
}

/// Replace every sample with `(v - mean) / std_dev`.
///
/// Returns the z-score plane together with the moments it was computed from.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(samples),
        fields(width = samples.width, height = samples.height)
    )
)]
pub fn standardize(
    samples: &Plane<f64>,
) -> Result<(Plane<f64>, SampleMoments), StandardizeError> {
    let moments = mean_std(&samples.data)?;
    if moments.std_dev < MIN_STD_DEV {
        return Err(StandardizeError::Degenerate {
            std_dev: moments.std_dev,
        });
    }
    log::debug!(
        "standardize: mean={:.6} std={:.6} over {} samples",
        moments.mean,
        moments.std_dev,
        samples.data.len()
    );
    let z = samples.map(|v| (v - moments.mean) / moments.std_dev);
    Ok((z, moments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plane(data: Vec<f64>, width: usize) -> Plane<f64> {
        let height = data.len() / width;
        Plane {
            width,
            height,
            data,
        }
    }

    #[test]
    fn z_scores_have_zero_mean_unit_std() {
        let (z, moments) = standardize(&plane(vec![1.0, 2.0, 3.0, 4.0, 5.0, 9.0], 3)).expect("z");
        assert_relative_eq!(moments.mean, 4.0);
        let again = mean_std(&z.data).expect("moments");
        assert_relative_eq!(again.mean, 0.0, epsilon = 1e-12);
        assert_relative_eq!(again.std_dev, 1.0, epsilon = 1e-12);
        assert_eq!((z.width, z.height), (3, 2));
    }

    #[test]
    fn constant_grid_is_degenerate() {
        for value in [0.0, 3.25, -1e6] {
            let err = standardize(&plane(vec![value; 12], 4)).unwrap_err();
            assert!(matches!(err, StandardizeError::Degenerate { .. }));
        }
    }

    #[test]
    fn non_finite_is_rejected() {
        let err = standardize(&plane(vec![0.0, f64::INFINITY, 1.0, 2.0], 2)).unwrap_err();
        assert_eq!(err, StandardizeError::NonFinite { index: 1 });
    }
}
