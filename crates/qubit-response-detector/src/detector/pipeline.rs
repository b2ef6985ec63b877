use qubit_response_core::{
    binarize, label_components, retain_top_connected, standardize, Grid, Plane, Regions,
    SampleMoments,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::moment::{quality_level, region_moment};
use super::primary::select_primary;
use super::secondary::select_secondary;
use super::{ConfigError, DetectorParams, QubitResponse, QubitResponseError, F01};

/// Detection result together with the intermediate products it came from.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub response: QubitResponse,
    /// Mean and standard deviation of the raw samples.
    pub moments: SampleMoments,
    /// Thresholded z-scores, before the boundary filter.
    pub mask: Plane<bool>,
    /// Regions that touch the top row.
    pub regions: Regions,
}

/// f01/f12 resonance detector.
#[derive(Clone, Debug)]
pub struct QubitResponseDetector {
    params: DetectorParams,
}

impl QubitResponseDetector {
    /// Create a detector, rejecting invalid parameters.
    pub fn new(params: DetectorParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Detector parameters.
    #[inline]
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Detect f01/f12 on a grid.
    ///
    /// A grid without a qualifying resonance is not an error: the response
    /// has `quality_level == 0` and no f01.
    pub fn detect(&self, grid: &Grid) -> Result<QubitResponse, QubitResponseError> {
        self.analyze(grid).map(|analysis| analysis.response)
    }

    /// Like [`QubitResponseDetector::detect`], also returning the mask and
    /// surviving regions.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, grid),
            fields(width = grid.width(), height = grid.height())
        )
    )]
    pub fn analyze(&self, grid: &Grid) -> Result<Analysis, QubitResponseError> {
        let params = &self.params;
        let max_level = grid.levels().last();
        if params.top_level < max_level {
            log::warn!(
                "top_level {} is below the grid's highest level {}",
                params.top_level,
                max_level
            );
            return Err(ConfigError::TopLevelBelowGrid {
                top_level: params.top_level,
                max_level,
            }
            .into());
        }

        let (z, moments) = standardize(grid.samples()).map_err(|err| {
            log::warn!("standardize failed: {err}");
            QubitResponseError::from_standardize(err, grid.width())
        })?;
        let mask = binarize(&z, params.sigma_thresholds());
        let regions = retain_top_connected(label_components(&mask));

        let response = self.score(grid, &regions);
        match response.f01.as_ref() {
            Some(f01) => log::info!(
                "f01={:.6} (height {:.3}, moment {:.3}, quality {}) f12={}",
                f01.frequency,
                f01.height,
                f01.moment,
                f01.quality_level,
                response
                    .f12
                    .as_ref()
                    .map_or_else(|| "none".to_string(), |f| format!("{:.6}", f.frequency))
            ),
            None => log::info!("no f01 found among {} top regions", regions.len()),
        }

        Ok(Analysis {
            response,
            moments,
            mask,
            regions,
        })
    }

    fn score(&self, grid: &Grid, regions: &Regions) -> QubitResponse {
        let params = &self.params;
        let Some(peak) = select_primary(grid, regions, params.top_level, params.f01_height_min)
        else {
            return QubitResponse::not_found();
        };
        let Some(region) = regions.get(peak.region) else {
            return QubitResponse::not_found();
        };

        let moment = region_moment(grid, &region, params.top_level, params.moment_weighting);
        let level = quality_level(moment, &params.f01_moment_thresholds);
        if level == 0 {
            log::debug!(
                "f01 candidate at col {} dropped: moment {:.3} under the first threshold",
                peak.cell.col,
                moment
            );
            return QubitResponse::not_found();
        }
        let frequency = grid.frequency(peak.cell.col);
        let f12 = select_secondary(grid, regions, frequency, peak.region, params);

        QubitResponse {
            f01: Some(F01 {
                frequency,
                cell: peak.cell,
                region: peak.region,
                height: peak.height,
                moment,
                quality_level: level,
            }),
            f12,
            quality_level: level,
        }
    }
}

/// One-shot detection with parameters that have not been validated yet.
pub fn detect(params: DetectorParams, grid: &Grid) -> Result<QubitResponse, QubitResponseError> {
    QubitResponseDetector::new(params)?.detect(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::params::sample_params;
    use crate::detector::MomentWeighting;

    fn grid(rows: Vec<Vec<f64>>) -> Grid {
        let height = rows.len();
        let width = rows[0].len();
        let freqs = (0..width).map(|c| 4.0 + 0.1 * c as f64).collect();
        let levels = (0..height)
            .map(|r| r as f64 - (height - 1) as f64)
            .collect();
        Grid::from_rows(freqs, levels, rows).expect("grid")
    }

    fn params() -> DetectorParams {
        DetectorParams {
            f01_height_min: 2.0,
            f01_moment_thresholds: vec![5.0, 50.0],
            f12_height_min: 1.0,
            f12_distance_min: 0.15,
            f12_distance_max: 0.45,
            ..sample_params()
        }
    }

    /// 6 levels x 10 frequencies of zeros, with columns of `value` hanging
    /// `depth` rows from the top.
    fn mountains(peaks: &[(usize, usize, f64)]) -> Grid {
        let mut rows = vec![vec![0.0; 10]; 6];
        for &(col, depth, value) in peaks {
            for row in rows.iter_mut().rev().take(depth) {
                row[col] = value;
            }
        }
        grid(rows)
    }

    #[test]
    fn new_rejects_invalid_params() {
        let mut p = params();
        p.f01_moment_thresholds.clear();
        assert_eq!(
            QubitResponseDetector::new(p.clone()).unwrap_err(),
            ConfigError::EmptyThresholds
        );
        let err = detect(p, &mountains(&[(5, 4, 1.0)])).unwrap_err();
        assert_eq!(
            err,
            QubitResponseError::InvalidConfiguration(ConfigError::EmptyThresholds)
        );
    }

    #[test]
    fn top_level_below_grid_is_a_config_error() {
        let detector = QubitResponseDetector::new(DetectorParams {
            top_level: -1.0,
            ..params()
        })
        .expect("detector");
        let err = detector.detect(&mountains(&[(5, 4, 1.0)])).unwrap_err();
        assert!(matches!(
            err,
            QubitResponseError::InvalidConfiguration(ConfigError::TopLevelBelowGrid { .. })
        ));
    }

    #[test]
    fn finds_f01_and_f12() {
        let detector = QubitResponseDetector::new(params()).expect("detector");
        let g = mountains(&[(7, 5, 1.0), (4, 3, 1.0)]);
        let response = detector.detect(&g).expect("response");
        let f01 = response.f01.as_ref().expect("f01");
        assert_eq!(f01.cell.col, 7);
        assert_eq!(f01.cell.row, 1);
        // Arms 0..=4 with unit raw samples.
        assert_eq!(f01.moment, 10.0);
        assert_eq!(response.quality_level, 1);
        assert_eq!(f01.quality_level, 1);
        let f12 = response.f12.as_ref().expect("f12");
        assert_eq!(f12.cell.col, 4);
        assert_eq!(f12.cell.row, 3);
    }

    #[test]
    fn short_mountain_is_not_found() {
        let detector = QubitResponseDetector::new(params()).expect("detector");
        let response = detector.detect(&mountains(&[(5, 2, 1.0)])).expect("response");
        assert_eq!(response, QubitResponse::not_found());
    }

    #[test]
    fn low_moment_mountain_is_not_found() {
        let detector = QubitResponseDetector::new(params()).expect("detector");
        // Tall enough for the height gate, but arms 0..=2 sum to 3 <= 5.
        let g = mountains(&[(5, 3, 1.0), (2, 3, 1.0)]);
        let response = detector.detect(&g).expect("response");
        assert_eq!(response, QubitResponse::not_found());
        assert!(response.f01.is_none() && response.f12.is_none());
        let record = crate::ResultRecord::ok(&response);
        assert_eq!(record.f01_frequency, None);
        assert_eq!(record.quality_level, Some(0));
    }

    #[test]
    fn constant_grid_is_degenerate() {
        let detector = QubitResponseDetector::new(params()).expect("detector");
        let err = detector.detect(&grid(vec![vec![0.25; 4]; 3])).unwrap_err();
        assert!(matches!(err, QubitResponseError::DegenerateInput { .. }));
    }

    #[test]
    fn analysis_exposes_mask_and_top_regions() {
        let detector = QubitResponseDetector::new(params()).expect("detector");
        // The lone cell at the bottom is foreground but does not touch the top.
        let mut g = vec![vec![0.0; 10]; 6];
        for row in g.iter_mut().skip(2) {
            row[6] = 1.0;
        }
        g[0][1] = 1.0;
        let analysis = detector.analyze(&grid(g)).expect("analysis");
        assert!(analysis.mask.get(0, 1));
        assert_eq!(analysis.regions.len(), 1);
        assert!(analysis.regions.label(0, 1).is_none());
        assert!(analysis.moments.std_dev > 0.0);
        assert!(analysis.response.f01.is_some());
    }

    #[test]
    fn row_spacing_weighting_changes_the_moment() {
        let g = mountains(&[(7, 5, 1.0)]);
        let cell = QubitResponseDetector::new(params())
            .expect("detector")
            .detect(&g)
            .expect("response");
        let spaced = QubitResponseDetector::new(DetectorParams {
            moment_weighting: MomentWeighting::RowSpacing,
            top_level: 1.0,
            ..params()
        })
        .expect("detector")
        .detect(&g)
        .expect("response");
        assert!(spaced.moment() > cell.moment());
    }
}
