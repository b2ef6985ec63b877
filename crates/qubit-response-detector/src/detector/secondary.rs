//! f12 search inside the frequency window below f01.

use qubit_response_core::{Cell, Grid, RegionId, Regions};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::primary::region_height;
use super::{DetectorParams, F12};

#[derive(Clone, Copy, Debug)]
struct Candidate {
    col: usize,
    region: RegionId,
    min_row: usize,
    height: f64,
}

impl Candidate {
    /// Higher frequency first, then the taller region, then the lower id.
    fn beats(&self, other: &Candidate) -> bool {
        (self.col, std::cmp::Reverse(self.min_row), std::cmp::Reverse(self.region))
            > (other.col, std::cmp::Reverse(other.min_row), std::cmp::Reverse(other.region))
    }
}

/// Find f12 for an f01 at `f01_frequency` owned by `f01_region`.
///
/// A region qualifies when it is not the f01 region, is at least
/// `f12_height_min` tall, and has a member with
/// `f12_distance_min <= f01 - f <= f12_distance_max`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(grid, regions, params), fields(f01 = f01_frequency))
)]
pub(crate) fn select_secondary(
    grid: &Grid,
    regions: &Regions,
    f01_frequency: f64,
    f01_region: RegionId,
    params: &DetectorParams,
) -> Option<F12> {
    let in_window = |col: usize| {
        let distance = f01_frequency - grid.frequency(col);
        params.f12_distance_min <= distance && distance <= params.f12_distance_max
    };

    let mut best: Option<Candidate> = None;
    for region in regions.iter().filter(|r| r.id != f01_region) {
        let height = region_height(grid, &region, params.top_level);
        if height < params.f12_height_min {
            continue;
        }
        let Some(col) = region
            .cells
            .iter()
            .map(|c| c.col)
            .filter(|&col| in_window(col))
            .max()
        else {
            continue;
        };
        let candidate = Candidate {
            col,
            region: region.id,
            min_row: region.min_row,
            height,
        };
        if best.is_none_or(|b| candidate.beats(&b)) {
            best = Some(candidate);
        }
    }

    let best = best?;
    let row = regions
        .get(best.region)?
        .cells
        .iter()
        .filter(|c| c.col == best.col)
        .map(|c| c.row)
        .min()?;
    let frequency = grid.frequency(best.col);
    log::debug!(
        "f12: region {} col {} freq {:.6} height {:.3}",
        best.region.0,
        best.col,
        frequency,
        best.height
    );
    Some(F12 {
        frequency,
        cell: Cell { row, col: best.col },
        region: best.region,
        height: best.height,
        distance: f01_frequency - frequency,
    })
}
