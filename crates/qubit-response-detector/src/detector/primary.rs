//! f01 selection: tallest top-connected region and its deepest cell.

use qubit_response_core::{Cell, Grid, Region, RegionId, Regions};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Height of a region: distance from `top_level` down to its deepest row.
#[inline]
pub(crate) fn region_height(grid: &Grid, region: &Region<'_>, top_level: f64) -> f64 {
    top_level - grid.level(region.min_row)
}

/// f01 candidate before moment scoring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PrimaryPeak {
    pub cell: Cell,
    pub region: RegionId,
    pub height: f64,
}

/// Pick the f01 cell, or `None` when no region reaches `height_min`.
///
/// Levels ascend with the row index, so the tallest regions are the ones
/// reaching the lowest row. Among their cells on that row the largest
/// `|sample|` wins; remaining ties go to the lowest column.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(grid, regions), fields(regions = regions.len()))
)]
pub(crate) fn select_primary(
    grid: &Grid,
    regions: &Regions,
    top_level: f64,
    height_min: f64,
) -> Option<PrimaryPeak> {
    let deepest_row = regions.iter().map(|r| r.min_row).min()?;
    let height = top_level - grid.level(deepest_row);
    if height < height_min {
        log::debug!(
            "f01: tallest region height {:.3} < f01_height_min {:.3}",
            height,
            height_min
        );
        return None;
    }

    let mut best: Option<(Cell, RegionId, f64)> = None;
    for region in regions.iter().filter(|r| r.min_row == deepest_row) {
        for &cell in region.cells.iter().filter(|c| c.row == deepest_row) {
            let magnitude = grid.sample(cell.row, cell.col).abs();
            let better = match best {
                None => true,
                Some((b, _, m)) => magnitude > m || (magnitude == m && cell.col < b.col),
            };
            if better {
                best = Some((cell, region.id, magnitude));
            }
        }
    }

    best.map(|(cell, region, _)| PrimaryPeak {
        cell,
        region,
        height,
    })
}
