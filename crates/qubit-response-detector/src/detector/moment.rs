use qubit_response_core::{Grid, Region};

use super::MomentWeighting;

/// Level spacing attributed to `row`: distance to the next row up, or to
/// `top_level` for the top row.
fn row_spacing(grid: &Grid, row: usize, top_level: f64) -> f64 {
    if row == grid.top_row() {
        top_level - grid.level(row)
    } else {
        grid.level(row + 1) - grid.level(row)
    }
}

/// Prominence moment of a region: `Σ (top_level - level(row)) * |sample|`.
///
/// Cells in the top row contribute nothing unless `top_level` lies above the
/// grid.
pub fn region_moment(
    grid: &Grid,
    region: &Region<'_>,
    top_level: f64,
    weighting: MomentWeighting,
) -> f64 {
    region
        .cells
        .iter()
        .map(|cell| {
            let arm = top_level - grid.level(cell.row);
            let mass = grid.sample(cell.row, cell.col).abs();
            match weighting {
                MomentWeighting::Cell => arm * mass,
                MomentWeighting::RowSpacing => arm * mass * row_spacing(grid, cell.row, top_level),
            }
        })
        .sum()
}

/// Number of thresholds strictly below `moment`.
///
/// `thresholds` must be ascending. A moment equal to a threshold stays on the
/// lower level.
#[inline]
pub fn quality_level(moment: f64, thresholds: &[f64]) -> usize {
    thresholds.partition_point(|&t| t < moment)
}
