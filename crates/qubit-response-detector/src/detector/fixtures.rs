//! Drawn test scenes.

use qubit_response_core::{label_components, retain_top_connected, Grid, Plane, Regions};

/// Build a grid and its top-connected regions from a drawing, top row first.
///
/// `.` is a background cell with sample `0`, a digit `d` is a foreground cell
/// with sample `d`, `#` a foreground cell with sample `1`. Frequencies are
/// `0.1 * col`, levels `-(rows - 1 - row)` so the top row sits at level 0.
pub(crate) fn scene(drawing: &[&str]) -> (Grid, Regions) {
    let height = drawing.len();
    let width = drawing[0].len();
    let freqs: Vec<f64> = (0..width).map(|c| 0.1 * c as f64).collect();
    let levels: Vec<f64> = (0..height).map(|r| r as f64 - (height - 1) as f64).collect();

    let mut rows = vec![Vec::new(); height];
    let mut mask = Plane::filled(width, height, false);
    for (i, line) in drawing.iter().enumerate() {
        let row = height - 1 - i;
        for (col, ch) in line.chars().enumerate() {
            let value = match ch {
                '.' => 0.0,
                '#' => 1.0,
                d => d.to_digit(10).expect("digit") as f64,
            };
            mask.set(row, col, ch != '.');
            rows[row].push(value);
        }
    }
    let grid = Grid::from_rows(freqs, levels, rows).expect("grid");
    let regions = retain_top_connected(label_components(&mask));
    (grid, regions)
}
