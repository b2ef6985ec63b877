//! 4-connected region labeling and the top-row boundary filter.
//!
//! Regions are kept in an arena: member cells of all regions live in one
//! contiguous buffer grouped by region, and each region is addressed by a
//! compact [`RegionId`]. A per-cell label map answers "which region owns this
//! cell" in O(1).

use serde::{Deserialize, Serialize};

use crate::grid::Plane;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Compact region identifier, dense in `0..regions.len()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u32);

impl RegionId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Grid cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

#[derive(Clone, Copy, Debug)]
struct Span {
    start: usize,
    len: usize,
    min_row: usize,
    max_row: usize,
}

/// Borrowed view of one region.
#[derive(Clone, Copy, Debug)]
pub struct Region<'a> {
    pub id: RegionId,
    pub cells: &'a [Cell],
    /// Lowest row index reached (deepest excursion from the top row).
    pub min_row: usize,
    pub max_row: usize,
}

/// Labeled regions of a mask.
#[derive(Clone, Debug)]
pub struct Regions {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    spans: Vec<Span>,
    labels: Vec<Option<RegionId>>,
}

impl Regions {
    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Region owning `(row, col)`, if the cell was foreground.
    #[inline]
    pub fn label(&self, row: usize, col: usize) -> Option<RegionId> {
        self.labels[row * self.width + col]
    }

    pub fn get(&self, id: RegionId) -> Option<Region<'_>> {
        let span = self.spans.get(id.index())?;
        Some(Region {
            id,
            cells: &self.cells[span.start..span.start + span.len],
            min_row: span.min_row,
            max_row: span.max_row,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Region<'_>> + '_ {
        (0..self.spans.len()).filter_map(|i| self.get(RegionId(i as u32)))
    }

    /// Whether the region has a member in the top row.
    pub fn touches_top(&self, id: RegionId) -> bool {
        self.spans
            .get(id.index())
            .is_some_and(|span| span.max_row + 1 == self.height)
    }

    /// Label map as a plane: `0` for background, `id + 1` for members.
    pub fn label_plane(&self) -> Plane<u32> {
        Plane {
            width: self.width,
            height: self.height,
            data: self
                .labels
                .iter()
                .map(|l| l.map_or(0, |id| id.0 + 1))
                .collect(),
        }
    }
}

const NEIGHBORS_4: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Partition the foreground of `mask` into maximal 4-connected regions.
///
/// Uses an explicit-stack flood fill. Cells are scanned row-major, so region
/// ids follow the position of each region's first cell.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask), fields(width = mask.width, height = mask.height))
)]
pub fn label_components(mask: &Plane<bool>) -> Regions {
    let (width, height) = (mask.width, mask.height);
    let mut labels: Vec<Option<RegionId>> = vec![None; width * height];
    let mut cells = Vec::new();
    let mut spans = Vec::new();
    let mut stack = Vec::new();

    for row in 0..height {
        for col in 0..width {
            let idx = row * width + col;
            if !mask.data[idx] || labels[idx].is_some() {
                continue;
            }

            let id = RegionId(spans.len() as u32);
            let start = cells.len();
            let mut min_row = row;
            let mut max_row = row;

            labels[idx] = Some(id);
            stack.push(Cell { row, col });
            while let Some(cell) = stack.pop() {
                cells.push(cell);
                min_row = min_row.min(cell.row);
                max_row = max_row.max(cell.row);

                for &(dr, dc) in &NEIGHBORS_4 {
                    let nr = cell.row as isize + dr;
                    let nc = cell.col as isize + dc;
                    if nr < 0 || nc < 0 || nr >= height as isize || nc >= width as isize {
                        continue;
                    }
                    let (nr, nc) = (nr as usize, nc as usize);
                    let nidx = nr * width + nc;
                    if mask.data[nidx] && labels[nidx].is_none() {
                        labels[nidx] = Some(id);
                        stack.push(Cell { row: nr, col: nc });
                    }
                }
            }

            spans.push(Span {
                start,
                len: cells.len() - start,
                min_row,
                max_row,
            });
        }
    }

    log::debug!("label_components: {} regions", spans.len());
    Regions {
        width,
        height,
        cells,
        spans,
        labels,
    }
}

/// Drop every region without a member in the top row (`row == height - 1`).
///
/// Survivors are re-numbered densely, keeping their relative order.
pub fn retain_top_connected(regions: Regions) -> Regions {
    let Regions {
        width,
        height,
        cells,
        spans,
        mut labels,
    } = regions;

    let mut remap: Vec<Option<RegionId>> = vec![None; spans.len()];
    let mut kept_cells = Vec::new();
    let mut kept_spans = Vec::new();
    for (old, span) in spans.iter().enumerate() {
        if span.max_row + 1 != height {
            continue;
        }
        remap[old] = Some(RegionId(kept_spans.len() as u32));
        let start = kept_cells.len();
        kept_cells.extend_from_slice(&cells[span.start..span.start + span.len]);
        kept_spans.push(Span { start, ..*span });
    }

    for label in labels.iter_mut() {
        *label = label.and_then(|id| remap[id.index()]);
    }

    log::debug!(
        "retain_top_connected: kept {} of {} regions",
        kept_spans.len(),
        spans.len()
    );
    Regions {
        width,
        height,
        cells: kept_cells,
        spans: kept_spans,
        labels,
    }
}
