//! PNG export of heatmaps, detection markers and region masks.
//!
//! Every grid cell becomes a `scale × scale` block. The top row (highest
//! level) is drawn at the top of the image and frequency grows to the right.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use qubit_response_core::{Grid, Plane, Regions};
use qubit_response_detector::{Analysis, QubitResponse};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub const F01_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const F12_COLOR: Rgb<u8> = Rgb([128, 0, 128]);

fn default_scale() -> u32 {
    4
}

fn default_dash() -> u32 {
    4
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Pixels per grid cell along each axis.
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Dash and gap length of the marker lines, in pixels.
    #[serde(default = "default_dash")]
    pub dash: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            dash: default_dash(),
        }
    }
}

/// Viridis control points.
const RAMP: [[u8; 3]; 5] = [
    [68, 1, 84],
    [59, 82, 139],
    [33, 145, 140],
    [94, 201, 98],
    [253, 231, 37],
];

/// Map `t` in `[0, 1]` onto the color ramp.
fn ramp(t: f64) -> Rgb<u8> {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (RAMP.len() - 1) as f64;
    let i = (pos.floor() as usize).min(RAMP.len() - 2);
    let frac = pos - i as f64;
    let (a, b) = (RAMP[i], RAMP[i + 1]);
    let mix = |k: usize| (a[k] as f64 + (b[k] as f64 - a[k] as f64) * frac).round() as u8;
    Rgb([mix(0), mix(1), mix(2)])
}

/// Fill a `scale × scale` image from per-cell colors, flipping rows so the
/// last row ends up at the top.
fn blocks<F>(width: usize, height: usize, scale: u32, color: F) -> RgbImage
where
    F: Fn(usize, usize) -> Rgb<u8>,
{
    let scale = scale.max(1);
    RgbImage::from_fn(width as u32 * scale, height as u32 * scale, |x, y| {
        let col = (x / scale) as usize;
        let row = height - 1 - (y / scale) as usize;
        color(row, col)
    })
}

/// Raw samples, min-max normalized onto the color ramp.
pub fn heatmap(grid: &Grid, options: &RenderOptions) -> RgbImage {
    let samples = &grid.samples().data;
    let (lo, hi) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = if hi > lo { hi - lo } else { 1.0 };
    blocks(grid.width(), grid.height(), options.scale, |row, col| {
        ramp((grid.sample(row, col) - lo) / span)
    })
}

/// Dashed vertical line through the center of column `col`.
pub fn draw_marker(img: &mut RgbImage, col: usize, color: Rgb<u8>, options: &RenderOptions) {
    let scale = options.scale.max(1);
    let dash = options.dash.max(1);
    let x = col as u32 * scale + scale / 2;
    if x >= img.width() {
        return;
    }
    for y in (0..img.height()).filter(|y| (y / dash) % 2 == 0) {
        img.put_pixel(x, y, color);
    }
}

/// Heatmap with the f01 and f12 columns marked.
pub fn annotated(grid: &Grid, response: &QubitResponse, options: &RenderOptions) -> RgbImage {
    let mut img = heatmap(grid, options);
    if let Some(f01) = response.f01.as_ref() {
        draw_marker(&mut img, f01.cell.col, F01_COLOR, options);
    }
    if let Some(f12) = response.f12.as_ref() {
        draw_marker(&mut img, f12.cell.col, F12_COLOR, options);
    }
    img
}

/// Surviving regions, one ramp color per region id on a black background.
pub fn region_mask(regions: &Regions, options: &RenderOptions) -> RgbImage {
    let labels: Plane<u32> = regions.label_plane();
    let count = regions.len().max(1) as f64;
    blocks(labels.width, labels.height, options.scale, |row, col| {
        match labels.get(row, col) {
            0 => Rgb([0, 0, 0]),
            label => ramp(label as f64 / count),
        }
    })
}

/// Write the four PNGs for one analyzed figure:
///
/// - `<dir>/<quality_level>/qubit_<id>_<moment:06>.png`
/// - `<dir>/qubit_<id>_0_marked.png`
/// - `<dir>/qubit_<id>_1_orig.png`
/// - `<dir>/qubit_<id>_2_binarize.png`
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(dir, grid, analysis, options))
)]
pub fn write_images(
    dir: &Path,
    qubit_id: &str,
    grid: &Grid,
    analysis: &Analysis,
    options: &RenderOptions,
) -> Result<Vec<PathBuf>, ImageError> {
    let response = &analysis.response;
    let quality_dir = dir.join(response.quality_level.to_string());
    fs::create_dir_all(&quality_dir)?;

    let moment = response.moment().max(0.0) as u64;
    let marked = annotated(grid, response, options);
    let orig = heatmap(grid, options);
    let mask = region_mask(&analysis.regions, options);
    let outputs = [
        (quality_dir.join(format!("qubit_{qubit_id}_{moment:06}.png")), &marked),
        (dir.join(format!("qubit_{qubit_id}_0_marked.png")), &marked),
        (dir.join(format!("qubit_{qubit_id}_1_orig.png")), &orig),
        (dir.join(format!("qubit_{qubit_id}_2_binarize.png")), &mask),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (path, img) in outputs {
        img.save(&path)?;
        written.push(path);
    }
    Ok(written)
}
