//! Per-file and multi-file analysis of figure documents.

use std::path::{Path, PathBuf};

use qubit_response_detector::{
    Analysis, FigureDocument, FigureError, QubitResponseDetector, QubitResponseError, ResultRecord,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors that turn a file into an ERROR record.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("figure has no heatmap trace")]
    NoTrace,
    #[error(transparent)]
    Detect(#[from] QubitResponseError),
}

impl AnalyzeError {
    fn from_figure(path: &Path, err: FigureError) -> Self {
        match err {
            FigureError::Io(source) => Self::Io {
                path: path.to_path_buf(),
                source,
            },
            FigureError::Json(source) => Self::Json {
                path: path.to_path_buf(),
                source,
            },
            FigureError::NoTrace => Self::NoTrace,
            FigureError::Grid(err) => Self::Detect(QubitResponseError::InvalidInputData(err)),
        }
    }
}

/// Outcome for one input file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub qubit_id: String,
    #[serde(flatten)]
    pub record: ResultRecord,
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Load a figure and run the detector on its first trace.
///
/// Returns the qubit id alongside the result; the id falls back to the file
/// stem when the figure cannot be read.
pub fn analyze_figure(
    path: &Path,
    detector: &QubitResponseDetector,
) -> (String, Result<(qubit_response_core::Grid, Analysis), AnalyzeError>) {
    let doc = match FigureDocument::load_json(path) {
        Ok(doc) => doc,
        Err(err) => return (file_stem(path), Err(AnalyzeError::from_figure(path, err))),
    };
    let qubit_id = doc.qubit_id(&file_stem(path));
    let result = doc
        .to_grid()
        .map_err(|err| AnalyzeError::from_figure(path, err))
        .and_then(|grid| {
            let analysis = detector.analyze(&grid)?;
            Ok((grid, analysis))
        });
    (qubit_id, result)
}

/// Analyze one file, writing images under `image_dir` when given.
///
/// Never fails: read, parse and detection errors become an ERROR record.
/// Image export failures are logged and leave the record untouched.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(path, detector, image_dir), fields(path = %path.display()))
)]
pub fn analyze_file(
    path: &Path,
    detector: &QubitResponseDetector,
    image_dir: Option<&Path>,
) -> FileReport {
    let (qubit_id, result) = analyze_figure(path, detector);
    let record = match result {
        Ok((grid, analysis)) => {
            export_images(image_dir, &qubit_id, &grid, &analysis);
            ResultRecord::ok(&analysis.response)
        }
        Err(err) => {
            log::warn!("{}: {}", path.display(), err);
            ResultRecord::error(err.to_string())
        }
    };
    FileReport {
        path: path.to_path_buf(),
        qubit_id,
        record,
    }
}

#[cfg(feature = "image")]
fn export_images(
    image_dir: Option<&Path>,
    qubit_id: &str,
    grid: &qubit_response_core::Grid,
    analysis: &Analysis,
) {
    let Some(dir) = image_dir else {
        return;
    };
    match crate::render::write_images(dir, qubit_id, grid, analysis, &Default::default()) {
        Ok(paths) => log::debug!("qubit {}: wrote {} images", qubit_id, paths.len()),
        Err(err) => log::warn!("qubit {}: image export failed: {}", qubit_id, err),
    }
}

#[cfg(not(feature = "image"))]
fn export_images(
    image_dir: Option<&Path>,
    qubit_id: &str,
    _grid: &qubit_response_core::Grid,
    _analysis: &Analysis,
) {
    if image_dir.is_some() {
        log::warn!("qubit {}: built without the `image` feature, skipping export", qubit_id);
    }
}

/// Analyze files in parallel; reports come back in input order.
pub fn analyze_files<P>(
    paths: &[P],
    detector: &QubitResponseDetector,
    image_dir: Option<&Path>,
) -> Vec<FileReport>
where
    P: AsRef<Path> + Sync,
{
    log::info!("analyzing {} files", paths.len());
    paths
        .par_iter()
        .map(|path| analyze_file(path.as_ref(), detector, image_dir))
        .collect()
}
