use approx::assert_relative_eq;
use qubit_response_detector::{
    Axis, DetectorParams, Grid, MomentWeighting, QubitResponseDetector, QubitResponseError,
    ResultRecord, Status,
};

const WIDTH: usize = 40;
const HEIGHT: usize = 31;

fn params() -> DetectorParams {
    DetectorParams {
        binarize_threshold_sigma_plus: 2.0,
        binarize_threshold_sigma_minus: -2.0,
        top_level: 0.0,
        f01_height_min: 5.0,
        f01_moment_thresholds: vec![10.0, 100.0, 500.0],
        f12_distance_min: 0.05,
        f12_distance_max: 0.3,
        f12_height_min: 5.0,
        moment_weighting: MomentWeighting::Cell,
    }
}

fn detector() -> QubitResponseDetector {
    QubitResponseDetector::new(params()).expect("valid params")
}

/// Weak background ripple, well inside the sigma band.
fn background() -> Vec<f64> {
    (0..HEIGHT)
        .flat_map(|r| (0..WIDTH).map(move |c| ((r * 7 + c * 13) % 5) as f64 * 0.01))
        .collect()
}

/// Set `depth` cells of column `col`, counting down from the top row.
fn hang(samples: &mut [f64], col: usize, depth: usize, value: f64) {
    for row in HEIGHT - depth..HEIGHT {
        samples[row * WIDTH + col] = value;
    }
}

/// 4.00..4.39 GHz against levels -30..=0.
fn build(samples: Vec<f64>) -> Result<Grid, QubitResponseError> {
    let freqs = Axis::linear(4.0, 0.01, WIDTH).expect("freqs");
    let levels = Axis::linear(-30.0, 1.0, HEIGHT).expect("levels");
    Ok(Grid::new(freqs, levels, samples)?)
}

fn run(samples: Vec<f64>) -> ResultRecord {
    let result = build(samples).and_then(|grid| detector().detect(&grid));
    ResultRecord::from(&result)
}

#[test]
fn all_zero_grid_is_an_error_record() {
    let record = run(vec![0.0; WIDTH * HEIGHT]);
    assert_eq!(record.status, Status::Error);
    assert_eq!(record.f01_frequency, None);
    assert_eq!(record.f12_frequency, None);
    assert_eq!(record.quality_level, None);
    assert!(record.error.expect("message").contains("degenerate"));
}

#[test]
fn strong_single_mountain_has_max_quality() {
    let mut samples = background();
    for col in 29..=31 {
        hang(&mut samples, col, 20, 1.0);
    }
    let grid = build(samples).expect("grid");
    let response = detector().detect(&grid).expect("response");

    let f01 = response.f01.as_ref().expect("f01");
    assert_eq!(f01.cell.col, 29);
    assert_relative_eq!(f01.frequency, 4.29, epsilon = 1e-9);
    assert_relative_eq!(f01.height, 19.0);
    assert_relative_eq!(f01.moment, 3.0 * 190.0, epsilon = 1e-9);
    assert_eq!(response.quality_level, params().quality_levels() - 1);
    assert!(response.f12.is_none());

    let record = ResultRecord::ok(&response);
    assert!(record.is_ok());
    assert_eq!(record.quality_level, Some(3));
    assert_eq!(record.f12_frequency, None);
}

#[test]
fn short_mountain_is_ok_with_zero_quality() {
    let mut samples = background();
    hang(&mut samples, 20, 3, 1.0);
    let record = run(samples);
    assert_eq!(record.status, Status::Ok);
    assert_eq!(record.f01_frequency, None);
    assert_eq!(record.f12_frequency, None);
    assert_eq!(record.quality_level, Some(0));
    assert_eq!(record.error, None);
}

#[test]
fn nan_cell_is_an_error_record() {
    let mut samples = background();
    hang(&mut samples, 30, 20, 1.0);
    samples[5 * WIDTH + 7] = f64::NAN;
    let record = run(samples);
    assert_eq!(record.status, Status::Error);
    assert_eq!(record.quality_level, None);
    let message = record.error.expect("message");
    assert!(message.contains("invalid input data"), "{message}");
}

#[test]
fn f12_prefers_highest_frequency_inside_window() {
    let mut samples = background();
    hang(&mut samples, 30, 20, 1.0);
    // Inside the window but lower in frequency.
    hang(&mut samples, 2, 10, 1.0);
    // Inside the window: the expected f12.
    hang(&mut samples, 15, 8, 1.0);
    // Tall enough but closer to f01 than f12_distance_min.
    hang(&mut samples, 28, 10, 1.0);
    // Inside the window but too short.
    hang(&mut samples, 22, 3, 1.0);

    let response = detector()
        .detect(&build(samples).expect("grid"))
        .expect("response");
    let f01 = response.f01.as_ref().expect("f01");
    assert_eq!(f01.cell.col, 30);
    let f12 = response.f12.as_ref().expect("f12");
    assert_eq!(f12.cell.col, 15);
    assert_eq!(f12.cell.row, HEIGHT - 8);
    assert_relative_eq!(f12.distance, 0.15, epsilon = 1e-9);
    assert_relative_eq!(f12.height, 7.0);
}

#[test]
fn f12_always_respects_window_and_height() {
    let p = params();
    for col in 0..29 {
        let mut samples = background();
        hang(&mut samples, 30, 20, 1.0);
        hang(&mut samples, col, 8, 1.0);
        let response = detector()
            .detect(&build(samples).expect("grid"))
            .expect("response");
        let f01 = response.f01_frequency().expect("f01");

        if let Some(f12) = response.f12.as_ref() {
            let distance = f01 - f12.frequency;
            assert!(distance >= p.f12_distance_min && distance <= p.f12_distance_max);
            assert!(f12.height >= p.f12_height_min);
        }
        match col {
            2..=23 => assert!(response.f12.is_some(), "col {col}"),
            27 | 28 => assert!(response.f12.is_none(), "col {col}"),
            _ => {}
        }
    }
}

#[test]
fn detection_is_deterministic() {
    let mut samples = background();
    hang(&mut samples, 30, 12, -1.0);
    hang(&mut samples, 18, 9, 0.8);
    let grid = build(samples).expect("grid");
    let first = detector().detect(&grid).expect("first");
    let second = detector().detect(&grid).expect("second");
    assert_eq!(first, second);
    assert!(first.f01.is_some());
}

#[test]
fn f01_needs_moment_above_first_threshold() {
    // Six cells deep: height 5 passes the gate, arms 0..=5 sum to 15.
    let mut samples = background();
    hang(&mut samples, 20, 6, 1.0);
    let grid = build(samples).expect("grid");

    let at_threshold = QubitResponseDetector::new(DetectorParams {
        f01_moment_thresholds: vec![15.0, 100.0],
        ..params()
    })
    .expect("detector")
    .detect(&grid)
    .expect("response");
    assert_eq!(at_threshold.quality_level, 0);
    assert!(at_threshold.f01.is_none());
    assert!(at_threshold.f12.is_none());

    let above = QubitResponseDetector::new(DetectorParams {
        f01_moment_thresholds: vec![14.5, 100.0],
        ..params()
    })
    .expect("detector")
    .detect(&grid)
    .expect("response");
    assert_eq!(above.quality_level, 1);
    let f01 = above.f01.as_ref().expect("f01");
    assert_eq!(f01.cell.col, 20);
    assert_relative_eq!(f01.moment, 15.0);
    assert_eq!(f01.quality_level, 1);
}
