//! Integration tests for the analysis pipeline
//!
//! Tests the complete flow from a raw window (or container file) through
//! cleaning, filtering, detection and matching.

mod common;

use std::fs;

use stereo_core::{
    analyze, load_pair, AnalysisConfig, AnalysisError, JsonContainer, Spacecraft,
};

use common::{to_container_json, Burst, WindowBuilder, DT};

fn burst() -> Burst {
    Burst::new(60, 25, 100.0)
}

#[test]
fn test_single_burst_seen_by_both() {
    let pair = WindowBuilder::new(12, 200).burst_pair(burst(), 3).build();

    let report = analyze(pair, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.events_a.len(), 1);
    assert_eq!(report.events_b.len(), 1);
    assert_eq!(report.events_a[0].first(), 60);
    assert_eq!(report.events_b[0].first(), 63);
    assert_eq!(report.events(Spacecraft::B)[0].len(), 25);

    assert_eq!(report.matches.len(), 1);
    let pair = &report.matches[0];
    assert_eq!(pair.a.len(), 24);
    assert_eq!(pair.b.len(), 24);
    assert_eq!(pair.a.time[0], 60.0 * DT);
    assert_eq!(pair.b.time[0], 63.0 * DT);
}

#[test]
fn test_defective_channels_blanked_on_a_only() {
    let pair = WindowBuilder::new(12, 200).burst_pair(burst(), 3).build();

    let report = analyze(pair, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.blanked_a, vec![0, 1, 2, 3, 4]);
    assert!(report.blanked_b.is_empty());
    for row in 0..5 {
        assert!(report.pair.a.power.row(row).iter().all(|p| *p == report.stats.min));
    }
}

#[test]
fn test_distant_bursts_not_matched() {
    // 30 samples is 1140 s, beyond the 960 s stereo distance
    let pair = WindowBuilder::new(12, 200).burst_pair(burst(), 30).build();

    let report = analyze(pair, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.events_a.len(), 1);
    assert_eq!(report.events_b.len(), 1);
    assert!(report.matches.is_empty());
}

#[test]
fn test_burst_on_one_spacecraft_only() {
    let pair = WindowBuilder::new(12, 200)
        .burst(Spacecraft::A, burst())
        .burst(Spacecraft::B, Burst::new(150, 5, 100.0))
        .build();

    let report = analyze(pair, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.events_b.len(), 1);
    assert_eq!(report.events_b[0].len(), 5);
    assert!(report.matches.is_empty());
}

#[test]
fn test_worthwhile_length_from_config() {
    let pair = WindowBuilder::new(12, 200).burst_pair(burst(), 3).build();
    let config = AnalysisConfig::default().with_worthwhile_length(30);

    let report = analyze(pair, &config).unwrap();

    assert_eq!(report.events_a.len(), 1);
    assert!(report.matches.is_empty());
}

#[test]
fn test_interference_columns_removed_from_both() {
    let pair = WindowBuilder::new(12, 200)
        .burst_pair(burst(), 3)
        .nan_columns(Spacecraft::A, 120..130)
        .build();

    let report = analyze(pair, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.pair.a.samples(), 190);
    assert_eq!(report.pair.b.samples(), 190);
    assert!(report.pair.a.power.iter().all(|p| !p.is_nan()));
    assert_eq!(report.pair.b.time[120], 130.0 * DT);
    assert_eq!(report.matches.len(), 1);
}

#[test]
fn test_uncalibrated_channels_removed() {
    let pair = WindowBuilder::new(12, 200)
        .burst_pair(burst(), 3)
        .nan_channels(Spacecraft::B, 9..12)
        .build();

    let report = analyze(pair, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.pair.a.channels(), 12);
    assert_eq!(report.pair.b.channels(), 9);
    assert!(report.pair.b.frequency.iter().all(|f| !f.is_nan()));
    assert_eq!(report.matches.len(), 1);
}

#[test]
fn test_length_mismatch_is_fatal() {
    let pair = WindowBuilder::new(12, 200).samples_b(180).build();

    let err = analyze(pair, &AnalysisConfig::default()).unwrap_err();

    assert!(matches!(err, AnalysisError::LengthMismatch { a: 200, b: 180 }));
    assert!(err.to_string().contains("different lengths"));
}

#[test]
fn test_invalid_config_rejected() {
    let pair = WindowBuilder::new(12, 200).build();
    let config = AnalysisConfig::default().with_significance_fraction(1.5);

    let err = analyze(pair, &config).unwrap_err();
    assert!(matches!(err, AnalysisError::Config { .. }));
}

#[test]
fn test_single_sample_events_not_matchable() {
    let pair = WindowBuilder::new(12, 200).burst_pair(burst(), 3).build();
    let config = AnalysisConfig::default().with_worthwhile_length(1);

    let err = analyze(pair, &config).unwrap_err();
    assert!(matches!(err, AnalysisError::Config { field: "worthwhile_length", .. }));
}

#[test]
fn test_container_file_round_trip() {
    let pair = WindowBuilder::new(12, 200)
        .seed(7)
        .burst_pair(burst(), 3)
        .nan_columns(Spacecraft::B, 150..160)
        .nan_channels(Spacecraft::A, 10..12)
        .build();
    let expected = analyze(pair.clone(), &AnalysisConfig::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("window.json");
    fs::write(&path, to_container_json(&pair).to_string()).unwrap();

    let container = JsonContainer::open(&path).unwrap();
    let loaded = load_pair(&container).unwrap();
    assert!(loaded.b.power.column(155).iter().all(|p| p.is_nan()));
    assert!(loaded.a.frequency[11].is_nan());

    let report = analyze(loaded, &AnalysisConfig::default()).unwrap();
    assert_eq!(report.events_a, expected.events_a);
    assert_eq!(report.events_b, expected.events_b);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.pair.a.samples(), 190);
    assert_eq!(report.pair.a.channels(), 10);
}

#[test]
fn test_missing_dataset_reported() {
    let container = JsonContainer::from_value(serde_json::json!({ "spectrogram": {} }));

    let err = load_pair(&container).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingDataset(name) if name == "spectrogram/Time_A"));
}
