//! Integration tests for the return series adapter.

use chrono::NaiveDate;
use hindcast_core::{
    MissingPolicy, ReturnKind, ReturnSeries, RiskError, SeriesIndex, log_returns, simple_returns,
};
use rstest::rstest;

fn business_days(n: usize) -> SeriesIndex {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    SeriesIndex::Dates(
        start
            .iter_days()
            .filter(|d| chrono::Datelike::weekday(d).number_from_monday() <= 5)
            .take(n)
            .collect(),
    )
}

#[rstest]
#[case(vec![0.0])]
#[case(vec![0.012, -0.034, 0.0005, 1e-9, -0.25])]
#[case((0..250).map(|i| ((i as f64) * 0.37).sin() * 0.02).collect())]
fn test_adapter_is_lossless(#[case] raw: Vec<f64>) {
    let index = business_days(raw.len());
    let series = ReturnSeries::new(index.clone(), raw.clone()).unwrap();
    assert_eq!(series.to_vec(), raw);
    assert_eq!(series.index(), &index);
}

#[test]
fn test_prices_to_returns_pipeline() {
    let index = business_days(5);
    let prices = [100.0, 101.0, 99.5, 102.0, 103.5];

    let simple = simple_returns(&index, &prices).unwrap();
    let log = log_returns(&index, &prices).unwrap();

    assert_eq!(simple.kind(), ReturnKind::Simple);
    assert_eq!(log.kind(), ReturnKind::Log);
    assert_eq!(simple.index(), log.index());

    let converted = simple.to_log_returns().unwrap();
    for (a, b) in converted.values().iter().zip(log.values().iter()) {
        assert!((a - b).abs() < 1e-12);
    }
    assert!((simple.total_return() - (103.5 / 100.0 - 1.0)).abs() < 1e-12);
}

#[test]
fn test_missing_mode_round_trip_keeps_gaps() {
    let raw = vec![0.01, f64::NAN, 0.02];
    let series =
        ReturnSeries::with_policy(SeriesIndex::periods(3), raw, MissingPolicy::Exclude).unwrap();
    let back = series.to_vec();
    assert_eq!(back[0], 0.01);
    assert!(back[1].is_nan());
    assert_eq!(back[2], 0.02);
}

#[test]
fn test_duplicate_timestamp_is_validation_error() {
    let d = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let index = SeriesIndex::Dates(vec![d, d]);
    let err = ReturnSeries::new(index, vec![0.01, 0.02]).unwrap_err();
    assert!(matches!(err, RiskError::Validation(_)));
}
