//! Unit tests for the pattern engine

use bullscan::config::ScanConfig;
use bullscan::models::{Bar, RejectReason};
use bullscan::patterns::{classify_series, is_shooting_star, is_uptrend, Classification};
use chrono::{Duration, Utc};

fn bar(days_ago: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar::new(Utc::now() - Duration::days(days_ago), open, high, low, close)
}

fn bars_with_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let days_ago = (closes.len() - i) as i64;
            bar(days_ago, close, close + 0.5, close - 0.5, close)
        })
        .collect()
}

#[test]
fn uptrend_with_strictly_increasing_closes() {
    let bars = bars_with_closes(&[100.0, 101.0, 102.0, 103.0, 104.0]);
    assert!(is_uptrend(&bars, 5));
}

#[test]
fn uptrend_fails_on_single_flat_pair() {
    let bars = bars_with_closes(&[100.0, 101.0, 101.0, 103.0, 104.0]);
    assert!(!is_uptrend(&bars, 5));
}

#[test]
fn uptrend_fails_on_down_tick() {
    let bars = bars_with_closes(&[100.0, 101.0, 100.5, 103.0, 104.0]);
    assert!(!is_uptrend(&bars, 5));
}

#[test]
fn uptrend_fails_when_series_shorter_than_window() {
    let bars = bars_with_closes(&[101.0, 102.0, 103.0, 104.0]);
    assert!(!is_uptrend(&bars, 5));
}

#[test]
fn uptrend_only_reads_trailing_window() {
    // A down tick before the evaluated window must not matter.
    let bars = bars_with_closes(&[150.0, 100.0, 101.0, 102.0, 103.0, 104.0]);
    assert!(is_uptrend(&bars, 5));
}

#[test]
fn shooting_star_matches_reference_bar() {
    let signal = bar(0, 107.0, 110.0, 106.9, 106.8);
    assert!(is_shooting_star(&signal));
}

#[test]
fn zero_body_is_never_a_shooting_star() {
    let doji = bar(0, 107.0, 108.0, 106.5, 107.0);
    assert!(!is_shooting_star(&doji));
}

#[test]
fn bullish_body_is_not_a_shooting_star() {
    let green = bar(0, 107.0, 110.0, 107.0, 107.2);
    assert!(!is_shooting_star(&green));
}

#[test]
fn long_lower_shadow_disqualifies() {
    let hammerish = bar(0, 107.0, 110.0, 105.0, 106.8);
    assert!(!is_shooting_star(&hammerish));
}

#[test]
fn short_upper_shadow_disqualifies() {
    let stub = bar(0, 107.0, 107.1, 106.95, 106.9);
    assert!(!is_shooting_star(&stub));
}

fn eligible_series() -> Vec<Bar> {
    // Nine context bars whose trailing five closes rise strictly, then the
    // reference shooting star.
    let mut bars = bars_with_closes(&[98.0, 97.0, 99.0, 100.0, 100.5, 101.0, 102.0, 103.0, 104.0]);
    bars.push(bar(0, 107.0, 110.0, 106.9, 106.8));
    bars
}

#[test]
fn classify_rejects_short_series() {
    let cfg = ScanConfig::default();
    let bars = bars_with_closes(&[100.0, 101.0, 102.0, 103.0, 104.0]);
    assert_eq!(
        classify_series(&bars, &cfg),
        Classification::Rejected(RejectReason::NotEnoughCandles)
    );
}

#[test]
fn classify_rejects_empty_series() {
    let cfg = ScanConfig {
        min_candles: 0,
        ..ScanConfig::default()
    };
    assert_eq!(
        classify_series(&[], &cfg),
        Classification::Rejected(RejectReason::NotEnoughCandles)
    );
}

#[test]
fn classify_flags_shooting_star_after_uptrend() {
    let cfg = ScanConfig::default();
    let bars = eligible_series();
    match classify_series(&bars, &cfg) {
        Classification::Eligible {
            candle_time,
            levels,
        } => {
            assert_eq!(candle_time, bars.last().map(|b| b.time).unwrap());
            assert_eq!(levels.entry_sell, 106.79);
            assert_eq!(levels.stop_loss, 110.0);
            assert_eq!(levels.target, 100.37);
        }
        other => panic!("expected eligible classification, got {:?}", other),
    }
}

#[test]
fn classify_rejects_without_uptrend() {
    let cfg = ScanConfig::default();
    let mut bars = bars_with_closes(&[100.0; 9]);
    bars.push(bar(0, 107.0, 110.0, 106.9, 106.8));
    assert_eq!(
        classify_series(&bars, &cfg),
        Classification::Rejected(RejectReason::NoUptrend)
    );
}

#[test]
fn classify_rejects_without_shooting_star() {
    let cfg = ScanConfig::default();
    let mut bars = bars_with_closes(&[98.0, 97.0, 99.0, 100.0, 100.5, 101.0, 102.0, 103.0, 104.0]);
    bars.push(bar(0, 105.0, 105.5, 104.5, 105.2));
    assert_eq!(
        classify_series(&bars, &cfg),
        Classification::Rejected(RejectReason::NoShootingStar)
    );
}
