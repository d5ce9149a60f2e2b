//! Unit tests for scan configuration defaults

use bullscan::config::ScanConfig;
use std::time::Duration;

#[test]
fn defaults_match_documented_behavior() {
    let cfg = ScanConfig::default();
    assert_eq!(cfg.lookback_days, 30);
    assert_eq!(cfg.min_candles, 10);
    assert_eq!(cfg.uptrend_window, 5);
    assert_eq!(cfg.entry_buffer, 0.001);
    assert_eq!(cfg.risk_reward, 2.0);
    assert_eq!(cfg.max_workers, 3);
    assert_eq!(cfg.fetch_delay(), Duration::from_millis(500));
}
