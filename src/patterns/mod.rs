//! Pure pattern detection: uptrend test, shooting-star test, and series
//! classification. No I/O anywhere in this module.

pub mod levels;

pub use levels::TradeLevels;

use chrono::{DateTime, Utc};

use crate::config::ScanConfig;
use crate::models::bar::Bar;
use crate::models::scan::RejectReason;

/// True iff the last `window` closes of `bars` are strictly increasing.
///
/// Any flat or down tick inside the window fails the test, as does a series
/// shorter than the window.
pub fn is_uptrend(bars: &[Bar], window: usize) -> bool {
    if window == 0 || bars.len() < window {
        return false;
    }
    bars[bars.len() - window..]
        .windows(2)
        .all(|pair| pair[1].close > pair[0].close)
}

/// Single-bar shape test for a bearish shooting star.
///
/// A zero-length body is never a shooting star (the shadow ratios would be
/// unbounded). Otherwise: upper shadow at least twice the body, lower shadow
/// at most a tenth of the body, and a red close.
pub fn is_shooting_star(bar: &Bar) -> bool {
    let body = (bar.close - bar.open).abs();
    if body == 0.0 {
        return false;
    }
    let upper_shadow = bar.high - bar.open.max(bar.close);
    let lower_shadow = bar.open.min(bar.close) - bar.low;
    upper_shadow >= 2.0 * body && lower_shadow <= 0.1 * body && bar.close < bar.open
}

/// Result of classifying one symbol's bar series.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Eligible {
        candle_time: DateTime<Utc>,
        levels: TradeLevels,
    },
    Rejected(RejectReason),
}

/// Classify a chronologically ascending bar series.
///
/// The last bar is the candidate signal bar; everything before it is context.
/// The uptrend test reads the trailing `cfg.uptrend_window` closes of the
/// context, the shooting-star test applies to the candidate only.
pub fn classify_series(bars: &[Bar], cfg: &ScanConfig) -> Classification {
    if bars.len() < cfg.min_candles {
        return Classification::Rejected(RejectReason::NotEnoughCandles);
    }
    let Some((signal, context)) = bars.split_last() else {
        return Classification::Rejected(RejectReason::NotEnoughCandles);
    };
    if !is_uptrend(context, cfg.uptrend_window) {
        return Classification::Rejected(RejectReason::NoUptrend);
    }
    if !is_shooting_star(signal) {
        return Classification::Rejected(RejectReason::NoShootingStar);
    }
    Classification::Eligible {
        candle_time: signal.time,
        levels: TradeLevels::compute(signal.low, signal.high, cfg.entry_buffer, cfg.risk_reward),
    }
}
