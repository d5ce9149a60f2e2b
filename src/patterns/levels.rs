//! Trade level derivation for a short setup off a signal bar.

use serde::{Deserialize, Serialize};

/// Entry/stop/target for a short entered below the signal bar's low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeLevels {
    pub entry_sell: f64,
    pub stop_loss: f64,
    pub target: f64,
}

impl TradeLevels {
    /// Derive levels from the signal bar's low and high.
    ///
    /// Entry sits `entry_buffer` below the low, stop at the high, and the
    /// target extends `risk_reward` times the risk below the entry. Entry and
    /// stop are rounded to 2dp before the risk is taken, so the published
    /// target is consistent with the published entry and stop.
    pub fn compute(low: f64, high: f64, entry_buffer: f64, risk_reward: f64) -> Self {
        let entry = round2(low * (1.0 - entry_buffer));
        let stop = round2(high);
        let risk = stop - entry;
        let target = round2(entry - risk_reward * risk);
        Self {
            entry_sell: entry,
            stop_loss: stop,
            target,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
