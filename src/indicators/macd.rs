// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   MACD      = EMA(fast) - EMA(slow)
//   Signal    = EMA(signal) of MACD
//   Histogram = MACD - Signal
//
// The MACD line appears at bar `slow - 1`; the signal line needs another
// `signal - 1` MACD values, so it first appears at bar `slow + signal - 2`.
// =============================================================================

use chrono::NaiveDate;

use super::ema::{calculate_ema, calculate_ema_from_first_defined};
use crate::types::PriceBar;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdResult {
    pub date: NaiveDate,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
    pub fast_ema: Option<f64>,
    pub slow_ema: Option<f64>,
}

/// One result per bar. Callers validate `fast < slow` and non-zero periods.
pub fn calculate_macd(bars: &[PriceBar], fast: usize, slow: usize, signal: usize) -> Vec<MacdResult> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast_ema = calculate_ema(&closes, fast);
    let slow_ema = calculate_ema(&closes, slow);

    let macd: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = calculate_ema_from_first_defined(&macd, signal);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| MacdResult {
            date: bar.date,
            macd: macd[i],
            signal: signal_line[i],
            histogram: macd[i].zip(signal_line[i]).map(|(m, s)| m - s),
            fast_ema: fast_ema[i],
            slow_ema: slow_ema[i],
        })
        .collect()
}
