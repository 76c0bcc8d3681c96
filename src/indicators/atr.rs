// =============================================================================
// Average True Range (ATR): Wilder's Smoothing Method
// =============================================================================
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is then the smoothed average of TR using Wilder's method:
//   ATR_0   = SMA of first `period` TR values
//   ATR_t   = (ATR_{t-1} * (period - 1) + TR_t) / period
//
// The first bar has no predecessor, so the first ATR lands on bar `period`.
// =============================================================================

use super::adx::true_range;
use crate::types::PriceBar;

/// ATR series aligned with `bars`.
pub fn calculate_atr(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() < period + 1 {
        return out;
    }

    let period_f = period as f64;
    let mut tr_sum = 0.0;
    let mut atr: Option<f64> = None;

    for i in 1..bars.len() {
        let tr = true_range(&bars[i], bars[i - 1].close);
        atr = match atr {
            None => {
                tr_sum += tr;
                (i == period).then(|| tr_sum / period_f)
            }
            Some(prev) => Some((prev * (period_f - 1.0) + tr) / period_f),
        };
        match atr {
            Some(v) if !v.is_finite() => break,
            _ => out[i] = atr,
        }
    }
    out
}
