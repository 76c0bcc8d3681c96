// =============================================================================
// SuperTrend
// =============================================================================
//
// ATR-offset bands around the bar midpoint that ratchet in the direction of
// the trend:
//
//   basic upper = mid + multiplier * ATR
//   basic lower = mid - multiplier * ATR
//
// The upper band only moves down (and the lower band only up) unless the
// previous close broke through it. While bearish the SuperTrend line is the
// upper band; while bullish it is the lower band. A close at or beyond the
// active band flips the trend. Exactly one of `upper_band` / `lower_band` is
// reported per computed bar.
// =============================================================================

use chrono::NaiveDate;

use super::atr::calculate_atr;
use crate::types::PriceBar;

#[derive(Debug, Clone, PartialEq)]
pub struct SuperTrendResult {
    pub date: NaiveDate,
    pub super_trend: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
}

/// One result per bar; the first value lands on bar `period`.
pub fn calculate_super_trend(bars: &[PriceBar], period: usize, multiplier: f64) -> Vec<SuperTrendResult> {
    let atr = calculate_atr(bars, period);

    let mut is_bullish = true;
    let mut prev_upper: Option<f64> = None;
    let mut prev_lower: Option<f64> = None;

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let mut result = SuperTrendResult {
                date: bar.date,
                super_trend: None,
                upper_band: None,
                lower_band: None,
            };
            let Some(atr) = atr[i] else {
                return result;
            };

            let mid = bar.mid();
            let upper_eval = mid + multiplier * atr;
            let lower_eval = mid - multiplier * atr;
            let prev_close = bars[i - 1].close;

            let (upper, lower) = match (prev_upper, prev_lower) {
                (Some(pu), Some(pl)) => {
                    let upper = if upper_eval < pu || prev_close > pu { upper_eval } else { pu };
                    let lower = if lower_eval > pl || prev_close < pl { lower_eval } else { pl };
                    (upper, lower)
                }
                _ => {
                    is_bullish = bar.close >= mid;
                    (upper_eval, lower_eval)
                }
            };

            let active = if is_bullish { lower } else { upper };
            if bar.close <= active {
                is_bullish = false;
                result.super_trend = Some(upper);
                result.upper_band = Some(upper);
            } else {
                is_bullish = true;
                result.super_trend = Some(lower);
                result.lower_band = Some(lower);
            }

            prev_upper = Some(upper);
            prev_lower = Some(lower);
            result
        })
        .collect()
}
