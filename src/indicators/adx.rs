// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.
//   2. Compute True Range (TR) per bar.
//   3. Apply Wilder's smoothing (period) to +DM, -DM, and TR.
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = Wilder's smoothed average of DX over `period` bars.
//
// +DI / -DI first appear at bar `period`; ADX at bar `2 * period - 1`.
// =============================================================================

use chrono::NaiveDate;

use crate::types::PriceBar;

#[derive(Debug, Clone, PartialEq)]
pub struct AdxResult {
    pub date: NaiveDate,
    pub pdi: Option<f64>,
    pub mdi: Option<f64>,
    pub adx: Option<f64>,
}

/// One result per bar; warm-up bars carry `None`.
pub fn calculate_adx(bars: &[PriceBar], period: usize) -> Vec<AdxResult> {
    let n = bars.len();
    let mut pdi = vec![None; n];
    let mut mdi = vec![None; n];
    let mut adx = vec![None; n];

    if period > 0 && n > period {
        let period_f = period as f64;

        let mut smooth_plus_dm = 0.0;
        let mut smooth_minus_dm = 0.0;
        let mut smooth_tr = 0.0;
        let mut dx_sum = 0.0;
        let mut dx_count = 0usize;
        let mut prev_adx: Option<f64> = None;

        for i in 1..n {
            let (plus_dm, minus_dm) = directional_movement(&bars[i], &bars[i - 1]);
            let tr = true_range(&bars[i], bars[i - 1].close);

            if i <= period {
                // Accumulate the initial Wilder sums.
                smooth_plus_dm += plus_dm;
                smooth_minus_dm += minus_dm;
                smooth_tr += tr;
                if i < period {
                    continue;
                }
            } else {
                smooth_plus_dm = smooth_plus_dm - smooth_plus_dm / period_f + plus_dm;
                smooth_minus_dm = smooth_minus_dm - smooth_minus_dm / period_f + minus_dm;
                smooth_tr = smooth_tr - smooth_tr / period_f + tr;
            }

            let Some((plus_di, minus_di, dx)) = compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr)
            else {
                continue;
            };
            pdi[i] = Some(plus_di);
            mdi[i] = Some(minus_di);

            match prev_adx {
                None => {
                    dx_sum += dx;
                    dx_count += 1;
                    if dx_count == period {
                        // Seed ADX with the SMA of the first `period` DX values.
                        let seed = dx_sum / period_f;
                        prev_adx = Some(seed);
                        adx[i] = Some(seed);
                    }
                }
                Some(prev) => {
                    let next = (prev * (period_f - 1.0) + dx) / period_f;
                    if next.is_finite() {
                        prev_adx = Some(next);
                        adx[i] = Some(next);
                    }
                }
            }
        }
    }

    bars.iter()
        .enumerate()
        .map(|(i, bar)| AdxResult {
            date: bar.date,
            pdi: pdi[i],
            mdi: mdi[i],
            adx: adx[i],
        })
        .collect()
}

// =============================================================================
// Internal helpers
// =============================================================================

pub(crate) fn true_range(bar: &PriceBar, prev_close: f64) -> f64 {
    (bar.high - bar.low)
        .max((bar.high - prev_close).abs())
        .max((bar.low - prev_close).abs())
}

fn directional_movement(bar: &PriceBar, prev: &PriceBar) -> (f64, f64) {
    let up_move = bar.high - prev.high;
    let down_move = prev.low - bar.low;

    let plus_dm = if up_move > down_move && up_move > 0.0 {
        up_move
    } else {
        0.0
    };
    let minus_dm = if down_move > up_move && down_move > 0.0 {
        down_move
    } else {
        0.0
    };
    (plus_dm, minus_dm)
}

/// Compute (+DI, -DI, DX) from smoothed +DM, -DM, and TR values.
///
/// A zero true range means the market did not move at all, which reads as
/// zero directional movement rather than a gap in the series.
fn compute_dx(smooth_plus_dm: f64, smooth_minus_dm: f64, smooth_tr: f64) -> Option<(f64, f64, f64)> {
    if smooth_tr == 0.0 {
        return Some((0.0, 0.0, 0.0));
    }

    let plus_di = (smooth_plus_dm / smooth_tr) * 100.0;
    let minus_di = (smooth_minus_dm / smooth_tr) * 100.0;

    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return Some((plus_di, minus_di, 0.0));
    }

    let dx = ((plus_di - minus_di).abs() / di_sum) * 100.0;
    dx.is_finite().then_some((plus_di, minus_di, dx))
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn bars_from(ohlc: impl Iterator<Item = (f64, f64, f64, f64)>) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ohlc.enumerate()
            .map(|(i, (o, h, l, c))| PriceBar::new(start + Duration::days(i as i64), o, h, l, c, 1.0))
            .collect()
    }

    #[test]
    fn adx_period_zero() {
        let bars = bars_from((0..50).map(|_| (1.0, 2.0, 0.5, 1.5)));
        assert!(calculate_adx(&bars, 0).iter().all(|r| r.adx.is_none()));
    }

    #[test]
    fn adx_warm_up_boundary() {
        let bars = bars_from((0..60).map(|i| {
            let base = 100.0 + i as f64;
            (base, base + 1.0, base - 0.5, base + 0.5)
        }));
        let out = calculate_adx(&bars, 14);
        assert!(out[13].pdi.is_none());
        assert!(out[14].pdi.is_some());
        assert!(out[26].adx.is_none());
        assert!(out[27].adx.is_some());
    }

    #[test]
    fn adx_strong_uptrend() {
        let bars = bars_from((0..60).map(|i| {
            let base = 100.0 + i as f64 * 2.0;
            (base, base + 1.5, base - 0.5, base + 1.0)
        }));
        let value = calculate_adx(&bars, 14).last().unwrap().adx.unwrap();
        assert!(value > 25.0, "expected ADX > 25 for strong trend, got {value}");
    }

    #[test]
    fn adx_flat_market() {
        let bars = bars_from((0..60).map(|_| (100.0, 101.0, 99.0, 100.0)));
        let value = calculate_adx(&bars, 14).last().unwrap().adx.unwrap();
        assert!(value < 1.0, "expected ADX near 0 for flat market, got {value}");
    }

    #[test]
    fn adx_result_range() {
        let bars = bars_from((0..100).map(|i| {
            let base = 50.0 + (i as f64 * 0.3).sin() * 10.0;
            (base - 0.5, base + 1.0, base - 1.0, base + 0.5)
        }));
        for value in calculate_adx(&bars, 14).iter().filter_map(|r| r.adx) {
            assert!((0.0..=100.0).contains(&value), "ADX {value} out of [0,100] range");
        }
    }
}
