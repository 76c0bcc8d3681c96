// =============================================================================
// On-Balance Volume (OBV)
// =============================================================================
//
// Running total of volume signed by the close-to-close direction:
//   close >  prev close  => OBV += volume
//   close <  prev close  => OBV -= volume
//   close == prev close  => unchanged
//
// The first bar seeds OBV at zero. An optional SMA of OBV smooths the line.
// =============================================================================

use chrono::NaiveDate;

use super::ema::calculate_sma;
use crate::types::PriceBar;

#[derive(Debug, Clone, PartialEq)]
pub struct ObvResult {
    pub date: NaiveDate,
    pub obv: Option<f64>,
    pub obv_sma: Option<f64>,
}

pub fn calculate_obv(bars: &[PriceBar], sma_periods: Option<usize>) -> Vec<ObvResult> {
    let mut running = 0.0;
    let obv: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i > 0 {
                let prev_close = bars[i - 1].close;
                if bar.close > prev_close {
                    running += bar.volume;
                } else if bar.close < prev_close {
                    running -= bar.volume;
                }
            }
            running
        })
        .collect();

    let smoothed = match sma_periods {
        Some(period) => calculate_sma(&obv, period),
        None => vec![None; obv.len()],
    };

    bars.iter()
        .zip(obv.into_iter().zip(smoothed))
        .map(|(bar, (value, sma))| ObvResult {
            date: bar.date,
            obv: Some(value),
            obv_sma: sma,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_bars;

    #[test]
    fn signed_running_total() {
        let mut bars = test_bars(4);
        let closes = [10.0, 11.0, 9.0, 9.0];
        for (bar, close) in bars.iter_mut().zip(closes) {
            bar.close = close;
            bar.volume = 100.0;
        }
        let obv: Vec<f64> = calculate_obv(&bars, None).iter().filter_map(|r| r.obv).collect();
        assert_eq!(obv, vec![0.0, 100.0, 0.0, 0.0]);
    }

    #[test]
    fn every_bar_has_a_value() {
        let out = calculate_obv(&test_bars(25), None);
        assert!(out.iter().all(|r| r.obv.is_some() && r.obv_sma.is_none()));
    }

    #[test]
    fn optional_smoothing() {
        let out = calculate_obv(&test_bars(25), Some(5));
        assert!(out[3].obv_sma.is_none());
        assert!(out[4].obv_sma.is_some());
    }
}
