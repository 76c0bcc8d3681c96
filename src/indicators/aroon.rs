// =============================================================================
// Aroon Up / Down
// =============================================================================
//
// Measures how recently the highest high and lowest low occurred within the
// trailing window of `period + 1` bars:
//
//   Aroon Up   = 100 * (period - bars since highest high) / period
//   Aroon Down = 100 * (period - bars since lowest low)  / period
//
// Ties resolve to the earliest bar in the window.
// =============================================================================

use chrono::NaiveDate;

use crate::types::PriceBar;

#[derive(Debug, Clone, PartialEq)]
pub struct AroonResult {
    pub date: NaiveDate,
    pub aroon_up: Option<f64>,
    pub aroon_down: Option<f64>,
    pub oscillator: Option<f64>,
}

pub fn calculate_aroon(bars: &[PriceBar], period: usize) -> Vec<AroonResult> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let (aroon_up, aroon_down) = if period > 0 && i >= period {
                let (up, down) = aroon_at(&bars[i - period..=i], period);
                (Some(up), Some(down))
            } else {
                (None, None)
            };
            AroonResult {
                date: bar.date,
                aroon_up,
                aroon_down,
                oscillator: aroon_up.zip(aroon_down).map(|(u, d)| u - d),
            }
        })
        .collect()
}

fn aroon_at(window: &[PriceBar], period: usize) -> (f64, f64) {
    let mut high_idx = 0;
    let mut low_idx = 0;
    for (j, bar) in window.iter().enumerate() {
        if bar.high > window[high_idx].high {
            high_idx = j;
        }
        if bar.low < window[low_idx].low {
            low_idx = j;
        }
    }

    let last = window.len() - 1;
    let period_f = period as f64;
    let up = 100.0 * (period_f - (last - high_idx) as f64) / period_f;
    let down = 100.0 * (period_f - (last - low_idx) as f64) / period_f;
    (up, down)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_bars;

    #[test]
    fn warm_up_is_period_bars() {
        let out = calculate_aroon(&test_bars(40), 25);
        assert!(out[24].aroon_up.is_none());
        assert!(out[25].aroon_up.is_some());
        assert!(out[25].aroon_down.is_some());
    }

    #[test]
    fn fresh_high_reads_one_hundred() {
        let mut bars = test_bars(10);
        for (i, bar) in bars.iter_mut().enumerate() {
            bar.high = 10.0 + i as f64;
            bar.low = 5.0 + i as f64;
        }
        let out = calculate_aroon(&bars, 5);
        let last = out.last().unwrap();
        assert_eq!(last.aroon_up, Some(100.0));
        // Lowest low is the oldest bar in the 6-bar window: 5 bars ago.
        assert_eq!(last.aroon_down, Some(0.0));
        assert_eq!(last.oscillator, Some(100.0));
    }

    #[test]
    fn values_stay_in_range() {
        for r in calculate_aroon(&test_bars(120), 14) {
            if let Some(up) = r.aroon_up {
                assert!((0.0..=100.0).contains(&up));
            }
        }
    }
}
