// =============================================================================
// Ichimoku Cloud
// =============================================================================
//
//   Tenkan-sen    = midpoint of the highest high / lowest low over `tenkan`
//   Kijun-sen     = same over `kijun`
//   Senkou Span A = (Tenkan + Kijun) / 2, plotted `senkou_offset` bars ahead
//   Senkou Span B = midpoint over `senkou`, plotted `senkou_offset` bars ahead
//   Chikou Span   = close plotted `chikou_offset` bars behind, so the value at
//                   bar i is the close of bar i + chikou_offset
//
// Each line has its own warm-up, so any subset of the five may be absent.
// =============================================================================

use chrono::NaiveDate;

use crate::types::PriceBar;

#[derive(Debug, Clone, PartialEq)]
pub struct IchimokuResult {
    pub date: NaiveDate,
    pub tenkan_sen: Option<f64>,
    pub kijun_sen: Option<f64>,
    pub senkou_span_a: Option<f64>,
    pub senkou_span_b: Option<f64>,
    pub chikou_span: Option<f64>,
}

pub fn calculate_ichimoku(
    bars: &[PriceBar],
    tenkan: usize,
    kijun: usize,
    senkou: usize,
    senkou_offset: usize,
    chikou_offset: usize,
) -> Vec<IchimokuResult> {
    let tenkan_line = midpoint_series(bars, tenkan);
    let kijun_line = midpoint_series(bars, kijun);
    let senkou_line = midpoint_series(bars, senkou);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let source = i.checked_sub(senkou_offset);
            IchimokuResult {
                date: bar.date,
                tenkan_sen: tenkan_line[i],
                kijun_sen: kijun_line[i],
                senkou_span_a: source
                    .and_then(|j| tenkan_line[j].zip(kijun_line[j]))
                    .map(|(t, k)| (t + k) / 2.0),
                senkou_span_b: source.and_then(|j| senkou_line[j]),
                chikou_span: bars.get(i + chikou_offset).map(|b| b.close),
            }
        })
        .collect()
}

/// `(highest high + lowest low) / 2` over the trailing `period` bars.
fn midpoint_series(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    (0..bars.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return None;
            }
            let window = &bars[i + 1 - period..=i];
            let high = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let low = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            Some((high + low) / 2.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_bars;

    #[test]
    fn one_result_per_bar_with_independent_gaps() {
        let bars = test_bars(120);
        let out = calculate_ichimoku(&bars, 9, 26, 52, 26, 26);
        assert_eq!(out.len(), 120);

        // Early bars: tenkan exists, kijun does not yet.
        assert!(out[10].tenkan_sen.is_some());
        assert!(out[10].kijun_sen.is_none());
        // Chikou exists early but not in the last 26 bars.
        assert!(out[10].chikou_span.is_some());
        assert!(out[100].chikou_span.is_none());
        // Senkou B needs 52 bars plus the 26-bar projection.
        assert!(out[76].senkou_span_b.is_none());
        assert!(out[77].senkou_span_b.is_some());
        // Senkou A needs kijun (bar 25) plus the projection.
        assert!(out[50].senkou_span_a.is_none());
        assert!(out[51].senkou_span_a.is_some());
    }

    #[test]
    fn chikou_is_future_close() {
        let bars = test_bars(40);
        let out = calculate_ichimoku(&bars, 9, 26, 52, 26, 26);
        assert_eq!(out[3].chikou_span, Some(bars[29].close));
    }

    #[test]
    fn tenkan_is_window_midpoint() {
        let bars = test_bars(20);
        let out = calculate_ichimoku(&bars, 9, 26, 52, 26, 26);
        let window = &bars[3..12];
        let high = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let low = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        assert_eq!(out[11].tenkan_sen, Some((high + low) / 2.0));
    }
}
