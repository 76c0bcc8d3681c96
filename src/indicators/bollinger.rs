// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), using the population standard deviation of
// the window. %B locates the close within the bands; width is the normalised
// distance (upper - lower) / middle.

use chrono::NaiveDate;

use crate::types::PriceBar;

/// Bands for a single bar. All fields are `None` during warm-up.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerResult {
    pub date: NaiveDate,
    pub upper_band: Option<f64>,
    pub middle_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub percent_b: Option<f64>,
    pub width: Option<f64>,
}

/// Calculate Bollinger Bands over the closes of `bars`, one result per bar.
///
/// The first values appear at bar `period - 1`. `percent_b` is `None` when the
/// bands collapse (zero deviation) and `width` is `None` for a zero middle
/// band.
pub fn calculate_bollinger(bars: &[PriceBar], period: usize, num_std: f64) -> Vec<BollingerResult> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let mut result = BollingerResult {
                date: bar.date,
                upper_band: None,
                middle_band: None,
                lower_band: None,
                percent_b: None,
                width: None,
            };
            if period == 0 || i + 1 < period {
                return result;
            }

            let window = &closes[i + 1 - period..=i];
            let middle = window.iter().sum::<f64>() / period as f64;
            let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period as f64;
            let std_dev = variance.sqrt();

            let upper = middle + num_std * std_dev;
            let lower = middle - num_std * std_dev;

            result.upper_band = Some(upper);
            result.middle_band = Some(middle);
            result.lower_band = Some(lower);
            result.percent_b = (upper != lower).then(|| (bar.close - lower) / (upper - lower));
            result.width = (middle != 0.0).then(|| (upper - lower) / middle);
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_bars;

    #[test]
    fn bollinger_basic() {
        let out = calculate_bollinger(&test_bars(30), 20, 2.0);
        assert!(out[18].upper_band.is_none());
        let bb = &out[19];
        assert!(bb.upper_band.unwrap() > bb.middle_band.unwrap());
        assert!(bb.lower_band.unwrap() < bb.middle_band.unwrap());
        assert!(bb.width.unwrap() > 0.0);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let out = calculate_bollinger(&test_bars(3), 20, 2.0);
        assert!(out.iter().all(|r| r.upper_band.is_none() && r.lower_band.is_none()));
    }

    #[test]
    fn bollinger_flat() {
        let mut bars = test_bars(20);
        for bar in &mut bars {
            bar.close = 100.0;
        }
        let bb = calculate_bollinger(&bars, 20, 2.0).pop().unwrap();
        assert_eq!(bb.upper_band, Some(100.0));
        assert_eq!(bb.lower_band, Some(100.0));
        assert!(bb.percent_b.is_none());
        assert!((bb.width.unwrap() - 0.0).abs() < 1e-10);
    }
}
