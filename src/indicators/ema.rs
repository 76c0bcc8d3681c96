// =============================================================================
// Moving averages (SMA / EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period` values.
// Both series are aligned with their input: index `i` of the output belongs to
// index `i` of the input, and warm-up slots hold `None`.
// =============================================================================

/// Rolling simple moving average, aligned with `values`.
///
/// Slots before `period - 1` are `None`; `period == 0` yields all `None`.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = Some(sum / period as f64);
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = Some(sum / period as f64);
    }
    out
}

/// EMA series for `values` and look-back `period`, aligned with the input.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `values.len() < period` => all `None`
/// - A non-finite intermediate value ends the series; later slots stay `None`.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let sma: f64 = values[..period].iter().sum::<f64>() / period as f64;
    if !sma.is_finite() {
        return out;
    }
    out[period - 1] = Some(sma);

    let mut prev_ema = sma;
    for (i, &value) in values.iter().enumerate().skip(period) {
        let ema = value * multiplier + prev_ema * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        out[i] = Some(ema);
        prev_ema = ema;
    }
    out
}

/// EMA over a series that only becomes defined part-way through (e.g. the MACD
/// line). The first `Some` starts the contiguous run that is averaged; the
/// output stays aligned with `values`.
pub fn calculate_ema_from_first_defined(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let Some(start) = values.iter().position(Option::is_some) else {
        return out;
    };

    let run: Vec<f64> = values[start..].iter().map_while(|v| *v).collect();
    for (offset, ema) in calculate_ema(&run, period).into_iter().enumerate() {
        out[start + offset] = ema;
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_warm_up_and_values() {
        let sma = calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(sma[..2].iter().all(Option::is_none));
        assert!((sma[2].unwrap() - 2.0).abs() < 1e-12);
        assert!((sma[4].unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn ema_period_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn ema_insufficient_data() {
        let ema = calculate_ema(&[1.0, 2.0], 5);
        assert_eq!(ema.len(), 2);
        assert!(ema.iter().all(Option::is_none));
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of [1..=10]: SMA seed 3.0, multiplier 1/3.
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let ema = calculate_ema(&values, 5);
        assert_eq!(ema.len(), 10);
        assert!(ema[..4].iter().all(Option::is_none));

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        assert!((ema[4].unwrap() - expected).abs() < 1e-10);
        for i in 5..10 {
            expected = values[i] * mult + expected * (1.0 - mult);
            assert!((ema[i].unwrap() - expected).abs() < 1e-10, "index {i}");
        }
    }

    #[test]
    fn ema_stops_at_nan() {
        let ema = calculate_ema(&[1.0, 2.0, 3.0, f64::NAN, 5.0], 3);
        assert!(ema[2].is_some());
        assert!(ema[3].is_none());
        assert!(ema[4].is_none());
    }

    #[test]
    fn ema_of_partially_defined_series() {
        let values = [None, None, Some(2.0), Some(4.0), Some(6.0), Some(8.0)];
        let ema = calculate_ema_from_first_defined(&values, 3);
        assert!(ema[..4].iter().all(Option::is_none));
        // Seed = (2 + 4 + 6) / 3
        assert!((ema[4].unwrap() - 4.0).abs() < 1e-12);
        assert!((ema[5].unwrap() - 6.0).abs() < 1e-12);
    }
}
