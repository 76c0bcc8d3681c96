// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the technical indicators served
// by the API. Every series function returns one entry per input bar so that
// results stay aligned with their dates; values that cannot be computed yet
// (warm-up) are `None`.

pub mod adx;
pub mod aroon;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod ichimoku;
pub mod macd;
pub mod obv;
pub mod supertrend;

pub use adx::{calculate_adx, AdxResult};
pub use aroon::{calculate_aroon, AroonResult};
pub use bollinger::{calculate_bollinger, BollingerResult};
pub use ichimoku::{calculate_ichimoku, IchimokuResult};
pub use macd::{calculate_macd, MacdResult};
pub use obv::{calculate_obv, ObvResult};
pub use supertrend::{calculate_super_trend, SuperTrendResult};

/// Deterministic, gently rising daily series with some noise, one bar per
/// calendar day from 2024-01-01.
#[cfg(test)]
pub(crate) fn test_bars(n: usize) -> Vec<crate::types::PriceBar> {
    use chrono::{Duration, NaiveDate};

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..n)
        .map(|i| {
            let x = i as f64;
            let close = 100.0 + x * 0.5 + (x * 0.7).sin() * 2.0;
            let open = close - (x * 0.3).cos();
            let high = close.max(open) + 1.0;
            let low = close.min(open) - 1.0;
            let volume = 1_000.0 + (i % 7) as f64 * 150.0;
            crate::types::PriceBar::new(start + Duration::days(i as i64), open, high, low, close, volume)
        })
        .collect()
}
