// =============================================================================
// Indicator algorithm capability
// =============================================================================
//
// The engine only orchestrates; the numbers come from an `IndicatorAlgorithm`.
// `StandardIndicators` delegates to `crate::indicators`. Tests plug in fakes
// to drive the normaliser with hand-made output.
// =============================================================================

use super::params::{BollingerSettings, IchimokuSettings, MacdSettings, SuperTrendSettings};
use crate::indicators::{
    self, AdxResult, AroonResult, BollingerResult, IchimokuResult, MacdResult, ObvResult,
    SuperTrendResult,
};
use crate::types::PriceBar;

/// One method per indicator kind. Every method returns one result per input
/// bar, oldest first.
pub trait IndicatorAlgorithm: Send + Sync {
    fn macd(&self, bars: &[PriceBar], settings: &MacdSettings) -> Vec<MacdResult>;
    fn adx(&self, bars: &[PriceBar], period: usize) -> Vec<AdxResult>;
    fn aroon(&self, bars: &[PriceBar], period: usize) -> Vec<AroonResult>;
    fn bollinger(&self, bars: &[PriceBar], settings: &BollingerSettings) -> Vec<BollingerResult>;
    fn obv(&self, bars: &[PriceBar], sma_periods: Option<usize>) -> Vec<ObvResult>;
    fn super_trend(&self, bars: &[PriceBar], settings: &SuperTrendSettings) -> Vec<SuperTrendResult>;
    fn ichimoku(&self, bars: &[PriceBar], settings: &IchimokuSettings) -> Vec<IchimokuResult>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardIndicators;

impl IndicatorAlgorithm for StandardIndicators {
    fn macd(&self, bars: &[PriceBar], s: &MacdSettings) -> Vec<MacdResult> {
        indicators::calculate_macd(bars, s.fast, s.slow, s.signal)
    }

    fn adx(&self, bars: &[PriceBar], period: usize) -> Vec<AdxResult> {
        indicators::calculate_adx(bars, period)
    }

    fn aroon(&self, bars: &[PriceBar], period: usize) -> Vec<AroonResult> {
        indicators::calculate_aroon(bars, period)
    }

    fn bollinger(&self, bars: &[PriceBar], s: &BollingerSettings) -> Vec<BollingerResult> {
        indicators::calculate_bollinger(bars, s.period, s.std_dev)
    }

    fn obv(&self, bars: &[PriceBar], sma_periods: Option<usize>) -> Vec<ObvResult> {
        indicators::calculate_obv(bars, sma_periods)
    }

    fn super_trend(&self, bars: &[PriceBar], s: &SuperTrendSettings) -> Vec<SuperTrendResult> {
        indicators::calculate_super_trend(bars, s.period, s.multiplier)
    }

    fn ichimoku(&self, bars: &[PriceBar], s: &IchimokuSettings) -> Vec<IchimokuResult> {
        indicators::calculate_ichimoku(
            bars,
            s.tenkan,
            s.kijun,
            s.senkou,
            s.senkou_offset,
            s.chikou_offset,
        )
    }
}
