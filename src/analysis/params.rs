// =============================================================================
// Indicator parameters — defaults and validation
// =============================================================================
//
// Each `*Params` struct is what callers send (query string or direct call);
// every field defaults to the conventional setting. Periods are signed so a
// negative value reaches `validate()` and comes back as `InvalidParameter`
// instead of a decode failure. `validate()` yields the `*Settings` struct the
// algorithms consume, so nothing is computed with an out-of-domain value.
// =============================================================================

use serde::Deserialize;

use crate::error::ServiceError;

fn period(name: &str, value: i64) -> Result<usize, ServiceError> {
    at_least(name, value, 1)
}

fn at_least(name: &str, value: i64, min: i64) -> Result<usize, ServiceError> {
    if value < min {
        return Err(ServiceError::invalid(format!("{name} must be >= {min}, got {value}")));
    }
    usize::try_from(value).map_err(|_| ServiceError::invalid(format!("{name} is out of range: {value}")))
}

fn positive(name: &str, value: f64) -> Result<f64, ServiceError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ServiceError::invalid(format!("{name} must be > 0, got {value}")))
    }
}

// ── MACD ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast_period: i64,
    pub slow_period: i64,
    pub signal_period: i64,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdSettings {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl MacdParams {
    pub fn validate(&self) -> Result<MacdSettings, ServiceError> {
        let fast = period("fast_period", self.fast_period)?;
        let slow = period("slow_period", self.slow_period)?;
        let signal = period("signal_period", self.signal_period)?;
        if fast >= slow {
            return Err(ServiceError::invalid(format!(
                "fast_period ({fast}) must be less than slow_period ({slow})"
            )));
        }
        Ok(MacdSettings { fast, slow, signal })
    }
}

// ── ADX ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdxParams {
    pub period: i64,
}

impl Default for AdxParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl AdxParams {
    pub fn validate(&self) -> Result<usize, ServiceError> {
        period("period", self.period)
    }
}

// ── AROON ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AroonParams {
    pub period: i64,
}

impl Default for AroonParams {
    fn default() -> Self {
        Self { period: 25 }
    }
}

impl AroonParams {
    pub fn validate(&self) -> Result<usize, ServiceError> {
        period("period", self.period)
    }
}

// ── Bollinger Bands ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BollingerParams {
    pub period: i64,
    pub std_dev: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 14,
            std_dev: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerSettings {
    pub period: usize,
    pub std_dev: f64,
}

impl BollingerParams {
    pub fn validate(&self) -> Result<BollingerSettings, ServiceError> {
        Ok(BollingerSettings {
            // A one-bar window has no deviation to band around.
            period: at_least("period", self.period, 2)?,
            std_dev: positive("std_dev", self.std_dev)?,
        })
    }
}

// ── OBV ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ObvParams {
    pub sma_periods: Option<i64>,
}

impl ObvParams {
    pub fn validate(&self) -> Result<Option<usize>, ServiceError> {
        self.sma_periods.map(|p| period("sma_periods", p)).transpose()
    }
}

// ── SuperTrend ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SuperTrendParams {
    pub period: i64,
    pub multiplier: f64,
}

impl Default for SuperTrendParams {
    fn default() -> Self {
        Self {
            period: 14,
            multiplier: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuperTrendSettings {
    pub period: usize,
    pub multiplier: f64,
}

impl SuperTrendParams {
    pub fn validate(&self) -> Result<SuperTrendSettings, ServiceError> {
        Ok(SuperTrendSettings {
            period: period("period", self.period)?,
            multiplier: positive("multiplier", self.multiplier)?,
        })
    }
}

// ── Ichimoku ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct IchimokuParams {
    pub tenkan_period: i64,
    pub kijun_period: i64,
    pub senkou_period: i64,
    pub senkou_offset: i64,
    pub chikou_offset: i64,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            tenkan_period: 9,
            kijun_period: 26,
            senkou_period: 52,
            senkou_offset: 26,
            chikou_offset: 26,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IchimokuSettings {
    pub tenkan: usize,
    pub kijun: usize,
    pub senkou: usize,
    pub senkou_offset: usize,
    pub chikou_offset: usize,
}

impl IchimokuParams {
    pub fn validate(&self) -> Result<IchimokuSettings, ServiceError> {
        let settings = IchimokuSettings {
            tenkan: period("tenkan_period", self.tenkan_period)?,
            kijun: period("kijun_period", self.kijun_period)?,
            senkou: period("senkou_period", self.senkou_period)?,
            senkou_offset: at_least("senkou_offset", self.senkou_offset, 0)?,
            chikou_offset: at_least("chikou_offset", self.chikou_offset, 0)?,
        };
        if settings.senkou <= settings.kijun {
            return Err(ServiceError::invalid(format!(
                "senkou_period ({}) must be greater than kijun_period ({})",
                settings.senkou, settings.kijun
            )));
        }
        Ok(settings)
    }
}
