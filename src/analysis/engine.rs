// =============================================================================
// Indicator engine: fetch, compute, normalise, wrap
// =============================================================================
//
// Every call follows the same single flow:
//   1. validate parameters (nothing is fetched for an invalid request)
//   2. fetch six months of daily bars
//   3. run the algorithm for the requested kind
//   4. normalise into a descending date map and wrap it in `Analysis`
//
// No caching, no retries: a failed fetch surfaces to the caller as-is.
// =============================================================================

use std::sync::Arc;

use tracing::{debug, instrument};

use super::algorithm::IndicatorAlgorithm;
use super::assembler::{assemble, Analysis};
use super::normalize::{normalize, RawResult};
use super::params::{
    AdxParams, AroonParams, BollingerParams, IchimokuParams, MacdParams, ObvParams,
    SuperTrendParams,
};
use crate::error::ServiceError;
use crate::sources::QuoteSource;
use crate::types::{Interval, PriceBar, TimePeriod};

/// History window used for every indicator.
pub const HISTORY_PERIOD: TimePeriod = TimePeriod::SixMonths;
/// Bar width used for every indicator.
pub const HISTORY_INTERVAL: Interval = Interval::Daily;

#[derive(Clone)]
pub struct IndicatorEngine {
    quotes: Arc<dyn QuoteSource>,
    algorithm: Arc<dyn IndicatorAlgorithm>,
}

impl IndicatorEngine {
    pub fn new(quotes: Arc<dyn QuoteSource>, algorithm: Arc<dyn IndicatorAlgorithm>) -> Self {
        Self { quotes, algorithm }
    }

    #[instrument(skip(self), name = "engine::macd")]
    pub async fn get_macd(&self, symbol: &str, params: MacdParams) -> Result<Analysis, ServiceError> {
        let settings = params.validate()?;
        let bars = self.history(symbol).await?;
        Ok(finish(symbol, "macd", &self.algorithm.macd(&bars, &settings)))
    }

    #[instrument(skip(self), name = "engine::adx")]
    pub async fn get_adx(&self, symbol: &str, params: AdxParams) -> Result<Analysis, ServiceError> {
        let period = params.validate()?;
        let bars = self.history(symbol).await?;
        Ok(finish(symbol, "adx", &self.algorithm.adx(&bars, period)))
    }

    #[instrument(skip(self), name = "engine::aroon")]
    pub async fn get_aroon(&self, symbol: &str, params: AroonParams) -> Result<Analysis, ServiceError> {
        let period = params.validate()?;
        let bars = self.history(symbol).await?;
        Ok(finish(symbol, "aroon", &self.algorithm.aroon(&bars, period)))
    }

    #[instrument(skip(self), name = "engine::bbands")]
    pub async fn get_bbands(&self, symbol: &str, params: BollingerParams) -> Result<Analysis, ServiceError> {
        let settings = params.validate()?;
        let bars = self.history(symbol).await?;
        Ok(finish(symbol, "bbands", &self.algorithm.bollinger(&bars, &settings)))
    }

    #[instrument(skip(self), name = "engine::obv")]
    pub async fn get_obv(&self, symbol: &str, params: ObvParams) -> Result<Analysis, ServiceError> {
        let sma_periods = params.validate()?;
        let bars = self.history(symbol).await?;
        Ok(finish(symbol, "obv", &self.algorithm.obv(&bars, sma_periods)))
    }

    #[instrument(skip(self), name = "engine::super_trend")]
    pub async fn get_super_trend(
        &self,
        symbol: &str,
        params: SuperTrendParams,
    ) -> Result<Analysis, ServiceError> {
        let settings = params.validate()?;
        let bars = self.history(symbol).await?;
        Ok(finish(symbol, "super_trend", &self.algorithm.super_trend(&bars, &settings)))
    }

    #[instrument(skip(self), name = "engine::ichimoku")]
    pub async fn get_ichimoku(&self, symbol: &str, params: IchimokuParams) -> Result<Analysis, ServiceError> {
        let settings = params.validate()?;
        let bars = self.history(symbol).await?;
        Ok(finish(symbol, "ichimoku", &self.algorithm.ichimoku(&bars, &settings)))
    }

    /// Fixed-window history for `symbol`; no bars at all is `DataUnavailable`.
    async fn history(&self, symbol: &str) -> Result<Vec<PriceBar>, ServiceError> {
        let symbol = validate_symbol(symbol)?;

        let bars = self.quotes.history(symbol, HISTORY_PERIOD, HISTORY_INTERVAL).await?;
        if bars.is_empty() {
            return Err(ServiceError::data_unavailable(symbol));
        }
        debug!(symbol, bars = bars.len(), "history fetched");
        Ok(bars)
    }
}

/// Ticker syntax: letters, digits and `. ^ = -` (e.g. `BRK-B`, `^GSPC`,
/// `EURUSD=X`), with at least one alphanumeric.
fn validate_symbol(symbol: &str) -> Result<&str, ServiceError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ServiceError::invalid("symbol must not be empty"));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-');
    if !symbol.chars().all(allowed) || !symbol.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(ServiceError::invalid(format!("symbol '{symbol}' contains unsupported characters")));
    }
    Ok(symbol)
}

fn finish<R: RawResult>(symbol: &str, kind: &str, raw: &[R]) -> Analysis {
    let indicators = normalize(raw);
    debug!(symbol, kind, raw = raw.len(), kept = indicators.len(), "indicator normalised");
    assemble(indicators)
}
