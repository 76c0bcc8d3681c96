// =============================================================================
// External data sources
// =============================================================================
//
// The service depends on two collaborators, both behind traits so the core can
// run against fakes:
//   - `QuoteSource` - ordered OHLCV history for a symbol.
//   - `MoverSource` - actives / gainers / losers rankings.
// The production implementation of both is `crate::yahoo::YahooClient`.
// =============================================================================

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::types::{Interval, MarketMover, PriceBar, TimePeriod};

/// Historical quote retrieval.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Bars for `symbol`, ascending by date. An empty vector means the source
    /// knows of no data; callers decide whether that is an error.
    async fn history(
        &self,
        symbol: &str,
        period: TimePeriod,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, ServiceError>;
}

/// Market mover rankings for the current session.
#[async_trait]
pub trait MoverSource: Send + Sync {
    async fn actives(&self) -> Result<Vec<MarketMover>, ServiceError>;
    async fn gainers(&self) -> Result<Vec<MarketMover>, ServiceError>;
    async fn losers(&self) -> Result<Vec<MarketMover>, ServiceError>;
}

// =============================================================================
// In-memory fakes
// =============================================================================
#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Serves the same bars for every symbol and counts calls.
    #[derive(Default)]
    pub struct StaticQuotes {
        pub bars: Vec<PriceBar>,
        pub calls: AtomicUsize,
    }

    impl StaticQuotes {
        pub fn new(bars: Vec<PriceBar>) -> Self {
            Self {
                bars,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteSource for StaticQuotes {
        async fn history(
            &self,
            _symbol: &str,
            _period: TimePeriod,
            _interval: Interval,
        ) -> Result<Vec<PriceBar>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.bars.clone())
        }
    }

    /// Always fails the fetch.
    pub struct FailingQuotes;

    #[async_trait]
    impl QuoteSource for FailingQuotes {
        async fn history(
            &self,
            _symbol: &str,
            _period: TimePeriod,
            _interval: Interval,
        ) -> Result<Vec<PriceBar>, ServiceError> {
            Err(ServiceError::QuoteFetchFailure("connection reset".into()))
        }
    }

    #[derive(Default)]
    pub struct StaticMovers {
        pub actives: Vec<MarketMover>,
        pub gainers: Vec<MarketMover>,
        pub losers: Vec<MarketMover>,
        pub fail: bool,
    }

    impl StaticMovers {
        fn list(&self, movers: &[MarketMover]) -> Result<Vec<MarketMover>, ServiceError> {
            if self.fail {
                return Err(ServiceError::UpstreamScrapeFailure("upstream returned 503".into()));
            }
            Ok(movers.to_vec())
        }
    }

    #[async_trait]
    impl MoverSource for StaticMovers {
        async fn actives(&self) -> Result<Vec<MarketMover>, ServiceError> {
            self.list(&self.actives)
        }
        async fn gainers(&self) -> Result<Vec<MarketMover>, ServiceError> {
            self.list(&self.gainers)
        }
        async fn losers(&self) -> Result<Vec<MarketMover>, ServiceError> {
            self.list(&self.losers)
        }
    }

    pub fn mover(symbol: &str, price: f64) -> MarketMover {
        MarketMover {
            symbol: symbol.to_string(),
            name: format!("{symbol} Holdings"),
            price,
            change: 1.25,
            percent_change: 3.5,
        }
    }
}
