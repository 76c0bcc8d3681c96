// =============================================================================
// Yahoo Finance REST client
// =============================================================================
//
// Backs both data sources:
//   - chart endpoint     -> `QuoteSource::history`
//   - screener endpoint  -> `MoverSource::{actives, gainers, losers}`
//
// Each call is a single GET with no retry. Failures are classified into the
// service taxonomy here so callers never see reqwest errors.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::{debug, instrument, warn};

use super::response::{ChartResponse, ScreenerResponse};
use crate::error::ServiceError;
use crate::service_config::ServiceConfig;
use crate::sources::{MoverSource, QuoteSource};
use crate::types::{Interval, MarketMover, PriceBar, TimePeriod};

/// Browser-like agent; Yahoo rejects the default reqwest agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Predefined screener ids for the three mover rankings.
const SCREENER_ACTIVES: &str = "most_actives";
const SCREENER_GAINERS: &str = "day_gainers";
const SCREENER_LOSERS: &str = "day_losers";

#[derive(Clone)]
pub struct YahooClient {
    chart_url: String,
    screener_url: String,
    mover_count: u32,
    client: reqwest::Client,
}

impl YahooClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        debug!(chart_url = %config.chart_url, screener_url = %config.screener_url, "YahooClient initialised");

        Ok(Self {
            chart_url: config.chart_url.trim_end_matches('/').to_string(),
            screener_url: config.screener_url.clone(),
            mover_count: config.mover_count,
            client,
        })
    }

    // -------------------------------------------------------------------------
    // Historical quotes
    // -------------------------------------------------------------------------

    /// GET {chart_url}/{symbol}?range=..&interval=..
    #[instrument(skip(self), name = "yahoo::chart")]
    pub async fn fetch_chart(
        &self,
        symbol: &str,
        period: TimePeriod,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, ServiceError> {
        let url = self.chart_endpoint(symbol)?;

        let resp = self
            .client
            .get(url.clone())
            .query(&[
                ("range", period.as_str()),
                ("interval", interval.as_str()),
                ("includePrePost", "false"),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::QuoteFetchFailure(format!("GET {url} failed: {e}")))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::data_unavailable(symbol));
        }
        if !status.is_success() {
            return Err(ServiceError::QuoteFetchFailure(format!("chart endpoint returned {status}")));
        }

        let body: ChartResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::QuoteFetchFailure(format!("failed to parse chart response: {e}")))?;

        if let Some(err) = body.chart.error {
            if err.is_not_found() {
                return Err(ServiceError::data_unavailable(symbol));
            }
            return Err(ServiceError::QuoteFetchFailure(format!("{}: {}", err.code, err.description)));
        }

        let Some(data) = body.chart.result.and_then(|r| r.into_iter().next()) else {
            return Err(ServiceError::data_unavailable(symbol));
        };
        let timezone = data.meta.exchange_timezone_name.clone().unwrap_or_default();
        let bars = data.into_bars();

        debug!(symbol, %period, %interval, timezone = %timezone, count = bars.len(), "chart fetched");
        Ok(bars)
    }

    /// `{chart_url}/{symbol}` with the symbol appended as one encoded path
    /// segment, so it can never add query parameters or walk the path.
    fn chart_endpoint(&self, symbol: &str) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&self.chart_url)
            .map_err(|e| ServiceError::QuoteFetchFailure(format!("invalid chart url {}: {e}", self.chart_url)))?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::QuoteFetchFailure(format!("chart url {} cannot take a path", self.chart_url)))?
            .pop_if_empty()
            .push(symbol);
        Ok(url)
    }

    // -------------------------------------------------------------------------
    // Movers
    // -------------------------------------------------------------------------

    /// GET {screener_url}?scrIds=..&count=..
    #[instrument(skip(self), name = "yahoo::screener")]
    pub async fn fetch_screener(&self, screener_id: &str) -> Result<Vec<MarketMover>, ServiceError> {
        let count = self.mover_count.to_string();
        let resp = self
            .client
            .get(&self.screener_url)
            .query(&[
                ("scrIds", screener_id),
                ("count", count.as_str()),
                ("formatted", "false"),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::UpstreamScrapeFailure(format!("{screener_id} request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(screener_id, %status, "screener returned non-success status");
            return Err(ServiceError::UpstreamScrapeFailure(format!(
                "{screener_id} returned {status}"
            )));
        }

        let body: ScreenerResponse = resp.json().await.map_err(|e| {
            ServiceError::UpstreamScrapeFailure(format!("failed to parse {screener_id} response: {e}"))
        })?;

        if let Some(err) = body.finance.error {
            return Err(ServiceError::UpstreamScrapeFailure(format!(
                "{screener_id}: {} {}",
                err.code, err.description
            )));
        }

        let movers: Vec<MarketMover> = body
            .finance
            .result
            .and_then(|r| r.into_iter().next())
            .map(|r| r.quotes.into_iter().map(MarketMover::from).collect())
            .ok_or_else(|| ServiceError::UpstreamScrapeFailure(format!("{screener_id} returned no result")))?;

        debug!(screener_id, count = movers.len(), "movers fetched");
        Ok(movers)
    }
}

#[async_trait]
impl QuoteSource for YahooClient {
    async fn history(
        &self,
        symbol: &str,
        period: TimePeriod,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, ServiceError> {
        self.fetch_chart(symbol, period, interval).await
    }
}

#[async_trait]
impl MoverSource for YahooClient {
    async fn actives(&self) -> Result<Vec<MarketMover>, ServiceError> {
        self.fetch_screener(SCREENER_ACTIVES).await
    }

    async fn gainers(&self) -> Result<Vec<MarketMover>, ServiceError> {
        self.fetch_screener(SCREENER_GAINERS).await
    }

    async fn losers(&self) -> Result<Vec<MarketMover>, ServiceError> {
        self.fetch_screener(SCREENER_LOSERS).await
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("chart_url", &self.chart_url)
            .field("screener_url", &self.screener_url)
            .field("mover_count", &self.mover_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> YahooClient {
        YahooClient::new(&ServiceConfig::default()).unwrap()
    }

    #[test]
    fn plain_symbol_is_appended_to_chart_path() {
        let url = client().chart_endpoint("AAPL").unwrap();
        assert_eq!(url.as_str(), "https://query1.finance.yahoo.com/v8/finance/chart/AAPL");
    }

    #[test]
    fn symbol_cannot_inject_query_or_fragment() {
        let url = client().chart_endpoint("AAPL?range=max&interval=1wk#").unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert_eq!(
            url.path(),
            "/v8/finance/chart/AAPL%3Frange=max&interval=1wk%23"
        );
    }

    #[test]
    fn symbol_cannot_add_path_segments() {
        let url = client().chart_endpoint("x/../../v1/other").unwrap();
        assert_eq!(url.path_segments().map(|s| s.count()), Some(4));
        assert!(url.path().starts_with("/v8/finance/chart/"));
    }
}
