// =============================================================================
// Yahoo Finance wire formats
// =============================================================================
//
// Only the fields the service reads are modelled. Yahoo pads missing rows
// with `null`, so every per-bar array element is optional.
// =============================================================================

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::warn;

use crate::types::{MarketMover, PriceBar};

// ── /v8/finance/chart ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartData>>,
    #[serde(default)]
    pub error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
pub struct YahooError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

impl YahooError {
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("not found")
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    pub gmtoffset: i64,
    #[serde(default)]
    pub exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteColumns {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl ChartData {
    /// Convert the columnar payload into bars, oldest first.
    ///
    /// Timestamps are shifted into the exchange's local day before taking the
    /// calendar date. Rows missing any of open/high/low/close are skipped.
    pub fn into_bars(self) -> Vec<PriceBar> {
        let Some(columns) = self.indicators.quote.into_iter().next() else {
            return Vec::new();
        };
        let offset = self.meta.gmtoffset;

        let mut bars: Vec<PriceBar> = Vec::with_capacity(self.timestamp.len());
        for (i, &ts) in self.timestamp.iter().enumerate() {
            let cell = |col: &Vec<Option<f64>>| col.get(i).copied().flatten();
            let (Some(open), Some(high), Some(low), Some(close)) = (
                cell(&columns.open),
                cell(&columns.high),
                cell(&columns.low),
                cell(&columns.close),
            ) else {
                continue;
            };
            let Some(date) = local_date(ts, offset) else {
                warn!(timestamp = ts, "skipping bar with out-of-range timestamp");
                continue;
            };
            let volume = cell(&columns.volume).unwrap_or(0.0);
            bars.push(PriceBar::new(date, open, high, low, close, volume));
        }

        bars.sort_by_key(|b| b.date);
        bars
    }
}

fn local_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp.checked_add(gmtoffset)?, 0).map(|dt| dt.date_naive())
}

// ── /v1/finance/screener/predefined/saved ───────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScreenerResponse {
    pub finance: ScreenerBody,
}

#[derive(Debug, Deserialize)]
pub struct ScreenerBody {
    #[serde(default)]
    pub result: Option<Vec<ScreenerResult>>,
    #[serde(default)]
    pub error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
pub struct ScreenerResult {
    #[serde(default)]
    pub quotes: Vec<ScreenerQuote>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenerQuote {
    pub symbol: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub regular_market_change: Option<f64>,
    #[serde(default)]
    pub regular_market_change_percent: Option<f64>,
}

impl From<ScreenerQuote> for MarketMover {
    fn from(q: ScreenerQuote) -> Self {
        let name = q
            .long_name
            .or(q.short_name)
            .unwrap_or_else(|| q.symbol.clone());
        MarketMover {
            symbol: q.symbol,
            name,
            price: q.regular_market_price.unwrap_or_default(),
            change: q.regular_market_change.unwrap_or_default(),
            percent_change: q.regular_market_change_percent.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "gmtoffset": -14400, "exchangeTimezoneName": "America/New_York" },
                "timestamp": [1714570200, 1714656600, 1714743000],
                "indicators": { "quote": [{
                    "open":   [169.58, null, 173.0],
                    "high":   [172.71, 173.4, 187.0],
                    "low":    [169.11, 170.9, 182.66],
                    "close":  [169.3, 173.03, 183.38],
                    "volume": [50383100, 94214900, null]
                }] }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn chart_rows_become_local_dated_bars() {
        let resp: ChartResponse = serde_json::from_str(CHART).unwrap();
        let data = resp.chart.result.unwrap().into_iter().next().unwrap();
        let bars = data.into_bars();

        // Middle row has a null open and is skipped.
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
        assert_eq!(bars[0].volume, 50_383_100.0);
        assert_eq!(bars[1].volume, 0.0);
    }

    #[test]
    fn chart_error_payload() {
        let json = r#"{ "chart": { "result": null,
            "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } } }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(resp.chart.result.is_none());
        assert!(resp.chart.error.unwrap().is_not_found());
    }

    #[test]
    fn screener_quote_prefers_long_name() {
        let json = r#"{ "finance": { "result": [{ "quotes": [
            { "symbol": "NVDA", "shortName": "NVIDIA", "longName": "NVIDIA Corporation",
              "regularMarketPrice": 120.5, "regularMarketChange": 4.1, "regularMarketChangePercent": 3.52 },
            { "symbol": "XYZ" }
        ] }], "error": null } }"#;
        let resp: ScreenerResponse = serde_json::from_str(json).unwrap();
        let movers: Vec<MarketMover> = resp.finance.result.unwrap().remove(0).quotes.into_iter().map(Into::into).collect();
        assert_eq!(movers[0].name, "NVIDIA Corporation");
        assert_eq!(movers[0].percent_change, 3.52);
        assert_eq!(movers[1].name, "XYZ");
        assert_eq!(movers[1].price, 0.0);
    }
}
