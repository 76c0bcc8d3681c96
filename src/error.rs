// =============================================================================
// Service error taxonomy
// =============================================================================
//
// Nothing in the core recovers from these locally. They travel unchanged to
// the API boundary, which maps each variant to an HTTP status.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The historical source has no quotes for the symbol / period.
    #[error("no historical data available for '{symbol}'")]
    DataUnavailable { symbol: String },

    /// A caller-supplied parameter is outside the algorithm's valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The mover source could not retrieve its ranking.
    #[error("failed to retrieve market movers: {0}")]
    UpstreamScrapeFailure(String),

    /// Transport or decode failure while fetching historical quotes.
    #[error("failed to fetch historical quotes: {0}")]
    QuoteFetchFailure(String),
}

impl ServiceError {
    pub fn data_unavailable(symbol: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbol: symbol.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_cause() {
        let e = ServiceError::data_unavailable("ZZZZ");
        assert_eq!(e.to_string(), "no historical data available for 'ZZZZ'");

        let e = ServiceError::invalid("period must be >= 1, got -3");
        assert_eq!(e.to_string(), "invalid parameter: period must be >= 1, got -3");
    }
}
