// =============================================================================
// Application state shared with every request handler
// =============================================================================
//
// Request data is never stored here. The only mutable piece is the rate
// limiter's per-client history; everything else is fixed at startup.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use crate::analysis::{IndicatorEngine, StandardIndicators};
use crate::api::rate_limit::RateLimiter;
use crate::service_config::ServiceConfig;
use crate::sources::{MoverSource, QuoteSource};

pub struct AppState {
    pub config: ServiceConfig,
    pub engine: IndicatorEngine,
    pub movers: Arc<dyn MoverSource>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        config: ServiceConfig,
        quotes: Arc<dyn QuoteSource>,
        movers: Arc<dyn MoverSource>,
    ) -> Self {
        let rate_limiter = RateLimiter::new(
            config.anonymous_requests_per_window,
            Duration::from_secs(config.rate_limit_window_secs),
        );
        Self {
            engine: IndicatorEngine::new(quotes, Arc::new(StandardIndicators)),
            movers,
            rate_limiter,
            config,
        }
    }
}
