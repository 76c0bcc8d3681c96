// =============================================================================
// Indicator analysis pipeline
// =============================================================================
//
//   params     - caller parameters, defaults, validation
//   algorithm  - `IndicatorAlgorithm` capability (math lives in `indicators`)
//   records    - per-kind record variants
//   normalize  - drop / round / sort into a descending date map
//   assembler  - `{ indicators: ... }` envelope
//   engine     - orchestrates one request end to end

pub mod algorithm;
pub mod assembler;
pub mod engine;
pub mod normalize;
pub mod params;
pub mod records;

pub use algorithm::{IndicatorAlgorithm, StandardIndicators};
pub use assembler::Analysis;
pub use engine::IndicatorEngine;
pub use params::{
    AdxParams, AroonParams, BollingerParams, IchimokuParams, MacdParams, ObvParams,
    SuperTrendParams,
};
