// =============================================================================
// Response envelope shared by every indicator endpoint
// =============================================================================

use serde::Serialize;

use super::normalize::IndicatorMap;

/// `{ "indicators": { "<date>": <record>, ... } }`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analysis {
    pub indicators: IndicatorMap,
}

/// Wrap a normalised mapping. No further processing happens here.
pub fn assemble(indicators: IndicatorMap) -> Analysis {
    Analysis { indicators }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_envelope_shape() {
        let json = serde_json::to_value(assemble(IndicatorMap::default())).unwrap();
        assert_eq!(json, serde_json::json!({ "indicators": {} }));
    }
}
