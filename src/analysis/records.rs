// =============================================================================
// Indicator records: one normalised value set per date
// =============================================================================
//
// `IndicatorRecord` is a closed set of variants, one per indicator kind. It
// serialises untagged, so a MACD entry on the wire is just
// `{"value": .., "signal": ..}`.
// =============================================================================

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdData {
    pub value: f64,
    pub signal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdxData {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AroonData {
    pub aroon_up: f64,
    pub aroon_down: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerData {
    pub upper_band: f64,
    pub lower_band: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObvData {
    pub value: f64,
}

/// Direction reported alongside a SuperTrend value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Up,
    Down,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "UP"),
            Self::Down => write!(f, "DOWN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperTrendData {
    pub value: f64,
    pub trend: Trend,
}

/// Every line is independently optional; absent lines serialise as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IchimokuData {
    pub tenkan_sen: Option<f64>,
    pub kijun_sen: Option<f64>,
    pub senkou_span_a: Option<f64>,
    pub senkou_span_b: Option<f64>,
    pub chikou_span: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorRecord {
    Macd(MacdData),
    Adx(AdxData),
    Aroon(AroonData),
    Bollinger(BollingerData),
    Obv(ObvData),
    SuperTrend(SuperTrendData),
    Ichimoku(IchimokuData),
}

impl IndicatorRecord {
    /// All numeric fields that are present, in declaration order.
    pub fn numeric_fields(&self) -> Vec<f64> {
        match self {
            Self::Macd(d) => vec![d.value, d.signal],
            Self::Adx(d) => vec![d.value],
            Self::Aroon(d) => vec![d.aroon_up, d.aroon_down],
            Self::Bollinger(d) => vec![d.upper_band, d.lower_band],
            Self::Obv(d) => vec![d.value],
            Self::SuperTrend(d) => vec![d.value],
            Self::Ichimoku(d) => [
                d.tenkan_sen,
                d.kijun_sen,
                d.senkou_span_a,
                d.senkou_span_b,
                d.chikou_span,
            ]
            .into_iter()
            .flatten()
            .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_wire_shape() {
        let record = IndicatorRecord::SuperTrend(SuperTrendData {
            value: 101.5,
            trend: Trend::Down,
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "value": 101.5, "trend": "DOWN" }));
    }

    #[test]
    fn ichimoku_keeps_nulls() {
        let record = IndicatorRecord::Ichimoku(IchimokuData {
            tenkan_sen: Some(1.5),
            kijun_sen: None,
            senkou_span_a: None,
            senkou_span_b: None,
            chikou_span: Some(2.0),
        });
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["kijun_sen"].is_null());
        assert_eq!(json.as_object().unwrap().len(), 5);
        assert_eq!(record.numeric_fields(), vec![1.5, 2.0]);
    }
}
