// =============================================================================
// Result normaliser
// =============================================================================
//
// Turns raw per-bar algorithm output into a date -> record mapping:
//   1. Per-kind predicate: keep the date only when every required field is
//      present (Ichimoku keeps every date and nulls individual lines).
//   2. Round every numeric field to 2 decimal places (ties to even).
//   3. Build an ordered map, then lay it out most-recent-first.
// =============================================================================

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::records::{
    AdxData, AroonData, BollingerData, IchimokuData, IndicatorRecord, MacdData, ObvData,
    SuperTrendData, Trend,
};
use crate::indicators::{
    AdxResult, AroonResult, BollingerResult, IchimokuResult, MacdResult, ObvResult,
    SuperTrendResult,
};

/// Round to 2 decimal places, resolving exact ties to the even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// A field counts as present only if it exists and stays finite once rounded.
fn present(value: Option<f64>) -> Option<f64> {
    value.map(round2).filter(|v| v.is_finite())
}

// =============================================================================
// IndicatorMap
// =============================================================================

/// Date-keyed indicator records, unique keys, strictly descending by date.
///
/// Serialises as a JSON object whose keys are ISO calendar dates, in the same
/// most-recent-first order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorMap {
    entries: Vec<(NaiveDate, IndicatorRecord)>,
}

impl IndicatorMap {
    /// Build from entries in any order. A repeated date keeps its last record.
    pub fn from_entries(entries: impl IntoIterator<Item = (NaiveDate, IndicatorRecord)>) -> Self {
        let ordered: BTreeMap<NaiveDate, IndicatorRecord> = entries.into_iter().collect();
        Self {
            entries: ordered.into_iter().rev().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(NaiveDate, IndicatorRecord)> {
        self.entries.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.iter().map(|(d, _)| *d)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&IndicatorRecord> {
        self.entries
            .binary_search_by(|(d, _)| date.cmp(d))
            .ok()
            .map(|idx| &self.entries[idx].1)
    }
}

impl Serialize for IndicatorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (date, record) in &self.entries {
            map.serialize_entry(&date.format("%Y-%m-%d").to_string(), record)?;
        }
        map.end()
    }
}

// =============================================================================
// Per-kind record predicates
// =============================================================================

pub fn macd_record(r: &MacdResult) -> Option<IndicatorRecord> {
    Some(IndicatorRecord::Macd(MacdData {
        value: present(r.macd)?,
        signal: present(r.signal)?,
    }))
}

pub fn adx_record(r: &AdxResult) -> Option<IndicatorRecord> {
    Some(IndicatorRecord::Adx(AdxData {
        value: present(r.adx)?,
    }))
}

pub fn aroon_record(r: &AroonResult) -> Option<IndicatorRecord> {
    Some(IndicatorRecord::Aroon(AroonData {
        aroon_up: present(r.aroon_up)?,
        aroon_down: present(r.aroon_down)?,
    }))
}

pub fn bollinger_record(r: &BollingerResult) -> Option<IndicatorRecord> {
    Some(IndicatorRecord::Bollinger(BollingerData {
        upper_band: present(r.upper_band)?,
        lower_band: present(r.lower_band)?,
    }))
}

pub fn obv_record(r: &ObvResult) -> Option<IndicatorRecord> {
    Some(IndicatorRecord::Obv(ObvData {
        value: present(r.obv)?,
    }))
}

/// Trend is `DOWN` exactly when the algorithm emitted an upper band for the
/// date, regardless of where the close sits relative to the line.
pub fn super_trend_record(r: &SuperTrendResult) -> Option<IndicatorRecord> {
    let trend = if r.upper_band.is_some() { Trend::Down } else { Trend::Up };
    Some(IndicatorRecord::SuperTrend(SuperTrendData {
        value: present(r.super_trend)?,
        trend,
    }))
}

pub fn ichimoku_record(r: &IchimokuResult) -> Option<IndicatorRecord> {
    Some(IndicatorRecord::Ichimoku(IchimokuData {
        tenkan_sen: present(r.tenkan_sen),
        kijun_sen: present(r.kijun_sen),
        senkou_span_a: present(r.senkou_span_a),
        senkou_span_b: present(r.senkou_span_b),
        chikou_span: present(r.chikou_span),
    }))
}

// =============================================================================
// Normaliser entry point
// =============================================================================

/// Raw algorithm output that knows its own date and record predicate.
pub trait RawResult {
    fn date(&self) -> NaiveDate;
    fn to_record(&self) -> Option<IndicatorRecord>;
}

macro_rules! raw_result {
    ($ty:ty, $record:path) => {
        impl RawResult for $ty {
            fn date(&self) -> NaiveDate {
                self.date
            }
            fn to_record(&self) -> Option<IndicatorRecord> {
                $record(self)
            }
        }
    };
}

raw_result!(MacdResult, macd_record);
raw_result!(AdxResult, adx_record);
raw_result!(AroonResult, aroon_record);
raw_result!(BollingerResult, bollinger_record);
raw_result!(ObvResult, obv_record);
raw_result!(SuperTrendResult, super_trend_record);
raw_result!(IchimokuResult, ichimoku_record);

/// Filter, round and order raw results. Dropping every date is not an error.
pub fn normalize<R: RawResult>(results: &[R]) -> IndicatorMap {
    IndicatorMap::from_entries(
        results
            .iter()
            .filter_map(|r| r.to_record().map(|record| (r.date(), record))),
    )
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn has_two_decimals(v: f64) -> bool {
        let scaled = v * 100.0;
        (scaled - scaled.round()).abs() < 1e-6
    }

    #[test]
    fn round2_basics() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(-7.899), -7.9);
        assert_eq!(round2(42.0), 42.0);
        // Exact binary tie (0.125 * 100 = 12.5) goes to the even neighbour.
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn map_is_strictly_descending_and_unique() {
        let rec = |v| IndicatorRecord::Adx(AdxData { value: v });
        let map = IndicatorMap::from_entries(vec![
            (day(2), rec(2.0)),
            (day(9), rec(9.0)),
            (day(5), rec(5.0)),
            (day(2), rec(2.5)),
        ]);
        let dates: Vec<NaiveDate> = map.dates().collect();
        assert_eq!(dates, vec![day(9), day(5), day(2)]);
        assert_eq!(map.get(day(2)), Some(&rec(2.5)));
        assert_eq!(map.get(day(3)), None);
    }

    #[test]
    fn serialised_keys_keep_descending_order() {
        let rec = |v| IndicatorRecord::Obv(ObvData { value: v });
        let map = IndicatorMap::from_entries(vec![(day(1), rec(1.0)), (day(3), rec(3.0))]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"2024-05-03":{"value":3.0},"2024-05-01":{"value":1.0}}"#);
    }

    #[test]
    fn macd_drops_incomplete_dates() {
        let raw = vec![
            MacdResult {
                date: day(1),
                macd: Some(1.0),
                signal: None,
                histogram: None,
                fast_ema: None,
                slow_ema: None,
            },
            MacdResult {
                date: day(2),
                macd: Some(1.23456),
                signal: Some(0.98765),
                histogram: Some(0.2469),
                fast_ema: None,
                slow_ema: None,
            },
        ];
        let map = normalize(&raw);
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(day(2)),
            Some(&IndicatorRecord::Macd(MacdData { value: 1.23, signal: 0.99 }))
        );
    }

    #[test]
    fn super_trend_direction_follows_upper_band() {
        let raw = vec![
            SuperTrendResult {
                date: day(1),
                super_trend: Some(110.456),
                upper_band: Some(110.456),
                lower_band: None,
            },
            SuperTrendResult {
                date: day(2),
                super_trend: Some(95.0),
                upper_band: None,
                lower_band: Some(95.0),
            },
            SuperTrendResult {
                date: day(3),
                super_trend: None,
                upper_band: None,
                lower_band: None,
            },
        ];
        let map = normalize(&raw);
        assert_eq!(map.len(), 2);
        match map.get(day(1)) {
            Some(IndicatorRecord::SuperTrend(d)) => {
                assert_eq!(d.trend, Trend::Down);
                assert_eq!(d.value, 110.46);
            }
            other => panic!("unexpected record {other:?}"),
        }
        match map.get(day(2)) {
            Some(IndicatorRecord::SuperTrend(d)) => assert_eq!(d.trend, Trend::Up),
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn ichimoku_keeps_every_date() {
        let raw = vec![
            IchimokuResult {
                date: day(1),
                tenkan_sen: None,
                kijun_sen: None,
                senkou_span_a: None,
                senkou_span_b: None,
                chikou_span: Some(10.005),
            },
            IchimokuResult {
                date: day(2),
                tenkan_sen: None,
                kijun_sen: None,
                senkou_span_a: None,
                senkou_span_b: None,
                chikou_span: None,
            },
        ];
        let map = normalize(&raw);
        assert_eq!(map.len(), 2);
        for (_, record) in map.iter() {
            assert!(record.numeric_fields().into_iter().all(has_two_decimals));
        }
    }

    #[test]
    fn non_finite_fields_count_as_absent() {
        let bands = |date, upper: f64, lower: f64| BollingerResult {
            date,
            upper_band: Some(upper),
            middle_band: Some(100.0),
            lower_band: Some(lower),
            percent_b: None,
            width: None,
        };
        let raw = vec![
            bands(day(1), f64::INFINITY, f64::NEG_INFINITY),
            bands(day(2), f64::NAN, 90.0),
            // Finite, but overflows once scaled for rounding.
            bands(day(3), f64::MAX, 90.0),
            bands(day(4), 110.0, 90.0),
        ];
        let map = normalize(&raw);
        assert_eq!(map.dates().collect::<Vec<_>>(), vec![day(4)]);

        let line = IchimokuResult {
            date: day(5),
            tenkan_sen: Some(f64::INFINITY),
            kijun_sen: Some(12.0),
            senkou_span_a: None,
            senkou_span_b: None,
            chikou_span: None,
        };
        match normalize(&[line]).get(day(5)) {
            Some(IndicatorRecord::Ichimoku(d)) => {
                assert_eq!(d.tenkan_sen, None);
                assert_eq!(d.kijun_sen, Some(12.0));
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn everything_dropped_is_an_empty_map() {
        let raw = vec![AdxResult {
            date: day(1),
            pdi: Some(20.0),
            mdi: Some(10.0),
            adx: None,
        }];
        let map = normalize(&raw);
        assert!(map.is_empty());
        assert_eq!(serde_json::to_string(&map).unwrap(), "{}");
    }
}
