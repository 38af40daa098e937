//! Daily, subdaily and scenario record types.

use crate::error::{Result, ScenarioError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single day of observed precipitation and temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub precipitation: f64,
    pub temperature: f64,
}

/// An ordered-by-date daily series with exactly one record per date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries(pub Vec<DailyRecord>);

impl DailySeries {
    /// Sort records by date and validate the series invariants:
    /// one record per date, precipitation never negative.
    pub fn new(mut records: Vec<DailyRecord>) -> Result<Self> {
        records.sort_by_key(|record| record.date);
        for window in records.windows(2) {
            if window[0].date == window[1].date {
                return Err(ScenarioError::DuplicateDate(window[0].date));
            }
        }
        for record in &records {
            if record.precipitation < 0.0 {
                return Err(ScenarioError::NegativePrecipitation {
                    date: record.date,
                    value: record.precipitation,
                });
            }
        }
        Ok(DailySeries(records))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A daily record carrying its monthly delta shift alongside the original
/// values. `shifted_precipitation` equals `precipitation` on dry days; the
/// temperature offset applies to every day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftedRecord {
    pub date: NaiveDate,
    pub precipitation: f64,
    pub temperature: f64,
    pub shifted_precipitation: f64,
    pub shifted_temperature: f64,
}

/// Output of the delta shift transform: the shifted series plus the count
/// of records whose month had to fall back to a zero shift.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftedSeries {
    pub records: Vec<ShiftedRecord>,
    pub defaulted_months: usize,
}

/// Canonical scenario output row, shared by both scenario policies.
///
/// `percentile` and `multiplier` are populated by the stretch policy for
/// wet days (for audit of the rank transform and the applied factor) and
/// absent under the drought policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub date: NaiveDate,
    pub original_precipitation: f64,
    pub delta_shift_precipitation: f64,
    pub original_temperature: f64,
    pub delta_shift_temperature: f64,
    pub scenario_precipitation: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
}

impl ScenarioRecord {
    /// A scenario row whose scenario precipitation equals the shifted
    /// value, i.e. the policy left this day untouched.
    pub fn passthrough(shifted: &ShiftedRecord) -> Self {
        ScenarioRecord {
            date: shifted.date,
            original_precipitation: shifted.precipitation,
            delta_shift_precipitation: shifted.shifted_precipitation,
            original_temperature: shifted.temperature,
            delta_shift_temperature: shifted.shifted_temperature,
            scenario_precipitation: shifted.shifted_precipitation,
            percentile: None,
            multiplier: None,
        }
    }
}

/// A sub-day observation, joined to scenario rows by the date component
/// of its timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubdailyRecord {
    pub timestamp: NaiveDateTime,
    pub precipitation: f64,
    pub temperature: f64,
}

/// A sub-day row after daily scenario ratios have been propagated onto it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubdailyScenarioRecord {
    pub timestamp: NaiveDateTime,
    pub original_precipitation: f64,
    pub delta_shift_precipitation: f64,
    pub original_temperature: f64,
    pub delta_shift_temperature: f64,
    pub scenario_precipitation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(year: i32, month: u32, day: u32, precip: f64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            precipitation: precip,
            temperature: 10.0,
        }
    }

    #[test]
    fn test_series_sorted_on_construction() {
        let series = DailySeries::new(vec![
            day(2020, 6, 2, 1.0),
            day(2020, 6, 1, 2.0),
            day(2020, 5, 31, 3.0),
        ])
        .unwrap();
        let dates: Vec<_> = series.0.iter().map(|r| r.date).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let result = DailySeries::new(vec![day(2020, 6, 1, 1.0), day(2020, 6, 1, 2.0)]);
        match result {
            Err(ScenarioError::DuplicateDate(date)) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
            }
            other => panic!("expected DuplicateDate, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_precipitation_rejected() {
        let result = DailySeries::new(vec![day(2020, 6, 1, -0.5)]);
        assert!(matches!(
            result,
            Err(ScenarioError::NegativePrecipitation { .. })
        ));
    }

    #[test]
    fn test_passthrough_row() {
        let shifted = ShiftedRecord {
            date: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
            precipitation: 10.0,
            temperature: 20.0,
            shifted_precipitation: 8.0,
            shifted_temperature: 22.0,
        };
        let row = ScenarioRecord::passthrough(&shifted);
        assert_eq!(row.scenario_precipitation, 8.0);
        assert_eq!(row.delta_shift_temperature, 22.0);
        assert!(row.percentile.is_none());
    }
}
