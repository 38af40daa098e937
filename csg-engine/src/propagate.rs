//! Daily-to-subdaily scenario propagation.

use chrono::NaiveDate;
use csg_series::diagnostics::Diagnostics;
use csg_series::record::{ScenarioRecord, SubdailyRecord, SubdailyScenarioRecord};
use log::warn;
use std::collections::BTreeMap;

/// A propagated subdaily series plus the join diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationResult {
    pub records: Vec<SubdailyScenarioRecord>,
    pub diagnostics: Diagnostics,
}

/// Apply daily scenario ratios onto subdaily records.
///
/// Each subdaily record joins to the scenario record for the date of its
/// timestamp. Precipitation is scaled by the day's delta-shift and
/// scenario ratios, but only when both the subdaily and the daily
/// original precipitation are positive; a dry sub-period stays exactly
/// dry. Temperature receives the day's additive delta-shift adjustment
/// on every matched sub-period, preserving the diurnal shape. Records
/// with no matching scenario date keep their original values and are
/// counted in the diagnostics.
pub fn apply(subdaily: &[SubdailyRecord], scenario: &[ScenarioRecord]) -> PropagationResult {
    let by_date: BTreeMap<NaiveDate, &ScenarioRecord> = scenario
        .iter()
        .map(|record| (record.date, record))
        .collect();

    let mut diagnostics = Diagnostics::default();
    let records = subdaily
        .iter()
        .map(|record| match by_date.get(&record.timestamp.date()) {
            Some(daily) => propagate_record(record, daily),
            None => {
                diagnostics.unmatched_subdaily += 1;
                SubdailyScenarioRecord {
                    timestamp: record.timestamp,
                    original_precipitation: record.precipitation,
                    delta_shift_precipitation: record.precipitation,
                    original_temperature: record.temperature,
                    delta_shift_temperature: record.temperature,
                    scenario_precipitation: record.precipitation,
                }
            }
        })
        .collect();

    if diagnostics.unmatched_subdaily > 0 {
        warn!(
            "{} subdaily records had no scenario record for their date",
            diagnostics.unmatched_subdaily
        );
    }

    PropagationResult {
        records,
        diagnostics,
    }
}

fn propagate_record(record: &SubdailyRecord, daily: &ScenarioRecord) -> SubdailyScenarioRecord {
    let (delta_shift_precipitation, scenario_precipitation) =
        if record.precipitation > 0.0 && daily.original_precipitation > 0.0 {
            let delta_shift_ratio =
                daily.delta_shift_precipitation / daily.original_precipitation;
            let scenario_ratio = daily.scenario_precipitation / daily.original_precipitation;
            (
                record.precipitation * delta_shift_ratio,
                record.precipitation * scenario_ratio,
            )
        } else {
            (0.0, 0.0)
        };
    let adjustment = daily.delta_shift_temperature - daily.original_temperature;
    SubdailyScenarioRecord {
        timestamp: record.timestamp,
        original_precipitation: record.precipitation,
        delta_shift_precipitation,
        original_temperature: record.temperature,
        delta_shift_temperature: record.temperature + adjustment,
        scenario_precipitation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn daily(
        year: i32,
        month: u32,
        day: u32,
        original: f64,
        delta: f64,
        scenario: f64,
    ) -> ScenarioRecord {
        ScenarioRecord {
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            original_precipitation: original,
            delta_shift_precipitation: delta,
            original_temperature: 20.0,
            delta_shift_temperature: 22.0,
            scenario_precipitation: scenario,
            percentile: None,
            multiplier: None,
        }
    }

    fn subdaily(year: i32, month: u32, day: u32, hour: u32, precip: f64) -> SubdailyRecord {
        SubdailyRecord {
            timestamp: NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            precipitation: precip,
            temperature: 15.0,
        }
    }

    #[test]
    fn test_precipitation_ratios_applied() {
        // daily: 10 original, 8 shifted, 4 scenario -> ratios 0.8 and 0.4
        let scenario = vec![daily(2020, 6, 1, 10.0, 8.0, 4.0)];
        let records = vec![subdaily(2020, 6, 1, 6, 2.0), subdaily(2020, 6, 1, 18, 8.0)];
        let result = apply(&records, &scenario);
        assert!((result.records[0].delta_shift_precipitation - 1.6).abs() < 1e-12);
        assert!((result.records[0].scenario_precipitation - 0.8).abs() < 1e-12);
        assert!((result.records[1].delta_shift_precipitation - 6.4).abs() < 1e-12);
        assert!((result.records[1].scenario_precipitation - 3.2).abs() < 1e-12);
        // sub-periods sum back to the daily totals
        let delta_sum: f64 = result
            .records
            .iter()
            .map(|r| r.delta_shift_precipitation)
            .sum();
        let scenario_sum: f64 = result
            .records
            .iter()
            .map(|r| r.scenario_precipitation)
            .sum();
        assert!((delta_sum - 8.0).abs() < 1e-12);
        assert!((scenario_sum - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_dry_sub_period_never_inflated() {
        let scenario = vec![daily(2020, 6, 1, 10.0, 8.0, 4.0)];
        let records = vec![subdaily(2020, 6, 1, 6, 0.0)];
        let result = apply(&records, &scenario);
        assert_eq!(result.records[0].delta_shift_precipitation, 0.0);
        assert_eq!(result.records[0].scenario_precipitation, 0.0);
    }

    #[test]
    fn test_dry_daily_record_zeroes_sub_periods() {
        // inconsistent input: subdaily rain on a day whose daily original
        // is zero; the ratios are undefined, both derived fields are 0
        let scenario = vec![daily(2020, 6, 1, 0.0, 0.0, 0.0)];
        let records = vec![subdaily(2020, 6, 1, 6, 1.0)];
        let result = apply(&records, &scenario);
        assert_eq!(result.records[0].delta_shift_precipitation, 0.0);
        assert_eq!(result.records[0].scenario_precipitation, 0.0);
    }

    #[test]
    fn test_temperature_adjustment_uniform_across_day() {
        let scenario = vec![daily(2020, 6, 1, 10.0, 8.0, 4.0)];
        let records = vec![
            subdaily(2020, 6, 1, 0, 0.0),
            subdaily(2020, 6, 1, 12, 5.0),
            subdaily(2020, 6, 1, 23, 0.0),
        ];
        let result = apply(&records, &scenario);
        for record in &result.records {
            // daily adjustment is +2.0 regardless of wetness
            assert!((record.delta_shift_temperature - 17.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unmatched_records_kept_with_originals() {
        let scenario = vec![daily(2020, 6, 1, 10.0, 8.0, 4.0)];
        let records = vec![subdaily(2020, 6, 2, 6, 3.0)];
        let result = apply(&records, &scenario);
        assert_eq!(result.diagnostics.unmatched_subdaily, 1);
        let unmatched = &result.records[0];
        assert_eq!(unmatched.delta_shift_precipitation, 3.0);
        assert_eq!(unmatched.scenario_precipitation, 3.0);
        assert_eq!(unmatched.delta_shift_temperature, 15.0);
    }
}
