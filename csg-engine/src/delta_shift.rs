//! Monthly delta shift application.

use chrono::Datelike;
use csg_series::record::{DailySeries, ShiftedRecord, ShiftedSeries};
use csg_series::shift_table::MonthlyShiftTable;
use log::warn;

/// Apply the monthly shift table to a daily series.
///
/// Temperature gets the month's additive offset on every record.
/// Precipitation gets the month's percent change only on wet days; the
/// multiplier scales existing intensity and never invents precipitation
/// on a dry day. A month absent from the table (unreachable through a
/// validated [`MonthlyShiftTable`], but handled all the same) falls back
/// to a zero shift and is counted in the output.
pub fn apply(series: &DailySeries, shifts: &MonthlyShiftTable) -> ShiftedSeries {
    let mut defaulted_months = 0;
    let records = series
        .0
        .iter()
        .map(|record| {
            let month = record.date.month();
            let (pct_change, offset) = match shifts.get(month) {
                Some(shift) => (shift.precip_pct_change, shift.temp_offset),
                None => {
                    warn!(
                        "No shift entry for month {} ({}), applying zero shift",
                        month, record.date
                    );
                    defaulted_months += 1;
                    (0.0, 0.0)
                }
            };
            let shifted_precipitation = if record.precipitation > 0.0 {
                record.precipitation * (100.0 + pct_change) / 100.0
            } else {
                record.precipitation
            };
            ShiftedRecord {
                date: record.date,
                precipitation: record.precipitation,
                temperature: record.temperature,
                shifted_precipitation,
                shifted_temperature: record.temperature + offset,
            }
        })
        .collect();
    ShiftedSeries {
        records,
        defaulted_months,
    }
}
