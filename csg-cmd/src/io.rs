//! CSV parsing and writing plus the JSON run report.
//!
//! Column layouts are fixed (see the headers below); there is no
//! column-name sniffing or date-format guessing. Parsers work over
//! in-memory strings so they can be exercised without touching disk; the
//! `read_*` wrappers add the file handling.

use anyhow::{bail, Context};
use csg_series::diagnostics::Diagnostics;
use csg_series::record::{
    DailyRecord, DailySeries, ScenarioRecord, SubdailyRecord, SubdailyScenarioRecord,
};
use csg_series::shift_table::{MonthlyShift, MonthlyShiftTable};
use csg_utils::dates;
use csv::ReaderBuilder;
use log::info;
use serde::Serialize;

pub const DAILY_HEADER: &str = "date,precipitation,temperature";
pub const SHIFTS_HEADER: &str = "month,precip_pct_change,temp_offset";
pub const SUBDAILY_HEADER: &str = "timestamp,precipitation,temperature";
pub const SCENARIO_HEADER: &str = "date,original_precipitation,delta_shift_precipitation,original_temperature,delta_shift_temperature,scenario_precipitation";
pub const SCENARIO_STRETCH_HEADER: &str = "date,original_precipitation,delta_shift_precipitation,original_temperature,delta_shift_temperature,scenario_precipitation,percentile,multiplier";
pub const SUBDAILY_SCENARIO_HEADER: &str = "timestamp,original_precipitation,delta_shift_precipitation,original_temperature,delta_shift_temperature,scenario_precipitation";

fn field<'a>(record: &'a csv::StringRecord, index: usize, row: usize) -> anyhow::Result<&'a str> {
    record
        .get(index)
        .with_context(|| format!("Row {}: missing column {}", row, index + 1))
}

fn parse_float(value: &str, name: &str, row: usize) -> anyhow::Result<f64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("Row {}: invalid {} value {:?}", row, name, value))
}

/// Parse a daily series from CSV text with a `date,precipitation,temperature` header.
pub fn parse_daily_csv(data: &str) -> anyhow::Result<DailySeries> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());
    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = index + 2; // header is row 1
        let record = result?;
        records.push(DailyRecord {
            date: dates::parse_date(field(&record, 0, row)?)
                .with_context(|| format!("Row {}: invalid date", row))?,
            precipitation: parse_float(field(&record, 1, row)?, "precipitation", row)?,
            temperature: parse_float(field(&record, 2, row)?, "temperature", row)?,
        });
    }
    Ok(DailySeries::new(records)?)
}

pub fn read_daily_csv(path: &str) -> anyhow::Result<DailySeries> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read daily series {}", path))?;
    let series = parse_daily_csv(&data)?;
    info!("Loaded {} daily records from {}", series.len(), path);
    Ok(series)
}

/// Parse a monthly shift table from CSV text with a
/// `month,precip_pct_change,temp_offset` header; exactly one row per month.
pub fn parse_shifts_csv(data: &str) -> anyhow::Result<MonthlyShiftTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());
    let mut entries = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = index + 2;
        let record = result?;
        let month: u32 = field(&record, 0, row)?
            .trim()
            .parse()
            .with_context(|| format!("Row {}: invalid month", row))?;
        entries.push(MonthlyShift {
            month,
            precip_pct_change: parse_float(field(&record, 1, row)?, "precip_pct_change", row)?,
            temp_offset: parse_float(field(&record, 2, row)?, "temp_offset", row)?,
        });
    }
    Ok(MonthlyShiftTable::new(entries)?)
}

pub fn read_shifts_csv(path: &str) -> anyhow::Result<MonthlyShiftTable> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read shift table {}", path))?;
    parse_shifts_csv(&data).with_context(|| format!("Invalid shift table {}", path))
}

/// Parse a subdaily series from CSV text with a
/// `timestamp,precipitation,temperature` header, timestamps `YYYY-MM-DD HH:MM`.
pub fn parse_subdaily_csv(data: &str) -> anyhow::Result<Vec<SubdailyRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());
    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = index + 2;
        let record = result?;
        records.push(SubdailyRecord {
            timestamp: dates::parse_timestamp(field(&record, 0, row)?)
                .with_context(|| format!("Row {}: invalid timestamp", row))?,
            precipitation: parse_float(field(&record, 1, row)?, "precipitation", row)?,
            temperature: parse_float(field(&record, 2, row)?, "temperature", row)?,
        });
    }
    Ok(records)
}

pub fn read_subdaily_csv(path: &str) -> anyhow::Result<Vec<SubdailyRecord>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read subdaily series {}", path))?;
    let records = parse_subdaily_csv(&data)?;
    info!("Loaded {} subdaily records from {}", records.len(), path);
    Ok(records)
}

/// Parse a previously written scenario CSV (either column layout).
pub fn parse_scenario_csv(data: &str) -> anyhow::Result<Vec<ScenarioRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());
    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = index + 2;
        let record = result?;
        if record.len() < 6 {
            bail!("Row {}: expected at least 6 columns, found {}", row, record.len());
        }
        let optional = |i: usize| -> anyhow::Result<Option<f64>> {
            match record.get(i) {
                Some("") | None => Ok(None),
                Some(value) => Ok(Some(parse_float(value, "stretch column", row)?)),
            }
        };
        records.push(ScenarioRecord {
            date: dates::parse_date(field(&record, 0, row)?)
                .with_context(|| format!("Row {}: invalid date", row))?,
            original_precipitation: parse_float(field(&record, 1, row)?, "original_precipitation", row)?,
            delta_shift_precipitation: parse_float(field(&record, 2, row)?, "delta_shift_precipitation", row)?,
            original_temperature: parse_float(field(&record, 3, row)?, "original_temperature", row)?,
            delta_shift_temperature: parse_float(field(&record, 4, row)?, "delta_shift_temperature", row)?,
            scenario_precipitation: parse_float(field(&record, 5, row)?, "scenario_precipitation", row)?,
            percentile: optional(6)?,
            multiplier: optional(7)?,
        });
    }
    Ok(records)
}

pub fn read_scenario_csv(path: &str) -> anyhow::Result<Vec<ScenarioRecord>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario series {}", path))?;
    let records = parse_scenario_csv(&data)?;
    info!("Loaded {} scenario records from {}", records.len(), path);
    Ok(records)
}

/// Render scenario rows as CSV text. Stretch runs carry the two extra
/// audit columns; drought runs use the shorter layout.
pub fn scenario_csv_string(records: &[ScenarioRecord], stretch_columns: bool) -> String {
    let header = if stretch_columns {
        SCENARIO_STRETCH_HEADER
    } else {
        SCENARIO_HEADER
    };
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header.to_string());
    for record in records {
        let mut line = format!(
            "{},{},{},{},{},{}",
            dates::format_date(&record.date),
            record.original_precipitation,
            record.delta_shift_precipitation,
            record.original_temperature,
            record.delta_shift_temperature,
            record.scenario_precipitation
        );
        if stretch_columns {
            let fmt = |value: Option<f64>| value.map_or(String::new(), |v| v.to_string());
            line.push_str(&format!(
                ",{},{}",
                fmt(record.percentile),
                fmt(record.multiplier)
            ));
        }
        lines.push(line);
    }
    lines.join("\n") + "\n"
}

pub fn write_scenario_csv(
    path: &str,
    records: &[ScenarioRecord],
    stretch_columns: bool,
) -> anyhow::Result<()> {
    std::fs::write(path, scenario_csv_string(records, stretch_columns))
        .with_context(|| format!("Failed to write scenario CSV {}", path))?;
    info!("{} scenario records written to {}", records.len(), path);
    Ok(())
}

/// Render propagated subdaily rows as CSV text.
pub fn subdaily_scenario_csv_string(records: &[SubdailyScenarioRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(SUBDAILY_SCENARIO_HEADER.to_string());
    for record in records {
        lines.push(format!(
            "{},{},{},{},{},{}",
            dates::format_timestamp(&record.timestamp),
            record.original_precipitation,
            record.delta_shift_precipitation,
            record.original_temperature,
            record.delta_shift_temperature,
            record.scenario_precipitation
        ));
    }
    lines.join("\n") + "\n"
}

pub fn write_subdaily_scenario_csv(
    path: &str,
    records: &[SubdailyScenarioRecord],
) -> anyhow::Result<()> {
    std::fs::write(path, subdaily_scenario_csv_string(records))
        .with_context(|| format!("Failed to write subdaily scenario CSV {}", path))?;
    info!("{} subdaily records written to {}", records.len(), path);
    Ok(())
}

/// Metadata report written alongside every output CSV.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub mode: &'static str,
    pub parameters: serde_json::Value,
    pub records: usize,
    pub diagnostics: Diagnostics,
}

pub fn write_report(output_csv: &str, report: &RunReport) -> anyhow::Result<()> {
    let path = format!("{}.report.json", output_csv);
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write report {}", path))?;
    info!("Run report written to {}", path);
    Ok(())
}
