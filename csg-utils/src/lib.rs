//! Shared utility functions for CSG crates.

/// Date and timestamp utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Format a NaiveDateTime as "YYYY-MM-DD HH:MM"
    pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
        timestamp.format("%Y-%m-%d %H:%M").to_string()
    }

    /// Parse a timestamp string in "YYYY-MM-DD HH:MM" format
    pub fn parse_timestamp(s: &str) -> anyhow::Result<NaiveDateTime> {
        Ok(NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M")?)
    }

}
