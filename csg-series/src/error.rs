/// Error types for the climate scenario library
use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for scenario operations.
///
/// Every variant is fatal: the engine validates its configuration up front
/// and produces no partial result when validation fails. Non-fatal
/// conditions (mass balance drift, non-convergence, unmatched joins) are
/// carried in [`crate::diagnostics::Diagnostics`] instead.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Monthly shift table is missing an entry for a month
    #[error("Incomplete monthly shift table: no entry for month {0}")]
    MissingMonth(u32),

    /// Monthly shift table has more than one entry for a month
    #[error("Duplicate monthly shift entry for month {0}")]
    DuplicateMonth(u32),

    /// Month outside 1-12
    #[error("Invalid month {0} in monthly shift table (expected 1-12)")]
    InvalidMonth(u32),

    /// A scenario parameter is outside its documented range
    #[error("Parameter {name} = {value} out of range (expected {expected})")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// Daily series contains two records for the same date
    #[error("Duplicate daily record for {0}")]
    DuplicateDate(NaiveDate),

    /// Precipitation must be non-negative
    #[error("Negative precipitation {value} on {date}")]
    NegativePrecipitation { date: NaiveDate, value: f64 },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Type alias for Results using ScenarioError
pub type Result<T> = std::result::Result<T, ScenarioError>;
