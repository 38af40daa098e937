//! Core types for climate scenario series.
//!
//! A scenario run starts from a daily precipitation/temperature series and
//! a 12-entry monthly shift table, both already parsed and validated by the
//! caller. The types in this crate carry that data through the engine:
//! shifted records, season-year accounting keys, scenario output rows and
//! the diagnostics bundle that accompanies every result.

pub mod diagnostics;
pub mod error;
pub mod record;
pub mod season;
pub mod shift_table;
