//! Scenario result contract and run diagnostics.

use crate::record::ScenarioRecord;
use serde::{Deserialize, Serialize};

/// Absolute tolerance for the per-group seasonal mass balance check.
pub const MASS_BALANCE_TOLERANCE: f64 = 1e-3;

/// The four free parameters of the stretch function. Consumers read them
/// through `abs()`, so the calibrated values are reported as non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StretchParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl StretchParameters {
    /// Initial calibration guess.
    pub fn initial() -> Self {
        StretchParameters {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            d: 1.0,
        }
    }

    pub fn from_slice(values: &[f64]) -> Self {
        StretchParameters {
            a: values[0].abs(),
            b: values[1].abs(),
            c: values[2].abs(),
            d: values[3].abs(),
        }
    }
}

/// Mass balance outcome for one season-year accounting group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMassBalance {
    pub season_year: i32,
    pub shifted_total: f64,
    pub scenario_total: f64,
    /// `|scenario_total - shifted_total|`
    pub error: f64,
    pub within_tolerance: bool,
}

/// Outcome of the stretch parameter calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub parameters: StretchParameters,
    /// Relative error of the calibrated wet-day total against its target.
    pub convergence_error: f64,
    pub converged: bool,
    pub iterations: usize,
}

/// Non-fatal observations accumulated during a scenario run.
///
/// The engine never aborts on these; the caller decides what to do with
/// an out-of-tolerance group or an unconverged calibration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Records whose month was absent from the shift table and fell back
    /// to a zero shift.
    pub defaulted_months: usize,
    /// Subdaily records with no scenario row for their date.
    pub unmatched_subdaily: usize,
    /// Season-years where spring/summer surplus existed but the fall/winter
    /// wet-day total was zero, so nothing could be redistributed.
    pub skipped_redistribution: Vec<i32>,
    /// Per-group mass balance results (drought policy).
    pub mass_balance: Vec<GroupMassBalance>,
    /// Calibration outcome (stretch policy).
    pub calibration: Option<Calibration>,
}

/// A scenario series together with its diagnostics: the full output of
/// either scenario policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    pub records: Vec<ScenarioRecord>,
    pub diagnostics: Diagnostics,
}
