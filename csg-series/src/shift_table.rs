//! Monthly delta shift table.

use crate::error::{Result, ScenarioError};
use serde::{Deserialize, Serialize};

/// Projected climate adjustment for one calendar month: a percent change
/// applied to wet-day precipitation and an additive temperature offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyShift {
    pub month: u32,
    pub precip_pct_change: f64,
    pub temp_offset: f64,
}

/// Validated mapping from calendar month (1-12) to its [`MonthlyShift`].
///
/// A table is only constructible with exactly one entry per month; a table
/// missing any month is rejected outright rather than interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyShiftTable {
    shifts: [MonthlyShift; 12],
}

impl MonthlyShiftTable {
    /// Build a table from entries, requiring exactly one per month 1-12.
    pub fn new(entries: Vec<MonthlyShift>) -> Result<Self> {
        let mut slots: [Option<MonthlyShift>; 12] = [None; 12];
        for entry in entries {
            if !(1..=12).contains(&entry.month) {
                return Err(ScenarioError::InvalidMonth(entry.month));
            }
            let slot = &mut slots[(entry.month - 1) as usize];
            if slot.is_some() {
                return Err(ScenarioError::DuplicateMonth(entry.month));
            }
            *slot = Some(entry);
        }
        for (index, slot) in slots.iter().enumerate() {
            if slot.is_none() {
                return Err(ScenarioError::MissingMonth(index as u32 + 1));
            }
        }
        Ok(MonthlyShiftTable {
            shifts: slots.map(|slot| slot.unwrap()),
        })
    }

    /// Table with no adjustment in any month.
    pub fn zero() -> Self {
        let mut month = 0;
        MonthlyShiftTable {
            shifts: [(); 12].map(|_| {
                month += 1;
                MonthlyShift {
                    month,
                    precip_pct_change: 0.0,
                    temp_offset: 0.0,
                }
            }),
        }
    }

    /// Shift for a calendar month, or None when the month is outside 1-12.
    pub fn get(&self, month: u32) -> Option<&MonthlyShift> {
        if (1..=12).contains(&month) {
            Some(&self.shifts[(month - 1) as usize])
        } else {
            None
        }
    }

    /// All twelve shifts in month order.
    pub fn iter(&self) -> impl Iterator<Item = &MonthlyShift> {
        self.shifts.iter()
    }
}
