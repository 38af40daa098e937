//! Mass-balance-preserving climate scenario transforms.
//!
//! The engine turns a daily series plus a monthly shift table into a
//! scenario series under one of two policies:
//!
//! - [`drought`]: seasonal redistribution that moves a fraction of
//!   spring/summer precipitation onto wet fall/winter days of the same
//!   season-year, conserving the group total exactly.
//! - [`stretch`]: percentile-based amplification of extreme events whose
//!   four free parameters are calibrated so the wet-day total matches the
//!   delta-shifted total within tolerance.
//!
//! Both start from [`delta_shift`] output, and either result can be
//! propagated onto subdaily records with [`propagate`]. Every transform
//! is a pure function over its inputs and returns a freshly derived
//! series; candidate parameter sets during calibration are re-evaluated
//! against the same untouched base series.

pub mod delta_shift;
pub mod drought;
pub mod nelder_mead;
pub mod propagate;
pub mod stretch;
