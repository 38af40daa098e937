//! Command implementations for the CSG CLI.
//!
//! Provides subcommands for generating drought redistribution and
//! percentile stretch scenarios from daily CSV series, and for
//! propagating a daily scenario onto subdaily records.

use clap::Subcommand;

pub mod io;
pub mod propagate;
pub mod scenario;

#[derive(Subcommand)]
pub enum Command {
    /// Generate a seasonal drought redistribution scenario
    Drought {
        /// Daily series CSV (date,precipitation,temperature)
        #[arg(short, long)]
        daily: String,

        /// Monthly shift table CSV (month,precip_pct_change,temp_offset)
        #[arg(short, long)]
        shifts: String,

        /// Fraction of spring/summer precipitation retained, 0 to 1
        #[arg(short, long)]
        factor: f64,

        /// Output path for the scenario CSV
        #[arg(short, long)]
        output: String,
    },

    /// Generate a percentile stretch scenario with calibrated parameters
    Stretch {
        /// Daily series CSV (date,precipitation,temperature)
        #[arg(short, long)]
        daily: String,

        /// Monthly shift table CSV (month,precip_pct_change,temp_offset)
        #[arg(short, long)]
        shifts: String,

        /// Percentile threshold above which wet days are stretched, 0 to 100
        #[arg(long)]
        threshold: f64,

        /// Percent boost applied to stretched days
        #[arg(long)]
        stretch_pct: f64,

        /// Stretch function variant: sigmoid or power-law
        #[arg(long, default_value = "sigmoid")]
        variant: String,

        /// Relative mass-balance tolerance for the calibration
        #[arg(long, default_value_t = csg_engine::stretch::DEFAULT_TOLERANCE)]
        tolerance: f64,

        /// Cap on calibration search steps
        #[arg(long, default_value_t = csg_engine::stretch::DEFAULT_MAX_ITERATIONS)]
        max_iterations: usize,

        /// Output path for the scenario CSV
        #[arg(short, long)]
        output: String,
    },

    /// Propagate a daily scenario onto a subdaily series
    Propagate {
        /// Subdaily series CSV (timestamp,precipitation,temperature)
        #[arg(long)]
        subdaily: String,

        /// Previously written scenario CSV
        #[arg(long)]
        scenario: String,

        /// Output path for the subdaily scenario CSV
        #[arg(short, long)]
        output: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Drought {
            daily,
            shifts,
            factor,
            output,
        } => scenario::run_drought(&daily, &shifts, factor, &output),
        Command::Stretch {
            daily,
            shifts,
            threshold,
            stretch_pct,
            variant,
            tolerance,
            max_iterations,
            output,
        } => scenario::run_stretch(
            &daily,
            &shifts,
            scenario::stretch_settings(threshold, stretch_pct, &variant, tolerance, max_iterations)?,
            &output,
        ),
        Command::Propagate {
            subdaily,
            scenario,
            output,
        } => propagate::run_propagate(&subdaily, &scenario, &output),
    }
}
