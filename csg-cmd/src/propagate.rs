//! Subdaily propagation command.

use crate::io::{self, RunReport};
use csg_engine::propagate;
use log::info;
use serde_json::json;

/// Propagate a previously written daily scenario onto a subdaily series.
pub fn run_propagate(
    subdaily_csv: &str,
    scenario_csv: &str,
    output_csv: &str,
) -> anyhow::Result<()> {
    let subdaily = io::read_subdaily_csv(subdaily_csv)?;
    let scenario = io::read_scenario_csv(scenario_csv)?;

    let result = propagate::apply(&subdaily, &scenario);
    if result.diagnostics.unmatched_subdaily > 0 {
        info!(
            "{} of {} subdaily records had no scenario date",
            result.diagnostics.unmatched_subdaily,
            result.records.len()
        );
    }

    io::write_subdaily_scenario_csv(output_csv, &result.records)?;
    io::write_report(
        output_csv,
        &RunReport {
            mode: "propagate",
            parameters: json!({
                "subdaily": subdaily_csv,
                "scenario": scenario_csv,
            }),
            records: result.records.len(),
            diagnostics: result.diagnostics,
        },
    )
}
