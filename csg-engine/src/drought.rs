//! Seasonal drought redistribution.

use csg_series::diagnostics::{
    Diagnostics, GroupMassBalance, ScenarioResult, MASS_BALANCE_TOLERANCE,
};
use csg_series::error::{Result, ScenarioError};
use csg_series::record::{ScenarioRecord, ShiftedRecord};
use csg_series::season::{season_key, Season};
use log::warn;
use std::collections::BTreeMap;

/// Redistribute shifted precipitation within each season-year group.
///
/// Spring/summer precipitation is scaled down uniformly by
/// `drought_factor`; the removed mass is added to the wet fall/winter
/// days of the same season-year, each in proportion to its share of the
/// fall/winter total. Dry days never receive mass. The group total is
/// unchanged whenever redistribution is possible, and the per-group
/// balance is checked and reported either way. Temperature passes
/// through the delta-shift values untouched.
pub fn apply(shifted: &[ShiftedRecord], drought_factor: f64) -> Result<ScenarioResult> {
    if !(0.0..=1.0).contains(&drought_factor) {
        return Err(ScenarioError::ParameterOutOfRange {
            name: "drought_factor",
            value: drought_factor,
            expected: "0 to 1",
        });
    }

    let mut records: Vec<ScenarioRecord> = shifted.iter().map(ScenarioRecord::passthrough).collect();

    // indices per season-year, in date order
    let mut groups: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (index, record) in shifted.iter().enumerate() {
        let (_, season_year) = season_key(&record.date);
        groups.entry(season_year).or_default().push(index);
    }

    let mut diagnostics = Diagnostics::default();

    for (season_year, indices) in &groups {
        let mut spring_summer_total = 0.0;
        let mut fall_winter_total = 0.0;
        for &index in indices {
            let record = &shifted[index];
            match season_key(&record.date).0 {
                Season::SpringSummer => spring_summer_total += record.shifted_precipitation,
                Season::FallWinter => fall_winter_total += record.shifted_precipitation,
            }
        }

        let amount_to_redistribute = spring_summer_total * (1.0 - drought_factor);

        for &index in indices {
            let record = &shifted[index];
            if season_key(&record.date).0 == Season::SpringSummer {
                records[index].scenario_precipitation =
                    record.shifted_precipitation * drought_factor;
            }
        }

        if amount_to_redistribute > 0.0 && fall_winter_total > 0.0 {
            for &index in indices {
                let record = &shifted[index];
                if season_key(&record.date).0 == Season::FallWinter
                    && record.shifted_precipitation > 0.0
                {
                    let added = amount_to_redistribute
                        * (record.shifted_precipitation / fall_winter_total);
                    records[index].scenario_precipitation =
                        record.shifted_precipitation + added;
                }
            }
        } else if amount_to_redistribute > 0.0 {
            warn!(
                "Season-year {}: no wet fall/winter days to receive {:.3} of redistributed precipitation",
                season_year, amount_to_redistribute
            );
            diagnostics.skipped_redistribution.push(*season_year);
        }

        let shifted_total = spring_summer_total + fall_winter_total;
        let scenario_total: f64 = indices
            .iter()
            .map(|&index| records[index].scenario_precipitation)
            .sum();
        let error = (scenario_total - shifted_total).abs();
        let within_tolerance = error <= MASS_BALANCE_TOLERANCE;
        if !within_tolerance {
            warn!(
                "Season-year {}: mass balance violated by {:.6} (shifted {:.3}, scenario {:.3})",
                season_year, error, shifted_total, scenario_total
            );
        }
        diagnostics.mass_balance.push(GroupMassBalance {
            season_year: *season_year,
            shifted_total,
            scenario_total,
            error,
            within_tolerance,
        });
    }

    Ok(ScenarioResult {
        records,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn shifted(
        year: i32,
        month: u32,
        day: u32,
        precipitation: f64,
        shifted_precipitation: f64,
    ) -> ShiftedRecord {
        ShiftedRecord {
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            precipitation,
            temperature: 10.0,
            shifted_precipitation,
            shifted_temperature: 10.0,
        }
    }

    #[test]
    fn test_rejects_out_of_range_factor() {
        let series = vec![shifted(2020, 6, 1, 10.0, 10.0)];
        assert!(matches!(
            apply(&series, 1.5),
            Err(ScenarioError::ParameterOutOfRange { .. })
        ));
        assert!(matches!(
            apply(&series, -0.1),
            Err(ScenarioError::ParameterOutOfRange { .. })
        ));
    }

    #[test]
    fn test_spec_example_redistribution() {
        // June precip 8.0 shifted, December 5.5 shifted, factor 0.5:
        // June scenario 4.0, December 5.5 + 4.0 * (5.5/5.5) = 9.5
        let series = vec![
            shifted(2020, 6, 1, 10.0, 8.0),
            shifted(2020, 12, 1, 5.0, 5.5),
        ];
        let result = apply(&series, 0.5).unwrap();
        assert!((result.records[0].scenario_precipitation - 4.0).abs() < 1e-12);
        assert!((result.records[1].scenario_precipitation - 9.5).abs() < 1e-12);
        let balance = &result.diagnostics.mass_balance[0];
        assert_eq!(balance.season_year, 2020);
        assert!(balance.within_tolerance);
        assert!((balance.scenario_total - 13.5).abs() < 1e-12);
    }

    #[test]
    fn test_mass_conserved_across_factors() {
        let series = vec![
            shifted(2020, 3, 10, 4.0, 4.4),
            shifted(2020, 5, 2, 0.0, 0.0),
            shifted(2020, 7, 20, 12.0, 11.0),
            shifted(2020, 9, 5, 3.0, 3.3),
            shifted(2020, 11, 18, 7.0, 6.5),
            shifted(2021, 1, 9, 2.0, 2.2),
        ];
        for factor in [0.0, 0.25, 0.5, 0.9, 1.0] {
            let result = apply(&series, factor).unwrap();
            for balance in &result.diagnostics.mass_balance {
                assert!(
                    balance.error < 1e-3,
                    "factor {} season-year {} error {}",
                    factor,
                    balance.season_year,
                    balance.error
                );
            }
        }
    }

    #[test]
    fn test_dry_fall_winter_days_receive_nothing() {
        let series = vec![
            shifted(2020, 6, 1, 10.0, 10.0),
            shifted(2020, 10, 1, 0.0, 0.0),
            shifted(2020, 11, 1, 5.0, 5.0),
        ];
        let result = apply(&series, 0.5).unwrap();
        assert_eq!(result.records[1].scenario_precipitation, 0.0);
        // the wet day absorbs the entire surplus
        assert!((result.records[2].scenario_precipitation - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_wet_fall_winter_days_skips_redistribution() {
        let series = vec![
            shifted(2020, 6, 1, 10.0, 10.0),
            shifted(2020, 10, 1, 0.0, 0.0),
        ];
        let result = apply(&series, 0.5).unwrap();
        assert_eq!(result.records[0].scenario_precipitation, 5.0);
        assert_eq!(result.records[1].scenario_precipitation, 0.0);
        assert_eq!(result.diagnostics.skipped_redistribution, vec![2020]);
        // mass cannot balance here, and the diagnostics say so
        assert!(!result.diagnostics.mass_balance[0].within_tolerance);
    }

    #[test]
    fn test_factor_one_is_identity() {
        let series = vec![
            shifted(2020, 6, 1, 10.0, 8.0),
            shifted(2020, 12, 1, 5.0, 5.5),
        ];
        let result = apply(&series, 1.0).unwrap();
        assert_eq!(result.records[0].scenario_precipitation, 8.0);
        assert_eq!(result.records[1].scenario_precipitation, 5.5);
        assert!(result.diagnostics.skipped_redistribution.is_empty());
    }

    #[test]
    fn test_groups_are_independent() {
        // two season-years; each balances on its own
        let series = vec![
            shifted(2020, 6, 1, 10.0, 10.0),
            shifted(2020, 12, 1, 4.0, 4.0),
            shifted(2021, 6, 1, 20.0, 20.0),
            shifted(2021, 12, 1, 8.0, 8.0),
        ];
        let result = apply(&series, 0.25).unwrap();
        assert_eq!(result.diagnostics.mass_balance.len(), 2);
        for balance in &result.diagnostics.mass_balance {
            assert!(balance.within_tolerance);
        }
        // december 2020 receives 10*0.75 on top of 4.0
        assert!((result.records[1].scenario_precipitation - 11.5).abs() < 1e-12);
        // december 2021 receives 20*0.75 on top of 8.0
        assert!((result.records[3].scenario_precipitation - 23.0).abs() < 1e-12);
    }

    #[test]
    fn test_temperature_passes_through() {
        let series = vec![shifted(2020, 6, 1, 10.0, 8.0)];
        let result = apply(&series, 0.3).unwrap();
        assert_eq!(result.records[0].original_temperature, 10.0);
        assert_eq!(result.records[0].delta_shift_temperature, 10.0);
    }
}
