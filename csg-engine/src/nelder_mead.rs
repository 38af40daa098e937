//! Derivative-free simplex minimization.
//!
//! Plain Nelder-Mead with fixed coefficients. The calibration objective is
//! non-convex and gradient-free, so the search only ever compares function
//! values. No randomness anywhere: a fixed input and initial guess always
//! walk the same simplex path.

use std::cmp::Ordering;

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Offset used to build the initial simplex around the starting point.
const INITIAL_STEP: f64 = 0.25;

/// Best point found by [`minimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    /// Whether the simplex spread fell within tolerance before the
    /// iteration cap.
    pub converged: bool,
}

/// Minimize `objective` starting from `initial`.
///
/// Stops when the spread of objective values across the simplex is within
/// `tolerance` (scaled by the best value, so the criterion is both
/// absolute and relative) or after `max_iterations` steps.
pub fn minimize<F>(
    objective: F,
    initial: &[f64],
    tolerance: f64,
    max_iterations: usize,
) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    assert!(n > 0, "cannot minimize over zero parameters");

    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    simplex.push((initial.to_vec(), objective(initial)));
    for i in 0..n {
        let mut point = initial.to_vec();
        point[i] += INITIAL_STEP;
        let value = objective(&point);
        simplex.push((point, value));
    }

    let mut iterations = 0;
    let mut converged = false;

    loop {
        simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        let best_value = simplex[0].1;
        let worst_value = simplex[n].1;

        if (worst_value - best_value).abs() <= tolerance * (1.0 + best_value.abs()) {
            converged = true;
            break;
        }
        if iterations >= max_iterations {
            break;
        }
        iterations += 1;

        // centroid of all vertices but the worst
        let mut centroid = vec![0.0; n];
        for (point, _) in &simplex[..n] {
            for (sum, coordinate) in centroid.iter_mut().zip(point) {
                *sum += coordinate;
            }
        }
        for coordinate in &mut centroid {
            *coordinate /= n as f64;
        }

        let worst_point = simplex[n].0.clone();
        let reflected: Vec<f64> = centroid
            .iter()
            .zip(&worst_point)
            .map(|(c, w)| c + REFLECTION * (c - w))
            .collect();
        let reflected_value = objective(&reflected);

        if reflected_value < simplex[0].1 {
            let expanded: Vec<f64> = centroid
                .iter()
                .zip(&reflected)
                .map(|(c, r)| c + EXPANSION * (r - c))
                .collect();
            let expanded_value = objective(&expanded);
            simplex[n] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
        } else if reflected_value < simplex[n - 1].1 {
            simplex[n] = (reflected, reflected_value);
        } else {
            let contracted: Vec<f64> = centroid
                .iter()
                .zip(&worst_point)
                .map(|(c, w)| c + CONTRACTION * (w - c))
                .collect();
            let contracted_value = objective(&contracted);
            if contracted_value < worst_value.min(reflected_value) {
                simplex[n] = (contracted, contracted_value);
            } else {
                let best_point = simplex[0].0.clone();
                for entry in simplex.iter_mut().skip(1) {
                    for (coordinate, anchor) in entry.0.iter_mut().zip(&best_point) {
                        *coordinate = anchor + SHRINK * (*coordinate - anchor);
                    }
                    entry.1 = objective(&entry.0);
                }
            }
        }
    }

    simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    let (point, value) = simplex.swap_remove(0);
    Minimum {
        point,
        value,
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimizes_quadratic() {
        let minimum = minimize(
            |p| (p[0] - 3.0).powi(2) + (p[1] + 2.0).powi(2),
            &[0.0, 0.0],
            1e-10,
            500,
        );
        assert!(minimum.converged);
        assert!((minimum.point[0] - 3.0).abs() < 1e-4);
        assert!((minimum.point[1] + 2.0).abs() < 1e-4);
        assert!(minimum.value < 1e-8);
    }

    #[test]
    fn test_minimizes_single_parameter() {
        let minimum = minimize(|p| (p[0] - 1.5).powi(2), &[10.0], 1e-10, 500);
        assert!(minimum.converged);
        assert!((minimum.point[0] - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_respects_iteration_cap() {
        let minimum = minimize(
            |p| (p[0] - 3.0).powi(2) + (p[1] + 2.0).powi(2),
            &[100.0, 100.0],
            1e-15,
            3,
        );
        assert!(!minimum.converged);
        assert_eq!(minimum.iterations, 3);
    }

    #[test]
    fn test_deterministic() {
        let run = || {
            minimize(
                |p| (p[0] - 0.5).powi(4) + (p[1] * p[1] - 2.0).powi(2),
                &[1.0, 1.0],
                1e-8,
                300,
            )
        };
        let first = run();
        let second = run();
        assert_eq!(first, second);
    }

    #[test]
    fn test_flat_objective_converges_immediately() {
        let minimum = minimize(|_| 0.0, &[1.0, 1.0, 1.0, 1.0], 1e-8, 100);
        assert!(minimum.converged);
        assert_eq!(minimum.iterations, 0);
        assert_eq!(minimum.value, 0.0);
    }
}
