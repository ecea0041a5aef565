//! Bounded Newton-Raphson solutions of Kepler's equation.
//!
//! Both solvers start from the mean anomaly, clamp each correction to
//! [`MAX_STEP`] radians and stop after [`MAX_ITERATIONS`]. Running out of
//! iterations is reported as a [`ConvergenceError`], never looped past.

use thiserror::Error;

pub const MAX_ITERATIONS: u32 = 20;
pub const TOLERANCE: f64 = 1e-12;
/// Below this eccentricity the orbit is treated as circular and `E = M`.
pub const CIRCULAR_ECCENTRICITY: f64 = 1e-8;
/// Largest correction applied in one Newton step.
pub const MAX_STEP: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error(
    "Kepler solver did not converge after {iterations} iterations (last correction {residual:e} rad)"
)]
pub struct ConvergenceError {
    pub iterations: u32,
    pub residual: f64,
}

/// Solve `E - e·sin(E) = M` for the eccentric anomaly `E` (radians).
pub fn solve(mean_anomaly: f64, eccentricity: f64) -> Result<f64, ConvergenceError> {
    if eccentricity < CIRCULAR_ECCENTRICITY {
        return Ok(mean_anomaly);
    }

    let mut e_anom = mean_anomaly;
    let mut delta = f64::INFINITY;
    for _ in 0..MAX_ITERATIONS {
        let f = e_anom - eccentricity * e_anom.sin() - mean_anomaly;
        let f_prime = 1.0 - eccentricity * e_anom.cos();
        delta = clamp_step(f / f_prime);
        e_anom -= delta;
        if delta.abs() < TOLERANCE {
            return Ok(e_anom);
        }
    }

    Err(ConvergenceError {
        iterations: MAX_ITERATIONS,
        residual: delta.abs(),
    })
}

/// Solve the equinoctial form `u = E - axn·sin(E) + ayn·cos(E)` used by the
/// SGP-4 tail, where `E` here is the eccentric longitude and
/// `(axn, ayn) = e·(cos ω, sin ω)` plus long-period terms.
pub fn solve_equinoctial(u: f64, axn: f64, ayn: f64) -> Result<f64, ConvergenceError> {
    let mut eo1 = u;
    let mut delta = f64::INFINITY;
    for _ in 0..MAX_ITERATIONS {
        let (sin_eo1, cos_eo1) = eo1.sin_cos();
        let denominator = 1.0 - cos_eo1 * axn - sin_eo1 * ayn;
        delta = clamp_step((u - ayn * cos_eo1 + axn * sin_eo1 - eo1) / denominator);
        eo1 += delta;
        if delta.abs() < TOLERANCE {
            return Ok(eo1);
        }
    }

    Err(ConvergenceError {
        iterations: MAX_ITERATIONS,
        residual: delta.abs(),
    })
}

fn clamp_step(step: f64) -> f64 {
    step.clamp(-MAX_STEP, MAX_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::f64::consts::PI;

    #[rstest]
    #[case(0.0)]
    #[case(1.234)]
    #[case(-2.5)]
    #[case(42.0)]
    fn circular_returns_mean_anomaly(#[case] m: f64) {
        assert_eq!(solve(m, 0.0).unwrap(), m);
        assert_eq!(solve(m, 5e-9).unwrap(), m);
    }

    #[test]
    fn textbook_case() {
        // Vallado example 2-1: M = 235.4 deg, e = 0.4 gives E = 220.512 deg.
        let e_anom = solve(235.4_f64.to_radians(), 0.4).unwrap();
        assert!((e_anom.to_degrees() - 220.512_074).abs() < 1e-5);
    }

    #[test]
    fn equinoctial_matches_classic_at_zero_perigee() {
        // With ω = 0, axn = e and ayn = 0 so the two forms coincide.
        let m = 1.1;
        let e = 0.3;
        let classic = solve(m, e).unwrap();
        let equinoctial = solve_equinoctial(m, e, 0.0).unwrap();
        assert!((classic - equinoctial).abs() < 1e-12);
    }

    #[test]
    fn deterministic() {
        let a = solve(0.731, 0.912).unwrap();
        let b = solve(0.731, 0.912).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    proptest! {
        #[test]
        fn converges_with_small_residual(m in -PI..PI, e in 0.0f64..0.999_999) {
            let e_anom = solve(m, e).unwrap();
            let residual = e_anom - e * e_anom.sin() - m;
            prop_assert!(residual.abs() < 1e-9, "m={m} e={e} residual={residual}");
        }

        #[test]
        fn near_parabolic_small_mean_anomaly(m in -0.1f64..0.1, e in 0.95f64..0.999_999) {
            prop_assert!(solve(m, e).is_ok());
        }

        #[test]
        fn equinoctial_residual(u in -PI..PI, e in 0.0f64..0.95, w in 0.0f64..(2.0 * PI)) {
            let (axn, ayn) = (e * w.cos(), e * w.sin());
            let eo1 = solve_equinoctial(u, axn, ayn).unwrap();
            let residual = eo1 - axn * eo1.sin() + ayn * eo1.cos() - u;
            prop_assert!(residual.abs() < 1e-9);
        }
    }
}
