use thiserror::Error;

use crate::kepler::ConvergenceError;

/// Mean elements that cannot describe a bound Earth orbit.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ElementsError {
    #[error("eccentricity {0} outside [0, 1)")]
    Eccentricity(f64),
    #[error("mean motion {0} rev/day must be positive")]
    MeanMotion(f64),
    #[error("inclination {0} deg outside [0, 180]")]
    Inclination(f64),
    #[error("perigee is {perigee_km:.1} km below the surface")]
    Orbit { perigee_km: f64 },
}

/// A single propagation call failed. The [`OrbitState`](super::OrbitState)
/// that produced it is untouched and other epochs stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PropagationError {
    #[error(transparent)]
    Convergence(#[from] ConvergenceError),
    #[error("resonance integrator exceeded {steps} steps")]
    IntegrationDivergence { steps: u32 },
    #[error("satellite has decayed (radius {radius_er:.4} Earth radii)")]
    Decayed { radius_er: f64 },
    #[error("mean eccentricity {0} out of range")]
    MeanEccentricity(f64),
    #[error("mean motion {0} rad/min is not positive")]
    MeanMotion(f64),
    #[error("semi-latus rectum {0} is negative")]
    SemiLatusRectum(f64),
    #[error("perturbed eccentricity {0} out of range")]
    PerturbedEccentricity(f64),
}
