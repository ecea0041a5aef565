//! SGP-4/SDP-4 propagation of TLE mean elements to TEME state vectors.

mod deep_space;
mod eci;
mod error;
mod near_earth;
mod state;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use deep_space::{ResonanceClass, MAX_RESONANCE_STEPS};
pub use error::{ElementsError, PropagationError};
pub use state::{MeanElements, OrbitState, Regime};

use crate::time::minutes_since;

/// TEME position (km) and velocity (km/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

/// Propagate `tsince` minutes from the element epoch (negative goes back).
pub fn propagate(state: &OrbitState, tsince: f64) -> Result<Prediction, PropagationError> {
    let mut mean = near_earth::secular(state, tsince);
    if let Some(deep) = &state.deep {
        mean = deep.secular(
            tsince,
            state.mean_motion(),
            state.elements().arg_perigee,
            state.terms.argpdot,
            mean,
        )?;
    }

    let mut dragged = eci::apply_drag(state, mean)?;
    if let Some(deep) = &state.deep {
        dragged = eci::apply_periodics(deep, tsince, dragged)?;
    }

    eci::to_teme(state, dragged)
}

/// Propagate to each offset independently. A failure at one offset does not
/// affect the others.
pub fn propagate_many(
    state: &OrbitState,
    tsince: &[f64],
) -> Vec<Result<Prediction, PropagationError>> {
    tsince.iter().map(|&t| propagate(state, t)).collect()
}

impl OrbitState {
    pub fn propagate(&self, tsince: f64) -> Result<Prediction, PropagationError> {
        propagate(self, tsince)
    }

    pub fn propagate_at(&self, t: DateTime<Utc>) -> Result<Prediction, PropagationError> {
        propagate(self, self.minutes_since_epoch(t))
    }

    pub fn minutes_since_epoch(&self, t: DateTime<Utc>) -> f64 {
        minutes_since(self.epoch_jd(), t)
    }
}
