use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::propagation::{ElementsError, PropagationError};
use crate::tle::TleError;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Propagation error: {0}")]
    Propagation(#[from] PropagationError),
    #[error("Invalid time window: {start} is after {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Invalid step: {0} s")]
    InvalidStep(f64),
    #[error("Invalid TLE: {0}")]
    Tle(#[from] TleError),
    #[error("Invalid elements: {0}")]
    Elements(#[from] ElementsError),
}
