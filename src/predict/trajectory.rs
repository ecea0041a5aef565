use chrono::{DateTime, Duration, Utc};

use crate::environment::EopTable;
use crate::frames::{refraction, teme_to_itrf, topocentric, Atmosphere, LookAngles};
use crate::predict::error::PredictError;
use crate::predict::types::TrackSample;
use crate::predict::GroundStation;
use crate::propagation::{OrbitState, PropagationError};
use crate::time::datetime_to_julian;

/// How look angles are derived from a propagated state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleOptions<'a> {
    /// Polar motion and UT1 source; `None` uses UTC and no polar motion.
    pub eop: Option<&'a EopTable>,
    /// Add atmospheric refraction to the elevation.
    pub refraction: Option<Atmosphere>,
}

/// Look angles from `station` to the satellite at `t`.
pub fn look(
    state: &OrbitState,
    station: &GroundStation,
    t: DateTime<Utc>,
    options: &SampleOptions,
) -> Result<LookAngles, PropagationError> {
    let prediction = state.propagate_at(t)?;
    let itrf = teme_to_itrf(
        prediction.position,
        prediction.velocity,
        datetime_to_julian(t),
        options.eop,
    );
    let mut angles = topocentric(&itrf, station);
    if let Some(atmosphere) = &options.refraction {
        angles.elevation += refraction(angles.elevation, atmosphere);
    }
    Ok(angles)
}

pub fn sample(
    state: &OrbitState,
    station: &GroundStation,
    t: DateTime<Utc>,
    options: &SampleOptions,
) -> Result<TrackSample, PropagationError> {
    let angles = look(state, station, t, options)?;
    Ok(TrackSample {
        timestamp: t,
        azimuth_deg: angles.azimuth.to_degrees(),
        elevation_deg: angles.elevation.to_degrees(),
        range_km: angles.range_km,
        range_rate_km_s: angles.range_rate_km_s,
    })
}

/// Sample `[start, end]` every `step`. The last sample falls on `end`.
pub fn build_trajectory(
    state: &OrbitState,
    station: &GroundStation,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
    options: &SampleOptions,
) -> Result<Vec<TrackSample>, PredictError> {
    if end < start {
        return Err(PredictError::InvalidWindow { start, end });
    }
    if step <= Duration::zero() {
        return Err(PredictError::InvalidStep(step.num_milliseconds() as f64 / 1000.0));
    }

    let mut cursor = start;
    let mut points = Vec::new();
    loop {
        points.push(sample(state, station, cursor, options)?);
        if cursor >= end {
            break;
        }
        cursor = cursor.checked_add_signed(step).map_or(end, |c| c.min(end));
    }
    Ok(points)
}
