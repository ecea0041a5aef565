use chrono::{DateTime, Utc};
use serde::Serialize;

/// Rise, culmination and set of one pass. Elevation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PassEvent {
    pub aos: DateTime<Utc>,
    pub tca: DateTime<Utc>,
    pub los: DateTime<Utc>,
    pub max_elevation: f64,
}

/// A predicted pass with the extra geometry a pass list shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pass {
    pub catalog_number: u32,
    #[serde(flatten)]
    pub event: PassEvent,
    pub max_elevation_deg: f64,
    pub aos_azimuth_deg: f64,
    pub los_azimuth_deg: f64,
    pub duration_seconds: i64,
}

/// One point of a sampled ground track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSample {
    pub timestamp: DateTime<Utc>,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
    pub range_rate_km_s: f64,
}
