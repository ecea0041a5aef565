//! Physical constants shared by the propagators and the frame chain.
//!
//! Propagation uses the WGS-72 gravity model that TLEs are fitted against.
//! Geodesy uses WGS-84.

use std::f64::consts::PI;

pub const TWO_PI: f64 = 2.0 * PI;
pub const MINUTES_PER_DAY: f64 = 1440.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

// WGS-72
pub const MU: f64 = 398_600.8;
pub const EARTH_RADIUS_KM: f64 = 6378.135;
pub const J2: f64 = 0.001_082_616;
pub const J3: f64 = -0.000_002_538_81;
pub const J4: f64 = -0.000_001_655_97;
pub const J3_OVER_J2: f64 = J3 / J2;

/// Square root of GM in Earth radii^1.5 per minute.
pub fn xke() -> f64 {
    60.0 / (EARTH_RADIUS_KM * EARTH_RADIUS_KM * EARTH_RADIUS_KM / MU).sqrt()
}

/// Kilometres per second for one Earth radius per minute.
pub fn velocity_unit_km_s() -> f64 {
    EARTH_RADIUS_KM * xke() / 60.0
}

/// Near-Earth/deep-space boundary on the orbital period, inclusive for deep space.
pub const DEEP_SPACE_PERIOD_MIN: f64 = 225.0;

// WGS-84
pub const WGS84_A_KM: f64 = 6378.137;
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115e-5;
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

pub const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Julian date of 1949-12-31 00:00 UT, the SGP-4 internal epoch origin.
pub const JD_1950_ORIGIN: f64 = 2_433_281.5;
pub const JD_J2000: f64 = 2_451_545.0;
pub const MJD_OFFSET: f64 = 2_400_000.5;
