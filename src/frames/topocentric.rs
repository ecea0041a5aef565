use serde::{Deserialize, Serialize};

use crate::constants::{SPEED_OF_LIGHT_KM_S, TWO_PI};
use crate::frames::StateVector;
use crate::predict::GroundStation;

/// Below this geometric elevation (rad) no refraction correction is applied.
const REFRACTION_FLOOR_RAD: f64 = -0.01;

/// Azimuth (from north through east) and elevation in radians, range in km,
/// range rate in km/s (positive when receding).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LookAngles {
    pub azimuth: f64,
    pub elevation: f64,
    pub range_km: f64,
    pub range_rate_km_s: f64,
}

/// Surface conditions for the refraction model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    pub pressure_mbar: f64,
    pub temperature_c: f64,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            pressure_mbar: 1010.0,
            temperature_c: 10.0,
        }
    }
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> [f64; 3] {
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();
    enu_with(dr, sin_lat, cos_lat, sin_lon, cos_lon)
}

pub(crate) fn enu_with(
    dr: [f64; 3],
    sin_lat: f64,
    cos_lat: f64,
    sin_lon: f64,
    cos_lon: f64,
) -> [f64; 3] {
    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    [east, north, up]
}

/// Look angles from `station` to a satellite state in the Earth-fixed frame.
pub fn topocentric(sat: &StateVector, station: &GroundStation) -> LookAngles {
    let site = station.position_ecef_km();
    let dr = [
        sat.position[0] - site[0],
        sat.position[1] - site[1],
        sat.position[2] - site[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();
    let [east, north, up] = station.to_enu(dr);

    let azimuth = east.atan2(north).rem_euclid(TWO_PI);
    let (elevation, range_rate_km_s) = if range_km > 0.0 {
        let v = sat.velocity;
        (
            (up / range_km).clamp(-1.0, 1.0).asin(),
            (v[0] * dr[0] + v[1] * dr[1] + v[2] * dr[2]) / range_km,
        )
    } else {
        (0.0, 0.0)
    };

    LookAngles {
        azimuth,
        elevation,
        range_km,
        range_rate_km_s,
    }
}

/// Bennett's refraction correction in radians, to be added to the geometric
/// elevation.
pub fn refraction(elevation: f64, atmosphere: &Atmosphere) -> f64 {
    if elevation < REFRACTION_FLOOR_RAD {
        return 0.0;
    }
    let h = elevation.to_degrees();
    let arcmin = 1.02 / (h + 10.3 / (h + 5.11)).to_radians().tan()
        * (atmosphere.pressure_mbar / 1010.0)
        * (283.0 / (273.0 + atmosphere.temperature_c));
    (arcmin / 60.0).to_radians()
}

/// First-order Doppler shift in Hz for a carrier `f0_hz`.
pub fn doppler(range_rate_km_s: f64, f0_hz: f64) -> f64 {
    -f0_hz * range_rate_km_s / SPEED_OF_LIGHT_KM_S
}

/// Frequency heard on the ground for a spacecraft transmitting at `f0_hz`.
pub fn downlink_frequency(f0_hz: f64, range_rate_km_s: f64) -> f64 {
    f0_hz + doppler(range_rate_km_s, f0_hz)
}

/// Frequency to transmit so the spacecraft receives `f0_hz`.
pub fn uplink_frequency(f0_hz: f64, range_rate_km_s: f64) -> f64 {
    f0_hz - doppler(range_rate_km_s, f0_hz)
}
