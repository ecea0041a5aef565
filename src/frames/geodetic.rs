use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::constants::{WGS84_A_KM, WGS84_E2, WGS84_F};

/// Fixed-point iterations of the parametric latitude. Five is past double
/// precision for any terrestrial or orbital altitude.
const BOWRING_ITERATIONS: usize = 5;

/// WGS-84 geodetic coordinates. Angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
}

impl Geodetic {
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64, altitude_km: f64) -> Self {
        Self {
            latitude: latitude_deg.to_radians(),
            longitude: longitude_deg.to_radians(),
            altitude_km,
        }
    }
}

pub fn geodetic_to_ecef(g: Geodetic) -> [f64; 3] {
    let (sin_lat, cos_lat) = g.latitude.sin_cos();
    let (sin_lon, cos_lon) = g.longitude.sin_cos();
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    [
        (n + g.altitude_km) * cos_lat * cos_lon,
        (n + g.altitude_km) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + g.altitude_km) * sin_lat,
    ]
}

/// Bowring's method on the WGS-84 ellipsoid with a fixed iteration count.
pub fn ecef_to_geodetic(r: [f64; 3]) -> Geodetic {
    let b = WGS84_A_KM * (1.0 - WGS84_F);
    let p = r[0].hypot(r[1]);
    let longitude = r[1].atan2(r[0]);

    if p < 1e-12 {
        return Geodetic {
            latitude: FRAC_PI_2.copysign(r[2]),
            longitude,
            altitude_km: r[2].abs() - b,
        };
    }

    let ep2 = WGS84_E2 / (1.0 - WGS84_E2);
    let mut beta = r[2].atan2((1.0 - WGS84_F) * p);
    let mut latitude = 0.0;
    for _ in 0..BOWRING_ITERATIONS {
        let (sin_b, cos_b) = beta.sin_cos();
        latitude = (r[2] + ep2 * b * sin_b * sin_b * sin_b)
            .atan2(p - WGS84_E2 * WGS84_A_KM * cos_b * cos_b * cos_b);
        let (sin_lat, cos_lat) = latitude.sin_cos();
        beta = ((1.0 - WGS84_F) * sin_lat).atan2(cos_lat);
    }

    let (sin_lat, cos_lat) = latitude.sin_cos();
    let altitude_km = p * cos_lat + r[2] * sin_lat
        - WGS84_A_KM * (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    Geodetic {
        latitude,
        longitude,
        altitude_km,
    }
}
