use serde::Serialize;

use crate::frames::{enu_with, geodetic_to_ecef, Geodetic};

/// An observer on the WGS-84 ellipsoid. The Earth-fixed position and the
/// latitude/longitude trig terms are computed once at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundStation {
    pub name: String,
    location: Geodetic,
    #[serde(skip)]
    ecef_km: [f64; 3],
    #[serde(skip)]
    trig: [f64; 4],
}

impl GroundStation {
    pub fn new(name: impl Into<String>, location: Geodetic) -> Self {
        let (sin_lat, cos_lat) = location.latitude.sin_cos();
        let (sin_lon, cos_lon) = location.longitude.sin_cos();
        Self {
            name: name.into(),
            location,
            ecef_km: geodetic_to_ecef(location),
            trig: [sin_lat, cos_lat, sin_lon, cos_lon],
        }
    }

    /// Parse `"lat,lon"` in degrees, the way station blocks are written in
    /// configuration files.
    pub fn from_coordinates(
        name: impl Into<String>,
        coordinates: &str,
        altitude_m: Option<f64>,
    ) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        let [lat, lon] = parts[..] else {
            return None;
        };
        let lat: f64 = lat.parse().ok()?;
        let lon: f64 = lon.parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=360.0).contains(&lon) {
            return None;
        }
        let alt_km = altitude_m.unwrap_or(0.0) / 1000.0;
        Some(Self::new(name, Geodetic::from_degrees(lat, lon, alt_km)))
    }

    pub fn location(&self) -> Geodetic {
        self.location
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        self.ecef_km
    }

    /// Rotate an Earth-fixed offset into local east/north/up.
    pub fn to_enu(&self, dr: [f64; 3]) -> [f64; 3] {
        let [sin_lat, cos_lat, sin_lon, cos_lon] = self.trig;
        enu_with(dr, sin_lat, cos_lat, sin_lon, cos_lon)
    }

    /// Inverse of [`to_enu`](Self::to_enu).
    pub fn to_ecef_direction(&self, enu: [f64; 3]) -> [f64; 3] {
        let [sin_lat, cos_lat, sin_lon, cos_lon] = self.trig;
        let [e, n, u] = enu;
        [
            -sin_lon * e - sin_lat * cos_lon * n + cos_lat * cos_lon * u,
            cos_lon * e - sin_lat * sin_lon * n + cos_lat * sin_lon * u,
            cos_lat * n + sin_lat * u,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::ecef_to_enu;

    #[test]
    fn parses_coordinates() {
        let gs = GroundStation::from_coordinates("home", "48.1351, 11.5820", Some(520.0)).unwrap();
        let loc = gs.location();
        assert!((loc.latitude.to_degrees() - 48.1351).abs() < 1e-12);
        assert!((loc.longitude.to_degrees() - 11.5820).abs() < 1e-12);
        assert!((loc.altitude_km - 0.52).abs() < 1e-12);

        assert!(GroundStation::from_coordinates("x", "48.1", None).is_none());
        assert!(GroundStation::from_coordinates("x", "a,b", None).is_none());
        assert!(
            GroundStation::from_coordinates("x", "95.0,10.0", None).is_none()
        );
    }

    #[test]
    fn cached_rotation_matches_free_function() {
        let gs = GroundStation::new("x", Geodetic::from_degrees(-33.9, 151.2, 0.05));
        let dr = [120.0, -340.0, 560.0];
        let loc = gs.location();
        let cached = gs.to_enu(dr);
        let direct = ecef_to_enu(dr, loc.latitude, loc.longitude);
        assert_eq!(cached, direct);

        let back = gs.to_ecef_direction(cached);
        for i in 0..3 {
            assert!((back[i] - dr[i]).abs() < 1e-9);
        }
    }
}
