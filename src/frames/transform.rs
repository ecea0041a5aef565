use serde::Serialize;

use crate::constants::{ARCSEC_TO_RAD, EARTH_ROTATION_RAD_S, SECONDS_PER_DAY};
use crate::environment::EopTable;
use crate::frames::sidereal::gmst;
use crate::time::julian_to_mjd;

/// Position (km) and velocity (km/s) in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateVector {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

/// Rotate TEME into the pseudo-Earth-fixed frame. The velocity loses the
/// `ω × r` term of Earth's rotation.
pub fn teme_to_pef(r: [f64; 3], v: [f64; 3], jd_ut1: f64) -> StateVector {
    let (sin_g, cos_g) = gmst(jd_ut1).sin_cos();
    let position = [
        cos_g * r[0] + sin_g * r[1],
        -sin_g * r[0] + cos_g * r[1],
        r[2],
    ];
    let velocity = [
        cos_g * v[0] + sin_g * v[1] + EARTH_ROTATION_RAD_S * position[1],
        -sin_g * v[0] + cos_g * v[1] - EARTH_ROTATION_RAD_S * position[0],
        v[2],
    ];
    StateVector { position, velocity }
}

/// Apply polar motion (IERS pole offsets in arcseconds) to reach ITRF.
pub fn pef_to_itrf(pef: StateVector, xp_arcsec: f64, yp_arcsec: f64) -> StateVector {
    let (sin_xp, cos_xp) = (xp_arcsec * ARCSEC_TO_RAD).sin_cos();
    let (sin_yp, cos_yp) = (yp_arcsec * ARCSEC_TO_RAD).sin_cos();
    // r_pef = W · r_itrf, so r_itrf = Wᵀ · r_pef.
    let w = [
        [cos_xp, 0.0, -sin_xp],
        [sin_xp * sin_yp, cos_yp, cos_xp * sin_yp],
        [sin_xp * cos_yp, -sin_yp, cos_xp * cos_yp],
    ];
    let transpose_mul = |a: [f64; 3]| {
        [
            w[0][0] * a[0] + w[1][0] * a[1] + w[2][0] * a[2],
            w[0][1] * a[0] + w[1][1] * a[1] + w[2][1] * a[2],
            w[0][2] * a[0] + w[1][2] * a[1] + w[2][2] * a[2],
        ]
    };
    StateVector {
        position: transpose_mul(pef.position),
        velocity: transpose_mul(pef.velocity),
    }
}

/// Full TEME → ITRF chain at a UTC instant. Without an EOP record for the
/// day, UT1 = UTC and polar motion is the identity.
pub fn teme_to_itrf(r: [f64; 3], v: [f64; 3], jd_utc: f64, eop: Option<&EopTable>) -> StateVector {
    let record = eop.and_then(|table| table.get(julian_to_mjd(jd_utc)));
    match record {
        Some(rec) => {
            let jd_ut1 = jd_utc + rec.ut1_utc / SECONDS_PER_DAY;
            pef_to_itrf(teme_to_pef(r, v, jd_ut1), rec.xp_arcsec, rec.yp_arcsec)
        }
        None => teme_to_pef(r, v, jd_utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EopRecord;

    fn norm(a: [f64; 3]) -> f64 {
        (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt()
    }

    #[test]
    fn earth_fixed_point_has_no_pef_velocity() {
        let jd = 2_458_878.0;
        let g = gmst(jd);
        let r_pef = [7000.0, 1200.0, 300.0];
        let r_teme = [
            g.cos() * r_pef[0] - g.sin() * r_pef[1],
            g.sin() * r_pef[0] + g.cos() * r_pef[1],
            r_pef[2],
        ];
        let v_teme = [
            -EARTH_ROTATION_RAD_S * r_teme[1],
            EARTH_ROTATION_RAD_S * r_teme[0],
            0.0,
        ];
        let pef = teme_to_pef(r_teme, v_teme, jd);
        for i in 0..3 {
            assert!((pef.position[i] - r_pef[i]).abs() < 1e-9);
            assert!(pef.velocity[i].abs() < 1e-12);
        }
    }

    #[test]
    fn zero_polar_motion_is_identity() {
        let pef = StateVector {
            position: [1.0, 2.0, 3.0],
            velocity: [4.0, 5.0, 6.0],
        };
        assert_eq!(pef_to_itrf(pef, 0.0, 0.0), pef);
    }

    #[test]
    fn polar_motion_is_small_rotation() {
        let pef = StateVector {
            position: [0.0, 0.0, 6400.0],
            velocity: [0.0, 0.0, 0.0],
        };
        let itrf = pef_to_itrf(pef, 0.2, 0.3);
        assert!((norm(itrf.position) - 6400.0).abs() < 1e-9);
        // The pole moves by xp along +x and yp along -y.
        let xp = 0.2 * ARCSEC_TO_RAD * 6400.0;
        let yp = 0.3 * ARCSEC_TO_RAD * 6400.0;
        assert!((itrf.position[0] - xp).abs() < 1e-9);
        assert!((itrf.position[1] + yp).abs() < 1e-9);
    }

    #[test]
    fn missing_eop_falls_back_to_pef() {
        let r = [7000.0, 0.0, 0.0];
        let v = [0.0, 7.5, 0.0];
        let jd = 2_458_878.25;
        let table = EopTable::default();
        assert_eq!(teme_to_itrf(r, v, jd, Some(&table)), teme_to_pef(r, v, jd));
        assert_eq!(teme_to_itrf(r, v, jd, None), teme_to_pef(r, v, jd));
    }

    #[test]
    fn eop_shifts_sidereal_angle() {
        let r = [7000.0, 0.0, 0.0];
        let v = [0.0, 7.5, 0.0];
        let jd = 2_458_878.25;
        let table = EopTable::from_records([EopRecord {
            mjd: 58_877,
            xp_arcsec: 0.0,
            yp_arcsec: 0.0,
            ut1_utc: -0.2,
        }]);
        let with = teme_to_itrf(r, v, jd, Some(&table));
        let expected = teme_to_pef(r, v, jd - 0.2 / SECONDS_PER_DAY);
        for i in 0..3 {
            assert!((with.position[i] - expected.position[i]).abs() < 1e-9);
        }
    }
}
