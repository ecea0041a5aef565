use crate::constants::{JD_J2000, TWO_PI};

/// Greenwich mean sidereal time (IAU-82) in radians, [0, 2π).
///
/// This is the angle SGP-4 output is referenced to; the TEME convention
/// leaves out the equation of the equinoxes.
pub fn gmst(jd_ut1: f64) -> f64 {
    let t = (jd_ut1 - JD_J2000) / 36_525.0;
    let seconds = -6.2e-6 * t * t * t
        + 0.093_104 * t * t
        + (876_600.0 * 3600.0 + 8_640_184.812_866) * t
        + 67_310.548_41;
    let angle = (seconds * (std::f64::consts::PI / 180.0) / 240.0) % TWO_PI;
    if angle < 0.0 {
        angle + TWO_PI
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vallado_example_3_5() {
        // 1992-08-20 12:14 UT1 → 152.578 787 86 deg.
        let jd = crate::time::jday(1992, 8, 20, 12, 14, 0.0);
        assert!((gmst(jd).to_degrees() - 152.578_787_86).abs() < 1e-6);
    }

    #[test]
    fn always_in_range() {
        for i in 0..1000 {
            let angle = gmst(2_400_000.0 + i as f64 * 97.3);
            assert!((0.0..TWO_PI).contains(&angle));
        }
    }
}
