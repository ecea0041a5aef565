use std::f64::consts::PI;

use super::solar_lunar::{SolarLunar, ZEL, ZES, ZNL, ZNS};
use crate::constants::TWO_PI;

/// Below this inclination the node and perigee corrections switch to the
/// Lyddane form, which avoids dividing by `sin(i)`.
const LYDDANE_INCLINATION: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PerturbedElements {
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub arg_perigee: f64,
    pub mean_anomaly: f64,
}

/// Add the long-period solar and lunar terms at `tsince` minutes.
pub(crate) fn apply(
    coefficients: &SolarLunar,
    tsince: f64,
    elements: PerturbedElements,
) -> PerturbedElements {
    let c = coefficients;

    let (f2, f3, sinzf) = phase(c.zmos + ZNS * tsince, ZES);
    let ses = c.se2 * f2 + c.se3 * f3;
    let sis = c.si2 * f2 + c.si3 * f3;
    let sls = c.sl2 * f2 + c.sl3 * f3 + c.sl4 * sinzf;
    let sghs = c.sgh2 * f2 + c.sgh3 * f3 + c.sgh4 * sinzf;
    let shs = c.sh2 * f2 + c.sh3 * f3;

    let (f2, f3, sinzf) = phase(c.zmol + ZNL * tsince, ZEL);
    let sel = c.ee2 * f2 + c.e3 * f3;
    let sil = c.xi2 * f2 + c.xi3 * f3;
    let sll = c.xl2 * f2 + c.xl3 * f3 + c.xl4 * sinzf;
    let sghl = c.xgh2 * f2 + c.xgh3 * f3 + c.xgh4 * sinzf;
    let shll = c.xh2 * f2 + c.xh3 * f3;

    let pe = ses + sel;
    let pinc = sis + sil;
    let pl = sls + sll;
    let mut pgh = sghs + sghl;
    let mut ph = shs + shll;

    let inclination = elements.inclination + pinc;
    let eccentricity = elements.eccentricity + pe;
    let (sinip, cosip) = inclination.sin_cos();

    if inclination >= LYDDANE_INCLINATION {
        ph /= sinip;
        pgh -= cosip * ph;
        return PerturbedElements {
            eccentricity,
            inclination,
            raan: elements.raan + ph,
            arg_perigee: elements.arg_perigee + pgh,
            mean_anomaly: elements.mean_anomaly + pl,
        };
    }

    let (sinop, cosop) = elements.raan.sin_cos();
    let alfdp = sinip * sinop + (ph * cosop + pinc * cosip * sinop);
    let betdp = sinip * cosop + (-ph * sinop + pinc * cosip * cosop);
    let node = elements.raan % TWO_PI;
    let xls = elements.mean_anomaly
        + elements.arg_perigee
        + pl
        + pgh
        + (cosip - pinc * sinip) * node;
    let mut raan = alfdp.atan2(betdp);
    // Keep the recovered node on the same revolution as the input.
    if (node - raan).abs() > PI {
        if raan < node {
            raan += TWO_PI;
        } else {
            raan -= TWO_PI;
        }
    }
    let mean_anomaly = elements.mean_anomaly + pl;

    PerturbedElements {
        eccentricity,
        inclination,
        raan,
        arg_perigee: xls - mean_anomaly - cosip * raan,
        mean_anomaly,
    }
}

fn phase(zm: f64, ze: f64) -> (f64, f64, f64) {
    let zf = zm + 2.0 * ze * zm.sin();
    let (sinzf, coszf) = zf.sin_cos();
    (0.5 * sinzf * sinzf - 0.25, -0.5 * sinzf * coszf, sinzf)
}
