//! SGP-4 secular gravity and atmospheric drag.

use crate::propagation::state::OrbitState;

/// Coefficients precomputed at initialization from J2/J4, eccentricity,
/// inclination and BSTAR. Names follow Spacetrack Report #3.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct NearEarthTerms {
    /// Perigee below 220 km: drop the higher-order drag terms.
    pub simplified: bool,
    pub aycof: f64,
    pub con41: f64,
    pub cc1: f64,
    pub cc4: f64,
    pub cc5: f64,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub delmo: f64,
    pub eta: f64,
    pub omgcof: f64,
    pub sinmao: f64,
    pub t2cof: f64,
    pub t3cof: f64,
    pub t4cof: f64,
    pub t5cof: f64,
    pub x1mth2: f64,
    pub x7thm1: f64,
    pub xlcof: f64,
    pub xmcof: f64,
    pub nodecf: f64,
    /// Secular rates of mean anomaly, argument of perigee and RAAN (rad/min).
    pub mdot: f64,
    pub argpdot: f64,
    pub nodedot: f64,
}

/// Mean elements after the secular update, before drag is folded into the
/// semi-major axis and eccentricity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SecularElements {
    pub mean_anomaly: f64,
    pub arg_perigee: f64,
    pub raan: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub mean_motion: f64,
    /// Drag factor on the semi-major axis, squared when applied.
    pub tempa: f64,
    /// Drag decrement of eccentricity.
    pub tempe: f64,
    /// Drag increment of mean longitude, in units of mean motion.
    pub templ: f64,
}

/// Advance M, ω and Ω linearly in `tsince` and evaluate the drag polynomials.
pub(crate) fn secular(state: &OrbitState, tsince: f64) -> SecularElements {
    let k = &state.terms;
    let el = state.elements();

    let xmdf = el.mean_anomaly + k.mdot * tsince;
    let argpdf = el.arg_perigee + k.argpdot * tsince;
    let nodedf = el.raan + k.nodedot * tsince;
    let t2 = tsince * tsince;

    let mut mean_anomaly = xmdf;
    let mut arg_perigee = argpdf;
    let raan = nodedf + k.nodecf * t2;
    let mut tempa = 1.0 - k.cc1 * tsince;
    let mut tempe = el.bstar * k.cc4 * tsince;
    let mut templ = k.t2cof * t2;

    if !k.simplified {
        let delomg = k.omgcof * tsince;
        let delmtemp = 1.0 + k.eta * xmdf.cos();
        let delm = k.xmcof * (delmtemp * delmtemp * delmtemp - k.delmo);
        let temp = delomg + delm;
        mean_anomaly = xmdf + temp;
        arg_perigee = argpdf - temp;
        let t3 = t2 * tsince;
        let t4 = t3 * tsince;
        tempa = tempa - k.d2 * t2 - k.d3 * t3 - k.d4 * t4;
        tempe += el.bstar * k.cc5 * (mean_anomaly.sin() - k.sinmao);
        templ = templ + k.t3cof * t3 + t4 * (k.t4cof + tsince * k.t5cof);
    }

    SecularElements {
        mean_anomaly,
        arg_perigee,
        raan,
        eccentricity: el.eccentricity,
        inclination: el.inclination,
        mean_motion: state.mean_motion(),
        tempa,
        tempe,
        templ,
    }
}
