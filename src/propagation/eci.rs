//! Shared tail of both models: drag folded into a and e, long-period terms,
//! Kepler's equation, short-period J2 corrections and the rotation to TEME.

use std::f64::consts::PI;

use crate::constants::{velocity_unit_km_s, xke, EARTH_RADIUS_KM, J2, J3_OVER_J2, TWO_PI};
use crate::kepler;
use crate::propagation::deep_space::{DeepSpaceTerms, PerturbedElements};
use crate::propagation::error::PropagationError;
use crate::propagation::near_earth::{NearEarthTerms, SecularElements};
use crate::propagation::state::{long_period_xlcof, OrbitState};
use crate::propagation::Prediction;

/// Floor applied to the dragged mean eccentricity.
const MIN_ECCENTRICITY: f64 = 1.0e-6;

/// Mean elements after drag, in Earth radii and rad/min.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DraggedElements {
    pub elements: PerturbedElements,
    pub semi_major_axis: f64,
    pub mean_motion: f64,
}

/// Inclination-dependent factors of the long- and short-period terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct InclinationFactors {
    pub sin_i: f64,
    pub cos_i: f64,
    pub aycof: f64,
    pub xlcof: f64,
    pub con41: f64,
    pub x1mth2: f64,
    pub x7thm1: f64,
}

impl InclinationFactors {
    fn from_epoch(terms: &NearEarthTerms, inclination: f64) -> Self {
        let (sin_i, cos_i) = inclination.sin_cos();
        Self {
            sin_i,
            cos_i,
            aycof: terms.aycof,
            xlcof: terms.xlcof,
            con41: terms.con41,
            x1mth2: terms.x1mth2,
            x7thm1: terms.x7thm1,
        }
    }

    /// Recomputed from the perturbed inclination of a deep-space orbit.
    fn from_perturbed(inclination: f64) -> Self {
        let (sin_i, cos_i) = inclination.sin_cos();
        let cosisq = cos_i * cos_i;
        Self {
            sin_i,
            cos_i,
            aycof: -0.5 * J3_OVER_J2 * sin_i,
            xlcof: long_period_xlcof(sin_i, cos_i),
            con41: 3.0 * cosisq - 1.0,
            x1mth2: 1.0 - cosisq,
            x7thm1: 7.0 * cosisq - 1.0,
        }
    }
}

/// Fold the drag polynomials into semi-major axis, eccentricity and mean
/// longitude, then reduce the angles.
pub(crate) fn apply_drag(
    state: &OrbitState,
    mean: SecularElements,
) -> Result<DraggedElements, PropagationError> {
    let xke = xke();
    if mean.mean_motion <= 0.0 {
        return Err(PropagationError::MeanMotion(mean.mean_motion));
    }
    let am = (xke / mean.mean_motion).powf(2.0 / 3.0) * mean.tempa * mean.tempa;
    let nm = xke / am.powf(1.5);
    let mut em = mean.eccentricity - mean.tempe;
    if !(-0.001..1.0).contains(&em) {
        return Err(PropagationError::MeanEccentricity(em));
    }
    if em < MIN_ECCENTRICITY {
        em = MIN_ECCENTRICITY;
    }

    let mm = mean.mean_anomaly + state.mean_motion() * mean.templ;
    let xlm = (mm + mean.arg_perigee + mean.raan) % TWO_PI;
    let raan = mean.raan % TWO_PI;
    let arg_perigee = mean.arg_perigee % TWO_PI;
    let mean_anomaly = (xlm - arg_perigee - raan) % TWO_PI;

    Ok(DraggedElements {
        elements: PerturbedElements {
            eccentricity: em,
            inclination: mean.inclination,
            raan,
            arg_perigee,
            mean_anomaly,
        },
        semi_major_axis: am,
        mean_motion: nm,
    })
}

/// Deep-space long-period corrections. A negative perturbed inclination is
/// reflected through the pole.
pub(crate) fn apply_periodics(
    deep: &DeepSpaceTerms,
    tsince: f64,
    dragged: DraggedElements,
) -> Result<DraggedElements, PropagationError> {
    let mut p = deep.periodic(tsince, dragged.elements);
    if p.inclination < 0.0 {
        p.inclination = -p.inclination;
        p.raan += PI;
        p.arg_perigee -= PI;
    }
    if !(0.0..=1.0).contains(&p.eccentricity) {
        return Err(PropagationError::PerturbedEccentricity(p.eccentricity));
    }
    Ok(DraggedElements {
        elements: p,
        ..dragged
    })
}

/// Solve Kepler's equation, add short-period terms and rotate into TEME.
pub(crate) fn to_teme(
    state: &OrbitState,
    dragged: DraggedElements,
) -> Result<Prediction, PropagationError> {
    let xke = xke();
    let el = dragged.elements;
    let f = if state.deep.is_some() {
        InclinationFactors::from_perturbed(el.inclination)
    } else {
        InclinationFactors::from_epoch(&state.terms, el.inclination)
    };
    let am = dragged.semi_major_axis;
    let nm = dragged.mean_motion;
    let ep = el.eccentricity;

    // Long-period periodics.
    let axnl = ep * el.arg_perigee.cos();
    let temp = 1.0 / (am * (1.0 - ep * ep));
    let aynl = ep * el.arg_perigee.sin() + temp * f.aycof;
    let xl = el.mean_anomaly + el.arg_perigee + el.raan + temp * f.xlcof * axnl;

    let u = (xl - el.raan) % TWO_PI;
    let eo1 = kepler::solve_equinoctial(u, axnl, aynl)?;
    let (sineo1, coseo1) = eo1.sin_cos();

    // Short-period preliminary quantities.
    let ecose = axnl * coseo1 + aynl * sineo1;
    let esine = axnl * sineo1 - aynl * coseo1;
    let el2 = axnl * axnl + aynl * aynl;
    let pl = am * (1.0 - el2);
    if pl < 0.0 {
        return Err(PropagationError::SemiLatusRectum(pl));
    }
    let rl = am * (1.0 - ecose);
    let rdotl = am.sqrt() * esine / rl;
    let rvdotl = pl.sqrt() / rl;
    let betal = (1.0 - el2).sqrt();
    let temp = esine / (1.0 + betal);
    let sinu = am / rl * (sineo1 - aynl - axnl * temp);
    let cosu = am / rl * (coseo1 - axnl + aynl * temp);
    let su = sinu.atan2(cosu);
    let sin2u = (cosu + cosu) * sinu;
    let cos2u = 1.0 - 2.0 * sinu * sinu;
    let temp = 1.0 / pl;
    let temp1 = 0.5 * J2 * temp;
    let temp2 = temp1 * temp;

    // Short-period corrections.
    let mrt = rl * (1.0 - 1.5 * temp2 * betal * f.con41) + 0.5 * temp1 * f.x1mth2 * cos2u;
    let su = su - 0.25 * temp2 * f.x7thm1 * sin2u;
    let xnode = el.raan + 1.5 * temp2 * f.cos_i * sin2u;
    let xinc = el.inclination + 1.5 * temp2 * f.cos_i * f.sin_i * cos2u;
    let mvt = rdotl - nm * temp1 * f.x1mth2 * sin2u / xke;
    let rvdot = rvdotl + nm * temp1 * (f.x1mth2 * cos2u + 1.5 * f.con41) / xke;

    // Orientation vectors.
    let (sinsu, cossu) = su.sin_cos();
    let (snod, cnod) = xnode.sin_cos();
    let (sini, cosi) = xinc.sin_cos();
    let xmx = -snod * cosi;
    let xmy = cnod * cosi;
    let ux = xmx * sinsu + cnod * cossu;
    let uy = xmy * sinsu + snod * cossu;
    let uz = sini * sinsu;
    let vx = xmx * cossu - cnod * sinsu;
    let vy = xmy * cossu - snod * sinsu;
    let vz = sini * cossu;

    if mrt < 1.0 {
        return Err(PropagationError::Decayed { radius_er: mrt });
    }

    let mr = mrt * EARTH_RADIUS_KM;
    let vkmpersec = velocity_unit_km_s();
    Ok(Prediction {
        position: [mr * ux, mr * uy, mr * uz],
        velocity: [
            (mvt * ux + rvdot * vx) * vkmpersec,
            (mvt * uy + rvdot * vy) * vkmpersec,
            (mvt * uz + rvdot * vz) * vkmpersec,
        ],
    })
}
