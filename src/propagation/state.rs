use serde::Serialize;

use crate::constants::{
    xke, DEEP_SPACE_PERIOD_MIN, EARTH_RADIUS_KM, J2, J3_OVER_J2, J4, JD_1950_ORIGIN,
    MINUTES_PER_DAY, TWO_PI,
};
use crate::frames::gmst;
use crate::propagation::deep_space::{DeepSpaceEpoch, DeepSpaceTerms, ResonanceClass};
use crate::propagation::error::ElementsError;
use crate::propagation::near_earth::NearEarthTerms;
use crate::tle::TleRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum Regime {
    NearEarth,
    DeepSpace,
}

impl Regime {
    /// Deep space when the period `2π / n` is at least 225 minutes.
    /// `mean_motion` is the Brouwer mean motion in rad/min.
    pub fn from_mean_motion(mean_motion: f64) -> Self {
        Self::from_period_minutes(TWO_PI / mean_motion)
    }

    pub fn from_period_minutes(period: f64) -> Self {
        if period >= DEEP_SPACE_PERIOD_MIN {
            Regime::DeepSpace
        } else {
            Regime::NearEarth
        }
    }
}

/// Epoch mean elements in propagation units: radians and rad/min.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanElements {
    pub catalog_number: u32,
    pub epoch_jd: f64,
    pub bstar: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub arg_perigee: f64,
    pub mean_anomaly: f64,
    /// Kozai mean motion as printed in the TLE, rad/min.
    pub mean_motion: f64,
}

impl MeanElements {
    pub fn from_tle(tle: &TleRecord) -> Self {
        Self {
            catalog_number: tle.catalog_number,
            epoch_jd: tle.epoch_jd,
            bstar: tle.bstar,
            eccentricity: tle.eccentricity,
            inclination: tle.inclination_deg.to_radians(),
            raan: tle.raan_deg.to_radians().rem_euclid(TWO_PI),
            arg_perigee: tle.arg_perigee_deg.to_radians().rem_euclid(TWO_PI),
            mean_anomaly: tle.mean_anomaly_deg.to_radians().rem_euclid(TWO_PI),
            mean_motion: tle.mean_motion_rev_day * TWO_PI / MINUTES_PER_DAY,
        }
    }
}

/// Fully initialized propagation input. Built once, then only read: every
/// propagation call is a pure function of this state and `tsince`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitState {
    elements: MeanElements,
    /// Brouwer (un-Kozai'd) mean motion, rad/min.
    mean_motion: f64,
    /// Earth radii.
    semi_major_axis: f64,
    gsto: f64,
    regime: Regime,
    pub(crate) terms: NearEarthTerms,
    pub(crate) deep: Option<DeepSpaceTerms>,
}

impl OrbitState {
    pub fn from_tle(tle: &TleRecord) -> Result<Self, ElementsError> {
        Self::new(MeanElements::from_tle(tle))
    }

    pub fn new(elements: MeanElements) -> Result<Self, ElementsError> {
        validate(&elements)?;
        initialize(elements)
    }

    /// Same orbit with a different drag term, e.g. after space-weather scaling.
    pub fn with_bstar(&self, bstar: f64) -> Result<Self, ElementsError> {
        Self::new(MeanElements {
            bstar,
            ..self.elements
        })
    }

    pub fn elements(&self) -> &MeanElements {
        &self.elements
    }

    pub fn catalog_number(&self) -> u32 {
        self.elements.catalog_number
    }

    pub fn epoch_jd(&self) -> f64 {
        self.elements.epoch_jd
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn resonance_class(&self) -> ResonanceClass {
        self.deep
            .as_ref()
            .map(|d| d.resonance_class())
            .unwrap_or(ResonanceClass::NonResonant)
    }

    /// Brouwer mean motion, rad/min.
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    pub fn semi_major_axis_km(&self) -> f64 {
        self.semi_major_axis * EARTH_RADIUS_KM
    }

    pub fn period_minutes(&self) -> f64 {
        TWO_PI / self.mean_motion
    }

    pub fn perigee_altitude_km(&self) -> f64 {
        (self.semi_major_axis * (1.0 - self.elements.eccentricity) - 1.0) * EARTH_RADIUS_KM
    }

    pub fn apogee_altitude_km(&self) -> f64 {
        (self.semi_major_axis * (1.0 + self.elements.eccentricity) - 1.0) * EARTH_RADIUS_KM
    }

    /// Greenwich sidereal angle at epoch, radians.
    pub fn gsto(&self) -> f64 {
        self.gsto
    }
}

fn validate(el: &MeanElements) -> Result<(), ElementsError> {
    if !(0.0..1.0).contains(&el.eccentricity) {
        return Err(ElementsError::Eccentricity(el.eccentricity));
    }
    if !(el.mean_motion > 0.0 && el.mean_motion.is_finite()) {
        return Err(ElementsError::MeanMotion(
            el.mean_motion * MINUTES_PER_DAY / TWO_PI,
        ));
    }
    if !(0.0..=std::f64::consts::PI).contains(&el.inclination) {
        return Err(ElementsError::Inclination(el.inclination.to_degrees()));
    }
    Ok(())
}

/// Brouwer mean motion recovery, secular rates and drag coefficients.
fn initialize(el: MeanElements) -> Result<OrbitState, ElementsError> {
    let xke = xke();
    let x2o3 = 2.0 / 3.0;
    let ss = 78.0 / EARTH_RADIUS_KM + 1.0;
    let qzms2t = ((120.0 - 78.0) / EARTH_RADIUS_KM).powi(4);

    let ecco = el.eccentricity;
    let inclo = el.inclination;
    let eccsq = ecco * ecco;
    let omeosq = 1.0 - eccsq;
    let rteosq = omeosq.sqrt();
    let (sinio, cosio) = inclo.sin_cos();
    let cosio2 = cosio * cosio;

    // Kozai to Brouwer mean motion.
    let ak = (xke / el.mean_motion).powf(x2o3);
    let d1 = 0.75 * J2 * (3.0 * cosio2 - 1.0) / (rteosq * omeosq);
    let mut del = d1 / (ak * ak);
    let adel = ak * (1.0 - del * del - del * (1.0 / 3.0 + 134.0 * del * del / 81.0));
    del = d1 / (adel * adel);
    let no_unkozai = el.mean_motion / (1.0 + del);

    let ao = (xke / no_unkozai).powf(x2o3);
    let po = ao * omeosq;
    let con42 = 1.0 - 5.0 * cosio2;
    let con41 = -con42 - cosio2 - cosio2;
    let posq = po * po;
    let rp = ao * (1.0 - ecco);
    if rp < 1.0 {
        return Err(ElementsError::Orbit {
            perigee_km: (1.0 - rp) * EARTH_RADIUS_KM,
        });
    }

    let epoch = el.epoch_jd - JD_1950_ORIGIN;
    let gsto = gmst(epoch + JD_1950_ORIGIN);
    let regime = Regime::from_mean_motion(no_unkozai);

    let mut k = NearEarthTerms {
        simplified: rp < 220.0 / EARTH_RADIUS_KM + 1.0 || regime == Regime::DeepSpace,
        con41,
        ..NearEarthTerms::default()
    };

    // Atmospheric density parameter, lowered for perigees under 156 km.
    let mut sfour = ss;
    let mut qzms24 = qzms2t;
    let perige = (rp - 1.0) * EARTH_RADIUS_KM;
    if perige < 156.0 {
        sfour = if perige < 98.0 { 20.0 } else { perige - 78.0 };
        qzms24 = ((120.0 - sfour) / EARTH_RADIUS_KM).powi(4);
        sfour = sfour / EARTH_RADIUS_KM + 1.0;
    }

    let pinvsq = 1.0 / posq;
    let tsi = 1.0 / (ao - sfour);
    k.eta = ao * ecco * tsi;
    let etasq = k.eta * k.eta;
    let eeta = ecco * k.eta;
    let psisq = (1.0 - etasq).abs();
    let coef = qzms24 * tsi.powi(4);
    let coef1 = coef / psisq.powf(3.5);
    let cc2 = coef1
        * no_unkozai
        * (ao * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
            + 0.375 * J2 * tsi / psisq * con41 * (8.0 + 3.0 * etasq * (8.0 + etasq)));
    k.cc1 = el.bstar * cc2;
    let cc3 = if ecco > 1.0e-4 {
        -2.0 * coef * tsi * J3_OVER_J2 * no_unkozai * sinio / ecco
    } else {
        0.0
    };
    k.x1mth2 = 1.0 - cosio2;
    k.cc4 = 2.0
        * no_unkozai
        * coef1
        * ao
        * omeosq
        * (k.eta * (2.0 + 0.5 * etasq) + ecco * (0.5 + 2.0 * etasq)
            - J2 * tsi / (ao * psisq)
                * (-3.0 * con41 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                    + 0.75
                        * k.x1mth2
                        * (2.0 * etasq - eeta * (1.0 + etasq))
                        * (2.0 * el.arg_perigee).cos()));
    k.cc5 = 2.0 * coef1 * ao * omeosq * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq);

    let cosio4 = cosio2 * cosio2;
    let temp1 = 1.5 * J2 * pinvsq * no_unkozai;
    let temp2 = 0.5 * temp1 * J2 * pinvsq;
    let temp3 = -0.46875 * J4 * pinvsq * pinvsq * no_unkozai;
    k.mdot = no_unkozai
        + 0.5 * temp1 * rteosq * con41
        + 0.0625 * temp2 * rteosq * (13.0 - 78.0 * cosio2 + 137.0 * cosio4);
    k.argpdot = -0.5 * temp1 * con42
        + 0.0625 * temp2 * (7.0 - 114.0 * cosio2 + 395.0 * cosio4)
        + temp3 * (3.0 - 36.0 * cosio2 + 49.0 * cosio4);
    let xhdot1 = -temp1 * cosio;
    k.nodedot = xhdot1
        + (0.5 * temp2 * (4.0 - 19.0 * cosio2) + 2.0 * temp3 * (3.0 - 7.0 * cosio2)) * cosio;

    k.omgcof = el.bstar * cc3 * el.arg_perigee.cos();
    k.xmcof = if ecco > 1.0e-4 {
        -x2o3 * coef * el.bstar / eeta
    } else {
        0.0
    };
    k.nodecf = 3.5 * omeosq * xhdot1 * k.cc1;
    k.t2cof = 1.5 * k.cc1;
    k.xlcof = long_period_xlcof(sinio, cosio);
    k.aycof = -0.5 * J3_OVER_J2 * sinio;
    let delmo_base = 1.0 + k.eta * el.mean_anomaly.cos();
    k.delmo = delmo_base * delmo_base * delmo_base;
    k.sinmao = el.mean_anomaly.sin();
    k.x7thm1 = 7.0 * cosio2 - 1.0;

    let deep = match regime {
        Regime::NearEarth => None,
        Regime::DeepSpace => Some(DeepSpaceTerms::new(&DeepSpaceEpoch {
            epoch,
            gsto,
            eccentricity: ecco,
            inclination: inclo,
            raan: el.raan,
            arg_perigee: el.arg_perigee,
            mean_anomaly: el.mean_anomaly,
            mean_motion: no_unkozai,
            mdot: k.mdot,
            argpdot: k.argpdot,
            nodedot: k.nodedot,
            xke,
        })),
    };

    if !k.simplified {
        let cc1sq = k.cc1 * k.cc1;
        k.d2 = 4.0 * ao * tsi * cc1sq;
        let temp = k.d2 * tsi * k.cc1 / 3.0;
        k.d3 = (17.0 * ao + sfour) * temp;
        k.d4 = 0.5 * temp * ao * tsi * (221.0 * ao + 31.0 * sfour) * k.cc1;
        k.t3cof = k.d2 + 2.0 * cc1sq;
        k.t4cof = 0.25 * (3.0 * k.d3 + k.cc1 * (12.0 * k.d2 + 10.0 * cc1sq));
        k.t5cof = 0.2
            * (3.0 * k.d4
                + 12.0 * k.cc1 * k.d3
                + 6.0 * k.d2 * k.d2
                + 15.0 * cc1sq * (2.0 * k.d2 + cc1sq));
    }

    log::debug!(
        "initialized {}: {} regime, period {:.2} min, perigee {:.1} km",
        el.catalog_number,
        regime,
        TWO_PI / no_unkozai,
        perige
    );

    Ok(OrbitState {
        elements: el,
        mean_motion: no_unkozai,
        semi_major_axis: ao,
        gsto,
        regime,
        terms: k,
        deep,
    })
}

/// Long-period coefficient of mean longitude. Guarded against `cos(i) = -1`.
pub(crate) fn long_period_xlcof(sini: f64, cosi: f64) -> f64 {
    let denominator = if (cosi + 1.0).abs() > 1.5e-12 {
        1.0 + cosi
    } else {
        1.5e-12
    };
    -0.25 * J3_OVER_J2 * sini * (3.0 + 5.0 * cosi) / denominator
}
