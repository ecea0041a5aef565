//! Geopotential resonance for 24 h and 12 h orbits.
//!
//! The mean longitude `xli` and mean motion `xni` are integrated with a
//! fixed-step Euler-Maclaurin scheme. Every call starts again at epoch, so
//! the result depends only on `tsince`.

use serde::Serialize;

use crate::constants::TWO_PI;
use crate::propagation::error::PropagationError;

/// Earth rotation rate in rad/min.
pub(super) const RPTIM: f64 = 4.375_269_088_011_299_66e-3;

const STEP: f64 = 720.0;
/// `STEP² / 2`.
const STEP2: f64 = 259_200.0;
/// About 13.7 years either side of epoch.
pub const MAX_STEPS: u32 = 10_000;

const SYNCHRONOUS_BAND: (f64, f64) = (0.003_490_658_5, 0.005_235_987_7);
const HALF_DAY_BAND: (f64, f64) = (8.26e-3, 9.24e-3);
const HALF_DAY_MIN_ECCENTRICITY: f64 = 0.5;

const FASX2: f64 = 0.131_309_08;
const FASX4: f64 = 2.884_319_8;
const FASX6: f64 = 0.374_480_87;
const G22: f64 = 5.768_639_6;
const G32: f64 = 0.952_408_98;
const G44: f64 = 1.801_499_8;
const G52: f64 = 1.050_833_0;
const G54: f64 = 4.410_889_8;

const Q22: f64 = 1.789_167_9e-6;
const Q31: f64 = 2.146_074_8e-6;
const Q33: f64 = 2.212_301_5e-7;
const ROOT22: f64 = 1.789_167_9e-6;
const ROOT32: f64 = 3.739_379_2e-7;
const ROOT44: f64 = 7.363_695_3e-9;
const ROOT52: f64 = 1.142_863_9e-7;
const ROOT54: f64 = 2.176_580_3e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum ResonanceClass {
    NonResonant,
    /// About one revolution per sidereal day.
    Synchronous,
    /// About two revolutions per day on an eccentric (Molniya-type) orbit.
    HalfDay,
}

impl ResonanceClass {
    /// Classify from mean motion (rad/min) and eccentricity.
    pub fn classify(mean_motion: f64, eccentricity: f64) -> Self {
        if mean_motion > SYNCHRONOUS_BAND.0 && mean_motion < SYNCHRONOUS_BAND.1 {
            ResonanceClass::Synchronous
        } else if (HALF_DAY_BAND.0..=HALF_DAY_BAND.1).contains(&mean_motion)
            && eccentricity >= HALF_DAY_MIN_ECCENTRICITY
        {
            ResonanceClass::HalfDay
        } else {
            ResonanceClass::NonResonant
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ResonanceTerms {
    None,
    Synchronous {
        del1: f64,
        del2: f64,
        del3: f64,
        xlamo: f64,
        xfact: f64,
    },
    HalfDay {
        d: HalfDayCoefficients,
        xlamo: f64,
        xfact: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HalfDayCoefficients {
    d2201: f64,
    d2211: f64,
    d3210: f64,
    d3222: f64,
    d4410: f64,
    d4422: f64,
    d5220: f64,
    d5232: f64,
    d5421: f64,
    d5433: f64,
}

/// Epoch quantities the resonance coefficients are built from.
pub(super) struct ResonanceInputs {
    pub class: ResonanceClass,
    pub mean_motion: f64,
    pub eccentricity: f64,
    pub mean_anomaly: f64,
    pub raan: f64,
    pub arg_perigee: f64,
    pub sinim: f64,
    pub cosim: f64,
    pub emsq: f64,
    pub gsto: f64,
    pub xke: f64,
    /// Secular rates of M, ω and Ω including the deep-space contribution.
    pub mdot: f64,
    pub argpdot: f64,
    pub nodedot: f64,
    pub dmdt: f64,
    pub domdt: f64,
    pub dnodt: f64,
}

impl ResonanceTerms {
    pub(super) fn new(inputs: &ResonanceInputs) -> Self {
        let theta = inputs.gsto % TWO_PI;
        let nm = inputs.mean_motion;
        let aonv = (nm / inputs.xke).powf(2.0 / 3.0);
        let (sinim, cosim) = (inputs.sinim, inputs.cosim);

        match inputs.class {
            ResonanceClass::NonResonant => ResonanceTerms::None,
            ResonanceClass::Synchronous => {
                let emsq = inputs.emsq;
                let g200 = 1.0 + emsq * (-2.5 + 0.8125 * emsq);
                let g310 = 1.0 + 2.0 * emsq;
                let g300 = 1.0 + emsq * (-6.0 + 6.609_37 * emsq);
                let f220 = 0.75 * (1.0 + cosim) * (1.0 + cosim);
                let f311 = 0.9375 * sinim * sinim * (1.0 + 3.0 * cosim) - 0.75 * (1.0 + cosim);
                let f330 = 1.0 + cosim;
                let f330 = 1.875 * f330 * f330 * f330;
                let del1 = 3.0 * nm * nm * aonv * aonv;
                ResonanceTerms::Synchronous {
                    del2: 2.0 * del1 * f220 * g200 * Q22,
                    del3: 3.0 * del1 * f330 * g300 * Q33 * aonv,
                    del1: del1 * f311 * g310 * Q31 * aonv,
                    xlamo: (inputs.mean_anomaly + inputs.raan + inputs.arg_perigee - theta)
                        % TWO_PI,
                    xfact: inputs.mdot + (inputs.argpdot + inputs.nodedot) - RPTIM
                        + inputs.dmdt
                        + inputs.domdt
                        + inputs.dnodt
                        - nm,
                }
            }
            ResonanceClass::HalfDay => ResonanceTerms::HalfDay {
                d: half_day_coefficients(inputs.eccentricity, sinim, cosim, nm, aonv),
                xlamo: (inputs.mean_anomaly + inputs.raan + inputs.raan - theta - theta)
                    % TWO_PI,
                xfact: inputs.mdot + inputs.dmdt + 2.0 * (inputs.nodedot + inputs.dnodt - RPTIM)
                    - nm,
            },
        }
    }

    pub fn class(&self) -> ResonanceClass {
        match self {
            ResonanceTerms::None => ResonanceClass::NonResonant,
            ResonanceTerms::Synchronous { .. } => ResonanceClass::Synchronous,
            ResonanceTerms::HalfDay { .. } => ResonanceClass::HalfDay,
        }
    }

    /// Integrate from epoch to `tsince`. Returns the resonant mean motion and
    /// mean longitude, or `None` for a non-resonant orbit.
    pub(super) fn integrate(
        &self,
        tsince: f64,
        mean_motion: f64,
        arg_perigee: f64,
        argpdot: f64,
    ) -> Result<Option<(f64, f64)>, PropagationError> {
        let (xlamo, xfact) = match *self {
            ResonanceTerms::None => return Ok(None),
            ResonanceTerms::Synchronous { xlamo, xfact, .. } => (xlamo, xfact),
            ResonanceTerms::HalfDay { xlamo, xfact, .. } => (xlamo, xfact),
        };

        let delt = if tsince > 0.0 { STEP } else { -STEP };
        let mut atime = 0.0;
        let mut xli = xlamo;
        let mut xni = mean_motion;
        let mut steps = 0u32;

        loop {
            let (xndt, xnddt) = self.derivatives(xli, atime, arg_perigee, argpdot);
            let xldot = xni + xfact;
            let xnddt = xnddt * xldot;

            if (tsince - atime).abs() < STEP {
                let ft = tsince - atime;
                log::debug!("resonance integration finished after {steps} steps");
                let nm = xni + xndt * ft + xnddt * ft * ft * 0.5;
                let xl = xli + xldot * ft + xndt * ft * ft * 0.5;
                return Ok(Some((nm, xl)));
            }

            if steps >= MAX_STEPS {
                return Err(PropagationError::IntegrationDivergence { steps });
            }
            xli += xldot * delt + xndt * STEP2;
            xni += xndt * delt + xnddt * STEP2;
            atime += delt;
            steps += 1;
        }
    }

    /// First derivative of `xni` and the unscaled second derivative.
    fn derivatives(&self, xli: f64, atime: f64, arg_perigee: f64, argpdot: f64) -> (f64, f64) {
        match self {
            ResonanceTerms::None => (0.0, 0.0),
            ResonanceTerms::Synchronous {
                del1, del2, del3, ..
            } => {
                let xndt = del1 * (xli - FASX2).sin()
                    + del2 * (2.0 * (xli - FASX4)).sin()
                    + del3 * (3.0 * (xli - FASX6)).sin();
                let xnddt = del1 * (xli - FASX2).cos()
                    + 2.0 * del2 * (2.0 * (xli - FASX4)).cos()
                    + 3.0 * del3 * (3.0 * (xli - FASX6)).cos();
                (xndt, xnddt)
            }
            ResonanceTerms::HalfDay { d, .. } => {
                let xomi = arg_perigee + argpdot * atime;
                let x2omi = xomi + xomi;
                let x2li = xli + xli;
                let xndt = d.d2201 * (x2omi + xli - G22).sin()
                    + d.d2211 * (xli - G22).sin()
                    + d.d3210 * (xomi + xli - G32).sin()
                    + d.d3222 * (-xomi + xli - G32).sin()
                    + d.d4410 * (x2omi + x2li - G44).sin()
                    + d.d4422 * (x2li - G44).sin()
                    + d.d5220 * (xomi + xli - G52).sin()
                    + d.d5232 * (-xomi + xli - G52).sin()
                    + d.d5421 * (xomi + x2li - G54).sin()
                    + d.d5433 * (-xomi + x2li - G54).sin();
                let xnddt = d.d2201 * (x2omi + xli - G22).cos()
                    + d.d2211 * (xli - G22).cos()
                    + d.d3210 * (xomi + xli - G32).cos()
                    + d.d3222 * (-xomi + xli - G32).cos()
                    + d.d5220 * (xomi + xli - G52).cos()
                    + d.d5232 * (-xomi + xli - G52).cos()
                    + 2.0
                        * (d.d4410 * (x2omi + x2li - G44).cos()
                            + d.d4422 * (x2li - G44).cos()
                            + d.d5421 * (xomi + x2li - G54).cos()
                            + d.d5433 * (-xomi + x2li - G54).cos());
                (xndt, xnddt)
            }
        }
    }
}

/// Tesseral coefficients for the 12 h problem, polynomial fits in
/// eccentricity from Spacetrack Report #3.
fn half_day_coefficients(
    em: f64,
    sinim: f64,
    cosim: f64,
    nm: f64,
    aonv: f64,
) -> HalfDayCoefficients {
    let cosisq = cosim * cosim;
    let emsq = em * em;
    let eoc = em * emsq;

    let g201 = -0.306 - (em - 0.64) * 0.440;
    let (g211, g310, g322, g410, g422, g520);
    if em <= 0.65 {
        g211 = 3.616 - 13.2470 * em + 16.2900 * emsq;
        g310 = -19.302 + 117.3900 * em - 228.4190 * emsq + 156.5910 * eoc;
        g322 = -18.9068 + 109.7927 * em - 214.6334 * emsq + 146.5816 * eoc;
        g410 = -41.122 + 242.6940 * em - 471.0940 * emsq + 313.9530 * eoc;
        g422 = -146.407 + 841.8800 * em - 1629.014 * emsq + 1083.4350 * eoc;
        g520 = -532.114 + 3017.977 * em - 5740.032 * emsq + 3708.2760 * eoc;
    } else {
        g211 = -72.099 + 331.819 * em - 508.738 * emsq + 266.724 * eoc;
        g310 = -346.844 + 1582.851 * em - 2415.925 * emsq + 1246.113 * eoc;
        g322 = -342.585 + 1554.908 * em - 2366.899 * emsq + 1215.972 * eoc;
        g410 = -1052.797 + 4758.686 * em - 7193.992 * emsq + 3651.957 * eoc;
        g422 = -3581.690 + 16178.110 * em - 24462.770 * emsq + 12422.520 * eoc;
        g520 = if em > 0.715 {
            -5149.66 + 29936.92 * em - 54087.36 * emsq + 31324.56 * eoc
        } else {
            1464.74 - 4664.75 * em + 3763.64 * emsq
        };
    }

    let (g533, g521, g532) = if em < 0.7 {
        (
            -919.22770 + 4988.61 * em - 9064.77 * emsq + 5542.21 * eoc,
            -822.71072 + 4568.6173 * em - 8491.4146 * emsq + 5337.524 * eoc,
            -853.66600 + 4690.25 * em - 8624.77 * emsq + 5341.4 * eoc,
        )
    } else {
        (
            -37995.78 + 161616.52 * em - 229838.2 * emsq + 109377.94 * eoc,
            -51752.104 + 218913.95 * em - 309468.16 * emsq + 146349.42 * eoc,
            -40023.88 + 170470.89 * em - 242699.48 * emsq + 115605.82 * eoc,
        )
    };

    let sini2 = sinim * sinim;
    let f220 = 0.75 * (1.0 + 2.0 * cosim + cosisq);
    let f221 = 1.5 * sini2;
    let f321 = 1.875 * sinim * (1.0 - 2.0 * cosim - 3.0 * cosisq);
    let f322 = -1.875 * sinim * (1.0 + 2.0 * cosim - 3.0 * cosisq);
    let f441 = 35.0 * sini2 * f220;
    let f442 = 39.3750 * sini2 * sini2;
    let f522 = 9.84375
        * sinim
        * (sini2 * (1.0 - 2.0 * cosim - 5.0 * cosisq)
            + 0.333_333_33 * (-2.0 + 4.0 * cosim + 6.0 * cosisq));
    let f523 = sinim
        * (4.921_875_12 * sini2 * (-2.0 - 4.0 * cosim + 10.0 * cosisq)
            + 6.562_500_12 * (1.0 + 2.0 * cosim - 3.0 * cosisq));
    let f542 = 29.53125
        * sinim
        * (2.0 - 8.0 * cosim + cosisq * (-12.0 + 8.0 * cosim + 10.0 * cosisq));
    let f543 = 29.53125
        * sinim
        * (-2.0 - 8.0 * cosim + cosisq * (12.0 + 8.0 * cosim - 10.0 * cosisq));

    let xno2 = nm * nm;
    let ainv2 = aonv * aonv;
    let mut temp1 = 3.0 * xno2 * ainv2;
    let temp = temp1 * ROOT22;
    let d2201 = temp * f220 * g201;
    let d2211 = temp * f221 * g211;
    temp1 *= aonv;
    let temp = temp1 * ROOT32;
    let d3210 = temp * f321 * g310;
    let d3222 = temp * f322 * g322;
    temp1 *= aonv;
    let temp = 2.0 * temp1 * ROOT44;
    let d4410 = temp * f441 * g410;
    let d4422 = temp * f442 * g422;
    temp1 *= aonv;
    let temp = temp1 * ROOT52;
    let d5220 = temp * f522 * g520;
    let d5232 = temp * f523 * g532;
    let temp = 2.0 * temp1 * ROOT54;

    HalfDayCoefficients {
        d2201,
        d2211,
        d3210,
        d3222,
        d4410,
        d4422,
        d5220,
        d5232,
        d5421: temp * f542 * g521,
        d5433: temp * f543 * g533,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn mean_motion_for_period(minutes: f64) -> f64 {
        TWO_PI / minutes
    }

    #[rstest]
    #[case(1436.0, 0.0, ResonanceClass::Synchronous)]
    #[case(1436.0, 0.7, ResonanceClass::Synchronous)]
    #[case(718.0, 0.74, ResonanceClass::HalfDay)]
    #[case(718.0, 0.01, ResonanceClass::NonResonant)]
    #[case(600.0, 0.74, ResonanceClass::NonResonant)]
    #[case(225.0, 0.0, ResonanceClass::NonResonant)]
    #[case(2000.0, 0.0, ResonanceClass::NonResonant)]
    fn resonance_bands(#[case] period: f64, #[case] e: f64, #[case] expected: ResonanceClass) {
        assert_eq!(
            ResonanceClass::classify(mean_motion_for_period(period), e),
            expected
        );
    }

    #[test]
    fn non_resonant_does_not_integrate() {
        let terms = ResonanceTerms::None;
        assert_eq!(terms.integrate(1.0e6, 0.004, 0.0, 0.0), Ok(None));
    }

    #[test]
    fn step_bound_is_enforced() {
        let terms = ResonanceTerms::Synchronous {
            del1: 0.0,
            del2: 0.0,
            del3: 0.0,
            xlamo: 0.0,
            xfact: 0.0,
        };
        let beyond = (MAX_STEPS as f64 + 2.0) * STEP;
        assert_eq!(
            terms.integrate(beyond, 0.004_375, 0.0, 0.0),
            Err(PropagationError::IntegrationDivergence { steps: MAX_STEPS })
        );
        assert_eq!(
            terms.integrate(-beyond, 0.004_375, 0.0, 0.0),
            Err(PropagationError::IntegrationDivergence { steps: MAX_STEPS })
        );
        assert!(terms.integrate(STEP * 100.5, 0.004_375, 0.0, 0.0).is_ok());
    }

    #[test]
    fn zero_coefficients_give_linear_longitude() {
        let terms = ResonanceTerms::Synchronous {
            del1: 0.0,
            del2: 0.0,
            del3: 0.0,
            xlamo: 1.0,
            xfact: 1e-4,
        };
        let (nm, xl) = terms.integrate(3000.0, 0.004, 0.0, 0.0).unwrap().unwrap();
        assert_eq!(nm, 0.004);
        assert!((xl - (1.0 + 3000.0 * (0.004 + 1e-4))).abs() < 1e-9);
    }
}
