//! SDP-4 deep-space terms for orbits with a period of 225 minutes or more.
//!
//! Precomputed once at initialization and only read afterwards:
//! solar/lunar coefficients, their secular rates and the resonance terms.

mod periodic;
mod resonance;
mod solar_lunar;

use std::f64::consts::PI;

pub use resonance::{ResonanceClass, MAX_STEPS as MAX_RESONANCE_STEPS};

pub(crate) use periodic::PerturbedElements;

use resonance::{ResonanceInputs, ResonanceTerms, RPTIM};
use solar_lunar::{SolarLunar, ZNL, ZNS};

use crate::constants::TWO_PI;
use crate::propagation::error::PropagationError;
use crate::propagation::near_earth::SecularElements;

/// Within 3 degrees of an equatorial orbit the node rate is dropped.
const EQUATORIAL_LIMIT: f64 = 5.235_987_7e-2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DeepSpaceTerms {
    solar_lunar: SolarLunar,
    dedt: f64,
    didt: f64,
    dmdt: f64,
    domdt: f64,
    dnodt: f64,
    resonance: ResonanceTerms,
    gsto: f64,
}

/// Epoch elements and near-Earth rates the deep-space terms build on.
pub(crate) struct DeepSpaceEpoch {
    /// Days since 1949-12-31 00:00 UT.
    pub epoch: f64,
    pub gsto: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub arg_perigee: f64,
    pub mean_anomaly: f64,
    pub mean_motion: f64,
    pub mdot: f64,
    pub argpdot: f64,
    pub nodedot: f64,
    pub xke: f64,
}

impl DeepSpaceTerms {
    pub(crate) fn new(epoch: &DeepSpaceEpoch) -> Self {
        let pre = solar_lunar::precompute(
            epoch.epoch,
            epoch.eccentricity,
            epoch.arg_perigee,
            epoch.inclination,
            epoch.raan,
            epoch.mean_motion,
        );
        let (solar, lunar) = (&pre.solar, &pre.lunar);
        let (sinim, cosim, emsq) = (pre.sinim, pre.cosim, pre.emsq);
        let near_equatorial =
            epoch.inclination < EQUATORIAL_LIMIT || epoch.inclination > PI - EQUATORIAL_LIMIT;

        let ses = solar.s1 * ZNS * solar.s5;
        let sis = solar.s2 * ZNS * (solar.z11 + solar.z13);
        let sls = -ZNS * solar.s3 * (solar.z1 + solar.z3 - 14.0 - 6.0 * emsq);
        let sghs = solar.s4 * ZNS * (solar.z31 + solar.z33 - 6.0);
        let mut shs = -ZNS * solar.s2 * (solar.z21 + solar.z23);
        if near_equatorial {
            shs = 0.0;
        }
        if sinim != 0.0 {
            shs /= sinim;
        }
        let sgs = sghs - cosim * shs;

        let dedt = ses + lunar.s1 * ZNL * lunar.s5;
        let didt = sis + lunar.s2 * ZNL * (lunar.z11 + lunar.z13);
        let dmdt = sls - ZNL * lunar.s3 * (lunar.z1 + lunar.z3 - 14.0 - 6.0 * emsq);
        let sghl = lunar.s4 * ZNL * (lunar.z31 + lunar.z33 - 6.0);
        let mut shll = -ZNL * lunar.s2 * (lunar.z21 + lunar.z23);
        if near_equatorial {
            shll = 0.0;
        }
        let mut domdt = sgs + sghl;
        let mut dnodt = shs;
        if sinim != 0.0 {
            domdt -= cosim / sinim * shll;
            dnodt += shll / sinim;
        }

        let class = ResonanceClass::classify(epoch.mean_motion, epoch.eccentricity);
        log::debug!("deep-space orbit, resonance class {class}");

        let resonance = ResonanceTerms::new(&ResonanceInputs {
            class,
            mean_motion: epoch.mean_motion,
            eccentricity: epoch.eccentricity,
            mean_anomaly: epoch.mean_anomaly,
            raan: epoch.raan,
            arg_perigee: epoch.arg_perigee,
            sinim,
            cosim,
            emsq,
            gsto: epoch.gsto,
            xke: epoch.xke,
            mdot: epoch.mdot,
            argpdot: epoch.argpdot,
            nodedot: epoch.nodedot,
            dmdt,
            domdt,
            dnodt,
        });

        Self {
            solar_lunar: pre.coefficients,
            dedt,
            didt,
            dmdt,
            domdt,
            dnodt,
            resonance,
            gsto: epoch.gsto,
        }
    }

    pub fn resonance_class(&self) -> ResonanceClass {
        self.resonance.class()
    }

    /// Add the deep-space secular drift and, for resonant orbits, replace
    /// mean motion and mean anomaly with the integrated values.
    pub(crate) fn secular(
        &self,
        tsince: f64,
        epoch_mean_motion: f64,
        epoch_arg_perigee: f64,
        argpdot: f64,
        elements: SecularElements,
    ) -> Result<SecularElements, PropagationError> {
        let mut out = SecularElements {
            eccentricity: elements.eccentricity + self.dedt * tsince,
            inclination: elements.inclination + self.didt * tsince,
            arg_perigee: elements.arg_perigee + self.domdt * tsince,
            raan: elements.raan + self.dnodt * tsince,
            mean_anomaly: elements.mean_anomaly + self.dmdt * tsince,
            ..elements
        };

        let integrated =
            self.resonance
                .integrate(tsince, epoch_mean_motion, epoch_arg_perigee, argpdot)?;
        if let Some((nm, xl)) = integrated {
            let theta = (self.gsto + tsince * RPTIM) % TWO_PI;
            out.mean_anomaly = match self.resonance.class() {
                ResonanceClass::HalfDay => xl - 2.0 * out.raan + 2.0 * theta,
                _ => xl - out.raan - out.arg_perigee + theta,
            };
            out.mean_motion = nm;
        }

        Ok(out)
    }

    /// Long-period solar/lunar corrections at `tsince`.
    pub(crate) fn periodic(&self, tsince: f64, elements: PerturbedElements) -> PerturbedElements {
        periodic::apply(&self.solar_lunar, tsince, elements)
    }
}
