//! Solar and lunar perturbation coefficients, evaluated once at epoch.

use crate::constants::TWO_PI;

pub(super) const ZES: f64 = 0.01675;
pub(super) const ZEL: f64 = 0.05490;
pub(super) const ZNS: f64 = 1.19459e-5;
pub(super) const ZNL: f64 = 1.5835218e-4;

const C1SS: f64 = 2.9864797e-6;
const C1L: f64 = 4.7968065e-7;
const ZSINIS: f64 = 0.39785416;
const ZCOSIS: f64 = 0.91744867;
const ZCOSGS: f64 = 0.1945905;
const ZSINGS: f64 = -0.98088458;

/// Geometry of one perturbing body relative to the satellite orbit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(super) struct Perturber {
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub s4: f64,
    pub s5: f64,
    pub s6: f64,
    pub s7: f64,
    pub z1: f64,
    pub z2: f64,
    pub z3: f64,
    pub z11: f64,
    pub z12: f64,
    pub z13: f64,
    pub z21: f64,
    pub z22: f64,
    pub z23: f64,
    pub z31: f64,
    pub z32: f64,
    pub z33: f64,
}

/// Long-period amplitudes consumed by the periodic correction stage.
/// The `s*` family is solar, the `x*`/`e*` family lunar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarLunar {
    pub(super) zmol: f64,
    pub(super) zmos: f64,
    pub(super) se2: f64,
    pub(super) se3: f64,
    pub(super) si2: f64,
    pub(super) si3: f64,
    pub(super) sl2: f64,
    pub(super) sl3: f64,
    pub(super) sl4: f64,
    pub(super) sgh2: f64,
    pub(super) sgh3: f64,
    pub(super) sgh4: f64,
    pub(super) sh2: f64,
    pub(super) sh3: f64,
    pub(super) ee2: f64,
    pub(super) e3: f64,
    pub(super) xi2: f64,
    pub(super) xi3: f64,
    pub(super) xl2: f64,
    pub(super) xl3: f64,
    pub(super) xl4: f64,
    pub(super) xgh2: f64,
    pub(super) xgh3: f64,
    pub(super) xgh4: f64,
    pub(super) xh2: f64,
    pub(super) xh3: f64,
}

pub(super) struct Precompute {
    pub coefficients: SolarLunar,
    pub solar: Perturber,
    pub lunar: Perturber,
    pub sinim: f64,
    pub cosim: f64,
    pub emsq: f64,
}

/// `epoch` is days since 1949-12-31 00:00 UT.
pub(super) fn precompute(
    epoch: f64,
    eccentricity: f64,
    arg_perigee: f64,
    inclination: f64,
    raan: f64,
    mean_motion: f64,
) -> Precompute {
    let (snodm, cnodm) = raan.sin_cos();
    let (sinomm, cosomm) = arg_perigee.sin_cos();
    let (sinim, cosim) = inclination.sin_cos();
    let emsq = eccentricity * eccentricity;
    let betasq = 1.0 - emsq;
    let rtemsq = betasq.sqrt();

    // Lunar orbit orientation at epoch.
    let day = epoch + 18_261.5;
    let xnodce = (4.523_602_0 - 9.242_202_9e-4 * day) % TWO_PI;
    let (stem, ctem) = xnodce.sin_cos();
    let zcosil = 0.913_751_64 - 0.035_680_96 * ctem;
    let zsinil = (1.0 - zcosil * zcosil).sqrt();
    let zsinhl = 0.089_683_511 * stem / zsinil;
    let zcoshl = (1.0 - zsinhl * zsinhl).sqrt();
    let gam = 5.835_151_4 + 0.001_944_368_0 * day;
    let zx = (0.397_854_16 * stem / zsinil).atan2(zcoshl * ctem + 0.917_448_67 * zsinhl * stem);
    let zx = gam + zx - xnodce;
    let (zsingl, zcosgl) = zx.sin_cos();

    let orbit = OrbitAngles {
        cosim,
        sinim,
        cosomm,
        sinomm,
        eccentricity,
        emsq,
        betasq,
        rtemsq,
        xnoi: 1.0 / mean_motion,
    };

    let solar = orbit.perturber(ZCOSGS, ZSINGS, ZCOSIS, ZSINIS, cnodm, snodm, C1SS);
    let lunar = orbit.perturber(
        zcosgl,
        zsingl,
        zcosil,
        zsinil,
        zcoshl * cnodm + zsinhl * snodm,
        snodm * zcoshl - cnodm * zsinhl,
        C1L,
    );

    let coefficients = SolarLunar {
        zmol: (4.719_967_2 + 0.229_971_50 * day - gam) % TWO_PI,
        zmos: (6.256_583_7 + 0.017_201_977 * day) % TWO_PI,
        se2: 2.0 * solar.s1 * solar.s6,
        se3: 2.0 * solar.s1 * solar.s7,
        si2: 2.0 * solar.s2 * solar.z12,
        si3: 2.0 * solar.s2 * (solar.z13 - solar.z11),
        sl2: -2.0 * solar.s3 * solar.z2,
        sl3: -2.0 * solar.s3 * (solar.z3 - solar.z1),
        sl4: -2.0 * solar.s3 * (-21.0 - 9.0 * emsq) * ZES,
        sgh2: 2.0 * solar.s4 * solar.z32,
        sgh3: 2.0 * solar.s4 * (solar.z33 - solar.z31),
        sgh4: -18.0 * solar.s4 * ZES,
        sh2: -2.0 * solar.s2 * solar.z22,
        sh3: -2.0 * solar.s2 * (solar.z23 - solar.z21),
        ee2: 2.0 * lunar.s1 * lunar.s6,
        e3: 2.0 * lunar.s1 * lunar.s7,
        xi2: 2.0 * lunar.s2 * lunar.z12,
        xi3: 2.0 * lunar.s2 * (lunar.z13 - lunar.z11),
        xl2: -2.0 * lunar.s3 * lunar.z2,
        xl3: -2.0 * lunar.s3 * (lunar.z3 - lunar.z1),
        xl4: -2.0 * lunar.s3 * (-21.0 - 9.0 * emsq) * ZEL,
        xgh2: 2.0 * lunar.s4 * lunar.z32,
        xgh3: 2.0 * lunar.s4 * (lunar.z33 - lunar.z31),
        xgh4: -18.0 * lunar.s4 * ZEL,
        xh2: -2.0 * lunar.s2 * lunar.z22,
        xh3: -2.0 * lunar.s2 * (lunar.z23 - lunar.z21),
    };

    Precompute {
        coefficients,
        solar,
        lunar,
        sinim,
        cosim,
        emsq,
    }
}

struct OrbitAngles {
    cosim: f64,
    sinim: f64,
    cosomm: f64,
    sinomm: f64,
    eccentricity: f64,
    emsq: f64,
    betasq: f64,
    rtemsq: f64,
    xnoi: f64,
}

impl OrbitAngles {
    #[allow(clippy::too_many_arguments)]
    fn perturber(
        &self,
        zcosg: f64,
        zsing: f64,
        zcosi: f64,
        zsini: f64,
        zcosh: f64,
        zsinh: f64,
        cc: f64,
    ) -> Perturber {
        let (cosim, sinim, cosomm, sinomm, emsq) =
            (self.cosim, self.sinim, self.cosomm, self.sinomm, self.emsq);

        let a1 = zcosg * zcosh + zsing * zcosi * zsinh;
        let a3 = -zsing * zcosh + zcosg * zcosi * zsinh;
        let a7 = -zcosg * zsinh + zsing * zcosi * zcosh;
        let a8 = zsing * zsini;
        let a9 = zsing * zsinh + zcosg * zcosi * zcosh;
        let a10 = zcosg * zsini;
        let a2 = cosim * a7 + sinim * a8;
        let a4 = cosim * a9 + sinim * a10;
        let a5 = -sinim * a7 + cosim * a8;
        let a6 = -sinim * a9 + cosim * a10;

        let x1 = a1 * cosomm + a2 * sinomm;
        let x2 = a3 * cosomm + a4 * sinomm;
        let x3 = -a1 * sinomm + a2 * cosomm;
        let x4 = -a3 * sinomm + a4 * cosomm;
        let x5 = a5 * sinomm;
        let x6 = a6 * sinomm;
        let x7 = a5 * cosomm;
        let x8 = a6 * cosomm;

        let z31 = 12.0 * x1 * x1 - 3.0 * x3 * x3;
        let z32 = 24.0 * x1 * x2 - 6.0 * x3 * x4;
        let z33 = 12.0 * x2 * x2 - 3.0 * x4 * x4;
        let z1 = 3.0 * (a1 * a1 + a2 * a2) + z31 * emsq;
        let z2 = 6.0 * (a1 * a3 + a2 * a4) + z32 * emsq;
        let z3 = 3.0 * (a3 * a3 + a4 * a4) + z33 * emsq;
        let z11 = -6.0 * a1 * a5 + emsq * (-24.0 * x1 * x7 - 6.0 * x3 * x5);
        let z12 = -6.0 * (a1 * a6 + a3 * a5)
            + emsq * (-24.0 * (x2 * x7 + x1 * x8) - 6.0 * (x3 * x6 + x4 * x5));
        let z13 = -6.0 * a3 * a6 + emsq * (-24.0 * x2 * x8 - 6.0 * x4 * x6);
        let z21 = 6.0 * a2 * a5 + emsq * (24.0 * x1 * x5 - 6.0 * x3 * x7);
        let z22 = 6.0 * (a4 * a5 + a2 * a6)
            + emsq * (24.0 * (x2 * x5 + x1 * x6) - 6.0 * (x4 * x7 + x3 * x8));
        let z23 = 6.0 * a4 * a6 + emsq * (24.0 * x2 * x6 - 6.0 * x4 * x8);
        let z1 = z1 + z1 + self.betasq * z31;
        let z2 = z2 + z2 + self.betasq * z32;
        let z3 = z3 + z3 + self.betasq * z33;

        let s3 = cc * self.xnoi;
        let s2 = -0.5 * s3 / self.rtemsq;
        let s4 = s3 * self.rtemsq;
        let s1 = -15.0 * self.eccentricity * s4;

        Perturber {
            s1,
            s2,
            s3,
            s4,
            s5: x1 * x3 + x2 * x4,
            s6: x2 * x3 + x1 * x4,
            s7: x2 * x4 - x1 * x3,
            z1,
            z2,
            z3,
            z11,
            z12,
            z13,
            z21,
            z22,
            z23,
            z31,
            z32,
            z33,
        }
    }
}
