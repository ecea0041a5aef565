//! Frame chain from TEME down to the observer: TEME → PEF (sidereal
//! rotation) → ITRF (polar motion) → geodetic and topocentric.

mod geodetic;
mod sidereal;
mod topocentric;
mod transform;

pub use geodetic::{ecef_to_geodetic, geodetic_to_ecef, Geodetic};
pub use sidereal::gmst;
pub use topocentric::{
    doppler, downlink_frequency, ecef_to_enu, refraction, topocentric, uplink_frequency,
    Atmosphere, LookAngles,
};
pub use transform::{pef_to_itrf, teme_to_itrf, teme_to_pef, StateVector};

pub(crate) use topocentric::enu_with;
