use crate::environment::{SpaceWeatherRecord, SpaceWeatherTable};
use crate::propagation::{ElementsError, OrbitState};
use crate::time::julian_to_mjd;

/// Reference solar flux the TLE drag term is assumed to be fitted at.
const REFERENCE_F107: f64 = 150.0;
const MIN_SCALE: f64 = 0.1;

/// BSTAR scaled by solar flux and geomagnetic activity.
pub fn effective_bstar(bstar: f64, weather: &SpaceWeatherRecord) -> f64 {
    let f107_scale = 1.0 + 0.002 * (weather.f107 - REFERENCE_F107);
    let ap_scale = 1.0 + 0.01 * (weather.ap / 10.0);
    bstar * (f107_scale * ap_scale).max(MIN_SCALE)
}

/// Rebuild `state` with BSTAR scaled by the activity on its epoch day. The
/// state is returned unchanged when the table has no record for that day.
pub fn scaled_state(
    state: &OrbitState,
    table: &SpaceWeatherTable,
) -> Result<OrbitState, ElementsError> {
    match table.get(julian_to_mjd(state.epoch_jd())) {
        Some(weather) => {
            let bstar = effective_bstar(state.elements().bstar, weather);
            log::debug!(
                "scaled BSTAR of {} from {:e} to {:e} (F10.7 {}, Ap {})",
                state.catalog_number(),
                state.elements().bstar,
                bstar,
                weather.f107,
                weather.ap
            );
            state.with_bstar(bstar)
        }
        None => Ok(state.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn weather(f107: f64, ap: f64) -> SpaceWeatherRecord {
        SpaceWeatherRecord { mjd: 0, f107, ap }
    }

    #[rstest]
    #[case(150.0, 0.0, 1.0)]
    #[case(200.0, 0.0, 1.1)]
    #[case(150.0, 100.0, 1.1)]
    #[case(100.0, 20.0, 0.918)]
    #[case(-500.0, 0.0, 0.1)]
    fn scale_factor(#[case] f107: f64, #[case] ap: f64, #[case] expected: f64) {
        let scaled = effective_bstar(1e-4, &weather(f107, ap));
        assert!((scaled / 1e-4 - expected).abs() < 1e-12);
    }

    #[test]
    fn scaled_state_uses_epoch_day() {
        let tle = crate::tle::TleRecord::parse(
            "1 25544U 98067A   20029.54791435  .00001264  00000-0  29621-4 0  9998",
            "2 25544  51.6435 350.5005 0007413  58.5007  44.8617 15.49515345210863",
        )
        .unwrap();
        let state = OrbitState::from_tle(&tle).unwrap();

        let empty = SpaceWeatherTable::default();
        assert_eq!(scaled_state(&state, &empty).unwrap(), state);

        let mjd = julian_to_mjd(state.epoch_jd()).floor() as i64;
        let table = SpaceWeatherTable::from_records([SpaceWeatherRecord {
            mjd,
            f107: 200.0,
            ap: 0.0,
        }]);
        let scaled = scaled_state(&state, &table).unwrap();
        assert!(
            (scaled.elements().bstar - 1.1 * state.elements().bstar).abs() < 1e-15
        );
    }
}
