//! Reference state vectors from Vallado's SGP4-VER verification set and the
//! ISS case, in TEME km and km/s.

use rstest::rstest;

use crate::propagation::{propagate, PropagationError, Regime, ResonanceClass};
use crate::tests::{
    init_logger, state, DECAYING, GEO, HIGH_DRAG_DEEP, ISS, MOLNIYA, NAVSTAR, TRANSFER, VANGUARD,
};

const POSITION_TOL_KM: f64 = 1e-5;
const VELOCITY_TOL_KM_S: f64 = 1e-8;

fn assert_vector(actual: [f64; 3], expected: [f64; 3], tol: f64, what: &str) {
    for i in 0..3 {
        assert!(
            (actual[i] - expected[i]).abs() < tol,
            "{}[{}]: got {:.9}, expected {:.9}",
            what,
            i,
            actual[i],
            expected[i]
        );
    }
}

#[rstest]
#[case::iss_epoch(ISS, 0.0,
    [-879.75034845, 4301.58849726, 5174.01219398],
    [-7.538319646, 0.144382289, -1.393190401])]
#[case::iss_one_hour(ISS, 60.0,
    [5818.52718555, -2752.80088176, -2187.65896051],
    [3.820279059, 3.743776030, 5.480912115])]
#[case::vanguard_epoch(VANGUARD, 0.0,
    [7022.46529266, -1400.08296755, 0.03995155],
    [1.893841015, 6.405893759, 4.534807250])]
#[case::vanguard_six_hours(VANGUARD, 360.0,
    [-7154.03120202, -3783.17682504, -3536.19412294],
    [4.741887409, -4.151817765, -2.093935425])]
#[case::vanguard_day_before(VANGUARD, -1440.0,
    [3758.79747126, 6348.44465201, 4644.59925172],
    [-5.404561380, 3.546685070, 1.866218313])]
#[case::geo_epoch(GEO, 0.0,
    [42080.71852213, -2646.86387436, 0.81851294],
    [0.193105177, 3.068688251, 0.000438449])]
#[case::geo_one_day(GEO, 1440.0,
    [42119.96263499, -1925.77567263, -0.19827433],
    [0.140521206, 3.071541613, 0.000179561])]
#[case::geo_two_days(GEO, 2880.0,
    [42146.81714550, -1205.30681787, 0.30657928],
    [0.087982664, 3.073491493, -0.000068888])]
#[case::molniya_epoch(MOLNIYA, 0.0,
    [2349.89483350, -14785.93811562, 0.02119378],
    [2.721488096, -3.256811655, 4.498416672])]
#[case::molniya_half_day(MOLNIYA, 720.0,
    [2622.13222207, -15125.15464924, 474.51048398],
    [2.688287199, -3.078426664, 4.494979530])]
#[case::molniya_two_days(MOLNIYA, 2880.0,
    [3417.20931586, -16038.79510665, 1894.74934058],
    [2.585515864, -2.596818146, 4.456882556])]
#[case::molniya_day_before(MOLNIYA, -1440.0,
    [1795.04933268, -14049.70061318, -947.43454031],
    [2.784637180, -3.643927317, 4.486405513])]
#[case::navstar_epoch(NAVSTAR, 0.0,
    [21707.46412351, -15318.61752390, 0.13551152],
    [1.304029214, 1.816904974, 3.161919976])]
#[case::navstar_one_day(NAVSTAR, 1440.0,
    [22002.20074562, -14879.72595593, 774.32827099],
    [1.191573619, 1.894561165, 3.159953047])]
#[case::transfer_epoch(TRANSFER, 0.0,
    [-8801.60046706, -0.03357557, -0.44522743],
    [-3.835279101, -7.662552175, 0.944561323])]
#[case::transfer_one_day(TRANSFER, 1440.0,
    [4021.31438583, -36066.09209609, 4442.91587411],
    [2.007322354, -1.227461376, 0.149383897])]
#[case::high_drag_epoch(HIGH_DRAG_DEEP, 0.0,
    [7473.37102491, 428.94748312, 5828.74846783],
    [5.107155391, 6.444680305, -0.186133297])]
#[case::decaying_epoch(DECAYING, 0.0,
    [423.99295524, -6658.12256149, 136.13040356],
    [1.006373613, 0.217309983, 7.662587892])]
#[case::decaying_seven_hours(DECAYING, 420.0,
    [-852.93910071, 192.65232023, -6322.47054784],
    [0.396006194, -7.882964919, -0.289331517])]
fn matches_reference(
    #[case] lines: (&str, &str),
    #[case] tsince: f64,
    #[case] position: [f64; 3],
    #[case] velocity: [f64; 3],
) {
    init_logger();
    let prediction = propagate(&state(lines), tsince).unwrap();
    assert_vector(prediction.position, position, POSITION_TOL_KM, "position");
    assert_vector(prediction.velocity, velocity, VELOCITY_TOL_KM_S, "velocity");
}

#[rstest]
#[case(ISS, Regime::NearEarth, ResonanceClass::NonResonant)]
#[case(VANGUARD, Regime::NearEarth, ResonanceClass::NonResonant)]
#[case(GEO, Regime::DeepSpace, ResonanceClass::Synchronous)]
#[case(MOLNIYA, Regime::DeepSpace, ResonanceClass::HalfDay)]
#[case(NAVSTAR, Regime::DeepSpace, ResonanceClass::NonResonant)]
#[case(TRANSFER, Regime::DeepSpace, ResonanceClass::NonResonant)]
fn classification(
    #[case] lines: (&str, &str),
    #[case] regime: Regime,
    #[case] resonance: ResonanceClass,
) {
    let s = state(lines);
    assert_eq!(s.regime(), regime);
    assert_eq!(s.resonance_class(), resonance);
}

#[test]
fn reentry_reports_decay() {
    init_logger();
    let s = state(DECAYING);
    assert!(matches!(
        propagate(&s, 430.0),
        Err(PropagationError::Decayed { radius_er }) if radius_er < 1.0
    ));
    // A failed call leaves the state usable.
    assert!(propagate(&s, 420.0).is_ok());
}

#[test]
fn bad_checksum_from_published_iss_lines() {
    let result = crate::tle::TleRecord::parse(
        "1 25544U 98067A   20029.54791435  .00001264  00000-0  29621-4 0  9993",
        "2 25544  51.6435 350.5005 0007413  58.5007  44.8617 15.49515345210867",
    );
    assert!(matches!(
        result,
        Err(crate::tle::TleError::Checksum { line: 1, stated: 3, computed: 8 })
    ));
}
