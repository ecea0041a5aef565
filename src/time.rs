//! Julian date conversions between chrono timestamps and the day counts the
//! propagators work in.

use chrono::{DateTime, Utc};

use crate::constants::{MINUTES_PER_DAY, MJD_OFFSET, SECONDS_PER_DAY};

const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian date of a calendar instant (proleptic Gregorian, valid 1900..2100).
pub fn jday(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> f64 {
    let y = year as f64;
    let mo = month as f64;
    367.0 * y - ((7.0 * (y + ((mo + 9.0) / 12.0).floor())) * 0.25).floor()
        + (275.0 * mo / 9.0).floor()
        + day as f64
        + 1_721_013.5
        + ((second / 60.0 + minute as f64) / 60.0 + hour as f64) / 24.0
}

/// Julian date of a TLE epoch given as two-digit year and fractional day of year.
pub fn tle_epoch_to_julian(two_digit_year: u32, day_of_year: f64) -> f64 {
    let year = if two_digit_year < 57 {
        2000 + two_digit_year as i32
    } else {
        1900 + two_digit_year as i32
    };
    jday(year, 1, 0, 0, 0, 0.0) + day_of_year
}

pub fn datetime_to_julian(t: DateTime<Utc>) -> f64 {
    let seconds = t.timestamp() as f64 + t.timestamp_subsec_nanos() as f64 * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Inverse of [`datetime_to_julian`], rounded to the nearest microsecond.
pub fn julian_to_datetime(jd: f64) -> Option<DateTime<Utc>> {
    let micros = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1e6).round() as i64;
    DateTime::from_timestamp_micros(micros)
}

pub fn julian_to_mjd(jd: f64) -> f64 {
    jd - MJD_OFFSET
}

pub fn datetime_to_mjd(t: DateTime<Utc>) -> f64 {
    julian_to_mjd(datetime_to_julian(t))
}

/// Integer MJD of a calendar date at 00:00 UTC.
pub fn calendar_mjd(year: i32, month: u32, day: u32) -> i64 {
    julian_to_mjd(jday(year, month, day, 0, 0, 0.0)).round() as i64
}

/// Minutes from `epoch_jd` to `t`, negative before the epoch.
pub fn minutes_since(epoch_jd: f64, t: DateTime<Utc>) -> f64 {
    (datetime_to_julian(t) - epoch_jd) * MINUTES_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn j2000_noon() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((datetime_to_julian(t) - 2_451_545.0).abs() < 1e-9);
        assert!((jday(2000, 1, 1, 12, 0, 0.0) - 2_451_545.0).abs() < 1e-9);
    }

    #[test]
    fn tle_epoch_century_pivot() {
        let jd_2020 = tle_epoch_to_julian(20, 1.0);
        assert!((jd_2020 - jday(2020, 1, 1, 0, 0, 0.0)).abs() < 1e-9);
        let jd_1980 = tle_epoch_to_julian(80, 1.5);
        assert!((jd_1980 - jday(1980, 1, 1, 12, 0, 0.0)).abs() < 1e-9);
        let jd_1957 = tle_epoch_to_julian(57, 1.0);
        assert!((jd_1957 - jday(1957, 1, 1, 0, 0, 0.0)).abs() < 1e-9);
    }

    #[test]
    fn julian_round_trip() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 12).unwrap();
        let back = julian_to_datetime(datetime_to_julian(t)).unwrap();
        assert!((back - t).num_milliseconds().abs() <= 1);
    }

    #[test]
    fn mjd_of_known_date() {
        assert_eq!(calendar_mjd(2000, 1, 1), 51_544);
        assert_eq!(calendar_mjd(2020, 1, 29), 58_877);
    }
}
