use std::str::FromStr;

use serde::Serialize;

use crate::time::tle_epoch_to_julian;
use crate::tle::error::TleError;

const LINE_LENGTH: usize = 69;

/// One NORAD two-line element set, validated and decoded into typed fields.
///
/// Angles stay in degrees and mean motion in rev/day exactly as printed; unit
/// conversion happens when an [`OrbitState`](crate::propagation::OrbitState)
/// is built from the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TleRecord {
    pub name: Option<String>,
    pub catalog_number: u32,
    pub classification: char,
    pub international_designator: String,
    /// Two-digit epoch year as printed (57..99 is 19xx, 00..56 is 20xx).
    pub epoch_year: u32,
    pub epoch_day: f64,
    pub epoch_jd: f64,
    /// First derivative of mean motion divided by two, rev/day².
    pub mean_motion_dot: f64,
    /// Second derivative of mean motion divided by six, rev/day³.
    pub mean_motion_ddot: f64,
    pub bstar: f64,
    pub ephemeris_type: u8,
    pub element_set_number: u32,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub eccentricity: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub mean_motion_rev_day: f64,
    pub revolution_number: u32,
}

impl TleRecord {
    /// Parse a two-line set. Nothing is returned unless every check passes.
    pub fn parse(line1: &str, line2: &str) -> Result<Self, TleError> {
        let line1 = validate_line(line1, 1)?;
        let line2 = validate_line(line2, 2)?;

        let catalog_number = parse_field::<u32>(line1, 1, 2..7, "catalog number")?;
        let catalog_line2 = parse_field::<u32>(line2, 2, 2..7, "catalog number")?;
        if catalog_number != catalog_line2 {
            return Err(TleError::CatalogMismatch {
                line1: catalog_number,
                line2: catalog_line2,
            });
        }

        let classification = line1[7..8].chars().next().unwrap_or('U');
        let international_designator = line1[9..17].trim().to_string();
        let epoch_year = parse_field::<u32>(line1, 1, 18..20, "epoch year")?;
        let epoch_day = parse_field::<f64>(line1, 1, 20..32, "epoch day")?;
        if !(1.0..367.0).contains(&epoch_day) {
            return Err(field_error(line1, 1, 20..32, "epoch day"));
        }
        let mean_motion_dot = parse_decimal(line1, 1, 33..43, "mean motion derivative")?;
        let mean_motion_ddot =
            parse_packed_field(line1, 1, 44..52, "mean motion second derivative")?;
        let bstar = parse_packed_field(line1, 1, 53..61, "BSTAR")?;
        let ephemeris_type = parse_lenient::<u8>(line1, 1, 62..63, "ephemeris type")?;
        let element_set_number = parse_lenient::<u32>(line1, 1, 64..68, "element set number")?;

        let inclination_deg = parse_field::<f64>(line2, 2, 8..16, "inclination")?;
        let raan_deg = parse_field::<f64>(line2, 2, 17..25, "right ascension")?;
        let eccentricity = parse_eccentricity(line2)?;
        let arg_perigee_deg = parse_field::<f64>(line2, 2, 34..42, "argument of perigee")?;
        let mean_anomaly_deg = parse_field::<f64>(line2, 2, 43..51, "mean anomaly")?;
        let mean_motion_rev_day = parse_field::<f64>(line2, 2, 52..63, "mean motion")?;
        if mean_motion_rev_day <= 0.0 {
            return Err(field_error(line2, 2, 52..63, "mean motion"));
        }
        let revolution_number = parse_lenient::<u32>(line2, 2, 63..68, "revolution number")?;

        Ok(Self {
            name: None,
            catalog_number,
            classification,
            international_designator,
            epoch_year,
            epoch_day,
            epoch_jd: tle_epoch_to_julian(epoch_year, epoch_day),
            mean_motion_dot,
            mean_motion_ddot,
            bstar,
            ephemeris_type,
            element_set_number,
            inclination_deg,
            raan_deg,
            eccentricity,
            arg_perigee_deg,
            mean_anomaly_deg,
            mean_motion_rev_day,
            revolution_number,
        })
    }

    /// Parse a set preceded by a name line (the "line 0" of three-line sets).
    pub fn parse_named(name: &str, line1: &str, line2: &str) -> Result<Self, TleError> {
        let mut record = Self::parse(line1, line2)?;
        let name = name.trim().trim_start_matches("0 ").trim();
        if !name.is_empty() {
            record.name = Some(name.to_string());
        }
        Ok(record)
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", self.catalog_number))
    }
}

impl FromStr for TleRecord {
    type Err = TleError;

    /// Accepts a two-line set or a three-line set with a leading name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().filter(|l| !l.trim().is_empty()).collect();
        match lines.as_slice() {
            [line1, line2] => Self::parse(line1, line2),
            [name, line1, line2] => Self::parse_named(name, line1, line2),
            _ => Err(TleError::Length {
                line: 1,
                found: lines.first().map(|l| l.len()).unwrap_or(0),
            }),
        }
    }
}

/// NORAD mod-10 checksum over columns 1-68: digits count at face value, each
/// minus sign counts one, everything else is ignored.
pub fn checksum(line: &str) -> u8 {
    let sum: u32 = line
        .bytes()
        .take(LINE_LENGTH - 1)
        .map(|b| match b {
            b'0'..=b'9' => (b - b'0') as u32,
            b'-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}

/// Decode NORAD's packed exponential notation with an implied leading decimal
/// point, e.g. `" 12345-3"` is `0.12345e-3` and `"-11606-4"` is `-0.11606e-4`.
pub fn parse_packed_exponent(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0.0);
    }
    let (sign, body) = match field.as_bytes()[0] {
        b'-' => (-1.0, &field[1..]),
        b'+' => (1.0, &field[1..]),
        _ => (1.0, field),
    };
    let split = body.rfind(['+', '-'])?;
    if split == 0 {
        return None;
    }
    let (mantissa, exponent) = body.split_at(split);
    let mantissa = mantissa.trim();
    if mantissa.is_empty() || !mantissa.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let exponent: i32 = exponent.parse().ok()?;
    let value: f64 = format!("0.{mantissa}e{exponent}").parse().ok()?;
    Some(sign * value)
}

fn validate_line(raw: &str, line: u8) -> Result<&str, TleError> {
    let trimmed = raw.trim_end();
    if !trimmed.is_ascii() {
        return Err(TleError::Field {
            line,
            field: "line",
            value: trimmed.to_string(),
        });
    }
    if trimmed.len() != LINE_LENGTH {
        return Err(TleError::Length {
            line,
            found: trimmed.len(),
        });
    }
    let marker = trimmed.as_bytes();
    if marker[0] != b'0' + line || marker[1] != b' ' {
        return Err(TleError::LineNumber { line });
    }
    let stated = marker[LINE_LENGTH - 1];
    if !stated.is_ascii_digit() {
        return Err(field_error(trimmed, line, 68..69, "checksum"));
    }
    let stated = stated - b'0';
    let computed = checksum(trimmed);
    if stated != computed {
        return Err(TleError::Checksum {
            line,
            stated,
            computed,
        });
    }
    Ok(trimmed)
}

fn field_error(
    text: &str,
    line: u8,
    range: std::ops::Range<usize>,
    field: &'static str,
) -> TleError {
    TleError::Field {
        line,
        field,
        value: text[range].to_string(),
    }
}

fn parse_field<T: FromStr>(
    text: &str,
    line: u8,
    range: std::ops::Range<usize>,
    field: &'static str,
) -> Result<T, TleError> {
    text[range.clone()]
        .trim()
        .parse()
        .map_err(|_| field_error(text, line, range, field))
}

/// Like [`parse_field`] but a blank field reads as zero.
fn parse_lenient<T: FromStr + Default>(
    text: &str,
    line: u8,
    range: std::ops::Range<usize>,
    field: &'static str,
) -> Result<T, TleError> {
    if text[range.clone()].trim().is_empty() {
        return Ok(T::default());
    }
    parse_field(text, line, range, field)
}

/// Decimal with an optional sign and leading point, e.g. `" .00001264"` or `"-.00000205"`.
fn parse_decimal(
    text: &str,
    line: u8,
    range: std::ops::Range<usize>,
    field: &'static str,
) -> Result<f64, TleError> {
    let raw = text[range.clone()].trim();
    let normalized = if let Some(rest) = raw.strip_prefix("-.") {
        format!("-0.{rest}")
    } else if let Some(rest) = raw.strip_prefix("+.") {
        format!("0.{rest}")
    } else if let Some(rest) = raw.strip_prefix('.') {
        format!("0.{rest}")
    } else {
        raw.to_string()
    };
    normalized
        .parse()
        .map_err(|_| field_error(text, line, range, field))
}

fn parse_packed_field(
    text: &str,
    line: u8,
    range: std::ops::Range<usize>,
    field: &'static str,
) -> Result<f64, TleError> {
    parse_packed_exponent(&text[range.clone()]).ok_or_else(|| field_error(text, line, range, field))
}

/// Eccentricity is seven digits with an implied leading decimal point.
fn parse_eccentricity(text: &str) -> Result<f64, TleError> {
    let raw = text[26..33].trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(field_error(text, 2, 26..33, "eccentricity"));
    }
    format!("0.{raw}")
        .parse()
        .map_err(|_| field_error(text, 2, 26..33, "eccentricity"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    const ISS_1: &str = "1 25544U 98067A   20029.54791435  .00001264  00000-0  29621-4 0  9998";
    const ISS_2: &str = "2 25544  51.6435 350.5005 0007413  58.5007  44.8617 15.49515345210863";

    #[test]
    fn parses_iss_fields() {
        let tle = TleRecord::parse(ISS_1, ISS_2).unwrap();
        assert_eq!(tle.catalog_number, 25544);
        assert_eq!(tle.classification, 'U');
        assert_eq!(tle.international_designator, "98067A");
        assert_eq!(tle.epoch_year, 20);
        assert!((tle.epoch_day - 29.54791435).abs() < 1e-12);
        assert!((tle.mean_motion_dot - 0.00001264).abs() < 1e-15);
        assert_eq!(tle.mean_motion_ddot, 0.0);
        assert!((tle.bstar - 0.29621e-4).abs() < 1e-15);
        assert_eq!(tle.element_set_number, 999);
        assert!((tle.inclination_deg - 51.6435).abs() < 1e-12);
        assert!((tle.raan_deg - 350.5005).abs() < 1e-12);
        assert!((tle.eccentricity - 0.0007413).abs() < 1e-15);
        assert!((tle.arg_perigee_deg - 58.5007).abs() < 1e-12);
        assert!((tle.mean_anomaly_deg - 44.8617).abs() < 1e-12);
        assert!((tle.mean_motion_rev_day - 15.49515345).abs() < 1e-12);
        assert_eq!(tle.revolution_number, 21086);
    }

    #[test]
    fn parse_is_idempotent() {
        let a = TleRecord::parse(ISS_1, ISS_2).unwrap();
        let b = TleRecord::parse(ISS_1, ISS_2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn three_line_set_keeps_name() {
        let text = format!("ISS (ZARYA)\n{ISS_1}\n{ISS_2}\n");
        let tle: TleRecord = text.parse().unwrap();
        assert_eq!(tle.name.as_deref(), Some("ISS (ZARYA)"));
        assert_eq!(tle.display_name(), "ISS (ZARYA)");
    }

    #[rstest]
    #[case(" 29621-4", 0.29621e-4)]
    #[case("-11606-4", -0.11606e-4)]
    #[case(" 00000-0", 0.0)]
    #[case(" 00000+0", 0.0)]
    #[case("+12345-3", 0.12345e-3)]
    #[case(" 10000-3", 1.0e-4)]
    #[case(" 14311-1", 0.014311)]
    fn packed_exponent(#[case] field: &str, #[case] expected: f64) {
        // Decoded with a single rounding, so it matches the literal exactly.
        assert_eq!(parse_packed_exponent(field), Some(expected), "{field}");
    }

    #[rstest]
    #[case("12a45-3")]
    #[case("12345")]
    #[case("-")]
    fn packed_exponent_rejects_garbage(#[case] field: &str) {
        assert!(parse_packed_exponent(field).is_none());
    }

    #[test]
    fn checksum_counts_minus_signs() {
        assert_eq!(checksum(ISS_1), 8);
        assert_eq!(checksum(ISS_2), 3);
        assert_eq!(checksum("1 -----"), 6);
    }

    #[test]
    fn rejects_wrong_stated_checksum() {
        let bad = "1 25544U 98067A   20029.54791435  .00001264  00000-0  29621-4 0  9993";
        assert_eq!(
            TleRecord::parse(bad, ISS_2),
            Err(TleError::Checksum {
                line: 1,
                stated: 3,
                computed: 8
            })
        );
    }

    #[test]
    fn rejects_short_line() {
        let short = &ISS_1[..60];
        assert!(matches!(
            TleRecord::parse(short, ISS_2),
            Err(TleError::Length { line: 1, found: 60 })
        ));
    }

    #[test]
    fn rejects_swapped_lines() {
        assert!(matches!(
            TleRecord::parse(ISS_2, ISS_1),
            Err(TleError::LineNumber { line: 1 })
        ));
    }

    #[test]
    fn rejects_catalog_mismatch() {
        let other = "2 25545  51.6435 350.5005 0007413  58.5007  44.8617 15.49515345210864";
        assert!(matches!(
            TleRecord::parse(ISS_1, other),
            Err(TleError::CatalogMismatch {
                line1: 25544,
                line2: 25545
            })
        ));
    }

    #[test]
    fn rejects_bad_numeric_field() {
        let mut line = ISS_2.to_string();
        line.replace_range(8..16, " 51.6x35");
        let fixed = format!("{}{}", &line[..68], checksum(&line));
        assert!(matches!(
            TleRecord::parse(ISS_1, &fixed),
            Err(TleError::Field {
                line: 2,
                field: "inclination",
                ..
            })
        ));
    }

    #[test]
    fn trailing_whitespace_is_ignored() {
        let padded = format!("{ISS_1}  \r");
        assert!(TleRecord::parse(&padded, ISS_2).is_ok());
    }

    proptest! {
        #[test]
        fn any_checksum_flip_is_rejected(delta in 1u8..10) {
            for (which, line) in [(1u8, ISS_1), (2u8, ISS_2)] {
                let stated = line.as_bytes()[68] - b'0';
                let flipped = (stated + delta) % 10;
                let mutated = format!("{}{}", &line[..68], flipped);
                let result = if which == 1 {
                    TleRecord::parse(&mutated, ISS_2)
                } else {
                    TleRecord::parse(ISS_1, &mutated)
                };
                let is_checksum_error = matches!(result, Err(TleError::Checksum { .. }));
                prop_assert!(is_checksum_error);
            }
        }
    }
}
