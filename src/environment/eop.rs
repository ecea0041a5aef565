use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::environment::EnvironmentError;

/// Shortest finals2000A line that still carries UT1-UTC.
const MIN_LINE_LEN: usize = 68;

/// One day of Earth orientation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EopRecord {
    pub mjd: i64,
    pub xp_arcsec: f64,
    pub yp_arcsec: f64,
    /// UT1 − UTC in seconds.
    pub ut1_utc: f64,
}

/// Daily EOP values keyed by integer MJD.
#[derive(Debug, Clone, Default)]
pub struct EopTable {
    records: BTreeMap<i64, EopRecord>,
}

impl EopTable {
    pub fn from_records(records: impl IntoIterator<Item = EopRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.mjd, r)).collect(),
        }
    }

    /// Parse IERS finals2000A text. Short lines and lines whose fields are
    /// blank (the unfilled prediction tail) are skipped; unparseable lines
    /// are logged and skipped.
    pub fn parse(text: &str) -> Self {
        let mut records = BTreeMap::new();
        for (idx, line) in text.lines().enumerate() {
            match parse_line(idx + 1, line) {
                Ok(Some(record)) => {
                    records.insert(record.mjd, record);
                }
                Ok(None) => {}
                Err(e) => log::warn!("Skipping EOP record: {}", e),
            }
        }
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self, EnvironmentError> {
        let table = Self::parse(&fs::read_to_string(path)?);
        log::info!(
            "Loaded {} EOP records from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Record covering the day that contains `mjd`, if any.
    pub fn get(&self, mjd: f64) -> Option<&EopRecord> {
        let (_, record) = self.records.range(..=mjd.floor() as i64).next_back()?;
        (mjd - (record.mjd as f64) < 1.0).then_some(record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_line(line_no: usize, line: &str) -> Result<Option<EopRecord>, EnvironmentError> {
    if line.len() < MIN_LINE_LEN {
        return Ok(None);
    }
    let fields = (
        column(line, 7..15),
        column(line, 18..27),
        column(line, 37..46),
        column(line, 58..68),
    );
    let (Some(mjd), Some(xp), Some(yp), Some(ut1)) = fields else {
        return Ok(None);
    };

    let number = |name: &str, s: &str| {
        f64::from_str(s).map_err(|_| EnvironmentError::Parse {
            line: line_no,
            message: format!("invalid {}: {:?}", name, s),
        })
    };
    Ok(Some(EopRecord {
        mjd: number("MJD", mjd)?.floor() as i64,
        xp_arcsec: number("x-pole", xp)?,
        yp_arcsec: number("y-pole", yp)?,
        ut1_utc: number("UT1-UTC", ut1)?,
    }))
}

/// Trimmed fixed-width field, `None` when blank or out of range.
fn column(line: &str, range: std::ops::Range<usize>) -> Option<&str> {
    let field = line.get(range)?.trim();
    (!field.is_empty()).then_some(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
20 1 1 58849.00 I  0.076516 0.000029  0.282212 0.000032  I-0.1771554 0.0000078  0.2801 0.0060  I     0.095    0.300     0.011    0.300  0.076475  0.282262 -0.1771641
20 1 2 58850.00 I  0.074624 0.000029  0.282916 0.000030  I-0.1777864 0.0000097  0.3476 0.0063  I     0.097    0.300     0.017    0.300  0.074601  0.282969 -0.1778005
short line
20 1 4 58852.00 P  0.07xx16 0.000029  0.282212 0.000032  I-0.1771554 0.0000078
21 1 1 59215.00                                                                   
";

    #[test]
    fn parses_fixed_columns() {
        let table = EopTable::parse(SAMPLE);
        assert_eq!(table.len(), 2);
        let rec = table.get(58_849.0).unwrap();
        assert_eq!(rec.mjd, 58_849);
        assert!((rec.xp_arcsec - 0.076516).abs() < 1e-12);
        assert!((rec.yp_arcsec - 0.282212).abs() < 1e-12);
        assert!((rec.ut1_utc + 0.1771554).abs() < 1e-12);
    }

    #[test]
    fn lookup_within_day() {
        let table = EopTable::parse(SAMPLE);
        assert_eq!(table.get(58_850.99).map(|r| r.mjd), Some(58_850));
        assert!(table.get(58_851.2).is_none());
        assert!(table.get(58_848.5).is_none());
    }

    #[test]
    fn bad_number_reports_line() {
        let line = SAMPLE.lines().nth(3).unwrap();
        match parse_line(4, line) {
            Err(EnvironmentError::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("unexpected {:?}", other),
        }
    }
}
