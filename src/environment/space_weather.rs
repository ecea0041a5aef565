use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::environment::EnvironmentError;
use crate::time::calendar_mjd;

/// Daily solar flux and geomagnetic index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpaceWeatherRecord {
    pub mjd: i64,
    /// 10.7 cm solar radio flux in solar flux units.
    pub f107: f64,
    pub ap: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SpaceWeatherTable {
    records: BTreeMap<i64, SpaceWeatherRecord>,
}

impl SpaceWeatherTable {
    pub fn from_records(records: impl IntoIterator<Item = SpaceWeatherRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.mjd, r)).collect(),
        }
    }

    /// Parse `YYYY MM DD F10.7 Ap` lines. `#` starts a comment; malformed
    /// lines are logged and skipped.
    pub fn parse(text: &str) -> Self {
        let mut records = BTreeMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            match parse_line(idx + 1, line) {
                Ok(record) => {
                    records.insert(record.mjd, record);
                }
                Err(e) => log::warn!("Skipping space weather record: {}", e),
            }
        }
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self, EnvironmentError> {
        let table = Self::parse(&fs::read_to_string(path)?);
        log::info!(
            "Loaded {} space weather records from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn get(&self, mjd: f64) -> Option<&SpaceWeatherRecord> {
        self.records.get(&(mjd.floor() as i64))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_line(line_no: usize, line: &str) -> Result<SpaceWeatherRecord, EnvironmentError> {
    let err = |message: String| EnvironmentError::Parse {
        line: line_no,
        message,
    };
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [year, month, day, f107, ap] = fields[..] else {
        return Err(err(format!("expected 5 fields, found {}", fields.len())));
    };

    let year: i32 = year
        .parse()
        .map_err(|_| err(format!("invalid year: {:?}", year)))?;
    let month: u32 = month
        .parse()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| err(format!("invalid month: {:?}", month)))?;
    let day: u32 = day
        .parse()
        .ok()
        .filter(|d| (1..=31).contains(d))
        .ok_or_else(|| err(format!("invalid day: {:?}", day)))?;
    let f107: f64 = f107
        .parse()
        .map_err(|_| err(format!("invalid F10.7: {:?}", f107)))?;
    let ap: f64 = ap
        .parse()
        .map_err(|_| err(format!("invalid Ap: {:?}", ap)))?;

    Ok(SpaceWeatherRecord {
        mjd: calendar_mjd(year, month, day),
        f107,
        ap,
    })
}
