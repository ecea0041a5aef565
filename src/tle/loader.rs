use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::tle::error::{LoadError, TleError};
use crate::tle::parser::TleRecord;

/// A directory of `.tle`/`.txt` catalogue files, keyed by catalog number.
pub struct TleLoader {
    tle_dir: PathBuf,
    satellites: BTreeMap<u32, TleRecord>,
}

impl TleLoader {
    pub fn new(tle_dir: PathBuf) -> Self {
        Self {
            tle_dir,
            satellites: BTreeMap::new(),
        }
    }

    /// Load every catalogue file in the directory. A later file wins when two
    /// files carry the same catalog number.
    pub fn load_all(&mut self) -> Result<(), LoadError> {
        if !self.tle_dir.is_dir() {
            return Err(LoadError::DirectoryNotFound(
                self.tle_dir.display().to_string(),
            ));
        }

        self.satellites.clear();

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.tle_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_catalog_file(path))
            .collect();
        paths.sort();

        for path in paths {
            match load_file(&path) {
                Ok(records) => {
                    for record in records {
                        self.satellites.insert(record.catalog_number, record);
                    }
                }
                Err(e) => {
                    log::warn!("Failed to read TLE file {}: {}", path.display(), e);
                }
            }
        }

        log::info!(
            "Loaded {} satellites from {}",
            self.satellites.len(),
            self.tle_dir.display()
        );
        Ok(())
    }

    pub fn satellites(&self) -> impl Iterator<Item = &TleRecord> {
        self.satellites.values()
    }

    pub fn get(&self, catalog_number: u32) -> Option<&TleRecord> {
        self.satellites.get(&catalog_number)
    }

    pub fn reload(&mut self) -> Result<(), LoadError> {
        self.load_all()
    }
}

fn is_catalog_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tle") | Some("txt")
    )
}

/// Read a single catalogue file.
pub fn load_file(path: &Path) -> Result<Vec<TleRecord>, LoadError> {
    let content = fs::read_to_string(path)?;
    Ok(parse_catalog(&content))
}

/// Parse every two- or three-line set in `content`. Sets that fail
/// validation are logged and skipped.
pub fn parse_catalog(content: &str) -> Vec<TleRecord> {
    parse_catalog_sets(content)
        .into_iter()
        .filter_map(|(line, result)| match result {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping TLE set at line {}: {}", line, e);
                None
            }
        })
        .collect()
}

/// Every set found in `content` with the 1-based line it starts on, failed
/// ones included. Lines that do not start a set are ignored.
pub fn parse_catalog_sets(content: &str) -> Vec<(usize, Result<TleRecord, TleError>)> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(n, l)| (n + 1, l.trim_end()))
        .filter(|(_, l)| !l.trim().is_empty())
        .collect();

    let mut sets = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let is_line = |k: usize, marker: &str| {
            lines
                .get(k)
                .is_some_and(|(_, l)| l.starts_with(marker))
        };
        let (start, _) = lines[i];
        if is_line(i, "1 ") && is_line(i + 1, "2 ") {
            sets.push((start, TleRecord::parse(lines[i].1, lines[i + 1].1)));
            i += 2;
        } else if is_line(i + 1, "1 ") && is_line(i + 2, "2 ") {
            sets.push((
                start,
                TleRecord::parse_named(lines[i].1, lines[i + 1].1, lines[i + 2].1),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    sets
}
