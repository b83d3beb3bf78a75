//! Antenna survey list reader
//!
//! The survey file lists one antenna per line as whitespace separated
//! columns: `name easting northing elevation`. Columns past the fourth are
//! ignored, as are blank lines and `#` comments. A leading column header row
//! is tolerated.

use crate::core::AntennaSurvey;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Default survey file name for the array
pub const DEFAULT_ANTENNA_FILE: &str = "HERA_350.txt";

/// Errors raised while reading a survey file
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("failed to read antenna list")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected `name easting northing elevation`, found {found} column(s)")]
    MissingColumns { line: usize, found: usize },
    #[error("line {line}: invalid {field} \"{value}\"")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// Ordered set of surveyed antennas, keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AntennaList {
    antennas: Vec<AntennaSurvey>,
    index: HashMap<String, usize>,
}

impl AntennaList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the survey list from a file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        debug!("reading antenna list {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse the survey list from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SurveyError> {
        let mut list = Self::new();
        let mut header_allowed = true;

        for (i, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line_number = i + 1;
            let content = line.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            let columns: Vec<&str> = content.split_whitespace().collect();
            if header_allowed && columns.get(1).is_some_and(|c| c.parse::<f64>().is_err()) {
                debug!("skipping header row at line {}", line_number);
                header_allowed = false;
                continue;
            }
            header_allowed = false;

            if columns.len() < 4 {
                return Err(SurveyError::MissingColumns {
                    line: line_number,
                    found: columns.len(),
                });
            }

            let survey = AntennaSurvey {
                name: columns[0].to_string(),
                easting: parse_column(columns[1], "easting", line_number)?,
                northing: parse_column(columns[2], "northing", line_number)?,
                elevation: parse_column(columns[3], "elevation", line_number)?,
            };
            list.insert(survey);
        }

        if list.is_empty() {
            warn!("antenna list contains no antennas");
        }
        Ok(list)
    }

    /// Add a survey record. A repeated name replaces the earlier record in place.
    pub fn insert(&mut self, survey: AntennaSurvey) -> Option<AntennaSurvey> {
        match self.index.get(&survey.name) {
            Some(&idx) => {
                warn!("antenna {} listed more than once, keeping the last entry", survey.name);
                Some(std::mem::replace(&mut self.antennas[idx], survey))
            },
            None => {
                self.index.insert(survey.name.clone(), self.antennas.len());
                self.antennas.push(survey);
                None
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&AntennaSurvey> {
        self.index.get(name).map(|&idx| &self.antennas[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &AntennaSurvey> {
        self.antennas.iter()
    }

    pub fn len(&self) -> usize {
        self.antennas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.antennas.is_empty()
    }
}

impl FromStr for AntennaList {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

impl<'a> IntoIterator for &'a AntennaList {
    type Item = &'a AntennaSurvey;
    type IntoIter = std::slice::Iter<'a, AntennaSurvey>;

    fn into_iter(self) -> Self::IntoIter {
        self.antennas.iter()
    }
}

fn parse_column(value: &str, field: &'static str, line: usize) -> Result<f64, SurveyError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SurveyError::InvalidNumber {
            line,
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURVEY: &str = "\
# HERA antenna survey, UTM 34J
Antenna   Easting      Northing     Elevation
HH0       540901.6     6601070.4    1052.6
HH1       540915.8     6601070.3    1052.6

HH2       540930.1     6601070.4    1052.5   extra
";

    #[test]
    fn test_parse_survey_list() {
        let list: AntennaList = SURVEY.parse().unwrap();

        assert_eq!(list.len(), 3);
        let names: Vec<&str> = list.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["HH0", "HH1", "HH2"]);

        let hh1 = list.get("HH1").unwrap();
        assert_eq!(hh1.easting, 540915.8);
        assert_eq!(hh1.northing, 6601070.3);
        assert_eq!(hh1.elevation, 1052.6);
    }

    #[test]
    fn test_duplicate_keeps_last_in_place() {
        let list: AntennaList = "A 540000 6601000 1050\nB 540010 6601000 1050\nA 540020 6601000 1051\n"
            .parse()
            .unwrap();

        assert_eq!(list.len(), 2);
        let names: Vec<&str> = list.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(list.get("A").unwrap().easting, 540020.0);
        assert_eq!(list.get("A").unwrap().elevation, 1051.0);
    }

    #[test]
    fn test_invalid_number_reports_line() {
        let result = "HH0 540901.6 6601070.4 1052.6\nHH1 540915.8 north 1052.6\n".parse::<AntennaList>();

        match result {
            Err(SurveyError::InvalidNumber { line, field, value }) => {
                assert_eq!(line, 2);
                assert_eq!(field, "northing");
                assert_eq!(value, "north");
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_header_only_allowed_first() {
        // a non-numeric row after data is an error, not a header
        let result = "HH0 540901.6 6601070.4 1052.6\nName Easting Northing Elevation\n".parse::<AntennaList>();
        assert!(matches!(result, Err(SurveyError::InvalidNumber { line: 2, .. })));
    }

    #[test]
    fn test_missing_columns() {
        let result = "HH0 540901.6 6601070.4\n".parse::<AntennaList>();
        assert!(matches!(result, Err(SurveyError::MissingColumns { line: 1, found: 3 })));
    }

    #[test]
    fn test_short_header_row() {
        let list: AntennaList = "Name E N\nHH0 540901.6 6601070.4 1052.6\n".parse().unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.get("HH0").is_some());

        // a single-column first line is not a header
        let result = "HH0\n".parse::<AntennaList>();
        assert!(matches!(result, Err(SurveyError::MissingColumns { line: 1, found: 1 })));
    }

    #[test]
    fn test_empty_list() {
        let list: AntennaList = "# nothing\n\n".parse().unwrap();
        assert!(list.is_empty());

        let list: AntennaList = "Name Easting Northing Elevation\n".parse().unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_rejects_non_finite() {
        let result = "HH0 NaN 6601070.4 1052.6\n".parse::<AntennaList>();
        // NaN in the easting column on the first row looks numeric, so it is not a header
        assert!(matches!(result, Err(SurveyError::InvalidNumber { field: "easting", .. })));
    }
}
