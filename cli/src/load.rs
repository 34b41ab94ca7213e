use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use city_graph_core::LocationRecord;
use thiserror::Error;

/// Failures while reading a city data file. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("read failed: {0}")]
    Read(#[from] io::Error),

    #[error("file is empty: expected a city count on line 1")]
    MissingHeader,

    #[error("line {line}: expected {expected}, found '{found}'")]
    Parse {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: record for '{label}' ends before its coordinates")]
    Truncated { line: usize, label: String },
}

/// Read every city record from the file at `path`.
pub fn read_locations(path: &Path) -> Result<Vec<LocationRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    parse_locations(BufReader::new(file))
}

/// Parse the city data format.
///
/// Line 1 holds the declared number of cities. Each city then takes three
/// lines: a `"City, Region"` label (a bare `"City"` doubles as its own
/// region), the longitude, and the latitude. Parsing stops at end of input or
/// at the first empty label line.
pub fn parse_locations<R: BufRead>(reader: R) -> Result<Vec<LocationRecord>, LoadError> {
    let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));

    let declared = match lines.next() {
        Some((line, text)) => {
            let text = text?;
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(LoadError::MissingHeader);
            }
            trimmed.parse::<usize>().map_err(|_| LoadError::Parse {
                line,
                expected: "a city count",
                found: trimmed.to_string(),
            })?
        }
        None => return Err(LoadError::MissingHeader),
    };

    let mut records = Vec::with_capacity(declared);
    while let Some((label_line, label)) = lines.next() {
        let label = label?;
        let label = label.trim();
        if label.is_empty() {
            break;
        }

        let mut coordinate = |expected: &'static str| -> Result<f64, LoadError> {
            let (line, text) = lines.next().ok_or_else(|| LoadError::Truncated {
                line: label_line,
                label: label.to_string(),
            })?;
            let text = text?;
            let trimmed = text.trim();
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| LoadError::Parse {
                    line,
                    expected,
                    found: trimmed.to_string(),
                })
        };
        let longitude = coordinate("a longitude")?;
        let latitude = coordinate("a latitude")?;

        records.push(LocationRecord::from_label(label, longitude, latitude));
    }

    if records.len() != declared {
        log::warn!(
            "file declares {} cities but contains {}; using the records found",
            declared,
            records.len()
        );
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn parse(text: &str) -> Result<Vec<LocationRecord>, LoadError> {
        parse_locations(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_parse_basic() {
        let records = parse("2\nApple Valley, CA\n-2.046\n0.603\nChico, CA\n-2.126\n0.693\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], LocationRecord::new("Apple Valley", "CA", -2.046, 0.603));
        assert_eq!(records[1].name, "Chico");
        assert_eq!(records[1].latitude, 0.693);
    }

    #[test]
    fn test_parse_bare_name_region() {
        let records = parse("1\nSingapore\n1.81\n0.02\n").unwrap();
        assert_eq!(records[0].region, "Singapore");
    }

    #[test]
    fn test_parse_stops_at_blank_line() {
        let records = parse("3\nA, X\n1\n2\n\nB, Y\n3\n4\n").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_tolerates_crlf() {
        let records = parse("1\r\nA, X\r\n1.5\r\n-0.5\r\n").unwrap();
        assert_eq!(records[0], LocationRecord::new("A", "X", 1.5, -0.5));
    }

    #[test]
    fn test_parse_count_mismatch_uses_records() {
        let records = parse("5\nA, X\n1\n2\n").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse(""), Err(LoadError::MissingHeader)));
        assert!(matches!(parse("\nA, X\n1\n2\n"), Err(LoadError::MissingHeader)));
    }

    #[test]
    fn test_parse_bad_count() {
        match parse("many\nA, X\n1\n2\n") {
            Err(LoadError::Parse { line, found, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(found, "many");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_coordinate_reports_line() {
        match parse("2\nA, X\n1\n2\nB, Y\nwest\n4\n") {
            Err(LoadError::Parse { line, expected, .. }) => {
                assert_eq!(line, 6);
                assert_eq!(expected, "a longitude");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(matches!(
            parse("1\nA, X\n1\nNaN\n"),
            Err(LoadError::Parse { line: 4, .. })
        ));
    }

    #[test]
    fn test_parse_truncated_record() {
        match parse("1\nA, X\n1\n") {
            Err(LoadError::Truncated { line, label }) => {
                assert_eq!(line, 2);
                assert_eq!(label, "A, X");
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "2\nBakersfield, CA\n-2.085\n0.615\nReno, NV\n-2.089\n0.689\n").unwrap();
        let records = read_locations(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].region, "NV");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_locations(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().contains("nope.txt"));
    }
}
