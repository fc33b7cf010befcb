//! TSPLIB `.tsp` reader.
//!
//! Supports `EDGE_WEIGHT_TYPE` `EUC_2D` (from `NODE_COORD_SECTION`) and
//! `EXPLICIT` (from `EDGE_WEIGHT_SECTION` in full or triangular layouts).

use super::distance::{Coord, DistanceMatrix, DistanceSource, EdgeWeightFormat};
use crate::error::{TspError, TspResult};
use std::path::Path;
use std::sync::Arc;

/// A loaded problem, ready to be shared across runs.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    /// Instance name (`NAME` header, or the file stem).
    pub name: String,
    /// Shared read-only distance table.
    pub distances: Arc<DistanceMatrix>,
}

impl ProblemInstance {
    /// Wraps an already built distance table.
    pub fn new(name: impl Into<String>, distances: DistanceMatrix) -> Self {
        Self {
            name: name.into(),
            distances: Arc::new(distances),
        }
    }

    /// Number of nodes.
    pub fn dimension(&self) -> usize {
        self.distances.dimension()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeWeightType {
    Euc2d,
    Explicit,
}

/// Reads and parses a `.tsp` file.
pub fn read_file(path: impl AsRef<Path>) -> TspResult<ProblemInstance> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_str(&text, &fallback)
}

/// Parses the contents of a `.tsp` file.
///
/// `fallback_name` is used when the file has no `NAME` header.
pub fn parse_str(text: &str, fallback_name: &str) -> TspResult<ProblemInstance> {
    let lines: Vec<&str> = text.lines().collect();

    let name = header_value(&lines, "NAME").unwrap_or(fallback_name).to_string();

    let dimension = match header_line(&lines, "DIMENSION") {
        Some((idx, value)) => value.parse::<usize>().map_err(|_| TspError::Parse {
            line: idx + 1,
            message: format!("invalid DIMENSION '{value}'"),
        })?,
        None => return Err(TspError::invalid_input("DIMENSION missing")),
    };

    let weight_type = match header_value(&lines, "EDGE_WEIGHT_TYPE").unwrap_or("EUC_2D") {
        "EUC_2D" => EdgeWeightType::Euc2d,
        "EXPLICIT" => EdgeWeightType::Explicit,
        other => {
            return Err(TspError::invalid_input(format!(
                "unsupported EDGE_WEIGHT_TYPE={other}"
            )))
        }
    };

    let format_keyword = header_value(&lines, "EDGE_WEIGHT_FORMAT").unwrap_or("FULL_MATRIX");
    let format = EdgeWeightFormat::from_keyword(format_keyword).ok_or_else(|| {
        TspError::invalid_input(format!("unsupported EDGE_WEIGHT_FORMAT={format_keyword}"))
    })?;

    let source = match weight_type {
        EdgeWeightType::Euc2d => parse_coordinates(&lines, dimension)?,
        EdgeWeightType::Explicit => parse_weights(&lines, dimension, format)?,
    };

    let distances = DistanceMatrix::build(dimension, Some(&source))?;
    Ok(ProblemInstance::new(name, distances))
}

fn parse_coordinates(lines: &[&str], dimension: usize) -> TspResult<DistanceSource> {
    let start = section_start(lines, "NODE_COORD_SECTION")?;
    // One node per line, so a larger DIMENSION can never be satisfied.
    let available = lines.len() - start;
    if dimension > available {
        return Err(TspError::invalid_input(format!(
            "DIMENSION {dimension} exceeds the {available} lines after NODE_COORD_SECTION"
        )));
    }
    let mut coords: Vec<Option<Coord>> = vec![None; dimension];
    let mut count = 0;

    for (idx, raw) in lines.iter().enumerate().skip(start) {
        let line = raw.trim();
        if line.is_empty() || line == "EOF" || line.ends_with("_SECTION") {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }
        let id: usize = parse_number(parts[0], idx)?;
        let x: f64 = parse_number(parts[1], idx)?;
        let y: f64 = parse_number(parts[2], idx)?;

        // TSPLIB node ids are 1-based.
        let slot = id
            .checked_sub(1)
            .and_then(|i| coords.get_mut(i))
            .ok_or_else(|| TspError::Parse {
                line: idx + 1,
                message: format!("node id {id} outside 1..={dimension}"),
            })?;
        *slot = Some(Coord::new(x, y));
        count += 1;
    }

    if count != dimension {
        return Err(TspError::invalid_input(format!(
            "expected {dimension} coordinates, got {count}"
        )));
    }
    let coords = coords
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            c.ok_or_else(|| TspError::invalid_input(format!("node {} has no coordinate", i + 1)))
        })
        .collect::<TspResult<Vec<_>>>()?;

    Ok(DistanceSource::Coordinates(coords))
}

fn parse_weights(
    lines: &[&str],
    dimension: usize,
    format: EdgeWeightFormat,
) -> TspResult<DistanceSource> {
    let start = section_start(lines, "EDGE_WEIGHT_SECTION")?;
    let expected = format.value_count(dimension).ok_or_else(|| {
        TspError::invalid_input(format!("DIMENSION {dimension} is too large for {format:?}"))
    })?;
    let mut values = Vec::new();

    for (idx, raw) in lines.iter().enumerate().skip(start) {
        let line = raw.trim();
        if line == "EOF" || line.ends_with("_SECTION") {
            break;
        }
        for token in line.split_whitespace() {
            values.push(parse_number::<f64>(token, idx)?);
        }
    }

    if values.len() < expected {
        return Err(TspError::invalid_input(format!(
            "EDGE_WEIGHT_SECTION has {} values, {format:?} needs {expected}",
            values.len()
        )));
    }
    values.truncate(expected);

    Ok(DistanceSource::Weights { format, values })
}

/// Index of the first line after `section`.
fn section_start(lines: &[&str], section: &str) -> TspResult<usize> {
    lines
        .iter()
        .position(|l| l.trim() == section)
        .map(|i| i + 1)
        .ok_or_else(|| TspError::invalid_input(format!("{section} missing")))
}

/// Finds a `KEY : VALUE` header and returns its line index and value.
fn header_line<'a>(lines: &[&'a str], key: &str) -> Option<(usize, &'a str)> {
    lines.iter().enumerate().find_map(|(idx, raw)| {
        let (k, v) = raw.split_once(':')?;
        (k.trim() == key).then(|| (idx, v.trim()))
    })
}

fn header_value<'a>(lines: &[&'a str], key: &str) -> Option<&'a str> {
    header_line(lines, key).map(|(_, v)| v)
}

fn parse_number<T: std::str::FromStr>(token: &str, idx: usize) -> TspResult<T> {
    token.parse::<T>().map_err(|_| TspError::Parse {
        line: idx + 1,
        message: format!("expected a number, found '{token}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EUC: &str = "\
NAME : square4
TYPE : TSP
COMMENT : four corners
DIMENSION : 4
EDGE_WEIGHT_TYPE : EUC_2D
NODE_COORD_SECTION
1 0 0
2 10 0
3 10 10
4 0 10
EOF
";

    #[test]
    fn test_parse_euc_2d() {
        let p = parse_str(EUC, "fallback").unwrap();
        assert_eq!(p.name, "square4");
        assert_eq!(p.dimension(), 4);
        assert_eq!(p.distances.distance(0, 1), 10.0);
        assert_eq!(p.distances.distance(0, 2), 14.0);
    }

    #[test]
    fn test_parse_explicit_full_matrix() {
        let text = "\
DIMENSION: 3
EDGE_WEIGHT_TYPE: EXPLICIT
EDGE_WEIGHT_FORMAT: FULL_MATRIX
EDGE_WEIGHT_SECTION
0 1 2
1 0 3
2 3 0
EOF
";
        let p = parse_str(text, "tri").unwrap();
        assert_eq!(p.name, "tri");
        assert_eq!(p.distances.distance(0, 2), 2.0);
        assert_eq!(p.distances.distance(1, 2), 3.0);
    }

    #[test]
    fn test_parse_explicit_lower_diag_row_wrapped() {
        // Values may wrap across lines arbitrarily.
        let text = "\
NAME: wrap
DIMENSION: 3
EDGE_WEIGHT_TYPE: EXPLICIT
EDGE_WEIGHT_FORMAT: LOWER_DIAG_ROW
EDGE_WEIGHT_SECTION
0 1 0
2 3
0
DISPLAY_DATA_SECTION
1 0 0
EOF
";
        let p = parse_str(text, "x").unwrap();
        assert_eq!(p.distances.distance(2, 0), 2.0);
        assert_eq!(p.distances.distance(1, 2), 3.0);
        assert_eq!(p.distances.distance(0, 1), 1.0);
    }

    #[test]
    fn test_missing_dimension() {
        let err = parse_str("NAME: x\nNODE_COORD_SECTION\n1 0 0\nEOF\n", "x").unwrap_err();
        assert!(matches!(err, TspError::InvalidInput { .. }), "{err}");
    }

    #[test]
    fn test_missing_section() {
        let err = parse_str("DIMENSION: 2\nEDGE_WEIGHT_TYPE: EUC_2D\nEOF\n", "x").unwrap_err();
        assert!(err.to_string().contains("NODE_COORD_SECTION"), "{err}");
    }

    #[test]
    fn test_unsupported_weight_type() {
        let err = parse_str("DIMENSION: 2\nEDGE_WEIGHT_TYPE: GEO\n", "x").unwrap_err();
        assert!(err.to_string().contains("GEO"), "{err}");
    }

    #[test]
    fn test_coordinate_count_mismatch() {
        let text = "DIMENSION: 3\nNODE_COORD_SECTION\n1 0 0\n2 1 1\nEOF\n";
        assert!(matches!(
            parse_str(text, "x"),
            Err(TspError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_bad_token_reports_line() {
        let text = "DIMENSION: 2\nNODE_COORD_SECTION\n1 0 0\n2 abc 1\nEOF\n";
        match parse_str(text, "x") {
            Err(TspError::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_too_few_weights() {
        let text = "\
DIMENSION: 3
EDGE_WEIGHT_TYPE: EXPLICIT
EDGE_WEIGHT_FORMAT: UPPER_ROW
EDGE_WEIGHT_SECTION
1 2
EOF
";
        assert!(matches!(
            parse_str(text, "x"),
            Err(TspError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_absurd_dimension_with_explicit_weights() {
        let text = "\
DIMENSION: 18446744073709551615
EDGE_WEIGHT_TYPE: EXPLICIT
EDGE_WEIGHT_FORMAT: FULL_MATRIX
EDGE_WEIGHT_SECTION
0
EOF
";
        assert!(matches!(
            parse_str(text, "x"),
            Err(TspError::InvalidInput { .. })
        ));

        let text = text.replace("FULL_MATRIX", "UPPER_ROW");
        assert!(matches!(
            parse_str(&text, "x"),
            Err(TspError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_absurd_dimension_with_coordinates() {
        let text = "DIMENSION: 1000000000000\nNODE_COORD_SECTION\n1 0 0\n2 1 1\nEOF\n";
        let err = parse_str(text, "x").unwrap_err();
        assert!(matches!(err, TspError::InvalidInput { .. }), "{err}");
        assert!(err.to_string().contains("exceeds"), "{err}");
    }
}
