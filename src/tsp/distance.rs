//! Precomputed pairwise distances.
//!
//! [`DistanceMatrix`] is built once per problem instance and then shared
//! read-only (typically behind an `Arc`) by every concurrent run.
//! Lookups are a single index into a flat row-major buffer.

use crate::error::{TspError, TspResult};

/// A node position in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Coord {
    /// Creates a coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance rounded to the nearest integer (TSPLIB `EUC_2D`).
    pub fn rounded_distance(&self, other: &Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt().round()
    }
}

/// Layout of an explicit weight list.
///
/// Triangular layouts are mirrored into a full symmetric matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeWeightFormat {
    /// All `n * n` entries, row by row.
    FullMatrix,
    /// Strict upper triangle, row by row.
    UpperRow,
    /// Strict lower triangle, row by row.
    LowerRow,
    /// Upper triangle including the diagonal.
    UpperDiagRow,
    /// Lower triangle including the diagonal.
    LowerDiagRow,
}

impl EdgeWeightFormat {
    /// Parses a TSPLIB `EDGE_WEIGHT_FORMAT` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "FULL_MATRIX" => Some(Self::FullMatrix),
            "UPPER_ROW" => Some(Self::UpperRow),
            "LOWER_ROW" => Some(Self::LowerRow),
            "UPPER_DIAG_ROW" => Some(Self::UpperDiagRow),
            "LOWER_DIAG_ROW" => Some(Self::LowerDiagRow),
            _ => None,
        }
    }

    /// Number of values this layout holds for `n` nodes, or `None` if the
    /// count overflows `usize`.
    pub fn value_count(self, n: usize) -> Option<usize> {
        match self {
            Self::FullMatrix => n.checked_mul(n),
            Self::UpperRow | Self::LowerRow => half_product(n, n.saturating_sub(1)),
            Self::UpperDiagRow | Self::LowerDiagRow => half_product(n, n.checked_add(1)?),
        }
    }

    /// `(row, col)` cells in the order the values are listed.
    fn cells(self, n: usize) -> Box<dyn Iterator<Item = (usize, usize)>> {
        match self {
            Self::FullMatrix => Box::new((0..n).flat_map(move |r| (0..n).map(move |c| (r, c)))),
            Self::UpperRow => Box::new((0..n).flat_map(move |r| (r + 1..n).map(move |c| (r, c)))),
            Self::LowerRow => Box::new((0..n).flat_map(move |r| (0..r).map(move |c| (r, c)))),
            Self::UpperDiagRow => Box::new((0..n).flat_map(move |r| (r..n).map(move |c| (r, c)))),
            Self::LowerDiagRow => Box::new((0..n).flat_map(move |r| (0..=r).map(move |c| (r, c)))),
        }
    }
}

/// `a * b / 2` where one of `a`, `b` is even.
fn half_product(a: usize, b: usize) -> Option<usize> {
    if a % 2 == 0 {
        (a / 2).checked_mul(b)
    } else {
        a.checked_mul(b / 2)
    }
}

/// Raw data a [`DistanceMatrix`] can be built from.
#[derive(Debug, Clone, PartialEq)]
pub enum DistanceSource {
    /// One coordinate per node; distances are rounded Euclidean.
    Coordinates(Vec<Coord>),
    /// Explicit weights in the given layout.
    Weights {
        /// How `values` is laid out.
        format: EdgeWeightFormat,
        /// The listed weights.
        values: Vec<f64>,
    },
}

/// Immutable symmetric distance table over `dimension` nodes.
///
/// # Invariants
/// - `distance(a, b) == distance(b, a)`
/// - `distance(a, a) == 0`
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    dimension: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds the table for `dimension` nodes.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] if `source` is `None`, if `dimension < 2`,
    /// if the data size does not match `dimension`, or if the data is not
    /// a finite symmetric matrix with a zero diagonal.
    pub fn build(dimension: usize, source: Option<&DistanceSource>) -> TspResult<Self> {
        let source = source.ok_or_else(|| {
            TspError::invalid_input("neither coordinates nor edge weights were supplied")
        })?;
        match source {
            DistanceSource::Coordinates(coords) => Self::from_coordinates(dimension, coords),
            DistanceSource::Weights { format, values } => {
                Self::from_weights(dimension, *format, values)
            }
        }
    }

    /// Builds the table from node coordinates.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] if `dimension < 2`, if `coords` does not
    /// hold exactly `dimension` points, or if a coordinate is not finite.
    pub fn from_coordinates(dimension: usize, coords: &[Coord]) -> TspResult<Self> {
        let cells = cell_count(dimension)?;
        if coords.len() != dimension {
            return Err(TspError::invalid_input(format!(
                "expected {dimension} coordinates, got {}",
                coords.len()
            )));
        }
        if let Some(c) = coords.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(TspError::invalid_input(format!(
                "non-finite coordinate ({}, {})",
                c.x, c.y
            )));
        }

        let mut data = vec![0.0; cells];
        for i in 0..dimension {
            for j in (i + 1)..dimension {
                let d = coords[i].rounded_distance(&coords[j]);
                data[i * dimension + j] = d;
                data[j * dimension + i] = d;
            }
        }
        Ok(Self { dimension, data })
    }

    /// Builds the table from a full row-major `dimension × dimension` matrix.
    pub fn from_full_matrix(dimension: usize, values: &[f64]) -> TspResult<Self> {
        Self::from_weights(dimension, EdgeWeightFormat::FullMatrix, values)
    }

    /// Builds the table from explicit weights in any supported layout.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] if `dimension < 2`, if the weight count
    /// does not match `format`, or if the weights are not a finite
    /// symmetric matrix with a zero diagonal.
    pub fn from_weights(
        dimension: usize,
        format: EdgeWeightFormat,
        values: &[f64],
    ) -> TspResult<Self> {
        let cells = cell_count(dimension)?;
        let expected = format.value_count(dimension).ok_or_else(|| {
            TspError::invalid_input(format!("{format:?} for dimension {dimension} overflows"))
        })?;
        if values.len() != expected {
            return Err(TspError::invalid_input(format!(
                "{format:?} for dimension {dimension} needs {expected} weights, got {}",
                values.len()
            )));
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(TspError::invalid_input(format!("non-finite weight {v}")));
        }

        let mut data = vec![0.0; cells];
        for ((r, c), &v) in format.cells(dimension).zip(values) {
            data[r * dimension + c] = v;
            data[c * dimension + r] = v;
        }

        if format == EdgeWeightFormat::FullMatrix {
            // Mirroring above hides asymmetry; check against the source.
            for r in 0..dimension {
                if values[r * dimension + r] != 0.0 {
                    return Err(TspError::invalid_input(format!(
                        "non-zero diagonal at node {r}"
                    )));
                }
                for c in (r + 1)..dimension {
                    if values[r * dimension + c] != values[c * dimension + r] {
                        return Err(TspError::invalid_input(format!(
                            "asymmetric weights between nodes {r} and {c}"
                        )));
                    }
                }
            }
        } else {
            for r in 0..dimension {
                data[r * dimension + r] = 0.0;
            }
        }

        Ok(Self { dimension, data })
    }

    /// Number of nodes.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Distance between nodes `a` and `b`.
    ///
    /// # Panics
    /// Panics if either id is outside `0..dimension`.
    #[inline]
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        debug_assert!(a < self.dimension && b < self.dimension);
        self.data[a * self.dimension + b]
    }
}

/// Size of the flat table for `dimension` nodes.
fn cell_count(dimension: usize) -> TspResult<usize> {
    if dimension < 2 {
        return Err(TspError::invalid_input(format!(
            "dimension must be at least 2, got {dimension}"
        )));
    }
    dimension
        .checked_mul(dimension)
        .ok_or_else(|| TspError::invalid_input(format!("dimension {dimension} is too large")))
}
