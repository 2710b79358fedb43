//! Gauss coefficient tables
//!
//! A coefficient source is line oriented text:
//!
//! ```text
//!     2025.0            WMM-2025     11/13/2024
//!   1  0  -29351.8       0.0       12.0        0.0
//!   1  1   -1410.8    4545.4        9.7      -21.5
//! ...
//! 999999999999999999999999999999999999999999999999
//! ```
//!
//! The first line is a header. Every following line holds the six fields
//! `n m g h dg dh` until a line whose first token starts with `999`.
//! Anything after that sentinel is ignored.

use crate::errors::ModelLoadError;
use crate::FloatValue;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

const SENTINEL: &str = "999";
const FIELDS_PER_RECORD: usize = 6;

/// A single spherical-harmonic term of the main-field model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelCoefficient {
    /// Degree `n`
    pub degree: usize,
    /// Order `m`, never larger than `degree`
    pub order: usize,
    /// Cosine Gauss coefficient
    /// unit: nT
    pub g: FloatValue,
    /// Sine Gauss coefficient
    /// unit: nT
    pub h: FloatValue,
    /// Secular variation of `g`
    /// unit: nT / yr
    pub dg: FloatValue,
    /// Secular variation of `h`
    /// unit: nT / yr
    pub dh: FloatValue,
}

impl ModelCoefficient {
    pub fn new(
        degree: usize,
        order: usize,
        g: FloatValue,
        h: FloatValue,
        dg: FloatValue,
        dh: FloatValue,
    ) -> Self {
        Self {
            degree,
            order,
            g,
            h,
            dg,
            dh,
        }
    }

    /// Linearly extrapolate the coefficient pair `elapsed_years` away from the epoch
    ///
    /// Returns `(g + dt * dg, h + dt * dh)`. Negative `elapsed_years` extrapolate backwards.
    pub fn at_elapsed(&self, elapsed_years: FloatValue) -> (FloatValue, FloatValue) {
        (
            self.g + elapsed_years * self.dg,
            self.h + elapsed_years * self.dh,
        )
    }
}

/// Immutable, ordered set of model coefficients
///
/// Shared read-only between evaluations through an [`Arc`].
/// Deserialized tables go through the same index checks as parsed ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRecord")]
pub struct CoefficientTable {
    header: String,
    max_degree: usize,
    coefficients: Vec<ModelCoefficient>,
}

#[derive(Deserialize)]
struct TableRecord {
    #[serde(default)]
    header: String,
    max_degree: usize,
    coefficients: Vec<ModelCoefficient>,
}

impl TryFrom<TableRecord> for CoefficientTable {
    type Error = ModelLoadError;

    fn try_from(record: TableRecord) -> Result<Self, Self::Error> {
        let mut table = Self::from_coefficients(record.coefficients, record.max_degree)?;
        table.header = record.header;
        Ok(table)
    }
}

impl CoefficientTable {
    /// Build a table from already-parsed coefficients
    ///
    /// Each coefficient must satisfy `1 <= n <= max_degree` and `m <= n`.
    pub fn from_coefficients(
        coefficients: Vec<ModelCoefficient>,
        max_degree: usize,
    ) -> Result<Self, ModelLoadError> {
        if coefficients.is_empty() {
            return Err(ModelLoadError::EmptyTable);
        }
        for (i, c) in coefficients.iter().enumerate() {
            check_indices(i + 1, c.degree, c.order, max_degree)?;
        }
        Ok(Self {
            header: String::new(),
            max_degree,
            coefficients,
        })
    }

    /// Parse a coefficient source held in memory
    pub fn parse(source: &str, max_degree: usize) -> Result<Self, ModelLoadError> {
        let mut lines = source.lines().enumerate();
        let header = match lines.next() {
            Some((_, header)) => header.trim().to_string(),
            None => return Err(ModelLoadError::MissingHeader),
        };

        let mut coefficients = Vec::new();
        for (index, line) in lines {
            let line_number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with(SENTINEL) {
                break;
            }
            coefficients.push(parse_record(trimmed, line_number, max_degree)?);
        }

        if coefficients.is_empty() {
            return Err(ModelLoadError::EmptyTable);
        }

        Ok(Self {
            header,
            max_degree,
            coefficients,
        })
    }

    /// Read and parse a coefficient file
    pub fn from_file(path: impl AsRef<Path>, max_degree: usize) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| ModelLoadError::Io {
            path: path.to_path_buf(),
            source: Arc::new(e),
        })?;
        let table = Self::parse(&source, max_degree)?;
        debug!(
            "Loaded {} coefficients from {} ({})",
            table.len(),
            path.display(),
            table.header()
        );
        Ok(table)
    }

    /// The header line of the source, verbatim apart from surrounding whitespace
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Degree the table was validated against
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelCoefficient> {
        self.coefficients.iter()
    }

    pub fn as_slice(&self) -> &[ModelCoefficient] {
        &self.coefficients
    }
}

fn parse_record(
    line: &str,
    line_number: usize,
    max_degree: usize,
) -> Result<ModelCoefficient, ModelLoadError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != FIELDS_PER_RECORD {
        return Err(ModelLoadError::MalformedLine {
            line: line_number,
            reason: format!(
                "expected {} fields (n m g h dg dh), found {}",
                FIELDS_PER_RECORD,
                fields.len()
            ),
        });
    }

    let degree = parse_index(fields[0], "n", line_number)?;
    let order = parse_index(fields[1], "m", line_number)?;
    check_indices(line_number, degree, order, max_degree)?;

    Ok(ModelCoefficient {
        degree,
        order,
        g: parse_value(fields[2], "g", line_number)?,
        h: parse_value(fields[3], "h", line_number)?,
        dg: parse_value(fields[4], "dg", line_number)?,
        dh: parse_value(fields[5], "dh", line_number)?,
    })
}

fn parse_index(field: &str, name: &str, line: usize) -> Result<usize, ModelLoadError> {
    field
        .parse::<usize>()
        .map_err(|_| ModelLoadError::MalformedLine {
            line,
            reason: format!("{name} must be a non-negative integer, got '{field}'"),
        })
}

fn parse_value(field: &str, name: &str, line: usize) -> Result<FloatValue, ModelLoadError> {
    match field.parse::<FloatValue>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ModelLoadError::MalformedLine {
            line,
            reason: format!("{name} must be a finite number, got '{field}'"),
        }),
    }
}

fn check_indices(
    line: usize,
    degree: usize,
    order: usize,
    max_degree: usize,
) -> Result<(), ModelLoadError> {
    if degree == 0 || degree > max_degree {
        return Err(ModelLoadError::DegreeOutOfRange {
            line,
            degree,
            max_degree,
        });
    }
    if order > degree {
        return Err(ModelLoadError::OrderExceedsDegree {
            line,
            degree,
            order,
        });
    }
    Ok(())
}

/// Lazily loaded coefficient table backed by a file
///
/// The file is read at most once, on the first call to [`CoefficientStore::table`].
/// Concurrent first callers block until that single load completes.
/// The outcome is cached either way; a failed load is never retried.
#[derive(Debug)]
pub struct CoefficientStore {
    path: PathBuf,
    max_degree: usize,
    cell: OnceLock<Result<Arc<CoefficientTable>, ModelLoadError>>,
}

impl CoefficientStore {
    pub fn new(path: impl Into<PathBuf>, max_degree: usize) -> Self {
        Self {
            path: path.into(),
            max_degree,
            cell: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a load has already been attempted
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The shared coefficient table, loading it on first access
    pub fn table(&self) -> Result<Arc<CoefficientTable>, ModelLoadError> {
        self.cell
            .get_or_init(|| CoefficientTable::from_file(&self.path, self.max_degree).map(Arc::new))
            .clone()
    }
}
