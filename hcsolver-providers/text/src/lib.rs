//! Text provider reading labeled points from line-based UTF-8 sources.
//!
//! Each record is `<identifier> <c1> <c2> ... <cn>` with tokens separated by
//! whitespace and/or commas. Blank lines and `#` comments are skipped.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hcsolver_core::{Point, PointSet};

mod errors;
mod parse;

pub use errors::PointFileError;

/// Labeled points loaded from a text source.
#[derive(Debug, Clone)]
pub struct PointFileProvider {
    name: String,
    points: PointSet,
}

impl PointFileProvider {
    /// Reads points from `reader`.
    ///
    /// # Errors
    /// Returns [`PointFileError`] for malformed records, inconsistent
    /// dimensions, duplicate identifiers, or read failures. Read failures,
    /// including invalid UTF-8, name the line being read.
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    /// use hcsolver_providers_text::PointFileProvider;
    ///
    /// let input = "# demo\nA 0 0\nB 1,0\n";
    /// let provider = PointFileProvider::try_from_reader("demo", Cursor::new(input))?;
    /// assert_eq!(provider.points().len(), 2);
    /// assert_eq!(provider.points().dimension(), 2);
    /// # Ok::<(), hcsolver_providers_text::PointFileError>(())
    /// ```
    pub fn try_from_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, PointFileError> {
        let mut points: Vec<Point> = Vec::new();
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut dimension: Option<usize> = None;

        for (offset, raw) in reader.lines().enumerate() {
            let line = offset + 1;
            let raw = raw.map_err(|source| PointFileError::Io { line, source })?;
            let Some(point) = parse::parse_line(line, &raw)? else {
                continue;
            };

            let expected = *dimension.get_or_insert(point.dimension());
            if point.dimension() != expected {
                return Err(PointFileError::DimensionMismatch {
                    line,
                    id: point.id().to_owned(),
                    expected,
                    actual: point.dimension(),
                });
            }
            if let Some(&first_line) = first_seen.get(point.id()) {
                return Err(PointFileError::DuplicateIdentifier {
                    line,
                    id: point.id().to_owned(),
                    first_line,
                });
            }
            first_seen.insert(point.id().to_owned(), line);
            points.push(point);
        }

        Ok(Self {
            name: name.into(),
            points: PointSet::try_new(points)?,
        })
    }

    /// Opens and reads the file at `path`, named after its path.
    ///
    /// # Errors
    /// Returns [`PointFileError::Open`] when the file cannot be opened, and
    /// any error [`Self::try_from_reader`] reports.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PointFileError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PointFileError::Open {
            path: path.to_owned(),
            source,
        })?;
        Self::try_from_reader(path.display().to_string(), BufReader::new(file))
    }

    /// Human-readable source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Points in file order.
    #[must_use]
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Consumes the provider, returning its points.
    #[must_use]
    pub fn into_points(self) -> PointSet {
        self.points
    }
}
