//! Line-level parsing of point records.
use hcsolver_core::Point;

use crate::errors::PointFileError;

/// Splits a record into tokens on whitespace and commas, skipping empties.
fn tokens(record: &str) -> impl Iterator<Item = &str> {
    record
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
}

fn is_identifier(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parses one line. Returns `Ok(None)` for blank lines and `#` comments.
pub(crate) fn parse_line(line: usize, raw: &str) -> Result<Option<Point>, PointFileError> {
    let record = raw.trim();
    if record.is_empty() || record.starts_with('#') {
        return Ok(None);
    }

    let mut parts = tokens(record);
    let Some(id) = parts.next() else {
        return Ok(None);
    };
    if !is_identifier(id) {
        return Err(PointFileError::InvalidIdentifier {
            line,
            token: id.to_owned(),
        });
    }

    let coordinates = parts
        .enumerate()
        .map(|(position, token)| {
            token
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| PointFileError::InvalidCoordinate {
                    line,
                    id: id.to_owned(),
                    position,
                    token: token.to_owned(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if coordinates.is_empty() {
        return Err(PointFileError::MissingCoordinates {
            line,
            id: id.to_owned(),
        });
    }
    Ok(Some(Point::new(id, coordinates)))
}
