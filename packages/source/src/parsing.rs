//! Cell parsing helpers for the incident reader.

/// Returns the trimmed cell text, or `None` if it is empty.
#[must_use]
pub fn non_empty(cell: Option<&str>) -> Option<&str> {
    let trimmed = cell?.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Parses a coordinate cell. Returns `None` if the cell is missing, empty,
/// or not a number. `0.0` is a valid coordinate.
#[must_use]
pub fn parse_coordinate(cell: Option<&str>) -> Option<f64> {
    let text = non_empty(cell)?;
    match text.parse::<f64>() {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("Unparseable coordinate '{text}': {e}");
            None
        }
    }
}
