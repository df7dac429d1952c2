//! Student id normalization and validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Student ids are 4 to 12 ASCII digits.
const STUDENT_ID_PATTERN: &str = r"^[0-9]{4,12}$";

static STUDENT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STUDENT_ID_PATTERN).expect("valid regex"));

/// Normalize an optional student id from a request.
///
/// Surrounding whitespace is trimmed and an empty result counts as "not
/// supplied". A non-empty id that does not match [`STUDENT_ID_PATTERN`] is
/// rejected.
pub fn normalize(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if !STUDENT_ID_RE.is_match(trimmed) {
        return Err(CoreError::Validation(
            "Student id must be 4 to 12 digits".to_string(),
        ));
    }
    Ok(Some(trimmed.to_string()))
}
