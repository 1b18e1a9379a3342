//! Conversion of rows from the old unordered `word_cache` table.
//!
//! That table stored pairs in whatever order the caller supplied and used
//! `???` for answers that failed to parse.

use crate::logic::{canonicalize, ResultValidator};
use crate::model::CombinationRecord;

pub const LEGACY_UNPARSEABLE: &str = "???";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRow {
    pub first_word: Option<String>,
    pub second_word: Option<String>,
    pub result: Option<String>,
}

/// Canonicalize a legacy row and re-validate its stored answer.
/// Returns `None` for rows with a blank element.
pub fn convert_legacy_row(row: &LegacyRow, validator: &ResultValidator) -> Option<CombinationRecord> {
    let first = row.first_word.as_deref().unwrap_or_default();
    let second = row.second_word.as_deref().unwrap_or_default();
    let key = canonicalize(first, second).ok()?;

    let result = row.result.as_deref().unwrap_or_default();
    let label = if result.trim() == LEGACY_UNPARSEABLE {
        validator.sentinels().unparseable.clone()
    } else {
        validator.validate(result)
    };

    Some(CombinationRecord::new(&key, label))
}
