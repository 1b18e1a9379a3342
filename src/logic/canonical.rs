use crate::error::CombineError;
use crate::model::CanonicalPair;

/// Trim surrounding whitespace and upper-case the first character, leaving the
/// rest untouched ("fe" -> "Fe", "h2O" -> "H2O", "CO" stays "CO").
///
/// Only the leading letter is folded because formula casing is meaningful
/// further in ("Co" and "CO" are different substances).
pub fn normalize_label(label: &str) -> String {
    let trimmed = label.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Map two labels to the order-independent key used for every store access.
///
/// Pure: no I/O, and `canonicalize(a, b) == canonicalize(b, a)`.
pub fn canonicalize(first: &str, second: &str) -> Result<CanonicalPair, CombineError> {
    let first = normalize_label(first);
    let second = normalize_label(second);

    if first.is_empty() || second.is_empty() {
        return Err(CombineError::InvalidInput(
            "both elements must be non-empty".to_string(),
        ));
    }

    if first <= second {
        Ok(CanonicalPair::from_sorted(first, second))
    } else {
        Ok(CanonicalPair::from_sorted(second, first))
    }
}
