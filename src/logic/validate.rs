use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Sentinels;

/// One or more element tokens: an upper-case letter, an optional lower-case
/// letter, optional digits.
static FORMULA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[A-Z][a-z]?\d*)+$").unwrap());

pub const PRODUCT_SEPARATOR: &str = " + ";

const NO_REACTION_PHRASES: &[&str] = &["no reaction", "norxn", "no rxn", "no combination", "none"];

pub fn is_formula(token: &str) -> bool {
    FORMULA_RE.is_match(token)
}

/// Strip whitespace, quotes, backticks and a trailing period from a fragment.
fn strip_decoration(text: &str) -> &str {
    let is_wrapper = |c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`');
    text.trim_matches(is_wrapper)
        .trim_end_matches('.')
        .trim_matches(is_wrapper)
}

/// Turns free-text oracle answers into storage-safe result labels.
///
/// Total: every input, including the empty string, maps to a non-empty label.
#[derive(Debug, Clone)]
pub struct ResultValidator {
    sentinels: Sentinels,
}

impl ResultValidator {
    pub fn new(sentinels: Sentinels) -> Self {
        let defaults = Sentinels::default();
        let or_default = |value: String, fallback: String| {
            if value.trim().is_empty() {
                fallback
            } else {
                value
            }
        };

        Self {
            sentinels: Sentinels {
                no_reaction: or_default(sentinels.no_reaction, defaults.no_reaction),
                unparseable: or_default(sentinels.unparseable, defaults.unparseable),
                unresolvable: or_default(sentinels.unresolvable, defaults.unresolvable),
            },
        }
    }

    pub fn sentinels(&self) -> &Sentinels {
        &self.sentinels
    }

    pub fn validate(&self, raw: &str) -> String {
        if self.denotes_no_reaction(raw) {
            return self.sentinels.no_reaction.clone();
        }

        let mut products: Vec<&str> = Vec::new();
        for part in raw.split('+').map(strip_decoration) {
            if part.is_empty() || !is_formula(part) {
                continue;
            }
            if !products.contains(&part) {
                products.push(part);
            }
        }

        if products.is_empty() {
            self.sentinels.unparseable.clone()
        } else {
            products.join(PRODUCT_SEPARATOR)
        }
    }

    fn denotes_no_reaction(&self, raw: &str) -> bool {
        let normalized = strip_decoration(raw)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        NO_REACTION_PHRASES.contains(&normalized.as_str())
            || normalized == self.sentinels.no_reaction.to_lowercase()
    }
}

impl Default for ResultValidator {
    fn default() -> Self {
        Self::new(Sentinels::default())
    }
}
