use serde::{Deserialize, Serialize};

pub const DEFAULT_NO_REACTION: &str = "No reaction";
pub const DEFAULT_UNPARSEABLE: &str = "???";
pub const DEFAULT_UNRESOLVABLE: &str = "Try again";

/// Fixed labels standing in for non-product outcomes.
///
/// `no_reaction` and `unparseable` are cacheable facts; `unresolvable` marks a
/// transient failure and is never written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentinels {
    pub no_reaction: String,
    pub unparseable: String,
    pub unresolvable: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            no_reaction: DEFAULT_NO_REACTION.to_string(),
            unparseable: DEFAULT_UNPARSEABLE.to_string(),
            unresolvable: DEFAULT_UNRESOLVABLE.to_string(),
        }
    }
}

impl Sentinels {
    pub fn all(&self) -> [&str; 3] {
        [&self.no_reaction, &self.unparseable, &self.unresolvable]
    }
}
