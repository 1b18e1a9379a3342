pub mod data;

pub use data::*;

use log::{info, warn};
use std::collections::BTreeMap;

use crate::logic::CombinationCache;
use crate::model::{CombineResponse, Element, ResolutionSource};
use crate::store::traits::Store;

/// Starter catalog sorted case-insensitively by title.
pub fn starter_elements() -> Vec<Element> {
    let mut elements: Vec<Element> = STARTER_ELEMENTS
        .iter()
        .map(|title| Element {
            title: title.to_string(),
        })
        .collect();
    elements.sort_by_key(|e| e.title.to_lowercase());
    elements
}

pub fn demo_label(first: &str, second: &str) -> String {
    format!("{} + {}", first, second)
}

/// Resolve every demo pairing, keyed by `"A + B"`.
pub async fn resolve_demo_pairs<S: Store>(
    cache: &CombinationCache<S>,
) -> BTreeMap<String, CombineResponse> {
    let mut results = BTreeMap::new();
    for (first, second) in DEMO_PAIRS {
        let result = match cache.resolve(first, second).await {
            Ok(label) => label,
            Err(e) => {
                warn!("Demo pairing {} + {} rejected: {}", first, second, e);
                cache.sentinels().unresolvable.clone()
            }
        };
        results.insert(demo_label(first, second), CombineResponse { result });
    }
    results
}

/// Pre-populate the cache with the demo pairings. Returns how many are now stored.
pub async fn warm_cache<S: Store>(cache: &CombinationCache<S>) -> usize {
    let mut stored = 0;
    for (first, second) in DEMO_PAIRS {
        match cache.resolve_detailed(first, second).await {
            Ok(resolution) if resolution.is_persisted() => stored += 1,
            Ok(resolution) if resolution.source == ResolutionSource::Unresolvable => {
                warn!("Could not warm {} + {}", first, second)
            }
            Ok(_) => {}
            Err(e) => warn!("Demo pairing {} + {} rejected: {}", first, second, e),
        }
    }
    info!("Warmed cache with {}/{} demo pairings", stored, DEMO_PAIRS.len());
    stored
}
