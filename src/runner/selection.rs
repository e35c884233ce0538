//! Model file selection
//!
//! Repositories for quantized models typically ship many variants of the
//! same weights. Candidates are narrowed by the manifest's `match` glob and
//! ordered by the VRAM profile's GGUF preference markers (most preferred
//! first); ties keep their original order so the repository listing stays
//! deterministic.

use crate::error::{Result, StackforgeError};
use wax::Pattern;

/// Narrow `candidates` by `match_pattern` (when given) and order them by
/// the position of the first preference marker their name contains.
///
/// Names matching no marker sort last. An empty preference list leaves the
/// filtered candidates in their original order.
pub fn order_by_preference(
    candidates: &[String],
    preference: &[String],
    match_pattern: Option<&str>,
) -> Result<Vec<String>> {
    let filtered: Vec<String> = match match_pattern {
        Some(pattern) => {
            let glob = wax::Glob::new(pattern).map_err(|e| {
                StackforgeError::InvalidMatchPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                }
            })?;
            candidates
                .iter()
                .filter(|name| glob.is_match(name.as_str()))
                .cloned()
                .collect()
        }
        None => candidates.to_vec(),
    };

    let rank = |name: &str| {
        preference
            .iter()
            .position(|marker| name.contains(marker.as_str()))
            .unwrap_or(preference.len())
    };

    let mut ordered = filtered;
    ordered.sort_by_key(|name| rank(name));
    Ok(ordered)
}

/// The best candidate under the given preference, if any survive the filter
pub fn pick_preferred(
    candidates: &[String],
    preference: &[String],
    match_pattern: Option<&str>,
) -> Result<Option<String>> {
    Ok(order_by_preference(candidates, preference, match_pattern)?
        .into_iter()
        .next())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_preference_orders_most_preferred_first() {
        let candidates = names(&[
            "wan-Q8_0.gguf",
            "wan-Q4_K_M.gguf",
            "wan-F16.gguf",
        ]);
        let preference = names(&["Q4_K_M", "Q8_0"]);

        let ordered = order_by_preference(&candidates, &preference, None).expect("order");
        assert_eq!(ordered[0], "wan-Q4_K_M.gguf");
        assert_eq!(ordered[1], "wan-Q8_0.gguf");
        assert_eq!(ordered[2], "wan-F16.gguf");
    }

    #[test]
    fn test_match_pattern_filters_candidates() {
        let candidates = names(&["model.gguf", "model.safetensors", "README.md"]);
        let ordered =
            order_by_preference(&candidates, &[], Some("*.gguf")).expect("order");
        assert_eq!(ordered, names(&["model.gguf"]));
    }

    #[test]
    fn test_unmatched_names_keep_original_order() {
        let candidates = names(&["b.gguf", "a.gguf"]);
        let ordered = order_by_preference(&candidates, &names(&["Q4"]), None).expect("order");
        assert_eq!(ordered, names(&["b.gguf", "a.gguf"]));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let result = order_by_preference(&names(&["x"]), &[], Some("[broken"));
        assert!(matches!(
            result,
            Err(StackforgeError::InvalidMatchPattern { .. })
        ));
    }

    #[test]
    fn test_pick_preferred() {
        let candidates = names(&["wan-Q8_0.gguf", "wan-Q4_K_M.gguf"]);
        let preference = names(&["Q4_K_M"]);
        let picked = pick_preferred(&candidates, &preference, Some("*.gguf")).expect("pick");
        assert_eq!(picked.as_deref(), Some("wan-Q4_K_M.gguf"));

        let picked = pick_preferred(&candidates, &preference, Some("*.bin")).expect("pick");
        assert!(picked.is_none());
    }
}
