//! Pattern rule store
//!
//! Associates caller-defined rules with dotted names through exact patterns
//! (`com.example.Widget`) and wildcard patterns (`com.example.*`). Lookups
//! return the most specific matching rule.

pub mod error;
pub mod map;
pub mod pattern;

use crate::config::RuntimeConfig;
use crate::logging::codes;
use crate::{log_error, log_success, log_warning};
use std::collections::{BTreeMap, BTreeSet};

pub use error::PatternError;
pub use map::PatternMap;
pub use pattern::Pattern;

/// Build a string-valued rule store from the `[rules]` table of a configuration
///
/// An exact pattern and a wildcard pattern naming the same path share one
/// node, so the exact rule replaces the wildcard; each such pair is logged.
pub fn load_rules(config: &RuntimeConfig) -> Result<PatternMap<String>, PatternError> {
    for name in exact_wildcard_collisions(&config.rules) {
        log_warning!("Exact rule replaces wildcard rule on the same path",
            "pattern" => &name,
            "dropped" => format!("{}.*", name)
        );
    }

    let map = PatternMap::from_rules(
        config
            .rules
            .iter()
            .map(|(pattern, rule)| (pattern.as_str(), rule.clone())),
    )
    .map_err(|error| {
        log_error!(error.error_code(), &error.to_string());
        error
    })?;

    log_success!(codes::success::RULES_LOADED, "Pattern rules loaded",
        "configured" => config.rules.len(),
        "stored" => map.len()
    );
    Ok(map)
}

/// Paths configured both as an exact and as a wildcard pattern
fn exact_wildcard_collisions(rules: &BTreeMap<String, String>) -> Vec<String> {
    let mut exact = BTreeSet::new();
    let mut wildcard = BTreeSet::new();
    for key in rules.keys() {
        let Ok(pattern) = key.parse::<Pattern>() else {
            continue;
        };
        if pattern.is_wildcard() {
            wildcard.insert(pattern.segments().to_vec());
        } else {
            exact.insert(pattern.segments().to_vec());
        }
    }
    exact
        .intersection(&wildcard)
        .map(|segments| segments.join("."))
        .collect()
}
