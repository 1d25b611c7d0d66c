//! Rendering of token sets back into the shortest Hensel notation

use super::hensel::{Token, TokenSet};
use super::parse::parse_rule;
use super::Rule;
use crate::error::RuleError;
use itertools::Itertools;

/// Render a condition set: each count once, followed by its letters in table
/// order, or the bare count when the whole bucket is present.
pub fn normalize_conditions(set: TokenSet) -> String {
    let mut output = String::new();
    for (count, tokens) in &set.iter().chunk_by(|token| token.count()) {
        output.push(char::from(b'0' + count));
        if !set.contains_bucket(count) {
            output.extend(tokens.filter_map(Token::letter));
        }
    }
    output
}

/// Render every token explicitly, e.g. `3a3c3e…`.
pub fn expand_conditions(set: TokenSet) -> String {
    set.iter().join("")
}

pub fn normalize(rule: &Rule) -> String {
    format!(
        "B{}/S{}",
        normalize_conditions(rule.birth()),
        normalize_conditions(rule.survival())
    )
}

/// Parse and re-render a rule string.
pub fn normalize_str(rule: &str) -> Result<String, RuleError> {
    parse_rule(rule).map(|rule| normalize(&rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_buckets_collapse() {
        assert_eq!(normalize_str("B3aceijknqry/S2aceikn3").unwrap(), "B3/S23");
        assert_eq!(normalize_str("B1ce7ce/S4aceijknqrtwyz").unwrap(), "B17/S4");
        assert_eq!(normalize_str("B0/S8").unwrap(), "B0/S8");
    }

    #[test]
    fn test_partial_buckets_keep_letters() {
        assert_eq!(normalize_str("B3a3i3j3n/S2a2e").unwrap(), "B3aijn/S2ae");
        assert_eq!(normalize_str("B2-a/S").unwrap(), "B2ceikn/S");
    }

    #[test]
    fn test_repeated_contexts_merge() {
        assert_eq!(normalize_str("B3a3a/S23").unwrap(), "B3a/S23");
        assert_eq!(normalize_str("B4e3a4c/S").unwrap(), "B3a4ce/S");
    }

    #[test]
    fn test_expanded_form() {
        let rule = parse_rule("B2-a/S1").unwrap();
        assert_eq!(expand_conditions(rule.birth()), "2c2e2i2k2n");
        assert_eq!(expand_conditions(rule.survival()), "1c1e");
        assert_eq!(parse_rule(&rule.expanded()).unwrap(), rule);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for input in [
            "B3/S23",
            "B36/S23",
            "B2-a/S12",
            "B3-cnqy4ce/S1c2-a3-ky",
            "B0123478/S0123467",
            "B3aijn/S2ae3jnr",
            "B/S",
            "B12345678/S012345678",
        ] {
            let once = normalize_str(input).unwrap();
            let twice = normalize_str(&once).unwrap();
            assert_eq!(once, twice, "normalizing {}", input);
        }
    }
}
