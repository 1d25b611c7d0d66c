//! Life-like rule-family calculator
//!
//! Given a pattern and the rule it runs under, this library finds every
//! isotropic non-totalistic rule that takes the pattern through exactly the
//! same generations. The family is reported as a pair of rules: the
//! conditions every member needs, and the conditions any member may have.

pub mod config;
pub mod error;
pub mod game_of_life;
pub mod rule;
pub mod search;
pub mod utils;

pub use config::Settings;
pub use error::{InputError, RuleError, SearchError, SimulationError};
pub use rule::{normalize_str, parse_rule, Rule};
pub use search::{search_rule_family, RuleFamily};

use anyhow::{Context, Result};
use game_of_life::{load_pattern_from_file, LifeSimulator, PatternFile};

/// Main entry point: load the configured pattern and search its family
pub fn find_rule_family(settings: &Settings) -> Result<(PatternFile, RuleFamily)> {
    settings.validate_inputs()?;
    let file = load_pattern_from_file(&settings.search.pattern_file)
        .context("Failed to load pattern file")?;
    let baseline = settings.baseline_rule(file.rule.as_deref())?;

    let mut simulator = LifeSimulator::with_pattern(&baseline.to_string(), &file.pattern)
        .map_err(InputError::UnsupportedBaseline)?
        .with_max_population(settings.simulation.max_population);
    let family = search_rule_family(&mut simulator, &baseline, settings.search.period)?;

    Ok((file, family))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_find_rule_family_uses_header_rule() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blinker.rle");
        std::fs::write(&path, "x = 3, y = 1, rule = B3/S23\n3o!\n").unwrap();

        let mut settings = Settings::default();
        settings.search.pattern_file = path;
        settings.search.period = 2;

        let (file, family) = find_rule_family(&settings).unwrap();
        assert_eq!(file.name, "blinker");
        assert_eq!(family.expression(), "B3i/S2i - B2ceikn345678/S01c2345678");
    }

    #[test]
    fn test_find_rule_family_missing_file() {
        let mut settings = Settings::default();
        settings.search.pattern_file = "no/such/pattern.rle".into();
        assert!(find_rule_family(&settings).is_err());
    }
}
