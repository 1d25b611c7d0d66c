//! Independent searches over many pattern files, run in parallel

use super::engine::search_rule_family;
use super::family::RuleFamily;
use crate::error::{InputError, SearchError};
use crate::game_of_life::{LifeSimulator, PatternFile};
use crate::rule::{parse_rule, Rule};
use rayon::prelude::*;

/// The search of one pattern file
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub name: String,
    pub result: Result<RuleFamily, SearchError>,
}

/// Settings shared by every search of a batch
#[derive(Debug, Clone, Copy)]
pub struct BatchSearch {
    /// Used for files whose header names no rule
    pub default_rule: Rule,
    pub period: usize,
    pub max_population: usize,
}

impl BatchSearch {
    /// Search every file on its own simulator; results keep the input order.
    pub fn run(&self, files: &[PatternFile]) -> Vec<BatchEntry> {
        log::info!("Searching {} patterns for {} generations", files.len(), self.period);
        files
            .par_iter()
            .map(|file| BatchEntry {
                name: file.name.clone(),
                result: self.search_one(file),
            })
            .collect()
    }

    fn search_one(&self, file: &PatternFile) -> Result<RuleFamily, SearchError> {
        let baseline = match &file.rule {
            Some(rule) => parse_rule(rule).map_err(InputError::NotLifeLike)?,
            None => self.default_rule,
        };
        let mut simulator = LifeSimulator::with_pattern(&baseline.to_string(), &file.pattern)
            .map_err(InputError::UnsupportedBaseline)?
            .with_max_population(self.max_population);

        let result = search_rule_family(&mut simulator, &baseline, self.period);
        if let Err(e) = &result {
            log::warn!("{}: {}", file.name, e);
        }
        result
    }
}
