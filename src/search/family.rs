//! The result of a rule-family search

use crate::rule::Rule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Rules between `need` and `ok` (condition-wise) all reproduce the trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFamily {
    /// The rule the reference trace was captured under
    pub baseline: Rule,
    /// Number of generations compared
    pub period: usize,
    /// Conditions every rule of the family must have
    pub need: Rule,
    /// Conditions a rule of the family may have
    pub ok: Rule,
    /// Live cells in the starting pattern
    pub population: usize,
    pub statistics: SearchStatistics,
    #[serde(skip)]
    pub search_time: Duration,
}

/// Trial counters for the four passes of the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStatistics {
    pub birth_ok: PassStatistics,
    pub survival_ok: PassStatistics,
    pub birth_need: PassStatistics,
    pub survival_need: PassStatistics,
}

/// Trial counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStatistics {
    pub trials: usize,
    pub accepted: usize,
    pub diverged: usize,
    pub rejected: usize,
}

impl SearchStatistics {
    pub fn total_trials(&self) -> usize {
        self.passes().iter().map(|(_, pass)| pass.trials).sum()
    }

    /// The passes in search order, with their names
    pub fn passes(&self) -> [(&'static str, PassStatistics); 4] {
        [
            ("birth ok", self.birth_ok),
            ("survival ok", self.survival_ok),
            ("birth need", self.birth_need),
            ("survival need", self.survival_need),
        ]
    }
}

impl RuleFamily {
    /// Conditions that may be present or absent: `k` in `2^k`.
    pub fn free_conditions(&self) -> usize {
        (self.ok.birth().len() - self.need.birth().len())
            + (self.ok.survival().len() - self.need.survival().len())
    }

    /// Number of rules in the family.
    pub fn family_size(&self) -> u128 {
        1u128 << self.free_conditions()
    }

    /// `<need-rule> - <OK-rule>`
    pub fn expression(&self) -> String {
        format!("{} - {}", self.need, self.ok)
    }

    /// Whether `rule` lies between the need and OK rules.
    pub fn contains(&self, rule: &Rule) -> bool {
        self.need.birth().is_subset(rule.birth())
            && rule.birth().is_subset(self.ok.birth())
            && self.need.survival().is_subset(rule.survival())
            && rule.survival().is_subset(self.ok.survival())
    }

    pub fn summary(&self, name: &str) -> FamilySummary {
        FamilySummary {
            name: name.to_string(),
            baseline: self.baseline.to_string(),
            period: self.period,
            expression: self.expression(),
            free_conditions: self.free_conditions(),
            trials: self.statistics.total_trials(),
            search_time_ms: self.search_time.as_millis() as u64,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression())
    }
}

/// One line of a batch report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilySummary {
    pub name: String,
    pub baseline: String,
    pub period: usize,
    pub expression: String,
    pub free_conditions: usize,
    pub trials: usize,
    pub search_time_ms: u64,
}
