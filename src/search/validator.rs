//! Check candidate rules against a pattern's reference trace

use super::family::RuleFamily;
use super::trace::{ReferenceTrace, TrialOutcome};
use crate::error::{InputError, SearchError};
use crate::game_of_life::{LifeSimulator, Pattern};
use crate::rule::Rule;
use std::fmt;

/// Replays patterns under candidate rules on a private simulator.
pub struct TraceValidator {
    period: usize,
    max_population: usize,
}

/// Result of checking one candidate rule
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub baseline: Rule,
    pub candidate: Rule,
    pub period: usize,
    pub outcome: TrialOutcome,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_preserved()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            TrialOutcome::Preserved => write!(
                f,
                "{} reproduces {} for {} generations",
                self.candidate, self.baseline, self.period
            ),
            TrialOutcome::Diverged { generation } => write!(
                f,
                "{} diverges from {} at generation {}",
                self.candidate, self.baseline, generation
            ),
            TrialOutcome::Rejected(e) => write!(f, "{} cannot be simulated: {}", self.candidate, e),
        }
    }
}

impl TraceValidator {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            max_population: LifeSimulator::DEFAULT_MAX_POPULATION,
        }
    }

    #[must_use]
    pub fn with_max_population(mut self, max_population: usize) -> Self {
        self.max_population = max_population;
        self
    }

    /// Check that `candidate` takes `pattern` through the same generations
    /// as `baseline`.
    pub fn validate(
        &self,
        pattern: &Pattern,
        baseline: &Rule,
        candidate: &Rule,
    ) -> Result<ValidationResult, SearchError> {
        if self.period == 0 {
            return Err(InputError::InvalidPeriod(self.period.to_string()).into());
        }
        if pattern.is_empty() {
            return Err(InputError::EmptyPattern.into());
        }

        let mut simulator = self.simulator(baseline)?;
        let trace = ReferenceTrace::capture(&mut simulator, pattern, baseline, self.period)?;
        let outcome = trace.replay(&mut simulator, pattern, candidate);
        log::debug!("{}: {:?}", candidate, outcome);

        Ok(ValidationResult {
            baseline: *baseline,
            candidate: *candidate,
            period: self.period,
            outcome,
        })
    }

    /// Check both ends of a family: its need rule and its OK rule.
    pub fn validate_family(
        &self,
        pattern: &Pattern,
        family: &RuleFamily,
    ) -> Result<[ValidationResult; 2], SearchError> {
        Ok([
            self.validate(pattern, &family.baseline, &family.need)?,
            self.validate(pattern, &family.baseline, &family.ok)?,
        ])
    }

    fn simulator(&self, baseline: &Rule) -> Result<LifeSimulator, InputError> {
        let simulator =
            LifeSimulator::new(&baseline.to_string()).map_err(InputError::UnsupportedBaseline)?;
        Ok(simulator.with_max_population(self.max_population))
    }
}
