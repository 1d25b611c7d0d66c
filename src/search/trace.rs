//! Reference traces and the trial runner that replays them

use crate::error::{InputError, SearchError, SimulationError};
use crate::game_of_life::{Pattern, Simulation};
use crate::rule::Rule;
use serde::{Deserialize, Serialize};

/// Result of replaying the pattern under one candidate rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    /// Every generation matched the reference trace.
    Preserved,
    /// Generation `generation` (1-based) differed from the trace.
    Diverged { generation: usize },
    /// The simulator refused the rule or failed while stepping.
    Rejected(SimulationError),
}

impl TrialOutcome {
    pub fn is_preserved(&self) -> bool {
        matches!(self, TrialOutcome::Preserved)
    }
}

/// The generations a pattern goes through under the baseline rule.
///
/// `generations[0]` is the pattern after one step, not the pattern itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTrace {
    generations: Vec<Pattern>,
}

impl ReferenceTrace {
    /// Run `pattern` for `period` steps under `rule` and record every step.
    pub fn capture<S: Simulation>(
        simulation: &mut S,
        pattern: &Pattern,
        rule: &Rule,
        period: usize,
    ) -> Result<Self, SearchError> {
        restart(simulation, pattern);
        simulation
            .set_active_rule(&rule.to_string())
            .map_err(InputError::UnsupportedBaseline)?;

        let mut generations = Vec::with_capacity(period);
        for _ in 0..period {
            simulation.step(1)?;
            generations.push(simulation.live_cells());
        }
        Ok(Self { generations })
    }

    pub fn period(&self) -> usize {
        self.generations.len()
    }

    pub fn generations(&self) -> &[Pattern] {
        &self.generations
    }

    /// Replay `pattern` under `rule`, stopping at the first generation that
    /// differs from the trace.
    pub fn replay<S: Simulation>(
        &self,
        simulation: &mut S,
        pattern: &Pattern,
        rule: &Rule,
    ) -> TrialOutcome {
        restart(simulation, pattern);
        if let Err(e) = simulation.set_active_rule(&rule.to_string()) {
            return TrialOutcome::Rejected(e);
        }

        for (index, expected) in self.generations.iter().enumerate() {
            if let Err(e) = simulation.step(1) {
                return TrialOutcome::Rejected(e);
            }
            if simulation.live_cells() != *expected {
                return TrialOutcome::Diverged {
                    generation: index + 1,
                };
            }
        }
        TrialOutcome::Preserved
    }
}

/// Put the original pattern back on an empty board at generation 0.
pub(crate) fn restart<S: Simulation>(simulation: &mut S, pattern: &Pattern) {
    simulation.clear_pattern();
    simulation.reset_generation_counter();
    simulation.place_pattern(pattern);
}
