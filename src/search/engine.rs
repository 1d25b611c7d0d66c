//! The rule-family search.
//!
//! Starting from the baseline rule, every Hensel token is toggled on its own
//! and the pattern is replayed against the reference trace. Birth and
//! survival tokens that can be added without changing the trace grow the OK
//! rule; tokens that can be removed shrink the need rule.

use super::family::{PassStatistics, RuleFamily, SearchStatistics};
use super::trace::{restart, ReferenceTrace, TrialOutcome};
use crate::error::{InputError, SearchError};
use crate::game_of_life::{Pattern, Simulation};
use crate::rule::{Rule, Token, TokenSet};
use std::ops::{Deref, DerefMut};
use std::time::Instant;

/// Search driver for one pattern and one period.
#[derive(Debug, Clone, Copy)]
pub struct RuleFamilySearch {
    period: usize,
}

impl RuleFamilySearch {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Search the family of the pattern currently held by `simulation`.
    ///
    /// Whatever happens, the simulation ends up holding the original pattern
    /// under `baseline` with its generation counter at zero.
    pub fn run<S: Simulation>(
        &self,
        simulation: &mut S,
        baseline: &Rule,
    ) -> Result<RuleFamily, SearchError> {
        let start_time = Instant::now();

        if self.period == 0 {
            return Err(InputError::InvalidPeriod(self.period.to_string()).into());
        }
        if simulation.is_pattern_empty() {
            return Err(InputError::EmptyPattern.into());
        }

        let pattern = simulation.live_cells();
        let mut host = Restore::new(simulation, pattern.clone(), *baseline);

        log::info!(
            "Searching rule family of {} cells under {} for {} generations",
            pattern.population(),
            baseline,
            self.period
        );
        let trace = ReferenceTrace::capture(&mut *host, &pattern, baseline, self.period)?;

        let mut trials = Trials {
            simulation: &mut *host,
            pattern: &pattern,
            trace: &trace,
        };
        let (need, ok, statistics) = search_tokens(&mut trials, baseline);

        let family = RuleFamily {
            baseline: *baseline,
            period: self.period,
            need,
            ok,
            population: pattern.population(),
            statistics,
            search_time: start_time.elapsed(),
        };
        log::info!(
            "Found {} ({} trials, 2^{} rules) in {:.3}s",
            family.expression(),
            family.statistics.total_trials(),
            family.free_conditions(),
            family.search_time.as_secs_f64()
        );
        Ok(family)
    }
}

/// Search the family of the pattern held by `simulation` over `period`
/// generations of `baseline`.
pub fn search_rule_family<S: Simulation>(
    simulation: &mut S,
    baseline: &Rule,
    period: usize,
) -> Result<RuleFamily, SearchError> {
    RuleFamilySearch::new(period).run(simulation, baseline)
}

/// Replays the pattern under candidate rules.
trait Oracle {
    fn trial(&mut self, candidate: &Rule) -> TrialOutcome;
}

struct Trials<'a, S: Simulation> {
    simulation: &'a mut S,
    pattern: &'a Pattern,
    trace: &'a ReferenceTrace,
}

impl<S: Simulation> Oracle for Trials<'_, S> {
    fn trial(&mut self, candidate: &Rule) -> TrialOutcome {
        let outcome = self.trace.replay(self.simulation, self.pattern, candidate);
        log::trace!("{} -> {:?}", candidate, outcome);
        outcome
    }
}

/// Which half of a rule a pass works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conditions {
    Birth,
    Survival,
}

impl Conditions {
    /// `baseline` with this half replaced by `set`
    fn rule(self, baseline: &Rule, set: TokenSet) -> Rule {
        match self {
            Conditions::Birth => baseline.with_birth(set),
            Conditions::Survival => baseline.with_survival(set),
        }
    }
}

/// `set` with `token` added if the trace still holds, and whether it did.
fn try_add(
    oracle: &mut impl Oracle,
    baseline: &Rule,
    conditions: Conditions,
    set: TokenSet,
    token: Token,
    statistics: &mut PassStatistics,
) -> (TokenSet, bool) {
    let candidate = set.with(token);
    if judge(oracle, &conditions.rule(baseline, candidate), statistics) {
        (candidate, true)
    } else {
        (set, false)
    }
}

/// `set` with `token` removed if the trace still holds, and whether it did.
fn try_remove(
    oracle: &mut impl Oracle,
    baseline: &Rule,
    conditions: Conditions,
    set: TokenSet,
    token: Token,
    statistics: &mut PassStatistics,
) -> (TokenSet, bool) {
    let candidate = set.without(token);
    if judge(oracle, &conditions.rule(baseline, candidate), statistics) {
        (candidate, true)
    } else {
        (set, false)
    }
}

fn judge(oracle: &mut impl Oracle, candidate: &Rule, statistics: &mut PassStatistics) -> bool {
    statistics.trials += 1;
    match oracle.trial(candidate) {
        TrialOutcome::Preserved => {
            statistics.accepted += 1;
            true
        }
        TrialOutcome::Diverged { .. } => {
            statistics.diverged += 1;
            false
        }
        TrialOutcome::Rejected(e) => {
            log::debug!("{} rejected: {}", candidate, e);
            statistics.rejected += 1;
            false
        }
    }
}

/// The four passes, token by token in table order.
///
/// Token `0` never enters the birth OK set and never leaves the birth need
/// set: B0 changes the background and is not a condition of the pattern.
fn search_tokens(oracle: &mut impl Oracle, baseline: &Rule) -> (Rule, Rule, SearchStatistics) {
    let mut b_ok = baseline.birth();
    let mut s_ok = baseline.survival();
    let mut b_need = baseline.birth();
    let mut s_need = baseline.survival();
    let mut statistics = SearchStatistics::default();

    for token in Token::all() {
        if !b_ok.contains(token) && !token.is_zero() {
            let pass = &mut statistics.birth_ok;
            (b_ok, _) = try_add(oracle, baseline, Conditions::Birth, b_ok, token, pass);
        }
        if !s_ok.contains(token) {
            let pass = &mut statistics.survival_ok;
            (s_ok, _) = try_add(oracle, baseline, Conditions::Survival, s_ok, token, pass);
        }
        if b_need.contains(token) && !token.is_zero() {
            let pass = &mut statistics.birth_need;
            (b_need, _) = try_remove(oracle, baseline, Conditions::Birth, b_need, token, pass);
        }
        if s_need.contains(token) {
            let pass = &mut statistics.survival_need;
            (s_need, _) = try_remove(oracle, baseline, Conditions::Survival, s_need, token, pass);
        }
    }

    log::debug!(
        "birth {}..{}, survival {}..{}",
        b_need.len(),
        b_ok.len(),
        s_need.len(),
        s_ok.len()
    );
    (Rule::new(b_need, s_need), Rule::new(b_ok, s_ok), statistics)
}

/// Exclusive access to the host that puts the original pattern and the
/// baseline rule back when dropped.
struct Restore<'a, S: Simulation> {
    simulation: &'a mut S,
    pattern: Pattern,
    rule: Rule,
}

impl<'a, S: Simulation> Restore<'a, S> {
    fn new(simulation: &'a mut S, pattern: Pattern, rule: Rule) -> Self {
        Self {
            simulation,
            pattern,
            rule,
        }
    }
}

impl<S: Simulation> Deref for Restore<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.simulation
    }
}

impl<S: Simulation> DerefMut for Restore<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.simulation
    }
}

impl<S: Simulation> Drop for Restore<'_, S> {
    fn drop(&mut self) {
        restart(self.simulation, &self.pattern);
        if let Err(e) = self.simulation.set_active_rule(&self.rule.to_string()) {
            log::warn!("Could not restore rule {}: {}", self.rule, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use crate::game_of_life::LifeSimulator;

    fn simulator(rule: &str, cells: &[(i64, i64)]) -> LifeSimulator {
        let pattern: Pattern = cells.iter().copied().collect();
        LifeSimulator::with_pattern(rule, &pattern).unwrap()
    }

    /// Accepts every candidate whose birth set is a subset of `allowed`.
    struct BirthWindow {
        allowed: TokenSet,
        calls: usize,
    }

    impl Oracle for BirthWindow {
        fn trial(&mut self, candidate: &Rule) -> TrialOutcome {
            self.calls += 1;
            if candidate.birth().is_subset(self.allowed) {
                TrialOutcome::Preserved
            } else {
                TrialOutcome::Diverged { generation: 1 }
            }
        }
    }

    #[test]
    fn test_try_add_and_remove() {
        let baseline: Rule = "B3/S23".parse().unwrap();
        let mut oracle = BirthWindow {
            allowed: TokenSet::bucket(3).union(TokenSet::bucket(4)),
            calls: 0,
        };
        let mut statistics = PassStatistics::default();
        let four_a = Token::new(4, Some('a')).unwrap();
        let two_a = Token::new(2, Some('a')).unwrap();

        let birth = Conditions::Birth;
        let stats = &mut statistics;

        let (set, kept) = try_add(&mut oracle, &baseline, birth, baseline.birth(), four_a, stats);
        assert!(kept && set.contains(four_a));
        let (set, kept) = try_add(&mut oracle, &baseline, birth, set, two_a, stats);
        assert!(!kept && !set.contains(two_a));
        let (set, kept) = try_remove(&mut oracle, &baseline, birth, set, four_a, stats);
        assert!(kept && !set.contains(four_a));

        assert_eq!(statistics.trials, 3);
        assert_eq!(statistics.accepted, 2);
        assert_eq!(statistics.diverged, 1);
    }

    #[test]
    fn test_search_tokens_with_scripted_oracle() {
        let baseline: Rule = "B3/S23".parse().unwrap();
        let mut oracle = BirthWindow {
            allowed: TokenSet::bucket(3).union(TokenSet::bucket(4)),
            calls: 0,
        };
        let (need, ok, statistics) = search_tokens(&mut oracle, &baseline);

        assert_eq!(ok.birth(), TokenSet::bucket(3).union(TokenSet::bucket(4)));
        assert!(need.birth().is_empty());
        // Survival never matters to this oracle.
        assert!(need.survival().is_empty());
        assert_eq!(ok.survival().len(), 51);
        assert_eq!(oracle.calls, statistics.total_trials());
    }

    #[test]
    fn test_b0_token_is_never_toggled_in_birth() {
        let baseline: Rule = "B0/S".parse().unwrap();
        let mut oracle = BirthWindow {
            allowed: TokenSet::empty(),
            calls: 0,
        };
        let (need, ok, _) = search_tokens(&mut oracle, &baseline);
        assert!(need.is_b0());
        assert!(ok.is_b0());
    }

    #[test]
    fn test_block_family() {
        let mut simulation = simulator("B3/S23", &[(0, 0), (1, 0), (0, 1), (1, 1)]);
        let baseline: Rule = "B3/S23".parse().unwrap();
        let family = search_rule_family(&mut simulation, &baseline, 1).unwrap();

        assert_eq!(family.expression(), "B/S3a - B1e2ceikn345678/S012345678");
        assert_eq!(family.free_conditions(), 98);
    }

    #[test]
    fn test_host_restored_after_search() {
        let cells = [(0, 1), (1, 1), (2, 1)];
        let mut simulation = simulator("B3/S23", &cells);
        let baseline: Rule = "B3/S23".parse().unwrap();
        search_rule_family(&mut simulation, &baseline, 2).unwrap();

        assert_eq!(simulation.active_rule(), "B3/S23");
        assert_eq!(simulation.generation(), 0);
        assert_eq!(simulation.live_cells(), cells.iter().copied().collect::<Pattern>());
    }

    #[test]
    fn test_host_restored_after_failed_capture() {
        let mut simulation = simulator("B3/S23", &[(0, 0)]);
        let baseline: Rule = "B0/S8".parse().unwrap();
        let result = search_rule_family(&mut simulation, &baseline, 1);

        assert!(matches!(
            result,
            Err(SearchError::Input(InputError::UnsupportedBaseline(
                SimulationError::InvalidRule { .. }
            )))
        ));
        assert_eq!(simulation.active_rule(), "B3/S23");
        assert_eq!(simulation.live_cells().population(), 1);
    }

    #[test]
    fn test_rejects_bad_inputs_before_searching() {
        let baseline: Rule = "B3/S23".parse().unwrap();

        let mut empty = LifeSimulator::new("B3/S23").unwrap();
        assert!(matches!(
            search_rule_family(&mut empty, &baseline, 1),
            Err(SearchError::Input(InputError::EmptyPattern))
        ));

        let mut dot = simulator("B3/S23", &[(0, 0)]);
        assert!(matches!(
            search_rule_family(&mut dot, &baseline, 0),
            Err(SearchError::Input(InputError::InvalidPeriod(_)))
        ));
    }
}
