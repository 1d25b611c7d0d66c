//! The simulation environment driven by the rule-family search

use super::pattern::Pattern;
use super::rules::CompiledRule;
use crate::error::SimulationError;
use crate::rule::{parse_rule, Rule};

/// A host that owns an active rule and a live pattern and can step it.
pub trait Simulation {
    /// The active rule, in canonical notation
    fn active_rule(&self) -> String;

    /// Switch to another rule; the pattern and generation count are kept.
    fn set_active_rule(&mut self, rule: &str) -> Result<(), SimulationError>;

    fn reset_generation_counter(&mut self);

    fn clear_pattern(&mut self);

    /// Add cells to the current pattern
    fn place_pattern(&mut self, cells: &Pattern);

    /// Advance `generations` generations
    fn step(&mut self, generations: usize) -> Result<(), SimulationError>;

    fn live_cells(&self) -> Pattern;

    fn is_pattern_empty(&self) -> bool;
}

/// Unbounded sparse simulator for isotropic non-totalistic Life-like rules.
#[derive(Clone)]
pub struct LifeSimulator {
    rule: Rule,
    compiled: CompiledRule,
    pattern: Pattern,
    generation: u64,
    max_population: usize,
}

impl LifeSimulator {
    /// Default cap on the number of live cells
    pub const DEFAULT_MAX_POPULATION: usize = 100_000;

    /// Create an empty simulator running `rule`
    pub fn new(rule: &str) -> Result<Self, SimulationError> {
        let (rule, compiled) = compile(rule)?;
        Ok(Self {
            rule,
            compiled,
            pattern: Pattern::new(),
            generation: 0,
            max_population: Self::DEFAULT_MAX_POPULATION,
        })
    }

    /// Create a simulator already holding `pattern`
    pub fn with_pattern(rule: &str, pattern: &Pattern) -> Result<Self, SimulationError> {
        let mut simulator = Self::new(rule)?;
        simulator.place_pattern(pattern);
        Ok(simulator)
    }

    /// Cap the population; stepping past it fails.
    #[must_use]
    pub fn with_max_population(mut self, max_population: usize) -> Self {
        self.max_population = max_population;
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn compile(rule: &str) -> Result<(Rule, CompiledRule), SimulationError> {
    let parsed = parse_rule(rule).map_err(|e| SimulationError::InvalidRule {
        rule: rule.to_string(),
        reason: e.to_string(),
    })?;
    let compiled = CompiledRule::compile(&parsed)?;
    Ok((parsed, compiled))
}

impl Simulation for LifeSimulator {
    fn active_rule(&self) -> String {
        self.rule.to_string()
    }

    fn set_active_rule(&mut self, rule: &str) -> Result<(), SimulationError> {
        let (rule, compiled) = compile(rule)?;
        self.rule = rule;
        self.compiled = compiled;
        Ok(())
    }

    fn reset_generation_counter(&mut self) {
        self.generation = 0;
    }

    fn clear_pattern(&mut self) {
        self.pattern = Pattern::new();
    }

    fn place_pattern(&mut self, cells: &Pattern) {
        for cell in cells.iter() {
            self.pattern.insert(cell);
        }
    }

    fn step(&mut self, generations: usize) -> Result<(), SimulationError> {
        for _ in 0..generations {
            let next = self.compiled.table(self.generation).evolve(&self.pattern);
            if next.population() > self.max_population {
                return Err(SimulationError::PopulationLimit {
                    generation: self.generation + 1,
                    population: next.population(),
                    limit: self.max_population,
                });
            }
            self.pattern = next;
            self.generation += 1;
        }
        Ok(())
    }

    fn live_cells(&self) -> Pattern {
        self.pattern.clone()
    }

    fn is_pattern_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}
