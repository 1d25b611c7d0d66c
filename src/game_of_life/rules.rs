//! Transition tables for isotropic non-totalistic Life-like rules

use super::pattern::{Cell, Pattern};
use crate::error::SimulationError;
use crate::rule::hensel::NEIGHBOUR_OFFSETS;
use crate::rule::Rule;
use rayon::prelude::*;
use std::collections::HashSet;

/// Candidate count above which a generation is computed in parallel.
const PARALLEL_THRESHOLD: usize = 4096;

/// Next state of a cell, indexed by its neighbourhood mask.
#[derive(Clone)]
pub struct TransitionTable {
    birth: [bool; 256],
    survival: [bool; 256],
}

impl TransitionTable {
    pub fn new(rule: &Rule) -> Self {
        Self {
            birth: rule.birth().mask_table(),
            survival: rule.survival().mask_table(),
        }
    }

    /// Whether a cell is alive in the next generation
    #[inline]
    pub fn next_state(&self, alive: bool, neighbourhood: u8) -> bool {
        if alive {
            self.survival[neighbourhood as usize]
        } else {
            self.birth[neighbourhood as usize]
        }
    }

    /// Evolve a pattern one generation forward
    pub fn evolve(&self, current: &Pattern) -> Pattern {
        let candidates: HashSet<Cell> = current
            .cells()
            .iter()
            .flat_map(|&(x, y)| {
                NEIGHBOUR_OFFSETS
                    .iter()
                    .map(move |&(dx, dy)| (x + dx, y + dy))
                    .chain(std::iter::once((x, y)))
            })
            .collect();

        let survives = |cell: &Cell| {
            self.next_state(current.contains(*cell), neighbourhood(current, *cell))
        };

        // Use parallel processing for large patterns
        if candidates.len() > PARALLEL_THRESHOLD {
            candidates
                .into_par_iter()
                .filter(survives)
                .collect::<Vec<_>>()
                .into_iter()
                .collect()
        } else {
            candidates.into_iter().filter(survives).collect()
        }
    }
}

/// Bitmask of the live neighbours of `cell`.
pub fn neighbourhood(pattern: &Pattern, (x, y): Cell) -> u8 {
    NEIGHBOUR_OFFSETS
        .iter()
        .enumerate()
        .filter(|&(_, &(dx, dy))| pattern.contains((x + dx, y + dy)))
        .fold(0u8, |mask, (bit, _)| mask | 1u8 << bit)
}

/// A rule compiled for stepping finite patterns.
///
/// B0 rules without S8 turn the empty background on in every odd generation.
/// They run as two alternating tables: odd generations hold the complement of
/// the real state, which keeps the live set finite.
#[derive(Clone)]
pub enum CompiledRule {
    Single(TransitionTable),
    Alternating {
        even: TransitionTable,
        odd: TransitionTable,
    },
}

impl CompiledRule {
    pub fn compile(rule: &Rule) -> Result<Self, SimulationError> {
        if !rule.is_b0() {
            return Ok(CompiledRule::Single(TransitionTable::new(rule)));
        }
        if rule.is_s8() {
            return Err(SimulationError::InvalidRule {
                rule: rule.to_string(),
                reason: "B0 rules with S8 are not supported".to_string(),
            });
        }

        let birth = rule.birth().mask_table();
        let survival = rule.survival().mask_table();
        let even = TransitionTable {
            birth: birth.map(|b| !b),
            survival: survival.map(|s| !s),
        };
        let mut odd = TransitionTable {
            birth: [false; 256],
            survival: [false; 256],
        };
        for mask in 0..256 {
            odd.birth[mask] = survival[mask ^ 0xff];
            odd.survival[mask] = birth[mask ^ 0xff];
        }
        Ok(CompiledRule::Alternating { even, odd })
    }

    /// Table taking generation `generation` to the next one
    pub fn table(&self, generation: u64) -> &TransitionTable {
        match self {
            CompiledRule::Single(table) => table,
            CompiledRule::Alternating { even, odd } => {
                if generation % 2 == 0 {
                    even
                } else {
                    odd
                }
            }
        }
    }
}
