//! Error types shared by the rule parser, the simulator and the search engine

use thiserror::Error;

/// A rule string that could not be parsed as a Life-like Hensel rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("not a Life-like rule: {0:?} (expected B<conditions>/S<conditions>)")]
    NotLifeLike(String),

    #[error("letter '{letter}' at position {position} has no neighbour count before it")]
    LetterWithoutCount { letter: char, position: usize },

    #[error("'{letter}' is not a Hensel letter for {count} neighbours")]
    InvalidLetter { count: u8, letter: char },

    #[error("'-' at position {position} must directly follow a neighbour count")]
    MisplacedMinus { position: usize },

    #[error("'{count}-' removes nothing; list the letters to exclude")]
    EmptyNegation { count: u8 },

    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
}

/// Failures reported by a [`crate::game_of_life::Simulation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("rule {rule:?} rejected: {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("population reached {population} at generation {generation} (limit {limit})")]
    PopulationLimit {
        generation: u64,
        population: usize,
        limit: usize,
    },
}

/// Fatal input problems; the whole run stops before any partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("please set a Life-like rule: {0}")]
    NotLifeLike(#[from] RuleError),

    #[error("the pattern is empty")]
    EmptyPattern,

    #[error("bad period {0:?}: the period must be a whole number of at least 1")]
    InvalidPeriod(String),

    #[error("cancelled")]
    Cancelled,

    #[error("the simulator cannot run the baseline rule: {0}")]
    UnsupportedBaseline(SimulationError),
}

/// Everything a rule-family search can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("capturing the reference trace failed: {0}")]
    Simulation(#[from] SimulationError),
}
