//! Life-like simulation: patterns, transition tables and the simulator

pub mod io;
pub mod pattern;
pub mod rules;
pub mod simulator;

pub use io::{
    create_example_patterns, load_pattern_from_file, load_patterns_from_directory, PatternFile,
};
pub use pattern::{Cell, Pattern};
pub use rules::{CompiledRule, TransitionTable};
pub use simulator::{LifeSimulator, Simulation};
