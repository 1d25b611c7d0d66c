//! Configuration management for the rule-family calculator

pub mod settings;

pub use settings::{
    CliOverrides, OutputConfig, OutputFormat, SearchConfig, Settings, SimulationConfig,
};
