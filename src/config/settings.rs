//! Configuration settings for the rule-family calculator

use crate::game_of_life::LifeSimulator;
use crate::rule::{parse_rule, Rule};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Rule used when neither the settings nor the pattern file name one
pub const DEFAULT_RULE: &str = "B3/S23";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub search: SearchConfig,
    pub simulation: SimulationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Baseline rule; falls back to the pattern file's header rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    pub period: usize,
    pub pattern_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub max_population: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub save_results: bool,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                rule: None,
                period: 4,
                pattern_file: PathBuf::from("input/patterns/glider.rle"),
            },
            simulation: SimulationConfig {
                max_population: LifeSimulator::DEFAULT_MAX_POPULATION,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                save_results: false,
                output_directory: PathBuf::from("output/families"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.search.period == 0 {
            anyhow::bail!("Period must be at least 1");
        }

        if self.simulation.max_population == 0 {
            anyhow::bail!("Maximum population must be positive");
        }

        if let Some(rule) = &self.search.rule {
            parse_rule(rule).with_context(|| format!("Invalid rule in settings: {}", rule))?;
        }

        Ok(())
    }

    /// Check that the files a search reads are present
    pub fn validate_inputs(&self) -> Result<()> {
        if !self.search.pattern_file.exists() {
            anyhow::bail!(
                "Pattern file does not exist: {}",
                self.search.pattern_file.display()
            );
        }
        Ok(())
    }

    /// The baseline rule: the configured one, else `header_rule`, else Life.
    pub fn baseline_rule(&self, header_rule: Option<&str>) -> Result<Rule> {
        let rule = self.search.rule.as_deref().or(header_rule).unwrap_or(DEFAULT_RULE);
        parse_rule(rule).with_context(|| format!("Please use a Life-like rule, not {}", rule))
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref rule) = cli_overrides.rule {
            self.search.rule = Some(rule.clone());
        }
        if let Some(period) = cli_overrides.period {
            self.search.period = period;
        }
        if let Some(ref pattern_file) = cli_overrides.pattern_file {
            self.search.pattern_file = pattern_file.clone();
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
            self.output.save_results = true;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub rule: Option<String>,
    pub period: Option<usize>,
    pub pattern_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}
