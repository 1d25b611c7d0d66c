//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::game_of_life::Pattern;
use crate::search::{BatchEntry, RuleFamily};
use anyhow::Result;
use itertools::Itertools;
use std::path::{Path, PathBuf};

/// Format rule families for display
pub struct FamilyFormatter;

impl FamilyFormatter {
    /// Format one search result for console output
    pub fn format_family(family: &RuleFamily, name: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== {} ===\n", name));
        output.push_str(&format!("Baseline: {}\n", family.baseline));
        output.push_str(&format!("Period: {}\n", family.period));
        output.push_str(&format!("Living Cells: {}\n", family.population));
        output.push_str(&format!("Search Time: {:.3}s\n", family.search_time.as_secs_f64()));
        output.push('\n');
        output.push_str(&format!("Need: {}\n", family.need));
        output.push_str(&format!("OK:   {}\n", family.ok));
        output.push_str(&format!(
            "Pattern works in 2^{} rules:\n{}\n",
            family.free_conditions(),
            family.expression()
        ));

        output
    }

    /// Trial counters of each pass as a table
    pub fn format_statistics(family: &RuleFamily) -> String {
        let mut output = String::new();

        output.push_str("Pass          | Trials | Kept | Diverged | Rejected\n");
        output.push_str("--------------|--------|------|----------|---------\n");
        for (name, pass) in family.statistics.passes() {
            output.push_str(&format!(
                "{:13} | {:6} | {:4} | {:8} | {:8}\n",
                name, pass.trials, pass.accepted, pass.diverged, pass.rejected
            ));
        }

        output
    }

    /// Format batch results as a summary table
    pub fn format_batch_summary(entries: &[BatchEntry]) -> String {
        let mut output = String::new();

        output.push_str("Families Summary:\n");
        output.push_str("Name             |   k | Time(ms) | Family\n");
        output.push_str("-----------------|-----|----------|----------\n");

        for entry in entries {
            match &entry.result {
                Ok(family) => output.push_str(&format!(
                    "{:16} | {:3} | {:8} | {}\n",
                    truncate(&entry.name, 16),
                    family.free_conditions(),
                    family.search_time.as_millis(),
                    family.expression()
                )),
                Err(e) => output.push_str(&format!(
                    "{:16} |   - |        - | error: {}\n",
                    truncate(&entry.name, 16),
                    e
                )),
            }
        }

        output
    }

    /// Format a pattern inside its bounding box
    pub fn format_pattern_compact(pattern: &Pattern) -> String {
        let Some(((min_x, min_y), (max_x, max_y))) = pattern.bounding_box() else {
            return "(empty)\n".to_string();
        };

        (min_y..=max_y)
            .map(|y| {
                (min_x..=max_x)
                    .map(|x| if pattern.contains((x, y)) { '█' } else { '·' })
                    .collect::<String>()
            })
            .map(|row| row + "\n")
            .join("")
    }

    /// Save one family in the configured format; returns the file written.
    pub fn save_family<P: AsRef<Path>>(
        family: &RuleFamily,
        name: &str,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join(format!("{}.family.txt", name));
                let content = format!(
                    "{}\n{}",
                    Self::format_family(family, name),
                    Self::format_statistics(family)
                );
                std::fs::write(&path, content)?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join(format!("{}.family.json", name));
                family.save_to_file(&path)?;
                path
            }
        };

        Ok(path)
    }

    /// Save every successful batch result, plus a JSON summary in JSON mode
    pub fn save_batch<P: AsRef<Path>>(
        entries: &[BatchEntry],
        output_dir: P,
        format: OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();

        let families = entries
            .iter()
            .filter_map(|entry| entry.result.as_ref().ok().map(|family| (entry, family)));
        for (entry, family) in families.clone() {
            Self::save_family(family, &entry.name, output_dir, format)?;
        }

        if format == OutputFormat::Json {
            let summaries: Vec<_> = families
                .map(|(entry, family)| family.summary(&entry.name))
                .collect();
            let summary_path = output_dir.join("families_summary.json");
            std::fs::create_dir_all(output_dir)?;
            std::fs::write(summary_path, serde_json::to_string_pretty(&summaries)?)?;
        }

        Ok(())
    }
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchStatistics;
    use std::time::Duration;
    use tempfile::tempdir;

    fn blinker_family() -> RuleFamily {
        RuleFamily {
            baseline: "B3/S23".parse().unwrap(),
            period: 2,
            need: "B3i/S2i".parse().unwrap(),
            ok: "B2ceikn345678/S01c2345678".parse().unwrap(),
            population: 3,
            statistics: SearchStatistics::default(),
            search_time: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_pattern_formatting() {
        let pattern: Pattern = [(5, 5), (6, 6)].into_iter().collect();
        assert_eq!(FamilyFormatter::format_pattern_compact(&pattern), "█·\n·█\n");
        assert_eq!(FamilyFormatter::format_pattern_compact(&Pattern::new()), "(empty)\n");
    }

    #[test]
    fn test_family_formatting() {
        let text = FamilyFormatter::format_family(&blinker_family(), "blinker");
        assert!(text.starts_with("=== blinker ===\n"));
        assert!(text.contains(
            "Pattern works in 2^95 rules:\nB3i/S2i - B2ceikn345678/S01c2345678\n"
        ));

        let table = FamilyFormatter::format_statistics(&blinker_family());
        assert_eq!(table.lines().count(), 6);
    }

    #[test]
    fn test_save_family_formats() {
        let dir = tempdir().unwrap();
        let family = blinker_family();

        let text =
            FamilyFormatter::save_family(&family, "blinker", dir.path(), OutputFormat::Text)
                .unwrap();
        assert_eq!(text, dir.path().join("blinker.family.txt"));
        assert!(std::fs::read_to_string(&text).unwrap().contains("2^95"));

        let json =
            FamilyFormatter::save_family(&family, "blinker", dir.path(), OutputFormat::Json)
                .unwrap();
        let loaded = RuleFamily::load_from_file(&json).unwrap();
        assert_eq!(loaded.expression(), family.expression());
    }

    #[test]
    fn test_batch_summary() {
        let dir = tempdir().unwrap();
        let entries = vec![
            BatchEntry {
                name: "blinker".to_string(),
                result: Ok(blinker_family()),
            },
            BatchEntry {
                name: "empty".to_string(),
                result: Err(crate::error::InputError::EmptyPattern.into()),
            },
        ];

        let table = FamilyFormatter::format_batch_summary(&entries);
        assert!(table.contains("blinker"));
        assert!(table.contains("error: the pattern is empty"));

        FamilyFormatter::save_batch(&entries, dir.path(), OutputFormat::Json).unwrap();
        assert!(dir.path().join("blinker.family.json").exists());
        assert!(!dir.path().join("empty.family.json").exists());
        assert!(dir.path().join("families_summary.json").exists());
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
