//! Command line interface for the rule-family calculator

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rule_family::{
    config::{CliOverrides, OutputFormat, SearchConfig, Settings},
    find_rule_family,
    game_of_life::{
        create_example_patterns, load_pattern_from_file, load_patterns_from_directory,
        LifeSimulator,
    },
    normalize_str,
    rule::parse_rule,
    search::{run_session, BatchSearch, TraceValidator},
    utils::{ColorOutput, ConsoleIo, ConsoleLogger, FamilyFormatter},
    InputError,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rule_family")]
#[command(about = "Find every Life-like rule a pattern works in")]
#[command(version = "0.1.0")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv every trial)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the rule family of one pattern
    Search {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Pattern file (overrides config)
        #[arg(short, long)]
        pattern: Option<PathBuf>,

        /// Baseline rule (overrides config and the pattern header)
        #[arg(short, long)]
        rule: Option<String>,

        /// Generations to compare (overrides config)
        #[arg(short = 'n', long)]
        period: Option<usize>,

        /// Ask for the period on the terminal
        #[arg(short, long, conflicts_with = "period")]
        interactive: bool,

        /// Save the result to this directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save results as JSON
        #[arg(long)]
        json: bool,

        /// Show the pattern and per-pass statistics
        #[arg(long)]
        details: bool,
    },

    /// Search every pattern file in a directory
    Batch {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Directory of .rle and .txt patterns
        #[arg(short, long)]
        directory: PathBuf,

        /// Rule for files without a header rule (overrides config)
        #[arg(short, long)]
        rule: Option<String>,

        /// Generations to compare (overrides config)
        #[arg(short = 'n', long)]
        period: Option<usize>,

        /// Save results to this directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a rule reproduces a pattern's evolution
    Verify {
        /// Pattern file
        #[arg(short, long)]
        pattern: PathBuf,

        /// Baseline rule (defaults to the pattern header, then B3/S23)
        #[arg(short, long)]
        rule: Option<String>,

        /// Rule to check
        #[arg(short = 'k', long)]
        candidate: String,

        /// Generations to compare
        #[arg(short = 'n', long)]
        period: usize,
    },

    /// Print rules in canonical Hensel notation
    Normalize {
        /// Rules to normalize
        #[arg(required = true)]
        rules: Vec<String>,

        /// Spell out every condition
        #[arg(long)]
        expanded: bool,
    },

    /// Create example configuration and pattern files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ConsoleLogger::init(ConsoleLogger::level_for(cli.verbose))
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Search {
            config,
            pattern,
            rule,
            period,
            interactive,
            output,
            json,
            details,
        } => {
            let overrides = CliOverrides {
                rule,
                period,
                pattern_file: pattern,
                output_dir: output,
                format: json.then_some(OutputFormat::Json),
            };
            search_command(&config, &overrides, interactive, details)
        }
        Commands::Batch {
            config,
            directory,
            rule,
            period,
            output,
            json,
        } => {
            let overrides = CliOverrides {
                rule,
                period,
                pattern_file: None,
                output_dir: output,
                format: json.then_some(OutputFormat::Json),
            };
            batch_command(&config, &directory, &overrides)
        }
        Commands::Verify {
            pattern,
            rule,
            candidate,
            period,
        } => {
            verify_command(&pattern, rule, &candidate, period)
        }
        Commands::Normalize { rules, expanded } => normalize_command(&rules, expanded),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        log::warn!("Config file {} not found, using defaults", config_path.display());
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn search_command(
    config_path: &Path,
    overrides: &CliOverrides,
    interactive: bool,
    details: bool,
) -> Result<()> {
    let settings = load_settings(config_path, overrides)?;

    let (name, family) = if interactive {
        settings.validate_inputs()?;
        let file = load_pattern_from_file(&settings.search.pattern_file)
            .context("Failed to load pattern file")?;
        let baseline = settings.baseline_rule(file.rule.as_deref())?;
        let mut simulator = LifeSimulator::with_pattern(&baseline.to_string(), &file.pattern)
            .map_err(InputError::UnsupportedBaseline)?
            .with_max_population(settings.simulation.max_population);

        let mut io = ConsoleIo::stdio();
        let family = run_session(&mut simulator, &mut io)?;
        (file.name, family)
    } else {
        let (file, family) = find_rule_family(&settings)?;
        println!("{}", FamilyFormatter::format_family(&family, &file.name));
        if details {
            println!("{}", FamilyFormatter::format_pattern_compact(&file.pattern));
        }
        (file.name, family)
    };

    if details {
        println!("{}", FamilyFormatter::format_statistics(&family));
    }

    if settings.output.save_results {
        let path = FamilyFormatter::save_family(
            &family,
            &name,
            &settings.output.output_directory,
            settings.output.format,
        )
        .context("Failed to save result")?;
        println!("{}", ColorOutput::success(&format!("Saved {}", path.display())));
    }

    Ok(())
}

fn batch_command(config_path: &Path, directory: &Path, overrides: &CliOverrides) -> Result<()> {
    let settings = load_settings(config_path, overrides)?;

    let files = load_patterns_from_directory(directory)
        .with_context(|| format!("Failed to load patterns from {}", directory.display()))?;
    if files.is_empty() {
        println!("{}", ColorOutput::warning("No pattern files found"));
        return Ok(());
    }

    let batch = BatchSearch {
        default_rule: settings.baseline_rule(None)?,
        period: settings.search.period,
        max_population: settings.simulation.max_population,
    };
    let entries = batch.run(&files);

    println!("{}", FamilyFormatter::format_batch_summary(&entries));

    let failures = entries.iter().filter(|entry| entry.result.is_err()).count();
    if failures > 0 {
        let message = format!("{} of {} searches failed", failures, entries.len());
        println!("{}", ColorOutput::warning(&message));
    }

    if settings.output.save_results {
        let output = &settings.output;
        FamilyFormatter::save_batch(&entries, &output.output_directory, output.format)
            .context("Failed to save results")?;
        println!(
            "{}",
            ColorOutput::success(&format!(
                "Results saved to {}",
                settings.output.output_directory.display()
            ))
        );
    }

    Ok(())
}

fn verify_command(
    pattern_path: &Path,
    rule: Option<String>,
    candidate: &str,
    period: usize,
) -> Result<()> {
    let file = load_pattern_from_file(pattern_path)
        .with_context(|| format!("Failed to load pattern from {}", pattern_path.display()))?;

    let settings = Settings {
        search: SearchConfig {
            rule,
            period,
            pattern_file: pattern_path.to_path_buf(),
        },
        ..Settings::default()
    };
    let baseline = settings.baseline_rule(file.rule.as_deref())?;
    let candidate = parse_rule(candidate).context("Invalid candidate rule")?;

    let result = TraceValidator::new(period)
        .with_max_population(settings.simulation.max_population)
        .validate(&file.pattern, &baseline, &candidate)?;

    if result.is_valid() {
        println!("{}", ColorOutput::success(&result.to_string()));
    } else {
        println!("{}", ColorOutput::error(&result.to_string()));
    }

    Ok(())
}

fn normalize_command(rules: &[String], expanded: bool) -> Result<()> {
    for rule in rules {
        let line = if expanded {
            parse_rule(rule)
                .with_context(|| format!("Invalid rule: {}", rule))?
                .expanded()
        } else {
            normalize_str(rule).with_context(|| format!("Invalid rule: {}", rule))?
        };
        println!("{}", line);
    }
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/patterns");
    let output_dir = directory.join("output/families");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_patterns(&input_dir).context("Failed to create example patterns")?;
    println!("Created example patterns in: {}", input_dir.display());

    let variants_dir = config_dir.join("variants");
    std::fs::create_dir_all(&variants_dir)?;

    let mut blinker = Settings::default();
    blinker.search.period = 2;
    blinker.search.pattern_file = PathBuf::from("input/patterns/blinker.rle");
    blinker.to_file(variants_dir.join("blinker.yaml"))?;

    let mut highlife = Settings::default();
    highlife.search.rule = Some("B36/S23".to_string());
    highlife.search.pattern_file = PathBuf::from("input/patterns/lwss.rle");
    highlife.output.format = OutputFormat::Json;
    highlife.output.save_results = true;
    highlife.to_file(variants_dir.join("lwss_highlife.yaml"))?;

    println!("Created configuration variants in: {}", variants_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!("2. Add your patterns to {}", input_dir.display());
    println!("3. Run: rule_family search --config config/default.yaml");

    Ok(())
}
