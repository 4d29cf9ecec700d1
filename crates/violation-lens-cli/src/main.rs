use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use log::{debug, LevelFilter};

use violation_lens_core::{
    CategoryDef, Config, MatchResult, PatternFile, Result, ViolationEngine, ViolationError,
};

mod args;
use args::{Cli, Commands, ConfigAction, PatternsAction, Shell};

fn main() -> ExitCode {
    let Cli {
        verbose,
        quiet,
        base_dir,
        command,
    } = Cli::parse();

    let result = resolve_base_dir(base_dir).and_then(|base_dir| {
        let config = Config::load(&base_dir)?;
        init_logging(verbose, quiet, &config);
        run(command, &base_dir, &config)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(command: Option<Commands>, base_dir: &Path, config: &Config) -> Result<()> {
    match command {
        Some(Commands::Classify {
            texts,
            file,
            details,
            json,
        }) => handle_classify(base_dir, config, texts, file.as_deref(), details, json),
        Some(Commands::Stats {
            file,
            suggest,
            json,
        }) => handle_stats(base_dir, config, &file, suggest, json),
        Some(Commands::Patterns { action }) => handle_patterns(action, base_dir, config),
        Some(Commands::Config { action }) => handle_config(action, base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    }
}

/// `-v`/`-q` win over `RUST_LOG`, which wins over `log.level`
fn init_logging(verbose: bool, quiet: bool, config: &Config) {
    let env = env_logger::Env::default().default_filter_or(config.log.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    builder.format_timestamp(None);

    if verbose {
        builder.filter_level(LevelFilter::Debug);
    } else if quiet {
        builder.filter_level(LevelFilter::Error);
    }

    builder.init();
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "violation-lens", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(base) = cli_base {
        return Ok(base);
    }

    if let Ok(base) = std::env::var("VIOLATION_LENS_BASE") {
        return Ok(PathBuf::from(base));
    }

    dirs::home_dir()
        .map(|h| h.join(".violation-lens"))
        .ok_or(ViolationError::HomeNotFound)
}

/// Engine with the configured rule-set file applied, if one exists
fn open_engine(base_dir: &Path, config: &Config) -> Result<(ViolationEngine, PathBuf)> {
    let engine = ViolationEngine::with_options(config.engine_options());
    let patterns_path = config.patterns_path(base_dir);

    if patterns_path.exists() {
        engine.load_patterns(&patterns_path)?;
    } else {
        debug!(
            "No rule set at {}, using built-in patterns",
            patterns_path.display()
        );
    }

    Ok((engine, patterns_path))
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content.lines().map(str::to_string).collect())
}

fn handle_classify(
    base_dir: &Path,
    config: &Config,
    mut texts: Vec<String>,
    file: Option<&Path>,
    details: bool,
    json: bool,
) -> Result<()> {
    if let Some(file) = file {
        texts.extend(read_lines(file)?);
    }
    if texts.is_empty() {
        for line in io::stdin().lock().lines() {
            texts.push(line?);
        }
    }

    let (engine, _) = open_engine(base_dir, config)?;

    if json {
        let results: Vec<serde_json::Value> = texts
            .iter()
            .map(|text| {
                let result = engine.classify_with_details(text);
                serde_json::json!({
                    "text": text,
                    "categories": result.categories,
                    "details": result.details,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for text in &texts {
        let result = engine.classify_with_details(text);
        print_match(text, &result, details);
    }

    Ok(())
}

fn print_match(text: &str, result: &MatchResult, details: bool) {
    if result.is_empty() {
        println!("{} {}", "[OK]".green(), text);
        return;
    }

    println!(
        "{} {} {}",
        "[VIOLATION]".red().bold(),
        text,
        format!("({})", result.categories.join(", ")).yellow()
    );

    if details {
        for detail in &result.details {
            println!(
                "  {} {} confidence={:.2}",
                detail.category.cyan().bold(),
                detail.description.dimmed(),
                detail.confidence
            );
            if !detail.evidence.is_empty() {
                println!("    evidence: {}", detail.evidence);
            }
        }
    }
}

fn handle_stats(
    base_dir: &Path,
    config: &Config,
    file: &Path,
    suggest: bool,
    json: bool,
) -> Result<()> {
    let texts = read_lines(file)?;
    let (engine, _) = open_engine(base_dir, config)?;

    let stats = engine.statistics(&texts);
    let suggestions = suggest.then(|| engine.suggest_improvements(&texts));

    if json {
        let value = serde_json::json!({
            "statistics": stats,
            "suggestions": suggestions,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!("Texts: {}", stats.total_texts);
    println!("Violation rate: {:.1}%", stats.violation_rate * 100.0);
    println!();

    if stats.violation_counts.is_empty() {
        println!("No violations found.");
    }
    for (category, count) in &stats.violation_counts {
        println!("{} {}", category.cyan().bold(), count);
        if let Some(patterns) = stats.pattern_matches.get(category) {
            for (pattern, hits) in patterns {
                println!("  {} {}", pattern, hits);
            }
        }
    }

    if let Some(suggestions) = suggestions {
        println!();
        print_samples("Low-confidence samples:", &suggestions.low_confidence_samples);
        print_samples("Unmatched samples:", &suggestions.unmatched_samples);
        println!("{}", "Tips:".bold());
        for tip in &suggestions.optimization_tips {
            println!("  - {}", tip);
        }
    }
    println!();

    Ok(())
}

fn print_samples(title: &str, samples: &[String]) {
    println!("{}", title.bold());
    if samples.is_empty() {
        println!("  (none)");
    }
    for sample in samples {
        println!("  {}", sample);
    }
    println!();
}

fn handle_patterns(action: PatternsAction, base_dir: &Path, config: &Config) -> Result<()> {
    let (engine, patterns_path) = open_engine(base_dir, config)?;

    match action {
        PatternsAction::List => {
            let snapshot = engine.registry().snapshot();
            println!();
            for category in snapshot.categories() {
                let marker = if category.is_custom() { " (custom)" } else { "" };
                println!("{}{}", category.name().cyan().bold(), marker.dimmed());
                println!("  {}", category.description());
                for pattern in category.patterns() {
                    println!("    {}", pattern.source());
                }
                println!();
            }
            return Ok(());
        }
        PatternsAction::Info => {
            let info = engine.pattern_info();
            let cache = engine.cache_stats();
            println!();
            println!("Rule set: {}", patterns_path.display());
            println!("Custom: {}", info.is_custom);
            println!("Categories: {}", info.category_count);
            for (name, count) in &info.pattern_counts {
                println!("  {} {}", name.cyan(), count);
            }
            println!(
                "Cache: {} entries, hit rate {:.1}% (enabled: {})",
                info.cache_size,
                cache.hit_rate * 100.0,
                cache.enabled
            );
            println!();
            return Ok(());
        }
        PatternsAction::Save { path } => {
            engine.save_patterns(&path)?;
            println!("{} {}", "Saved:".green(), path.display());
            return Ok(());
        }
        PatternsAction::Add {
            name,
            patterns,
            description,
            keywords,
        } => {
            let mut def = CategoryDef::new(&name, patterns).with_keywords(keywords);
            def.description = description;
            engine.add_violation_def(def)?;
            println!("{} {}", "Added:".green(), name);
        }
        PatternsAction::Remove { name } => {
            engine.remove_violation_type(&name)?;
            println!("{} {}", "Removed:".green(), name);
        }
        PatternsAction::Update { name, patterns } => {
            engine.update_violation_patterns(&name, patterns)?;
            println!("{} {}", "Updated:".green(), name);
        }
        PatternsAction::Reset => {
            engine.reset_to_default_patterns();
            println!("{} built-in rule set", "Reset:".green());
        }
        PatternsAction::Load { path } => {
            engine.load_patterns(&path)?;
            println!("{} {}", "Loaded:".green(), path.display());
        }
        PatternsAction::Set { path } => {
            let file = PatternFile::read(&path)?;
            engine.set_custom_patterns(&file.patterns)?;
            println!(
                "{} {} categories from {}",
                "Set:".green(),
                file.patterns.len(),
                path.display()
            );
        }
    }

    engine.save_patterns(&patterns_path)?;
    debug!("Persisted rule set to {}", patterns_path.display());
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(ViolationError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
