use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde_json::{Value, json};
use std::path::PathBuf;

use emmet_assist::config::translate_profile;
use emmet_assist::customizations::load_directory;
use emmet_assist::document::Position;
use emmet_assist::engine::{ExtractOptions, ScanOnlyEngine};
use emmet_assist::exit_codes;
use emmet_assist::extract::extract_from_line;
use emmet_assist::filters::DEFAULT_MAX_FILTERS;
use emmet_assist::syntax::{SyntaxKind, get_emmet_mode};
use emmet_assist::validate;

#[derive(Parser)]
#[command(author, version, about = "Emmet abbreviation extraction and validation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the abbreviation ending at a column of a line
    Extract {
        /// Line of text
        line: String,

        /// Cursor column in characters (defaults to the end of the line)
        #[arg(short, long)]
        column: Option<u32>,

        /// Emmet syntax of the line
        #[arg(short, long, default_value = "html")]
        syntax: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether text is a plausible abbreviation
    Validate {
        syntax: String,
        abbreviation: String,

        /// Name the rule that decided
        #[arg(long)]
        explain: bool,
    },

    /// Map an editor language id onto an Emmet syntax
    Mode {
        language: String,

        /// Languages to exclude (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Translate a legacy syntax profile given as JSON
    Profile { json: String },

    /// Load an extensions directory and summarize it
    Customizations { dir: PathBuf },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn run_extract(line: &str, column: Option<u32>, syntax: &str, as_json: bool) -> i32 {
    let column = column.unwrap_or_else(|| line.chars().count() as u32);
    let options = ExtractOptions::for_kind(SyntaxKind::of(syntax));

    let Some(token) = extract_from_line(
        &ScanOnlyEngine,
        line,
        Position::new(0, column),
        &options,
        DEFAULT_MAX_FILTERS,
    ) else {
        if !as_json {
            println!("{}", "No abbreviation found".yellow());
        }
        return exit_codes::NOT_FOUND;
    };

    if as_json {
        let output = json!({
            "abbreviation": token.abbreviation,
            "filter": token.filter(),
            "range": token.range,
        });
        println!("{output}");
    } else {
        println!("{} {}", "abbreviation:".bold(), token.abbreviation.green());
        println!(
            "{} {}..{}",
            "columns:".bold(),
            token.range.start.character,
            token.range.end.character
        );
        if let Some(filter) = token.filter() {
            println!("{} {}", "filter:".bold(), filter.cyan());
        }
    }
    exit_codes::SUCCESS
}

fn run_validate(syntax: &str, abbreviation: &str, explain: bool) -> i32 {
    let decision = validate::explain(SyntaxKind::of(syntax), abbreviation);
    let verdict = if decision.valid { "valid".green() } else { "invalid".red() };

    if explain {
        println!("{verdict} ({})", decision.rule.dimmed());
    } else {
        println!("{verdict}");
    }

    if decision.valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::NOT_FOUND
    }
}

fn run_mode(language: &str, exclude: &[String]) -> i32 {
    match get_emmet_mode(language, exclude) {
        Some(syntax) => {
            println!("{syntax}");
            exit_codes::SUCCESS
        }
        None => {
            println!("{}", format!("No Emmet syntax for '{language}'").yellow());
            exit_codes::NOT_FOUND
        }
    }
}

fn run_profile(input: &str) -> Result<i32> {
    let profile: Value = serde_json::from_str(input).context("Profile must be valid JSON")?;
    let translated = translate_profile(&profile);
    println!("{}", serde_json::to_string_pretty(&translated)?);
    Ok(exit_codes::SUCCESS)
}

fn run_customizations(dir: PathBuf) -> Result<i32> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let customizations = runtime
        .block_on(load_directory(&dir))
        .with_context(|| format!("Failed to load customizations from {}", dir.display()))?;

    println!("{} {}", "Loaded".green().bold(), dir.display());
    println!("{} {}", "variables:".bold(), customizations.variables.len());

    let mut syntaxes: Vec<_> = customizations.snippets.iter().collect();
    syntaxes.sort_by(|a, b| a.0.cmp(b.0));
    for (syntax, snippets) in syntaxes {
        println!("  {:<10} {} snippets", syntax.cyan(), snippets.len());
    }

    if !customizations.profiles.is_empty() {
        let names: Vec<&str> = customizations.profiles.keys().map(String::as_str).collect();
        println!("{} {}", "profiles:".bold(), names.join(", "));
    }
    Ok(exit_codes::SUCCESS)
}

fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::Extract {
            line,
            column,
            syntax,
            json,
        } => Ok(run_extract(&line, column, &syntax, json)),
        Commands::Validate {
            syntax,
            abbreviation,
            explain,
        } => Ok(run_validate(&syntax, &abbreviation, explain)),
        Commands::Mode { language, exclude } => Ok(run_mode(&language, &exclude)),
        Commands::Profile { json } => run_profile(&json),
        Commands::Customizations { dir } => run_customizations(dir),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {e:#}", "error".red().bold());
            exit_codes::exit::tool_error();
        }
    }
}
