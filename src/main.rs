use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use jsx_conditional::config::{discover, load_from_path, LintConfig, Severity};
use jsx_conditional::edit::WriteResult;
use jsx_conditional::linter::{LintMessage, Linter};
use jsx_conditional::registry::RuleRegistry;
use jsx_conditional::ts::Dialect;
use serde_json::json;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into.
const ALWAYS_IGNORED: [&str; 2] = ["node_modules", ".git"];

#[derive(Parser)]
#[command(name = "jsx-conditional")]
#[command(
    about = "Enforce ternary or && conditional rendering in JSX",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the nearest .jsx-conditional.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Preset to extend, overriding the config file ("recommended" or "all")
    #[arg(long, global = true)]
    preset: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report conditional rendering that does not match the configured style
    Check {
        /// Files or directories to check (defaults to the current directory)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Rewrite files to the configured style
    Fix {
        /// Files or directories to fix (defaults to the current directory)
        paths: Vec<PathBuf>,

        /// Dry run - show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// List available rules with their options schema
    Rules {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = RuleRegistry::builtin();

    match cli.command {
        Commands::Check { paths, format } => {
            let config = load_config(cli.config.as_deref(), cli.preset.as_deref(), &registry)?;
            let linter = Linter::new(config.resolve(&registry)?);
            let files = collect_files(&paths, &config.ignore);
            cmd_check(&linter, &files, format)
        }

        Commands::Fix {
            paths,
            dry_run,
            diff,
        } => {
            let config = load_config(cli.config.as_deref(), cli.preset.as_deref(), &registry)?;
            let linter = Linter::new(config.resolve(&registry)?);
            let files = collect_files(&paths, &config.ignore);
            cmd_fix(&linter, &files, dry_run, diff)
        }

        Commands::Rules { format } => cmd_rules(&registry, format),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Load the explicit or discovered config, falling back to the defaults.
fn load_config(
    path: Option<&Path>,
    preset: Option<&str>,
    registry: &RuleRegistry,
) -> Result<LintConfig> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => discover(&env::current_dir().context("Failed to read current directory")?),
    };

    let mut config = match path {
        Some(path) => {
            tracing::debug!("using config {}", path.display());
            load_from_path(&path, registry)?
        }
        None => LintConfig::default(),
    };

    if let Some(preset) = preset {
        config.extends = Some(preset.to_string());
        config.validate(registry)?;
    }
    Ok(config)
}

fn is_ignored(entry: &DirEntry, ignore: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    ALWAYS_IGNORED.contains(&name) || ignore.iter().any(|ignored| ignored == name)
}

/// Expand `paths` into the JSX files to visit. Explicit files are kept as
/// given; directories contribute only files with a JSX dialect.
fn collect_files(paths: &[PathBuf], ignore: &[String]) -> Vec<PathBuf> {
    let roots = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.to_vec()
    };

    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root);
            continue;
        }

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_ignored(entry, ignore));
        for entry in walker {
            match entry {
                Ok(entry)
                    if entry.file_type().is_file()
                        && Dialect::from_path(entry.path()).is_some() =>
                {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(err) => tracing::warn!("skipping unreadable entry: {err}"),
            }
        }
    }
    files
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "error".red(),
        Severity::Warn => "warning".yellow(),
        Severity::Off => "off".dimmed(),
    }
}

fn cmd_check(linter: &Linter, files: &[PathBuf], format: Format) -> Result<()> {
    let mut reports: Vec<(&Path, Vec<LintMessage>)> = Vec::new();
    let mut failed = 0usize;

    for file in files {
        match linter.lint_path(file) {
            Ok(messages) => reports.push((file.as_path(), messages)),
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                failed += 1;
            }
        }
    }

    let messages = || reports.iter().flat_map(|(_, messages)| messages);
    let errors = messages()
        .filter(|m| m.severity == Severity::Error)
        .count();
    let warnings = messages().filter(|m| m.severity == Severity::Warn).count();
    let fixable = messages().filter(|m| m.fixable()).count();

    match format {
        Format::Json => {
            let files: Vec<_> = reports
                .iter()
                .map(|(path, messages)| {
                    json!({
                        "path": path.display().to_string(),
                        "messages": messages,
                    })
                })
                .collect();
            let output = json!({
                "files": files,
                "errorCount": errors,
                "warningCount": warnings,
                "fixableCount": fixable,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Format::Text => {
            for (path, messages) in &reports {
                for message in messages {
                    println!(
                        "{}:{}  {}  {}  {}",
                        path.display(),
                        message.start,
                        severity_label(message.severity),
                        message.message,
                        format!("({})", message.rule).dimmed()
                    );
                }
            }

            let total = errors + warnings;
            if total == 0 {
                println!("{} {} file(s) checked, no problems", "✓".green(), files.len());
            } else {
                println!();
                println!(
                    "{} {} problem(s) ({} error(s), {} warning(s))",
                    "✗".red(),
                    total,
                    errors,
                    warnings
                );
                if fixable > 0 {
                    println!(
                        "  {} fixable with `jsx-conditional fix`",
                        format!("{}", fixable).cyan()
                    );
                }
            }
        }
    }

    if errors > 0 || failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Helper: Show unified diff between original and fixed content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (fixed)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);
    let mut unified = diff.unified_diff();
    unified.context_radius(2);
    for hunk in unified.iter_hunks() {
        println!("{}", hunk.header().to_string().cyan());
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => format!("-{}", change).red(),
                ChangeTag::Insert => format!("+{}", change).green(),
                ChangeTag::Equal => format!(" {}", change).normal(),
            };
            print!("{}", sign);
            if change.missing_newline() {
                println!();
            }
        }
    }
}

fn cmd_fix(linter: &Linter, files: &[PathBuf], dry_run: bool, show_diff: bool) -> Result<()> {
    if dry_run {
        println!("{}", "[DRY RUN - showing what would be fixed]".cyan());
    }

    let mut total_fixed = 0usize;
    let mut total_remaining = 0usize;
    let mut remaining_errors = 0usize;
    let mut failed = 0usize;

    for file in files {
        let result = match linter.fix_path(file, !dry_run) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                failed += 1;
                continue;
            }
        };

        let report = &result.report;
        total_fixed += report.fixed;
        total_remaining += report.remaining.len();
        remaining_errors += report
            .remaining
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .count();

        if !report.changed() {
            continue;
        }
        if show_diff {
            display_diff(file, &result.file.text, &report.output);
        }
        match &result.write {
            Some(WriteResult::Written { bytes, .. }) => println!(
                "{} {}: fixed {} problem(s) ({} bytes written)",
                "✓".green(),
                file.display(),
                report.fixed,
                bytes
            ),
            Some(WriteResult::Unchanged { .. }) => {}
            None => println!(
                "{} {}: would fix {} problem(s)",
                "→".cyan(),
                file.display(),
                report.fixed
            ),
        }
        for message in &report.remaining {
            println!(
                "  {}:{}  {}  {}",
                file.display(),
                message.start,
                severity_label(message.severity),
                message.message
            );
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} fixed", format!("{}", total_fixed).green());
    println!("  {} remaining", format!("{}", total_remaining).yellow());
    println!("  {} failed", format!("{}", failed).red());

    if remaining_errors > 0 || failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_rules(registry: &RuleRegistry, format: Format) -> Result<()> {
    if format == Format::Json {
        let rules: Vec<_> = registry.entries().map(|entry| entry.meta.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    println!("{}", "Available rules:".bold());
    println!();

    for entry in registry.entries() {
        let meta = entry.meta;
        println!("{}", meta.name.bold());
        println!("  {}", meta.description);
        println!("  Category: {}", meta.category);
        println!(
            "  Fixable: {}",
            match meta.fixable {
                Some(_) => "yes".green(),
                None => "no".dimmed(),
            }
        );
        println!(
            "  Recommended: {}",
            if meta.recommended { "yes" } else { "no" }
        );
        println!("  Messages:");
        for kind in meta.messages {
            println!("    {}: {}", kind.id().cyan(), kind.template());
        }
        println!("  Options schema:");
        let schema = serde_json::to_string_pretty(&(meta.schema)())?;
        for line in schema.lines() {
            println!("    {}", line.dimmed());
        }
        println!();
    }
    Ok(())
}
