//! stylecycle - Composable style cycles
//!
//! CLI entry point: inspect a composed style cycle and hand out remembered
//! styles that stay stable between runs.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stylecycle::cli::display::{
    format_assignment, format_by_key, format_style, format_table, print_assignment_summary,
    print_cycle_summary, print_header,
};
use stylecycle::log::{assign_styles, AssignmentLog};
use stylecycle::{Cycle, StyleConfig, Value};

/// Composable style cycles
///
/// Builds a cycle of style dictionaries from styles.toml (or an inline
/// expression) and prints it, or assigns remembered styles to names.
#[derive(Parser, Debug)]
#[command(name = "stylecycle", version, about)]
struct Cli {
    /// Path to the styles.toml configuration file
    #[arg(long, global = true, default_value = "styles.toml")]
    config: PathBuf,

    /// Composition expression, overriding `compose` from the config
    #[arg(long, global = true)]
    expr: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every style of the cycle as a table
    Show {
        /// Flatten the composition into a single zip before printing
        #[arg(long)]
        simplify: bool,

        /// Print an HTML table instead
        #[arg(long)]
        html: bool,
    },
    /// Print the cycle as a composition expression
    Repr,
    /// Print the values each key takes over one pass
    Keys,
    /// Print the first N styles, repeating the cycle as needed
    Take {
        /// Number of styles to print
        n: usize,
    },
    /// Assign each name a style, remembering earlier assignments
    Assign {
        /// Names to assign styles to
        #[arg(required = true)]
        names: Vec<String>,

        /// Restart the cycle when it runs out of styles
        #[arg(long = "loop")]
        looping: bool,

        /// Directory for the assignment log (.stylecycle by default)
        #[arg(long, default_value = ".stylecycle")]
        log_dir: PathBuf,

        /// Forget all earlier assignments first
        #[arg(long)]
        fresh: bool,
    },
}

/// Load the config, falling back to an empty one when only `--expr` is given.
fn load_config(path: &Path, expr: Option<&str>) -> Result<StyleConfig> {
    if expr.is_some() && !path.exists() {
        debug!(path = %path.display(), "no config file, using inline expression only");
        return Ok(StyleConfig::default());
    }
    StyleConfig::from_path(path)
        .with_context(|| format!("Failed to load config from '{}'", path.display()))
}

/// The first `n` styles of the endlessly repeating cycle, one per line.
fn take_styles(cycle: &Cycle<String, Value>, n: usize) -> Vec<String> {
    cycle.repeat().take(n).map(|style| format_style(&style)).collect()
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("STYLECYCLE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(&cli.config, cli.expr.as_deref())?;
    let cycle = config.build_cycle(cli.expr.as_deref())?;

    match cli.command {
        Command::Show { simplify, html } => {
            let cycle = if simplify { cycle.simplify() } else { cycle };
            if html {
                println!("{}", cycle.to_html());
            } else {
                print_header(&cycle.to_string());
                print_cycle_summary(&cycle);
                print!("{}", format_table(&cycle));
            }
        }
        Command::Repr => println!("{cycle}"),
        Command::Keys => print!("{}", format_by_key(&cycle)),
        Command::Take { n } => {
            for line in take_styles(&cycle, n) {
                println!("{line}");
            }
        }
        Command::Assign {
            names,
            looping,
            log_dir,
            fresh,
        } => {
            let log = AssignmentLog::new(&log_dir)
                .context("Failed to initialize assignment log")?;
            if fresh {
                log.clear()?;
            }
            let looping = looping || config.remember.looping;
            let assignments = assign_styles(&cycle, &names, looping, &log)?;
            for assignment in &assignments {
                println!("{}", format_assignment(assignment));
            }
            print_assignment_summary(&assignments);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_assign_command() {
        let cli = Cli::parse_from([
            "stylecycle",
            "assign",
            "cat",
            "dog",
            "--loop",
            "--config",
            "my.toml",
        ]);
        assert_eq!(cli.config, PathBuf::from("my.toml"));
        match cli.command {
            Command::Assign {
                names,
                looping,
                log_dir,
                fresh,
            } => {
                assert_eq!(names, vec!["cat", "dog"]);
                assert!(looping);
                assert!(!fresh);
                assert_eq!(log_dir, PathBuf::from(".stylecycle"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_assign_requires_names() {
        assert!(Cli::try_parse_from(["stylecycle", "assign"]).is_err());
    }

    #[test]
    fn test_parse_show_with_expr() {
        let cli = Cli::parse_from(["stylecycle", "--expr", "color * lw", "show", "--simplify"]);
        assert_eq!(cli.expr.as_deref(), Some("color * lw"));
        assert!(matches!(
            cli.command,
            Command::Show {
                simplify: true,
                html: false
            }
        ));
    }

    #[test]
    fn test_load_config_inline_expr_without_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("styles.toml");

        let config = load_config(&missing, Some(r#"cycler("c", ["r"])"#)).unwrap();
        assert!(config.properties.is_empty());

        let err = load_config(&missing, None).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_take_styles_repeats() {
        let config = StyleConfig::default();
        let cycle = config
            .build_cycle(Some(r#"cycler("c", ["r", "g"])"#))
            .unwrap();
        assert_eq!(
            take_styles(&cycle, 3),
            vec!["c=\"r\"", "c=\"g\"", "c=\"r\""]
        );
        assert!(take_styles(&cycle, 0).is_empty());
    }
}
