//! Treemap CLI - colour a codebase metrics tree by a selectable metric

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use treemap_core::config::{self, ResolvedConfig};
use treemap_core::{load_tree, paint_tree, render_json, render_text, StrategyRegistry};

#[derive(Parser)]
#[command(name = "treemap")]
#[command(about = "Colour a codebase metrics tree by age, authors, complexity, coupling, or language")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute fill and stroke colours for every node in a metrics document
    Paint {
        /// Path to the metrics JSON document
        metrics: PathBuf,

        /// Colouring strategy
        #[arg(long, default_value = "age")]
        strategy: String,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover next to the metrics file)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the available colouring strategies
    Strategies,
    /// Validate or show a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without painting anything
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Paint {
            metrics,
            strategy,
            format,
            config: config_path,
        } => {
            if !metrics.exists() {
                anyhow::bail!("Path does not exist: {}", metrics.display());
            }

            // Config lives next to the metrics document unless given explicitly
            let project_root = match metrics.parent().filter(|p| !p.as_os_str().is_empty()) {
                Some(dir) => dir.to_path_buf(),
                None => std::env::current_dir()?,
            };
            let resolved = config::load_and_resolve(&project_root, config_path.as_deref())
                .context("failed to load configuration")?;
            if let Some(path) = &resolved.config_path {
                tracing::info!("Using config: {}", path.display());
            }

            let registry =
                StrategyRegistry::build(&resolved).context("failed to build colour strategies")?;
            let selected = registry.select(&strategy)?;

            let mut root = load_tree(&metrics)?;
            root.annotate();
            let painted = paint_tree(&root, selected, &resolved);

            match format {
                OutputFormat::Text => print!("{}", render_text(&painted)),
                OutputFormat::Json => println!("{}", render_json(&painted)),
            }
        }
        Commands::Strategies => {
            let registry = StrategyRegistry::build(&ResolvedConfig::defaults()?)?;
            for name in registry.names() {
                println!("{}", name);
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                match config::load_and_resolve(&project_root, path.as_deref()) {
                    Ok(resolved) => {
                        if let Some(ref p) = resolved.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("Ceilings:");
    println!("  maxAge: {}", resolved.max_age);
    println!(
        "  maxAuthors: {} ({} scale)",
        resolved.max_authors,
        resolved.authors_scale.as_str()
    );
    println!("  maxComplexity: {}", resolved.max_complexity);
    println!("  maxCoupling: {}", resolved.max_coupling);
    println!("  maxIndentComplexity: {}", resolved.max_indent_complexity);
    println!();
    println!("Colours:");
    println!("  bad: {}", resolved.bad_colour);
    println!("  good: {}", resolved.good_colour);
    println!("  neutral: {}", resolved.neutral_colour);
    println!("  defaultStroke: {}", resolved.default_stroke_colour);
    println!("  parentStroke: {}", resolved.parent_stroke_colour);
    println!("  parentFill: {}", resolved.parent_fill_colour);
    println!();
    println!("Titles:");
    println!("  maxTitleDepth: {}", resolved.max_title_depth);
    println!("  minValueForTitle: {}", resolved.min_value_for_title);
}
