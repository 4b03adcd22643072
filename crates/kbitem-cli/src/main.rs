//! CLI binary for kbitem: inspect, reorder and rank knowledge-base statements.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kbitem_core::config::{KbItemConfig, OrderStrategy, OutputFormat, SelectionPolicy};
use kbitem_core::model::{PropertyId, Statement};
use kbitem_core::order::{IncrementalPropertyOrder, PropertyOrder};
use kbitem_core::statement_list::StatementList;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kbitem", about = "Knowledge-base statement ordering and ranking")]
struct Cli {
    /// Directory holding .kbitem/config.toml (defaults to current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Print JSON regardless of the configured output format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List property ids in first-seen order with their group sizes
    Groups {
        /// JSON file holding an array of statements
        file: PathBuf,
    },

    /// Print the statements in group-contiguous order
    Order {
        file: PathBuf,

        /// Order representation: rebuilding, incremental
        #[arg(short, long)]
        strategy: Option<OrderStrategy>,
    },

    /// Print the best statements
    Best {
        file: PathBuf,

        /// Selection policy: per-property, overall
        #[arg(short, long)]
        policy: Option<SelectionPolicy>,
    },

    /// Move a whole property group and print the resulting order
    MoveGroup {
        file: PathBuf,

        /// Property id of the group to move (e.g. P31)
        property: PropertyId,

        /// Target group position (appends when omitted or past the end)
        #[arg(long)]
        to: Option<usize>,
    },

    /// Move one statement by flat index and print the resulting order
    Move {
        file: PathBuf,

        /// Current index of the statement
        from: usize,

        /// Target index, counted after the statement has been taken out
        to: usize,
    },
}

fn get_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.root {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = get_root(&cli)?;
    let config = KbItemConfig::load(&root)?;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format
    };

    match cli.command {
        Commands::Groups { file } => cmd_groups(&file, format),
        Commands::Order { file, strategy } => {
            cmd_order(&file, strategy.unwrap_or(config.order.strategy), format)
        }
        Commands::Best { file, policy } => {
            cmd_best(&file, policy.unwrap_or(config.selection.policy), format)
        }
        Commands::MoveGroup { file, property, to } => cmd_move_group(&file, &property, to, format),
        Commands::Move { file, from, to } => cmd_move(&file, from, to, format),
    }
}

fn load_statements(file: &Path) -> Result<StatementList> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read statements from {}", file.display()))?;
    let list: StatementList = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse statements in {}", file.display()))?;
    tracing::info!(statements = list.len(), file = %file.display(), "loaded statements");
    Ok(list)
}

fn print_statements(statements: &[Arc<Statement>], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(statements)
                .context("failed to serialize statements")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            for statement in statements {
                println!(
                    "{}\t{}\t{}",
                    statement.label(),
                    statement.mainsnak.property(),
                    statement.rank
                );
            }
        }
    }
    Ok(())
}

fn cmd_groups(file: &Path, format: OutputFormat) -> Result<()> {
    let list = load_statements(file)?;
    let grouper = list.grouper();
    match format {
        OutputFormat::Json => {
            let groups: Vec<serde_json::Value> = grouper
                .groups()
                .map(|(property_id, group)| {
                    serde_json::json!({ "property": property_id, "count": group.len() })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        OutputFormat::Text => {
            for (property_id, group) in grouper.groups() {
                println!("{}\t{}", property_id, group.len());
            }
        }
    }
    Ok(())
}

fn cmd_order(file: &Path, strategy: OrderStrategy, format: OutputFormat) -> Result<()> {
    let list = load_statements(file)?;
    let order: Box<dyn PropertyOrder<Statement>> = match strategy {
        OrderStrategy::Rebuilding => Box::new(list.grouped()),
        OrderStrategy::Incremental => Box::new(IncrementalPropertyOrder::new(list.iter().cloned())),
    };
    tracing::debug!(%strategy, groups = order.property_ids().len(), "built order");
    print_statements(&order.flat_view(), format)
}

fn cmd_best(file: &Path, policy: SelectionPolicy, format: OutputFormat) -> Result<()> {
    let list = load_statements(file)?;
    let best = match policy {
        SelectionPolicy::PerProperty => list.best_per_property(),
        SelectionPolicy::Overall => list.best_statements(),
    };
    if best.is_empty() {
        eprintln!("No non-deprecated statements found.");
    }
    print_statements(best.as_slice(), format)
}

fn cmd_move_group(
    file: &Path,
    property: &PropertyId,
    to: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let list = load_statements(file)?;
    let mut order = IncrementalPropertyOrder::new(list.iter().cloned());
    order
        .move_group_to_index(property, to)
        .with_context(|| format!("cannot move group {property}"))?;
    print_statements(&order.flat_view(), format)
}

fn cmd_move(file: &Path, from: usize, to: usize, format: OutputFormat) -> Result<()> {
    let list = load_statements(file)?;
    let mut order = list.grouped();
    let moved = order
        .move_to_index(from, to)
        .with_context(|| format!("cannot move statement {from} to {to}"))?;
    tracing::info!(statement = %moved.label(), "moved statement");
    print_statements(order.as_slice(), format)
}
