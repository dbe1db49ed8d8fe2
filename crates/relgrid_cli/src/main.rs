//! RELGRID CLI
//!
//! Inspect and convert editor input files.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use indexmap::IndexMap;
use relgrid_core::TableId;
use relgrid_table::{EditorInput, FlattenSchema, Row, TableRegistry, flatten};
use relgrid_view::{Layout, LayoutConfig, ViewState};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "relgrid")]
#[command(about = "RELGRID - relational grid editor tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten nested records into linked tables
    Flatten {
        /// Nested records (JSON object)
        #[arg(short, long)]
        data: PathBuf,
        /// Table schema (JSON object of table id to spec)
        #[arg(short, long)]
        schema: PathBuf,
        /// Table holding the top-level records
        #[arg(short, long)]
        root: String,
    },
    /// Load an input file and validate its links
    Check {
        /// Editor input file
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print the initial layout of an input file
    Layout {
        /// Editor input file
        #[arg(short, long)]
        input: PathBuf,
        /// Rows per grid page
        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },
}

/// Table as printed by `flatten`
#[derive(Serialize)]
struct TableDump<'a> {
    display_name: &'a str,
    columns: Vec<&'a str>,
    rows: &'a [Row],
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&text).wrap_err_with(|| format!("malformed JSON in {}", path.display()))
}

fn load_input(path: &Path) -> Result<TableRegistry> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read {}", path.display()))?;
    let registry = EditorInput::from_json_str(&text)?.into_registry()?;
    tracing::debug!(tables = registry.len(), "loaded {}", path.display());
    Ok(registry)
}

fn dump(registry: &TableRegistry) -> IndexMap<&TableId, TableDump<'_>> {
    registry
        .all()
        .map(|table| {
            let dump = TableDump {
                display_name: table.display_name(),
                columns: table.columns().iter().map(|c| c.name.as_str()).collect(),
                rows: table.rows(),
            };
            (table.id(), dump)
        })
        .collect()
}

fn run_flatten(data: &Path, schema: &Path, root: &str) -> Result<String> {
    let data = read_json(data)?;
    let schema: FlattenSchema = serde_json::from_value(read_json(schema)?)
        .wrap_err("schema must map table ids to table specs")?;
    let registry = flatten(&data, &TableId::from(root), &schema)?;
    Ok(serde_json::to_string_pretty(&dump(&registry))?)
}

fn run_check(input: &Path) -> Result<String> {
    let registry = load_input(input)?;
    let mut report = format!("ok: {} tables", registry.len());
    for table in registry.all() {
        report.push_str(&format!(
            "\n  {} ({}): {} rows, {} children",
            table.id(),
            table.display_name(),
            table.len(),
            table.child_links().len()
        ));
    }
    Ok(report)
}

fn run_layout(input: &Path, page_size: usize) -> Result<String> {
    let registry = load_input(input)?;
    let view = ViewState::new(&registry);
    let config = LayoutConfig::default().with_page_size(page_size);
    let layout = Layout::build(&registry, &view, &config);
    Ok(serde_json::to_string_pretty(&layout)?)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Flatten { data, schema, root } => run_flatten(&data, &schema, &root)?,
        Commands::Check { input } => run_check(&input)?,
        Commands::Layout { input, page_size } => run_layout(&input, page_size)?,
    };
    println!("{}", output);
    Ok(())
}
