//! CLI tool for ledgergrid - loads a JSON dataset and prints the visible
//! window (and optional search matches) as JSON
//!
//! Usage:
//!   ledgergrid_cli <dataset.json>                      # Window at the top
//!   ledgergrid_cli <dataset.json> --scroll 2000        # Window at an offset
//!   ledgergrid_cli <dataset.json> --find 2024-01       # Plus matches
//!   ledgergrid_cli <dataset.json> --height 600         # Viewport height
//!
//! The dataset is `{"columns": [...], "rows": [...], "config": {...}}`.
//! Set `RUST_LOG=ledgergrid=debug` for engine logs on stderr.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::rc::Rc;

use ledgergrid::{
    Clipboard, ColumnSpec, GridConfig, GridHost, JsonRecord, LedgerGrid, LocalTask, TaskSpawner,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Deserialize)]
struct Dataset {
    columns: Vec<ColumnSpec>,
    rows: Vec<JsonRecord>,
    #[serde(default)]
    config: GridConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    total_rows: usize,
    total_height: f64,
    window: ledgergrid::VirtualWindow,
    rows: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<ledgergrid::SearchStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    matches: Vec<ledgergrid::SearchMatch>,
}

/// Saves are never triggered from the CLI; tasks are dropped.
struct NoopSpawner;

impl TaskSpawner for NoopSpawner {
    fn spawn_local(&self, _task: LocalTask) {}
}

struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&self, text: &str) -> ledgergrid::Result<()> {
        println!("{text}");
        Ok(())
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_px(args: &[String], flag: &str) -> Option<f64> {
    let raw = flag_value(args, flag)?;
    match raw.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("Invalid value for {flag}: {raw}");
            std::process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: ledgergrid_cli <dataset.json> [--find QUERY] [--scroll PX] [--height PX]"
        );
        std::process::exit(1);
    }

    let input_path = &args[1];
    let query = flag_value(&args, "--find");
    let scroll = parse_px(&args, "--scroll");
    let height = parse_px(&args, "--height").unwrap_or(600.0);

    // Read input file
    let data = match fs::read_to_string(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let dataset: Dataset = match serde_json::from_str(&data) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error parsing dataset: {}", e);
            std::process::exit(1);
        }
    };

    let host = GridHost {
        spawner: Rc::new(NoopSpawner),
        clipboard: Rc::new(StdoutClipboard),
    };
    let columns = dataset
        .columns
        .into_iter()
        .map(ColumnSpec::into_column)
        .collect();
    let mut grid = match LedgerGrid::new(columns, dataset.config, host) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error building grid: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = grid.set_rows(dataset.rows) {
        eprintln!("Error loading rows: {}", e);
        std::process::exit(1);
    }

    grid.on_resize(height, 0.0);
    if let Some(offset) = scroll {
        grid.on_scroll(offset, 0.0);
    }
    if let Some(query) = query {
        grid.set_search_query(query);
    }

    let frame = grid.render(0.0).clone();
    let rows = frame
        .window
        .rows()
        .filter_map(|row| frame.row(row))
        .map(|cells| cells.iter().map(|c| c.text.clone()).collect())
        .collect();

    let output = Output {
        total_rows: grid.model().row_count(),
        total_height: frame.total_height,
        window: frame.window,
        rows,
        search: query.map(|_| grid.search_status()),
        matches: grid.search_matches().to_vec(),
    };

    let json = match serde_json::to_string_pretty(&output) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };
    io::stdout().write_all(json.as_bytes()).unwrap();
    println!();
}
