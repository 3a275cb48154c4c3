use std::io::Read;

use clap::Parser;
use conan_graph::{DEFAULT_ROOT_ID, LayoutConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "conan-graph",
    about = "Normalize a solver dependency graph and lay it out as ranked boxes (JSON out)"
)]
struct Cli {
    /// Graph JSON file (reads from stdin if not provided)
    file: Option<std::path::PathBuf>,

    /// Id of the root node
    #[arg(long, default_value = DEFAULT_ROOT_ID)]
    root: String,

    /// Print the normalized graph instead of the layout
    #[arg(long)]
    graph_only: bool,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,

    #[arg(long)]
    node_width: Option<f64>,

    #[arg(long)]
    node_height: Option<f64>,

    /// Horizontal gap between boxes in a rank
    #[arg(long)]
    h_gap: Option<f64>,

    /// Vertical gap between ranks
    #[arg(long)]
    v_gap: Option<f64>,

    #[arg(long)]
    margin: Option<f64>,
}

impl Cli {
    fn layout_config(&self) -> LayoutConfig {
        let defaults = LayoutConfig::default();
        LayoutConfig {
            node_width: self.node_width.unwrap_or(defaults.node_width),
            node_height: self.node_height.unwrap_or(defaults.node_height),
            h_gap: self.h_gap.unwrap_or(defaults.h_gap),
            v_gap: self.v_gap.unwrap_or(defaults.v_gap),
            margin: self.margin.unwrap_or(defaults.margin),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let input = match &cli.file {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("ERROR: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("ERROR: failed to read stdin: {e}");
                std::process::exit(1);
            });
            buf
        }
    };

    let output = if cli.graph_only {
        to_json(&conan_graph::ingest(&input, &cli.root), cli.compact)
    } else {
        let config = cli.layout_config();
        to_json(&conan_graph::layout_document(&input, &cli.root, &config), cli.compact)
    };

    match output {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}
