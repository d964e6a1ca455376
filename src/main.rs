use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use dotfilter::{Config, Representation, Shortcuts};

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Rewrite the node/edge graph (remove, hide, set attributes)
    Graph,
    /// Rewrite the statement tree in place (delete, append attributes)
    Tree,
}

impl From<Mode> for Representation {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Graph => Representation::Graph,
            Mode::Tree => Representation::Tree,
        }
    }
}

#[derive(Parser)]
#[command(name = "dotfilter", about = "Filter and rewrite Graphviz DOT documents with regex rules")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<PathBuf>,

    /// TOML rule configuration
    #[arg(long)]
    conf: Option<PathBuf>,

    /// Remove everything whose name does not match
    #[arg(long)]
    only: Option<String>,

    /// Remove everything whose name matches
    #[arg(long)]
    remove: Option<String>,

    /// Hide every node whose name does not match
    #[arg(long)]
    show: Option<String>,

    /// Hide every node whose name matches
    #[arg(long)]
    hide: Option<String>,

    /// Document model to rewrite
    #[arg(long, value_enum, default_value = "graph")]
    mode: Mode,

    /// Indentation width for tree-mode output
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// Log every removal, hide and bypass edge to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let repr = Representation::from(cli.mode);

    let mut config = match &cli.conf {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }),
        None => Config::default(),
    };
    let shortcuts = Shortcuts {
        only: cli.only,
        remove: cli.remove,
        show: cli.show,
        hide: cli.hide,
    };
    config.push_shortcuts(&shortcuts, repr);

    let input = match cli.file {
        Some(path) => std::fs::read_to_string(&path).unwrap_or_else(|e| {
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

    match dotfilter::run(&input, &config, repr, cli.indent) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}
