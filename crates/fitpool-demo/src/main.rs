//! fitpool-demo CLI
//!
//! Usage:
//!   fitpool-demo all [--seed N]
//!   fitpool-demo basic | fragmentation | edge
//!   fitpool-demo stress [--seed N]
//!   fitpool-demo script <path>

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fitpool_demo::{render, scenarios, ScenarioReport, Script};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fitpool-demo")]
#[command(about = "Exercise the first-fit pool allocator with demonstration workloads")]
struct Cli {
    /// Seed for the random stress workload
    #[arg(long, global = true, default_value_t = 0x5EED)]
    seed: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every built-in scenario (default)
    All,
    /// Mixed sizes, free every third, refill
    Basic,
    /// Equal blocks with alternating holes
    Fragmentation,
    /// 100 seeded random alloc/free operations
    Stress,
    /// Zero-size, oversize, bogus free, full pool
    Edge,
    /// Run a TOML workload script
    Script {
        /// Path to the script file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fitpool_demo=info,fitpool_arena=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let reports: Vec<ScenarioReport> = match cli.command.unwrap_or(Commands::All) {
        Commands::All => scenarios::all(cli.seed)?,
        Commands::Basic => vec![scenarios::basic()?],
        Commands::Fragmentation => vec![scenarios::fragmentation()?],
        Commands::Stress => vec![scenarios::stress(cli.seed)?],
        Commands::Edge => vec![scenarios::edge_cases()?],
        Commands::Script { path } => {
            let script = Script::load(&path)?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "script".to_string());
            vec![script
                .run(&name)
                .with_context(|| format!("running {}", path.display()))?]
        }
    };

    for report in &reports {
        println!("{}", render::scenario(report));
    }
    println!("all scenarios finished");
    Ok(())
}
