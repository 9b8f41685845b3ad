use clap::{Parser, Subcommand};

/// Single entry point for the coordination fabric's three processes.
#[derive(Parser)]
#[command(name = "colcap")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the index-discovery producer loop.
    Producer,
    /// Run a worker process: batch engine, fetch/extract, correlator.
    Worker,
    /// Print one point-in-time monitoring snapshot and exit.
    Dashboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Producer => colcap_producer::run().await,
        Command::Worker => colcap_worker::run().await,
        Command::Dashboard => colcap_dashboard::run().await,
    }
}
