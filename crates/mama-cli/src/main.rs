use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mama_brain::config::BrainConfig;
use mama_cli::commands::{
    AnglesCommand, ConfigCommand, CorrectCommand, RespondCommand, SignalsCommand,
};
use mama_cli::error::CliResult;
use mama_cli::output::OutputFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mama-cli")]
#[command(about = "Mama CLI - run the Mama Brain response pipeline from the terminal")]
#[command(version)]
pub struct Cli {
    #[clap(long, short, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[clap(long, short = 'c', global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Run the full pipeline for a message")]
    Respond(RespondCommand),

    #[clap(about = "Show ranked response angles and the composed depth reply")]
    Angles(AnglesCommand),

    #[clap(about = "Show anonymized signals for a message")]
    Signals(SignalsCommand),

    #[clap(about = "Fix text typed with an English keyboard layout")]
    Correct(CorrectCommand),

    #[clap(about = "Configuration commands")]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,mama_brain=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let config = match &cli.config {
        Some(path) => BrainConfig::load(path)?,
        None => BrainConfig::discover()?,
    };

    match &cli.command {
        Command::Respond(cmd) => cmd.execute(&config, format).await,
        Command::Angles(cmd) => cmd.execute(format).await,
        Command::Signals(cmd) => cmd.execute(format).await,
        Command::Correct(cmd) => cmd.execute(format).await,
        Command::Config(cmd) => cmd.execute(&config, cli.config.as_deref(), format).await,
    }
}
