use anyhow::Result;
use bridge::core::log::init_logging;
use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct QuoteCommandArgs {
    /// Amount of the source currency
    #[arg(allow_hyphen_values = true)]
    amount: String,

    /// Source currency, e.g. BTC
    #[arg(short, long)]
    from: Option<String>,

    /// Destination currency, e.g. USD
    #[arg(short, long)]
    to: Option<String>,
}

impl From<QuoteCommandArgs> for bridge::QuoteArgs {
    fn from(args: QuoteCommandArgs) -> bridge::QuoteArgs {
        bridge::QuoteArgs {
            amount: args.amount,
            from: args.from,
            to: args.to,
        }
    }
}

impl From<Commands> for bridge::AppCommand {
    fn from(cmd: Commands) -> bridge::AppCommand {
        match cmd {
            Commands::Prequote(args) => bridge::AppCommand::PreQuote(args.into()),
            Commands::Convert(args) => bridge::AppCommand::Convert(args.into()),
            Commands::Currencies => bridge::AppCommand::Currencies,
            Commands::Shell => bridge::AppCommand::Shell,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Currencies,
    /// Request a pre-quote (direct amount only)
    Prequote(QuoteCommandArgs),
    /// Request a full conversion with the optimized path
    Convert(QuoteCommandArgs),
    /// Start an interactive quote session
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => bridge::cli::setup::setup(),
        Some(cmd) => bridge::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
