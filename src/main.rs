use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use fxpulse::core::ChartView;
use fxpulse::core::catalog::normalize_code;
use fxpulse::core::log::init_logging;
use fxpulse::core::rates::MAX_HISTORY_DAYS;

fn parse_currency_code(input: &str) -> Result<String> {
    normalize_code(input).ok_or_else(|| anyhow!("expected a three letter currency code, got {input:?}"))
}

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the market overview, the default conversion and its chart
    Dashboard,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        amount: Option<f64>,
        /// Currency to convert from
        #[arg(short, long, value_parser = parse_currency_code)]
        from: Option<String>,
        /// Currency to convert to
        #[arg(short, long, value_parser = parse_currency_code)]
        to: Option<String>,
        /// Chart to display: comparison or trend
        #[arg(long)]
        view: Option<ChartView>,
        /// Days covered by the trend chart
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_HISTORY_DAYS)))]
        days: Option<u32>,
    },
    /// Display rates of popular currency pairs
    Market,
    /// List supported currencies
    Currencies {
        /// Filter by code or name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Start an interactive converter session
    Session,
}

impl From<Commands> for fxpulse::AppCommand {
    fn from(cmd: Commands) -> fxpulse::AppCommand {
        match cmd {
            Commands::Dashboard => fxpulse::AppCommand::Dashboard,
            Commands::Convert {
                amount,
                from,
                to,
                view,
                days,
            } => fxpulse::AppCommand::Convert(fxpulse::ConvertOptions {
                amount,
                from,
                to,
                view,
                days,
            }),
            Commands::Market => fxpulse::AppCommand::Market,
            Commands::Currencies { search } => fxpulse::AppCommand::Currencies { search },
            Commands::Session => fxpulse::AppCommand::Session,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxpulse::cli::setup::setup(),
        Some(cmd) => fxpulse::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
