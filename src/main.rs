use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::core::CurrencyCode;
use fxconv::core::credentials::SuppliedKeys;
use fxconv::core::log::init_logging;
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// API key for the currency symbols service
    #[arg(long, global = true, env = "FXCONV_CURRENCY_API_KEY", hide_env_values = true)]
    currency_api_key: Option<String>,

    /// API key for the conversion service
    #[arg(long, global = true, env = "FXCONV_CONVERSION_API_KEY", hide_env_values = true)]
    conversion_api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration and credentials template
    Setup,
    /// List supported currencies
    Symbols,
    /// Convert an amount from one currency to another
    Convert {
        from: CurrencyCode,
        to: CurrencyCode,
        amount: Decimal,
    },
    /// Swap the currencies, then convert
    Swap {
        from: CurrencyCode,
        to: CurrencyCode,
        amount: Decimal,
    },
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Symbols => fxconv::AppCommand::Symbols,
            Commands::Convert { from, to, amount } => {
                fxconv::AppCommand::Convert { from, to, amount }
            }
            Commands::Swap { from, to, amount } => fxconv::AppCommand::Swap { from, to, amount },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let keys = SuppliedKeys {
        currency: cli.currency_api_key,
        conversion: cli.conversion_api_key,
    };
    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref(), keys).await,
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
