pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::view::{Selection, TerminalView};
use crate::cli::widget::{Action, Outcome, Widget};
use crate::core::config::AppConfig;
use crate::core::CurrencyCode;
use crate::core::credentials::{CredentialProvider, FileKeySource, SuppliedKeys};
use crate::providers::{ConversionClient, SymbolCache};
use anyhow::Result;
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Symbols,
    Convert {
        from: CurrencyCode,
        to: CurrencyCode,
        amount: Decimal,
    },
    Swap {
        from: CurrencyCode,
        to: CurrencyCode,
        amount: Decimal,
    },
}

impl AppCommand {
    fn into_action(self) -> (Action, Option<Selection>) {
        match self {
            AppCommand::Symbols => (Action::LoadSymbols, None),
            AppCommand::Convert { from, to, amount } => {
                (Action::Convert, Some(Selection { from, to, amount }))
            }
            AppCommand::Swap { from, to, amount } => {
                (Action::Swap, Some(Selection { from, to, amount }))
            }
        }
    }
}

/// Wires config, credentials, store and providers together and runs one
/// user action against the terminal view.
pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    keys: SuppliedKeys,
) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let credentials = Arc::new(CredentialProvider::new(
        keys,
        Arc::new(FileKeySource::new(config.credentials_path()?)),
    ));
    let store = store::open_store(&config.default_data_path()?);

    let widget = Widget::new(
        Arc::new(SymbolCache::new(
            config.symbols_base_url(),
            Arc::clone(&credentials),
            store,
        )),
        Arc::new(ConversionClient::new(
            config.conversion_base_url(),
            credentials,
        )),
    );

    let (action, selection) = command.into_action();
    let mut view = TerminalView::new(selection, Vec::new());

    let spinner = cli::ui::new_spinner(match action {
        Action::LoadSymbols => "Fetching currencies...",
        Action::Convert | Action::Swap => "Converting...",
    });
    let outcome = widget.dispatch(action, &mut view).await;
    spinner.finish_and_clear();
    std::io::stdout().write_all(&view.into_inner())?;

    match outcome {
        Outcome::Done => Ok(()),
        Outcome::Failed => anyhow::bail!("Action `{action}` failed"),
    }
}
