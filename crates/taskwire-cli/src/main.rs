use std::sync::Arc;

use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::EnvFilter;

use taskwire_core::api::ApiClient;
use taskwire_core::auth::SessionManager;
use taskwire_core::error::CoreError;
use taskwire_core::session::FileSessionStore;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let config = config::Config::new().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load configuration, using defaults");
        config::Config::default()
    });

    let store = match FileSessionStore::open_default() {
        Ok(store) => store,
        Err(e) => {
            report_error(&e.into());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        // The theme preference lives in the state file and needs no API
        // access.
        cli::Commands::Theme(command) => commands::theme::theme(&store, command),
        command => run(command, config, store).await,
    };
    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }
}

async fn run(
    command: cli::Commands,
    config: config::Config,
    store: FileSessionStore,
) -> anyhow::Result<()> {
    let manager = Arc::new(SessionManager::new(Box::new(store))?);
    let client = ApiClient::new(&config.api_url, manager)?;

    match command {
        cli::Commands::Login(command) => commands::auth::login(&client, command).await,
        cli::Commands::Logout => commands::auth::logout(&client).await,
        cli::Commands::Add(command) => commands::add::add_task(&client, command).await,
        cli::Commands::List(command) => commands::list::list_tasks(&client, command).await,
        cli::Commands::Edit(command) => commands::edit::edit_task(&client, command).await,
        cli::Commands::Delete(command) => commands::delete::delete_task(&client, command).await,
        cli::Commands::Do(command) => commands::r#do::do_task(&client, command).await,
        cli::Commands::Recur(command) => match command.command {
            cli::RecurSubcommand::Preview(command) => {
                commands::recur::preview(&client, command, config.recurrence.horizon_count).await
            }
            cli::RecurSubcommand::Instances(command) => {
                commands::recur::instances(&client, command).await
            }
        },
        cli::Commands::Voice(command) => commands::voice::voice_task(&client, command).await,
        cli::Commands::Theme(_) => unreachable!("handled without API setup"),
    }
}

fn report_error(err: &anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::AuthenticationRequired => {
                eprintln!(
                    "{} Not logged in. Run {} first.",
                    "Error:".style(error_style),
                    "taskwire login <email>".bold()
                );
            }
            CoreError::AuthenticationFailed => {
                eprintln!(
                    "{} Your session has expired. Run {} to sign in again.",
                    "Error:".style(error_style),
                    "taskwire login <email>".bold()
                );
            }
            CoreError::NotFound(what) => {
                eprintln!("{} Not found: {}", "Error:".style(error_style), what);
            }
            CoreError::InvalidInput(message) => {
                eprintln!("{} {}", "Error:".style(error_style), message);
            }
            CoreError::Api { status, message } => {
                eprintln!(
                    "{} Server rejected the request ({}): {}",
                    "Error:".style(error_style),
                    status,
                    message
                );
            }
            CoreError::Network { retryable, .. } => {
                eprint!("{} Could not reach the server.", "Error:".style(error_style));
                if *retryable {
                    eprint!(" {}", "This may be transient; try again.".yellow());
                }
                eprintln!();
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
