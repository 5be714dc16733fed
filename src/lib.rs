pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{CurrencyCode, LogReporter, Operation, Session, request};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Arguments shared by the quote commands.
#[derive(Debug, Clone)]
pub struct QuoteArgs {
    pub amount: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

pub enum AppCommand {
    PreQuote(QuoteArgs),
    Convert(QuoteArgs),
    Currencies,
    Shell,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?
            .with_env_overrides(std::env::var(crate::core::config::SERVICE_URL_ENV).ok()),
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

fn create_session(config: &AppConfig) -> Result<Session> {
    let service = providers::HttpQuoteService::new(config.service_base_url()?, config.timeout())
        .context("Failed to create quote service client")?
        .with_policy(config.response_policy());

    Ok(Session::new(Arc::new(service), Arc::new(LogReporter))
        .with_amount_validation(config.validate_amounts))
}

fn resolve_currency(code: Option<&str>, default: CurrencyCode) -> Result<CurrencyCode> {
    match code {
        Some(code) => Ok(CurrencyCode::parse(code)?),
        None => Ok(default),
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Bridge starting...");

    if let AppCommand::Currencies = command {
        cli::currencies::run();
        return Ok(());
    }

    let config = load_config(config_path)?;
    let session = create_session(&config)?;

    let (operation, args) = match command {
        AppCommand::PreQuote(args) => (Operation::Preview, args),
        AppCommand::Convert(args) => (Operation::Conversion, args),
        AppCommand::Currencies => unreachable!("Currencies command is handled above"),
        AppCommand::Shell => {
            let reader = tokio::io::BufReader::new(tokio::io::stdin());
            return cli::shell::run(
                &session,
                config.default_from()?,
                config.default_to()?,
                reader,
                &mut std::io::stdout(),
            )
            .await;
        }
    };

    let from = resolve_currency(args.from.as_deref(), config.default_from()?)?;
    let to = resolve_currency(args.to.as_deref(), config.default_to()?)?;
    let request = request::build(&args.amount, from, to);

    let rendered = cli::quote::run(&session, operation, request)
        .await
        .with_context(|| format!("The {operation} request failed"))?;
    println!("{rendered}");
    Ok(())
}
