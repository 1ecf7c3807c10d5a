pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{ChartView, ConversionController, RateProvider};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Overrides for the configured converter defaults.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub amount: Option<f64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub view: Option<ChartView>,
    pub days: Option<u32>,
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Dashboard,
    Convert(ConvertOptions),
    Market,
    Currencies { search: Option<String> },
    Session,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub fn build_controller(config: &AppConfig, options: &ConvertOptions) -> ConversionController {
    let defaults = &config.defaults;
    ConversionController::new(
        options.amount.unwrap_or(defaults.amount),
        options.from.as_deref().unwrap_or(&defaults.from),
        options.to.as_deref().unwrap_or(&defaults.to),
    )
    .with_view(options.view.unwrap_or(defaults.view))
    .with_history_days(options.days.unwrap_or(config.history_days))
}

fn connect(config_path: Option<&str>) -> Result<(AppConfig, Arc<dyn RateProvider>)> {
    let config = load_config(config_path)?;
    let provider: Arc<dyn RateProvider> =
        Arc::new(providers::FrankfurterProvider::new(config.base_url()));
    Ok((config, provider))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxpulse starting...");

    match command {
        AppCommand::Currencies { search } => cli::picker::run(search.as_deref()),
        AppCommand::Dashboard => {
            let (config, provider) = connect(config_path)?;
            let mut controller = build_controller(&config, &ConvertOptions::default());
            cli::convert::run_dashboard(provider.as_ref(), &mut controller).await
        }
        AppCommand::Convert(options) => {
            let (config, provider) = connect(config_path)?;
            let mut controller = build_controller(&config, &options);
            cli::convert::run(provider.as_ref(), &mut controller).await
        }
        AppCommand::Market => {
            let (_, provider) = connect(config_path)?;
            cli::market::run(provider.as_ref()).await
        }
        AppCommand::Session => {
            let (config, provider) = connect(config_path)?;
            let controller = build_controller(&config, &ConvertOptions::default());
            cli::session::run(provider, controller).await
        }
    }
}
