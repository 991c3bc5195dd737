pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::prompt::Prompter;
use crate::core::catalog::load_catalog;
use crate::core::config::AppConfig;
use crate::core::language;
use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<f64>,
    pub lang: Option<String>,
    pub lang_path: Option<String>,
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Lookup,
    List,
    Price { codes: Vec<String> },
    Convert(ConvertArgs),
    Update,
}

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: Option<String>,
    pub catalog_path: Option<String>,
    pub catalog_url: Option<String>,
}

/// Loads the config with credentials from the process environment.
pub fn load_config(options: &RunOptions) -> Result<AppConfig> {
    load_config_with_env(options, |key| std::env::var(key).ok())
}

pub fn load_config_with_env<F>(options: &RunOptions, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = AppConfig::load_with_env(options.config_path.as_deref(), lookup)?;
    if let Some(path) = &options.catalog_path {
        config.catalog.path = path.clone();
    }
    if let Some(url) = &options.catalog_url {
        config.catalog.url = Some(url.clone());
    }
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub async fn run_command(command: AppCommand, options: &RunOptions) -> Result<()> {
    let config = load_config(options)?;
    run_with_config(command, &config, &mut io::stdout()).await
}

/// Runs `command` against an already loaded config. One-shot output goes to
/// `out`; interactive modes always use the terminal.
pub async fn run_with_config<W: Write>(
    command: AppCommand,
    config: &AppConfig,
    out: &mut W,
) -> Result<()> {
    info!("Stonks starting...");
    let catalog_url = config.catalog.url.as_deref();

    match command {
        AppCommand::Update => {
            cli::update::run_update(&config.catalog.path, &mut Prompter::stdio())?;
            Ok(())
        }
        AppCommand::Lookup => {
            let catalog = load_catalog(&config.catalog.path, catalog_url).await?;
            cli::lookup::run_lookup(&catalog, &mut Prompter::stdio())
        }
        AppCommand::List => {
            let catalog = load_catalog(&config.catalog.path, catalog_url).await?;
            writeln!(out, "{}", cli::lookup::list_all(&catalog))?;
            Ok(())
        }
        AppCommand::Price { codes } => {
            let analyzer = providers::build_analyzer(config)?;
            let catalog = load_catalog(&config.catalog.path, catalog_url).await?;
            if codes.is_empty() {
                cli::price::run_price(&analyzer, &catalog, &mut Prompter::stdio()).await
            } else {
                let table = cli::price::check_prices(&analyzer, &catalog, &codes).await?;
                writeln!(out, "{table}")?;
                Ok(())
            }
        }
        AppCommand::Convert(args) => {
            let analyzer = providers::build_analyzer(config)?;
            let catalog = load_catalog(&config.catalog.path, catalog_url).await?;
            match (&args.from, &args.to, args.amount) {
                (Some(from), Some(to), Some(amount)) => {
                    let output =
                        cli::convert::convert_once(&analyzer, &catalog, from, to, amount).await?;
                    writeln!(out, "{output}")?;
                    Ok(())
                }
                (None, None, None) => {
                    let mut prompter = Prompter::stdio();
                    let names = match args.lang_path.as_ref().or(config.languages.path.as_ref()) {
                        Some(path) => language::read_language_names(path)?,
                        None => BTreeMap::new(),
                    };
                    let requested = args.lang.as_deref().or(config.languages.default.as_deref());
                    let Some(labels) =
                        cli::convert::resolve_labels(requested, &names, &mut prompter)?
                    else {
                        return Ok(());
                    };
                    cli::convert::run_convert(&analyzer, &catalog, labels, &mut prompter).await
                }
                _ => bail!("--from, --to and --amount must be given together"),
            }
        }
    }
}
