use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use stonks::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Local currency catalog (CSV of country, currency, ISO code)
    #[arg(short, long, global = true)]
    path: Option<String>,

    /// URL to download the catalog from when the local file is unavailable
    #[arg(short, long, global = true)]
    online: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ConvertCommand {
    /// Currency to convert from
    #[arg(long)]
    from: Option<String>,

    /// Currency to convert to
    #[arg(long)]
    to: Option<String>,

    /// Amount to convert
    #[arg(long, allow_negative_numbers = true)]
    amount: Option<f64>,

    /// Prompt language (en, fr, pt, sw)
    #[arg(long = "lang", visible_alias = "dl")]
    lang: Option<String>,

    /// CSV of language names and codes
    #[arg(long = "lang-path", visible_alias = "lp")]
    lang_path: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Interactively look up currencies in the catalog
    Lookup,
    /// List every currency in the catalog
    List,
    /// Check the current price of currencies
    Price {
        /// Currency codes; asked interactively when omitted
        codes: Vec<String>,
    },
    /// Convert an amount between currencies
    Convert(ConvertCommand),
    /// Add a currency to the local catalog
    Update,
}

impl From<Commands> for stonks::AppCommand {
    fn from(cmd: Commands) -> stonks::AppCommand {
        match cmd {
            Commands::Lookup => stonks::AppCommand::Lookup,
            Commands::List => stonks::AppCommand::List,
            Commands::Price { codes } => stonks::AppCommand::Price { codes },
            Commands::Convert(c) => stonks::AppCommand::Convert(stonks::ConvertArgs {
                from: c.from,
                to: c.to,
                amount: c.amount,
                lang: c.lang,
                lang_path: c.lang_path,
            }),
            Commands::Update => stonks::AppCommand::Update,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = stonks::RunOptions {
        config_path: cli.config_path,
        catalog_path: cli.path,
        catalog_url: cli.online,
    };

    let result = match cli.command {
        Some(Commands::Setup) => stonks::cli::setup::setup(),
        Some(cmd) => stonks::run_command(cmd.into(), &options).await,
        None => stonks::run_command(stonks::AppCommand::Lookup, &options).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
