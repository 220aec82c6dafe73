use anyhow::Result;
use clap::Parser;
use jet_booking::{
    catalog,
    cli::{Cli, Commands},
    config::BookingConfig,
    runtime,
    search::AirportSearchController,
};
use tokio::{io::BufReader, runtime::Handle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = BookingConfig::load()?;
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Search(args) => {
            let source = runtime::airport_source(&config, args.dev)?;
            let controller =
                AirportSearchController::spawn(source, config.search_options(), &Handle::current());
            let stdin = BufReader::new(tokio::io::stdin());
            runtime::run_search_session(stdin, &controller, args.slot, args.json).await?;
        }
        Commands::Book(args) => {
            let source = runtime::airport_source(&config, args.dev)?;
            let summary = runtime::run_booking(args, source, config.search_options()).await?;
            println!("{summary}");
        }
        Commands::Categories => {
            for category in catalog::all() {
                println!("{:>2}  {:<16} {}", category.id, category.name, category.image_url);
            }
        }
        Commands::ConfigPath => {
            let path = BookingConfig::config_path()?;
            if !path.exists() {
                BookingConfig::default().save_to(&path)?;
                println!("Created default config at {}", path.display());
            } else {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
