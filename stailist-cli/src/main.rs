use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use stailist_core::{Error, WardrobeStore};

mod commands;
mod config;

use commands::Command;
use config::{AppConfig, GlobalOpts};

#[derive(Parser, Debug, Clone)]
#[command(name = "stailist")]
#[command(author, version, about = "St-AI-list - your wardrobe plus an AI stylist")]
struct Args {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("stailist=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

async fn run(args: Args) -> Result<String, Error> {
    let config = AppConfig::resolve(&args.global, |key| std::env::var(key).ok());
    let mut store = WardrobeStore::load(config.wardrobe_backend()?).await;
    if let Some(notice) = store.startup_notice() {
        eprintln!("Warning: {}", notice);
    }
    info!(
        "Session started with {} item(s) from {}",
        store.items().len(),
        store.backend_name()
    );

    commands::dispatch(args.command, &config, &mut store).await
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("Error: {}", e);
            if e.is_retryable() {
                warn!("The failure looks temporary");
                eprintln!("This looks temporary; please try again.");
            }
            std::process::exit(1);
        }
    }
}
