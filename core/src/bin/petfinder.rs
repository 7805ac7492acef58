use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use petfinder_core::{ApiError, Config, PetfinderApi, ReqwestTransport};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "petfinder", about = "Browse adoptable animals on Petfinder", version)]
struct Cli {
    /// TOML config file; PETFINDER_* environment variables override it.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List adoptable animals.
    Animals {
        /// Size filter; defaults to the configured size.
        #[arg(long)]
        size: Option<String>,
        /// Animal type filter, e.g. "Dog".
        #[arg(long = "type")]
        animal_type: Option<String>,
    },
    /// List the animal types the API knows about.
    Types,
    /// Forget the cached token.
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let api = PetfinderApi::from_config(&config)?;

    match cli.command {
        Command::Animals { size, animal_type } => {
            ensure_token(&api, &config).await;
            let mut query = config.animal_query();
            if size.is_some() {
                query.size = size;
            }
            query.animal_type = animal_type;
            report(api.get_animals_matching(&query).await, |animals| {
                for animal in animals {
                    println!("{}\t{}\t{}\t{}", animal.id, animal.name, animal.species, animal.age);
                }
            })
        }
        Command::Types => {
            ensure_token(&api, &config).await;
            report(api.get_animal_types().await, |types| {
                for name in types {
                    println!("{name}");
                }
            })
        }
        Command::Logout => {
            api.clear_token()?;
            info!(path = %config.token_path.display(), "cached token cleared");
            Ok(())
        }
    }
}

/// Acquire a token when credentials are configured. Without credentials the
/// listing call runs against whatever token is already cached.
async fn ensure_token(api: &PetfinderApi<ReqwestTransport>, config: &Config) {
    let Ok(credentials) = config.credentials() else {
        return;
    };
    if let Err(e) = api.get_token(&credentials).await {
        error!(error = %e, "could not acquire a token");
    }
}

/// Print on success; log and fail on error, leaving nothing half-printed.
fn report<T>(result: Result<Vec<T>, ApiError>, print: impl FnOnce(Vec<T>)) -> Result<()> {
    match result {
        Ok(items) => {
            print(items);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "request failed");
            Err(e.into())
        }
    }
}
