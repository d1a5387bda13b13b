// --- Dynamic Footpath Allocation - entry point ---

use clap::{Parser, Subcommand};
use footpath::config::Settings;
use footpath::{generator, run_server, store, FootpathError};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

/// Metro footpath allocation: route table generator and session API
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite database file (overrides FOOTPATH_DB_PATH / FOOTPATH_DB_URL)
    #[arg(short, long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    op: Operation,
}

#[derive(Subcommand)]
enum Operation {
    /// run the HTTP API
    Serve {
        /// address to bind, e.g. 127.0.0.1:8080
        #[arg(short, long)]
        bind: Option<String>,

        /// fixed RNG seed for every session
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// rebuild the routes table from stations and their locations
    GenerateRoutes {
        /// fixed RNG seed for a reproducible table
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// create the tables if missing
    InitDb {
        /// also insert a small sample network
        #[arg(long)]
        demo: bool,
    },
}

fn rng_for(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

#[tokio::main]
async fn main() -> Result<(), FootpathError> {
    env_logger::init();
    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    if let Some(db) = cli.db {
        settings.db_path = db;
    }

    match cli.op {
        Operation::Serve { bind, seed } => {
            if let Some(b) = bind {
                settings.bind = b;
            }
            if seed.is_some() {
                settings.seed = seed;
            }
            info!("=== Dynamic Footpath Allocation (API) ===");
            run_server(settings).await?;
        }
        Operation::GenerateRoutes { seed } => {
            let conn = store::open_connection(&settings.db_path)?;
            store::init_db(&conn)?;
            let mut rng = rng_for(seed.or(settings.seed));
            let report = generator::regenerate(&conn, &mut rng)?;
            println!("Finished: inserted {} routes into 'routes' table.", report.total_routes);
        }
        Operation::InitDb { demo } => {
            let conn = store::open_connection(&settings.db_path)?;
            store::init_db(&conn)?;
            if demo {
                store::seed_demo(&conn)?;
            }
            info!("initialised {}", settings.db_path.display());
        }
    }
    Ok(())
}
