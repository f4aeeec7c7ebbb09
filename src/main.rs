//! Realty CLI - set up, seed, inspect and serve the real-estate records database

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use realty::config::{ensure_db_dir, load_config, RealtyConfig};
use realty::storage::SqliteStore;
use realty::ui::{self, Icons};
use realty::{setup, EntityKind};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "realty")]
#[command(version = "0.1.0")]
#[command(about = "Real-estate record keeping over SQLite with an HTML front end")]
#[command(long_about = r#"
Realty keeps the records of a small real-estate office:
  • Addresses and persons, with owner, agent and client roles
  • Properties and their locations
  • Contracts and payments

Example usage:
  realty setup --seed
  realty list property
  realty serve --port 5000
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ./realty.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTML front end
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Drop all tables and data before serving
        #[arg(long)]
        reset: bool,

        /// Insert the fixture rows before serving
        #[arg(long)]
        seed: bool,
    },

    /// Create the schema from scratch, dropping any existing data
    Setup {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Insert the fixture rows after creating the schema
        #[arg(long)]
        seed: bool,
    },

    /// Insert the fixture rows into an existing database
    Seed {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// List one entity kind with its related columns
    List {
        /// Entity kind (address, person, owner, agent, client, location,
        /// property, contract, payment)
        entity: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show one record by id
    Show {
        /// Entity kind
        entity: String,

        /// Record id
        id: i64,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Show row counts per table
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Serve { port, database, reset, seed } => {
            let database = config.database_path(database);
            let port = config.port(port);
            let seed = config.seed_on_start(seed);
            ensure_db_dir(&database)?;

            if reset {
                setup::initialize(&database, seed)?;
            } else if seed {
                let mut store = SqliteStore::open(&database)?;
                setup::seed(&mut store)?;
            }

            ui::header("Realty");
            ui::info("Database", &database.display().to_string());
            println!("{} Server running at http://0.0.0.0:{}", Icons::GLOBE, port);
            realty::server::start_server(port, database).await?;
        }

        Commands::Setup { database, seed } => {
            let database = config.database_path(database);
            ensure_db_dir(&database)?;

            if database.exists() {
                ui::warn(&format!(
                    "{} exists; all tables and data will be dropped",
                    database.display()
                ));
            }
            let store = setup::initialize(&database, seed)?;
            ui::success(&format!("{} Schema created in {}", Icons::DATABASE, database.display()));
            if seed {
                print_stats(&store, &database)?;
            }
        }

        Commands::Seed { database } => {
            let database = resolve_existing(&config, database)?;
            let mut store = SqliteStore::open(&database)?;
            let seeded = setup::seed(&mut store)?;
            ui::success(&format!("{} Seeded {} rows", Icons::SEED, seeded.total()));
        }

        Commands::List { entity, database, format } => {
            let kind: EntityKind = entity.parse()?;
            let database = resolve_existing(&config, database)?;
            let store = SqliteStore::open(&database)?;
            let listing = store.list_with_relations(kind)?;

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
                Format::Text if listing.is_empty() => {
                    println!("{} No {} found.", Icons::EMPTY, kind.plural_label().to_lowercase());
                }
                Format::Text => {
                    ui::section(kind.plural_label());
                    println!("{}", ui::listing_table(&listing));
                }
            }
        }

        Commands::Show { entity, id, database } => {
            let kind: EntityKind = entity.parse()?;
            let database = resolve_existing(&config, database)?;
            let store = SqliteStore::open(&database)?;

            match store.get(kind, id)? {
                Some(record) => {
                    ui::section(&format!("{} {}", kind, id));
                    ui::record_details(&record);
                }
                None => anyhow::bail!("No {} with id {}", kind, id),
            }
        }

        Commands::Stats { database } => {
            let database = resolve_existing(&config, database)?;
            let store = SqliteStore::open(&database)?;
            print_stats(&store, &database)?;
        }
    }

    Ok(())
}

/// Database path for commands that read an existing database. Opening a
/// missing path would silently create an empty one.
fn resolve_existing(config: &RealtyConfig, cli: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let database = config.database_path(cli);
    if !database.exists() {
        anyhow::bail!(
            "Database {} not found. Run `realty setup` first.",
            database.display()
        );
    }
    Ok(database)
}

fn print_stats(store: &SqliteStore, database: &std::path::Path) -> anyhow::Result<()> {
    let stats = store.stats()?;
    println!("{} Realty Statistics ({})", Icons::STATS, database.display());
    println!("{}", ui::stats_table(&stats));
    Ok(())
}
