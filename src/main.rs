pub mod types;
pub mod config;
pub mod data;
pub mod index;
pub mod classify;
pub mod ranking;
pub mod display;
pub mod render;
pub mod selection;
pub mod session;
pub mod hit;
pub mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::data::DatasetStore;
use crate::display::format_number;
use crate::render::{ConsoleSurface, Renderer};
use crate::session::{Interaction, Session};
use crate::types::SortKey;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the county GeoJSON and the static map frontend
    Serve,
    /// Print headline statistics for the whole collection
    Stats,
    /// Print the county rankings table
    Rankings {
        #[arg(short, long, value_enum, default_value_t = SortKey::Population)]
        sort: SortKey,
    },
    /// List counties whose name contains the query
    Search { query: String },
    /// Select a county and print its detail panel
    Inspect { name: String },
    /// Compare two counties side by side
    Compare { left: String, right: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let app_config = AppConfig::load_from_file(&cli.config)?;

    match &cli.command {
        Commands::Serve => {
            // A broken dataset leaves the map empty rather than taking the service down
            let store = DatasetStore::load(&app_config).unwrap_or_else(|err| {
                error!("Failed to load GeoJSON: {err:#}");
                DatasetStore::empty()
            });
            if store.is_empty() {
                warn!("No counties loaded, the map will be empty");
            }
            server::start_server(app_config.clone(), index::RegionIndex::new(store)).await?;
        }
        Commands::Stats => {
            let store = DatasetStore::load(&app_config)?;
            let stats = ranking::compute_stats(store.regions());
            let na = || display::NOT_AVAILABLE.to_string();
            println!("Total population:   {}", format_number(stats.total_population));
            println!("Counties:           {}", stats.region_count);
            println!("Most populous:      {}", stats.most_populous.unwrap_or_else(na));
            println!("Least populous:     {}", stats.least_populous.unwrap_or_else(na));
            println!("Highest density:    {}", stats.densest.unwrap_or_else(na));
        }
        Commands::Rankings { sort } => {
            let store = DatasetStore::load(&app_config)?;
            println!("{:>4}  {:<24} {:>14} {:>12} {:>10}", "#", "County", "Population", "Area", "Density");
            for row in ranking::ranking_rows(store.regions(), *sort) {
                println!(
                    "{:>4}  {:<24} {:>14} {:>12} {:>10}",
                    row.rank, row.name, row.population, row.area, row.density
                );
            }
        }
        Commands::Search { query } => {
            let mut session = Session::new();
            session.load(DatasetStore::load(&app_config)?);
            for region in session.search(query) {
                println!("{}", region.name);
            }
        }
        Commands::Inspect { name } => {
            run_session(&app_config, &[Interaction::RegionClicked(name.clone())])?;
        }
        Commands::Compare { left, right } => {
            run_session(
                &app_config,
                &[
                    Interaction::RegionClicked(left.clone()),
                    Interaction::CompareRequested,
                    Interaction::RegionClicked(right.clone()),
                ],
            )?;
        }
    }

    Ok(())
}

/// Replay interactions against a fresh session, rendering to the terminal.
fn run_session(config: &AppConfig, interactions: &[Interaction]) -> anyhow::Result<()> {
    let store = DatasetStore::load(config)?;
    let mut session = Session::new();
    let mut renderer = Renderer::new(config.map.clone());
    let mut map = ConsoleSurface;
    let mut panels = ConsoleSurface;

    let effects = session.load(store);
    if let Some(index) = session.index() {
        renderer.apply(index, &effects, &mut map, &mut panels);
    }

    for interaction in interactions {
        let effects = session.dispatch(interaction.clone());
        if effects.is_empty() {
            anyhow::bail!("Nothing to show for {:?}; check the county name", interaction);
        }
        if let Some(index) = session.index() {
            renderer.apply(index, &effects, &mut map, &mut panels);
        }
    }

    Ok(())
}
