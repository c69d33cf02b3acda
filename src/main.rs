use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use flurry_rank::catalog::{rank, Catalog, Location};
use flurry_rank::config::{ConfigInput, Settings};
use flurry_rank::format::format_coords;
use flurry_rank::leaderboard::{top_n, DEFAULT_TOP_N};
use flurry_rank::position;
use flurry_rank::ratings::{PendingSubmission, RatingStore, Texture};
use flurry_rank::report::{render_leaderboard, render_store_detail, render_store_list};
use flurry_rank::server::{self, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Flurry Rank: find the best dessert in town.
///
/// Lists stores by distance, shows and records ratings, and ranks stores
/// by their average score. Human-readable output goes to stderr, JSON to
/// stdout.
///
/// Examples:
///   flurry stores --query hamburg
///   flurry stores --lat 48.137 --lon 11.575
///   flurry show 3
///   flurry top -n 5
///   flurry rate --store 3 --stars 5 --texture creamy --sauce 3 --mixin
///   flurry serve --port 8080
#[derive(Parser)]
#[command(name = "flurry", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConfigArgs {
    /// JSON file with the store catalog. Defaults to the built-in list.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Local ratings file (file backend). Defaults to ~/.flurry/ratings.json.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Base URL of a PostgREST-compatible ratings backend.
    #[arg(long, global = true, env = "FLURRY_BACKEND_URL")]
    backend_url: Option<String>,

    /// API key for the ratings backend.
    #[arg(long, global = true, env = "FLURRY_BACKEND_KEY", hide_env_values = true)]
    backend_key: Option<String>,

    /// Offline mode: local ratings file only, no IP lookup.
    #[arg(long, global = true)]
    offline: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List stores, nearest first when a position is known.
    Stores {
        /// Case-insensitive filter on store name and city.
        #[arg(long, short = 'q', default_value = "")]
        query: String,

        /// Latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        /// Longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        /// Approximate the position via IP geolocation.
        #[arg(long, short = 'a', conflicts_with_all = ["lat", "lon"])]
        auto: bool,
    },

    /// Show one store with its average and all ratings.
    Show {
        /// Store id.
        id: u32,
    },

    /// Best-rated stores.
    Top {
        /// How many stores to list.
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        n: usize,
    },

    /// Submit a rating.
    Rate {
        /// Store id.
        #[arg(long)]
        store: u32,

        /// Stars, 1 to 5.
        #[arg(long)]
        stars: u8,

        /// icy, creamy or soft.
        #[arg(long, default_value = "creamy")]
        texture: Texture,

        /// Sauce amount, 1 (too little) to 5 (too much); 3 is perfect.
        #[arg(long, default_value_t = 3)]
        sauce: u8,

        /// There was a mix-in (e.g. chocolate).
        #[arg(long)]
        mixin: bool,

        /// Free-text comment.
        #[arg(long, default_value = "")]
        comment: String,
    },

    /// Serve the JSON API.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flurry_rank=info,flurry=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let offline = cli.config.offline;
    let settings = Settings::resolve(ConfigInput {
        catalog: cli.config.catalog,
        data: cli.config.data,
        backend_url: cli.config.backend_url,
        backend_key: cli.config.backend_key,
        offline,
    })?;

    let catalog = settings.load_catalog().context("loading store catalog")?;
    let mut store = settings.open_store();

    // A failed load is not fatal: carry on with an empty store.
    if let Err(e) = store.load_all() {
        warn!(backend = %settings.backend_label(), "{}", e);
    }

    match cli.command {
        Command::Stores { query, lat, lon, auto } => {
            let position = if auto {
                if offline {
                    warn!("--auto ignored in offline mode");
                    None
                } else {
                    position::locate_by_ip()
                }
            } else {
                position::from_manual(lat, lon)
            };

            if let Some(p) = position {
                eprintln!("  \u{1F4CD} {}", format_coords(p.latitude, p.longitude));
            }

            let ranked = rank(&catalog, position, &query);
            eprint!("{}", render_store_list(&ranked, &store));
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }

        Command::Show { id } => {
            eprint!("{}", render_store_detail(catalog_entry(&catalog, id)?, &store));
            println!("{}", serde_json::to_string_pretty(&store.ratings_for(id))?);
        }

        Command::Top { n } => {
            let board = top_n(&catalog, &store, n);
            eprint!("{}", render_leaderboard(&board));
            println!("{}", serde_json::to_string_pretty(&board)?);
        }

        Command::Rate { store: id, stars, texture, sauce, mixin, comment } => {
            let mut form = PendingSubmission::new(id);
            form.rating.stars = stars;
            form.rating.texture = texture;
            form.rating.sauce_level = sauce;
            form.rating.has_mixin = mixin;
            form.rating.comment = comment;

            let saved = form.submit(&catalog, &mut store)?;
            eprint!("{}", render_store_detail(catalog_entry(&catalog, id)?, &store));
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }

        Command::Serve { host, port } => serve(&settings.backend_label(), catalog, store, &host, port)?,
    }

    Ok(())
}

fn catalog_entry(catalog: &Catalog, id: u32) -> Result<&Location> {
    match catalog.get(id) {
        Some(l) => Ok(l),
        None => bail!("no store with id {}", id),
    }
}

fn serve(backend: &str, catalog: Catalog, store: RatingStore, host: &str, port: u16) -> Result<()> {
    eprintln!(
        "  Flurry Rank: {} stores, {} ratings ({})",
        catalog.len(),
        store.len(),
        backend
    );
    let state = Arc::new(AppState::new(catalog, store));
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime
        .block_on(server::start(host, port, state))
        .with_context(|| format!("serving on {}:{}", host, port))
}
