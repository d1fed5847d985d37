mod commands;
mod config;
mod openfoodfacts;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{
    cmd_goals_set, cmd_goals_show, cmd_history, cmd_label, cmd_lookup, cmd_meal, cmd_summary,
    cmd_water,
};
use crate::config::Config;
use crate::openfoodfacts::OpenFoodFactsClient;
use steady_core::store::Store;

#[derive(Parser)]
#[command(
    name = "steady",
    version,
    about = "Track meals, water, and daily nutrition goals",
    long_about = "\n\n  ███████╗████████╗███████╗ █████╗ ██████╗ ██╗   ██╗
  ██╔════╝╚══██╔══╝██╔════╝██╔══██╗██╔══██╗╚██╗ ██╔╝
  ███████╗   ██║   █████╗  ███████║██║  ██║ ╚████╔╝
  ╚════██║   ██║   ██╔══╝  ██╔══██║██║  ██║  ╚██╔╝
  ███████║   ██║   ███████╗██║  ██║██████╔╝   ██║
  ╚══════╝   ╚═╝   ╚══════╝╚═╝  ╚═╝╚═════╝    ╚═╝
        eat well, log steady.
"
)]
struct Cli {
    /// Path to the record store file (default: platform data directory)
    #[arg(long, value_name = "PATH", global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a meal, auto-filling nutrition for fields not given
    Meal {
        /// Meal name (e.g. "chicken bowl")
        name: String,
        /// Calories (skips auto-fill for this field)
        #[arg(long)]
        calories: Option<u32>,
        /// Protein in grams (skips auto-fill for this field)
        #[arg(long)]
        protein: Option<u32>,
        /// Log exactly what was given, no nutrition lookup
        #[arg(long)]
        no_lookup: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log water intake
    Water {
        /// Amount in millilitres
        #[arg(default_value = "250")]
        ml: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up nutrition for a food name without logging anything
    Lookup {
        /// Food name to look up
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract nutrition facts from label text (e.g. pasted from a photo)
    Label {
        /// Label text, joined with spaces
        text: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show meals, water, and goal progress for a day
    Summary {
        /// Date to show (YYYY-MM-DD, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show daily totals for the last N days
    History {
        /// Number of days to show
        #[arg(short, long, default_value = "7")]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// View or change daily goals
    Goals {
        #[command(subcommand)]
        command: GoalsCommands,
    },
}

#[derive(Subcommand)]
enum GoalsCommands {
    /// Show current daily goals
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set one or more daily goals
    Set {
        /// Daily calorie goal
        #[arg(long)]
        calories: Option<u32>,
        /// Daily protein goal in grams
        #[arg(long)]
        protein: Option<u32>,
        /// Daily water goal in millilitres
        #[arg(long)]
        water: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("steady=warn,steady_core=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.store)?;
    let mut store = Store::open(&config.store_path)?;
    let off = OpenFoodFactsClient::new();

    match cli.command {
        Commands::Meal {
            name,
            calories,
            protein,
            no_lookup,
            json,
        } => cmd_meal(&mut store, off, &name, calories, protein, no_lookup, json).await,
        Commands::Water { ml, json } => cmd_water(&mut store, ml, json),
        Commands::Lookup { name, json } => cmd_lookup(off, &name, json).await,
        Commands::Label { text, json } => cmd_label(&text.join(" "), json),
        Commands::Summary { date, json } => cmd_summary(&store, date, json),
        Commands::History { days, json } => cmd_history(&store, days, json),
        Commands::Goals { command } => match command {
            GoalsCommands::Show { json } => cmd_goals_show(&store, json),
            GoalsCommands::Set {
                calories,
                protein,
                water,
                json,
            } => cmd_goals_set(&mut store, calories, protein, water, json),
        },
    }
}
