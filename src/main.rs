use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use game_shelf::catalog::Catalog;
use game_shelf::filter::Filter;
use game_shelf::models::{Game, Match, Player};
use game_shelf::parse_feature_pair;

#[derive(Parser)]
#[command(name = "game-shelf")]
#[command(about = "In-memory board game catalog with composable search filters")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the sample catalog and walk through its queries
    Demo,

    /// Search the sample catalog with a filter chain
    Search {
        /// Minimum average rating (inclusive)
        #[arg(long)]
        min_rating: Option<f64>,

        /// Required feature as "name=value" (repeatable)
        #[arg(long)]
        feature: Vec<String>,

        /// Reference game for similarity search (repeatable)
        #[arg(long)]
        similar_to: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting game-shelf v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Demo => run_demo(),
        Commands::Search {
            min_rating,
            feature,
            similar_to,
            json,
        } => run_search(min_rating, &feature, &similar_to, json),
    }
}

fn demo_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("invalid date {}-{}-{}", year, month, day))
}

/// The built-in sample catalog: three games, three players, two recorded
/// matches, one similarity pair.
fn build_sample_catalog() -> Result<Catalog> {
    let mut catalog = Catalog::new();

    let mut chess = Game::new("Chess", 2, 2)
        .with_description("The classic game of perfect information")
        .with_edition("Staunton");
    chess.add_feature("Genre", "Abstract strategy")?;
    chess.add_feature("Complexity", "High")?;
    catalog.add_game(chess)?;

    let mut carcassonne = Game::new("Carcassonne", 2, 6)
        .with_description("Tile placement in southern France")
        .with_edition("Big Box");
    carcassonne.add_feature("Genre", "Family")?;
    carcassonne.add_feature("Complexity", "Medium")?;
    catalog.add_game(carcassonne)?;

    let mut catan = Game::new("Catan", 3, 4)
        .with_description("Trade, build, settle")
        .with_edition("5th");
    catan.add_feature("Genre", "Strategy")?;
    catan.add_feature("Complexity", "Medium")?;
    catalog.add_game(catan)?;

    catalog.add_player(Player::new("ivan", "Ivan"))?;
    catalog.add_player(Player::new("maria", "Maria"))?;
    catalog.add_player(Player::new("petr", "Petr"))?;

    catalog.add_rating("Chess", "ivan", 5)?;
    catalog.add_rating("Chess", "maria", 5)?;
    catalog.add_rating("Carcassonne", "ivan", 4)?;
    catalog.add_rating("Carcassonne", "petr", 5)?;
    catalog.add_rating("Catan", "maria", 4)?;
    catalog.add_rating("Catan", "petr", 4)?;

    let mut first = Match::new("m1", "Chess", demo_date(2024, 10, 1)?);
    first.add_player_result("ivan", 1.0)?;
    first.add_player_result("maria", 0.0)?;
    catalog.add_match(first)?;

    let mut second = Match::new("m2", "Carcassonne", demo_date(2024, 10, 5)?);
    second.add_player_result("ivan", 95.0)?;
    second.add_player_result("maria", 88.0)?;
    second.add_player_result("petr", 102.0)?;
    catalog.add_match(second)?;

    catalog.add_similarity("Chess", "Catan")?;

    Ok(catalog)
}

fn run_demo() -> Result<()> {
    let catalog = build_sample_catalog()?;

    println!("\n=== Catalog Overview ===");
    println!("{}", catalog.statistics());

    println!("\n=== Games ===");
    for game in catalog.games().values() {
        println!("  {}", game);
    }

    println!("\n=== Players ===");
    for player in catalog.players().values() {
        println!("  {}", player);
    }

    println!("\n=== Highly Rated (avg >= 4.5) ===");
    for game in catalog.find_games(&Filter::by_rating(4.5)) {
        println!("  {} ({:.2})", game.name, game.average_rating());
    }

    println!("\n=== Strategy Games ===");
    let required = BTreeMap::from([("Genre".to_string(), "Strategy".to_string())]);
    for game in catalog.find_games(&Filter::by_features(required)) {
        println!("  {} ({:.2})", game.name, game.average_rating());
    }

    println!("\n=== Similar to Chess ===");
    let similar = Filter::similar_to(
        vec!["Chess".to_string()],
        catalog.similarity_pairs().clone(),
    );
    for game in catalog.find_games(&similar) {
        println!("  {} ({:.2})", game.name, game.average_rating());
    }

    println!("\n=== Match Records ===");
    for game_match in catalog.matches() {
        println!("  {}", game_match);
        if let Some(winner) = game_match.winner() {
            println!("    Winner: {}", winner);
        }
    }

    println!("\n=== Player Summary ===");
    println!(
        "Ivan's games:                  {}",
        catalog.player_games("ivan").join(", ")
    );
    println!(
        "Ivan's average in Carcassonne: {:.1}",
        catalog.player_rating_in_game("ivan", "Carcassonne")
    );

    Ok(())
}

fn run_search(
    min_rating: Option<f64>,
    features: &[String],
    similar_to: &[String],
    json: bool,
) -> Result<()> {
    let catalog = build_sample_catalog()?;

    let mut filters = Vec::new();
    if let Some(min) = min_rating {
        filters.push(Filter::by_rating(min));
    }
    if !features.is_empty() {
        let mut required = BTreeMap::new();
        for raw in features {
            let (name, value) = parse_feature_pair(raw)
                .with_context(|| format!("invalid --feature '{}', expected name=value", raw))?;
            required.insert(name, value);
        }
        filters.push(Filter::by_features(required));
    }
    if !similar_to.is_empty() {
        filters.push(Filter::similar_to(
            similar_to.to_vec(),
            catalog.similarity_pairs().clone(),
        ));
    }
    if filters.is_empty() {
        bail!("no filters given; use --min-rating, --feature, or --similar-to");
    }

    for filter in &filters {
        tracing::debug!("Applying {}", filter);
    }
    let results = catalog.find_games_chained(&filters);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No games matched.");
    } else {
        for game in &results {
            println!("{}", game);
        }
    }

    Ok(())
}
