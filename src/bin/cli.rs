use chrono::Duration;
use clap::{Parser, Subcommand};
use gameshelf_engine::{CacheConfig, GameRecord, ShelfEngine};

#[derive(Parser)]
#[command(name = "gameshelf-cli")]
#[command(about = "GameShelf Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database path
    #[arg(short, long, default_value = "gameshelf.db")]
    db: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank search suggestions for a query
    Suggest {
        /// Search query
        query: String,

        /// Path to a JSON file holding the game library
        #[arg(short, long)]
        library: Option<String>,

        /// Maximum suggestions
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show cache statistics
    Stats,

    /// Drop cache entries older than the given age
    Evict {
        /// Maximum age in days
        #[arg(short, long, default_value = "7")]
        max_age_days: i64,
    },

    /// Drop every cache entry
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let engine = ShelfEngine::open(&cli.db)?;

    match cli.command {
        Commands::Suggest {
            query,
            library,
            limit,
        } => {
            let games: Vec<GameRecord> = match library {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(&path)?)?,
                None => Vec::new(),
            };

            println!("🔍 Suggestions for: {}", query);

            let suggestions = engine.suggest(&query, &games, &[], limit);

            if suggestions.is_empty() {
                println!("\n(no matches)");
            } else {
                println!();
                for (i, suggestion) in suggestions.iter().enumerate() {
                    println!(
                        "   {}. [{}] {} ({:.1})",
                        i + 1,
                        suggestion.kind,
                        suggestion.text,
                        suggestion.score
                    );
                }
            }
        }

        Commands::Stats => {
            let stats = engine.cache_stats().await;

            println!("📊 Cache Statistics:");
            println!("   Total entries: {}", stats.total_entries);
            println!("   Approx size: {} bytes", stats.approx_size_bytes);

            if let Some(oldest) = stats.oldest_entry {
                println!("   Oldest entry: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
            }

            if let Some(newest) = stats.newest_entry {
                println!("   Newest entry: {}", newest.format("%Y-%m-%d %H:%M:%S"));
            }
        }

        Commands::Evict { max_age_days } => {
            println!("🧹 Evicting entries older than {} days...", max_age_days);

            let engine = engine.with_cache_config(CacheConfig {
                max_age: Duration::days(max_age_days),
            });
            let removed = engine.evict_expired().await;

            println!("✅ Removed {} entries", removed);
        }

        Commands::Clear => {
            let removed = engine.clear_cache().await;

            println!("✅ Removed {} entries", removed);
        }
    }

    Ok(())
}
