use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use buzzer::config::Config;
use buzzer::features::clean::TextCleaner;
use buzzer::features::extractor::BuzzerFeatures;
use buzzer::features::profile::ProfileDirectory;
use buzzer::pipeline::batch::DEFAULT_BATCH_SIZE;
use buzzer::pipeline::collect::CollectOptions;
use buzzer::pipeline::following::FollowingDirs;
use buzzer::social_political::SocialPoliticalModel;
use buzzer::twitter::client::TwitterClient;
use buzzer::twitter::credentials::{load_credentials, SlotPool};

/// Buzzer: timeline collection and feature extraction for buzzer detection.
///
/// Collects Twitter timelines with a pool of API keys, then turns each
/// user's timeline into a feature row for the buzzer classifier.
#[derive(Parser)]
#[command(name = "buzzer", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory layout
    Init,

    /// Fetch recent tweets for every user in a JSON list of screen names
    CollectTimelines {
        /// JSON array of screen names (default: <data>/supports/users.json)
        #[arg(long)]
        users: Option<PathBuf>,

        /// Only process the first N users
        #[arg(long)]
        take: Option<usize>,

        /// Tweets per user (default: BUZZER_TIMELINE_LIMIT or 300)
        #[arg(long)]
        limit: Option<usize>,

        /// Concurrent fetches (default: BUZZER_WORKERS or 10)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Fetch who each user follows, writing profiles and following lists
    CollectFollowing {
        /// JSON array of screen names (default: <data>/supports/users.json)
        #[arg(long)]
        users: Option<PathBuf>,

        /// Only process the first N users
        #[arg(long)]
        take: Option<usize>,

        /// Concurrent fetches (default: BUZZER_WORKERS or 10)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Extract buzzer features from timeline files, batch by batch
    Features {
        /// Directory of timeline JSON files (default: <data>/user_timeline)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output directory (default: <data>/dataset)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Files per batch
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Only process this batch (0-based); all batches when omitted
        #[arg(long)]
        batch: Option<usize>,

        /// Run the text-cleaning pass over bios and tweets
        #[arg(long)]
        clean: bool,
    },

    /// Per-user hashtag and mention statistics over timeline files
    Stats {
        /// Directory of timeline JSON files (default: <data>/user_timeline)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output file (default: <data>/user_stats.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Classify a single name with the social-political model
    Classify {
        /// The name or screen name to classify
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("buzzer=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            let following = FollowingDirs::under(&config.data_dir);
            let dirs = [
                config.timeline_dir(),
                config.supports_dir(),
                config.dataset_dir(),
                following.profile,
                following.following,
            ];
            buzzer::store::ensure_dirs(&dirs)?;
            println!("Data layout ready under: {}", config.data_dir.display());
            println!(
                "\nNext: put a JSON array of screen names in {}",
                config.supports_dir().join("users.json").display()
            );
            println!("Then run: buzzer collect-timelines");
        }

        Commands::CollectTimelines {
            users,
            take,
            limit,
            workers,
        } => {
            config.require_keys()?;
            let screen_names = load_users(&config, users.as_deref(), take)?;
            let pool = client_pool(&config)?;

            let options = CollectOptions {
                limit: limit.unwrap_or(config.timeline_limit),
                workers: workers.unwrap_or(config.workers),
                retry: config.retry.clone(),
            };

            println!(
                "Collecting up to {} tweets for {} users ({} keys, {} workers)...",
                options.limit,
                screen_names.len(),
                pool.len(),
                options.workers
            );

            let out_dir = config.timeline_dir();
            let summary =
                buzzer::pipeline::collect::run(&pool, &screen_names, &out_dir, &options).await?;
            buzzer::output::terminal::display_collect_summary(&summary);
        }

        Commands::CollectFollowing {
            users,
            take,
            workers,
        } => {
            config.require_keys()?;
            let screen_names = load_users(&config, users.as_deref(), take)?;
            let pool = client_pool(&config)?;
            let dirs = FollowingDirs::under(&config.data_dir);

            println!(
                "Collecting following lists for {} users...",
                screen_names.len()
            );

            let summary = buzzer::pipeline::following::run(
                &pool,
                &screen_names,
                &dirs,
                workers.unwrap_or(config.workers),
                &config.retry,
            )
            .await?;
            buzzer::output::terminal::display_following_summary(&summary);
        }

        Commands::Features {
            input,
            output,
            batch_size,
            batch,
            clean,
        } => {
            config.require_model()?;
            config.require_profiles()?;

            let input = input.unwrap_or_else(|| config.timeline_dir());
            let output = output.unwrap_or_else(|| config.dataset_dir());

            let model = SocialPoliticalModel::load(&config.model_path, &config.lexicon_path)?;
            let profiles = ProfileDirectory::load(&config.profile_path)?;
            let cleaner = if clean {
                let cleaner = TextCleaner::indonesian();
                Some(match &config.slang_path {
                    Some(path) => cleaner.with_slang_file(path)?,
                    None => cleaner,
                })
            } else {
                None
            };

            let mut extractor = BuzzerFeatures::new(&profiles, &model);
            if let Some(cleaner) = &cleaner {
                extractor = extractor.with_cleaner(cleaner);
            }

            let files = buzzer::pipeline::batch::list_json_files(&input)?;
            if files.is_empty() {
                println!("No timeline files found in {}", input.display());
                return Ok(());
            }
            info!(files = files.len(), batch_size = batch_size, "Starting feature extraction");

            let reports =
                buzzer::pipeline::batch::run(&extractor, &files, batch_size, batch, &output)?;
            buzzer::output::terminal::display_batch_reports(&reports);

            if let Some(first) = reports.first() {
                let rows: Vec<buzzer::features::record::FeatureRecord> =
                    buzzer::store::read_json(&first.output)?;
                println!("\n{}", "Sample rows:".bold());
                buzzer::output::terminal::display_feature_preview(&rows, 5);
            }
            println!(
                "\n{}",
                if clean {
                    "Clean features written."
                } else {
                    "Raw features written."
                }
                .bold()
            );
        }

        Commands::Stats { input, output } => {
            let input = input.unwrap_or_else(|| config.timeline_dir());
            let output = output.unwrap_or_else(|| config.data_dir.join("user_stats.json"));

            let files = buzzer::pipeline::batch::list_json_files(&input)?;
            let stats = buzzer::features::stats::compute_all(&files);
            buzzer::store::write_json(&output, &stats)?;

            buzzer::output::terminal::display_stats_summary(&stats);
            println!("\nStats saved to: {}", output.display());
        }

        Commands::Classify { text } => {
            config.require_model()?;
            let model = SocialPoliticalModel::load(&config.model_path, &config.lexicon_path)?;
            let features = model.features(&text)?;
            let label = model.predict(&text)?;
            buzzer::output::terminal::display_classification(&text, &features, label);
        }
    }

    Ok(())
}

/// Read the list of screen names to process, optionally truncated.
fn load_users(config: &Config, users: Option<&Path>, take: Option<usize>) -> Result<Vec<String>> {
    let default_path = config.supports_dir().join("users.json");
    let path = users.unwrap_or(&default_path);

    let mut names: Vec<String> = buzzer::store::read_json(path)
        .with_context(|| format!("Failed to load screen names from {}", path.display()))?;
    if let Some(n) = take {
        names.truncate(n);
    }
    Ok(names)
}

/// One API client per key file, wrapped in a slot pool.
fn client_pool(config: &Config) -> Result<SlotPool<TwitterClient>> {
    let clients = load_credentials(&config.keys_dir)?
        .into_iter()
        .map(|cred| TwitterClient::new(&config.api_url, cred))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to build Twitter client")?;
    Ok(SlotPool::new(clients))
}
