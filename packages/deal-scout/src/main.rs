//! Deal Scout CLI
//!
//! Estimates product prices from similar historical items and curates new
//! deals from scraped candidate files.
//!
//! ```text
//! deal-scout price "Cordless drill, 18V, two batteries" --corpus items.json
//! deal-scout scan --candidates deals.json --memory memory.json --estimate
//! ```

mod config;
mod feed;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deal_agents::encoders::GeminiEncoder;
use deal_agents::models::GeminiModel;
use deal_agents::{
    ChromaStore, DealSelector, Encoder, MemoryVectorStore, Opportunity,
    PriceEstimator, PricedItem, PricerConfig, Scanner, SimilarityRetriever, TextModel,
    VectorStore,
};
use gemini_client::GeminiClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, EmbeddingBackend};
use crate::feed::{load_memory, JsonFileFeed};

const ENCODER_HELP: &str = "\
Retrieval only works against a corpus embedded with the same encoder:
  EMBEDDING_BACKEND=gemini     text-embedding-004, 768 dimensions (default)
  EMBEDDING_BACKEND=fastembed  multilingual-e5-small, 384 dimensions
Chroma collections built with another model, such as e5-small-v2, must be
re-indexed with one of these before `price` or `scan --estimate` can use them.

Environment: GEMINI_API_KEY, GEMINI_MODEL, GEMINI_TIMEOUT_SECS, CHROMA_URL,
CHROMA_COLLECTION_ID, CHROMA_TOKEN, CHROMA_TENANT, CHROMA_DATABASE,
EMBEDDING_BACKEND";

#[derive(Parser)]
#[command(
    name = "deal-scout",
    about = "Price estimation and deal curation",
    after_help = ENCODER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate the price of a product description
    Price {
        description: String,

        /// JSON array of {description, price} to index in memory instead of Chroma
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Neighbors shown to the model
        #[arg(long, default_value_t = 5)]
        top_k: usize,
    },

    /// Curate new deals from a candidate file
    Scan {
        /// JSON array of scraped candidates
        #[arg(long)]
        candidates: PathBuf,

        /// Deals already surfaced: urls or opportunities
        #[arg(long)]
        memory: Option<PathBuf>,

        /// Only consider candidates from these feeds
        #[arg(long = "feed")]
        feeds: Vec<String>,

        /// Also estimate each selected deal's price
        #[arg(long)]
        estimate: bool,

        /// Corpus for --estimate, as for `price`
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,deal_agents=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let mut client = GeminiClient::new(&config.gemini_api_key);
    if let Some(secs) = config.gemini_timeout_secs {
        client = client.with_timeout(Duration::from_secs(secs))?;
    }
    let mut model = GeminiModel::new(client.clone());
    if let Some(name) = &config.gemini_model {
        model = model.with_model(name);
    }
    let model: Arc<dyn TextModel> = Arc::new(model);

    match cli.command {
        Command::Price {
            description,
            corpus,
            top_k,
        } => {
            let estimator = build_estimator(&config, &client, model, corpus, top_k).await?;
            let estimate = estimator
                .estimate_price(&description)
                .await
                .context("Price estimation failed")?;

            if !estimate.is_parsed() {
                tracing::warn!(reply = %estimate.reply, "Model reply had no price");
            }
            println!("${:.2}", estimate.value);
        }

        Command::Scan {
            candidates,
            memory,
            feeds,
            estimate,
            corpus,
        } => {
            let known = match &memory {
                Some(path) => load_memory(path).await?,
                None => Default::default(),
            };
            tracing::info!(known = known.len(), "Loaded deal memory");

            let scanner = Scanner::new(
                Arc::new(JsonFileFeed::new(candidates)),
                DealSelector::new(Arc::clone(&model)),
            );
            let selected_feeds = (!feeds.is_empty()).then_some(feeds.as_slice());

            let Some(selection) = scanner.scan(&known, selected_feeds).await else {
                println!("no new deals");
                return Ok(());
            };
            if selection.is_empty() {
                println!("no new deals");
                return Ok(());
            }

            if !estimate {
                println!("{}", serde_json::to_string_pretty(&selection)?);
                return Ok(());
            }

            let estimator = build_estimator(&config, &client, model, corpus, 5).await?;
            let mut opportunities = Vec::with_capacity(selection.len());
            for deal in selection.deals {
                let estimate = estimator
                    .estimate_price(&deal.product_description)
                    .await
                    .with_context(|| format!("Price estimation failed for {}", deal.url))?;
                opportunities.push(Opportunity::new(deal, estimate.value));
            }
            opportunities.sort_by(|a, b| b.discount.total_cmp(&a.discount));

            println!("{}", serde_json::to_string_pretty(&opportunities)?);
        }
    }

    Ok(())
}

async fn build_estimator(
    config: &Config,
    client: &GeminiClient,
    model: Arc<dyn TextModel>,
    corpus: Option<PathBuf>,
    top_k: usize,
) -> Result<PriceEstimator> {
    let encoder = build_encoder(config, client)?;

    let store: Arc<dyn VectorStore> = match corpus {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read corpus {}", path.display()))?;
            let items: Vec<PricedItem> = serde_json::from_str(&raw)
                .with_context(|| format!("Corpus {} is not valid", path.display()))?;

            let store = MemoryVectorStore::new();
            store.index_items(encoder.as_ref(), &items).await?;
            tracing::info!(items = store.len(), "Indexed corpus in memory");
            Arc::new(store)
        }
        None => {
            let collection = config
                .chroma_collection_id
                .as_deref()
                .context("CHROMA_COLLECTION_ID must be set when no --corpus is given")?;
            let mut store = ChromaStore::new(&config.chroma_url, collection);
            if let Some(tenant) = &config.chroma_tenant {
                store = store.with_tenant(tenant);
            }
            if let Some(database) = &config.chroma_database {
                store = store.with_database(database);
            }
            if let Some(token) = &config.chroma_token {
                store = store.with_token(token);
            }
            Arc::new(store)
        }
    };

    Ok(
        PriceEstimator::new(SimilarityRetriever::new(encoder, store), model)
            .with_config(PricerConfig::new().with_top_k(top_k)),
    )
}

fn build_encoder(config: &Config, client: &GeminiClient) -> Result<Arc<dyn Encoder>> {
    match config.embedding_backend {
        EmbeddingBackend::Gemini => Ok(Arc::new(GeminiEncoder::new(client.clone()))),
        EmbeddingBackend::FastEmbed => fastembed_encoder(),
    }
}

#[cfg(feature = "fastembed")]
fn fastembed_encoder() -> Result<Arc<dyn Encoder>> {
    use deal_agents::encoders::{fastembed::DEFAULT_FASTEMBED_MODEL, FastEmbedEncoder};
    use deal_agents::LazyEncoder;

    // multilingual-e5-small
    const DIMENSION: usize = 384;

    Ok(Arc::new(LazyEncoder::new(DEFAULT_FASTEMBED_MODEL, DIMENSION, || {
        Ok(Arc::new(FastEmbedEncoder::new()?) as Arc<dyn Encoder>)
    })))
}

#[cfg(not(feature = "fastembed"))]
fn fastembed_encoder() -> Result<Arc<dyn Encoder>> {
    anyhow::bail!("EMBEDDING_BACKEND=fastembed needs deal-scout built with --features fastembed")
}
