//! Blogchain client (v1)
//!
//! Terminal front end for a Cosmos-SDK blog chain.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI command
//!       │
//!       ▼
//!   ┌──────────────┐     ┌──────────────┐
//!   │ session store │────▶│ wallet        │  mnemonic signer / extension
//!   │ (busy guard,  │     └──────────────┘
//!   │  snapshot)    │     ┌──────────────┐
//!   │               │────▶│ chain client  │────▶ REST gateway (tx, bank, auth)
//!   │               │     └──────────────┘
//!   │               │     ┌──────────────┐
//!   │               │────▶│ content       │────▶ REST gateway (posts, tx search)
//!   └──────┬────────┘     └──────────────┘
//!          ▼
//!   view (post cards, status line, theme palette)
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use blogchain_client::config::loader::load_or_default;
use blogchain_client::content::{ContentGateway, ContentSource};
use blogchain_client::observability::{logging, metrics};
use blogchain_client::preferences::PreferenceStore;
use blogchain_client::session::SessionStore;
use blogchain_client::view::{Palette, PostCard, StatusLine};

#[derive(Parser)]
#[command(name = "blogchain")]
#[command(about = "Read and write posts on a blog chain", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable ANSI colours
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recent posts
    Posts {
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show a single post
    Post { id: String },
    /// Show the balance of the wallet in BLOGCHAIN_MNEMONIC
    Balance,
    /// Show recent transactions of the wallet
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
    /// Publish a post
    CreatePost {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Like a post
    Like { id: String },
    /// Send tokens
    Send {
        to: String,
        amount: String,
        #[arg(long)]
        denom: Option<String>,
    },
    /// Show or toggle the colour theme
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    logging::init(&config.observability);

    tracing::info!(
        chain_id = %config.chain.chain_id,
        rest_url = %config.chain.rest_url,
        api_url = %config.content.api_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let preferences = PreferenceStore::from_config(&config.appearance);
    let palette = if cli.no_color {
        Palette::plain()
    } else {
        Palette::for_theme(preferences.theme())
    };

    if let Commands::Posts { limit: Some(limit) } = &cli.command {
        config.session.posts_limit = *limit;
    }

    match cli.command {
        Commands::Theme { toggle } => {
            let theme = if toggle {
                preferences.toggle()?
            } else {
                preferences.theme()
            };
            println!("{}", theme.as_str());
        }
        Commands::Posts { .. } => {
            let store = SessionStore::from_config(&config, None)?;
            let posts = store.fetch_posts().await?;
            if posts.is_empty() {
                println!("No posts yet.");
            }
            for post in &posts {
                println!("{}\n", PostCard::new(post, palette));
            }
        }
        Commands::Post { id } => {
            let content = ContentGateway::new(
                &config.content,
                Duration::from_secs(config.timeouts.request_secs),
            )?;
            let post = content.get_post(&id).await?;
            println!("{}", PostCard::new(&post, palette));
            println!("\n{}", post.body);
        }
        Commands::Balance => {
            let store = connect_wallet(&config).await?;
            println!("{}", StatusLine::new(&store.snapshot(), store.formatted_balance(), palette));
        }
        Commands::History { limit } => {
            let store = connect_wallet(&config).await?;
            let txs = store.transaction_history(limit).await?;
            if txs.is_empty() {
                println!("No transactions found.");
            }
            for tx in txs {
                let status = if tx.code == 0 { "ok" } else { "failed" };
                println!("{}  height {}  {}  {}", tx.txhash, tx.height, status, tx.timestamp);
            }
        }
        Commands::CreatePost { title, body, tags } => {
            let store = connect_wallet(&config).await?;
            let tx = store.create_post(&title, &body, &tags).await?;
            println!("Post created in tx {} (height {})", tx.tx_hash, tx.height);
            println!("{}", StatusLine::new(&store.snapshot(), store.formatted_balance(), palette));
        }
        Commands::Like { id } => {
            let store = connect_wallet(&config).await?;
            let tx = store.like_post(&id).await?;
            println!("Liked post {} in tx {}", id, tx.tx_hash);
        }
        Commands::Send { to, amount, denom } => {
            let denom = denom.unwrap_or_else(|| config.chain.stake_currency.coin_minimal_denom.clone());
            let store = connect_wallet(&config).await?;
            let tx = store.send_tokens(&to, &amount, &denom).await?;
            println!("Sent {}{} to {} in tx {}", amount, denom, to, tx.tx_hash);
            println!("{}", StatusLine::new(&store.snapshot(), store.formatted_balance(), palette));
        }
    }

    Ok(())
}

/// Build a store and connect the signer from `BLOGCHAIN_MNEMONIC`.
async fn connect_wallet(
    config: &blogchain_client::ClientConfig,
) -> Result<SessionStore, Box<dyn std::error::Error>> {
    let store = SessionStore::from_config(config, None)?;
    store.connect_wallet_from_env().await?;
    Ok(store)
}
