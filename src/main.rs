//! Vidra CLI - serve the addon or resolve ids from the terminal

use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use vidra::{
    addon, Capability, Config, ContentRef, EmbedClient, MediaType, Registry, Resolver, StreamCache,
};

#[derive(Parser)]
#[command(name = "vidra")]
#[command(about = "Multi-provider stream resolver and addon server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the addon HTTP server
    Serve {
        /// Port to listen on (overrides VIDRA_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Resolve one id and print the streams
    Resolve {
        /// Content type: movie or series
        #[arg(value_name = "TYPE")]
        media_type: String,

        /// IMDB (`tt...`) or TMDB (`tmdb:...`) id
        id: String,

        /// Season number (series only)
        #[arg(short, long)]
        season: Option<u32>,

        /// Episode number (series only)
        #[arg(short, long)]
        episode: Option<u32>,

        /// Print the raw addon JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List the built-in provider table
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            cmd_serve(port).await?;
        }
        Commands::Resolve {
            media_type,
            id,
            season,
            episode,
            json,
        } => {
            cmd_resolve(&media_type, &id, season, episode, json).await?;
        }
        Commands::Providers => {
            cmd_providers();
        }
    }

    Ok(())
}

fn build_resolver(config: Config) -> Result<Resolver> {
    Ok(Resolver::new(
        Registry::builtin(),
        StreamCache::new(config.cache_ttl),
        Arc::new(EmbedClient::new()?),
        config,
    ))
}

async fn cmd_serve(port: Option<u16>) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(port) = port {
        config.port = port;
    }
    let port = config.port;

    let resolver = Arc::new(build_resolver(config)?);
    println!("🎬 Vidra addon running at: http://127.0.0.1:{port}/manifest.json");
    addon::server::serve(resolver, port).await
}

async fn cmd_resolve(
    media_type: &str,
    id: &str,
    season: Option<u32>,
    episode: Option<u32>,
    json: bool,
) -> Result<()> {
    let Some(media_type) = MediaType::parse(media_type) else {
        bail!("unknown content type (expected movie or series)");
    };
    let content = match (media_type, season, episode) {
        (MediaType::Movie, _, _) => ContentRef::movie(id),
        (MediaType::Series, Some(season), Some(episode)) => {
            ContentRef::episode(id, season, episode)
        }
        (MediaType::Series, _, _) => {
            bail!("series resolution needs --season and --episode");
        }
    };

    let resolver = build_resolver(Config::from_env())?;

    let start = Instant::now();
    let streams = resolver.resolve(&content).await;
    let elapsed = start.elapsed();

    if json {
        let response = addon::StreamsResponse::from_streams(&streams);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!(
        "📊 {} streams in {:.2}ms\n",
        streams.len(),
        elapsed.as_secs_f64() * 1000.0
    );
    for stream in &streams {
        let marker = if stream.web_ready { "▶️ " } else { "🔗" };
        println!("{marker} {}", stream.title);
        println!("   {}", stream.url);
    }

    Ok(())
}

fn cmd_providers() {
    let registry = Registry::builtin();
    println!("🎬 {} providers:\n", registry.providers().len());
    for provider in registry.providers() {
        let capability = match provider.capability {
            Capability::EmbedOnly => "embed only".to_string(),
            Capability::Extract(strategy) => format!("extract ({strategy:?})"),
        };
        println!(
            "   {:<12} priority {:<3} {capability}",
            provider.key, provider.priority
        );
    }
}
