//! CLI commands implementation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Settings, DEFAULT_MEDIA_DIR, DEFAULT_PORT};
use crate::scrape::{ProfileScraper, DEFAULT_MAX_POSTS, DEFAULT_MAX_REPLIES};
use crate::{export, media, server};

#[derive(Parser)]
#[command(name = "threadscrape")]
#[command(about = "Scrape posts and replies from Threads profiles")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Bind port
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Scrape posts from a profile
    Posts {
        /// Profile username (without the leading @)
        username: String,
        /// Maximum number of posts to collect
        #[arg(short, long, default_value_t = DEFAULT_MAX_POSTS)]
        max_posts: usize,
        /// Write the posts to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the posts to a JSON file
        #[arg(long)]
        json: Option<PathBuf>,
        /// Download referenced media to disk
        #[arg(long)]
        download_media: bool,
        /// Directory for downloaded media
        #[arg(long, default_value = DEFAULT_MEDIA_DIR)]
        media_dir: PathBuf,
    },

    /// Scrape replies from a thread URL
    Replies {
        /// Full URL of the thread page
        thread_url: String,
        /// Maximum number of replies to collect
        #[arg(short, long, default_value_t = DEFAULT_MAX_REPLIES)]
        max_replies: usize,
        /// Write the replies to a JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::from_env();

    match cli.command {
        Commands::Serve { host, port } => {
            settings.host = host;
            settings.port = port;
            server::serve(&settings).await
        }

        Commands::Posts {
            username,
            max_posts,
            csv,
            json,
            download_media,
            media_dir,
        } => {
            let scraper = ProfileScraper::from_settings(&settings);
            let posts = scraper.profile_posts(&username, max_posts).await?;

            let mut wrote_file = false;
            if let Some(path) = csv {
                export::save_posts_csv(&posts, &path)?;
                wrote_file = true;
            }
            if let Some(path) = json {
                export::save_json(&posts, &path)?;
                wrote_file = true;
            }
            if !wrote_file {
                println!("{}", export::to_json_pretty(&posts)?);
            }

            if download_media {
                let client = reqwest::Client::new();
                let saved = media::download_post_media(&client, &posts, &media_dir).await?;
                eprintln!("Downloaded {} media files to {}", saved, media_dir.display());
            }

            Ok(())
        }

        Commands::Replies {
            thread_url,
            max_replies,
            json,
        } => {
            let scraper = ProfileScraper::from_settings(&settings);
            let replies = scraper.thread_replies(&thread_url, max_replies).await?;

            match json {
                Some(path) => export::save_json(&replies, &path)?,
                None => println!("{}", export::to_json_pretty(&replies)?),
            }

            Ok(())
        }
    }
}
