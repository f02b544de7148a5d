//! CLI entry point for prismic-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prismic-blog")]
#[command(version)]
#[command(about = "A blog front end for Prismic-style content APIs", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate the list page and pre-rendered posts
    #[command(alias = "g")]
    Generate {
        /// Regenerate outputs even if they are still fresh
        #[arg(short, long)]
        force: bool,

        /// Read content from a JSON fixture file instead of the endpoint
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Read content from a JSON fixture file instead of the endpoint
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// List posts
    List {
        /// Follow the paging cursor until every post is loaded
        #[arg(short, long)]
        all: bool,

        /// Read content from a JSON fixture file instead of the endpoint
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Clean the public folder and cache
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "prismic_blog=debug,info"
    } else {
        "prismic_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            prismic_blog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::Generate { force, fixtures } => {
            let blog = prismic_blog::Blog::new(&base_dir, fixtures.as_deref())?;
            tracing::info!("Generating from {}", blog.source_id());
            blog.generate(force).await?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip, fixtures } => {
            let blog = prismic_blog::Blog::new(&base_dir, fixtures.as_deref())?;

            // Generate first
            tracing::info!("Generating static files...");
            blog.generate(false).await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            prismic_blog::server::start(&blog, &ip, port).await?;
        }

        Commands::List { all, fixtures } => {
            let blog = prismic_blog::Blog::new(&base_dir, fixtures.as_deref())?;
            prismic_blog::commands::list::run(&blog, all).await?;
        }

        Commands::Clean => {
            let config = prismic_blog::load_config(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            prismic_blog::commands::clean::run(&base_dir, &config)?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("prismic-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
