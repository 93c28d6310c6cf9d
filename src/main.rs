//! CLI entry point for jsonblog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jsonblog::commands::list::ListKind;
use jsonblog::{JsonBlog, DEFAULT_CONFIG, DEFAULT_OUTPUT};

#[derive(Parser)]
#[command(name = "jsonblog")]
#[command(version)]
#[command(about = "Generate a static blog from a single JSON file", long_about = None)]
struct Cli {
    /// Blog configuration file (JSON, or YAML by extension)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter blog.json and first post
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Add a new post to the configuration
    New {
        /// Title of the new post
        title: String,

        /// Tag for the post (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Category for the post (repeatable)
        #[arg(short = 'C', long = "category")]
        categories: Vec<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Build {
        /// Output directory
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server with live reload
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3500")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Remove the output directory
    Clean {
        /// Output directory
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },

    /// List blog content
    List {
        /// Type of content to list (post, page, tag, category)
        #[arg(default_value = "post")]
        r#type: ListKind,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "jsonblog=debug,info"
    } else {
        "jsonblog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Init { folder } => {
            tracing::info!("Initializing blog in {:?}", folder);
            jsonblog::commands::init::init_site(&folder)?;
            println!("Initialized blog in {:?}", folder);
        }

        Commands::New {
            title,
            tags,
            categories,
        } => {
            let app = JsonBlog::new(&cli.config, DEFAULT_OUTPUT);
            tracing::info!("Creating new post with title: {}", title);
            jsonblog::commands::new::create_post(&app, &title, &tags, &categories)?;
        }

        Commands::Build { output, watch } => {
            let app = JsonBlog::new(&cli.config, output);
            tracing::info!("Generating static files...");

            let count = app.build().await?;
            println!("Generated {} files successfully!", count);

            if watch {
                tracing::info!("Watching for file changes...");
                jsonblog::commands::build::watch(&app).await?;
            }
        }

        Commands::Serve { port, ip, open } => {
            let app = JsonBlog::new(&cli.config, DEFAULT_OUTPUT);
            tracing::info!("Starting server at http://{}:{}", ip, port);
            jsonblog::server::start(&app, &ip, port, open).await?;
        }

        Commands::Clean { output } => {
            let app = JsonBlog::new(&cli.config, output);
            tracing::info!("Cleaning output folder...");
            app.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let app = JsonBlog::new(&cli.config, DEFAULT_OUTPUT);
            jsonblog::commands::list::run(&app, r#type).await?;
        }

        Commands::Version => {
            println!("jsonblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
