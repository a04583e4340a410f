//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use folio::Folio;

#[derive(Parser)]
#[command(name = "folio", version)]
#[command(about = "A static site generator for personal portfolio and blog sites")]
struct Cli {
    /// Site directory (defaults to the current directory)
    #[arg(short = 'C', long = "dir", global = true)]
    dir: Option<PathBuf>,

    /// Verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to the current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes and regenerate
        #[arg(short, long)]
        watch: bool,
    },

    /// Build the site and serve it locally
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value_t = 4000)]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Serve without watching or live reload
        #[arg(long)]
        r#static: bool,
    },

    /// Delete the public directory
    Clean,

    /// List site content
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base_dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Command::Init { folder } => {
            let target = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            folio::commands::init::run(&target)?;
            println!("Initialized new site in {}", target.display());
        }

        Command::New { title } => {
            folio::commands::new::run(&Folio::new(&base_dir)?, &title)?;
        }

        Command::Generate { watch } => {
            let site = Folio::new(&base_dir)?;
            folio::commands::generate::run(&site)?;
            println!("Generated successfully!");

            if watch {
                folio::commands::generate::watch(&site).await?;
            }
        }

        Command::Server {
            port,
            ip,
            r#static,
        } => {
            let site = Folio::new(&base_dir)?;

            // Build first so the served tree is fresh
            site.generate()?;
            folio::server::start(&site, &ip, port, !r#static).await?;
        }

        Command::Clean => {
            Folio::new(&base_dir)?.clean()?;
            println!("Cleaned successfully!");
        }

        Command::List => {
            folio::commands::list::run(&Folio::new(&base_dir)?)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
