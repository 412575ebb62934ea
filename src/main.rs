//! CLI entry point for bilingual-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bilingual_blog::commands::convert::Selection;
use bilingual_blog::i18n::Language;
use bilingual_blog::Blog;

#[derive(Parser)]
#[command(name = "bilingual-blog")]
#[command(author = "Tammy Yang")]
#[command(version = "0.1.0")]
#[command(about = "Read and convert a bilingual (English / Chinese) blog", long_about = None)]
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
    /// Show a single post, falling back to English when untranslated
    Show {
        /// Post identifier, e.g. 250415
        slug: String,

        /// Language to show (en, zh-tw); remembered for later runs
        #[arg(short, long)]
        lang: Option<Language>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Read the deployed site instead of the local checkout
        #[arg(long)]
        remote: bool,
    },

    /// List posts, newest first
    #[command(alias = "ls")]
    List {
        /// Language to list (en, zh-tw); remembered for later runs
        #[arg(short, long)]
        lang: Option<Language>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Read the deployed site instead of the local checkout
        #[arg(long)]
        remote: bool,
    },

    /// Print or set the language preference
    Lang {
        /// New language (en, zh-tw)
        code: Option<String>,
    },

    /// Convert markdown posts to standalone HTML pages
    Convert {
        /// Convert every post
        #[arg(long, conflicts_with = "post")]
        all: bool,

        /// Convert one post by slug
        #[arg(long, required_unless_present = "all")]
        post: Option<String>,

        /// Only convert this language
        #[arg(long)]
        language: Option<Language>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "bilingual_blog=debug,info"
    } else {
        "bilingual_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Show {
            slug,
            lang,
            json,
            remote,
        } => {
            let blog = Blog::new(&base_dir)?;
            bilingual_blog::commands::show::run(&blog, &slug, lang, json, remote).await?;
        }

        Commands::List { lang, json, remote } => {
            let blog = Blog::new(&base_dir)?;
            bilingual_blog::commands::list::run(&blog, lang, json, remote).await?;
        }

        Commands::Lang { code } => {
            let blog = Blog::new(&base_dir)?;
            bilingual_blog::commands::lang::run(&blog, code.as_deref())?;
        }

        Commands::Convert {
            all,
            post,
            language,
        } => {
            let blog = Blog::new(&base_dir)?;
            let selection = match post {
                Some(slug) if !all => Selection::Post(slug, language),
                _ => Selection::All(language),
            };
            tracing::info!("Converting posts...");
            bilingual_blog::commands::convert::run(&blog, &selection)?;
            println!("Conversion completed!");
        }

        Commands::Version => {
            println!("bilingual-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
