//! Knowledge base administration
//!
//! Inspect, clear and load the per-language partitions from the command line.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use query_router_config::{load_settings, Settings};
use query_router_core::Language;
use query_router_rag::{KnowledgeBaseRouter, KnowledgeIngestor};
use query_router_server::init_tracing;

#[derive(Parser)]
#[command(name = "kb-admin", version, about = "Manage the Tijarah360 knowledge base")]
struct Cli {
    /// Configuration environment (config/{env}.yaml)
    #[arg(long, env = "QUERY_ROUTER_ENV")]
    env: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show document counts
    Status {
        #[arg(long, value_enum, default_value_t = Scope::Both)]
        language: Scope,
    },
    /// Remove every document from the selected partitions
    Clear {
        #[arg(long, value_enum, default_value_t = Scope::En)]
        language: Scope,
    },
    /// Load a question/answer CSV into one partition
    Ingest {
        /// CSV file with a header row
        csv: PathBuf,
        #[arg(long, value_enum, default_value_t = Single::En)]
        language: Single,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scope {
    En,
    Ar,
    Both,
}

impl Scope {
    fn languages(self) -> &'static [Language] {
        match self {
            Scope::En => &[Language::English],
            Scope::Ar => &[Language::Arabic],
            Scope::Both => Language::all(),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Single {
    En,
    Ar,
}

impl From<Single> for Language {
    fn from(value: Single) -> Self {
        match value {
            Single::En => Language::English,
            Single::Ar => Language::Arabic,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = match load_settings(cli.env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        },
    };
    init_tracing(&settings);

    let router = Arc::new(KnowledgeBaseRouter::from_settings(&settings).await?);
    let ingestor = KnowledgeIngestor::new(router, settings.ingestion.clone());

    match cli.command {
        Command::Status { language } => {
            print_counts(&ingestor, language).await;
            Ok(ExitCode::SUCCESS)
        },
        Command::Clear { language } => clear(&ingestor, language).await,
        Command::Ingest { csv, language } => {
            let language = Language::from(language);
            let stored = ingestor.load_csv(&csv, language).await?;
            println!(
                "Loaded {} documents from {} into {}",
                stored,
                csv.display(),
                ingestor.router().route(language).id()
            );
            print_counts(&ingestor, Scope::Both).await;
            Ok(ExitCode::SUCCESS)
        },
    }
}

async fn print_counts(ingestor: &KnowledgeIngestor, scope: Scope) {
    let mut total = 0;
    for &language in scope.languages() {
        let count = ingestor.count(language).await;
        total += count;
        println!(
            "{:<8} {:<20} {}",
            language.name(),
            ingestor.router().route(language).id(),
            count
        );
    }
    if matches!(scope, Scope::Both) {
        println!("{:<8} {:<20} {}", "Total", "", total);
    }
}

async fn clear(ingestor: &KnowledgeIngestor, scope: Scope) -> anyhow::Result<ExitCode> {
    println!("Before:");
    print_counts(ingestor, scope).await;

    let mut failed = false;
    for &language in scope.languages() {
        match ingestor.clear(language).await {
            Ok(removed) => println!("Cleared {} documents from {}", removed, language.name()),
            Err(e) => {
                eprintln!("Failed to clear {}: {}", language.name(), e);
                failed = true;
            },
        }
    }

    println!("After:");
    print_counts(ingestor, scope).await;

    let mut remaining = 0;
    for &language in scope.languages() {
        remaining += ingestor.count(language).await;
    }
    if remaining == 0 {
        println!("Knowledge base is empty");
    } else {
        println!("{} documents remain", remaining);
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
