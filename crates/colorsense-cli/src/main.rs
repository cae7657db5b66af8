use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use serde_json::{Map, Value};

use colorsense_contracts::events::{now_utc_iso, EventWriter};
use colorsense_contracts::records::{build_record, CatalogColor};
use colorsense_contracts::summary::{write_summary, IngestSummary};
use colorsense_contracts::terms::{default_search_terms, load_search_terms};
use colorsense_engine::chat::ChatService;
use colorsense_engine::config::Settings;
use colorsense_engine::ingest::{new_run_id, Ingestor};
use colorsense_engine::providers::{ColorSearchClient, GeminiTextProvider, TextGenerator};
use colorsense_engine::query::QueryService;
use colorsense_engine::store::SqliteColorStore;

mod server;

use server::AppState;

#[derive(Debug, Parser)]
#[command(name = "colorsense", version, about = "ColorSense paint color catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch catalog colors and store derived records.
    Ingest(IngestArgs),
    /// Serve the color and chat API.
    Serve(ServeArgs),
    /// Print the record derived from one hex value.
    Inspect(InspectArgs),
}

#[derive(Debug, Parser)]
struct IngestArgs {
    #[arg(long)]
    db: Option<PathBuf>,
    /// One search term per line.
    #[arg(long)]
    terms: Option<PathBuf>,
    #[arg(long)]
    delay_ms: Option<u64>,
    #[arg(long)]
    events: Option<PathBuf>,
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct ServeArgs {
    #[arg(long)]
    db: Option<PathBuf>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Replaces the built-in consultant persona.
    #[arg(long)]
    persona: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct InspectArgs {
    hex: String,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    code: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("colorsense error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Ingest(args) => run_ingest(args),
        Command::Serve(args) => run_serve(args),
        Command::Inspect(args) => run_inspect(args),
    }
}

fn run_ingest(args: IngestArgs) -> Result<i32> {
    let settings = Settings::load()?;
    let db_path = args.db.unwrap_or_else(|| settings.db_path.clone());
    let terms = match args.terms.as_deref() {
        Some(path) => load_search_terms(path)?,
        None => default_search_terms(),
    };
    let delay = args
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or(settings.ingest_delay);
    if settings.color_search.subscription_key.is_none() {
        warn!("COLOR_SEARCH_KEY not set; catalog requests are sent without a subscription key");
    }

    let run_id = new_run_id();
    let events = match args.events {
        Some(path) => EventWriter::new(path, run_id.clone()),
        None => EventWriter::disabled(run_id.clone()),
    };
    let store = SqliteColorStore::open(&db_path)?;
    let search = ColorSearchClient::new(&settings.color_search);

    let started_at = now_utc_iso();
    info!("Starting ingestion run {run_id} with {} terms", terms.len());
    let report = Ingestor::new(&search, &store, events)
        .with_delay(delay)
        .run(&terms);

    let summary_result = match args.summary.as_deref() {
        Some(path) => {
            let summary = IngestSummary {
                run_id,
                started_at,
                finished_at: now_utc_iso(),
                report,
            };
            let mut extra = Map::new();
            extra.insert(
                "db".to_string(),
                Value::String(db_path.display().to_string()),
            );
            write_summary(path, &summary, Some(&extra))
                .with_context(|| format!("failed to write summary {}", path.display()))
        }
        None => Ok(()),
    };
    store.close()?;
    summary_result?;
    Ok(0)
}

fn run_serve(args: ServeArgs) -> Result<i32> {
    let settings = Settings::load()?;
    let db_path = args.db.unwrap_or_else(|| settings.db_path.clone());
    let persona = args
        .persona
        .as_deref()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read persona {}", path.display()))
        })
        .transpose()?;

    let generator: Option<Arc<dyn TextGenerator>> =
        match GeminiTextProvider::from_settings(&settings.gemini) {
            Some(provider) => {
                info!("Chat model: {}", settings.gemini.model);
                Some(Arc::new(provider))
            }
            None => {
                error!("GEMINI_API_KEY or GOOGLE_API_KEY not set; chat requests will fail");
                None
            }
        };
    let mut chat = ChatService::new(generator);
    if let Some(persona) = persona {
        chat = chat.with_persona(persona);
    }

    let store = Arc::new(SqliteColorStore::open(&db_path)?);
    let state = Arc::new(AppState::new(QueryService::new(store.clone()), chat));
    let host = args.host.unwrap_or(settings.host);
    let port = args.port.unwrap_or(settings.port);

    // Blocking HTTP clients must be created and dropped outside the runtime.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let served = runtime.block_on(server::serve(state.clone(), &host, port));
    drop(runtime);
    drop(state);

    match Arc::try_unwrap(store) {
        Ok(store) => store.close()?,
        Err(_) => warn!("Database still referenced at shutdown; leaving it to drop"),
    }
    served?;
    Ok(0)
}

fn run_inspect(args: InspectArgs) -> Result<i32> {
    let record = build_record(&CatalogColor {
        name: args.name,
        code: args.code,
        hex: args.hex,
    })?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(0)
}
