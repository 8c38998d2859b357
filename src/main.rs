use std::io::{self, Read};
use std::sync::Arc;

use canvas::clock::now_ms;
use canvas::document::{Document, SavePayload};
use canvas::error::BoardError;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

use whiteboard::config::{ClientConfig, ConfigError};
use whiteboard::script;
use whiteboard::services::remote::RemoteStore;
use whiteboard::services::session::Session;
use whiteboard::services::store::{PersistenceAdapter, StoreError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("board: {0}")]
    Board(#[from] BoardError),
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "whiteboard", about = "Whiteboard document CLI")]
struct Cli {
    /// Backend base URL; overrides `WHITEBOARD_API_URL`.
    #[arg(long, env = "WHITEBOARD_API_URL")]
    api_url: Option<String>,

    /// Bearer credential; overrides `WHITEBOARD_TOKEN`.
    #[arg(long, env = "WHITEBOARD_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List whiteboards, newest first.
    List,
    /// Create an empty whiteboard.
    Create { name: String },
    /// Print one whiteboard with its decoded elements.
    Show { id: String },
    Rename { id: String, name: String },
    Delete { id: String },
    /// Apply a JSONL edit script to a whiteboard and save the result.
    Replay {
        id: String,
        /// Script file, or `-` for stdin.
        #[arg(long, default_value = "-")]
        input: String,
        /// Apply the edits without saving.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_owned();
    }
    if cli.token.is_some() {
        config.token = cli.token;
    }

    let store: Arc<dyn PersistenceAdapter> = Arc::new(RemoteStore::new(&config)?);
    info!(api_url = %config.api_url, persist = config.persist, "whiteboard cli");

    match cli.command {
        Command::List => {
            let documents = store.list().await?;
            let rows: Vec<Value> = documents.iter().map(summary).collect();
            print_json(&Value::Array(rows))
        }
        Command::Create { name } => {
            let document = store.create(&SavePayload::empty(&name)).await?;
            print_json(&summary(&document))
        }
        Command::Show { id } => {
            let document = store.load(&id).await?;
            let elements = document.elements()?;
            let mut value = summary(&document);
            value["elements"] = serde_json::to_value(elements)?;
            print_json(&value)
        }
        Command::Rename { id, name } => {
            let document = store.rename(&id, &name).await?;
            print_json(&summary(&document))
        }
        Command::Delete { id } => {
            store.delete(&id).await?;
            print_json(&json!({ "success": true, "id": id }))
        }
        Command::Replay { id, input, dry_run } => run_replay(store, &config, &id, &input, dry_run).await,
    }
}

async fn run_replay(
    store: Arc<dyn PersistenceAdapter>,
    config: &ClientConfig,
    id: &str,
    input: &str,
    dry_run: bool,
) -> Result<(), CliError> {
    let source = read_input(input)?;
    let ops = script::parse_script(&source)?;

    let mut session = Session::open(store, config, id).await?;
    if dry_run {
        session.set_persist(false);
    }

    let mut autosaves = 0_usize;
    for op in &ops {
        let actions = script::apply(session.engine_mut(), op)?;
        session.handle_actions(&actions).await;
        if session.tick(now_ms()).await {
            autosaves += 1;
        }
    }
    let flushed = session.flush().await?;

    let engine = session.engine();
    print_json(&json!({
        "id": session.document_id(),
        "name": session.name(),
        "ops": ops.len(),
        "elements": engine.doc.len(),
        "canUndo": engine.history.can_undo(),
        "autosaves": autosaves,
        "saved": flushed || autosaves > 0,
        "dirty": session.is_dirty(),
    }))
}

fn read_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(input)?)
}

fn summary(document: &Document) -> Value {
    json!({
        "id": document.id,
        "name": document.name,
        "createdAt": document.created_at,
        "updatedAt": document.updated_at,
    })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
