//! Kampania CLI entry point.
//!
//! Provides `interpret` for one-shot interpretation, `vocab` for printing
//! vocabularies, and `chat` for a line-oriented session over stdin.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use kampania::config::Config;
use kampania::credentials::load_default_credentials;
use kampania::interpreter::{FallbackInterpreter, InterpretRequest};
use kampania::session::Session;
use kampania::vocabulary::{FieldId, FieldVocabulary};

/// Kampania: natural-language campaign command interpreter.
#[derive(Parser)]
#[command(name = "kampania", version, about)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Interpret one message and print the result.
    Interpret {
        /// Operator message.
        text: String,
        /// Number of existing records, used in bulk-update confirmations.
        #[arg(long, default_value_t = 0)]
        records: usize,
        /// Print the full result as JSON instead of the message.
        #[arg(long)]
        json: bool,
        /// Configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Skip the remote interpreter.
        #[arg(long)]
        local: bool,
    },
    /// Print the vocabularies in use.
    Vocab {
        /// Only print this field (wire key, e.g. `offer`).
        #[arg(long)]
        field: Option<FieldId>,
        /// Configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Interactive session: one message per line on stdin.
    Chat {
        /// Configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Skip the remote interpreter.
        #[arg(long)]
        local: bool,
        /// Also write JSON logs with daily rotation to this directory.
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Interpret {
            text,
            records,
            json,
            config,
            local,
        } => {
            kampania::logging::init_cli();
            handle_interpret(&text, records, json, config.as_deref(), local).await
        }
        Command::Vocab { field, config } => {
            kampania::logging::init_cli();
            handle_vocab(field, config.as_deref())
        }
        Command::Chat {
            config,
            local,
            log_dir,
        } => {
            let _logging_guard = match &log_dir {
                Some(dir) => Some(kampania::logging::init_production(dir)?),
                None => {
                    kampania::logging::init_cli();
                    None
                }
            };
            handle_chat(config.as_deref(), local).await
        }
    }
}

/// Load configuration and credentials and build the interpreter.
fn build_interpreter(
    config_path: Option<&Path>,
    local: bool,
) -> anyhow::Result<FallbackInterpreter> {
    let config = Config::load(config_path).context("failed to load configuration")?;
    let credentials = if local {
        kampania::credentials::Credentials::default()
    } else {
        load_default_credentials(config.remote.api_key_env.as_deref())
            .context("failed to load credentials")?
    };
    FallbackInterpreter::from_config(&config, &credentials, local)
        .context("invalid interpreter configuration")
}

/// Interpret a single message.
async fn handle_interpret(
    text: &str,
    records: usize,
    json: bool,
    config_path: Option<&Path>,
    local: bool,
) -> anyhow::Result<()> {
    let interpreter = build_interpreter(config_path, local)?;
    let result = interpreter
        .interpret(&InterpretRequest::new(text, records))
        .await;

    if json {
        let rendered =
            serde_json::to_string_pretty(&result).context("failed to serialize result")?;
        println!("{rendered}");
    } else {
        println!("{}", result.message());
    }
    Ok(())
}

/// Print vocabularies, optionally a single field.
fn handle_vocab(field: Option<FieldId>, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("failed to load configuration")?;
    let registry = config.registry()?;

    match field {
        Some(field) => print_vocabulary(registry.get(field)),
        None => registry.iter().for_each(print_vocabulary),
    }
    Ok(())
}

fn print_vocabulary(vocabulary: &FieldVocabulary) {
    let field = vocabulary.field();
    println!("{} ({})", field.label(), field.key());
    println!("  values: {}", vocabulary.canonical_values().join(", "));
    if !vocabulary.synonyms().is_empty() {
        let synonyms: Vec<String> = vocabulary
            .synonyms()
            .iter()
            .map(|(phrase, value)| format!("{phrase} → {value}"))
            .collect();
        println!("  synonyms: {}", synonyms.join(", "));
    }
    if !vocabulary.anchors().is_empty() {
        println!("  anchors: {}", vocabulary.anchors().join(", "));
    }
}

/// Run a session over stdin until EOF.
async fn handle_chat(config_path: Option<&Path>, local: bool) -> anyhow::Result<()> {
    let interpreter = build_interpreter(config_path, local)?;
    let mut session = Session::new();
    info!(remote = interpreter.has_remote(), "chat session started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "/list" {
            print_records(&session);
            continue;
        }

        let result = interpreter
            .interpret(&InterpretRequest::new(text, session.len()))
            .await;
        let affected = session.apply(&result);
        info!(kind = result.kind(), affected, total = session.len(), "message applied");
        println!("{}\n", result.message());
    }

    info!(records = session.len(), "chat session ended");
    Ok(())
}

fn print_records(session: &Session) {
    if session.is_empty() {
        println!("Кампаний пока нет.\n");
        return;
    }
    for (number, record) in (1_usize..).zip(session.records()) {
        let draft = &record.draft;
        println!(
            "{number}. {} | РК: {} | Пиксель: {}",
            draft.summary(),
            draft.rk.as_deref().unwrap_or("?"),
            draft.pixel.as_deref().unwrap_or("?")
        );
    }
    println!();
}
