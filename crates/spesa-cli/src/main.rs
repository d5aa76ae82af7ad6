//! Spesa CLI
//!
//! Command-line interface for Spesa - shared shopping lists. State is kept
//! in a local file-backed store; lists are addressed by their 6-character
//! code exactly as on the hosted service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use spesa_core::{
    Config, FileBackend, ItemExtractor, ItemStore, ItemUpdate, KeyValueBackend, ListCode,
    ListRegistry, NewItem, OpenAiSpeech, SpeechError, Transcriber,
};

mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "spesa")]
#[command(about = "Spesa - shared shopping lists")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new list and print its code
    Create,
    /// Show a list's items
    Items {
        /// List code
        code: String,
    },
    /// Add an item to a list
    Add {
        /// List code
        code: String,
        /// Item name
        name: String,
        /// Quantity, e.g. "2 kg"
        #[arg(long)]
        quantity: Option<String>,
        /// Category label, e.g. "Latticini"
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Toggle an item's purchased flag
    Toggle {
        /// List code
        code: String,
        /// Item id
        id: Uuid,
    },
    /// Remove an item
    Remove {
        /// List code
        code: String,
        /// Item id
        id: Uuid,
    },
    /// Edit an item's name and/or quantity
    Update {
        /// List code
        code: String,
        /// Item id
        id: Uuid,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New quantity
        #[arg(long)]
        quantity: Option<String>,
    },
    /// Remove items from a list
    Clear {
        /// List code
        code: String,
        /// Only remove checked items
        #[arg(long)]
        checked: bool,
    },
    /// Show a list's most frequently added items
    History {
        /// List code
        code: String,
    },
    /// Extract items from free text and add them
    Extract {
        /// List code
        code: String,
        /// Text to extract grocery items from
        text: String,
    },
    /// Transcribe an audio file and add the mentioned items
    Voice {
        /// List code
        code: String,
        /// Audio file (webm, mp4/m4a or wav)
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let config = Config::load().context("Failed to load configuration")?;
    let backend: Arc<dyn KeyValueBackend> = Arc::new(FileBackend::new(config.store_path()));
    let registry = ListRegistry::new(Arc::clone(&backend));
    let store = ItemStore::new(backend);

    match cli.command {
        Commands::Create => {
            let code = registry.create_list()?;
            output.print_code(&code);
        }
        Commands::Items { code } => {
            let code = parse_code(&code)?;
            ensure_exists(&registry, &code)?;
            output.print_items(&store.get_items(&code)?);
        }
        Commands::Add {
            code,
            name,
            quantity,
            category,
        } => {
            let code = parse_code(&code)?;
            ensure_exists(&registry, &code)?;

            let mut item = NewItem::named(capitalize(&name));
            if let Some(quantity) = quantity {
                item = item.with_quantity(quantity);
            }
            if let Some(label) = category {
                match spesa_core::Category::from_label(&label) {
                    Some(category) => item = item.with_category(category),
                    None => bail!("Unknown category '{label}'"),
                }
            }

            let created = store.add_items(&code, &[item])?;
            output.print_created(&created);
        }
        Commands::Toggle { code, id } => {
            let code = parse_code(&code)?;
            ensure_exists(&registry, &code)?;
            output.print_items(&store.toggle_item(&code, id)?);
        }
        Commands::Remove { code, id } => {
            let code = parse_code(&code)?;
            ensure_exists(&registry, &code)?;
            output.print_items(&store.remove_item(&code, id)?);
        }
        Commands::Update {
            code,
            id,
            name,
            quantity,
        } => {
            let code = parse_code(&code)?;
            ensure_exists(&registry, &code)?;
            let update = ItemUpdate { name, quantity };
            output.print_items(&store.update_item(&code, id, &update)?);
        }
        Commands::Clear { code, checked } => {
            let code = parse_code(&code)?;
            ensure_exists(&registry, &code)?;
            if checked {
                output.print_items(&store.clear_checked_items(&code)?);
            } else {
                store.clear_items(&code)?;
                output.print_items(&[]);
            }
        }
        Commands::History { code } => {
            let code = parse_code(&code)?;
            ensure_exists(&registry, &code)?;
            output.print_history(&store.history().get_history(&code)?);
        }
        Commands::Extract { code, text } => {
            let code = parse_code(&code)?;
            ensure_exists(&registry, &code)?;
            let speech = speech_client(&config)?;
            add_extracted(&store, &code, &speech, &text, &output)?;
        }
        Commands::Voice { code, file } => {
            let code = parse_code(&code)?;
            ensure_exists(&registry, &code)?;
            let speech = speech_client(&config)?;

            let audio = std::fs::read(&file)
                .with_context(|| format!("Failed to read audio file {:?}", file))?;
            let transcript = match speech.transcribe(&audio, mime_for_file(&file)) {
                Ok(text) => text,
                Err(SpeechError::EmptyTranscript) => {
                    bail!("Could not make out any speech in the recording; please try again")
                }
                Err(err) => return Err(err.into()),
            };
            output.print_message(&format!("Heard: {}", transcript));

            add_extracted(&store, &code, &speech, &transcript, &output)?;
        }
    }

    Ok(())
}

/// Parse a user-supplied list code
fn parse_code(input: &str) -> Result<ListCode> {
    ListCode::parse(input).with_context(|| format!("Invalid list code '{}'", input))
}

/// Fail with "not found" for codes no list was ever created under
///
/// Distinct from an empty list, which exists and simply has no items.
fn ensure_exists(registry: &ListRegistry, code: &ListCode) -> Result<()> {
    if !registry.list_exists(code)? {
        bail!("List {} not found", code);
    }
    Ok(())
}

/// Build the OpenAI client from configuration
fn speech_client(config: &Config) -> Result<OpenAiSpeech> {
    let key = config
        .openai_api_key
        .as_deref()
        .ok_or(SpeechError::MissingApiKey)?;
    Ok(OpenAiSpeech::new(key)?)
}

/// Extract items from text and add them to the list
fn add_extracted(
    store: &ItemStore,
    code: &ListCode,
    extractor: &impl ItemExtractor,
    text: &str,
    output: &Output,
) -> Result<()> {
    let items = extractor.extract_items(text)?;
    if items.is_empty() {
        // Not an error: the text just mentioned no groceries
        output.print_message("No grocery items recognized.");
        return Ok(());
    }
    let created = store.add_items(code, &items)?;
    output.print_created(&created);
    Ok(())
}

/// Guess the upload MIME type from the file extension
fn mime_for_file(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("webm") => "audio/webm",
        Some("mp4") | Some("m4a") => "audio/mp4",
        _ => "audio/wav",
    }
}

/// Uppercase the first letter, matching how the extraction service
/// normalizes names
fn capitalize(name: &str) -> String {
    let name = name.trim();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
