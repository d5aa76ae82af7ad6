//! Speech and item-extraction collaborator
//!
//! Voice input goes through two external capabilities: transcribe audio
//! bytes into text, then extract structured grocery items from the text.
//! Both sit behind traits so the core and its tests never touch the
//! network; [`OpenAiSpeech`] is the production implementation (Whisper for
//! transcription, a chat completion for extraction).

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::categories::Category;
use crate::models::NewItem;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const TRANSCRIPTION_MODEL: &str = "whisper-1";
const EXTRACTION_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from the speech/extraction service
#[derive(Error, Debug)]
pub enum SpeechError {
    /// No API key configured
    #[error("No OpenAI API key configured. Set `openai_api_key` in the config file or SPESA_OPENAI_API_KEY.")]
    MissingApiKey,

    /// HTTP request failed
    #[error("Speech service request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The audio produced no usable text
    ///
    /// Callers must surface this to the user instead of proceeding with an
    /// empty transcript.
    #[error("Transcription produced no text; the audio may be unintelligible")]
    EmptyTranscript,
}

/// Turns audio bytes into transcript text
pub trait Transcriber {
    /// Transcribe the audio, failing on unintelligible input
    fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, SpeechError>;
}

/// Turns free text into structured grocery items
pub trait ItemExtractor {
    /// Extract items; an empty result is legitimate (no groceries mentioned)
    fn extract_items(&self, text: &str) -> Result<Vec<NewItem>, SpeechError>;
}

/// OpenAI-backed transcription and extraction
pub struct OpenAiSpeech {
    client: Client,
    api_key: String,
}

impl OpenAiSpeech {
    /// Create a client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, SpeechError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(SpeechError::MissingApiKey);
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, api_key })
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl Transcriber for OpenAiSpeech {
    fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, SpeechError> {
        let part = Part::bytes(audio.to_vec())
            .file_name(format!("audio.{}", extension_for_mime(mime_type)))
            .mime_str(mime_type)?;
        let form = Form::new()
            .part("file", part)
            .text("model", TRANSCRIPTION_MODEL)
            .text("language", "it");

        let response: TranscriptionResponse = self
            .client
            .post(format!("{OPENAI_API_BASE}/audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()?
            .error_for_status()?
            .json()?;

        let text = response.text.trim().to_string();
        if text.is_empty() {
            return Err(SpeechError::EmptyTranscript);
        }
        debug!(chars = text.len(), "transcribed audio");
        Ok(text)
    }
}

impl ItemExtractor for OpenAiSpeech {
    fn extract_items(&self, text: &str) -> Result<Vec<NewItem>, SpeechError> {
        let body = json!({
            "model": EXTRACTION_MODEL,
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": extraction_prompt() },
                { "role": "user", "content": text },
            ],
        });

        let response: ChatResponse = self
            .client
            .post(format!("{OPENAI_API_BASE}/chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;

        let content = match response.choices.first().and_then(|c| c.message.content.as_deref()) {
            Some(content) => content.to_string(),
            None => return Ok(Vec::new()),
        };

        let items = parse_extraction(&content);
        debug!(count = items.len(), "extracted grocery items");
        Ok(items)
    }
}

/// File extension for the upload, derived from the MIME type
fn extension_for_mime(mime_type: &str) -> &'static str {
    if mime_type.contains("webm") {
        "webm"
    } else if mime_type.contains("mp4") {
        "mp4"
    } else {
        "wav"
    }
}

/// The system prompt steering extraction
///
/// Instructs the model to normalize names (first letter uppercase), omit
/// unspecified quantities, pre-merge duplicates, ignore filler words, and
/// stay inside the fixed category vocabulary.
fn extraction_prompt() -> String {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    format!(
        "Sei un assistente per la lista della spesa. Dall'input dell'utente, estrai i prodotti da comprare.\n\
         Rispondi SOLO con un JSON valido nel formato:\n\
         {{\"items\": [{{\"name\": \"nome prodotto\", \"quantity\": \"quantità se specificata\", \"category\": \"categoria\"}}]}}\n\
         - Normalizza i nomi (prima lettera maiuscola)\n\
         - Se la quantità non è specificata, ometti il campo quantity\n\
         - Raggruppa duplicati sommando le quantità\n\
         - Ignora parole non relative a prodotti (saluti, riempitivi, ecc.)\n\
         - Assegna a ogni prodotto una delle seguenti categorie: {}\n\
         - Se non sai la categoria, usa \"Altro\"",
        categories.join(", ")
    )
}

#[derive(Deserialize)]
struct ExtractionPayload {
    #[serde(default)]
    items: Vec<ExtractedItem>,
}

#[derive(Deserialize)]
struct ExtractedItem {
    name: String,
    #[serde(default)]
    quantity: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// Decode the model's JSON payload into items
///
/// Malformed output degrades to an empty list; a category outside the
/// vocabulary falls back to Altro rather than failing the whole batch.
fn parse_extraction(content: &str) -> Vec<NewItem> {
    let payload: ExtractionPayload = match serde_json::from_str(content) {
        Ok(payload) => payload,
        Err(_) => return Vec::new(),
    };

    payload
        .items
        .into_iter()
        .filter(|item| !item.name.trim().is_empty())
        .map(|item| NewItem {
            name: item.name,
            quantity: item.quantity,
            category: item
                .category
                .map(|label| Category::from_label(&label).unwrap_or_default()),
        })
        .collect()
}
