//! Client for the local Anki flashcard bridge (AnkiConnect).
//!
//! Requests are `{action, version: 6, params}` posted to a local port; the
//! reply is `{result, error}`. Calls fail after a fixed timeout instead of
//! hanging, and nothing is retried: an unreachable bridge is reported so the
//! user can retry by hand.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::AnkiConfig;
use crate::paper::Paper;

pub const ANKI_CONNECT_VERSION: u32 = 6;
pub const DEFAULT_ANKI_URL: &str = "http://127.0.0.1:8765";
pub const DEFAULT_ANKI_TIMEOUT: Duration = Duration::from_secs(5);

/// Tag added to every note created from a paper.
pub const PAPERMEMORY_TAG: &str = "papermemory";

#[derive(Error, Debug)]
pub enum AnkiError {
    #[error("Anki is not reachable at {url}. Is Anki running with AnkiConnect installed? ({message})")]
    Unavailable { url: String, message: String },
    #[error("Anki did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Anki returned an error: {0}")]
    Api(String),
    #[error("Unexpected Anki response: {0}")]
    Decode(String),
}

/// Request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct AnkiRequest<'a> {
    pub action: &'a str,
    pub version: u32,
    pub params: Value,
}

/// Response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct AnkiResponse<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> AnkiResponse<T> {
    fn into_result(self) -> Result<T, AnkiError> {
        if let Some(error) = self.error {
            return Err(AnkiError::Api(error));
        }
        self.result
            .ok_or_else(|| AnkiError::Decode("response has neither result nor error".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoteFields {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteOptions {
    pub allow_duplicate: bool,
}

/// A note as AnkiConnect's `addNote` expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnkiNote {
    pub deck_name: String,
    pub model_name: String,
    pub fields: NoteFields,
    pub tags: Vec<String>,
    pub options: NoteOptions,
}

impl AnkiNote {
    /// Build the note for a paper: the title on the front, the reference on the back.
    pub fn for_paper(paper: &Paper, deck_name: &str, model_name: &str) -> Self {
        let mut back = Vec::new();
        if !paper.author.is_empty() {
            back.push(paper.author.clone());
        }
        let venue_year = match (paper.venue.is_empty(), paper.year) {
            (false, Some(year)) => format!("{} {}", paper.venue, year),
            (false, None) => paper.venue.clone(),
            (true, Some(year)) => year.to_string(),
            (true, None) => String::new(),
        };
        if !venue_year.is_empty() {
            back.push(venue_year);
        }
        let link = crate::export::paper_url(paper);
        if !link.is_empty() {
            back.push(format!("<a href=\"{}\">{}</a>", link, link));
        }
        if !paper.note.trim().is_empty() {
            back.push(paper.note.trim().to_string());
        }

        let mut tags: Vec<String> = paper.tags.iter().map(|t| t.replace(' ', "_")).collect();
        tags.push(PAPERMEMORY_TAG.to_string());

        Self {
            deck_name: deck_name.to_string(),
            model_name: model_name.to_string(),
            fields: NoteFields {
                front: paper.title.clone(),
                back: back.join("<br>"),
            },
            tags,
            options: NoteOptions {
                allow_duplicate: false,
            },
        }
    }
}

pub struct AnkiClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl AnkiClient {
    pub fn new(config: &AnkiConfig) -> Result<Self, AnkiError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| AnkiError::Unavailable {
                url: config.url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: config.url.clone(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one action and decode its result.
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Value,
    ) -> Result<T, AnkiError> {
        let request = AnkiRequest {
            action,
            version: ANKI_CONNECT_VERSION,
            params,
        };
        tracing::debug!(action, url = %self.url, "anki request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let envelope: AnkiResponse<T> = response
            .json()
            .await
            .map_err(|e| AnkiError::Decode(e.to_string()))?;
        envelope.into_result()
    }

    fn transport_error(&self, e: reqwest::Error) -> AnkiError {
        if e.is_timeout() {
            AnkiError::Timeout(self.timeout)
        } else {
            AnkiError::Unavailable {
                url: self.url.clone(),
                message: e.to_string(),
            }
        }
    }

    /// AnkiConnect API version.
    pub async fn version(&self) -> Result<u32, AnkiError> {
        self.invoke("version", json!({})).await
    }

    pub async fn deck_names(&self) -> Result<Vec<String>, AnkiError> {
        self.invoke("deckNames", json!({})).await
    }

    /// Create a deck; returns its id. Creating an existing deck is harmless.
    pub async fn create_deck(&self, deck: &str) -> Result<u64, AnkiError> {
        self.invoke("createDeck", json!({ "deck": deck })).await
    }

    pub async fn find_notes(&self, query: &str) -> Result<Vec<u64>, AnkiError> {
        self.invoke("findNotes", json!({ "query": query })).await
    }

    pub async fn find_cards(&self, query: &str) -> Result<Vec<u64>, AnkiError> {
        self.invoke("findCards", json!({ "query": query })).await
    }

    /// Add a note; returns the new note id.
    pub async fn add_note(&self, note: &AnkiNote) -> Result<u64, AnkiError> {
        self.invoke("addNote", json!({ "note": note })).await
    }

    /// Export a paper as a note, creating the deck first when missing.
    pub async fn export_paper(
        &self,
        paper: &Paper,
        deck_name: &str,
        model_name: &str,
    ) -> Result<u64, AnkiError> {
        let decks = self.deck_names().await?;
        if !decks.iter().any(|d| d == deck_name) {
            tracing::info!(deck = deck_name, "creating anki deck");
            self.create_deck(deck_name).await?;
        }
        let note = AnkiNote::for_paper(paper, deck_name, model_name);
        let id = self.add_note(&note).await?;
        tracing::info!(paper_id = %paper.id, note_id = id, "exported paper to anki");
        Ok(id)
    }
}
