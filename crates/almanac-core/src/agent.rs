//! Pipeline controller
//!
//! Sequences router -> (weather fetch | document fetch | nothing) ->
//! response generation, threading a per-query [`QueryOutcome`] record
//! through the steps. Strictly linear; no step runs twice.

use crate::config::AgentConfig;
use crate::error::Result;
use crate::index::DocumentIndex;
use crate::ingest::{self, DocumentStats};
use crate::llm::{ChatModel, Embedder, HttpEmbedder, OpenRouterClient};
use crate::router::{route, QueryKind};
use crate::weather::{OpenWeatherClient, WeatherProvider, WeatherReport};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Collection name for ingested PDF chunks
pub const COLLECTION_NAME: &str = "pdf_documents";

const UNKNOWN_RESPONSE: &str = "Please ask a weather-related question or a question \
     based on the loaded PDF documents.";

const WEATHER_UNAVAILABLE_RESPONSE: &str =
    "Sorry, I couldn't retrieve weather data for that location right now.";

const OFF_TOPIC_RESPONSE: &str = "Please ask a question strictly related to the \
     loaded PDF documents. I cannot answer general knowledge questions.";

const GENERATION_FAILED_RESPONSE: &str = "An error occurred while generating the response.";

/// Per-query pipeline record, created fresh for every call to
/// [`Agent::query`] and discarded after.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    /// Raw user input
    pub query: String,
    /// Classification, set once by the router
    pub kind: QueryKind,
    /// Structured weather fields; `None` when retrieval failed
    pub weather: Option<WeatherReport>,
    /// Concatenated retrieved chunk texts, possibly empty
    pub context: String,
    /// Final answer; always populated by the end of a run
    pub response: String,
    /// Advisory description of the last failure
    pub error: Option<String>,
}

impl QueryOutcome {
    fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            kind: QueryKind::Unknown,
            weather: None,
            context: String::new(),
            response: String::new(),
            error: None,
        }
    }
}

/// Conversational agent answering weather and PDF-grounded questions
pub struct Agent {
    chat: Arc<dyn ChatModel>,
    embedder: Arc<dyn Embedder>,
    weather: Arc<dyn WeatherProvider>,
    index: DocumentIndex,
    config: AgentConfig,
}

impl Agent {
    /// Create an agent with HTTP-backed services.
    ///
    /// Fails when either required API key is missing.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;

        if config.tracing_api_key.is_some() {
            tracing::info!("tracing key configured; no exporter is wired up");
        }

        let chat = Arc::new(OpenRouterClient::new(config.llm.clone())?);
        let embedder = Arc::new(HttpEmbedder::new(config.llm.clone())?);
        let weather = Arc::new(OpenWeatherClient::new(config.weather.clone())?);

        Ok(Self::with_services(config, chat, embedder, weather))
    }

    /// Create an agent from explicit service implementations.
    ///
    /// Skips credential validation; intended for alternative backends
    /// and tests.
    pub fn with_services(
        config: AgentConfig,
        chat: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self {
            chat,
            embedder,
            weather,
            index: DocumentIndex::new(COLLECTION_NAME),
            config,
        }
    }

    /// Whether any document chunks are currently indexed
    pub fn has_documents(&self) -> bool {
        !self.index.is_empty()
    }

    /// Answer a user query.
    ///
    /// Never fails: every upstream error degrades to a human-readable
    /// response in the returned record.
    pub async fn query(&self, user_query: &str) -> QueryOutcome {
        let mut outcome = QueryOutcome::new(user_query);

        outcome.kind = route(user_query, self.has_documents());
        tracing::info!(kind = %outcome.kind, "query routed");

        match outcome.kind {
            QueryKind::Weather => self.fetch_weather(&mut outcome).await,
            QueryKind::Document => self.fetch_document_context(&mut outcome).await,
            QueryKind::Unknown => {}
        }

        self.generate_response(&mut outcome).await;
        outcome
    }

    /// Ingest a PDF, reporting chunk counts on success.
    ///
    /// A failed ingestion leaves any previously indexed document intact.
    pub async fn ingest_document(&self, path: &Path) -> Result<DocumentStats> {
        ingest::ingest_pdf(
            path,
            self.embedder.as_ref(),
            &self.index,
            &self.config.retrieval,
        )
        .await
    }

    /// Ingest a PDF, returning whether it succeeded
    pub async fn load_document(&self, path: &Path) -> bool {
        match self.ingest_document(path).await {
            Ok(stats) => {
                tracing::info!(chunks = stats.chunks, "document loaded and indexed");
                true
            }
            Err(e) => {
                tracing::error!("document load failed: {}", e);
                false
            }
        }
    }

    async fn fetch_weather(&self, outcome: &mut QueryOutcome) {
        let city = self.extract_city(&outcome.query).await;

        match self.weather.current(&city).await {
            Ok(report) => outcome.weather = Some(report),
            Err(e) => {
                tracing::error!("weather fetch failed: {}", e);
                outcome.error = Some("Weather data could not be retrieved.".to_string());
            }
        }
    }

    /// Prompt-based city extraction with a fixed fallback city
    async fn extract_city(&self, query: &str) -> String {
        let default_city = &self.config.weather.default_city;
        let prompt = format!(
            "Extract the city name from the query. \
             If none is found, return {}.\nQuery: {}\nCity:",
            default_city, query
        );

        match self.chat.generate(&prompt).await {
            Ok(city) => {
                let city = city.trim().to_string();
                if city.is_empty() {
                    default_city.clone()
                } else {
                    city
                }
            }
            Err(e) => {
                tracing::warn!("city extraction failed, using default: {}", e);
                default_city.clone()
            }
        }
    }

    async fn fetch_document_context(&self, outcome: &mut QueryOutcome) {
        if self.index.is_empty() {
            outcome.context = String::new();
            return;
        }

        match self.embedder.embed(&outcome.query).await {
            Ok(query_vector) => {
                let chunks = self.index.search(&query_vector, self.config.retrieval.top_k);
                outcome.context = chunks
                    .iter()
                    .map(|c| c.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n");
            }
            Err(e) => {
                tracing::error!("document retrieval failed: {}", e);
                outcome.context = String::new();
                outcome.error = Some(format!("Document retrieval failed: {}", e));
            }
        }
    }

    async fn generate_response(&self, outcome: &mut QueryOutcome) {
        match outcome.kind {
            QueryKind::Weather => {
                let Some(report) = outcome.weather.clone() else {
                    outcome.response = WEATHER_UNAVAILABLE_RESPONSE.to_string();
                    return;
                };

                let prompt = format!(
                    "Weather details:\n\
                     City: {}\n\
                     Temperature: {}°C\n\
                     Feels Like: {}°C\n\
                     Condition: {}\n\
                     Humidity: {}%\n\
                     Wind Speed: {} m/s\n\n\
                     Answer the query: {}",
                    report.city,
                    report.temperature_c,
                    report.feels_like_c,
                    report.condition,
                    report.humidity_pct,
                    report.wind_mps,
                    outcome.query
                );

                let response = self.generate_or_fallback(&prompt, outcome).await;
                outcome.response = response;
            }
            QueryKind::Document => {
                if self.config.retrieval.strict_grounding
                    && !is_context_relevant(
                        &outcome.query,
                        &outcome.context,
                        self.config.retrieval.min_token_overlap,
                    )
                {
                    outcome.response = OFF_TOPIC_RESPONSE.to_string();
                    return;
                }

                let prompt = format!(
                    "Answer ONLY using the context below. \
                     If the answer is not present, say so explicitly.\n\n\
                     Context:\n{}\n\n\
                     Question: {}\nAnswer:",
                    outcome.context, outcome.query
                );

                let response = self.generate_or_fallback(&prompt, outcome).await;
                outcome.response = response;
            }
            QueryKind::Unknown => {
                outcome.response = UNKNOWN_RESPONSE.to_string();
            }
        }
    }

    async fn generate_or_fallback(&self, prompt: &str, outcome: &mut QueryOutcome) -> String {
        match self.chat.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("generation failed: {}", e);
                outcome.error = Some(e.to_string());
                GENERATION_FAILED_RESPONSE.to_string()
            }
        }
    }
}

/// Heuristic relevance guard: require a minimum number of overlapping
/// whitespace-separated tokens between query and retrieved context.
fn is_context_relevant(query: &str, context: &str, min_overlap: usize) -> bool {
    if context.trim().is_empty() {
        return false;
    }

    let query_terms: HashSet<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let context_terms: HashSet<String> = context
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    query_terms.intersection(&context_terms).count() >= min_overlap
}
