//! Almanac Core Library
//!
//! A small conversational agent that answers two kinds of questions:
//! live weather lookups for a named city, and question-answering
//! grounded in user-supplied PDF documents.
//!
//! # Pipeline
//! Router -> (weather fetch | document fetch | nothing) -> generation,
//! with every upstream failure degraded to a readable response.

pub mod agent;
pub mod config;
pub mod error;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod router;
pub mod weather;

pub use agent::{Agent, QueryOutcome, COLLECTION_NAME};
pub use config::{AgentConfig, LlmConfig, RetrievalConfig, WeatherConfig};
pub use error::{AlmanacError, Result};
pub use index::{cosine_similarity, DocumentIndex, IndexedChunk, ScoredChunk};
pub use ingest::{extract_pdf_text, ingest_pdf, DocumentStats};
pub use llm::{ChatMessage, ChatModel, Embedder, HttpEmbedder, OpenRouterClient};
pub use router::{route, QueryKind, WEATHER_KEYWORDS};
pub use weather::{OpenWeatherClient, WeatherProvider, WeatherReport};
