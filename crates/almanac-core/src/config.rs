//! Configuration management

use crate::error::{AlmanacError, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure for the agent
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentConfig {
    /// LLM gateway and embeddings service configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Chunking and retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Optional tracing key. Accepted for parity with hosted tracing
    /// services but only logged; no exporter is wired up.
    #[serde(default)]
    pub tracing_api_key: Option<String>,
}

impl AgentConfig {
    /// Build configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            llm: LlmConfig::default(),
            weather: WeatherConfig::default(),
            retrieval: RetrievalConfig::default(),
            tracing_api_key: std::env::var("ALMANAC_TRACING_API_KEY").ok(),
        }
    }

    /// Check the hard preconditions for agent construction.
    ///
    /// The LLM and weather API keys are both required; everything else
    /// has a usable default.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(AlmanacError::Config(
                "missing LLM API key (set ALMANAC_LLM_API_KEY or OPENAI_API_KEY)".to_string(),
            ));
        }
        if self.weather.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(AlmanacError::Config(
                "missing weather API key (set OPENWEATHER_API_KEY)".to_string(),
            ));
        }
        Ok(())
    }
}

/// LLM gateway configuration (OpenAI-compatible chat and embeddings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the chat completions gateway
    pub url: String,

    /// Model name for chat completions
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Sampling temperature for chat completions
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// API key for the chat gateway
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for the embeddings service (falls back to `url`)
    #[serde(default)]
    pub embedding_url: Option<String>,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// API key for the embeddings service (falls back to `api_key`)
    #[serde(default)]
    pub embedding_api_key: Option<String>,

    /// Embedding dimensions reported by `Embedder::dimensions`
    #[serde(default)]
    pub embedding_dimensions: Option<usize>,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// `HTTP-Referer` header sent to OpenRouter-style gateways
    #[serde(default = "default_referer")]
    pub referer: String,

    /// `X-Title` header sent to OpenRouter-style gateways
    #[serde(default = "default_title")]
    pub title: String,
}

impl LlmConfig {
    /// Get the embeddings URL (falls back to the chat URL)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.url)
    }

    /// Get the embeddings API key (falls back to the chat key)
    pub fn embeddings_api_key(&self) -> Option<&str> {
        self.embedding_api_key
            .as_deref()
            .or(self.api_key.as_deref())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("ALMANAC_LLM_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
            model: default_chat_model(),
            temperature: default_temperature(),
            api_key: std::env::var("ALMANAC_LLM_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok(),
            embedding_url: std::env::var("ALMANAC_EMBEDDING_URL").ok(),
            embedding_model: default_embedding_model(),
            embedding_api_key: std::env::var("ALMANAC_EMBEDDING_API_KEY").ok(),
            embedding_dimensions: std::env::var("ALMANAC_EMBEDDING_DIMS")
                .ok()
                .and_then(|s| s.parse().ok()),
            timeout_secs: default_llm_timeout(),
            referer: default_referer(),
            title: default_title(),
        }
    }
}

fn default_chat_model() -> String {
    std::env::var("ALMANAC_LLM_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string())
}

fn default_temperature() -> f32 {
    0.3
}

fn default_embedding_model() -> String {
    std::env::var("ALMANAC_EMBEDDING_MODEL")
        .unwrap_or_else(|_| "sentence-transformers/all-MiniLM-L6-v2".to_string())
}

fn default_llm_timeout() -> u64 {
    30
}

fn default_referer() -> String {
    "http://localhost".to_string()
}

fn default_title() -> String {
    "almanac-agent".to_string()
}

/// Weather provider configuration (OpenWeatherMap)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Current-conditions endpoint
    pub url: String,

    /// API key for the weather provider
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,

    /// City used when extraction finds none in the query
    #[serde(default = "default_city")]
    pub default_city: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("ALMANAC_WEATHER_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5/weather".to_string()),
            api_key: std::env::var("OPENWEATHER_API_KEY").ok(),
            timeout_secs: default_weather_timeout(),
            default_city: default_city(),
        }
    }
}

fn default_weather_timeout() -> u64 {
    10
}

fn default_city() -> String {
    "London".to_string()
}

/// Chunking and retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Chunk overlap in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Number of chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Reject document answers when query and context share too few tokens
    #[serde(default = "default_strict_grounding")]
    pub strict_grounding: bool,

    /// Minimum overlapping tokens required by the relevance guard
    #[serde(default = "default_min_token_overlap")]
    pub min_token_overlap: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            strict_grounding: default_strict_grounding(),
            min_token_overlap: default_min_token_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    3
}

fn default_strict_grounding() -> bool {
    true
}

fn default_min_token_overlap() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_llm_key() {
        let config = AgentConfig {
            llm: LlmConfig {
                api_key: None,
                ..LlmConfig::default()
            },
            weather: WeatherConfig {
                api_key: Some("wkey".to_string()),
                ..WeatherConfig::default()
            },
            ..AgentConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AlmanacError::Config(msg)) if msg.contains("LLM")
        ));
    }

    #[test]
    fn test_validate_requires_weather_key() {
        let config = AgentConfig {
            llm: LlmConfig {
                api_key: Some("lkey".to_string()),
                ..LlmConfig::default()
            },
            weather: WeatherConfig {
                api_key: None,
                ..WeatherConfig::default()
            },
            ..AgentConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AlmanacError::Config(msg)) if msg.contains("weather")
        ));
    }

    #[test]
    fn test_validate_rejects_empty_keys() {
        let config = AgentConfig {
            llm: LlmConfig {
                api_key: Some(String::new()),
                ..LlmConfig::default()
            },
            weather: WeatherConfig {
                api_key: Some("wkey".to_string()),
                ..WeatherConfig::default()
            },
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_embeddings_url_fallback() {
        let mut llm = LlmConfig::default();
        llm.url = "https://chat.example".to_string();
        llm.embedding_url = None;
        assert_eq!(llm.embeddings_url(), "https://chat.example");

        llm.embedding_url = Some("https://embed.example".to_string());
        assert_eq!(llm.embeddings_url(), "https://embed.example");
    }

    #[test]
    fn test_retrieval_defaults() {
        let retrieval = RetrievalConfig::default();
        assert_eq!(retrieval.chunk_size, 1000);
        assert_eq!(retrieval.chunk_overlap, 200);
        assert_eq!(retrieval.top_k, 3);
        assert!(retrieval.strict_grounding);
        assert_eq!(retrieval.min_token_overlap, 2);
    }
}
