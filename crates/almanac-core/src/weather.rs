//! OpenWeatherMap client for current conditions

use crate::config::WeatherConfig;
use crate::error::{AlmanacError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Current-conditions lookup trait
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch current conditions for a city by name
    async fn current(&self, city: &str) -> Result<WeatherReport>;
}

/// Structured current-conditions report (metric units)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub condition: String,
    pub humidity_pct: f64,
    pub wind_mps: f64,
}

/// HTTP client for the OpenWeatherMap current-conditions endpoint
pub struct OpenWeatherClient {
    http_client: reqwest::Client,
    config: WeatherConfig,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create new client from configuration.
    ///
    /// Fails when no API key is configured.
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AlmanacError::Config("missing weather API key (set OPENWEATHER_API_KEY)".to_string())
            })?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AlmanacError::Http)?;

        Ok(Self {
            http_client,
            config,
            api_key,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherReport> {
        #[derive(Deserialize)]
        struct ApiResponse {
            name: String,
            main: MainFields,
            weather: Vec<ConditionField>,
            wind: WindField,
        }

        #[derive(Deserialize)]
        struct MainFields {
            temp: f64,
            feels_like: f64,
            humidity: f64,
        }

        #[derive(Deserialize)]
        struct ConditionField {
            description: String,
        }

        #[derive(Deserialize)]
        struct WindField {
            speed: f64,
        }

        tracing::debug!(city, "fetching current conditions");

        let response = self
            .http_client
            .get(&self.config.url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(AlmanacError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AlmanacError::Weather(format!(
                "weather provider returned HTTP {} for city {:?}",
                status, city
            )));
        }

        let data: ApiResponse = response.json().await.map_err(AlmanacError::Http)?;

        let condition = data
            .weather
            .first()
            .map(|c| c.description.clone())
            .ok_or_else(|| {
                AlmanacError::Weather(format!("no condition description for city {:?}", city))
            })?;

        Ok(WeatherReport {
            city: data.name,
            temperature_c: data.main.temp,
            feels_like_c: data.main.feels_like,
            condition,
            humidity_pct: data.main.humidity,
            wind_mps: data.wind.speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let config = WeatherConfig {
            api_key: None,
            ..WeatherConfig::default()
        };
        assert!(matches!(
            OpenWeatherClient::new(config),
            Err(AlmanacError::Config(_))
        ));
    }

    #[test]
    fn test_client_rejects_empty_api_key() {
        let config = WeatherConfig {
            api_key: Some(String::new()),
            ..WeatherConfig::default()
        };
        assert!(OpenWeatherClient::new(config).is_err());
    }
}
