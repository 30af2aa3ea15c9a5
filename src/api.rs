//! OpenWeatherMap client

use std::time::Duration;

use crate::state::WeatherResult;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings, injected once at startup
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub units: String,
    pub timeout: Duration,
}

impl WeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CURRENT_WEATHER_PATH
        )
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: "metric".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Non-2xx response
    #[error("Error: {0}")]
    Status(u16),
    /// Connection, timeout or body read failure
    #[error("{0}")]
    Request(String),
    #[error("invalid response: {0}")]
    Parse(String),
}

#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Current weather for `city`, one GET, no retry
    pub async fn fetch_current(&self, city: &str) -> Result<WeatherResult, FetchError> {
        tracing::debug!(city, "requesting current weather");

        let response = self
            .http
            .get(self.config.endpoint())
            .query(&[
                ("q", city),
                ("appid", self.config.api_key.as_str()),
                ("units", self.config.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(city, error = %e, "weather request failed");
                FetchError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(city, status = status.as_u16(), "weather request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;
        let data: WeatherResult =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        tracing::info!(city, name = %data.name, temp = data.main.temp, "weather loaded");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let config = WeatherConfig::new("key").with_base_url("http://localhost:8080/");
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/data/2.5/weather"
        );
    }

    #[test]
    fn test_default_config() {
        let config = WeatherConfig::default();
        assert_eq!(
            config.endpoint(),
            "https://api.openweathermap.org/data/2.5/weather"
        );
        assert_eq!(config.units, "metric");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_status_error_names_the_code() {
        assert_eq!(FetchError::Status(404).to_string(), "Error: 404");
    }
}
