use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

/// Open-Meteo style forecast endpoint.
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Deserialize)]
struct Forecast {
    current: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature_2m: f64,
}

/// Current-temperature lookup. Never fails: any problem is logged and
/// reported as "no weather data".
pub struct WeatherClient {
    http: reqwest::Client,
    endpoint: Option<String>,
}

impl WeatherClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: Some(endpoint.into()),
        })
    }

    /// A client that never looks anything up.
    pub fn disabled() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: None,
        }
    }

    pub async fn fetch_temperature(&self, latitude: f64, longitude: f64) -> Option<f64> {
        let endpoint = self.endpoint.as_deref()?;

        match self.request(endpoint, latitude, longitude).await {
            Ok(temperature) => {
                debug!("Temperature at ({}, {}): {}", latitude, longitude, temperature);
                Some(temperature)
            }
            Err(e) => {
                warn!("Weather lookup for ({}, {}) failed: {}", latitude, longitude, e);
                None
            }
        }
    }

    async fn request(&self, endpoint: &str, latitude: f64, longitude: f64) -> reqwest::Result<f64> {
        let forecast: Forecast = self
            .http
            .get(endpoint)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", "temperature_2m".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(forecast.current.temperature_2m)
    }
}
