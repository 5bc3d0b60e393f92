use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::cities::City;
use crate::error::WeatherError;

pub const BASE_URL: &str = "https://api.met.no/weatherapi/locationforecast/2.0/compact";

/// Locationforecast 2.0 `compact` document, trimmed to the fields we display.
#[derive(Deserialize, Debug, Default)]
pub struct Forecast {
    pub properties: Properties,
}

#[derive(Deserialize, Debug, Default)]
pub struct Properties {
    pub timeseries: Vec<Sample>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Sample {
    pub time: DateTime<Utc>,

    pub data: SampleData,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct SampleData {
    #[serde(default)]
    pub instant: Instant,

    pub next_1_hours: Option<Period>,

    pub next_6_hours: Option<Period>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Instant {
    #[serde(default)]
    pub details: InstantDetails,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct InstantDetails {
    pub air_temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_from_direction: Option<f64>,
    pub cloud_area_fraction: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub air_pressure_at_sea_level: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Period {
    pub summary: Option<Summary>,
    pub details: Option<PeriodDetails>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Summary {
    pub symbol_code: String,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct PeriodDetails {
    pub precipitation_amount: Option<f64>,
}

impl Period {
    pub fn symbol_code(&self) -> Option<&str> {
        self.summary.as_ref().map(|s| s.symbol_code.as_str())
    }

    pub fn precipitation(&self) -> Option<f64> {
        self.details.as_ref().and_then(|d| d.precipitation_amount)
    }
}

impl Sample {
    pub fn details(&self) -> &InstantDetails {
        &self.data.instant.details
    }

    /// Precipitation for the next hour, zero when the block is absent.
    pub fn precipitation_next_hour(&self) -> f64 {
        self.data
            .next_1_hours
            .as_ref()
            .and_then(Period::precipitation)
            .unwrap_or(0.0)
    }

    pub fn precipitation_next_6_hours(&self) -> f64 {
        self.data
            .next_6_hours
            .as_ref()
            .and_then(Period::precipitation)
            .unwrap_or(0.0)
    }
}

impl Forecast {
    /// Decodes a forecast document, rejecting documents without a timeseries.
    pub fn from_json(json: &str) -> Result<Self, WeatherError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.pointer("/properties/timeseries").is_none() {
            return Err(WeatherError::Decode(
                "document has no properties.timeseries".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.properties.timeseries
    }
}

/// Anything that can produce a forecast for a city.
pub trait ForecastSource: Send + 'static {
    fn fetch(&self, city: &City) -> Result<Forecast, WeatherError>;
}

pub struct MetClient {
    client: Client,
    base_url: String,
}

impl MetClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Network(base_url.to_string(), e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('?').to_string(),
        })
    }

    pub fn url_for(&self, city: &City) -> String {
        format!("{}?lat={}&lon={}", self.base_url, city.lat, city.lon)
    }

    fn get_web_json(&self, url: &str) -> Result<Response, WeatherError> {
        self.client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| WeatherError::Network(url.to_string(), e))
    }
}

impl ForecastSource for MetClient {
    fn fetch(&self, city: &City) -> Result<Forecast, WeatherError> {
        let url = self.url_for(city);
        log::info!("fetching forecast for {} from {}", city.name, url);

        let response = self.get_web_json(&url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::HttpStatus { url, status });
        }

        let body = response
            .text()
            .map_err(|e| WeatherError::Network(url.clone(), e))?;
        let forecast = Forecast::from_json(&body)?;
        log::debug!(
            "received {} samples for {}",
            forecast.samples().len(),
            city.name
        );
        Ok(forecast)
    }
}
