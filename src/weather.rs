use chrono::{DateTime, TimeZone, Utc};

use crate::condition::{self, Symbol};
use crate::error::WeatherError;
use crate::metno::Sample;
use crate::selector::{self, ForecastEntry};
use crate::units::{precipitation, round_half_up, speed, temperature};

pub const MISSING: &str = "--";
const LOAD_FAILED: &str = "Feil ved lasting";

/// Text for the current conditions region.
#[derive(Debug, Clone, PartialEq)]
pub struct Current {
    pub temperature: String,
    pub description: String,
    pub precipitation: String,
    pub wind: String,
    pub glyph: &'static str,
}

/// Text for one forecast day region.
#[derive(Debug, Clone, PartialEq)]
pub struct Day {
    pub name: String,
    pub high: String,
    pub low: String,
    pub description: String,
    pub precipitation: String,
    pub wind: String,
    pub glyph: &'static str,
}

impl Current {
    pub fn from_sample(sample: &Sample) -> Self {
        let details = sample.details();
        let symbol = condition::classify_current(sample);
        Self {
            temperature: temperature::degrees(details.air_temperature.unwrap_or(0.0)),
            description: symbol.description().to_string(),
            precipitation: precipitation::millimeters(sample.precipitation_next_hour()),
            wind: speed::meters_per_second(details.wind_speed.unwrap_or(0.0)),
            glyph: symbol.glyph(),
        }
    }

    /// Shown when no data could be loaded.
    pub fn placeholder() -> Self {
        Self {
            temperature: format!("{MISSING}°"),
            description: LOAD_FAILED.to_string(),
            precipitation: format!("{MISSING}mm"),
            wind: format!("{MISSING} m/s"),
            glyph: Symbol::Cloudy.glyph(),
        }
    }
}

impl Day {
    pub fn from_entry(entry: &ForecastEntry) -> Self {
        let sample = entry.sample;
        let details = sample.details();
        let symbol = condition::classify_day(sample);
        let high = round_half_up(details.air_temperature.unwrap_or(0.0));
        Self {
            name: entry.day_name.to_string(),
            high: format!("{high}°"),
            low: format!("{}°", temperature::low_from_high(high)),
            description: symbol.description().to_string(),
            precipitation: precipitation::millimeters(sample.precipitation_next_6_hours()),
            wind: speed::meters_per_second(details.wind_speed.unwrap_or(0.0)),
            glyph: symbol.glyph(),
        }
    }

    pub fn placeholder() -> Self {
        Self {
            name: MISSING.to_string(),
            high: format!("{MISSING}°"),
            low: format!("{MISSING}°"),
            description: MISSING.to_string(),
            precipitation: format!("{MISSING}mm"),
            wind: format!("{MISSING} m/s"),
            glyph: Symbol::Cloudy.glyph(),
        }
    }
}

/// Everything the display regions need from one forecast document.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub city: &'static str,
    pub current: Current,
    pub days: Vec<Day>,
    pub observed_at: DateTime<Utc>,
}

impl Dataset {
    pub fn from_samples<Tz: TimeZone>(
        city: &'static str,
        samples: &[Sample],
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<Self, WeatherError> {
        let index = selector::select_current(samples, now)?;
        let entries =
            selector::build_forecast(samples, index, now, selector::DEFAULT_DAYS_AHEAD, tz);
        Ok(Self {
            city,
            current: Current::from_sample(&samples[index]),
            days: entries.iter().map(Day::from_entry).collect(),
            observed_at: samples[index].time,
        })
    }

    /// Day panels, padded with placeholders up to the number of regions.
    pub fn day_panels(&self) -> Vec<Day> {
        let regions = selector::DEFAULT_DAYS_AHEAD as usize;
        let mut days = self.days.clone();
        days.truncate(regions);
        days.resize_with(regions, Day::placeholder);
        days
    }

    pub fn empty_panels() -> Vec<Day> {
        (0..selector::DEFAULT_DAYS_AHEAD)
            .map(|_| Day::placeholder())
            .collect()
    }
}
