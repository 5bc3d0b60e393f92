//! Weather symbols as reported by met.no, and the classifier that picks one
//! for a sample when the feed does not supply a summary.

use std::fmt;

use crate::metno::{Period, Sample};

const CLOUDY_ABOVE: f64 = 75.0;
const PARTLY_CLOUDY_ABOVE: f64 = 25.0;
const HEAVY_PRECIPITATION_ABOVE: f64 = 2.0;

/// A met.no symbol code. Codes the display has no table entry for are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    ClearskyDay,
    ClearskyNight,
    FairDay,
    FairNight,
    PartlycloudyDay,
    PartlycloudyNight,
    Cloudy,
    RainDay,
    RainNight,
    Heavyrain,
    HeavyrainDay,
    HeavyrainNight,
    RainshowersDay,
    RainshowersNight,
    SnowDay,
    SnowNight,
    HeavysnowDay,
    HeavysnowNight,
    SleetDay,
    SleetNight,
    ThunderstormDay,
    ThunderstormNight,
    WindyDay,
    WindyNight,
    Fog,
    Other(String),
}

impl Symbol {
    pub fn from_code(code: &str) -> Self {
        match code {
            "clearsky_day" => Symbol::ClearskyDay,
            "clearsky_night" => Symbol::ClearskyNight,
            "fair_day" => Symbol::FairDay,
            "fair_night" => Symbol::FairNight,
            "partlycloudy_day" => Symbol::PartlycloudyDay,
            "partlycloudy_night" => Symbol::PartlycloudyNight,
            "cloudy" => Symbol::Cloudy,
            "rain_day" => Symbol::RainDay,
            "rain_night" => Symbol::RainNight,
            "heavyrain" => Symbol::Heavyrain,
            "heavyrain_day" => Symbol::HeavyrainDay,
            "heavyrain_night" => Symbol::HeavyrainNight,
            "rainshowers_day" => Symbol::RainshowersDay,
            "rainshowers_night" => Symbol::RainshowersNight,
            "snow_day" => Symbol::SnowDay,
            "snow_night" => Symbol::SnowNight,
            "heavysnow_day" => Symbol::HeavysnowDay,
            "heavysnow_night" => Symbol::HeavysnowNight,
            "sleet_day" => Symbol::SleetDay,
            "sleet_night" => Symbol::SleetNight,
            "thunderstorm_day" => Symbol::ThunderstormDay,
            "thunderstorm_night" => Symbol::ThunderstormNight,
            "windy_day" => Symbol::WindyDay,
            "windy_night" => Symbol::WindyNight,
            "fog" => Symbol::Fog,
            other => Symbol::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Symbol::ClearskyDay => "clearsky_day",
            Symbol::ClearskyNight => "clearsky_night",
            Symbol::FairDay => "fair_day",
            Symbol::FairNight => "fair_night",
            Symbol::PartlycloudyDay => "partlycloudy_day",
            Symbol::PartlycloudyNight => "partlycloudy_night",
            Symbol::Cloudy => "cloudy",
            Symbol::RainDay => "rain_day",
            Symbol::RainNight => "rain_night",
            Symbol::Heavyrain => "heavyrain",
            Symbol::HeavyrainDay => "heavyrain_day",
            Symbol::HeavyrainNight => "heavyrain_night",
            Symbol::RainshowersDay => "rainshowers_day",
            Symbol::RainshowersNight => "rainshowers_night",
            Symbol::SnowDay => "snow_day",
            Symbol::SnowNight => "snow_night",
            Symbol::HeavysnowDay => "heavysnow_day",
            Symbol::HeavysnowNight => "heavysnow_night",
            Symbol::SleetDay => "sleet_day",
            Symbol::SleetNight => "sleet_night",
            Symbol::ThunderstormDay => "thunderstorm_day",
            Symbol::ThunderstormNight => "thunderstorm_night",
            Symbol::WindyDay => "windy_day",
            Symbol::WindyNight => "windy_night",
            Symbol::Fog => "fog",
            Symbol::Other(code) => code,
        }
    }

    /// Norwegian description. Never empty.
    pub fn description(&self) -> &'static str {
        match self {
            Symbol::ClearskyDay | Symbol::ClearskyNight => "Klart",
            Symbol::FairDay
            | Symbol::FairNight
            | Symbol::PartlycloudyDay
            | Symbol::PartlycloudyNight => "Delvis skyet",
            Symbol::Cloudy => "Overskyet",
            Symbol::RainshowersDay | Symbol::RainshowersNight => "Regnbyger",
            Symbol::RainDay | Symbol::RainNight => "Regn",
            Symbol::Heavyrain | Symbol::HeavyrainDay | Symbol::HeavyrainNight => "Kraftig regn",
            Symbol::SnowDay | Symbol::SnowNight => "Snø",
            Symbol::HeavysnowDay | Symbol::HeavysnowNight => "Kraftig snø",
            Symbol::SleetDay | Symbol::SleetNight => "Sludd",
            Symbol::Fog => "Tåke",
            _ => describe_by_keyword(self.code()),
        }
    }

    /// Terminal stand-in for the weather icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            Symbol::ClearskyDay => "☀",
            Symbol::ClearskyNight => "☾",
            Symbol::FairDay | Symbol::PartlycloudyDay => "⛅",
            Symbol::FairNight | Symbol::PartlycloudyNight => "☁",
            Symbol::RainDay
            | Symbol::RainNight
            | Symbol::RainshowersDay
            | Symbol::RainshowersNight => "☂",
            Symbol::Heavyrain | Symbol::HeavyrainDay | Symbol::HeavyrainNight => "☔",
            Symbol::SnowDay
            | Symbol::SnowNight
            | Symbol::HeavysnowDay
            | Symbol::HeavysnowNight
            | Symbol::SleetDay
            | Symbol::SleetNight => "❄",
            Symbol::ThunderstormDay | Symbol::ThunderstormNight => "⚡",
            _ => "☁",
        }
    }
}

fn describe_by_keyword(code: &str) -> &'static str {
    if code.contains("clear") {
        "Klart"
    } else if code.contains("cloud") {
        "Overskyet"
    } else if code.contains("rain") {
        "Regn"
    } else if code.contains("snow") {
        "Snø"
    } else if code.contains("fog") {
        "Tåke"
    } else {
        "Overskyet"
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

fn summary_symbol(period: Option<&Period>) -> Option<Symbol> {
    period.and_then(Period::symbol_code).map(Symbol::from_code)
}

fn by_cloud_cover(cloud_cover: f64) -> Symbol {
    if cloud_cover > CLOUDY_ABOVE {
        Symbol::Cloudy
    } else if cloud_cover > PARTLY_CLOUDY_ABOVE {
        Symbol::PartlycloudyDay
    } else {
        Symbol::ClearskyDay
    }
}

/// Derives a symbol from measurements alone.
pub fn derive(air_temperature: f64, cloud_cover: f64, precipitation: f64) -> Symbol {
    let heavy = precipitation > HEAVY_PRECIPITATION_ABOVE;
    if precipitation > 0.0 {
        match (air_temperature < 0.0, heavy) {
            (true, true) => Symbol::HeavysnowDay,
            (true, false) => Symbol::SnowDay,
            (false, true) => Symbol::HeavyrainDay,
            (false, false) => Symbol::RainDay,
        }
    } else {
        by_cloud_cover(cloud_cover)
    }
}

/// Symbol for the current conditions panel: the next hour's summary, then the
/// next six hours', then one derived from the measurements.
pub fn classify_current(sample: &Sample) -> Symbol {
    let data = &sample.data;
    summary_symbol(data.next_1_hours.as_ref())
        .or_else(|| summary_symbol(data.next_6_hours.as_ref()))
        .unwrap_or_else(|| {
            let details = sample.details();
            derive(
                details.air_temperature.unwrap_or(0.0),
                details.cloud_area_fraction.unwrap_or(0.0),
                sample.precipitation_next_hour(),
            )
        })
}

/// Symbol for a forecast day: the six hour summary, else cloud cover only.
pub fn classify_day(sample: &Sample) -> Symbol {
    summary_symbol(sample.data.next_6_hours.as_ref()).unwrap_or_else(|| {
        by_cloud_cover(sample.details().cloud_area_fraction.unwrap_or(0.0))
    })
}
