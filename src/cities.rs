use crate::error::WeatherError;

pub const DEFAULT_CITY: &str = "oslo";

#[derive(Debug, PartialEq)]
pub struct City {
    pub key: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lon: f64,
}

pub static CITIES: [City; 10] = [
    City { key: "oslo", name: "Oslo", address: "Grev Wedels plass 9", lat: 59.9139, lon: 10.7522 },
    City { key: "bergen", name: "Bergen", address: "Bryggen", lat: 60.3913, lon: 5.3221 },
    City { key: "trondheim", name: "Trondheim", address: "Nidarosdomen", lat: 63.4305, lon: 10.3951 },
    City { key: "stavanger", name: "Stavanger", address: "Gamle Stavanger", lat: 58.9699, lon: 5.7331 },
    City { key: "tromso", name: "Tromsø", address: "Arktisk katedral", lat: 69.6492, lon: 18.9553 },
    City { key: "bodo", name: "Bodø", address: "Saltstraumen", lat: 67.2804, lon: 14.4049 },
    City { key: "kristiansand", name: "Kristiansand", address: "Posebyen", lat: 58.1467, lon: 7.9956 },
    City { key: "alesund", name: "Ålesund", address: "Art Nouveau sentrum", lat: 62.4722, lon: 6.1549 },
    City { key: "fredrikstad", name: "Fredrikstad", address: "Gamlebyen", lat: 59.2181, lon: 10.9378 },
    City { key: "drammen", name: "Drammen", address: "Spiralen", lat: 59.7440, lon: 10.2044 },
];

pub fn lookup(key: &str) -> Result<&'static City, WeatherError> {
    CITIES
        .iter()
        .find(|c| c.key == key)
        .ok_or_else(|| WeatherError::UnknownCity(key.to_string()))
}

/// Position of a city in the directory, used by the picker.
pub fn position(key: &str) -> Option<usize> {
    CITIES.iter().position(|c| c.key == key)
}
