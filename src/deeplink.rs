use reqwest::Url;

use crate::error::WeatherError;

const MOBILE_PARAM: &str = "mobile";
const CITY_PARAM: &str = "city";

/// The `?mobile=true&city=<key>` link encoded in the QR code.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeepLink {
    pub mobile: bool,
    pub city: Option<String>,
}

impl DeepLink {
    pub fn parse(link: &str) -> Result<Self, WeatherError> {
        let url = Url::parse(link).map_err(|e| WeatherError::Url(link.to_string(), e.to_string()))?;

        let mut deep_link = DeepLink::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                MOBILE_PARAM => deep_link.mobile = value == "true",
                CITY_PARAM if !value.is_empty() => deep_link.city = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(deep_link)
    }
}

/// Link that opens the city picker with `city` preselected.
pub fn mobile_link(base: &str, city: &str) -> Result<String, WeatherError> {
    Url::parse_with_params(base, &[(MOBILE_PARAM, "true"), (CITY_PARAM, city)])
        .map(String::from)
        .map_err(|e| WeatherError::Url(base.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_link() {
        let link = mobile_link("https://example.org/weather", "bodo").unwrap();
        assert_eq!(link, "https://example.org/weather?mobile=true&city=bodo");
    }

    #[test]
    fn test_round_trip() {
        let link = mobile_link("https://example.org/weather", "alesund").unwrap();
        let parsed = DeepLink::parse(&link).unwrap();
        assert_eq!(
            parsed,
            DeepLink {
                mobile: true,
                city: Some("alesund".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_variants() {
        let parsed = DeepLink::parse("https://example.org/?mobile=true").unwrap();
        assert!(parsed.mobile);
        assert_eq!(parsed.city, None);

        let parsed = DeepLink::parse("https://example.org/?mobile=false&city=oslo").unwrap();
        assert!(!parsed.mobile);
        assert_eq!(parsed.city.as_deref(), Some("oslo"));

        assert!(DeepLink::parse("not a url").is_err());
    }
}
