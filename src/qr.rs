use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};
use reqwest::Url;

use crate::deeplink;
use crate::error::WeatherError;

pub const DEFAULT_BASE_URL: &str = "https://leamus76.github.io/norwegian-weather-app";
const REMOTE_RENDERER: &str = "https://chart.googleapis.com/chart";

/// A QR code for the mobile city picker link.
#[derive(Debug, Clone, PartialEq)]
pub enum QrImage {
    /// Rendered locally as unicode half blocks, one string per line.
    Rendered { lines: Vec<String>, target: String },
    /// Local rendering unavailable; an image service renders it instead.
    Remote { image_url: String, target: String },
}

impl QrImage {
    pub fn target(&self) -> &str {
        match self {
            QrImage::Rendered { target, .. } | QrImage::Remote { target, .. } => target,
        }
    }

    /// Builds the code for `city`, falling back to a remote image when local
    /// rendering is disabled or fails.
    pub fn for_city(base: &str, city: &str, render_locally: bool) -> Result<Self, WeatherError> {
        let target = deeplink::mobile_link(base, city)?;
        if render_locally {
            match render(&target) {
                Ok(lines) => return Ok(QrImage::Rendered { lines, target }),
                Err(e) => log::warn!("QR rendering failed, using remote image: {e}"),
            }
        }
        let image_url = remote_image_url(&target)?;
        log::info!("using remote QR image for {target}");
        Ok(QrImage::Remote { image_url, target })
    }
}

pub fn render(payload: &str) -> Result<Vec<String>, WeatherError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)?;
    let image = code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build();
    Ok(image.lines().map(str::to_string).collect())
}

pub fn remote_image_url(payload: &str) -> Result<String, WeatherError> {
    Url::parse_with_params(
        REMOTE_RENDERER,
        &[("chs", "80x80"), ("cht", "qr"), ("chl", payload)],
    )
    .map(String::from)
    .map_err(|e| WeatherError::Url(REMOTE_RENDERER.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_locally() {
        let qr = QrImage::for_city(DEFAULT_BASE_URL, "oslo", true).unwrap();
        match qr {
            QrImage::Rendered { lines, target } => {
                assert_eq!(target, format!("{DEFAULT_BASE_URL}?mobile=true&city=oslo"));
                assert!(lines.len() > 10);
                let width = lines[0].chars().count();
                assert!(lines.iter().all(|l| l.chars().count() == width));
            }
            other => panic!("expected local rendering, got {other:?}"),
        }
    }

    #[test]
    fn test_remote_fallback() {
        let qr = QrImage::for_city("https://example.org/wx", "bergen", false).unwrap();
        assert_eq!(qr.target(), "https://example.org/wx?mobile=true&city=bergen");
        match qr {
            QrImage::Remote { image_url, .. } => assert_eq!(
                image_url,
                "https://chart.googleapis.com/chart?chs=80x80&cht=qr\
                 &chl=https%3A%2F%2Fexample.org%2Fwx%3Fmobile%3Dtrue%26city%3Dbergen"
            ),
            other => panic!("expected remote image, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_base() {
        assert!(QrImage::for_city("no scheme", "oslo", true).is_err());
    }
}
