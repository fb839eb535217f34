//! Current-conditions lookup against weatherapi.com
//!
//! Responses are cached for 30 minutes per location. When the upstream
//! key is unconfigured or the upstream call fails, the lookup degrades to
//! a structured error payload so the dashboard can render a partial page.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const DEFAULT_WEATHER_BASE_URL: &str = "http://api.weatherapi.com";
const DEFAULT_CACHE_TTL_SECS: u64 = 1800; // 30 minutes

/// Configuration for the weather lookup
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// weatherapi.com API key; `None` degrades every lookup
    pub api_key: Option<String>,
    pub base_url: String,
    pub cache_ttl: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

/// Condition summary consumed by the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct WeatherCondition {
    pub main: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Current-conditions payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub location: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    /// Rounded degrees Celsius
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: i64,
    /// Metres per second, converted from the upstream's km/h
    pub wind_speed: i64,
    pub weather: WeatherCondition,
    pub is_day: bool,
    pub last_updated: Option<String>,
    pub cached_at: String,
}

/// Outcome of a weather lookup: a report or a structured degradation
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WeatherLookup {
    Report(WeatherReport),
    Failed {
        error: String,
        location: String,
    },
}

// Upstream response shapes, only the fields consumed

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    location: Option<UpstreamLocation>,
    current: Option<UpstreamCurrent>,
}

#[derive(Debug, Deserialize)]
struct UpstreamLocation {
    name: Option<String>,
    region: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamCurrent {
    temp_c: Option<f64>,
    feelslike_c: Option<f64>,
    humidity: Option<i64>,
    wind_kph: Option<f64>,
    condition: Option<UpstreamCondition>,
    is_day: Option<i64>,
    last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamCondition {
    text: Option<String>,
    /// Upstream returns a protocol-relative URL
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: Option<String>,
}

/// Weather lookup service with a TTL cache
#[derive(Debug)]
pub struct WeatherService {
    client: reqwest::Client,
    config: WeatherConfig,
    cache: MokaCache<String, WeatherReport>,
}

impl WeatherService {
    pub fn new(config: WeatherConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(1_000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            client: reqwest::Client::new(),
            config,
            cache,
        }
    }

    /// Fetch current conditions for a district, optionally scoped by state
    ///
    /// `bypass_cache` evicts any cached entry before fetching. A missing
    /// district is the caller's error; upstream problems degrade to
    /// `WeatherLookup::Failed`.
    pub async fn current_conditions(
        &self,
        district: &str,
        state: &str,
        bypass_cache: bool,
    ) -> Result<WeatherLookup, DomainError> {
        if district.trim().is_empty() {
            return Err(DomainError::validation("District is required"));
        }

        let location = if state.trim().is_empty() {
            format!("{} India", district.trim())
        } else {
            format!("{} {} India", district.trim(), state.trim())
        };

        let Some(api_key) = self.config.api_key.as_deref() else {
            return Ok(WeatherLookup::Failed {
                error: "Weather API key not configured".to_string(),
                location,
            });
        };

        if bypass_cache {
            self.cache.invalidate(&location).await;
        } else if let Some(report) = self.cache.get(&location).await {
            return Ok(WeatherLookup::Report(report));
        }

        match self.fetch(api_key, &location).await {
            Ok(report) => {
                self.cache.insert(location, report.clone()).await;
                Ok(WeatherLookup::Report(report))
            }
            Err(e) => {
                tracing::warn!(location = %location, error = %e, "weather lookup failed");
                Ok(WeatherLookup::Failed {
                    error: e.to_string(),
                    location,
                })
            }
        }
    }

    async fn fetch(&self, api_key: &str, location: &str) -> Result<WeatherReport, DomainError> {
        let url = format!(
            "{}/v1/current.json",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .query(&[("key", api_key), ("q", location), ("aqi", "no")])
            .send()
            .await
            .map_err(|e| DomainError::upstream("weatherapi", e.to_string()))?;

        if !response.status().is_success() {
            let message = response
                .json::<UpstreamError>()
                .await
                .ok()
                .and_then(|e| e.error.and_then(|d| d.message))
                .unwrap_or_else(|| "Failed to fetch weather".to_string());
            return Err(DomainError::upstream("weatherapi", message));
        }

        let data: UpstreamResponse = response
            .json()
            .await
            .map_err(|e| DomainError::upstream("weatherapi", e.to_string()))?;

        let current = data.current;
        let loc = data.location;

        Ok(WeatherReport {
            location: loc.as_ref().and_then(|l| l.name.clone()),
            region: loc.as_ref().and_then(|l| l.region.clone()),
            country: loc.as_ref().and_then(|l| l.country.clone()),
            temperature: current
                .as_ref()
                .and_then(|c| c.temp_c)
                .map(|t| t.round() as i64)
                .unwrap_or(0),
            feels_like: current
                .as_ref()
                .and_then(|c| c.feelslike_c)
                .map(|t| t.round() as i64)
                .unwrap_or(0),
            humidity: current.as_ref().and_then(|c| c.humidity).unwrap_or(0),
            wind_speed: current
                .as_ref()
                .and_then(|c| c.wind_kph)
                .map(|kph| (kph * 1000.0 / 3600.0).round() as i64)
                .unwrap_or(0),
            weather: WeatherCondition {
                main: current
                    .as_ref()
                    .and_then(|c| c.condition.as_ref())
                    .and_then(|c| c.text.clone()),
                description: current
                    .as_ref()
                    .and_then(|c| c.condition.as_ref())
                    .and_then(|c| c.text.clone()),
                icon: current
                    .as_ref()
                    .and_then(|c| c.condition.as_ref())
                    .and_then(|c| c.icon.clone())
                    .map(|icon| {
                        if icon.starts_with("//") {
                            format!("https:{}", icon)
                        } else {
                            icon
                        }
                    }),
            },
            is_day: current.as_ref().and_then(|c| c.is_day) == Some(1),
            last_updated: current.and_then(|c| c.last_updated),
            cached_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn upstream_body() -> serde_json::Value {
        serde_json::json!({
            "location": {"name": "Ludhiana", "region": "Punjab", "country": "India"},
            "current": {
                "temp_c": 31.4,
                "feelslike_c": 34.6,
                "humidity": 58,
                "wind_kph": 18.0,
                "condition": {"text": "Partly cloudy", "icon": "//cdn.weatherapi.com/day/116.png"},
                "is_day": 1,
                "last_updated": "2024-06-01 14:30"
            }
        })
    }

    fn service_for(server: &MockServer) -> WeatherService {
        WeatherService::new(WeatherConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.uri(),
            cache_ttl: Duration::from_secs(1800),
        })
    }

    #[tokio::test]
    async fn test_missing_district_is_validation_error() {
        let service = WeatherService::new(WeatherConfig::default());

        let result = service.current_conditions("", "Punjab", false).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_unconfigured_key_degrades() {
        let service = WeatherService::new(WeatherConfig::default());

        let lookup = service
            .current_conditions("Ludhiana", "Punjab", false)
            .await
            .unwrap();

        match lookup {
            WeatherLookup::Failed { error, location } => {
                assert!(error.contains("not configured"));
                assert_eq!(location, "Ludhiana Punjab India");
            }
            WeatherLookup::Report(_) => panic!("expected degradation"),
        }
    }

    #[tokio::test]
    async fn test_fetch_maps_upstream_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("q", "Ludhiana Punjab India"))
            .respond_with(ResponseTemplate::new(200).set_body_json(upstream_body()))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let lookup = service
            .current_conditions("Ludhiana", "Punjab", false)
            .await
            .unwrap();

        let WeatherLookup::Report(report) = lookup else {
            panic!("expected report");
        };

        assert_eq!(report.location.as_deref(), Some("Ludhiana"));
        assert_eq!(report.temperature, 31);
        assert_eq!(report.feels_like, 35);
        assert_eq!(report.humidity, 58);
        assert_eq!(report.wind_speed, 5); // 18 kph -> 5 m/s
        assert!(report.is_day);
        assert_eq!(
            report.weather.icon.as_deref(),
            Some("https://cdn.weatherapi.com/day/116.png")
        );
    }

    #[tokio::test]
    async fn test_cache_hit_skips_upstream() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(upstream_body()))
            .expect(1)
            .mount(&server)
            .await;

        let service = service_for(&server);

        service
            .current_conditions("Ludhiana", "Punjab", false)
            .await
            .unwrap();
        // Second call served from cache; the mock's expect(1) verifies it
        service
            .current_conditions("Ludhiana", "Punjab", false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_bypass_cache_refetches() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(upstream_body()))
            .expect(2)
            .mount(&server)
            .await;

        let service = service_for(&server);

        service
            .current_conditions("Ludhiana", "Punjab", false)
            .await
            .unwrap();
        service
            .current_conditions("Ludhiana", "Punjab", true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upstream_error_degrades() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"message": "No matching location found."}
            })))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let lookup = service
            .current_conditions("Nowhere", "", false)
            .await
            .unwrap();

        match lookup {
            WeatherLookup::Failed { error, .. } => {
                assert!(error.contains("No matching location found."));
            }
            WeatherLookup::Report(_) => panic!("expected degradation"),
        }
    }
}
