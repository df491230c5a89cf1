use crate::config::ForecastConfig;
use crate::error::{IrrigOpsError, Result};
use crate::logic::forecast_service::{ForecastProvider, ForecastRequest};
use crate::models::{DailyObservation, ForecastOrigin, ForecastSeries};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;

const DAILY_FIELDS: &str = "temperature_2m_max,precipitation_sum,et0_fao_evapotranspiration";

pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

// Open-Meteo API response structures
#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: OmDaily,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
    et0_fao_evapotranspiration: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    pub fn new(config: &ForecastConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("irrigops/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET for the daily forecast; query values are percent-encoded by reqwest.
    fn forecast_get(&self, request: &ForecastRequest) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/forecast", self.base_url))
            .query(&[
                ("latitude", request.latitude.to_string()),
                ("longitude", request.longitude.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", request.timezone.clone()),
                ("forecast_days", request.horizon_days.to_string()),
            ])
    }

    /// Fetch the daily forecast from Open-Meteo
    pub async fn fetch_forecast(&self, request: &ForecastRequest) -> Result<ForecastSeries> {
        tracing::debug!("Requesting Open-Meteo forecast for {}", request.cache_key());

        let response = self
            .forecast_get(request)
            .send()
            .await
            .map_err(|e| IrrigOpsError::DataSourceUnavailable(format!("Open-Meteo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IrrigOpsError::DataSourceUnavailable(format!(
                "Open-Meteo returned {}: {}",
                status, body
            )));
        }

        let om_response: OmForecastResponse = response.json().await.map_err(|e| {
            IrrigOpsError::DataSourceUnavailable(format!(
                "Failed to parse Open-Meteo response: {}",
                e
            ))
        })?;

        convert_response(om_response, Utc::now())
    }

    /// Test connection to the Open-Meteo API
    pub async fn test_connection(&self, request: &ForecastRequest) -> Result<bool> {
        let probe = ForecastRequest {
            horizon_days: 1,
            ..request.clone()
        };

        let response = self
            .forecast_get(&probe)
            .send()
            .await
            .map_err(|e| IrrigOpsError::DataSourceUnavailable(format!("Open-Meteo: {}", e)))?;

        Ok(response.status().is_success())
    }
}

impl ForecastProvider for OpenMeteoClient {
    async fn fetch_daily(&self, request: &ForecastRequest) -> Result<ForecastSeries> {
        self.fetch_forecast(request).await
    }
}

fn convert_response(response: OmForecastResponse, fetched_at: DateTime<Utc>) -> Result<ForecastSeries> {
    let daily = response.daily;
    let n = daily.time.len();

    if n == 0 {
        return Err(IrrigOpsError::InvalidData("Open-Meteo returned no days".into()));
    }
    if daily.precipitation_sum.len() != n || daily.et0_fao_evapotranspiration.len() != n {
        return Err(IrrigOpsError::InvalidData(format!(
            "Open-Meteo daily arrays disagree: {} dates, {} rainfall, {} et0",
            n,
            daily.precipitation_sum.len(),
            daily.et0_fao_evapotranspiration.len()
        )));
    }
    if !daily.temperature_2m_max.is_empty() && daily.temperature_2m_max.len() != n {
        return Err(IrrigOpsError::InvalidData(format!(
            "Open-Meteo returned {} temperatures for {} dates",
            daily.temperature_2m_max.len(),
            n
        )));
    }

    let mut days = Vec::with_capacity(n);
    for (i, raw_date) in daily.time.iter().enumerate() {
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
            IrrigOpsError::InvalidData(format!("Bad Open-Meteo date {:?}: {}", raw_date, e))
        })?;

        days.push(DailyObservation {
            date,
            temp_max_c: daily.temperature_2m_max.get(i).copied().flatten(),
            rainfall_mm: non_negative(daily.precipitation_sum[i]),
            et0_mm: non_negative(daily.et0_fao_evapotranspiration[i]),
        });
    }

    Ok(ForecastSeries::new(ForecastOrigin::Live, fetched_at, days))
}

/// Nulls read as zero; negative readings are clamped.
fn non_negative(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ForecastSeries> {
        let response: OmForecastResponse = serde_json::from_str(json)?;
        convert_response(response, Utc::now())
    }

    fn request() -> ForecastRequest {
        ForecastRequest {
            latitude: -1.5789,
            longitude: 30.5089,
            timezone: "Africa/Kigali".into(),
            horizon_days: 7,
        }
    }

    fn client() -> OpenMeteoClient {
        OpenMeteoClient::new(&ForecastConfig {
            base_url: "https://example.test/v1/".into(),
            ..ForecastConfig::default()
        })
        .unwrap()
    }

    fn query_value(req: &reqwest::Request, key: &str) -> Option<String> {
        req.url()
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn builds_forecast_request() {
        let req = client().forecast_get(&request()).build().unwrap();

        assert_eq!(req.url().path(), "/v1/forecast");
        assert_eq!(query_value(&req, "latitude").as_deref(), Some("-1.5789"));
        assert_eq!(query_value(&req, "longitude").as_deref(), Some("30.5089"));
        assert_eq!(query_value(&req, "daily").as_deref(), Some(DAILY_FIELDS));
        assert_eq!(query_value(&req, "timezone").as_deref(), Some("Africa/Kigali"));
        assert_eq!(query_value(&req, "forecast_days").as_deref(), Some("7"));
    }

    #[test]
    fn timezone_is_percent_encoded() {
        let req = client()
            .forecast_get(&ForecastRequest {
                timezone: "Etc/GMT+3".into(),
                ..request()
            })
            .build()
            .unwrap();

        let raw = req.url().query().unwrap_or_default().to_string();
        assert!(raw.contains("timezone=Etc%2FGMT%2B3"));
        assert_eq!(query_value(&req, "timezone").as_deref(), Some("Etc/GMT+3"));
    }

    #[test]
    fn parses_daily_arrays() {
        let json = r#"{
            "latitude": -1.58, "longitude": 30.51,
            "daily": {
                "time": ["2025-11-17", "2025-11-18", "2025-11-19"],
                "temperature_2m_max": [27.5, null, 28.0],
                "precipitation_sum": [0.0, 3.2, null],
                "et0_fao_evapotranspiration": [4.1, 3.9, -0.2]
            }
        }"#;
        let series = parse(json).unwrap();

        assert_eq!(series.origin, ForecastOrigin::Live);
        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2025, 11, 17));
        assert_eq!(series.days[1].temp_max_c, None);
        assert_eq!(series.days[1].rainfall_mm, 3.2);
        assert_eq!(series.days[2].rainfall_mm, 0.0);
        assert_eq!(series.days[2].et0_mm, 0.0);
    }

    #[test]
    fn missing_temperature_is_tolerated() {
        let json = r#"{"daily": {
            "time": ["2025-11-17"],
            "precipitation_sum": [1.0],
            "et0_fao_evapotranspiration": [4.0]
        }}"#;
        let series = parse(json).unwrap();
        assert_eq!(series.days[0].temp_max_c, None);
    }

    #[test]
    fn rejects_malformed_responses() {
        let mismatched = r#"{"daily": {
            "time": ["2025-11-17", "2025-11-18"],
            "precipitation_sum": [1.0],
            "et0_fao_evapotranspiration": [4.0, 4.2]
        }}"#;
        assert!(parse(mismatched).is_err());

        let empty = r#"{"daily": {"time": [], "precipitation_sum": [], "et0_fao_evapotranspiration": []}}"#;
        assert!(parse(empty).is_err());

        let bad_date = r#"{"daily": {
            "time": ["17/11/2025"],
            "precipitation_sum": [1.0],
            "et0_fao_evapotranspiration": [4.0]
        }}"#;
        assert!(parse(bad_date).is_err());

        assert!(serde_json::from_str::<OmForecastResponse>(r#"{"error": true}"#).is_err());
    }
}
