use std::time::Duration;

use moka::future::Cache;
use sha2::{Digest, Sha256};

use crate::errors::AppError;
use crate::models::{
    ApiErrorBody, PanchangaResponse, PanchangaResult, RequestRecord, SkyshotResponse,
    SolarSystemResponse, VisualizationRequest,
};

/// A successfully-loaded skyshot payload.
#[derive(Debug, Clone)]
pub struct SkyshotData {
    /// Inline image reference.
    pub image_data: String,
    /// Name of the nakshatra the moon occupies.
    pub nakshatra: Option<String>,
    pub moon_longitude: Option<f64>,
    pub phase_angle: Option<f64>,
}

/// A successfully-loaded solar-system payload.
#[derive(Debug, Clone)]
pub struct SolarSystemData {
    /// Inline image reference.
    pub image_data: String,
}

/// Cache key for a visualization request: truncated SHA-256 of the moment
/// and place. The event title does not affect the rendered imagery.
fn visualization_cache_key(request: &VisualizationRequest) -> String {
    let digest = Sha256::digest(
        format!("{}-{}-{}", request.date, request.time, request.location).as_bytes(),
    );
    hex::encode(digest)[..12].to_string()
}

/// Client for the panchanga calculation service.
#[derive(Clone)]
pub struct PanchangaApiClient {
    client: reqwest::Client,
    base_url: String,
    skyshot_cache: Cache<String, SkyshotData>,
    solar_cache: Cache<String, SolarSystemData>,
}

impl PanchangaApiClient {
    /// Creates a new `PanchangaApiClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the calculation service.
    pub fn new(base_url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::Transport(format!("Failed to create panchanga client: {}", e))
            })?;

        // Imagery for one moment/place never changes; an hour of reuse
        // mirrors the service's own render cache.
        let skyshot_cache = Cache::builder()
            .time_to_live(Duration::from_secs(3600))
            .max_capacity(256)
            .build();
        let solar_cache = Cache::builder()
            .time_to_live(Duration::from_secs(3600))
            .max_capacity(256)
            .build();

        Ok(Self {
            client,
            base_url,
            skyshot_cache,
            solar_cache,
        })
    }

    /// Submits a request record to `/api/panchanga`.
    ///
    /// # Returns
    ///
    /// * `Ok(PanchangaResult)` on a structurally successful response with
    ///   `success: true`.
    /// * `Err(AppError::Api)` when the service reports `success: false`.
    /// * `Err(AppError::Transport)` on network failure or malformed body.
    pub async fn fetch_panchanga(
        &self,
        record: &RequestRecord,
    ) -> Result<PanchangaResult, AppError> {
        let url = format!("{}/api/panchanga", self.base_url);
        tracing::info!("Fetching panchanga for {} {} from {}", record.date, record.time, url);

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Panchanga request failed: {}", e)))?;

        let envelope: PanchangaResponse = response.json().await.map_err(|e| {
            AppError::Transport(format!("Failed to parse panchanga response: {}", e))
        })?;

        if !envelope.success {
            return Err(AppError::Api(
                envelope.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        envelope
            .data
            .ok_or_else(|| AppError::Transport("Panchanga response missing data".to_string()))
    }

    /// Submits a request record to `/api/generate-ical` and returns the
    /// file body as opaque bytes.
    pub async fn generate_ical(
        &self,
        record: &RequestRecord,
    ) -> Result<Vec<u8>, AppError> {
        let url = format!("{}/api/generate-ical", self.base_url);
        tracing::info!("Generating iCal for '{}' via {}", record.title, url);

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("iCal request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return match serde_json::from_str::<ApiErrorBody>(&error_text) {
                Ok(body) => Err(AppError::Api(body.error)),
                Err(_) => Err(AppError::Transport(format!(
                    "iCal generation returned {}: {}",
                    status, error_text
                ))),
            };
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read iCal body: {}", e)))?;
        Ok(bytes.to_vec())
    }

    /// Fetches the sky-image payload for `/api/skyshot`.
    ///
    /// Successful payloads are memoized per moment/place for an hour.
    pub async fn fetch_skyshot(
        &self,
        request: &VisualizationRequest,
    ) -> Result<SkyshotData, AppError> {
        let key = visualization_cache_key(request);
        if let Some(cached) = self.skyshot_cache.get(&key).await {
            tracing::debug!("Skyshot cache hit: {}", key);
            return Ok(cached);
        }

        let url = format!("{}/api/skyshot", self.base_url);
        tracing::info!("Fetching skyshot for {} {} from {}", request.date, request.time, url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Skyshot request failed: {}", e)))?;

        let envelope: SkyshotResponse = response.json().await.map_err(|e| {
            AppError::Transport(format!("Failed to parse skyshot response: {}", e))
        })?;

        if !envelope.success {
            return Err(AppError::Api(
                envelope.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        let data = SkyshotData {
            image_data: envelope
                .image_data
                .ok_or_else(|| AppError::Transport("Skyshot response missing image".to_string()))?,
            nakshatra: envelope.nakshatra,
            moon_longitude: envelope.moon_longitude,
            phase_angle: envelope.phase_angle,
        };
        self.skyshot_cache.insert(key, data.clone()).await;
        Ok(data)
    }

    /// Fetches the solar-system image payload from `/api/solar-system`.
    ///
    /// Successful payloads are memoized per moment/place for an hour.
    pub async fn fetch_solar_system(
        &self,
        request: &VisualizationRequest,
    ) -> Result<SolarSystemData, AppError> {
        let key = visualization_cache_key(request);
        if let Some(cached) = self.solar_cache.get(&key).await {
            tracing::debug!("Solar-system cache hit: {}", key);
            return Ok(cached);
        }

        let url = format!("{}/api/solar-system", self.base_url);
        tracing::info!(
            "Fetching solar system view for {} {} from {}",
            request.date,
            request.time,
            url
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Solar system request failed: {}", e)))?;

        let envelope: SolarSystemResponse = response.json().await.map_err(|e| {
            AppError::Transport(format!("Failed to parse solar system response: {}", e))
        })?;

        if !envelope.success {
            return Err(AppError::Api(
                envelope.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        let data = SolarSystemData {
            image_data: envelope.image_data.ok_or_else(|| {
                AppError::Transport("Solar system response missing image".to_string())
            })?,
        };
        self.solar_cache.insert(key, data.clone()).await;
        Ok(data)
    }

    /// One-shot outbound transfer to the insights page: POSTs the serialized
    /// payload verbatim as the single form field `panchanga_data` and
    /// returns the navigated document body.
    pub async fn submit_insights(&self, payload: &str) -> Result<String, AppError> {
        let url = format!("{}/insights", self.base_url);
        tracing::info!("Submitting insights handoff to {}", url);

        let response = self
            .client
            .post(&url)
            .form(&[("panchanga_data", payload)])
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Insights handoff failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Api(format!(
                "Insights page returned {}",
                status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read insights page: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = PanchangaApiClient::new("https://example.com".to_string());
        assert!(client.is_ok());
    }

    #[test]
    fn cache_key_ignores_title() {
        let a = VisualizationRequest {
            date: "2024-01-15".to_string(),
            time: "14:30".to_string(),
            location: "Bengaluru".to_string(),
            title: "One".to_string(),
        };
        let b = VisualizationRequest {
            title: "Another".to_string(),
            ..a.clone()
        };
        assert_eq!(visualization_cache_key(&a), visualization_cache_key(&b));
        assert_eq!(visualization_cache_key(&a).len(), 12);
    }

    #[test]
    fn cache_key_varies_with_moment() {
        let a = VisualizationRequest {
            date: "2024-01-15".to_string(),
            time: "14:30".to_string(),
            location: "Bengaluru".to_string(),
            title: String::new(),
        };
        let b = VisualizationRequest {
            time: "14:31".to_string(),
            ..a.clone()
        };
        assert_ne!(visualization_cache_key(&a), visualization_cache_key(&b));
    }
}
