//! The submit/render/persist/export orchestration pipeline.
//!
//! One `Session` owns the API client, the dual-channel store, the form and
//! the screen view-models. Every operation reads the form fresh, drives its
//! own loading state, and restores indicators on every exit path. The two
//! visualization loaders run concurrently and are mutually independent.

use std::path::{Path, PathBuf};

use crate::api_client::PanchangaApiClient;
use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::export::{ical_filename, save_download};
use crate::form::FormState;
use crate::geo::PositionSource;
use crate::models::{PanchangaResult, RequestRecord, VisualizationRequest};
use crate::store::{InsightStore, INSIGHT_KEY};
use crate::view::{Screen, VisualContent, VisualPanel};
use crate::zodiac::{FactCards, PLACEHOLDER};

/// Alert shown on a transport failure of the primary fetch.
pub const ALERT_PANCHANGA_FAILED: &str = "An error occurred while fetching Panchanga data.";
/// Alert shown on a transport failure of the iCal export.
pub const ALERT_ICAL_FAILED: &str = "Failed to generate iCal file.";
/// Alert shown when the platform has no position API.
pub const ALERT_GEO_UNSUPPORTED: &str = "Geolocation is not supported on this platform";
/// Alert shown when position acquisition fails.
pub const ALERT_GEO_FAILED: &str = "Unable to retrieve your location";
/// Solar-system panel title when the event title is empty.
pub const SOLAR_FALLBACK_TITLE: &str = "Planetary Alignments";

/// One user session: form, screen, client and store.
pub struct Session {
    client: PanchangaApiClient,
    store: InsightStore,
    pub form: FormState,
    pub screen: Screen,
}

impl Session {
    pub fn new(client: PanchangaApiClient, store: InsightStore) -> Self {
        Self {
            client,
            store,
            form: FormState::new(),
            screen: Screen::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = PanchangaApiClient::new(config.api_base_url.clone())
            .context("initializing panchanga client")?;
        let store = InsightStore::standard(&config.data_dir);
        Ok(Self::new(client, store))
    }

    /// Submits the current form to the calculation service and dispatches
    /// the outcome.
    ///
    /// The previous result stays in the screen, hidden, while the fetch is
    /// in flight; the page-level loader is hidden again on every exit path.
    pub async fn submit(&mut self) {
        let record = self.form.snapshot();
        self.screen.loader.show();
        self.screen.result.hide();

        let outcome = self.client.fetch_panchanga(&record).await;
        self.screen.loader.hide();

        match outcome {
            Ok(result) => self.render(result, &record).await,
            Err(AppError::Api(msg)) => {
                tracing::warn!("Panchanga calculation failed: {}", msg);
                self.screen.alert(format!("Error: {}", msg));
            }
            Err(e) => {
                tracing::error!("Panchanga fetch error: {}", e);
                self.screen.alert(ALERT_PANCHANGA_FAILED);
            }
        }
    }

    /// Maps one result into every dependent region: summary grid, fact
    /// cards, persisted insight payload, then both visualization loaders.
    async fn render(&mut self, result: PanchangaResult, record: &RequestRecord) {
        self.screen.result.render(&result, record);
        self.screen
            .facts
            .render(FactCards::derive(result.angular.as_ref(), record.lang));
        self.persist(result, record);
        self.load_visualizations().await;
    }

    /// Serializes the insight payload and writes it to every storage
    /// channel. Failures never surface or undo rendering.
    fn persist(&self, result: PanchangaResult, record: &RequestRecord) {
        let payload = record.insight_payload(result);
        match serde_json::to_string(&payload) {
            Ok(serialized) => self.store.write_all(INSIGHT_KEY, &serialized),
            Err(e) => tracing::warn!("Failed to serialize insight payload: {}", e),
        }
    }

    /// Fires both visualization loaders concurrently, each with its own
    /// request built from current form state. Completion order is
    /// indeterminate and neither loader can block or hide the other.
    pub async fn load_visualizations(&mut self) {
        let sky_request = self.form.visualization_request();
        let solar_request = self.form.visualization_request();

        let client = &self.client;
        let Screen {
            skyshot,
            solar_system,
            ..
        } = &mut self.screen;

        tokio::join!(
            load_skyshot(client, skyshot, sky_request),
            load_solar_system(client, solar_system, solar_request),
        );
    }

    /// Exports the current form as an iCal download saved under
    /// `download_dir`. Returns the saved path on success.
    ///
    /// The export control is disabled and relabeled while in flight and
    /// restored regardless of outcome.
    pub async fn export_ical(&mut self, download_dir: &Path) -> Option<PathBuf> {
        let record = self.form.snapshot();
        self.screen.export.begin();

        let outcome = self.client.generate_ical(&record).await;
        self.screen.export.restore();

        match outcome {
            Ok(bytes) => {
                let filename = ical_filename(&record.title);
                match save_download(download_dir, &filename, &bytes) {
                    Ok(path) => {
                        tracing::info!("Saved iCal download: {}", path.display());
                        Some(path)
                    }
                    Err(e) => {
                        tracing::error!("iCal save failed: {}", e);
                        self.screen.alert(ALERT_ICAL_FAILED);
                        None
                    }
                }
            }
            Err(AppError::Api(msg)) => {
                tracing::warn!("iCal generation rejected: {}", msg);
                self.screen.alert(format!("Error generating iCal: {}", msg));
                None
            }
            Err(e) => {
                tracing::error!("iCal generation error: {}", e);
                self.screen.alert(ALERT_ICAL_FAILED);
                None
            }
        }
    }

    /// Replaces the location field with the platform position, formatted as
    /// a locale-invariant `"lat, lon"` pair. On failure the field is left
    /// untouched and an alert is raised. The affordance dims while the call
    /// is in flight and is restored on either outcome.
    pub fn acquire_location(&mut self, source: &dyn PositionSource) {
        if !source.supported() {
            self.screen.alert(ALERT_GEO_UNSUPPORTED);
            return;
        }

        self.screen.geo.dimmed = true;
        match source.current_position() {
            Ok(position) => {
                self.form.location = position.to_string();
            }
            Err(e) => {
                tracing::warn!("Geolocation failed: {}", e);
                self.screen.alert(ALERT_GEO_FAILED);
            }
        }
        self.screen.geo.dimmed = false;
    }

    /// One-shot insights handoff: reads the last persisted payload from the
    /// first channel that has it and submits it verbatim as the single
    /// `panchanga_data` form field. Returns the navigated document body.
    pub async fn handoff(&self) -> Result<String, AppError> {
        let payload = self
            .store
            .read_first(INSIGHT_KEY)
            .ok_or_else(|| AppError::Storage("no insight payload stored yet".to_string()))?;
        self.client.submit_insights(&payload).await
    }

    /// The payload the handoff would carry, if any.
    pub fn stored_insight(&self) -> Option<String> {
        self.store.read_first(INSIGHT_KEY)
    }
}

async fn load_skyshot(
    client: &PanchangaApiClient,
    panel: &mut VisualPanel,
    request: VisualizationRequest,
) {
    let token = panel.begin();
    match client.fetch_skyshot(&request).await {
        Ok(shot) => {
            let caption = match (shot.moon_longitude, shot.phase_angle) {
                (Some(longitude), Some(phase)) => Some(format!(
                    "Moon Position: {:.1}° Sidereal | Phase: {:.0}°",
                    longitude, phase
                )),
                _ => None,
            };
            let content = VisualContent {
                title: shot
                    .nakshatra
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                image: shot.image_data,
                caption,
            };
            if !panel.complete(token, content) {
                tracing::debug!("Stale skyshot response dropped");
            }
        }
        Err(e) => {
            tracing::warn!("Skyshot load failed: {}", e);
            panel.fail(token);
        }
    }
}

async fn load_solar_system(
    client: &PanchangaApiClient,
    panel: &mut VisualPanel,
    request: VisualizationRequest,
) {
    let token = panel.begin();
    let title = if request.title.trim().is_empty() {
        SOLAR_FALLBACK_TITLE.to_string()
    } else {
        request.title.clone()
    };

    match client.fetch_solar_system(&request).await {
        Ok(view) => {
            let content = VisualContent {
                title,
                image: view.image_data,
                caption: None,
            };
            if !panel.complete(token, content) {
                tracing::debug!("Stale solar-system response dropped");
            }
        }
        Err(e) => {
            tracing::warn!("Solar system load failed: {}", e);
            panel.fail(token);
        }
    }
}
