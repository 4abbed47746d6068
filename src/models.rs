use serde::{Deserialize, Serialize};

// ============ Request Records ============

/// Display language selected alongside the form fields.
///
/// Controls which traditional transliteration the fact cards use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
pub enum Lang {
    /// English (Sanskrit transliteration as the traditional base).
    #[default]
    #[serde(rename = "EN")]
    En,
    /// Kannada.
    #[serde(rename = "KN")]
    Kn,
    /// Sanskrit.
    #[serde(rename = "SA")]
    Sa,
}

/// The full submission record read from the form.
///
/// All fields are plain strings at the boundary; the calculation service
/// owns parsing and validation. Constructed fresh before every
/// submission-type action, never cached between actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    /// User-entered event title.
    pub title: String,
    /// Calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Local clock time (`HH:MM`).
    pub time: String,
    /// Free-text place name or a `"lat, lon"` pair.
    pub location: String,
    /// Selected display language.
    pub lang: Lang,
}

/// Narrower projection of the form used by the visualization endpoints.
///
/// Built independently for each sub-pipeline from current form state so
/// edits made after the last submission are honored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationRequest {
    /// Calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Local clock time (`HH:MM`).
    pub time: String,
    /// Free-text place name or a `"lat, lon"` pair.
    pub location: String,
    /// User-entered event title.
    pub title: String,
}

// ============ Calculation Service Payloads ============

/// Angular data nested inside a panchanga result.
///
/// All values are numeric degrees; the sidereal longitudes lie in
/// [0, 360) and the phase angle in [0, 180].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AngularData {
    /// Sun's sidereal ecliptic longitude.
    pub sun_sidereal: f64,
    /// Moon's sidereal ecliptic longitude.
    pub moon_sidereal: f64,
    /// Sun-Moon angular separation.
    pub phase_angle: f64,
    /// Offset between the sidereal and tropical frames.
    pub ayanamsha: f64,
}

/// A nested record carrying only a display name (rashi, lagna).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Localized display name.
    pub name: Option<String>,
}

/// The heterogeneous result returned by `/api/panchanga`.
///
/// Every field is optional: absence degrades to a rendered placeholder,
/// never a failure. The most recent instance is the only one retained.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PanchangaResult {
    /// Event title echoed by the service, when it supplies one.
    pub title: Option<String>,
    /// Samvatsara (year name in the 60-year cycle).
    pub samvatsara: Option<String>,
    /// Saka era year number.
    pub saka_year: Option<i64>,
    /// Lunar month.
    pub masa: Option<String>,
    /// Lunar half-month (waxing/waning).
    pub paksha: Option<String>,
    /// Lunar day.
    pub tithi: Option<String>,
    /// Weekday.
    pub vara: Option<String>,
    /// Lunar mansion.
    pub nakshatra: Option<String>,
    /// Luni-solar yoga.
    pub yoga: Option<String>,
    /// Half-tithi number.
    pub karana: Option<i64>,
    /// Moon sign.
    pub rashi: Option<NamedEntity>,
    /// Ascendant.
    pub lagna: Option<NamedEntity>,
    /// Local sunrise time.
    pub sunrise: Option<String>,
    /// Local sunset time.
    pub sunset: Option<String>,
    /// Next panchanga recurrence of the event date.
    pub next_birthday: Option<String>,
    /// Resolved address of the location input.
    pub address: Option<String>,
    /// IANA timezone of the resolved location.
    pub timezone: Option<String>,
    /// Pre-formatted plain-text report.
    pub report: Option<String>,
    /// Angular data for client-side fact-card derivation.
    pub angular: Option<AngularData>,
}

/// The payload persisted for the insights handoff: the last successful
/// result merged with the timestamp the user originally entered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedInsightPayload {
    /// The panchanga result as returned by the service.
    #[serde(flatten)]
    pub result: PanchangaResult,
    /// Concatenation of the submitted date and time inputs.
    pub input_datetime: String,
}

// ============ Response Envelopes ============

/// Envelope returned by `/api/panchanga`.
#[derive(Debug, Clone, Deserialize)]
pub struct PanchangaResponse {
    /// Whether the calculation succeeded.
    #[serde(default)]
    pub success: bool,
    /// The result payload, present on success.
    pub data: Option<PanchangaResult>,
    /// The carried error message, present on failure.
    pub error: Option<String>,
}

/// Envelope returned by `/api/skyshot`.
#[derive(Debug, Clone, Deserialize)]
pub struct SkyshotResponse {
    #[serde(default)]
    pub success: bool,
    /// Inline image reference, delivered with the envelope.
    pub image_data: Option<String>,
    /// Name of the nakshatra the moon occupies.
    pub nakshatra: Option<String>,
    /// Moon's sidereal longitude, for the caption.
    pub moon_longitude: Option<f64>,
    /// Sun-Moon separation, for the caption.
    pub phase_angle: Option<f64>,
    pub error: Option<String>,
}

/// Envelope returned by `/api/solar-system`.
#[derive(Debug, Clone, Deserialize)]
pub struct SolarSystemResponse {
    #[serde(default)]
    pub success: bool,
    /// Inline image reference, delivered with the envelope.
    pub image_data: Option<String>,
    pub error: Option<String>,
}

/// Error body returned by `/api/generate-ical` on a non-OK response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl RequestRecord {
    /// Builds the persisted insight payload from this record and a result.
    pub fn insight_payload(&self, result: PanchangaResult) -> PersistedInsightPayload {
        PersistedInsightPayload {
            result,
            input_datetime: format!("{} {}", self.date, self.time),
        }
    }
}
