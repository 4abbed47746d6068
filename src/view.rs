//! View-models for every rendered region.
//!
//! The pipeline operates purely on these records; presentation (terminal
//! output in the shipped binary) is a thin adapter that reads them, so every
//! visibility and loading transition can be asserted directly.

use crate::models::{PanchangaResult, RequestRecord};
use crate::zodiac::{FactCards, PLACEHOLDER};

/// A simple show/hide indicator (the page-level loader).
#[derive(Debug, Clone, Default)]
pub struct Indicator {
    pub visible: bool,
}

impl Indicator {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Text content of the summary grid.
#[derive(Debug, Clone, Default)]
pub struct ResultFields {
    pub samvatsara: String,
    pub saka_year: String,
    pub masa: String,
    pub paksha: String,
    pub tithi: String,
    pub vara: String,
    pub nakshatra: String,
    pub yoga: String,
    pub karana: String,
    pub rashi: String,
    pub lagna: String,
    pub sunrise: String,
    pub sunset: String,
    pub next_birthday: String,
    /// Resolved address with the timezone in brackets.
    pub location: String,
}

/// The primary result region.
///
/// Hidden while a fetch is in flight; stale content is retained, not
/// cleared, until the next successful render overwrites it.
#[derive(Debug, Clone, Default)]
pub struct ResultPanel {
    pub visible: bool,
    /// Heading shown above the grid.
    pub heading: String,
    pub fields: ResultFields,
    /// Set when the panel should be scrolled into view; the presenter
    /// clears it after honoring the request.
    pub focus_requested: bool,
}

fn text_or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn number_or_placeholder(value: Option<i64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |n| n.to_string())
}

impl ResultPanel {
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Populates every display field from the result, reveals the panel and
    /// requests focus.
    ///
    /// The user's original title is the heading when the service does not
    /// supply one.
    pub fn render(&mut self, result: &PanchangaResult, record: &RequestRecord) {
        self.heading = result
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| record.title.clone());

        self.fields = ResultFields {
            samvatsara: text_or_placeholder(result.samvatsara.as_deref()),
            saka_year: number_or_placeholder(result.saka_year),
            masa: text_or_placeholder(result.masa.as_deref()),
            paksha: text_or_placeholder(result.paksha.as_deref()),
            tithi: text_or_placeholder(result.tithi.as_deref()),
            vara: text_or_placeholder(result.vara.as_deref()),
            nakshatra: text_or_placeholder(result.nakshatra.as_deref()),
            yoga: text_or_placeholder(result.yoga.as_deref()),
            karana: number_or_placeholder(result.karana),
            rashi: text_or_placeholder(
                result.rashi.as_ref().and_then(|r| r.name.as_deref()),
            ),
            lagna: text_or_placeholder(
                result.lagna.as_ref().and_then(|l| l.name.as_deref()),
            ),
            sunrise: text_or_placeholder(result.sunrise.as_deref()),
            sunset: text_or_placeholder(result.sunset.as_deref()),
            next_birthday: text_or_placeholder(result.next_birthday.as_deref()),
            location: match (result.address.as_deref(), result.timezone.as_deref()) {
                (Some(addr), Some(tz)) => format!("{} ({})", addr, tz),
                (Some(addr), None) => addr.to_string(),
                _ => PLACEHOLDER.to_string(),
            },
        };

        self.visible = true;
        self.focus_requested = true;
    }
}

/// The fact-card section beneath the summary grid.
#[derive(Debug, Clone, Default)]
pub struct FactPanel {
    pub visible: bool,
    pub cards: Option<FactCards>,
}

impl FactPanel {
    pub fn render(&mut self, cards: FactCards) {
        self.cards = Some(cards);
        self.visible = true;
    }
}

/// Content of a loaded visualization panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualContent {
    /// Panel title (nakshatra name, or event title).
    pub title: String,
    /// Inline image reference assigned directly as the display source.
    pub image: String,
    /// Optional caption line beneath the image.
    pub caption: Option<String>,
}

/// Lifecycle of one visualization panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VisualState {
    /// Section hidden entirely (initial, and after any failure).
    #[default]
    Hidden,
    /// Section revealed with its own loading indicator, title dimmed,
    /// image hidden.
    Loading,
    /// Image revealed, loading indicator gone, title restored.
    Loaded(VisualContent),
}

/// A visualization panel with its own independently-sequenced state.
///
/// Each invocation takes a generation token; a completion is applied only
/// while its token is still current, so a late response from a superseded
/// invocation cannot overwrite newer panel state.
#[derive(Debug, Clone, Default)]
pub struct VisualPanel {
    pub state: VisualState,
    generation: u64,
}

impl VisualPanel {
    /// Starts a new load: reveals the section in its loading state and
    /// returns the token that must accompany the eventual completion.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.state = VisualState::Loading;
        self.generation
    }

    /// Applies a successful completion if `token` is still current.
    /// Returns whether the content was applied.
    pub fn complete(&mut self, token: u64, content: VisualContent) -> bool {
        if token != self.generation {
            return false;
        }
        self.state = VisualState::Loaded(content);
        true
    }

    /// Applies a failed completion if `token` is still current: the whole
    /// section is hidden, never left half-populated.
    pub fn fail(&mut self, token: u64) -> bool {
        if token != self.generation {
            return false;
        }
        self.state = VisualState::Hidden;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.state == VisualState::Loading
    }
}

/// The export control's label and enabled flag.
#[derive(Debug, Clone)]
pub struct ExportControl {
    pub label: String,
    pub enabled: bool,
}

/// Resting label of the export control.
pub const EXPORT_LABEL_IDLE: &str = "Download 20-Year iCal (.ics)";
/// Label shown while generation is in flight.
pub const EXPORT_LABEL_BUSY: &str = "Generating...";

impl Default for ExportControl {
    fn default() -> Self {
        Self {
            label: EXPORT_LABEL_IDLE.to_string(),
            enabled: true,
        }
    }
}

impl ExportControl {
    pub fn begin(&mut self) {
        self.label = EXPORT_LABEL_BUSY.to_string();
        self.enabled = false;
    }

    pub fn restore(&mut self) {
        self.label = EXPORT_LABEL_IDLE.to_string();
        self.enabled = true;
    }
}

/// The geolocation affordance, dimmed while acquisition is in flight.
#[derive(Debug, Clone, Default)]
pub struct GeoAffordance {
    pub dimmed: bool,
}

/// All rendered regions plus the queue of user-facing alerts.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub loader: Indicator,
    pub result: ResultPanel,
    pub facts: FactPanel,
    pub skyshot: VisualPanel,
    pub solar_system: VisualPanel,
    pub export: ExportControl,
    pub geo: GeoAffordance,
    /// Blocking alerts surfaced to the user, oldest first.
    pub alerts: Vec<String>,
}

impl Screen {
    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }
}
