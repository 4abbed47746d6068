use chrono::Local;

use crate::models::{Lang, RequestRecord, VisualizationRequest};

/// Current values of the five input controls.
///
/// Every submission-type action snapshots this state fresh, so mid-session
/// edits are always honored by the next action.
#[derive(Debug, Clone)]
pub struct FormState {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub lang: Lang,
}

impl FormState {
    /// An empty form with date and time seeded to the current moment.
    pub fn new() -> Self {
        let now = Local::now();
        Self {
            title: String::new(),
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M").to_string(),
            location: String::new(),
            lang: Lang::En,
        }
    }

    /// Reads the controls into a full submission record.
    pub fn snapshot(&self) -> RequestRecord {
        RequestRecord {
            title: self.title.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            location: self.location.clone(),
            lang: self.lang,
        }
    }

    /// Reads the controls into a visualization request.
    pub fn visualization_request(&self) -> VisualizationRequest {
        VisualizationRequest {
            date: self.date.clone(),
            time: self.time.clone(),
            location: self.location.clone(),
            title: self.title.clone(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
