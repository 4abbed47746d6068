//! Panchanga Lookup Client Library
//!
//! This library provides the client-side orchestration layer for a remote
//! panchanga calculation service: collecting the event form, submitting it,
//! decomposing the response into independently-updated view regions,
//! persisting results for the insights handoff, and exporting calendar files.
//!
//! # Modules
//!
//! - `api_client`: HTTP client for the calculation service endpoints.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `export`: iCal filename derivation and download saving.
//! - `form`: Input collector (form state and request snapshots).
//! - `geo`: Geolocation adapter at the platform boundary.
//! - `models`: Wire and persisted data models.
//! - `session`: The submit/render/persist/export orchestration pipeline.
//! - `store`: Dual-channel result store for the insights handoff.
//! - `view`: View-models for every rendered region.
//! - `zodiac`: Sidereal zodiac tables and fact-card derivation.

pub mod api_client;
pub mod config;
pub mod errors;
pub mod export;
pub mod form;
pub mod geo;
pub mod models;
pub mod session;
pub mod store;
pub mod view;
pub mod zodiac;
