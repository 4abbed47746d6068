use std::fmt;

/// A coordinate pair from the platform's position API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    /// Locale-invariant `"latitude, longitude"` rendering, suitable for the
    /// location field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Why a position could not be acquired.
#[derive(Debug, Clone)]
pub enum GeoError {
    /// The platform offers no position API at all.
    Unsupported,
    /// The call was made but rejected or failed.
    Unavailable(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::Unsupported => write!(f, "geolocation is not supported"),
            GeoError::Unavailable(msg) => write!(f, "position unavailable: {}", msg),
        }
    }
}

impl std::error::Error for GeoError {}

/// Seam over the platform's position API: one call, two outcomes, no retry
/// and no client-side timeout.
pub trait PositionSource {
    /// Whether the platform offers a position API; checked synchronously
    /// before any acquisition is attempted.
    fn supported(&self) -> bool;

    /// Acquires the current position once.
    fn current_position(&self) -> Result<Coordinates, GeoError>;
}

/// Position source backed by `PANCHANGA_GEO_LAT` / `PANCHANGA_GEO_LON`,
/// the platform hook available to a headless client.
#[derive(Debug, Clone, Default)]
pub struct EnvPositionSource;

impl PositionSource for EnvPositionSource {
    fn supported(&self) -> bool {
        std::env::var_os("PANCHANGA_GEO_LAT").is_some()
            && std::env::var_os("PANCHANGA_GEO_LON").is_some()
    }

    fn current_position(&self) -> Result<Coordinates, GeoError> {
        let lat = std::env::var("PANCHANGA_GEO_LAT")
            .map_err(|_| GeoError::Unsupported)?
            .trim()
            .parse::<f64>()
            .map_err(|e| GeoError::Unavailable(format!("bad latitude: {}", e)))?;
        let lon = std::env::var("PANCHANGA_GEO_LON")
            .map_err(|_| GeoError::Unsupported)?
            .trim()
            .parse::<f64>()
            .map_err(|e| GeoError::Unavailable(format!("bad longitude: {}", e)))?;
        Ok(Coordinates {
            latitude: lat,
            longitude: lon,
        })
    }
}
