//! Configuration shared by the Google Maps adapters.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default base URL for the Google Maps web services.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default user agent for Google Maps requests.
pub const DEFAULT_USER_AGENT: &str = "roundtrip/0.1";

/// Default ceiling on origins × destinations per Distance Matrix request.
pub const DEFAULT_MAX_ELEMENTS: usize = 100;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the traveller moves between waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// On foot.
    #[default]
    Walking,
    /// By car.
    Driving,
    /// By bicycle.
    Bicycling,
    /// By public transport.
    Transit,
}

impl TravelMode {
    /// Value of the `mode` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Driving => "driving",
            Self::Bicycling => "bicycling",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown travel mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown travel mode `{0}` (expected walking, driving, bicycling or transit)")]
pub struct ParseTravelModeError(String);

impl FromStr for TravelMode {
    type Err = ParseTravelModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "walking" => Ok(Self::Walking),
            "driving" => Ok(Self::Driving),
            "bicycling" => Ok(Self::Bicycling),
            "transit" => Ok(Self::Transit),
            _ => Err(ParseTravelModeError(value.to_owned())),
        }
    }
}

/// Configuration for the Google Maps adapters.
#[derive(Clone)]
pub struct GoogleMapsConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// Base URL for the web services, without a trailing service name.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Travel mode for distances and directions.
    pub travel_mode: TravelMode,
    /// Largest number of matrix elements fetched per request.
    pub max_elements: usize,
}

impl fmt::Debug for GoogleMapsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleMapsConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("travel_mode", &self.travel_mode)
            .field("max_elements", &self.max_elements)
            .finish()
    }
}

impl Default for GoogleMapsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            travel_mode: TravelMode::default(),
            max_elements: DEFAULT_MAX_ELEMENTS,
        }
    }
}

impl GoogleMapsConfig {
    /// Create a configuration with the given API key and defaults elsewhere.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Point the adapters at a different host, such as a local stub.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the travel mode.
    #[must_use]
    pub const fn with_travel_mode(mut self, travel_mode: TravelMode) -> Self {
        self.travel_mode = travel_mode;
        self
    }

    /// Set the per-request element ceiling. Zero is raised to one.
    #[must_use]
    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements.max(1);
        self
    }

    /// URL for a JSON web service such as `distancematrix`.
    pub(crate) fn endpoint(&self, service: &str) -> String {
        format!("{}/{service}/json", self.base_url.trim_end_matches('/'))
    }
}
