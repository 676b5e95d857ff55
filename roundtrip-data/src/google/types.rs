//! Google Maps web service response types.
//!
//! Only the fields the adapters read are modelled; serde skips the rest.
//!
//! See: <https://developers.google.com/maps/documentation/distance-matrix/distance-matrix>
//! and <https://developers.google.com/maps/documentation/directions/get-directions>

use roundtrip_core::ProviderError;
use serde::Deserialize;

/// Status reported by Google for a successful request or element.
pub const STATUS_OK: &str = "OK";

/// Distance Matrix API response.
#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    /// Top-level status, e.g. `"OK"`, `"REQUEST_DENIED"`,
    /// `"MAX_ELEMENTS_EXCEEDED"`.
    pub status: String,
    /// Explanation accompanying a non-`OK` status.
    pub error_message: Option<String>,
    /// One row per origin.
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

/// A row of the Distance Matrix response.
#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    /// One element per destination.
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

/// A single origin/destination pair.
#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    /// Element status, e.g. `"OK"`, `"NOT_FOUND"`, `"ZERO_RESULTS"`.
    pub status: String,
    /// Distance in metres.
    pub distance: Option<Measure>,
    /// Duration in seconds.
    pub duration: Option<Measure>,
}

/// A measured value with its human-readable rendering dropped.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Measure {
    /// Integer value in the API's base unit.
    pub value: u64,
}

/// Directions API response.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    /// Top-level status, e.g. `"OK"`, `"ZERO_RESULTS"`, `"NOT_FOUND"`.
    pub status: String,
    /// Explanation accompanying a non-`OK` status.
    pub error_message: Option<String>,
    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

/// A route returned by the Directions API.
#[derive(Debug, Deserialize)]
pub struct DirectionsRoute {
    /// Optimised visiting order as positions into the request's waypoints.
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
}

/// Shared accessors for top-level statuses.
pub trait ServiceStatus {
    /// Reported status.
    fn status(&self) -> &str;
    /// Reported explanation, if any.
    fn error_message(&self) -> Option<&str>;

    /// Whether the service accepted the request.
    fn is_ok(&self) -> bool {
        self.status() == STATUS_OK
    }

    /// Error describing a rejected request.
    fn service_error(&self) -> ProviderError {
        ProviderError::Service {
            status: self.status().to_owned(),
            message: self.error_message().unwrap_or_default().to_owned(),
        }
    }
}

impl ServiceStatus for DistanceMatrixResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl ServiceStatus for DirectionsResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl MatrixElement {
    /// Whether the element carries a usable route.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_matrix_response() {
        let json = r#"{
            "destination_addresses": ["B", "C"],
            "origin_addresses": ["A"],
            "rows": [{
                "elements": [
                    {"status": "OK",
                     "distance": {"text": "1.2 km", "value": 1200},
                     "duration": {"text": "15 mins", "value": 900}},
                    {"status": "NOT_FOUND"}
                ]
            }],
            "status": "OK"
        }"#;

        let response: DistanceMatrixResponse =
            serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let elements = &response.rows.first().expect("one row").elements;
        assert_eq!(elements.len(), 2);
        let first = elements.first().expect("first element");
        assert!(first.is_ok());
        assert_eq!(first.distance.map(|m| m.value), Some(1200));
        assert_eq!(first.duration.map(|m| m.value), Some(900));
        assert!(!elements.get(1).expect("second element").is_ok());
    }

    #[test]
    fn deserialise_error_response() {
        let json = r#"{
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }"#;

        let response: DistanceMatrixResponse =
            serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert!(response.rows.is_empty());
        assert_eq!(
            response.service_error(),
            ProviderError::Service {
                status: "REQUEST_DENIED".to_owned(),
                message: "The provided API key is invalid.".to_owned(),
            }
        );
    }

    #[test]
    fn deserialise_directions_response() {
        let json = r#"{
            "status": "OK",
            "routes": [{"summary": "A1", "waypoint_order": [2, 0, 1], "legs": []}]
        }"#;

        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let route = response.routes.first().expect("one route");
        assert_eq!(route.waypoint_order, vec![2, 0, 1]);
    }
}
