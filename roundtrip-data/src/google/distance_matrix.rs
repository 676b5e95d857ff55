//! `DistanceMatrixSource` backed by the Google Distance Matrix API.

use std::ops::Range;
use std::sync::Arc;

use roundtrip_core::{DistanceMatrix, DistanceMatrixSource, LegCost, ProviderError};

use super::client::{ClientBuildError, GoogleClient};
use super::config::GoogleMapsConfig;
use super::types::{DistanceMatrixResponse, MatrixElement, ServiceStatus};

/// Most origins, or destinations, Google accepts in one request.
pub const MAX_AXIS_ADDRESSES: usize = 25;

const SERVICE: &str = "distancematrix";

/// Block of the full matrix fetched by a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Tile {
    origins: Range<usize>,
    destinations: Range<usize>,
}

/// Split an `n × n` matrix into request-sized tiles.
///
/// Destinations are chunked first, up to the axis limit; origins then take
/// as many rows as the element ceiling allows.
fn tiles(size: usize, max_elements: usize) -> Vec<Tile> {
    let max_elements = max_elements.max(1);
    let destination_step = size.min(MAX_AXIS_ADDRESSES).min(max_elements).max(1);
    let origin_step = (max_elements / destination_step).clamp(1, MAX_AXIS_ADDRESSES);

    let mut tiles = Vec::new();
    for origin_start in (0..size).step_by(origin_step) {
        let origins = origin_start..(origin_start + origin_step).min(size);
        for destination_start in (0..size).step_by(destination_step) {
            tiles.push(Tile {
                origins: origins.clone(),
                destinations: destination_start..(destination_start + destination_step).min(size),
            });
        }
    }
    tiles
}

/// Distance matrix source that queries Google Maps.
///
/// Requests are tiled so none exceeds [`MAX_AXIS_ADDRESSES`] origins or
/// destinations, or the configured element ceiling. Elements Google cannot
/// route become unreachable cells; the diagonal is always zero.
///
/// # Example
///
/// ```no_run
/// use roundtrip_core::DistanceMatrixSource;
/// use roundtrip_data::google::{GoogleDistanceMatrixSource, GoogleMapsConfig};
///
/// let source = GoogleDistanceMatrixSource::new(GoogleMapsConfig::new("api-key"))?;
/// let matrix = source.fetch(&["1 Main St".to_owned(), "2 Elm Rd".to_owned()])?;
/// assert_eq!(matrix.size(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct GoogleDistanceMatrixSource {
    client: Arc<GoogleClient>,
}

impl GoogleDistanceMatrixSource {
    /// Build a source with its own client.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn new(config: GoogleMapsConfig) -> Result<Self, ClientBuildError> {
        Ok(Self::with_client(Arc::new(GoogleClient::new(config)?)))
    }

    /// Build a source sharing an existing client.
    #[must_use]
    pub const fn with_client(client: Arc<GoogleClient>) -> Self {
        Self { client }
    }

    fn fetch_tile(
        &self,
        addresses: &[String],
        tile: &Tile,
        cells: &mut [Vec<Option<LegCost>>],
    ) -> Result<(), ProviderError> {
        let origins = join_addresses(addresses, &tile.origins);
        let destinations = join_addresses(addresses, &tile.destinations);
        let response: DistanceMatrixResponse = self.client.get_json(
            SERVICE,
            &[("origins", origins.as_str()), ("destinations", destinations.as_str())],
        )?;
        fill_tile(response, tile, cells)
    }
}

impl DistanceMatrixSource for GoogleDistanceMatrixSource {
    fn fetch(&self, addresses: &[String]) -> Result<DistanceMatrix, ProviderError> {
        if addresses.is_empty() {
            return Err(ProviderError::EmptyInput);
        }

        let size = addresses.len();
        let tiles = tiles(size, self.client.config().max_elements);
        log::debug!(
            "fetching {size}x{size} distance matrix in {} request(s)",
            tiles.len()
        );

        let mut cells = vec![vec![None; size]; size];
        for tile in &tiles {
            self.fetch_tile(addresses, tile, &mut cells)?;
        }

        Ok(DistanceMatrix::from_fn(size, |from, to| {
            if from == to {
                return Some(LegCost::default());
            }
            cells.get(from).and_then(|row| row.get(to)).copied().flatten()
        }))
    }
}

fn join_addresses(addresses: &[String], range: &Range<usize>) -> String {
    addresses
        .get(range.clone())
        .unwrap_or_default()
        .join("|")
}

/// Copy one response into the matching block of `cells`.
fn fill_tile(
    response: DistanceMatrixResponse,
    tile: &Tile,
    cells: &mut [Vec<Option<LegCost>>],
) -> Result<(), ProviderError> {
    if !response.is_ok() {
        return Err(response.service_error());
    }

    let shape_ok = response.rows.len() == tile.origins.len()
        && response
            .rows
            .iter()
            .all(|row| row.elements.len() == tile.destinations.len());
    if !shape_ok {
        return Err(ProviderError::Parse {
            message: format!(
                "expected {}x{} elements in distance matrix response",
                tile.origins.len(),
                tile.destinations.len()
            ),
        });
    }

    for (from, row) in tile.origins.clone().zip(response.rows) {
        let Some(target) = cells.get_mut(from) else {
            continue;
        };
        for (to, element) in tile.destinations.clone().zip(row.elements) {
            if let Some(cell) = target.get_mut(to) {
                *cell = leg_cost(&element);
                if cell.is_none() {
                    log::debug!("no route from {from} to {to}: {}", element.status);
                }
            }
        }
    }
    Ok(())
}

fn leg_cost(element: &MatrixElement) -> Option<LegCost> {
    if !element.is_ok() {
        return None;
    }
    match (element.distance, element.duration) {
        (Some(distance), Some(duration)) => Some(LegCost::new(distance.value, duration.value)),
        _ => None,
    }
}
