//! Route store selection shared by every subcommand.

use camino::Utf8Path;
use roundtrip_core::{RouteStore, SystemClock, open_route_store};

/// Open the configured store, falling back to memory when no path is set or
/// the database cannot be opened.
pub(crate) fn open_store(path: Option<&Utf8Path>) -> Box<dyn RouteStore> {
    let store = open_route_store(path.map(Utf8Path::as_std_path), SystemClock);
    log::debug!("using {} route store", store.kind());
    store
}
