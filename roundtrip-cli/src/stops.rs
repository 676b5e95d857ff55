//! Turning command-line and file input into waypoints.

use std::io::BufReader;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use roundtrip_core::Waypoint;
use serde::Deserialize;

use crate::CliError;

/// Separates an address from its notes in `--stop` values.
const NOTES_SEPARATOR: char = '|';

/// One entry of a stops file.
#[derive(Debug, Deserialize)]
struct StopEntry {
    address: String,
    #[serde(default)]
    notes: String,
}

/// Build the home waypoint.
pub(crate) fn parse_home(value: &str) -> Result<Waypoint, CliError> {
    Waypoint::home(value).map_err(|source| CliError::InvalidWaypoint {
        value: value.to_owned(),
        source,
    })
}

/// Parse `address` or `address|notes`.
pub(crate) fn parse_stop(value: &str) -> Result<Waypoint, CliError> {
    let (address, notes) = value
        .split_once(NOTES_SEPARATOR)
        .unwrap_or((value, ""));
    Waypoint::stop(address, notes.trim()).map_err(|source| CliError::InvalidWaypoint {
        value: value.to_owned(),
        source,
    })
}

/// Load a JSON array of `{ "address": ..., "notes": ... }` objects.
pub(crate) fn load_stops_file(path: &Utf8Path) -> Result<Vec<Waypoint>, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenStopsFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let entries: Vec<StopEntry> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            CliError::ParseStopsFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
    entries
        .into_iter()
        .map(|entry| {
            Waypoint::stop(entry.address.as_str(), entry.notes).map_err(|source| {
                CliError::InvalidWaypoint {
                    value: entry.address,
                    source,
                }
            })
        })
        .collect()
}
