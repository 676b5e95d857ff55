//! Share code allocation.

use roundtrip_core::{ROUTE_CODE_LEN, RouteCode, RouteResult, RouteStore, StorageError, StoredRoute};
use uuid::Uuid;

use crate::CliError;

/// Codes tried before giving up on a crowded store.
pub(crate) const MAX_CODE_ATTEMPTS: usize = 5;

/// A fresh code from the leading hex digits of a random UUID.
pub(crate) fn random_code() -> Result<RouteCode, CliError> {
    let hex: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(ROUTE_CODE_LEN)
        .collect();
    Ok(RouteCode::parse(&hex)?)
}

/// Store `result` under the first code from `next_code` that is not live.
pub(crate) fn store_with_fresh_code<F>(
    store: &dyn RouteStore,
    result: RouteResult,
    mut next_code: F,
) -> Result<StoredRoute, CliError>
where
    F: FnMut() -> Result<RouteCode, CliError>,
{
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = next_code()?;
        match store.put(&code, result.clone()) {
            Ok(stored) => return Ok(stored),
            Err(StorageError::CodeInUse { .. }) => {
                log::debug!("route code {code} is taken (attempt {attempt})");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(CliError::CodesExhausted {
        attempts: MAX_CODE_ATTEMPTS,
    })
}
