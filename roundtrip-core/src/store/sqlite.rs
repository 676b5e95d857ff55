//! SQLite-backed route store.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};

use super::{BackendKind, ROUTE_TTL, RouteCode, RouteStore, StorageError, StoredRoute};
use crate::{Clock, RouteResult, SystemClock};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS routes (
    code TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS routes_expires_at ON routes (expires_at);
";

// Replaces an existing row only once it has expired.
const UPSERT: &str = "
INSERT INTO routes (code, payload, created_at, expires_at)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (code) DO UPDATE SET
    payload = excluded.payload,
    created_at = excluded.created_at,
    expires_at = excluded.expires_at
WHERE routes.expires_at <= ?3
";

/// Persistent [`RouteStore`] backed by a single SQLite table.
///
/// Timestamps are stored as Unix milliseconds and payloads as JSON.
pub struct SqliteRouteStore<C = SystemClock> {
    connection: Mutex<Connection>,
    path: Option<PathBuf>,
    clock: C,
}

impl<C> fmt::Debug for SqliteRouteStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteRouteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteRouteStore<SystemClock> {
    /// Open or create the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] when the file cannot be opened and
    /// [`StorageError::Sqlite`] when the schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with_clock(path, SystemClock)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// See [`SqliteRouteStore::open`].
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::in_memory_with_clock(SystemClock)
    }
}

impl<C: Clock> SqliteRouteStore<C> {
    /// Open or create the database at `path`, reading time from `clock`.
    ///
    /// # Errors
    ///
    /// See [`SqliteRouteStore::open`].
    pub fn open_with_clock(path: impl AsRef<Path>, clock: C) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let connection = Connection::open(path).map_err(|source| StorageError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::initialise(connection, Some(path.to_path_buf()), clock)
    }

    /// Open a private in-memory database reading time from `clock`.
    ///
    /// # Errors
    ///
    /// See [`SqliteRouteStore::open`].
    pub fn in_memory_with_clock(clock: C) -> Result<Self, StorageError> {
        let connection = Connection::open_in_memory().map_err(|source| StorageError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::initialise(connection, None, clock)
    }

    fn initialise(
        connection: Connection,
        path: Option<PathBuf>,
        clock: C,
    ) -> Result<Self, StorageError> {
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .map_err(sqlite("configure the connection"))?;
        connection
            .execute_batch(SCHEMA)
            .map_err(sqlite("create the routes table"))?;
        Ok(Self {
            connection: Mutex::new(connection),
            path,
            clock,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.connection.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl<C: Clock> RouteStore for SqliteRouteStore<C> {
    fn kind(&self) -> BackendKind {
        BackendKind::Persistent
    }

    fn now(&self) -> SystemTime {
        self.clock.now()
    }

    fn put(&self, code: &RouteCode, payload: RouteResult) -> Result<StoredRoute, StorageError> {
        let created_ms = to_millis(self.clock.now())?;
        let expires_ms = to_millis(from_millis(created_ms)? + ROUTE_TTL)?;
        let json = serde_json::to_string(&payload).map_err(|source| StorageError::Encode {
            code: code.clone(),
            source,
        })?;

        let changed = self
            .lock()?
            .execute(UPSERT, params![code.as_str(), json, created_ms, expires_ms])
            .map_err(sqlite("write a route"))?;
        if changed == 0 {
            return Err(StorageError::CodeInUse { code: code.clone() });
        }

        Ok(StoredRoute::from_parts(
            code.clone(),
            payload,
            from_millis(created_ms)?,
            from_millis(expires_ms)?,
        ))
    }

    fn get_record(&self, code: &RouteCode) -> Result<Option<StoredRoute>, StorageError> {
        let now_ms = to_millis(self.clock.now())?;
        let connection = self.lock()?;
        let row = connection
            .query_row(
                "SELECT payload, created_at, expires_at FROM routes WHERE code = ?1",
                params![code.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(sqlite("read a route"))?;

        let Some((json, created_ms, expires_ms)) = row else {
            return Ok(None);
        };
        if now_ms >= expires_ms {
            connection
                .execute(
                    "DELETE FROM routes WHERE code = ?1 AND expires_at <= ?2",
                    params![code.as_str(), now_ms],
                )
                .map_err(sqlite("delete an expired route"))?;
            return Ok(None);
        }

        let payload = serde_json::from_str(&json).map_err(|source| StorageError::Decode {
            code: code.clone(),
            source,
        })?;
        Ok(Some(StoredRoute::from_parts(
            code.clone(),
            payload,
            from_millis(created_ms)?,
            from_millis(expires_ms)?,
        )))
    }

    fn delete(&self, code: &RouteCode) -> Result<(), StorageError> {
        self.lock()?
            .execute("DELETE FROM routes WHERE code = ?1", params![code.as_str()])
            .map_err(sqlite("delete a route"))?;
        Ok(())
    }

    fn expired_codes(&self, now: SystemTime) -> Result<Vec<RouteCode>, StorageError> {
        let now_ms = to_millis(now)?;
        let connection = self.lock()?;
        let mut statement = connection
            .prepare("SELECT code FROM routes WHERE expires_at < ?1 ORDER BY code")
            .map_err(sqlite("scan for expired routes"))?;
        let raw_codes = statement
            .query_map(params![now_ms], |row| row.get::<_, String>(0))
            .map_err(sqlite("scan for expired routes"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(sqlite("scan for expired routes"))?;

        Ok(raw_codes
            .into_iter()
            .filter_map(|raw| match RouteCode::parse(&raw) {
                Ok(code) => Some(code),
                Err(error) => {
                    log::warn!("skipping stored route with malformed code {raw:?}: {error}");
                    None
                }
            })
            .collect())
    }

    fn delete_batch(&self, codes: &[RouteCode]) -> Result<usize, StorageError> {
        let mut connection = self.lock()?;
        let transaction = connection
            .transaction()
            .map_err(sqlite("begin a sweep batch"))?;
        let mut deleted = 0;
        {
            let mut statement = transaction
                .prepare_cached("DELETE FROM routes WHERE code = ?1")
                .map_err(sqlite("prepare a sweep batch"))?;
            for code in codes {
                deleted += statement
                    .execute(params![code.as_str()])
                    .map_err(sqlite("delete in a sweep batch"))?;
            }
        }
        transaction
            .commit()
            .map_err(sqlite("commit a sweep batch"))?;
        Ok(deleted)
    }
}

fn sqlite(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> StorageError {
    move |source| StorageError::Sqlite { operation, source }
}

fn to_millis(time: SystemTime) -> Result<i64, StorageError> {
    let since_epoch = time
        .duration_since(UNIX_EPOCH)
        .map_err(|_| StorageError::InvalidTimestamp)?;
    i64::try_from(since_epoch.as_millis()).map_err(|_| StorageError::InvalidTimestamp)
}

fn from_millis(millis: i64) -> Result<SystemTime, StorageError> {
    let millis = u64::try_from(millis).map_err(|_| StorageError::InvalidTimestamp)?;
    UNIX_EPOCH
        .checked_add(Duration::from_millis(millis))
        .ok_or(StorageError::InvalidTimestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ManualClock, sample_route};
    use rstest::{fixture, rstest};
    use std::sync::Arc;

    #[fixture]
    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::default())
    }

    #[fixture]
    fn code() -> RouteCode {
        RouteCode::parse("SQL00001").expect("code")
    }

    fn store(clock: &Arc<ManualClock>) -> SqliteRouteStore<Arc<ManualClock>> {
        SqliteRouteStore::in_memory_with_clock(Arc::clone(clock)).expect("open store")
    }

    #[rstest]
    fn put_then_get_returns_payload(clock: Arc<ManualClock>, code: RouteCode) {
        let store = store(&clock);
        let payload = sample_route();
        let written = store.put(&code, payload.clone()).expect("put");
        let read = store.get_record(&code).expect("get").expect("present");

        assert_eq!(read.payload(), &payload);
        assert_eq!(read.created_at(), written.created_at());
        assert_eq!(read.expires_at(), written.created_at() + ROUTE_TTL);
    }

    #[rstest]
    fn expired_read_removes_row(clock: Arc<ManualClock>, code: RouteCode) {
        let store = store(&clock);
        store.put(&code, sample_route()).expect("put");
        clock.advance(ROUTE_TTL);

        assert_eq!(store.get(&code).expect("get"), None);
        assert!(store.expired_codes(clock.now() + Duration::from_secs(1)).expect("scan").is_empty());
    }

    #[rstest]
    fn live_code_is_rejected_and_expired_code_reused(clock: Arc<ManualClock>, code: RouteCode) {
        let store = store(&clock);
        store.put(&code, sample_route()).expect("put");
        let err = store.put(&code, sample_route()).expect_err("code in use");
        assert!(matches!(err, StorageError::CodeInUse { .. }));

        clock.advance(ROUTE_TTL);
        store.put(&code, sample_route()).expect("expired code reused");
        assert!(store.get(&code).expect("get").is_some());
    }

    #[rstest]
    fn delete_batch_counts_existing_rows(clock: Arc<ManualClock>) {
        let store = store(&clock);
        let codes: Vec<RouteCode> = ["AAAA0001", "AAAA0002", "AAAA0003"]
            .into_iter()
            .map(|raw| RouteCode::parse(raw).expect("code"))
            .collect();
        for code in codes.iter().take(2) {
            store.put(code, sample_route()).expect("put");
        }

        assert_eq!(store.delete_batch(&codes).expect("batch"), 2);
        assert_eq!(store.delete_batch(&codes).expect("batch"), 0);
    }

    #[rstest]
    fn reopened_file_keeps_routes(clock: Arc<ManualClock>, code: RouteCode) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("routes.db");
        {
            let store = SqliteRouteStore::open_with_clock(&path, Arc::clone(&clock)).expect("open");
            store.put(&code, sample_route()).expect("put");
        }
        let store = SqliteRouteStore::open_with_clock(&path, clock).expect("reopen");
        assert_eq!(store.get(&code).expect("get"), Some(sample_route()));
    }

    #[rstest]
    fn millisecond_conversion_rejects_pre_epoch() {
        assert!(matches!(
            to_millis(UNIX_EPOCH - Duration::from_secs(1)),
            Err(StorageError::InvalidTimestamp)
        ));
        assert!(matches!(from_millis(-1), Err(StorageError::InvalidTimestamp)));
    }
}
