//! Behavioural tests for the ephemeral route stores using rstest-bdd.

use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::time::Duration;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use roundtrip_core::test_support::{FailingBatchStore, ManualClock, clean_sweep, sample_route};
use roundtrip_core::{
    BackendKind, Clock, MemoryRouteStore, ROUTE_TTL, RouteCode, RouteStore, SqliteRouteStore,
    SweepReport, open_route_store,
};
use tempfile::TempDir;

/// Shared state for route store scenarios.
struct RouteStoreWorld {
    temp_dir: TempDir,
    clock: Arc<ManualClock>,
    store: RefCell<Option<Box<dyn RouteStore>>>,
    live_codes: RefCell<Vec<RouteCode>>,
    next_index: Cell<usize>,
    report: RefCell<Option<SweepReport>>,
}

impl RouteStoreWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            clock: Arc::new(ManualClock::default()),
            store: RefCell::new(None),
            live_codes: RefCell::new(Vec::new()),
            next_index: Cell::new(0),
            report: RefCell::new(None),
        }
    }

    fn install(&self, store: impl RouteStore + 'static) {
        self.store.replace(Some(Box::new(store)));
    }

    fn with_store<T>(&self, action: impl FnOnce(&dyn RouteStore) -> T) -> T {
        let borrowed = self.store.borrow();
        let store = borrowed
            .as_deref()
            .expect("store should be opened before use");
        action(store)
    }

    fn next_code(&self, prefix: char) -> RouteCode {
        let index = self.next_index.get();
        self.next_index.set(index + 1);
        RouteCode::parse(&format!("{prefix}{index:07}")).expect("generated code is valid")
    }
}

#[fixture]
fn world() -> RouteStoreWorld {
    RouteStoreWorld::new()
}

fn parse_code(raw: &str) -> RouteCode {
    RouteCode::parse(raw.trim_matches('"')).expect("scenario code is valid")
}

#[given("an in-memory route store")]
fn given_memory_store(world: &RouteStoreWorld) {
    world.install(MemoryRouteStore::with_clock(Arc::clone(&world.clock)));
}

#[given("an in-memory route store whose second sweep batch fails")]
fn given_failing_store(world: &RouteStoreWorld) {
    let inner = MemoryRouteStore::with_clock(Arc::clone(&world.clock));
    world.install(FailingBatchStore::new(inner, [1]));
}

#[given("a SQLite route store in a temporary directory")]
fn given_sqlite_store(world: &RouteStoreWorld) {
    let path = world.temp_dir.path().join("routes.db");
    let store =
        SqliteRouteStore::open_with_clock(&path, Arc::clone(&world.clock)).expect("open store");
    world.install(store);
}

#[given("an in-memory SQLite route store")]
fn given_in_memory_sqlite_store(world: &RouteStoreWorld) {
    let store =
        SqliteRouteStore::in_memory_with_clock(Arc::clone(&world.clock)).expect("open store");
    world.install(store);
}

#[given("a route store opened at a path whose directory does not exist")]
fn given_unusable_path(world: &RouteStoreWorld) {
    let path = world.temp_dir.path().join("absent").join("routes.db");
    let store = open_route_store(Some(&path), Arc::clone(&world.clock));
    world.store.replace(Some(store));
}

#[given("{count} routes that have expired")]
fn given_expired_routes(world: &RouteStoreWorld, count: usize) {
    let now = world.clock.now();
    world
        .clock
        .set(now - ROUTE_TTL - Duration::from_secs(60));
    world.with_store(|store| {
        for _ in 0..count {
            store
                .put(&world.next_code('E'), sample_route())
                .expect("put expired route");
        }
    });
    world.clock.set(now);
}

#[given("{count} routes that are still live")]
fn given_live_routes(world: &RouteStoreWorld, count: usize) {
    world.with_store(|store| {
        for _ in 0..count {
            let code = world.next_code('L');
            store.put(&code, sample_route()).expect("put live route");
            world.live_codes.borrow_mut().push(code);
        }
    });
}

#[when("I store the sample route under code {code}")]
fn when_store_route(world: &RouteStoreWorld, code: String) {
    let code = parse_code(&code);
    world.with_store(|store| store.put(&code, sample_route()).expect("put route"));
}

#[when("{hours} hours pass")]
fn when_hours_pass(world: &RouteStoreWorld, hours: u64) {
    world.clock.advance(Duration::from_secs(hours * 60 * 60));
}

#[when("the store is swept")]
fn when_swept(world: &RouteStoreWorld) {
    let report = world.with_store(|store| store.sweep().expect("scan succeeds"));
    world.report.replace(Some(report));
}

#[then("reading code {code} returns the sample route")]
fn then_reads_route(world: &RouteStoreWorld, code: String) {
    let code = parse_code(&code);
    let found = world.with_store(|store| store.get(&code).expect("get route"));
    assert_eq!(found, Some(sample_route()));
}

#[then("reading code {code} returns nothing")]
fn then_reads_nothing(world: &RouteStoreWorld, code: String) {
    let code = parse_code(&code);
    let found = world.with_store(|store| store.get(&code).expect("get route"));
    assert_eq!(found, None);
}

#[then("no expired codes remain")]
fn then_no_expired_codes(world: &RouteStoreWorld) {
    let later = world.clock.now() + Duration::from_secs(1);
    let codes = world.with_store(|store| store.expired_codes(later).expect("scan"));
    assert!(codes.is_empty(), "expected lazy expiry to remove the row");
}

#[then("the sweep deleted {deleted} routes in {batches} batches with {errors} errors")]
fn then_sweep_report(world: &RouteStoreWorld, deleted: usize, batches: usize, errors: usize) {
    let report = world.report.borrow().expect("sweep should have run");
    assert_eq!(
        report,
        SweepReport {
            errors,
            ..clean_sweep(deleted, batches)
        }
    );
}

#[then("{count} routes remain readable")]
fn then_live_routes_remain(world: &RouteStoreWorld, count: usize) {
    let live = world.live_codes.borrow();
    assert_eq!(live.len(), count);
    world.with_store(|store| {
        for code in live.iter() {
            assert!(store.get(code).expect("get route").is_some(), "{code} was swept");
        }
        assert!(store.expired_codes(store.now()).expect("scan").is_empty());
    });
}

#[then("the store reports an in-memory backend")]
fn then_in_memory(world: &RouteStoreWorld) {
    assert_eq!(world.with_store(|store| store.kind()), BackendKind::InMemory);
}

#[scenario(path = "tests/features/route_store.feature", index = 0)]
fn memory_round_trip(world: RouteStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_store.feature", index = 1)]
fn sqlite_round_trip(world: RouteStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_store.feature", index = 2)]
fn lazy_expiry(world: RouteStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_store.feature", index = 3)]
fn bounded_sweep(world: RouteStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_store.feature", index = 4)]
fn failing_batch(world: RouteStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_store.feature", index = 5)]
fn fallback_to_memory(world: RouteStoreWorld) {
    let _ = world;
}
