//! Process-wide dispatch counters.
//! Cheap atomics bumped on the hot path; `snapshot()` copies them out for
//! logging or tests.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::mud::dispatch::Rejection;

static DISPATCHED: AtomicU64 = AtomicU64::new(0);
static HANDLER_FAILURES: AtomicU64 = AtomicU64::new(0);
static MOVES: AtomicU64 = AtomicU64::new(0);
static REJECTED_NOT_FOUND: AtomicU64 = AtomicU64::new(0);
static REJECTED_AMBIGUOUS: AtomicU64 = AtomicU64::new(0);
static REJECTED_COMBAT: AtomicU64 = AtomicU64::new(0);
static REJECTED_VOID: AtomicU64 = AtomicU64::new(0);

static COMMAND_COUNTS: OnceLock<Mutex<HashMap<String, u64>>> = OnceLock::new();

pub fn inc_dispatched() {
    DISPATCHED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_handler_failures() {
    HANDLER_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_moves() {
    MOVES.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_rejection(rejection: Rejection) {
    let counter = match rejection {
        Rejection::NotFound => &REJECTED_NOT_FOUND,
        Rejection::Ambiguous => &REJECTED_AMBIGUOUS,
        Rejection::BlockedByCombat => &REJECTED_COMBAT,
        Rejection::VoidDestination => &REJECTED_VOID,
    };
    counter.fetch_add(1, Ordering::Relaxed);
}

fn command_counts_lock() -> &'static Mutex<HashMap<String, u64>> {
    COMMAND_COUNTS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Count one invocation of the command typed as `name` (aliases count separately).
pub fn record_command(name: &str) -> u64 {
    let mut guard = command_counts_lock().lock().unwrap_or_else(|e| e.into_inner());
    let count = guard.entry(name.to_string()).or_default();
    *count = count.saturating_add(1);
    *count
}

pub fn command_counts_snapshot() -> HashMap<String, u64> {
    command_counts_lock()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub dispatched: u64,
    pub handler_failures: u64,
    pub moves: u64,
    pub rejected_not_found: u64,
    pub rejected_ambiguous: u64,
    pub rejected_combat: u64,
    pub rejected_void: u64,
}

impl Snapshot {
    pub fn rejected_total(&self) -> u64 {
        self.rejected_not_found + self.rejected_ambiguous + self.rejected_combat + self.rejected_void
    }
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        dispatched: DISPATCHED.load(Ordering::Relaxed),
        handler_failures: HANDLER_FAILURES.load(Ordering::Relaxed),
        moves: MOVES.load(Ordering::Relaxed),
        rejected_not_found: REJECTED_NOT_FOUND.load(Ordering::Relaxed),
        rejected_ambiguous: REJECTED_AMBIGUOUS.load(Ordering::Relaxed),
        rejected_combat: REJECTED_COMBAT.load(Ordering::Relaxed),
        rejected_void: REJECTED_VOID.load(Ordering::Relaxed),
    }
}
