use crate::store::TimeKeyedStore;
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Row label for responses whose request could not be found.
pub const UNDEFINED_REQUEST: &str = "undefined";

/// Request path -> result code -> count.
pub type StatsTable = BTreeMap<String, BTreeMap<String, u64>>;

/// Counters for one output interval.
///
/// Guarded by its own lock; the aggregator and the output gate are the only
/// parties that take it.
#[derive(Debug, Default)]
pub struct StatsWindow {
    table: Mutex<StatsTable>,
}

impl StatsWindow {
    pub fn lock(&self) -> MutexGuard<'_, StatsTable> {
        self.table.lock()
    }

    pub fn increment(&self, request: &str, result_code: &str) {
        let mut table = self.table.lock();
        *table
            .entry(request.to_string())
            .or_default()
            .entry(result_code.to_string())
            .or_insert(0) += 1;
    }

    pub fn snapshot(&self) -> StatsTable {
        self.table.lock().clone()
    }
}

pub type StatsStore = TimeKeyedStore<StatsWindow>;
