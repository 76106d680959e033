// Copyright (c) 2025 - Cowboy AI, Inc.

//! Least-errors connection selection
//!
//! The selector is a two-state machine:
//!
//! ```text
//!            report_error()
//!   Clean ───────────────────> Dirty
//!     ^                          │
//!     └──── active(): rescan ────┘
//! ```
//!
//! While clean, [`ConnectionSelector::active`] hands back the cached
//! connection without looking at the pool. A reported error only marks the
//! selector dirty; the rescan happens on the next `active()` call, so a
//! failing request never switches connections mid-flight.

use parking_lot::Mutex;
use tracing::{info, warn};

use super::pool::{ConnectionDescriptor, ConnectionPool};
use crate::errors::{PluginError, PluginResult};

/// Whether the cached connection may no longer be the healthiest one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    Clean,
    Dirty,
}

#[derive(Debug)]
struct SelectorInner {
    pool: ConnectionPool,
    current: u32,
    state: SelectorState,
}

/// Chooses the active controller connection
///
/// Pool counters, the cached connection and the dirty flag sit behind one
/// mutex, so `active()` and `report_error()` never interleave.
#[derive(Debug)]
pub struct ConnectionSelector {
    inner: Mutex<SelectorInner>,
}

impl ConnectionSelector {
    /// Take ownership of a loaded pool; the first connection starts active
    pub fn new(pool: ConnectionPool) -> PluginResult<Self> {
        if pool.is_empty() {
            return Err(PluginError::ConfigurationError(
                "no controller connections configured".to_string(),
            ));
        }

        Ok(Self {
            inner: Mutex::new(SelectorInner {
                pool,
                current: 0,
                state: SelectorState::Clean,
            }),
        })
    }

    /// Current connection, rescanning the pool first if marked dirty
    pub fn active(&self) -> ConnectionDescriptor {
        let mut inner = self.inner.lock();

        if inner.state == SelectorState::Dirty {
            let previous = inner.current;
            if let Some(best) = inner.pool.least_errors() {
                inner.current = best;
            }
            inner.state = SelectorState::Clean;

            if inner.current != previous {
                if let (Some(from), Some(to)) =
                    (inner.pool.get(previous), inner.pool.get(inner.current))
                {
                    info!(
                        "Failing over controller connection from {} to {}",
                        from.describe(),
                        to.describe()
                    );
                }
            }
        }

        // current always indexes the non-empty pool
        inner.pool.descriptor(inner.current).clone()
    }

    /// Count a failed request against a connection and mark the selector dirty
    pub fn report_error(&self, descriptor: &ConnectionDescriptor) {
        let mut inner = self.inner.lock();

        if let Some(conn) = inner.pool.get_mut(descriptor.sequence_id) {
            conn.error_count += 1;
            warn!(
                "Controller connection {} error count now {}",
                conn.describe(),
                conn.error_count
            );
        }
        inner.state = SelectorState::Dirty;
    }

    pub fn state(&self) -> SelectorState {
        self.inner.lock().state
    }

    /// Error count recorded for a connection
    pub fn error_count(&self, sequence_id: u32) -> Option<u64> {
        self.inner.lock().pool.get(sequence_id).map(|c| c.error_count)
    }

    /// Copy of every descriptor with its current counters
    pub fn snapshot(&self) -> Vec<ConnectionDescriptor> {
        self.inner.lock().pool.iter().cloned().collect()
    }
}
