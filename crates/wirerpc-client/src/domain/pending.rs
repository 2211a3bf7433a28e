//! Pending call registry - the only shared mutable state in the core.
//!
//! Maps correlation IDs to completion handlers for outstanding correlated
//! calls. Resolution removes the entry in the same atomic operation, so a
//! response can never fire a handler twice even under concurrent delivery.

use crate::domain::correlation::CorrelationId;
use crate::domain::error::ClientError;
use crate::domain::message::RpcResponse;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Completion handler invoked with the matching response, at most once
pub type ResponseHandler = Box<dyn FnOnce(RpcResponse) + Send + Sync + 'static>;

/// A registered call awaiting its response
pub struct PendingCall {
    id: CorrelationId,
    method: String,
    handler: ResponseHandler,
    created_at: Instant,
    timeout: Duration,
}

impl PendingCall {
    /// Method name of the originating request (for logging)
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Time since the call was registered
    pub fn elapsed(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Invoke the handler with the response, consuming the call.
    ///
    /// Consumption enforces at-most-one invocation by construction.
    pub fn complete(self, response: RpcResponse) {
        debug!(
            correlation_id = %self.id,
            method = %self.method,
            elapsed_ms = self.created_at.elapsed().as_millis() as u64,
            "completing pending call"
        );
        (self.handler)(response);
    }
}

impl std::fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCall")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("created_at", &self.created_at)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Registry statistics
#[derive(Debug, Default)]
pub struct CallStats {
    /// Total calls registered
    pub total_registered: AtomicU64,
    /// Total calls resolved with a response
    pub total_completed: AtomicU64,
    /// Total calls reaped by the expiry sweep
    pub total_timeouts: AtomicU64,
    /// Total calls removed without invocation
    pub total_cancelled: AtomicU64,
}

/// Registry mapping correlation IDs to pending completion handlers.
///
/// Flow:
/// 1. Send path generates a `CorrelationId` and calls `register()`
/// 2. Request goes out over the transport
/// 3. Dispatcher receives the response and calls `resolve()` to claim the
///    entry, then invokes its handler
/// 4. A timed-out waiter calls `remove()` instead, dropping the handler
pub struct PendingCallStore {
    calls: DashMap<CorrelationId, PendingCall>,
    default_timeout: Duration,
    max_pending: usize,
    stats: Arc<CallStats>,
}

impl PendingCallStore {
    /// Create a store with the given default entry lifetime
    pub fn new(default_timeout: Duration) -> Self {
        Self::with_limit(default_timeout, 0)
    }

    /// Create a store with a cap on outstanding calls (0 = unlimited)
    pub fn with_limit(default_timeout: Duration, max_pending: usize) -> Self {
        Self {
            calls: DashMap::new(),
            default_timeout,
            max_pending,
            stats: Arc::new(CallStats::default()),
        }
    }

    /// Insert a new pending call.
    ///
    /// Fails deterministically if the id is already pending; an overwrite
    /// would orphan the previous handler.
    pub fn register(
        &self,
        id: CorrelationId,
        method: &str,
        timeout: Option<Duration>,
        handler: ResponseHandler,
    ) -> Result<(), ClientError> {
        // Soft limit; the sharded map makes the count approximate under contention
        if self.max_pending > 0 && self.calls.len() >= self.max_pending {
            return Err(ClientError::PendingLimitExceeded(self.max_pending));
        }

        let call = PendingCall {
            id,
            method: method.to_string(),
            handler,
            created_at: Instant::now(),
            timeout: timeout.unwrap_or(self.default_timeout),
        };

        match self.calls.entry(id) {
            Entry::Occupied(_) => Err(ClientError::DuplicateCorrelationId(id)),
            Entry::Vacant(vacant) => {
                vacant.insert(call);
                self.stats.total_registered.fetch_add(1, Ordering::Relaxed);
                debug!(correlation_id = %id, method, "registered pending call");
                Ok(())
            }
        }
    }

    /// Atomically look up AND remove the entry for `id`.
    ///
    /// Returns the claimed call, or `None` for unknown, stale, or
    /// already-resolved ids.
    pub fn resolve(&self, id: &CorrelationId) -> Option<PendingCall> {
        match self.calls.remove(id) {
            Some((_, call)) => {
                self.stats.total_completed.fetch_add(1, Ordering::Relaxed);
                Some(call)
            }
            None => None,
        }
    }

    /// Delete an entry without invoking its handler (timeout cleanup).
    ///
    /// Returns true if an entry was removed.
    pub fn remove(&self, id: &CorrelationId) -> bool {
        if self.calls.remove(id).is_some() {
            self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Remove entries older than their timeout (TTL sweep).
    ///
    /// Reaps calls whose waiter has given up without cleaning up, and
    /// asynchronous calls whose response never arrived. Returns the number
    /// of entries removed.
    pub fn remove_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.calls.retain(|id, call| {
            let elapsed = now.duration_since(call.created_at);
            if elapsed > call.timeout {
                warn!(
                    correlation_id = %id,
                    method = %call.method,
                    elapsed_ms = elapsed.as_millis() as u64,
                    timeout_ms = call.timeout.as_millis() as u64,
                    "removing expired pending call"
                );
                self.stats.total_timeouts.fetch_add(1, Ordering::Relaxed);
                removed += 1;
                false
            } else {
                true
            }
        });

        removed
    }

    /// Remove and return every entry (used by `close()` to abandon all calls)
    pub fn drain(&self) -> Vec<PendingCall> {
        let ids: Vec<CorrelationId> = self.calls.iter().map(|entry| *entry.key()).collect();
        let drained: Vec<PendingCall> = ids
            .into_iter()
            .filter_map(|id| self.calls.remove(&id).map(|(_, call)| call))
            .collect();
        self.stats
            .total_cancelled
            .fetch_add(drained.len() as u64, Ordering::Relaxed);
        drained
    }

    /// Number of currently pending calls
    pub fn pending_count(&self) -> usize {
        self.calls.len()
    }

    /// Check whether a correlation id is pending
    pub fn is_pending(&self, id: &CorrelationId) -> bool {
        self.calls.contains_key(id)
    }

    /// Registry statistics
    pub fn stats(&self) -> &CallStats {
        &self.stats
    }
}

/// Background task reaping expired pending calls
pub async fn expiry_sweeper(store: Arc<PendingCallStore>, interval: Duration) {
    let mut sweep_interval = tokio::time::interval(interval);
    sweep_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        sweep_interval.tick().await;
        let removed = store.remove_expired();
        if removed > 0 {
            debug!(removed, "swept expired pending calls");
        }
    }
}
