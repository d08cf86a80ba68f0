use std::fmt;
use std::time::{Duration, Instant};

use crate::config::SegueConfig;
use crate::foundation::core::ClipDurations;
use crate::foundation::error::SegueError;
use crate::graph::clamp::clamp_for_clips;
use crate::graph::graph::TransitionGraph;
use crate::store::bridge::StoreBridge;
use crate::sync::apply::{apply_add, apply_remove};
use crate::sync::queue::{PendingOperation, PendingQueue};
use crate::sync::timer::IntervalTimer;
use crate::sync::topology::TopologySnapshot;

/// Whether the engine has seen the store yet. There is no transition back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// No store located so far; requests are queued.
    Disconnected,
    /// The store was located at least once.
    Connected,
}

/// Signal delivered to subscribers.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncEvent {
    /// The store was located for the first time.
    StoreConnected,
    /// Clip layout changed since the previous tick.
    TopologyChanged(TopologySnapshot),
    /// A queued operation failed during replay and was discarded.
    OperationDropped {
        /// The discarded operation.
        op: PendingOperation,
        /// Display form of the failure.
        reason: String,
    },
}

/// Outcome of one [`SyncEngine::poll_tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Whether the store was reachable during this tick.
    pub connected: bool,
    /// Queued operations applied.
    pub applied: usize,
    /// Queued operations dropped.
    pub dropped: usize,
    /// Whether a topology change was detected.
    pub topology_changed: bool,
}

type Subscriber = Box<dyn FnMut(&SyncEvent)>;

/// Keeps the transition graph consistent with a store that appears late and changes
/// underneath it.
///
/// Single-threaded: the host calls [`SyncEngine::advance`] from its own loop (or
/// [`SyncEngine::poll_tick`] directly).
pub struct SyncEngine {
    state: ConnectionState,
    queue: PendingQueue,
    last_topology: Option<TopologySnapshot>,
    timer: Option<IntervalTimer>,
    subscribers: Vec<Subscriber>,
    // Set when a dropped replay left optimistic mirror edits behind.
    stale_mirror: bool,
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("state", &self.state)
            .field("queued", &self.queue.len())
            .field("last_topology", &self.last_topology)
            .field("timer", &self.timer)
            .field("subscribers", &self.subscribers.len())
            .field("stale_mirror", &self.stale_mirror)
            .finish()
    }
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::with_interval(SegueConfig::default().poll_interval())
    }
}

impl SyncEngine {
    /// Engine polling at the configured interval.
    pub fn new(cfg: &SegueConfig) -> Self {
        Self::with_interval(cfg.poll_interval())
    }

    /// Engine polling every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            queue: PendingQueue::default(),
            last_topology: None,
            timer: Some(IntervalTimer::new(interval)),
            subscribers: Vec::new(),
            stale_mirror: false,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the store has been located.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Operations waiting for the store, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &PendingOperation> {
        self.queue.iter()
    }

    /// Number of queued operations.
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Last topology digest seen.
    pub fn last_topology(&self) -> Option<TopologySnapshot> {
        self.last_topology
    }

    /// Queue an operation for the next tick.
    pub fn enqueue(&mut self, op: PendingOperation) {
        tracing::debug!(op = op.kind(), queued = self.queue.len() + 1, "queued operation");
        self.queue.push(op);
    }

    /// Register a callback for every [`SyncEvent`].
    pub fn subscribe(&mut self, f: impl FnMut(&SyncEvent) + 'static) {
        self.subscribers.push(Box::new(f));
    }

    /// Drive the polling timer from the host clock; ticks when an interval has elapsed.
    pub fn advance(
        &mut self,
        now: Instant,
        bridge: &StoreBridge,
        graph: &mut TransitionGraph,
    ) -> Option<TickReport> {
        let due = self.timer.as_mut().is_some_and(|t| t.advance(now));
        due.then(|| self.poll_tick(bridge, graph))
    }

    /// Release the polling timer. Idempotent; manual [`SyncEngine::poll_tick`] stays legal.
    pub fn stop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
            tracing::debug!("sync timer stopped");
        }
    }

    /// Whether [`SyncEngine::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.timer.is_none()
    }

    /// One synchronization pass.
    #[tracing::instrument(skip_all, fields(state = ?self.state, queued = self.queue.len()))]
    pub fn poll_tick(&mut self, bridge: &StoreBridge, graph: &mut TransitionGraph) -> TickReport {
        let mut report = TickReport::default();
        if !bridge.is_available() {
            tracing::trace!("store unavailable");
            return report;
        }
        report.connected = true;

        if self.state == ConnectionState::Disconnected {
            self.state = ConnectionState::Connected;
            let stored = bridge.read_transitions();
            tracing::info!(records = stored.len(), "project store connected");
            graph.import_all(stored);
            self.emit(&SyncEvent::StoreConnected);
        }

        self.drain_queue(bridge, graph, &mut report);

        let Ok(tracks) = bridge.tracks_in_order() else {
            return report;
        };
        let snapshot = TopologySnapshot::of_tracks(tracks.iter().map(|(t, c)| (t, c.as_slice())));
        if self.last_topology == Some(snapshot) {
            return report;
        }
        self.last_topology = Some(snapshot);

        let clips: Vec<_> = tracks.into_iter().flat_map(|(_, c)| c).collect();
        reconcile(bridge, graph, &clips);
        report.topology_changed = true;
        tracing::debug!(%snapshot, "topology changed");
        self.emit(&SyncEvent::TopologyChanged(snapshot));
        report
    }

    fn drain_queue(
        &mut self,
        bridge: &StoreBridge,
        graph: &mut TransitionGraph,
        report: &mut TickReport,
    ) {
        while let Some(op) = self.queue.pop() {
            let result = match &op {
                PendingOperation::Add(request) => apply_add(graph, bridge, request).map(|_| ()),
                PendingOperation::Remove { clip_id } => {
                    apply_remove(graph, bridge, clip_id).map(|_| ())
                }
            };
            match result {
                Ok(()) => report.applied += 1,
                Err(SegueError::Unavailable) => {
                    // Store went away mid-drain; retry this op first next tick.
                    self.queue.push_front(op);
                    break;
                }
                Err(e) => {
                    tracing::warn!(op = op.kind(), error = %e, "dropping queued operation");
                    report.dropped += 1;
                    self.stale_mirror = true;
                    let reason = e.to_string();
                    self.emit(&SyncEvent::OperationDropped { op, reason });
                }
            }
        }

        // Only a fully drained queue leaves nothing optimistic worth keeping.
        if self.stale_mirror && self.queue.is_empty() && bridge.is_available() {
            let stored = bridge.read_transitions();
            tracing::debug!(records = stored.len(), "rehydrating mirror after dropped replay");
            graph.import_all(stored);
            self.stale_mirror = false;
        }
    }

    fn emit(&mut self, event: &SyncEvent) {
        for f in &mut self.subscribers {
            f(event);
        }
    }
}

/// Cascade-delete records whose clips vanished, then re-clamp the survivors, in both the
/// mirror and the store.
fn reconcile(bridge: &StoreBridge, graph: &mut TransitionGraph, clips: &dyn ClipDurations) {
    for gone in graph.retain_clips(clips) {
        tracing::debug!(id = %gone.id, "dropping transition to a vanished clip");
    }
    graph.reclamp(clips);

    for record in bridge.read_transitions() {
        if !clips.contains_clip(&record.from_clip_id) || !clips.contains_clip(&record.to_clip_id)
        {
            if let Err(e) = bridge.remove_transition(&record.from_clip_id, &record.to_clip_id) {
                tracing::warn!(id = %record.id, error = %e, "failed to drop stale transition");
            }
            continue;
        }
        let clamped = clamp_for_clips(
            record.duration_secs,
            &record.from_clip_id,
            &record.to_clip_id,
            clips,
        );
        if clamped < record.duration_secs {
            let mut updated = record;
            updated.duration_secs = clamped;
            match bridge.update_transition(&updated) {
                Ok(true) => {}
                Ok(false) => tracing::debug!(id = %updated.id, "re-clamped record vanished"),
                Err(e) => {
                    tracing::warn!(id = %updated.id, error = %e, "failed to re-clamp transition")
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/engine.rs"]
mod tests;
