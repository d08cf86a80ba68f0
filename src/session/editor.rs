use std::time::Instant;

use rand::Rng;

use crate::catalog::registry::TransitionCatalog;
use crate::config::SegueConfig;
use crate::foundation::core::{ClipId, NoClips};
use crate::foundation::error::SegueResult;
use crate::graph::graph::TransitionGraph;
use crate::graph::instance::{TransitionInstance, TransitionOptions, TransitionRequest};
use crate::preview::filter::{xfade_filter_graph, xfade_offset_secs};
use crate::preview::playback::PreviewPlayback;
use crate::preview::render::render_instance_preview;
use crate::preview::surface::Surface;
use crate::store::bridge::StoreBridge;
use crate::store::project_store::SharedStore;
use crate::sync::apply::{apply_add, apply_remove};
use crate::sync::engine::{SyncEngine, SyncEvent, TickReport};
use crate::sync::queue::PendingOperation;

/// What happened to a transition request.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestOutcome {
    /// Written to the store.
    Applied(TransitionInstance),
    /// Store absent: mirrored locally and queued for replay.
    Queued(TransitionInstance),
}

impl RequestOutcome {
    /// The instance as created (durations in a queued one are clamped again on replay).
    pub fn instance(&self) -> &TransitionInstance {
        match self {
            Self::Applied(i) | Self::Queued(i) => i,
        }
    }

    /// Whether the request reached the store.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Collaborator-facing surface: routes picker events to the graph and store, or queues
/// them while the store is missing.
#[derive(Debug)]
pub struct TransitionEditor {
    config: SegueConfig,
    graph: TransitionGraph,
    bridge: StoreBridge,
    engine: SyncEngine,
}

impl TransitionEditor {
    /// Editor over `bridge` with `config`.
    pub fn new(bridge: StoreBridge, config: SegueConfig) -> Self {
        let engine = SyncEngine::new(&config);
        Self {
            config,
            graph: TransitionGraph::new(),
            bridge,
            engine,
        }
    }

    /// Editor over a single injected store, default config.
    pub fn for_store(store: SharedStore) -> Self {
        Self::new(StoreBridge::for_store(store), SegueConfig::default())
    }

    /// Transition catalog.
    pub fn catalog(&self) -> &TransitionCatalog {
        self.graph.catalog()
    }

    /// In-memory mirror.
    pub fn graph(&self) -> &TransitionGraph {
        &self.graph
    }

    /// Store bridge.
    pub fn bridge(&self) -> &StoreBridge {
        &self.bridge
    }

    /// Sync engine (for inspection).
    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    /// Active configuration.
    pub fn config(&self) -> &SegueConfig {
        &self.config
    }

    /// Register a callback for sync events.
    pub fn subscribe(&mut self, f: impl FnMut(&SyncEvent) + 'static) {
        self.engine.subscribe(f);
    }

    /// Handle a "transition requested" event.
    ///
    /// Unknown types fail immediately. With the store present the transition is clamped
    /// against live durations and written; otherwise it is mirrored and queued.
    #[tracing::instrument(skip(self), fields(from = %request.from, to = %request.to, ty = %request.type_id))]
    pub fn request_transition(&mut self, request: TransitionRequest) -> SegueResult<RequestOutcome> {
        self.catalog().resolve(&request.type_id)?;
        if self.bridge.is_available() {
            let instance = apply_add(&mut self.graph, &self.bridge, &request)?;
            return Ok(RequestOutcome::Applied(instance));
        }
        let instance = self.graph.add(&request, &NoClips)?;
        self.engine.enqueue(PendingOperation::Add(request));
        Ok(RequestOutcome::Queued(instance))
    }

    /// Attach a transition from `clip` to whatever follows it on its track.
    pub fn request_transition_after(
        &mut self,
        clip: &ClipId,
        type_id: &str,
        options: TransitionOptions,
    ) -> SegueResult<RequestOutcome> {
        self.catalog().resolve(type_id)?;
        let next = self.bridge.successor_of(clip)?;
        self.request_transition(
            TransitionRequest::new(clip.clone(), next.id, type_id).with_options(options),
        )
    }

    /// Attach a random member of preset `preset` between `from` and `to`.
    pub fn apply_preset<R: Rng + ?Sized>(
        &mut self,
        from: &ClipId,
        to: &ClipId,
        preset: &str,
        rng: &mut R,
    ) -> SegueResult<RequestOutcome> {
        let ty = self.catalog().pick_preset(preset, rng)?;
        self.request_transition(TransitionRequest::new(from.clone(), to.clone(), ty.id))
    }

    /// Handle a "transition removal requested" event. Returns whether a transition was
    /// found (in the store, or in the mirror while disconnected).
    #[tracing::instrument(skip(self))]
    pub fn request_removal(&mut self, clip: &ClipId) -> SegueResult<bool> {
        if self.bridge.is_available() {
            return apply_remove(&mut self.graph, &self.bridge, clip);
        }
        let mirrored = self.graph.remove(clip);
        self.engine.enqueue(PendingOperation::Remove {
            clip_id: clip.clone(),
        });
        Ok(mirrored)
    }

    /// Transition touching `clip`: outgoing before incoming, read from the live store when
    /// present and from the mirror otherwise.
    pub fn transition_for(&self, clip: &ClipId) -> Option<TransitionInstance> {
        if !self.bridge.is_available() {
            return self.graph.get(clip).cloned();
        }
        let records = self.bridge.records_touching(clip);
        records
            .iter()
            .find(|t| &t.from_clip_id == clip)
            .or_else(|| records.first())
            .cloned()
    }

    /// Transition between `from` and `to` in that order.
    pub fn transition_between(&self, from: &ClipId, to: &ClipId) -> Option<TransitionInstance> {
        if !self.bridge.is_available() {
            return self.graph.get_between(from, to).cloned();
        }
        self.bridge
            .read_transitions()
            .into_iter()
            .find(|t| &t.from_clip_id == from && &t.to_clip_id == to)
    }

    /// Draw a preview of `type_id` at `progress`.
    pub fn render_preview(&self, type_id: &str, progress: f32, surface: &mut Surface) {
        crate::preview::render::render_preview(type_id, progress, surface);
    }

    /// Draw the preview of the transition touching `clip`; `false` if there is none.
    pub fn render_clip_preview(&self, clip: &ClipId, progress: f32, surface: &mut Surface) -> bool {
        match self.transition_for(clip) {
            Some(t) => {
                render_instance_preview(&t, progress, surface);
                true
            }
            None => false,
        }
    }

    /// Looping preview animation for `type_id` starting at `now`.
    pub fn start_preview(&self, type_id: &str, now: Instant) -> PreviewPlayback {
        PreviewPlayback::start(type_id, now, self.config.preview.duration()).looping()
    }

    /// Preview surface sized from config.
    pub fn preview_surface(&self) -> Surface {
        Surface::new(self.config.preview.width, self.config.preview.height)
    }

    /// `xfade` filter graph for every stored transition, in store order.
    pub fn filter_graphs(&self, with_audio: bool) -> SegueResult<Vec<(TransitionInstance, String)>> {
        let clips = self.bridge.clip_refs()?;
        Ok(self
            .bridge
            .read_transitions()
            .into_iter()
            .map(|t| {
                let from_secs = clips
                    .iter()
                    .find(|c| c.id == t.from_clip_id)
                    .map_or(t.duration_secs, |c| c.duration_secs);
                let graph = xfade_filter_graph(
                    &t,
                    xfade_offset_secs(from_secs, t.duration_secs),
                    with_audio,
                );
                (t, graph)
            })
            .collect())
    }

    /// One sync pass.
    pub fn tick(&mut self) -> TickReport {
        self.engine.poll_tick(&self.bridge, &mut self.graph)
    }

    /// Drive the sync timer from the host clock.
    pub fn advance(&mut self, now: Instant) -> Option<TickReport> {
        self.engine.advance(now, &self.bridge, &mut self.graph)
    }

    /// Stop the sync timer. Idempotent.
    pub fn stop(&mut self) {
        self.engine.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
