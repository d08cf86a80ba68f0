use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use smallvec::SmallVec;

use crate::catalog::registry::TransitionCatalog;
use crate::foundation::core::{ClipDurations, ClipId, TransitionId};
use crate::foundation::error::{SegueError, SegueResult};
use crate::graph::clamp::{clamp_for_clips, requested_duration};
use crate::graph::instance::{EdgeKey, TransitionInstance, TransitionRequest};

#[derive(Clone, Debug)]
struct Edge {
    seq: u64,
    instance: TransitionInstance,
}

/// In-memory mirror of the transitions attached to the timeline.
///
/// Edges are keyed once, by their unordered clip pair; endpoint lookups go through
/// [`TransitionGraph::adjacency`] or a linear scan instead of a second map. Adding a
/// transition evicts every instance sharing either endpoint, so each clip is an endpoint of
/// at most one instance and [`TransitionGraph::get`] is unambiguous.
#[derive(Clone, Debug, Default)]
pub struct TransitionGraph {
    catalog: TransitionCatalog,
    edges: BTreeMap<EdgeKey, Edge>,
    next_seq: u64,
}

impl TransitionGraph {
    /// Empty graph over the built-in catalog.
    pub fn new() -> Self {
        Self::with_catalog(TransitionCatalog::builtin())
    }

    /// Empty graph resolving types against `catalog`.
    pub fn with_catalog(catalog: TransitionCatalog) -> Self {
        Self {
            catalog,
            edges: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Catalog used to resolve type ids.
    pub fn catalog(&self) -> &TransitionCatalog {
        &self.catalog
    }

    /// Number of stored instances.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no instances are stored.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Build an instance for `request` without storing it.
    ///
    /// Durations are clamped against whatever `clips` knows; pass
    /// [`crate::NoClips`] while the store is absent.
    pub fn build(
        &mut self,
        request: &TransitionRequest,
        clips: &dyn ClipDurations,
    ) -> SegueResult<TransitionInstance> {
        let ty = self.catalog.resolve(&request.type_id)?;
        if request.from == request.to {
            return Err(SegueError::validation(format!(
                "transition endpoints must differ (got '{}' twice)",
                request.from
            )));
        }

        let mut parameters = BTreeMap::new();
        for (k, v) in &request.options.parameters {
            if ty.accepts_parameter(k) {
                parameters.insert(k.clone(), v.clone());
            } else {
                tracing::warn!(type_id = ty.id, param = %k, "dropping unknown transition parameter");
            }
        }

        let duration_secs = clamp_for_clips(
            requested_duration(request.options.duration_secs, ty),
            &request.from,
            &request.to,
            clips,
        );

        let created_at = Utc::now();
        let seq = self.bump_seq();
        Ok(TransitionInstance {
            id: TransitionId::new(format!("tr_{}_{seq}", created_at.timestamp_millis())),
            from_clip_id: request.from.clone(),
            to_clip_id: request.to.clone(),
            type_id: ty.id.to_owned(),
            duration_secs,
            parameters,
            created_at,
        })
    }

    /// Attach a transition, evicting any instance that shares an endpoint.
    #[tracing::instrument(skip(self, clips), fields(from = %request.from, to = %request.to, ty = %request.type_id))]
    pub fn add(
        &mut self,
        request: &TransitionRequest,
        clips: &dyn ClipDurations,
    ) -> SegueResult<TransitionInstance> {
        let instance = self.build(request, clips)?;
        self.insert(instance.clone());
        Ok(instance)
    }

    /// Store a fully-built instance, evicting any instance that shares an endpoint.
    ///
    /// Returns the evicted instances.
    pub fn insert(&mut self, instance: TransitionInstance) -> Vec<TransitionInstance> {
        let evicted_keys: Vec<EdgeKey> = self
            .edges
            .iter()
            .filter(|(_, e)| e.instance.shares_endpoint(&instance))
            .map(|(k, _)| k.clone())
            .collect();
        let mut evicted = Vec::with_capacity(evicted_keys.len());
        for key in evicted_keys {
            if let Some(e) = self.edges.remove(&key) {
                tracing::debug!(id = %e.instance.id, "evicting transition sharing an endpoint");
                evicted.push(e.instance);
            }
        }

        let seq = self.bump_seq();
        self.edges.insert(instance.edge(), Edge { seq, instance });
        evicted
    }

    /// Remove the instance touching `clip`. Returns the removed instance.
    pub fn take(&mut self, clip: &ClipId) -> Option<TransitionInstance> {
        let key = self.edge_of(clip)?;
        self.edges.remove(&key).map(|e| e.instance)
    }

    /// Remove the instance touching `clip` on either side; `true` if one was found.
    pub fn remove(&mut self, clip: &ClipId) -> bool {
        self.take(clip).is_some()
    }

    /// Instance touching `clip`, if any.
    pub fn get(&self, clip: &ClipId) -> Option<&TransitionInstance> {
        let key = self.edge_of(clip)?;
        self.edges.get(&key).map(|e| &e.instance)
    }

    /// Instance matching the ordered pair exactly.
    pub fn get_between(&self, from: &ClipId, to: &ClipId) -> Option<&TransitionInstance> {
        self.edges
            .get(&EdgeKey::new(from, to))
            .map(|e| &e.instance)
            .filter(|i| &i.from_clip_id == from && &i.to_clip_id == to)
    }

    /// All instances in insertion order.
    pub fn export_all(&self) -> Vec<TransitionInstance> {
        let mut edges: Vec<&Edge> = self.edges.values().collect();
        edges.sort_by_key(|e| e.seq);
        edges.into_iter().map(|e| e.instance.clone()).collect()
    }

    /// Replace the contents with `list`, applying the eviction rule in order (later wins).
    pub fn import_all(&mut self, list: impl IntoIterator<Item = TransitionInstance>) {
        self.edges.clear();
        for instance in list {
            if instance.from_clip_id == instance.to_clip_id {
                tracing::warn!(id = %instance.id, "skipping self-referencing transition");
                continue;
            }
            self.insert(instance);
        }
    }

    /// Endpoint → edge index, built on demand.
    pub fn adjacency(&self) -> HashMap<&ClipId, SmallVec<[&EdgeKey; 2]>> {
        let mut index: HashMap<&ClipId, SmallVec<[&EdgeKey; 2]>> = HashMap::new();
        for (key, e) in &self.edges {
            index.entry(&e.instance.from_clip_id).or_default().push(key);
            index.entry(&e.instance.to_clip_id).or_default().push(key);
        }
        index
    }

    /// Re-apply the duration clamp to every instance.
    ///
    /// Returns the instances whose duration changed (after the update).
    pub fn reclamp(&mut self, clips: &dyn ClipDurations) -> Vec<TransitionInstance> {
        let mut changed = Vec::new();
        for e in self.edges.values_mut() {
            let i = &mut e.instance;
            let clamped = clamp_for_clips(i.duration_secs, &i.from_clip_id, &i.to_clip_id, clips);
            if clamped < i.duration_secs {
                i.duration_secs = clamped;
                changed.push(i.clone());
            }
        }
        changed
    }

    /// Drop every instance with an endpoint `clips` does not know. Returns the removed ones.
    pub fn retain_clips(&mut self, clips: &dyn ClipDurations) -> Vec<TransitionInstance> {
        let mut removed = Vec::new();
        self.edges.retain(|_, e| {
            let keep = clips.contains_clip(&e.instance.from_clip_id)
                && clips.contains_clip(&e.instance.to_clip_id);
            if !keep {
                removed.push(e.instance.clone());
            }
            keep
        });
        removed
    }

    fn edge_of(&self, clip: &ClipId) -> Option<EdgeKey> {
        self.edges.keys().find(|k| k.touches(clip)).cloned()
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/graph.rs"]
mod tests;
