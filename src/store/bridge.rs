use std::cell::{Ref, RefMut};

use crate::foundation::core::{ClipId, ClipPair, ClipRef, TrackId};
use crate::foundation::error::{SegueError, SegueResult};
use crate::graph::instance::{EdgeKey, TransitionInstance};
use crate::store::locate::StoreLocator;
use crate::store::model::{Clip, Project, TrackKind};
use crate::store::project_store::{HookOutcome, ProjectStore, SharedStore};

/// Uniform read/write contract over whichever host store the locator finds.
///
/// Every call re-locates the store, so a host that swaps or withdraws its store between
/// calls is picked up without any bookkeeping here.
#[derive(Clone, Debug, Default)]
pub struct StoreBridge {
    locator: StoreLocator,
}

impl StoreBridge {
    /// Bridge over `locator`.
    pub fn new(locator: StoreLocator) -> Self {
        Self { locator }
    }

    /// Bridge over a single injected store.
    pub fn for_store(store: SharedStore) -> Self {
        Self::new(StoreLocator::injected(store))
    }

    /// Discovery strategies in use.
    pub fn locator(&self) -> &StoreLocator {
        &self.locator
    }

    /// Locate the store, or [`SegueError::Unavailable`].
    pub fn locate(&self) -> SegueResult<SharedStore> {
        self.locator.locate()
    }

    /// Whether a structurally-valid store is reachable right now.
    pub fn is_available(&self) -> bool {
        self.locate().is_ok()
    }

    /// Stored transition records in store order; empty when the store or list is absent.
    pub fn read_transitions(&self) -> Vec<TransitionInstance> {
        self.read(|p| p.transitions.clone().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Records with `clip` as either endpoint.
    pub fn records_touching(&self, clip: &ClipId) -> Vec<TransitionInstance> {
        self.read_transitions()
            .into_iter()
            .filter(|t| t.touches(clip))
            .collect()
    }

    /// Persist `instance`, replacing records in the same role or on the same pair.
    ///
    /// A clip keeps at most one outgoing and one incoming record afterwards.
    #[tracing::instrument(skip(self, instance), fields(id = %instance.id))]
    pub fn write_transition(&self, instance: &TransitionInstance) -> SegueResult<()> {
        let store = self.locate()?;
        {
            let mut s = borrow_mut(&store)?;
            let project = s.project_mut().ok_or(SegueError::Unavailable)?;
            let edge = instance.edge();
            let list = project.transitions.get_or_insert_with(Vec::new);
            let before = list.len();
            list.retain(|t| {
                t.from_clip_id != instance.from_clip_id
                    && t.to_clip_id != instance.to_clip_id
                    && t.edge() != edge
            });
            if list.len() != before {
                tracing::debug!(replaced = before - list.len(), "replacing stored transitions");
            }
            list.push(instance.clone());
            run_persist_hooks(&mut *s);
        }
        Ok(())
    }

    /// Overwrite the record with `instance.id` where it sits; `false` when none matches.
    pub fn update_transition(&self, instance: &TransitionInstance) -> SegueResult<bool> {
        let store = self.locate()?;
        let mut s = borrow_mut(&store)?;
        let project = s.project_mut().ok_or(SegueError::Unavailable)?;
        let Some(slot) = project
            .transitions
            .as_mut()
            .and_then(|list| list.iter_mut().find(|t| t.id == instance.id))
        else {
            return Ok(false);
        };
        *slot = instance.clone();
        run_persist_hooks(&mut *s);
        Ok(true)
    }

    /// Remove the record between `a` and `b` in either direction.
    pub fn remove_transition(&self, a: &ClipId, b: &ClipId) -> SegueResult<bool> {
        let store = self.locate()?;
        let mut s = borrow_mut(&store)?;
        let project = s.project_mut().ok_or(SegueError::Unavailable)?;
        let Some(list) = project.transitions.as_mut() else {
            return Ok(false);
        };
        let edge = EdgeKey::new(a, b);
        let before = list.len();
        list.retain(|t| t.edge() != edge);
        let removed = list.len() != before;
        if removed {
            run_persist_hooks(&mut *s);
        }
        Ok(removed)
    }

    /// Clips of every track, each ordered by start time.
    pub fn tracks_in_order(&self) -> SegueResult<Vec<(TrackId, Vec<ClipRef>)>> {
        self.read(|p| {
            p.tracks
                .iter()
                .map(|t| (t.id.clone(), t.ordered_clips()))
                .collect()
        })
    }

    /// Consecutive clip pairs within each track. Never pairs clips across tracks.
    pub fn list_clip_adjacency(&self) -> SegueResult<Vec<ClipPair>> {
        let tracks = self.tracks_in_order()?;
        Ok(tracks
            .into_iter()
            .flat_map(|(_, clips)| {
                clips
                    .windows(2)
                    .map(|w| ClipPair {
                        from: w[0].clone(),
                        to: w[1].clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect())
    }

    /// Every clip in the project.
    pub fn clip_refs(&self) -> SegueResult<Vec<ClipRef>> {
        let tracks = self.tracks_in_order()?;
        Ok(tracks.into_iter().flat_map(|(_, clips)| clips).collect())
    }

    /// The clip immediately after `clip` on its own track.
    pub fn successor_of(&self, clip: &ClipId) -> SegueResult<ClipRef> {
        self.list_clip_adjacency()?
            .into_iter()
            .find(|pair| &pair.from.id == clip)
            .map(|pair| pair.to)
            .ok_or_else(|| SegueError::no_successor(clip.as_str()))
    }

    /// Whether `a` and `b` are consecutive on one track, in that order.
    pub fn are_adjacent(&self, a: &ClipId, b: &ClipId) -> SegueResult<bool> {
        Ok(self
            .list_clip_adjacency()?
            .iter()
            .any(|pair| &pair.from.id == a && &pair.to.id == b))
    }

    /// Playhead in seconds; `0.0` when the store or its clock is absent.
    pub fn current_playhead_time(&self) -> f64 {
        self.locate()
            .ok()
            .and_then(|store| store.try_borrow().ok().and_then(|s| s.current_time()))
            .filter(|t| t.is_finite())
            .unwrap_or(0.0)
    }

    /// Insert a clip of `duration_secs` at the playhead on the first track of `kind`.
    ///
    /// Creates the track through the host's `add_track` hook when none exists, and falls
    /// back to writing the clip directly when the `add_clip` hook is absent.
    #[tracing::instrument(skip(self))]
    pub fn place_clip_at_playhead(
        &self,
        kind: TrackKind,
        clip_id: ClipId,
        duration_secs: f64,
    ) -> SegueResult<ClipRef> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(SegueError::validation(format!(
                "clip duration must be finite and > 0 (got {duration_secs})"
            )));
        }
        let start = self.current_playhead_time();
        let store = self.locate()?;
        let mut s = borrow_mut(&store)?;
        let project = s.project().ok_or(SegueError::Unavailable)?;
        if project.clip(&clip_id).is_some() {
            return Err(SegueError::validation(format!(
                "clip id '{clip_id}' already exists"
            )));
        }

        let existing = project
            .tracks
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| t.id.clone());
        let track_id = match existing {
            Some(id) => id,
            None => s.add_track(kind).ok_or_else(|| {
                SegueError::validation(format!("no {kind:?} track and no add_track hook"))
            })?,
        };

        let clip = Clip {
            id: clip_id.clone(),
            duration_secs,
            track_id: track_id.clone(),
            start_time_secs: start,
        };
        match s.add_clip(&track_id, clip.clone()) {
            HookOutcome::Ran => {}
            HookOutcome::Absent => {
                let project = s.project_mut().ok_or(SegueError::Unavailable)?;
                let track = project
                    .tracks
                    .iter_mut()
                    .find(|t| t.id == track_id)
                    .ok_or_else(|| {
                        SegueError::validation(format!("track '{track_id}' vanished"))
                    })?;
                track.clips.push(clip);
            }
            HookOutcome::Failed(reason) => {
                return Err(SegueError::validation(format!("add_clip hook failed: {reason}")));
            }
        }
        run_persist_hooks(&mut *s);

        let project = s.project().ok_or(SegueError::Unavailable)?;
        project
            .tracks
            .iter()
            .find(|t| t.id == track_id)
            .and_then(|t| t.ordered_clips().into_iter().find(|c| c.id == clip_id))
            .ok_or_else(|| SegueError::validation(format!("clip '{clip_id}' was not placed")))
    }

    fn read<T>(&self, f: impl FnOnce(&Project) -> T) -> SegueResult<T> {
        let store = self.locate()?;
        let s = borrow(&store)?;
        let project = s.project().ok_or(SegueError::Unavailable)?;
        Ok(f(project))
    }
}

fn borrow(store: &SharedStore) -> SegueResult<Ref<'_, dyn ProjectStore + 'static>> {
    store.try_borrow().map_err(|_| SegueError::Unavailable)
}

fn borrow_mut(store: &SharedStore) -> SegueResult<RefMut<'_, dyn ProjectStore + 'static>> {
    store.try_borrow_mut().map_err(|_| SegueError::Unavailable)
}

fn run_persist_hooks(store: &mut dyn ProjectStore) {
    log_hook("save_now", store.save_now());
    log_hook("push_snapshot", store.push_snapshot());
}

fn log_hook(name: &'static str, outcome: HookOutcome) {
    match outcome {
        HookOutcome::Ran => tracing::trace!(hook = name, "store hook ran"),
        HookOutcome::Absent => tracing::trace!(hook = name, "store hook absent"),
        HookOutcome::Failed(reason) => {
            tracing::warn!(hook = name, %reason, "store hook failed");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/bridge.rs"]
mod tests;
