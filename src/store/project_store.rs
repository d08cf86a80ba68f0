use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::TrackId;
use crate::store::model::{Clip, Project, TrackKind};

/// Shared handle to a host store. The host keeps its own clone and mutates it freely
/// between calls; Segue only borrows it for the duration of one operation.
pub type SharedStore = Rc<RefCell<dyn ProjectStore>>;

/// Result of invoking an optional host hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookOutcome {
    /// The hook exists and completed.
    Ran,
    /// The host does not provide this hook.
    Absent,
    /// The hook exists but reported a failure.
    Failed(String),
}

/// Contract over the host application's project store.
///
/// Only [`ProjectStore::project`] and [`ProjectStore::project_mut`] are required; every
/// hook defaults to [`HookOutcome::Absent`] and is skipped by callers in that case.
pub trait ProjectStore {
    /// The project, or `None` while the host has not initialized it yet.
    fn project(&self) -> Option<&Project>;

    /// Mutable access to the project.
    fn project_mut(&mut self) -> Option<&mut Project>;

    /// Playhead position in seconds, if the host exposes one.
    fn current_time(&self) -> Option<f64> {
        None
    }

    /// Host hook creating a new track. `None` when the hook is absent.
    fn add_track(&mut self, _kind: TrackKind) -> Option<TrackId> {
        None
    }

    /// Host hook inserting a clip into a track.
    fn add_clip(&mut self, _track: &TrackId, _clip: Clip) -> HookOutcome {
        HookOutcome::Absent
    }

    /// Host persistence hook.
    fn save_now(&mut self) -> HookOutcome {
        HookOutcome::Absent
    }

    /// Host undo-snapshot / UI refresh hook.
    fn push_snapshot(&mut self) -> HookOutcome {
        HookOutcome::Absent
    }
}

/// In-memory store for tests and embedding.
///
/// Counts hook invocations so callers can observe side effects.
#[derive(Debug, Default)]
pub struct MemoryStore {
    project: Option<Project>,
    current_time: Option<f64>,
    hooks: bool,
    saves: usize,
    snapshots: usize,
}

impl MemoryStore {
    /// Store holding `project`, with all hooks present.
    pub fn new(project: Project) -> Self {
        Self {
            project: Some(project),
            current_time: None,
            hooks: true,
            saves: 0,
            snapshots: 0,
        }
    }

    /// Store whose project is not initialized yet.
    pub fn uninitialized() -> Self {
        Self {
            hooks: true,
            ..Self::default()
        }
    }

    /// Disable every optional hook.
    pub fn without_hooks(mut self) -> Self {
        self.hooks = false;
        self
    }

    /// Set the playhead.
    pub fn with_current_time(mut self, secs: f64) -> Self {
        self.current_time = Some(secs);
        self
    }

    /// Install (or replace) the project, as a host does when it finishes loading.
    pub fn initialize(&mut self, project: Project) {
        self.project = Some(project);
    }

    /// Number of `save_now` calls.
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Number of `push_snapshot` calls.
    pub fn snapshots(&self) -> usize {
        self.snapshots
    }
}

impl ProjectStore for MemoryStore {
    fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    fn project_mut(&mut self) -> Option<&mut Project> {
        self.project.as_mut()
    }

    fn current_time(&self) -> Option<f64> {
        self.current_time
    }

    fn add_track(&mut self, kind: TrackKind) -> Option<TrackId> {
        if !self.hooks {
            return None;
        }
        let project = self.project.as_mut()?;
        let id = TrackId::new(format!("{kind:?}-{}", project.tracks.len() + 1).to_lowercase());
        project.tracks.push(crate::store::model::Track {
            id: id.clone(),
            kind,
            clips: Vec::new(),
        });
        Some(id)
    }

    fn add_clip(&mut self, track: &TrackId, clip: Clip) -> HookOutcome {
        if !self.hooks {
            return HookOutcome::Absent;
        }
        let Some(project) = self.project.as_mut() else {
            return HookOutcome::Failed("project not initialized".to_owned());
        };
        match project.tracks.iter_mut().find(|t| &t.id == track) {
            Some(t) => {
                t.clips.push(clip);
                HookOutcome::Ran
            }
            None => HookOutcome::Failed(format!("unknown track '{track}'")),
        }
    }

    fn save_now(&mut self) -> HookOutcome {
        if !self.hooks {
            return HookOutcome::Absent;
        }
        self.saves += 1;
        HookOutcome::Ran
    }

    fn push_snapshot(&mut self) -> HookOutcome {
        if !self.hooks {
            return HookOutcome::Absent;
        }
        self.snapshots += 1;
        HookOutcome::Ran
    }
}
