//! Segue attaches transitions to adjacent clips of a host-owned video timeline.
//!
//! The host owns the project; Segue finds it through injected discovery strategies and
//! keeps a mirror of the transitions in sync with it:
//!
//! - Look types up in the [`TransitionCatalog`]
//! - Route picker events through a [`TransitionEditor`] (or drive [`TransitionGraph`],
//!   [`StoreBridge`] and [`SyncEngine`] directly)
//! - Render schematic previews onto a [`Surface`], or map transitions to ffmpeg `xfade`
//!   filter graphs
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod config;
mod foundation;
mod graph;
mod preview;
mod session;
mod store;
mod sync;

pub use crate::foundation::core::{
    ClipDurations, ClipId, ClipPair, ClipRef, NoClips, TrackId, TransitionId, Vec2,
};
pub use crate::foundation::error::{SegueError, SegueResult};

pub use crate::catalog::registry::{FALLBACK_TYPE_ID, TransitionCatalog};
pub use crate::catalog::types::{Category, Preset, TransitionType};
pub use crate::config::{DiscoveryConfig, POLL_INTERVAL_ENV, PreviewConfig, SegueConfig};
pub use crate::graph::clamp::clamp_duration;
pub use crate::graph::graph::TransitionGraph;
pub use crate::graph::instance::{
    EdgeKey, TransitionInstance, TransitionOptions, TransitionRequest,
};
pub use crate::preview::filter::{
    DEFAULT_XFADE, xfade_filter_graph, xfade_offset_secs, xfade_transition_name,
};
pub use crate::preview::plan::{
    Ease, FROM_BODY, PreviewOp, PreviewPlan, SlideDir, Source, TO_BODY, Tint, TransitionKind,
    WipeDir,
};
pub use crate::preview::playback::PreviewPlayback;
pub use crate::preview::render::{
    composite_transition, execute_plan, render_instance_preview, render_preview,
};
pub use crate::preview::surface::{PremulRgba8, Surface, premultiply};
pub use crate::session::editor::{RequestOutcome, TransitionEditor};
pub use crate::store::bridge::StoreBridge;
pub use crate::store::json_file::{JsonFileStore, ProjectDocument};
pub use crate::store::locate::{Discovery, StoreAccessor, StoreLocator, StoreRegistry, StoreSlot};
pub use crate::store::model::{Clip, Project, Track, TrackKind};
pub use crate::store::project_store::{HookOutcome, MemoryStore, ProjectStore, SharedStore};
pub use crate::sync::engine::{ConnectionState, SyncEngine, SyncEvent, TickReport};
pub use crate::sync::queue::PendingOperation;
pub use crate::sync::timer::IntervalTimer;
pub use crate::sync::topology::TopologySnapshot;
