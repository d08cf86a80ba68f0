use std::fmt;

pub use kurbo::Vec2;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

string_id!(
    /// Identifier of a clip inside the host project store.
    ClipId
);
string_id!(
    /// Identifier of a track inside the host project store.
    TrackId
);
string_id!(
    /// Identifier of a transition instance.
    TransitionId
);

/// Minimal view into an external clip.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipRef {
    /// Clip id.
    pub id: ClipId,
    /// Clip length on the timeline, in seconds.
    pub duration_secs: f64,
    /// Owning track.
    pub track_id: TrackId,
    /// Position among siblings once ordered by start time.
    pub index: usize,
}

/// Two clips that are consecutive on the same track.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipPair {
    /// Earlier clip.
    pub from: ClipRef,
    /// Clip immediately following `from`.
    pub to: ClipRef,
}

/// Clip duration lookup used by the duration clamp.
///
/// Implemented by live store views; [`NoClips`] stands in while disconnected.
pub trait ClipDurations {
    /// Duration of `id` in seconds, if the clip is known.
    fn clip_duration(&self, id: &ClipId) -> Option<f64>;

    /// Whether the clip exists at all.
    fn contains_clip(&self, id: &ClipId) -> bool {
        self.clip_duration(id).is_some()
    }
}

/// Clip lookup that knows nothing (used while the store is absent).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoClips;

impl ClipDurations for NoClips {
    fn clip_duration(&self, _id: &ClipId) -> Option<f64> {
        None
    }
}

impl ClipDurations for [ClipRef] {
    fn clip_duration(&self, id: &ClipId) -> Option<f64> {
        self.iter().find(|c| &c.id == id).map(|c| c.duration_secs)
    }
}

impl ClipDurations for Vec<ClipRef> {
    fn clip_duration(&self, id: &ClipId) -> Option<f64> {
        self.as_slice().clip_duration(id)
    }
}
