use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::foundation::core::{ClipId, TransitionId};

/// A transition attached to a pair of adjacent clips.
///
/// Stored with a direction (`from` precedes `to` in track order) but keyed by the unordered
/// pair: no two instances ever share the same `{from, to}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionInstance {
    /// Unique id.
    pub id: TransitionId,
    /// Outgoing clip.
    pub from_clip_id: ClipId,
    /// Incoming clip.
    pub to_clip_id: ClipId,
    /// Catalog type id.
    pub type_id: String,
    /// Effective duration in seconds, after clamping.
    #[serde(rename = "durationSeconds")]
    pub duration_secs: f64,
    /// Effect parameters; keys are a subset of the type's parameter names.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, serde_json::Value>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl TransitionInstance {
    /// The unordered pair this instance occupies.
    pub fn edge(&self) -> EdgeKey {
        EdgeKey::new(&self.from_clip_id, &self.to_clip_id)
    }

    /// Whether `clip` is either endpoint.
    pub fn touches(&self, clip: &ClipId) -> bool {
        &self.from_clip_id == clip || &self.to_clip_id == clip
    }

    /// Whether the instance shares any endpoint with `other`.
    pub fn shares_endpoint(&self, other: &TransitionInstance) -> bool {
        self.touches(&other.from_clip_id) || self.touches(&other.to_clip_id)
    }
}

/// Optional knobs carried by a transition request.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOptions {
    /// Requested duration in seconds. Non-positive or non-finite values fall back to the
    /// type's default.
    #[serde(
        default,
        rename = "duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_secs: Option<f64>,
    /// Effect parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl TransitionOptions {
    /// Options with only a requested duration.
    pub fn with_duration(duration_secs: f64) -> Self {
        Self {
            duration_secs: Some(duration_secs),
            ..Self::default()
        }
    }
}

/// A request to attach `type_id` between `from` and `to`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    /// Outgoing clip.
    pub from: ClipId,
    /// Incoming clip.
    pub to: ClipId,
    /// Catalog type id.
    pub type_id: String,
    /// Duration and parameters.
    #[serde(default)]
    pub options: TransitionOptions,
}

impl TransitionRequest {
    /// Build a request with default options.
    pub fn new(from: impl Into<ClipId>, to: impl Into<ClipId>, type_id: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            type_id: type_id.into(),
            options: TransitionOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: TransitionOptions) -> Self {
        self.options = options;
        self
    }
}

/// Normalized unordered pair of clip ids (`lo <= hi`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    lo: ClipId,
    hi: ClipId,
}

impl EdgeKey {
    /// Key for the pair, regardless of direction.
    pub fn new(a: &ClipId, b: &ClipId) -> Self {
        if a <= b {
            Self {
                lo: a.clone(),
                hi: b.clone(),
            }
        } else {
            Self {
                lo: b.clone(),
                hi: a.clone(),
            }
        }
    }

    /// Whether `clip` is one of the two endpoints.
    pub fn touches(&self, clip: &ClipId) -> bool {
        &self.lo == clip || &self.hi == clip
    }
}
