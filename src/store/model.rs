use crate::foundation::core::{ClipId, ClipRef, TrackId};
use crate::foundation::error::{SegueError, SegueResult};
use crate::graph::instance::TransitionInstance;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Host-owned project state as seen through the store contract.
pub struct Project {
    /// Ordered tracks.
    #[serde(default)]
    pub tracks: Vec<Track>,
    /// Transition records maintained by Segue. `None` until the first write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Vec<TransitionInstance>>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A timeline track.
pub struct Track {
    /// Track id.
    pub id: TrackId,
    /// Media kind carried by the track.
    #[serde(default)]
    pub kind: TrackKind,
    /// Clips in host order (not necessarily sorted by start time).
    #[serde(default)]
    pub clips: Vec<Clip>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Media kind of a track.
pub enum TrackKind {
    /// Picture track.
    #[default]
    Video,
    /// Sound track.
    Audio,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A clip placed on a track.
pub struct Clip {
    /// Clip id.
    pub id: ClipId,
    /// Length on the timeline in seconds.
    #[serde(rename = "durationSeconds")]
    pub duration_secs: f64,
    /// Owning track.
    pub track_id: TrackId,
    /// Timeline position in seconds.
    #[serde(rename = "startTime")]
    pub start_time_secs: f64,
}

impl Track {
    /// Clips ordered by timeline position (stable for equal start times).
    pub fn ordered_clips(&self) -> Vec<ClipRef> {
        let mut clips: Vec<&Clip> = self.clips.iter().collect();
        clips.sort_by(|a, b| a.start_time_secs.total_cmp(&b.start_time_secs));
        clips
            .into_iter()
            .enumerate()
            .map(|(index, c)| ClipRef {
                id: c.id.clone(),
                duration_secs: c.duration_secs,
                track_id: self.id.clone(),
                index,
            })
            .collect()
    }

    /// End of the last clip, in seconds.
    pub fn end_secs(&self) -> f64 {
        self.clips
            .iter()
            .map(|c| c.start_time_secs + c.duration_secs)
            .fold(0.0, f64::max)
    }
}

impl Project {
    /// Find a clip by id across all tracks.
    pub fn clip(&self, id: &ClipId) -> Option<&Clip> {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .find(|c| &c.id == id)
    }

    /// Check structural invariants the bridge relies on.
    pub fn validate(&self) -> SegueResult<()> {
        let mut seen = std::collections::HashSet::new();
        for track in &self.tracks {
            for clip in &track.clips {
                if !seen.insert(&clip.id) {
                    return Err(SegueError::validation(format!(
                        "clip id '{}' appears more than once",
                        clip.id
                    )));
                }
                if !clip.duration_secs.is_finite() || clip.duration_secs < 0.0 {
                    return Err(SegueError::validation(format!(
                        "clip '{}' durationSeconds must be finite and >= 0",
                        clip.id
                    )));
                }
                if !clip.start_time_secs.is_finite() {
                    return Err(SegueError::validation(format!(
                        "clip '{}' startTime must be finite",
                        clip.id
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/model.rs"]
mod tests;
