use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::preview::plan::PreviewPlan;
use crate::preview::render::execute_plan;
use crate::preview::surface::Surface;

/// Time-driven preview animation.
///
/// The host calls [`PreviewPlayback::frame`] from its animation loop with its own clock;
/// progress runs 0 → 1 over `duration`, then repeats when looping.
#[derive(Clone, Debug)]
pub struct PreviewPlayback {
    type_id: String,
    parameters: BTreeMap<String, serde_json::Value>,
    started: Instant,
    duration: Duration,
    looping: bool,
    cancelled: bool,
}

impl PreviewPlayback {
    /// Start a one-shot playback at `started`.
    pub fn start(type_id: impl Into<String>, started: Instant, duration: Duration) -> Self {
        Self {
            type_id: type_id.into(),
            parameters: BTreeMap::new(),
            started,
            duration,
            looping: false,
            cancelled: false,
        }
    }

    /// Repeat forever instead of stopping at progress 1.
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Use an instance's parameters (`ease`, `softEdge`, ...).
    pub fn with_parameters(mut self, parameters: BTreeMap<String, serde_json::Value>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Type being previewed.
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Progress at `now`, or `None` once cancelled or finished.
    pub fn progress_at(&self, now: Instant) -> Option<f32> {
        if self.cancelled {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.started);
        if self.duration.is_zero() {
            // Degenerate loop: show the end state, once for one-shots.
            return (self.looping || elapsed.is_zero()).then_some(1.0);
        }
        let ratio = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        if self.looping {
            Some(ratio.fract() as f32)
        } else if ratio > 1.0 {
            None
        } else {
            Some(ratio as f32)
        }
    }

    /// Whether another frame is due at `now`.
    pub fn is_running(&self, now: Instant) -> bool {
        self.progress_at(now).is_some()
    }

    /// Render the frame for `now` into `dst`; returns the progress drawn, or `None` when
    /// the playback is over (nothing is drawn then).
    pub fn frame(&self, now: Instant, dst: &mut Surface) -> Option<f32> {
        let progress = self.progress_at(now)?;
        let plan = PreviewPlan::with_parameters(
            &self.type_id,
            &self.parameters,
            progress,
            dst.width(),
            dst.height(),
        );
        execute_plan(&plan, dst);
        Some(progress)
    }

    /// Stop immediately. Idempotent.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether [`PreviewPlayback::cancel`] was called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/playback.rs"]
mod tests;
