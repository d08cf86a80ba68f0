use crate::catalog::types::TransitionType;
use crate::foundation::core::{ClipDurations, ClipId};

/// Pick the duration a request asks for, replacing invalid values with the type default.
pub(crate) fn requested_duration(requested: Option<f64>, ty: &TransitionType) -> f64 {
    match requested {
        Some(d) if d.is_finite() && d > 0.0 => d,
        Some(d) => {
            tracing::debug!(
                requested = d,
                type_id = ty.id,
                "invalid transition duration, using type default"
            );
            ty.default_duration_secs
        }
        None => ty.default_duration_secs,
    }
}

/// `min(requested, min(from, to) / 2)` over whichever clip durations are known.
///
/// A transition never exceeds half the shorter neighbouring clip.
pub fn clamp_duration(requested: f64, from_secs: Option<f64>, to_secs: Option<f64>) -> f64 {
    let shorter = match (from_secs, to_secs) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) | (None, Some(a)) => Some(a),
        (None, None) => None,
    };
    match shorter {
        Some(s) if s.is_finite() => requested.min(s.max(0.0) / 2.0),
        _ => requested,
    }
}

pub(crate) fn clamp_for_clips(
    requested: f64,
    from: &ClipId,
    to: &ClipId,
    clips: &dyn ClipDurations,
) -> f64 {
    clamp_duration(requested, clips.clip_duration(from), clips.clip_duration(to))
}
