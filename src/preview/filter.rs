use crate::graph::instance::TransitionInstance;

/// `xfade` transition used for types without a closer match.
pub const DEFAULT_XFADE: &str = "fade";

/// ffmpeg `xfade` transition name for a catalog type id.
///
/// Every catalog type maps to a non-empty name; unknown ids get [`DEFAULT_XFADE`].
pub fn xfade_transition_name(type_id: &str) -> &'static str {
    match type_id {
        "fade" | "crossfade" => "fade",
        "fadeBlack" => "fadeblack",
        "fadeWhite" => "fadewhite",
        "dissolve" => "dissolve",
        "wipeLeft" => "wipeleft",
        "wipeRight" => "wiperight",
        "wipeUp" => "wipeup",
        "wipeDown" => "wipedown",
        "slideLeft" => "slideleft",
        "slideRight" => "slideright",
        "slideUp" => "slideup",
        "slideDown" => "slidedown",
        "zoomIn" => "zoomin",
        // xfade has no zoom-out; squeeze reads closest.
        "zoomOut" => "squeezeh",
        "circleOpen" => "circleopen",
        "circleClose" => "circleclose",
        "pixelate" => "pixelize",
        "blur" => "hblur",
        "mirror" => "horzopen",
        _ => DEFAULT_XFADE,
    }
}

/// Offset into the first input where a transition of `duration_secs` must start so it
/// ends with that input.
pub fn xfade_offset_secs(from_clip_secs: f64, duration_secs: f64) -> f64 {
    let offset = from_clip_secs - duration_secs;
    if offset.is_finite() { offset.max(0.0) } else { 0.0 }
}

/// Two-input filter graph for `instance`, starting `offset_secs` into input 0.
///
/// Video is labeled `[v]`; with `with_audio`, an `acrossfade` of the same length is
/// appended and labeled `[a]`.
pub fn xfade_filter_graph(instance: &TransitionInstance, offset_secs: f64, with_audio: bool) -> String {
    let duration = if instance.duration_secs.is_finite() {
        instance.duration_secs.max(0.0)
    } else {
        0.0
    };
    let offset = if offset_secs.is_finite() {
        offset_secs.max(0.0)
    } else {
        0.0
    };
    let mut filters = vec![format!(
        "[0:v][1:v]xfade=transition={name}:duration={duration:.3}:offset={offset:.3}[v]",
        name = xfade_transition_name(&instance.type_id),
    )];
    if with_audio {
        filters.push(format!("[0:a][1:a]acrossfade=d={duration:.3}[a]"));
    }
    filters.join(";")
}

#[cfg(test)]
#[path = "../../tests/unit/preview/filter.rs"]
mod tests;
