use crate::foundation::core::ClipId;
use crate::foundation::error::{SegueError, SegueResult};
use crate::graph::graph::TransitionGraph;
use crate::graph::instance::{TransitionInstance, TransitionRequest};
use crate::store::bridge::StoreBridge;

/// Attach a transition against the live store: clamp with live clip durations, require the
/// pair to be adjacent, persist, then mirror.
///
/// The graph is only touched once the store write succeeded.
pub(crate) fn apply_add(
    graph: &mut TransitionGraph,
    bridge: &StoreBridge,
    request: &TransitionRequest,
) -> SegueResult<TransitionInstance> {
    let clips = bridge.clip_refs()?;
    let instance = graph.build(request, &clips)?;
    if !bridge.are_adjacent(&request.from, &request.to)? {
        return Err(SegueError::validation(format!(
            "clips '{}' and '{}' are not adjacent on one track",
            request.from, request.to
        )));
    }
    bridge.write_transition(&instance)?;
    graph.insert(instance.clone());
    Ok(instance)
}

/// Remove the transition touching `clip` from the store and the mirror.
///
/// The mirror's record picks the pair; without one, the first stored record touching the
/// clip does. Returns whether anything was removed.
pub(crate) fn apply_remove(
    graph: &mut TransitionGraph,
    bridge: &StoreBridge,
    clip: &ClipId,
) -> SegueResult<bool> {
    let pair = graph
        .get(clip)
        .map(|i| (i.from_clip_id.clone(), i.to_clip_id.clone()))
        .or_else(|| {
            bridge
                .records_touching(clip)
                .into_iter()
                .next()
                .map(|i| (i.from_clip_id, i.to_clip_id))
        });
    let Some((from, to)) = pair else {
        return Ok(false);
    };
    let stored = bridge.remove_transition(&from, &to)?;
    let mirrored = graph.remove(clip);
    Ok(stored || mirrored)
}
