use std::collections::BTreeMap;

use crate::foundation::error::{SegueError, SegueResult};
use crate::graph::instance::TransitionInstance;
use crate::preview::composite::composite;
use crate::preview::plan::{PreviewOp, PreviewPlan, Source, TransitionKind};
use crate::preview::surface::Surface;

/// Draw the schematic preview of `type_id` at `progress` onto `dst`.
///
/// Deterministic in `(type_id, progress, size)`. Unknown types render as a crossfade.
pub fn render_preview(type_id: &str, progress: f32, dst: &mut Surface) {
    render_preview_with(type_id, &BTreeMap::new(), progress, dst);
}

/// [`render_preview`] honoring an instance's stored parameters.
pub fn render_instance_preview(instance: &TransitionInstance, progress: f32, dst: &mut Surface) {
    render_preview_with(&instance.type_id, &instance.parameters, progress, dst);
}

fn render_preview_with(
    type_id: &str,
    params: &BTreeMap<String, serde_json::Value>,
    progress: f32,
    dst: &mut Surface,
) {
    let plan = PreviewPlan::with_parameters(type_id, params, progress, dst.width(), dst.height());
    execute_plan(&plan, dst);
}

/// Run `plan` against `dst`, which is cleared first and resized to the plan if needed.
pub fn execute_plan(plan: &PreviewPlan, dst: &mut Surface) {
    if dst.width() != plan.width || dst.height() != plan.height {
        *dst = Surface::new(plan.width, plan.height);
    }
    dst.clear();
    let mut from = Surface::new(plan.width, plan.height);
    let mut to = Surface::new(plan.width, plan.height);

    for op in &plan.ops {
        match op {
            PreviewOp::FillSource { source, body, band } => {
                let target = match source {
                    Source::From => &mut from,
                    Source::To => &mut to,
                };
                target.fill(*body);
                let band_h = (plan.height / 5).max(1).min(plan.height);
                target.fill_rect(0, 0, plan.width, band_h, *band);
            }
            PreviewOp::Composite { kind, progress } => composite(kind, *progress, &from, &to, dst),
        }
    }
}

/// Composite caller-provided `from`/`to` surfaces into `dst` at `progress`.
///
/// `dst` is composited over, not cleared. All three surfaces must share one size.
pub fn composite_transition(
    kind: &TransitionKind,
    progress: f32,
    from: &Surface,
    to: &Surface,
    dst: &mut Surface,
) -> SegueResult<()> {
    if !from.same_size(to) || !from.same_size(dst) {
        return Err(SegueError::validation(format!(
            "composite_transition expects equal sizes (from {}x{}, to {}x{}, dst {}x{})",
            from.width(),
            from.height(),
            to.width(),
            to.height(),
            dst.width(),
            dst.height()
        )));
    }
    composite(kind, progress, from, to, dst);
    Ok(())
}
