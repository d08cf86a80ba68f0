use std::collections::BTreeMap;

use crate::catalog::registry::FALLBACK_TYPE_ID;
use crate::foundation::core::Vec2;

/// Easing applied to preview progress before compositing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    /// Identity.
    #[default]
    Linear,
    /// Quadratic ease-in.
    EaseIn,
    /// Quadratic ease-out.
    EaseOut,
    /// Quadratic ease-in/out.
    EaseInOut,
}

impl Ease {
    /// Parse a parameter value; unknown names are `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "linear" => Some(Self::Linear),
            "easeIn" | "ease-in" => Some(Self::EaseIn),
            "easeOut" | "ease-out" => Some(Self::EaseOut),
            "easeInOut" | "ease-in-out" | "ease" => Some(Self::EaseInOut),
            _ => None,
        }
    }

    /// Map `t` in `[0, 1]`; both endpoints are fixed points.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Axis direction a wipe boundary travels in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WipeDir {
    /// Boundary moves left to right.
    LeftToRight,
    /// Boundary moves right to left.
    RightToLeft,
    /// Boundary moves top to bottom.
    TopToBottom,
    /// Boundary moves bottom to top.
    BottomToTop,
}

/// Direction both regions travel during a slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDir {
    /// Toward the left edge.
    Left,
    /// Toward the right edge.
    Right,
    /// Toward the top edge.
    Up,
    /// Toward the bottom edge.
    Down,
}

/// Tint a fade passes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    /// Dip to black.
    Black,
    /// Dip to white.
    White,
}

impl Tint {
    pub(crate) fn premul(self) -> [u8; 4] {
        match self {
            Self::Black => [0, 0, 0, 255],
            Self::White => [255, 255, 255, 255],
        }
    }
}

/// Resolved compositing behavior of a transition type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionKind {
    /// Plain alpha blend.
    Crossfade,
    /// Blend that passes through a tint at the midpoint.
    Dip {
        /// Tint color.
        tint: Tint,
    },
    /// Per-pixel hashed threshold.
    Dissolve {
        /// Hash seed.
        seed: u64,
    },
    /// Moving boundary, "to" revealed behind it.
    Wipe {
        /// Travel direction.
        dir: WipeDir,
        /// Feather width as a fraction of the axis.
        soft_edge: f32,
    },
    /// Both regions pushed along one axis.
    Slide {
        /// Travel direction.
        dir: SlideDir,
    },
    /// One region scaled around `origin`, blended over the other.
    Zoom {
        /// `true`: "to" grows in; `false`: "from" shrinks away.
        zoom_in: bool,
        /// Scale at the small end.
        min_scale: f32,
        /// Normalized scale origin.
        origin: Vec2,
    },
    /// Circular mask around `origin`.
    Circle {
        /// `true`: "to" grows from the center; `false`: "from" shrinks to it.
        open: bool,
        /// Normalized circle origin.
        origin: Vec2,
        /// Feather width as a fraction of the radius range.
        soft_edge: f32,
    },
    /// Mosaic that peaks mid-transition.
    Pixelate {
        /// Largest block edge in pixels.
        max_block: u32,
    },
    /// Box blur that peaks mid-transition.
    Blur {
        /// Largest blur radius in pixels.
        max_radius: u32,
    },
    /// Horizontal fold that peaks mid-transition.
    Mirror,
}

const DEFAULT_MAX_BLOCK: u32 = 16;
const DEFAULT_MAX_RADIUS: u32 = 8;
/// Upper bound for `maxBlock`; compositing also caps it at the surface's longer edge.
pub(crate) const MAX_BLOCK_LIMIT: u32 = 4096;
/// Upper bound for `maxRadius`; box blur cost grows linearly with it.
pub(crate) const MAX_RADIUS_LIMIT: u32 = 64;
const ZOOM_MIN_SCALE: f32 = 0.1;
const CENTER: Vec2 = Vec2::new(0.5, 0.5);

impl TransitionKind {
    /// Resolve a catalog type id with its parameters; unknown ids fall back to crossfade.
    pub fn resolve(type_id: &str, params: &BTreeMap<String, serde_json::Value>) -> Self {
        let soft_edge = param_f32(params, "softEdge").unwrap_or(0.0).clamp(0.0, 1.0);
        let origin = Vec2::new(
            param_f32(params, "originX").map_or(CENTER.x, f64::from).clamp(0.0, 1.0),
            param_f32(params, "originY").map_or(CENTER.y, f64::from).clamp(0.0, 1.0),
        );
        match type_id {
            "fade" | "crossfade" => Self::Crossfade,
            "fadeBlack" => Self::Dip { tint: Tint::Black },
            "fadeWhite" => Self::Dip { tint: Tint::White },
            "dissolve" => Self::Dissolve {
                seed: params
                    .get("seed")
                    .and_then(serde_json::Value::as_u64)
                    .unwrap_or(0),
            },
            "wipeLeft" => Self::Wipe {
                dir: WipeDir::RightToLeft,
                soft_edge,
            },
            "wipeRight" => Self::Wipe {
                dir: WipeDir::LeftToRight,
                soft_edge,
            },
            "wipeUp" => Self::Wipe {
                dir: WipeDir::BottomToTop,
                soft_edge,
            },
            "wipeDown" => Self::Wipe {
                dir: WipeDir::TopToBottom,
                soft_edge,
            },
            "slideLeft" => Self::Slide { dir: SlideDir::Left },
            "slideRight" => Self::Slide {
                dir: SlideDir::Right,
            },
            "slideUp" => Self::Slide { dir: SlideDir::Up },
            "slideDown" => Self::Slide {
                dir: SlideDir::Down,
            },
            "zoomIn" | "zoomOut" => Self::Zoom {
                zoom_in: type_id == "zoomIn",
                min_scale: ZOOM_MIN_SCALE,
                origin,
            },
            "circleOpen" | "circleClose" => Self::Circle {
                open: type_id == "circleOpen",
                origin,
                soft_edge,
            },
            "pixelate" => Self::Pixelate {
                max_block: param_u32(params, "maxBlock")
                    .unwrap_or(DEFAULT_MAX_BLOCK)
                    .clamp(1, MAX_BLOCK_LIMIT),
            },
            "blur" => Self::Blur {
                max_radius: param_u32(params, "maxRadius")
                    .unwrap_or(DEFAULT_MAX_RADIUS)
                    .min(MAX_RADIUS_LIMIT),
            },
            "mirror" => Self::Mirror,
            other => {
                tracing::debug!(
                    type_id = other,
                    fallback = FALLBACK_TYPE_ID,
                    "unknown preview type"
                );
                Self::Crossfade
            }
        }
    }
}

/// Which schematic source a fill targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// The outgoing clip.
    From,
    /// The incoming clip.
    To,
}

/// One drawing command of a preview.
#[derive(Clone, Debug, PartialEq)]
pub enum PreviewOp {
    /// Paint a source's schematic card: a solid body with a darker header band.
    FillSource {
        /// Target source surface.
        source: Source,
        /// Body color (straight alpha).
        body: [u8; 4],
        /// Header band color (straight alpha).
        band: [u8; 4],
    },
    /// Composite both sources into the output.
    Composite {
        /// Compositing behavior.
        kind: TransitionKind,
        /// Eased progress in `[0, 1]`.
        progress: f32,
    },
}

/// Deterministic drawing commands for one preview frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewPlan {
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// Commands, in execution order.
    pub ops: Vec<PreviewOp>,
}

/// Schematic body color of the outgoing clip.
pub const FROM_BODY: [u8; 4] = [66, 133, 244, 255];
/// Schematic body color of the incoming clip.
pub const TO_BODY: [u8; 4] = [234, 67, 53, 255];
const FROM_BAND: [u8; 4] = [25, 60, 130, 255];
const TO_BAND: [u8; 4] = [120, 30, 20, 255];

impl PreviewPlan {
    /// Plan for `type_id` at `progress` with default parameters.
    pub fn for_type(type_id: &str, progress: f32, width: u32, height: u32) -> Self {
        Self::with_parameters(type_id, &BTreeMap::new(), progress, width, height)
    }

    /// Plan for `type_id` at `progress` with explicit parameters (`ease`, `softEdge`, ...).
    pub fn with_parameters(
        type_id: &str,
        params: &BTreeMap<String, serde_json::Value>,
        progress: f32,
        width: u32,
        height: u32,
    ) -> Self {
        let ease = params
            .get("ease")
            .and_then(serde_json::Value::as_str)
            .and_then(Ease::parse)
            .unwrap_or_default();
        let progress = if progress.is_nan() { 0.0 } else { progress };
        Self {
            width,
            height,
            ops: vec![
                PreviewOp::FillSource {
                    source: Source::From,
                    body: FROM_BODY,
                    band: FROM_BAND,
                },
                PreviewOp::FillSource {
                    source: Source::To,
                    body: TO_BODY,
                    band: TO_BAND,
                },
                PreviewOp::Composite {
                    kind: TransitionKind::resolve(type_id, params),
                    progress: ease.apply(progress),
                },
            ],
        }
    }
}

fn param_f32(params: &BTreeMap<String, serde_json::Value>, key: &str) -> Option<f32> {
    params
        .get(key)
        .and_then(serde_json::Value::as_f64)
        .filter(|v| v.is_finite())
        .map(|v| v as f32)
}

fn param_u32(params: &BTreeMap<String, serde_json::Value>, key: &str) -> Option<u32> {
    params
        .get(key)
        .and_then(serde_json::Value::as_u64)
        .map(|v| v.min(u64::from(u32::MAX)) as u32)
}

#[cfg(test)]
#[path = "../../tests/unit/preview/plan.rs"]
mod tests;
