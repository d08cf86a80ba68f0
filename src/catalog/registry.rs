use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::types::{Category, Preset, TransitionType};
use crate::foundation::error::{SegueError, SegueResult};

/// Type id used whenever a type cannot be resolved for rendering.
pub const FALLBACK_TYPE_ID: &str = "crossfade";

const EASE: &[&str] = &["ease"];
const WIPE_PARAMS: &[&str] = &["ease", "softEdge"];
const ZOOM_PARAMS: &[&str] = &["ease", "originX", "originY"];
const SHAPE_PARAMS: &[&str] = &["ease", "softEdge", "originX", "originY"];

const fn ty(
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    category: Category,
    default_duration_secs: f64,
    parameter_names: &'static [&'static str],
) -> TransitionType {
    TransitionType {
        id,
        name,
        icon,
        category,
        default_duration_secs,
        parameter_names,
    }
}

static BUILTIN_TYPES: [TransitionType; 20] = [
    ty("fade", "Fade", "◐", Category::Fade, 1.0, EASE),
    ty("crossfade", "Cross Dissolve", "⧉", Category::Fade, 1.0, EASE),
    ty("fadeBlack", "Fade Through Black", "●", Category::Fade, 1.0, EASE),
    ty("fadeWhite", "Fade Through White", "○", Category::Fade, 1.0, EASE),
    ty("dissolve", "Dissolve", "░", Category::Fade, 1.0, &["ease", "seed"]),
    ty("wipeLeft", "Wipe Left", "⇠", Category::Wipe, 0.8, WIPE_PARAMS),
    ty("wipeRight", "Wipe Right", "⇢", Category::Wipe, 0.8, WIPE_PARAMS),
    ty("wipeUp", "Wipe Up", "⇡", Category::Wipe, 0.8, WIPE_PARAMS),
    ty("wipeDown", "Wipe Down", "⇣", Category::Wipe, 0.8, WIPE_PARAMS),
    ty("slideLeft", "Slide Left", "←", Category::Slide, 0.6, EASE),
    ty("slideRight", "Slide Right", "→", Category::Slide, 0.6, EASE),
    ty("slideUp", "Slide Up", "↑", Category::Slide, 0.6, EASE),
    ty("slideDown", "Slide Down", "↓", Category::Slide, 0.6, EASE),
    ty("zoomIn", "Zoom In", "⊕", Category::Zoom, 0.7, ZOOM_PARAMS),
    ty("zoomOut", "Zoom Out", "⊖", Category::Zoom, 0.7, ZOOM_PARAMS),
    ty("circleOpen", "Circle Open", "◯", Category::Shape, 0.9, SHAPE_PARAMS),
    ty("circleClose", "Circle Close", "◉", Category::Shape, 0.9, SHAPE_PARAMS),
    ty("pixelate", "Pixelate", "▦", Category::Effect, 0.8, &["ease", "maxBlock"]),
    ty("blur", "Blur", "≋", Category::Effect, 0.8, &["ease", "maxRadius"]),
    ty("mirror", "Mirror", "⇋", Category::Effect, 0.8, EASE),
];

static BUILTIN_PRESETS: [Preset; 4] = [
    Preset {
        name: "subtle",
        members: &["fade", "crossfade", "dissolve"],
    },
    Preset {
        name: "dynamic",
        members: &["wipeLeft", "wipeRight", "slideLeft", "slideRight", "zoomIn"],
    },
    Preset {
        name: "cinematic",
        members: &["fadeBlack", "fadeWhite", "circleOpen", "circleClose"],
    },
    Preset {
        name: "playful",
        members: &["pixelate", "blur", "mirror", "slideUp", "slideDown", "zoomOut"],
    },
];

/// Static registry of transition types and named presets.
///
/// Pure data plus lookup; no mutable state.
#[derive(Clone, Copy, Debug)]
pub struct TransitionCatalog {
    types: &'static [TransitionType],
    presets: &'static [Preset],
}

impl Default for TransitionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TransitionCatalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            types: &BUILTIN_TYPES,
            presets: &BUILTIN_PRESETS,
        }
    }

    /// List types, optionally filtered by category name.
    ///
    /// `None` or `"all"` returns everything; an unknown category returns an empty list.
    pub fn list(&self, category: Option<&str>) -> Vec<&'static TransitionType> {
        let filter = match category.map(str::trim) {
            None => None,
            Some(c) if c.eq_ignore_ascii_case("all") => None,
            Some(c) => match Category::parse(c) {
                Some(cat) => Some(cat),
                None => return Vec::new(),
            },
        };
        self.types
            .iter()
            .filter(|t| filter.is_none_or(|cat| t.category == cat))
            .collect()
    }

    /// Resolve a type id.
    pub fn resolve(&self, type_id: &str) -> SegueResult<&'static TransitionType> {
        self.types
            .iter()
            .find(|t| t.id == type_id)
            .ok_or_else(|| SegueError::unknown_type(type_id))
    }

    /// Resolve a type id, falling back to [`FALLBACK_TYPE_ID`].
    pub fn resolve_or_fallback(&self, type_id: &str) -> &'static TransitionType {
        self.resolve(type_id)
            .or_else(|_| self.resolve(FALLBACK_TYPE_ID))
            .unwrap_or(&BUILTIN_TYPES[1])
    }

    /// Preset name to member type ids.
    pub fn presets(&self) -> BTreeMap<&'static str, &'static [&'static str]> {
        self.presets.iter().map(|p| (p.name, p.members)).collect()
    }

    /// Look up one preset by name.
    pub fn preset(&self, name: &str) -> SegueResult<&'static Preset> {
        self.presets
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| SegueError::UnknownPreset(name.to_owned()))
    }

    /// Uniformly pick one member of a preset ("apply preset").
    pub fn pick_preset<R: Rng + ?Sized>(
        &self,
        name: &str,
        rng: &mut R,
    ) -> SegueResult<&'static TransitionType> {
        let preset = self.preset(name)?;
        let id = preset
            .members
            .choose(rng)
            .ok_or_else(|| SegueError::validation(format!("preset '{name}' has no members")))?;
        self.resolve(id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/registry.rs"]
mod tests;
