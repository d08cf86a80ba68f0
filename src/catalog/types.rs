use std::fmt;

/// Display grouping of transition types.
///
/// Presentation only: it never affects duration clamping or validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Alpha blend or luminance ramp between full frames.
    Fade,
    /// Moving axis-aligned boundary.
    Wipe,
    /// Both frames pushed along one axis.
    Slide,
    /// One frame scaled around the center over the other.
    Zoom,
    /// Stylized effects (pixelate, blur, mirror).
    Effect,
    /// Geometric masks (circle open/close).
    Shape,
}

impl Category {
    /// All categories, in catalog display order.
    pub const ALL: [Category; 6] = [
        Category::Fade,
        Category::Wipe,
        Category::Slide,
        Category::Zoom,
        Category::Effect,
        Category::Shape,
    ];

    /// Parse a category name (case-insensitive). Returns `None` for unknown names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fade" => Some(Self::Fade),
            "wipe" => Some(Self::Wipe),
            "slide" => Some(Self::Slide),
            "zoom" => Some(Self::Zoom),
            "effect" => Some(Self::Effect),
            "shape" => Some(Self::Shape),
            _ => None,
        }
    }

    /// Lowercase name used in JSON and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Wipe => "wipe",
            Self::Slide => "slide",
            Self::Zoom => "zoom",
            Self::Effect => "effect",
            Self::Shape => "shape",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable, catalog-defined transition type.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionType {
    /// Unique id (e.g. `wipeLeft`).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Short glyph shown next to the name in pickers.
    pub icon: &'static str,
    /// Display grouping.
    pub category: Category,
    /// Duration used when a request carries none (seconds, > 0).
    pub default_duration_secs: f64,
    /// Parameter keys accepted by this type.
    pub parameter_names: &'static [&'static str],
}

impl TransitionType {
    /// Whether `name` is one of this type's parameters.
    pub fn accepts_parameter(&self, name: &str) -> bool {
        self.parameter_names.contains(&name)
    }
}

/// A curated subset of type ids for quick selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Preset {
    /// Preset name.
    pub name: &'static str,
    /// Member type ids, in display order.
    pub members: &'static [&'static str],
}
