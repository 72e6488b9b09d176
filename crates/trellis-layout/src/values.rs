//! Auto-or-length values used by width, height and margins.
//!
//! [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)

use serde::{Deserialize, Serialize};

use crate::box_model::EdgeSizes;

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
///
/// In style declarations this is written either as the string `"auto"` or
/// as a number of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "AutoOrRepr", into = "AutoOrRepr")]
pub enum AutoOr {
    /// The value is 'auto' and must be resolved during layout.
    #[default]
    Auto,
    /// The value is a specific length in pixels.
    Length(f32),
}

impl AutoOr {
    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Get the length value, or a default if 'auto'.
    #[must_use]
    pub const fn to_px_or(&self, default: f32) -> f32 {
        match self {
            Self::Length(v) => *v,
            Self::Auto => default,
        }
    }
}

impl From<f32> for AutoOr {
    fn from(px: f32) -> Self {
        Self::Length(px)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AutoOrRepr {
    Keyword(String),
    Length(f32),
}

impl TryFrom<AutoOrRepr> for AutoOr {
    type Error = String;

    fn try_from(repr: AutoOrRepr) -> Result<Self, Self::Error> {
        match repr {
            AutoOrRepr::Length(px) => Ok(Self::Length(px)),
            AutoOrRepr::Keyword(k) if k.eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            AutoOrRepr::Keyword(k) => Err(format!("expected \"auto\" or a length, found \"{k}\"")),
        }
    }
}

impl From<AutoOr> for AutoOrRepr {
    fn from(value: AutoOr) -> Self {
        match value {
            AutoOr::Auto => Self::Keyword("auto".to_string()),
            AutoOr::Length(px) => Self::Length(px),
        }
    }
}

/// [§ 8 Box model](https://www.w3.org/TR/CSS2/box.html)
///
/// Edge values where each side can be 'auto' or a specific length.
/// Used for margins where 'auto' has special meaning (centering).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AutoEdgeSizes {
    /// Top edge value.
    pub top: AutoOr,
    /// Right edge value.
    pub right: AutoOr,
    /// Bottom edge value.
    pub bottom: AutoOr,
    /// Left edge value.
    pub left: AutoOr,
}

impl AutoEdgeSizes {
    /// All four sides set to zero pixels.
    #[must_use]
    pub const fn zero() -> Self {
        Self::uniform(AutoOr::Length(0.0))
    }

    /// The same value on all four sides.
    #[must_use]
    pub const fn uniform(value: AutoOr) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Resolve every side, substituting `auto_value` for 'auto'.
    #[must_use]
    pub const fn to_px_or(&self, auto_value: f32) -> EdgeSizes {
        EdgeSizes {
            top: self.top.to_px_or(auto_value),
            right: self.right.to_px_or(auto_value),
            bottom: self.bottom.to_px_or(auto_value),
            left: self.left.to_px_or(auto_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_or_to_px() {
        assert!(AutoOr::Auto.is_auto());
        assert_eq!(AutoOr::Auto.to_px_or(3.0), 3.0);
        assert_eq!(AutoOr::Length(7.5).to_px_or(3.0), 7.5);
    }

    #[test]
    fn test_auto_edges_resolve() {
        let edges = AutoEdgeSizes {
            left: AutoOr::Auto,
            ..AutoEdgeSizes::uniform(AutoOr::Length(4.0))
        };
        let px = edges.to_px_or(0.0);
        assert_eq!(px.left, 0.0);
        assert_eq!(px.top, 4.0);
    }
}
