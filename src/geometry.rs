//! Normalized viewport geometry and the size/aspect values it is derived from.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Epoch of the artwork currently on screen.
///
/// A viewport is only meaningful relative to the epoch that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewportId(pub u64);

impl ViewportId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for ViewportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ViewportError {
    #[error("viewport edge is not a finite number")]
    NonFinite,
    #[error("viewport edge {0} lies outside [0, 1]")]
    OutOfRange(f32),
    #[error("viewport is empty (left {left}, top {top}, right {right}, bottom {bottom})")]
    Empty {
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
    },
}

/// Visible crop region, normalized to the artwork's bounding box.
///
/// Always satisfies `0 <= left < right <= 1` and `0 <= top < bottom <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewportEdges", into = "ViewportEdges")]
pub struct Viewport {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewportEdges {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl TryFrom<ViewportEdges> for Viewport {
    type Error = ViewportError;

    fn try_from(e: ViewportEdges) -> Result<Self, Self::Error> {
        Viewport::try_new(e.left, e.top, e.right, e.bottom)
    }
}

impl From<Viewport> for ViewportEdges {
    fn from(v: Viewport) -> Self {
        Self {
            left: v.left,
            top: v.top,
            right: v.right,
            bottom: v.bottom,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::FULL
    }
}

impl Viewport {
    pub const FULL: Viewport = Viewport {
        left: 0.0,
        top: 0.0,
        right: 1.0,
        bottom: 1.0,
    };

    pub fn try_new(left: f32, top: f32, right: f32, bottom: f32) -> Result<Self, ViewportError> {
        for edge in [left, top, right, bottom] {
            if !edge.is_finite() {
                return Err(ViewportError::NonFinite);
            }
            if !(0.0..=1.0).contains(&edge) {
                return Err(ViewportError::OutOfRange(edge));
            }
        }
        if left >= right || top >= bottom {
            return Err(ViewportError::Empty {
                left,
                top,
                right,
                bottom,
            });
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Builds a viewport from edges the caller guarantees to be valid.
    ///
    /// Malformed input is a contract violation: it panics in debug builds and
    /// is clamped (see [`Viewport::clamped`]) in release builds.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        match Self::try_new(left, top, right, bottom) {
            Ok(v) => v,
            Err(err) => {
                debug_assert!(false, "malformed viewport: {err}");
                Self::clamped(left, top, right, bottom)
            }
        }
    }

    /// Forces arbitrary edges into a valid rectangle.
    ///
    /// NaN edges snap to the full-frame edge, swapped edges are reordered and a
    /// rectangle that is still empty becomes [`Viewport::FULL`].
    pub fn clamped(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        let (left, right) = clamp_span(left, right);
        let (top, bottom) = clamp_span(top, bottom);
        if left >= right || top >= bottom {
            return Self::FULL;
        }
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

fn clamp_span(low: f32, high: f32) -> (f32, f32) {
    let low = if low.is_nan() { 0.0 } else { low.clamp(0.0, 1.0) };
    let high = if high.is_nan() { 1.0 } else { high.clamp(0.0, 1.0) };
    if low > high { (high, low) } else { (low, high) }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}, {:.3}, {:.3}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Width/height pair in device-independent units. A height of 0 means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const UNKNOWN: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_known(&self) -> bool {
        self.height > 0.0
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::of(*self)
    }
}

/// `width / height`, with 0 standing for "not known yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct AspectRatio(f32);

impl AspectRatio {
    pub const UNKNOWN: AspectRatio = AspectRatio(0.0);

    pub fn of(size: Size) -> Self {
        if !(size.width.is_finite() && size.height.is_finite()) {
            return Self::UNKNOWN;
        }
        if size.width <= 0.0 || size.height <= 0.0 {
            return Self::UNKNOWN;
        }
        Self(size.width / size.height)
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn is_known(&self) -> bool {
        self.0 > 0.0
    }

    /// `self / base`, or `None` while either side is unknown.
    pub fn relative_to(&self, base: AspectRatio) -> Option<f32> {
        if !self.is_known() || !base.is_known() {
            return None;
        }
        Some(self.0 / base.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_malformed_rectangles() {
        assert_eq!(
            Viewport::try_new(f32::NAN, 0.0, 1.0, 1.0),
            Err(ViewportError::NonFinite)
        );
        assert_eq!(
            Viewport::try_new(-0.1, 0.0, 1.0, 1.0),
            Err(ViewportError::OutOfRange(-0.1))
        );
        assert!(matches!(
            Viewport::try_new(0.5, 0.0, 0.5, 1.0),
            Err(ViewportError::Empty { .. })
        ));
        assert!(Viewport::try_new(0.1, 0.2, 0.9, 0.8).is_ok());
    }

    #[test]
    fn clamped_repairs_out_of_range_edges() {
        let v = Viewport::clamped(-0.5, 0.25, 1.5, 0.75);
        assert_eq!(v, Viewport::try_new(0.0, 0.25, 1.0, 0.75).unwrap());

        let swapped = Viewport::clamped(0.8, 0.9, 0.2, 0.1);
        assert_eq!(swapped, Viewport::try_new(0.2, 0.1, 0.8, 0.9).unwrap());

        assert_eq!(Viewport::clamped(0.4, 0.0, 0.4, 1.0), Viewport::FULL);
        assert_eq!(
            Viewport::clamped(f32::NAN, 0.0, f32::NAN, 1.0),
            Viewport::FULL
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "malformed viewport")]
    fn new_asserts_in_debug_builds() {
        let _ = Viewport::new(0.9, 0.0, 0.1, 1.0);
    }

    #[test]
    fn deserialize_goes_through_validation() {
        let ok: Viewport =
            serde_yaml::from_str("{ left: 0.1, top: 0.1, right: 0.6, bottom: 0.9 }").unwrap();
        assert!((ok.width() - 0.5).abs() < f32::EPSILON);

        let err = serde_yaml::from_str::<Viewport>("{ left: 0.6, top: 0.1, right: 0.1, bottom: 0.9 }");
        assert!(err.is_err());
    }

    #[test]
    fn aspect_ratio_uses_zero_for_unknown() {
        assert_eq!(Size::new(1000.0, 500.0).aspect_ratio().value(), 2.0);
        assert!(!Size::new(1000.0, 0.0).aspect_ratio().is_known());
        assert!(!Size::new(f32::INFINITY, 10.0).aspect_ratio().is_known());

        let art = Size::new(1000.0, 250.0).aspect_ratio();
        assert_eq!(art.relative_to(Size::new(400.0, 400.0).aspect_ratio()), Some(4.0));
        assert_eq!(art.relative_to(AspectRatio::UNKNOWN), None);
        assert_eq!(AspectRatio::UNKNOWN.relative_to(art), None);
    }

    #[test]
    fn viewport_id_advances() {
        assert_eq!(ViewportId(6).next(), ViewportId(7));
        assert_eq!(ViewportId(u64::MAX).next(), ViewportId(0));
    }
}
