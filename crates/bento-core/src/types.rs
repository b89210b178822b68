//! Core value types shared by the layout solvers.

use std::fmt;

use glam::DVec2;

/// One of the two layout axes.
///
/// A linear layout places cells along its orientation (the primary axis) and
/// stacks lines along the [opposite](Orientation::opposite) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Left to right
    #[default]
    Horizontal,
    /// Top to bottom
    Vertical,
}

impl Orientation {
    /// Both axes, in the order the grid solver processes them.
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

    /// The perpendicular axis.
    pub fn opposite(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Get the component of `v` along this axis.
    pub fn component(self, v: DVec2) -> f64 {
        match self {
            Orientation::Horizontal => v.x,
            Orientation::Vertical => v.y,
        }
    }

    /// Set the component of `v` along this axis.
    pub fn set_component(self, v: &mut DVec2, value: f64) {
        match self {
            Orientation::Horizontal => v.x = value,
            Orientation::Vertical => v.y = value,
        }
    }

    /// Build a vector from a value along this axis and one across it.
    pub fn vector(self, along: f64, across: f64) -> DVec2 {
        match self {
            Orientation::Horizontal => DVec2::new(along, across),
            Orientation::Vertical => DVec2::new(across, along),
        }
    }

    /// Parse "horizontal" or "vertical".
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "horizontal" => Some(Orientation::Horizontal),
            "vertical" => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => f.write_str("horizontal"),
            Orientation::Vertical => f.write_str("vertical"),
        }
    }
}

/// A pair of values, one per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerAxis<T> {
    pub horizontal: T,
    pub vertical: T,
}

impl<T> PerAxis<T> {
    pub fn new(horizontal: T, vertical: T) -> Self {
        Self { horizontal, vertical }
    }

    pub fn get(&self, axis: Orientation) -> &T {
        match axis {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        }
    }

    pub fn get_mut(&mut self, axis: Orientation) -> &mut T {
        match axis {
            Orientation::Horizontal => &mut self.horizontal,
            Orientation::Vertical => &mut self.vertical,
        }
    }

    pub fn set(&mut self, axis: Orientation, value: T) {
        *self.get_mut(axis) = value;
    }
}

impl<T: Clone> PerAxis<T> {
    /// Same value on both axes.
    pub fn splat(value: T) -> Self {
        Self {
            horizontal: value.clone(),
            vertical: value,
        }
    }
}

/// Unique identifier for a cell registered with a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub u64);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create bounds with position and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create bounds from position and size vectors.
    pub fn from_vecs(position: DVec2, size: DVec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Lowest coordinate along `axis`.
    pub fn min(&self, axis: Orientation) -> f64 {
        match axis {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    /// Highest coordinate along `axis`.
    pub fn max(&self, axis: Orientation) -> f64 {
        match axis {
            Orientation::Horizontal => self.right(),
            Orientation::Vertical => self.bottom(),
        }
    }

    /// Extent along `axis`.
    pub fn size_along(&self, axis: Orientation) -> f64 {
        match axis {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    /// Whether every coordinate is finite and the size is not negative.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// Check if a point is inside the bounds.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Compute union (bounding box) with another bounds.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Bounds::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Shift by `offset`.
    pub fn translated(&self, offset: DVec2) -> Bounds {
        Bounds::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Grow along `axis` by `before` on the low side and `after` on the high side.
    pub fn dilated_along(&self, axis: Orientation, before: f64, after: f64) -> Bounds {
        match axis {
            Orientation::Horizontal => {
                Bounds::new(self.x - before, self.y, self.width + before + after, self.height)
            }
            Orientation::Vertical => {
                Bounds::new(self.x, self.y - before, self.width, self.height + before + after)
            }
        }
    }
}

/// Fold an optional running union with another bounds.
pub fn union_bounds(acc: Option<Bounds>, next: Bounds) -> Option<Bounds> {
    Some(match acc {
        Some(current) => current.union(&next),
        None => next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_opposite() {
        assert_eq!(Orientation::Horizontal.opposite(), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.opposite().opposite(), Orientation::Vertical);
    }

    #[test]
    fn test_orientation_components() {
        let mut v = DVec2::new(3.0, 4.0);
        assert!((Orientation::Horizontal.component(v) - 3.0).abs() < 0.001);
        assert!((Orientation::Vertical.component(v) - 4.0).abs() < 0.001);

        Orientation::Vertical.set_component(&mut v, 10.0);
        assert!((v.y - 10.0).abs() < 0.001);
        assert_eq!(Orientation::Vertical.vector(1.0, 2.0), DVec2::new(2.0, 1.0));
    }

    #[test]
    fn test_bounds_axis_accessors() {
        let bounds = Bounds::new(10.0, 20.0, 100.0, 50.0);
        assert!((bounds.min(Orientation::Horizontal) - 10.0).abs() < 0.001);
        assert!((bounds.max(Orientation::Vertical) - 70.0).abs() < 0.001);
        assert!((bounds.size_along(Orientation::Vertical) - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(20.0, 5.0, 10.0, 10.0);
        let u = a.union(&b);
        assert_eq!(u, Bounds::new(0.0, 0.0, 30.0, 15.0));
        assert_eq!(union_bounds(None, a), Some(a));
    }

    #[test]
    fn test_bounds_dilated() {
        let b = Bounds::new(5.0, 5.0, 10.0, 10.0).dilated_along(Orientation::Horizontal, 2.0, 3.0);
        assert_eq!(b, Bounds::new(3.0, 5.0, 15.0, 10.0));
    }

    #[test]
    fn test_bounds_validity() {
        assert!(Bounds::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Bounds::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
        assert!(!Bounds::new(0.0, 0.0, -1.0, 1.0).is_valid());
    }
}
