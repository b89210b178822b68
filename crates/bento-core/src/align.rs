//! Alignment and justification vocabulary.
//!
//! Internally both enums are axis-agnostic ("start"/"end"). Callers name
//! values relative to an axis: "left" and "top" both mean [`Alignment::Start`].
//! The `from_name`/`name` pairs translate between the two and are inverse
//! to each other for every legal input.

use crate::errors::ConfigError;
use crate::types::Orientation;

const HORIZONTAL_ALIGN_NAMES: &[&str] = &["left", "center", "right", "origin"];
const VERTICAL_ALIGN_NAMES: &[&str] = &["top", "center", "bottom", "origin"];

const HORIZONTAL_JUSTIFY_NAMES: &[&str] = &[
    "left",
    "right",
    "center",
    "spaceBetween",
    "spaceAround",
    "spaceEvenly",
];
const VERTICAL_JUSTIFY_NAMES: &[&str] = &[
    "top",
    "bottom",
    "center",
    "spaceBetween",
    "spaceAround",
    "spaceEvenly",
];

/// Placement of content inside a slot larger than itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    /// Flush with the low edge (left or top)
    Start,
    /// Centered in the slot
    #[default]
    Center,
    /// Flush with the high edge (right or bottom)
    End,
    /// Aligned by the content's interior reference point (e.g. a text
    /// baseline). Only legal for cells spanning a single line.
    Origin,
}

impl Alignment {
    /// Offset from the slot start for content leaving `free` space unused.
    pub fn offset(self, free: f64) -> f64 {
        match self {
            Alignment::Start | Alignment::Origin => 0.0,
            Alignment::Center => free / 2.0,
            Alignment::End => free,
        }
    }

    /// Translate an axis-relative name into an alignment.
    pub fn from_name(axis: Orientation, name: &str) -> Result<Self, ConfigError> {
        let value = match (axis, name) {
            (Orientation::Horizontal, "left") | (Orientation::Vertical, "top") => Alignment::Start,
            (Orientation::Horizontal, "right") | (Orientation::Vertical, "bottom") => Alignment::End,
            (_, "center") => Alignment::Center,
            (_, "origin") => Alignment::Origin,
            _ => {
                return Err(ConfigError::InvalidAlignment {
                    axis,
                    value: name.to_string(),
                    allowed: Self::allowed_names(axis),
                })
            }
        };
        Ok(value)
    }

    /// The axis-relative name of this alignment.
    pub fn name(self, axis: Orientation) -> &'static str {
        match (self, axis) {
            (Alignment::Start, Orientation::Horizontal) => "left",
            (Alignment::Start, Orientation::Vertical) => "top",
            (Alignment::End, Orientation::Horizontal) => "right",
            (Alignment::End, Orientation::Vertical) => "bottom",
            (Alignment::Center, _) => "center",
            (Alignment::Origin, _) => "origin",
        }
    }

    /// Every name accepted by [`Alignment::from_name`] on `axis`.
    pub fn allowed_names(axis: Orientation) -> &'static [&'static str] {
        match axis {
            Orientation::Horizontal => HORIZONTAL_ALIGN_NAMES,
            Orientation::Vertical => VERTICAL_ALIGN_NAMES,
        }
    }
}

/// Distribution of leftover space among or around items along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Justify {
    /// Pack items at the start
    #[default]
    Start,
    /// Pack items at the end
    End,
    /// Center items
    Center,
    /// Equal space between items, none at the ends
    SpaceBetween,
    /// Equal space around each item (half-size gaps at the ends)
    SpaceAround,
    /// Equal space between items and at both ends
    SpaceEvenly,
}

impl Justify {
    /// Extra space inserted before item `index` of `count` when `extra` space is left over.
    pub fn spacing_before(self, index: usize, count: usize, extra: f64) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let n = count as f64;
        match self {
            Justify::Start => 0.0,
            Justify::End => {
                if index == 0 {
                    extra
                } else {
                    0.0
                }
            }
            Justify::Center => {
                if index == 0 {
                    extra / 2.0
                } else {
                    0.0
                }
            }
            Justify::SpaceBetween => {
                if index == 0 || count < 2 {
                    0.0
                } else {
                    extra / (n - 1.0)
                }
            }
            Justify::SpaceAround => {
                if index == 0 {
                    extra / (2.0 * n)
                } else {
                    extra / n
                }
            }
            Justify::SpaceEvenly => extra / (n + 1.0),
        }
    }

    /// Translate an axis-relative name into a justification.
    pub fn from_name(axis: Orientation, name: &str) -> Result<Self, ConfigError> {
        let value = match (axis, name) {
            (Orientation::Horizontal, "left") | (Orientation::Vertical, "top") => Justify::Start,
            (Orientation::Horizontal, "right") | (Orientation::Vertical, "bottom") => Justify::End,
            (_, "center") => Justify::Center,
            (_, "spaceBetween") => Justify::SpaceBetween,
            (_, "spaceAround") => Justify::SpaceAround,
            (_, "spaceEvenly") => Justify::SpaceEvenly,
            _ => {
                return Err(ConfigError::InvalidJustify {
                    axis,
                    value: name.to_string(),
                    allowed: Self::allowed_names(axis),
                })
            }
        };
        Ok(value)
    }

    /// The axis-relative name of this justification.
    pub fn name(self, axis: Orientation) -> &'static str {
        match (self, axis) {
            (Justify::Start, Orientation::Horizontal) => "left",
            (Justify::Start, Orientation::Vertical) => "top",
            (Justify::End, Orientation::Horizontal) => "right",
            (Justify::End, Orientation::Vertical) => "bottom",
            (Justify::Center, _) => "center",
            (Justify::SpaceBetween, _) => "spaceBetween",
            (Justify::SpaceAround, _) => "spaceAround",
            (Justify::SpaceEvenly, _) => "spaceEvenly",
        }
    }

    /// Every name accepted by [`Justify::from_name`] on `axis`.
    pub fn allowed_names(axis: Orientation) -> &'static [&'static str] {
        match axis {
            Orientation::Horizontal => HORIZONTAL_JUSTIFY_NAMES,
            Orientation::Vertical => VERTICAL_JUSTIFY_NAMES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_names_round_trip() {
        for axis in Orientation::ALL {
            for &name in Alignment::allowed_names(axis) {
                let value = Alignment::from_name(axis, name).unwrap();
                assert_eq!(value.name(axis), name);
            }
        }
    }

    #[test]
    fn test_alignment_axis_relative() {
        assert_eq!(
            Alignment::from_name(Orientation::Horizontal, "left").unwrap(),
            Alignment::from_name(Orientation::Vertical, "top").unwrap()
        );
        assert!(Alignment::from_name(Orientation::Horizontal, "top").is_err());
        assert!(Alignment::from_name(Orientation::Vertical, "right").is_err());
    }

    #[test]
    fn test_justify_names() {
        for axis in Orientation::ALL {
            for &name in Justify::allowed_names(axis) {
                assert_eq!(Justify::from_name(axis, name).unwrap().name(axis), name);
            }
        }
        let err = Justify::from_name(Orientation::Vertical, "left").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJustify { .. }));
    }

    #[test]
    fn test_alignment_offset() {
        assert!((Alignment::Start.offset(10.0)).abs() < 0.001);
        assert!((Alignment::Center.offset(10.0) - 5.0).abs() < 0.001);
        assert!((Alignment::End.offset(10.0) - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_justify_spacing() {
        // 3 items, 60 extra
        assert!((Justify::End.spacing_before(0, 3, 60.0) - 60.0).abs() < 0.001);
        assert!((Justify::Center.spacing_before(0, 3, 60.0) - 30.0).abs() < 0.001);
        assert!((Justify::SpaceBetween.spacing_before(1, 3, 60.0) - 30.0).abs() < 0.001);
        assert!((Justify::SpaceAround.spacing_before(0, 3, 60.0) - 10.0).abs() < 0.001);
        assert!((Justify::SpaceAround.spacing_before(2, 3, 60.0) - 20.0).abs() < 0.001);
        assert!((Justify::SpaceEvenly.spacing_before(1, 3, 60.0) - 15.0).abs() < 0.001);
        assert!(Justify::SpaceBetween.spacing_before(0, 1, 60.0).abs() < 0.001);
    }

    #[test]
    fn test_justify_distributes_all_extra_space() {
        let extra = 90.0;
        let count = 4;
        for justify in [Justify::SpaceAround, Justify::SpaceEvenly, Justify::SpaceBetween] {
            let inside: f64 = (0..count).map(|i| justify.spacing_before(i, count, extra)).sum();
            let trailing = match justify {
                Justify::SpaceAround => extra / (2.0 * count as f64),
                Justify::SpaceEvenly => extra / (count as f64 + 1.0),
                _ => 0.0,
            };
            assert!((inside + trailing - extra).abs() < 0.001, "{justify:?}");
        }
    }
}
