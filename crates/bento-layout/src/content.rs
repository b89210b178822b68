//! The contract between layout containers and the content they place.

use bento_core::{Bounds, Orientation, PerAxis};
use glam::DVec2;

/// A piece of content a container can size and position.
///
/// Content lives in its own frame: [`local_bounds`](LayoutContent::local_bounds)
/// are relative to the frame origin, which doubles as the reference point for
/// [`Alignment::Origin`](bento_core::Alignment::Origin). The container moves
/// the frame with [`set_translation`](LayoutContent::set_translation).
pub trait LayoutContent {
    /// Bounds in the content's own frame, or `None` when there is nothing to lay out.
    fn local_bounds(&self) -> Option<Bounds>;

    /// Current position of the frame origin in the container.
    fn translation(&self) -> DVec2;

    fn set_translation(&mut self, translation: DVec2);

    /// Smallest extent the content can take along `axis`.
    fn minimum_size(&self, axis: Orientation) -> f64 {
        self.local_bounds().map_or(0.0, |b| b.size_along(axis))
    }

    /// Largest extent the content can take along `axis`, if bounded.
    fn maximum_size(&self, _axis: Orientation) -> Option<f64> {
        None
    }

    /// Whether the content resizes itself when given a preferred size.
    fn is_resizable(&self, _axis: Orientation) -> bool {
        false
    }

    /// Ask resizable content to take `size` along `axis`.
    fn set_preferred_size(&mut self, _axis: Orientation, _size: f64) {}

    fn is_visible(&self) -> bool {
        true
    }

    fn set_visible(&mut self, _visible: bool) {}

    /// Separators are shown only between runs of visible content.
    fn is_separator(&self) -> bool {
        false
    }

    /// Bounds in the container's frame.
    fn bounds(&self) -> Option<Bounds> {
        self.local_bounds().map(|b| b.translated(self.translation()))
    }
}

/// A rectangular box of content.
///
/// Fixed boxes keep their size; resizable boxes accept a preferred size
/// between their minimum and optional maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxContent {
    size: DVec2,
    min_size: DVec2,
    max_size: PerAxis<Option<f64>>,
    resizable: PerAxis<bool>,
    /// Reference point, relative to the box's top-left corner
    origin: DVec2,
    translation: DVec2,
    visible: bool,
    separator: bool,
}

impl BoxContent {
    /// A box that always keeps the given size.
    pub fn fixed(width: f64, height: f64) -> Self {
        let size = DVec2::new(width, height);
        Self {
            size,
            min_size: size,
            max_size: PerAxis::default(),
            resizable: PerAxis::splat(false),
            origin: DVec2::ZERO,
            translation: DVec2::ZERO,
            visible: true,
            separator: false,
        }
    }

    /// A box resizable on both axes, starting at its minimum size.
    pub fn resizable(min_width: f64, min_height: f64) -> Self {
        Self {
            resizable: PerAxis::splat(true),
            ..Self::fixed(min_width, min_height)
        }
    }

    /// A separator line of the given size.
    pub fn separator(width: f64, height: f64) -> Self {
        Self {
            separator: true,
            ..Self::fixed(width, height)
        }
    }

    /// Limit the size along `axis`.
    pub fn with_max(mut self, axis: Orientation, max: f64) -> Self {
        self.max_size.set(axis, Some(max));
        self
    }

    /// Toggle resizing along one axis.
    pub fn with_resizable(mut self, axis: Orientation, resizable: bool) -> Self {
        self.resizable.set(axis, resizable);
        self
    }

    /// Set the reference point used by origin alignment (e.g. a baseline).
    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = DVec2::new(x, y);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Current size.
    pub fn size(&self) -> DVec2 {
        self.size
    }

    /// Change the size of the box (and its minimum, for fixed axes).
    ///
    /// Containers pick this up on their next relayout.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = DVec2::new(width, height);
        for axis in Orientation::ALL {
            if !*self.resizable.get(axis) {
                axis.set_component(&mut self.min_size, axis.component(self.size));
            }
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }
}

impl LayoutContent for BoxContent {
    fn local_bounds(&self) -> Option<Bounds> {
        Some(Bounds::from_vecs(-self.origin, self.size))
    }

    fn translation(&self) -> DVec2 {
        self.translation
    }

    fn set_translation(&mut self, translation: DVec2) {
        self.translation = translation;
    }

    fn minimum_size(&self, axis: Orientation) -> f64 {
        axis.component(self.min_size)
    }

    fn maximum_size(&self, axis: Orientation) -> Option<f64> {
        *self.max_size.get(axis)
    }

    fn is_resizable(&self, axis: Orientation) -> bool {
        *self.resizable.get(axis)
    }

    fn set_preferred_size(&mut self, axis: Orientation, size: f64) {
        if !*self.resizable.get(axis) {
            return;
        }
        let min = axis.component(self.min_size);
        let max = self.max_size.get(axis).unwrap_or(f64::INFINITY).max(min);
        axis.set_component(&mut self.size, size.clamp(min, max));
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_separator(&self) -> bool {
        self.separator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_box_ignores_preferred_size() {
        let mut content = BoxContent::fixed(40.0, 20.0);
        content.set_preferred_size(Orientation::Horizontal, 100.0);
        assert!((content.size().x - 40.0).abs() < 0.001);
        assert!((content.minimum_size(Orientation::Horizontal) - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_resizable_box_clamps() {
        let mut content = BoxContent::resizable(10.0, 10.0).with_max(Orientation::Horizontal, 50.0);
        content.set_preferred_size(Orientation::Horizontal, 80.0);
        assert!((content.size().x - 50.0).abs() < 0.001);
        content.set_preferred_size(Orientation::Horizontal, 2.0);
        assert!((content.size().x - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_origin_shifts_local_bounds() {
        let mut content = BoxContent::fixed(30.0, 20.0).with_origin(0.0, 15.0);
        assert_eq!(content.local_bounds(), Some(Bounds::new(0.0, -15.0, 30.0, 20.0)));

        content.set_translation(DVec2::new(5.0, 15.0));
        assert_eq!(content.bounds(), Some(Bounds::new(5.0, 0.0, 30.0, 20.0)));
    }

    #[test]
    fn test_set_size_updates_fixed_minimum() {
        let mut content = BoxContent::fixed(10.0, 10.0);
        content.set_size(25.0, 12.0);
        assert!((content.minimum_size(Orientation::Horizontal) - 25.0).abs() < 0.001);
        assert!((content.minimum_size(Orientation::Vertical) - 12.0).abs() < 0.001);
    }
}
