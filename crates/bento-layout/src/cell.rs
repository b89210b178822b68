//! Cells: the container-side wrapper around one piece of content.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use bento_core::{Alignment, Bounds, CellId, LayoutError, Orientation, PerAxis};
use indexmap::IndexMap;

use crate::config::ResolvedMargins;
use crate::content::LayoutContent;
use crate::separator::SeparatorSlot;

/// Content shared between its owner and a container.
pub type SharedContent = Rc<RefCell<dyn LayoutContent>>;

/// Sizes of one cell along one axis, margins included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AxisMeasure {
    pub min: f64,
    pub max: f64,
    /// Distance from the cell's start edge to the content origin
    pub origin_before: f64,
    /// Distance from the content origin to the cell's end edge
    pub origin_after: f64,
}

/// Where a cell goes along one axis.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub axis: Orientation,
    /// Space available to the cell, margins included
    pub size: f64,
    pub position: f64,
    pub stretch: bool,
    /// Distance from `position` to the line's shared origin
    pub origin_offset: f64,
    pub align: Alignment,
}

/// A registered piece of content plus the container's per-cell data.
#[derive(Debug)]
pub(crate) struct Cell<T> {
    content: Weak<RefCell<dyn LayoutContent>>,
    pub data: T,
}

impl<T> Cell<T> {
    /// Address of the content allocation. The weak reference keeps it
    /// reserved, so no other content shares it while the cell exists.
    fn address(&self) -> *const () {
        self.content.as_ptr() as *const ()
    }

    pub fn content(&self) -> Option<SharedContent> {
        self.content.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.content.strong_count() > 0
    }

    /// Whether the cell takes part in a layout pass.
    pub fn is_active(&self, exclude_invisible: bool) -> bool {
        self.content().map_or(false, |content| {
            let content = content.borrow();
            content.local_bounds().map_or(false, |b| b.is_valid())
                && (!exclude_invisible || content.is_visible())
        })
    }

    pub fn separator_slot(&self) -> SeparatorSlot {
        match self.content() {
            Some(content) => {
                let content = content.borrow();
                SeparatorSlot {
                    is_separator: content.is_separator(),
                    visible: content.is_visible()
                        && content.local_bounds().map_or(false, |b| b.is_valid()),
                }
            }
            None => SeparatorSlot {
                is_separator: false,
                visible: false,
            },
        }
    }

    pub fn measure(&self, axis: Orientation, margins: &ResolvedMargins) -> Option<AxisMeasure> {
        let content = self.content()?;
        let content = content.borrow();
        let local = content.local_bounds()?;
        let min = margins
            .min_content
            .unwrap_or_else(|| content.minimum_size(axis));
        let max = margins
            .max_content
            .or_else(|| content.maximum_size(axis))
            .unwrap_or(f64::INFINITY)
            .max(min);
        Some(AxisMeasure {
            min: min + margins.total(),
            max: max + margins.total(),
            origin_before: margins.start - local.min(axis),
            origin_after: local.max(axis) + margins.end,
        })
    }

    /// Size and position the content along one axis.
    ///
    /// Returns the achieved cell bounds (content bounds plus margins).
    pub fn reposition(
        &self,
        placement: &Placement,
        margins: &PerAxis<ResolvedMargins>,
    ) -> Option<Bounds> {
        let axis = placement.axis;
        let m = margins.get(axis);
        let content = self.content()?;
        let mut content = content.borrow_mut();

        if content.is_resizable(axis) {
            let min = m.min_content.unwrap_or_else(|| content.minimum_size(axis));
            let max = m
                .max_content
                .or_else(|| content.maximum_size(axis))
                .unwrap_or(f64::INFINITY)
                .max(min);
            let target = if placement.stretch {
                placement.size - m.total()
            } else {
                min
            };
            content.set_preferred_size(axis, target.clamp(min, max));
        }

        let local = content.local_bounds()?;
        let target = match placement.align {
            Alignment::Origin => placement.position + placement.origin_offset,
            align => {
                let free = placement.size - m.total() - local.size_along(axis);
                placement.position + m.start + align.offset(free) - local.min(axis)
            }
        };
        let mut translation = content.translation();
        axis.set_component(&mut translation, target);
        content.set_translation(translation);

        let mut bounds = content.bounds()?;
        for axis in Orientation::ALL {
            let m = margins.get(axis);
            bounds = bounds.dilated_along(axis, m.start, m.end);
        }
        Some(bounds)
    }
}

/// The ordered set of cells registered with one container.
#[derive(Debug)]
pub(crate) struct CellSet<T> {
    cells: IndexMap<CellId, Cell<T>>,
    by_content: HashMap<*const (), CellId>,
    next_id: u64,
}

impl<T> Default for CellSet<T> {
    fn default() -> Self {
        Self {
            cells: IndexMap::new(),
            by_content: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> CellSet<T> {
    /// Register `content` at `index` (or at the end).
    pub fn insert(
        &mut self,
        index: Option<usize>,
        content: SharedContent,
        data: T,
    ) -> Result<CellId, LayoutError> {
        let address = Rc::as_ptr(&content) as *const ();
        if let Some(&id) = self.by_content.get(&address) {
            return Err(LayoutError::DuplicateContent(id));
        }

        let id = CellId(self.next_id);
        self.next_id += 1;
        self.by_content.insert(address, id);
        let cell = Cell {
            content: Rc::downgrade(&content),
            data,
        };
        match index {
            Some(index) => {
                self.cells.shift_insert(index.min(self.cells.len()), id, cell);
            }
            None => {
                self.cells.insert(id, cell);
            }
        }
        Ok(id)
    }

    pub fn remove(&mut self, id: CellId) -> Result<Cell<T>, LayoutError> {
        let cell = self.cells.shift_remove(&id).ok_or(LayoutError::UnknownCell(id))?;
        self.by_content.remove(&cell.address());
        Ok(cell)
    }

    pub fn get(&self, id: CellId) -> Result<&Cell<T>, LayoutError> {
        self.cells.get(&id).ok_or(LayoutError::UnknownCell(id))
    }

    pub fn get_mut(&mut self, id: CellId) -> Result<&mut Cell<T>, LayoutError> {
        self.cells.get_mut(&id).ok_or(LayoutError::UnknownCell(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell<T>> {
        self.cells.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Drop cells whose content no longer exists. Returns how many went.
    pub fn prune(&mut self) -> usize {
        let before = self.cells.len();
        let by_content = &mut self.by_content;
        self.cells.retain(|_, cell| {
            let alive = cell.is_alive();
            if !alive {
                by_content.remove(&cell.address());
            }
            alive
        });
        before - self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::BoxContent;

    fn shared(content: BoxContent) -> (Rc<RefCell<BoxContent>>, SharedContent) {
        let rc = Rc::new(RefCell::new(content));
        let shared: SharedContent = rc.clone();
        (rc, shared)
    }

    #[test]
    fn test_duplicate_content_rejected() {
        let (_rc, content) = shared(BoxContent::fixed(10.0, 10.0));
        let mut set = CellSet::default();
        let id = set.insert(None, content.clone(), ()).unwrap();
        assert!(matches!(
            set.insert(None, content, ()),
            Err(LayoutError::DuplicateContent(existing)) if existing == id
        ));
    }

    #[test]
    fn test_insert_order_and_prune() {
        let (a, shared_a) = shared(BoxContent::fixed(1.0, 1.0));
        let (_b, shared_b) = shared(BoxContent::fixed(2.0, 2.0));
        let mut set = CellSet::default();
        let id_a = set.insert(None, shared_a, ()).unwrap();
        let id_b = set.insert(Some(0), shared_b, ()).unwrap();
        assert_eq!(set.ids().collect::<Vec<_>>(), vec![id_b, id_a]);

        drop(a);
        assert_eq!(set.prune(), 1);
        assert_eq!(set.ids().collect::<Vec<_>>(), vec![id_b]);
        assert!(matches!(set.remove(id_a), Err(LayoutError::UnknownCell(_))));
    }

    #[test]
    fn test_removed_content_can_register_again() {
        let (_rc, content) = shared(BoxContent::fixed(10.0, 10.0));
        let mut set = CellSet::default();
        let first = set.insert(None, content.clone(), ()).unwrap();
        set.remove(first).unwrap();
        let second = set.insert(None, content.clone(), ()).unwrap();
        assert_ne!(first, second);
        assert!(matches!(
            set.insert(Some(0), content, ()),
            Err(LayoutError::DuplicateContent(existing)) if existing == second
        ));
    }

    #[test]
    fn test_many_distinct_contents_register() {
        let contents: Vec<_> = (0..500)
            .map(|i| shared(BoxContent::fixed(i as f64, 1.0)))
            .collect();
        let mut set = CellSet::default();
        for (_, content) in &contents {
            set.insert(None, content.clone(), ()).unwrap();
        }
        assert_eq!(set.len(), 500);
        for (_, content) in &contents {
            assert!(set.insert(None, content.clone(), ()).is_err());
        }
    }

    #[test]
    fn test_measure_with_margins() {
        let (_rc, content) = shared(BoxContent::fixed(20.0, 10.0).with_origin(0.0, 8.0));
        let mut set = CellSet::default();
        let id = set.insert(None, content, ()).unwrap();
        let margins = ResolvedMargins {
            start: 2.0,
            end: 3.0,
            ..Default::default()
        };
        let measure = set.get(id).unwrap().measure(Orientation::Vertical, &margins).unwrap();
        assert!((measure.min - 15.0).abs() < 0.001);
        assert!(measure.max.is_infinite());
        assert!((measure.origin_before - 10.0).abs() < 0.001);
        assert!((measure.origin_after - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_reposition_aligns_within_slot() {
        let (rc, content) = shared(BoxContent::fixed(20.0, 10.0));
        let mut set = CellSet::default();
        let id = set.insert(None, content, ()).unwrap();
        let margins = PerAxis::splat(ResolvedMargins::default());
        let placement = Placement {
            axis: Orientation::Horizontal,
            size: 100.0,
            position: 10.0,
            stretch: false,
            origin_offset: 0.0,
            align: Alignment::End,
        };
        let bounds = set.get(id).unwrap().reposition(&placement, &margins).unwrap();
        assert!((bounds.x - 90.0).abs() < 0.001);
        assert!((rc.borrow().translation().x - 90.0).abs() < 0.001);
    }

    #[test]
    fn test_reposition_stretches_resizable() {
        let (rc, content) = shared(BoxContent::resizable(5.0, 5.0));
        let mut set = CellSet::default();
        let id = set.insert(None, content, ()).unwrap();
        let mut margins = PerAxis::splat(ResolvedMargins::default());
        margins.vertical.start = 4.0;
        let placement = Placement {
            axis: Orientation::Vertical,
            size: 50.0,
            position: 0.0,
            stretch: true,
            origin_offset: 0.0,
            align: Alignment::Center,
        };
        let bounds = set.get(id).unwrap().reposition(&placement, &margins).unwrap();
        assert!((rc.borrow().size().y - 46.0).abs() < 0.001);
        assert!((bounds.y - 0.0).abs() < 0.001);
        assert!((bounds.height - 50.0).abs() < 0.001);
    }
}
