//! Linear layout: cells placed one after another along a primary axis,
//! optionally wrapping into several lines.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use bento_core::{union_bounds, Alignment, CellId, Justify, LayoutError, Orientation};
use tracing::{debug, trace};

use crate::cell::{AxisMeasure, Cell, CellSet, Placement};
use crate::config::{check_length, set_field, ConfigKey, FlowConfig, ResolvedFlowConfig};
use crate::container::{Layout, LayoutResult, LayoutState};
use crate::content::LayoutContent;
use crate::grow::{distribute, GrowSlot};
use crate::options::{LayoutOptions, FLOW_CELL_KEYS, FLOW_CONTAINER_KEYS, MARGIN_KEYS};
use crate::separator::{separator_visibility, SeparatorSlot};

const EPSILON: f64 = 1e-7;

/// Split cells into lines no longer than `available`.
///
/// The first cell of a line is always accepted, even when it alone is
/// larger than `available`.
pub(crate) fn wrap_lines(mins: &[f64], spacing: f64, available: f64) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut remaining = available;
    for (index, &min) in mins.iter().enumerate() {
        if index == start {
            remaining = available - min;
        } else if spacing + min <= remaining + EPSILON {
            remaining -= spacing + min;
        } else {
            trace!(index, remaining, "line break");
            lines.push(start..index);
            start = index;
            remaining = available - min;
        }
    }
    if start < mins.len() {
        lines.push(start..mins.len());
    }
    lines
}

struct FlowItem<'a> {
    cell: &'a Cell<FlowConfig>,
    config: ResolvedFlowConfig,
    primary: AxisMeasure,
    cross: AxisMeasure,
}

struct FlowLine {
    range: Range<usize>,
    min: f64,
    /// Shared origin position of origin-aligned members, from the line start
    origin_before: f64,
    size: f64,
    position: f64,
}

/// A linear layout container.
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use bento_layout::{BoxContent, FlowBox, Layout, LayoutContent};
///
/// let first = Rc::new(RefCell::new(BoxContent::fixed(20.0, 10.0)));
/// let second = Rc::new(RefCell::new(BoxContent::fixed(30.0, 10.0)));
///
/// let mut row = FlowBox::horizontal();
/// row.set_spacing(5.0);
/// row.add(&first).unwrap();
/// row.add(&second).unwrap();
///
/// assert_eq!(row.result().min_width, Some(55.0));
/// assert_eq!(second.borrow().translation().x, 25.0);
/// ```
#[derive(Debug)]
pub struct FlowBox {
    cells: CellSet<FlowConfig>,
    config: FlowConfig,
    orientation: Orientation,
    spacing: f64,
    line_spacing: f64,
    justify: Justify,
    /// `None` shares leftover cross space among the lines
    justify_lines: Option<Justify>,
    wrap: bool,
    exclude_invisible: bool,
    state: LayoutState,
}

impl FlowBox {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            cells: CellSet::default(),
            config: FlowConfig::base_default(),
            orientation,
            spacing: 0.0,
            line_spacing: 0.0,
            justify: Justify::Start,
            justify_lines: None,
            wrap: false,
            exclude_invisible: true,
            state: LayoutState::default(),
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    /// Create a container configured from `options`.
    pub fn with_options(options: &LayoutOptions) -> Self {
        let mut flow = Self::new(options.orientation.unwrap_or_default());
        flow.mutate(options);
        flow
    }

    /// Register content at the end of the layout.
    pub fn add<C: LayoutContent + 'static>(
        &mut self,
        content: &Rc<RefCell<C>>,
    ) -> Result<CellId, LayoutError> {
        self.insert_cell(None, content.clone(), FlowConfig::default())
    }

    /// Register content with cell-level options.
    pub fn add_with<C: LayoutContent + 'static>(
        &mut self,
        content: &Rc<RefCell<C>>,
        options: &LayoutOptions,
    ) -> Result<CellId, LayoutError> {
        options.check(&[FLOW_CELL_KEYS, MARGIN_KEYS], "flow cells");
        let mut config = FlowConfig::default();
        config.apply(options);
        self.insert_cell(None, content.clone(), config)
    }

    /// Register content before the cell currently at `index`.
    pub fn insert<C: LayoutContent + 'static>(
        &mut self,
        index: usize,
        content: &Rc<RefCell<C>>,
    ) -> Result<CellId, LayoutError> {
        self.insert_cell(Some(index), content.clone(), FlowConfig::default())
    }

    fn insert_cell(
        &mut self,
        index: Option<usize>,
        content: Rc<RefCell<dyn LayoutContent>>,
        config: FlowConfig,
    ) -> Result<CellId, LayoutError> {
        let id = self.cells.insert(index, content, config)?;
        self.relayout();
        Ok(id)
    }

    pub fn remove(&mut self, id: CellId) -> Result<(), LayoutError> {
        self.cells.remove(id)?;
        self.relayout();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.len() == 0
    }

    /// Cell ids in layout order.
    pub fn cell_ids(&self) -> Vec<CellId> {
        self.cells.ids().collect()
    }

    /// Apply container-level options.
    pub fn mutate(&mut self, options: &LayoutOptions) {
        options.check(
            &[FLOW_CELL_KEYS, FLOW_CONTAINER_KEYS, MARGIN_KEYS],
            "flow layouts",
        );
        let mut changed = self.config.apply(options);
        if let Some(orientation) = options.orientation {
            changed |= set_field(&mut self.orientation, orientation);
        }
        if let Some(spacing) = options.spacing.filter(|&s| check_length("spacing", s)) {
            changed |= set_field(&mut self.spacing, spacing);
        }
        if let Some(spacing) = options.line_spacing.filter(|&s| check_length("lineSpacing", s)) {
            changed |= set_field(&mut self.line_spacing, spacing);
        }
        if let Some(justify) = options.justify {
            changed |= set_field(&mut self.justify, justify);
        }
        if let Some(justify) = options.justify_lines {
            changed |= set_field(&mut self.justify_lines, justify);
        }
        if let Some(wrap) = options.wrap {
            changed |= set_field(&mut self.wrap, wrap);
        }
        if let Some(exclude) = options.exclude_invisible {
            changed |= set_field(&mut self.exclude_invisible, exclude);
        }
        if changed {
            self.relayout();
        }
    }

    /// Apply cell-level options to one cell.
    pub fn configure_cell(&mut self, id: CellId, options: &LayoutOptions) -> Result<(), LayoutError> {
        options.check(&[FLOW_CELL_KEYS, MARGIN_KEYS], "flow cells");
        if self.cells.get_mut(id)?.data.apply(options) {
            self.relayout();
        }
        Ok(())
    }

    /// Edit one cell's record. `update` returns whether anything changed.
    pub fn update_cell(
        &mut self,
        id: CellId,
        update: impl FnOnce(&mut FlowConfig) -> bool,
    ) -> Result<(), LayoutError> {
        if update(&mut self.cells.get_mut(id)?.data) {
            self.relayout();
        }
        Ok(())
    }

    /// Make one cell inherit everything except the `ignore`d fields again.
    pub fn reset_cell(&mut self, id: CellId, ignore: &[ConfigKey]) -> Result<(), LayoutError> {
        let config = &mut self.cells.get_mut(id)?.data;
        let before = *config;
        config.reset_to_inherit(ignore);
        if *config != before {
            self.relayout();
        }
        Ok(())
    }

    pub fn cell_config(&self, id: CellId) -> Result<&FlowConfig, LayoutError> {
        Ok(&self.cells.get(id)?.data)
    }

    /// The values a cell actually uses after inheritance.
    pub fn resolved_cell_config(&self, id: CellId) -> Result<ResolvedFlowConfig, LayoutError> {
        Ok(FlowConfig::resolve(&self.cells.get(id)?.data, &self.config))
    }

    /// Container-level defaults for every cell.
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Edit the container defaults. `update` returns whether anything changed.
    pub fn update_config(&mut self, update: impl FnOnce(&mut FlowConfig) -> bool) {
        if update(&mut self.config) {
            self.relayout();
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if set_field(&mut self.orientation, orientation) {
            self.relayout();
        }
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Gap between consecutive cells of a line.
    pub fn set_spacing(&mut self, spacing: f64) {
        if check_length("spacing", spacing) && set_field(&mut self.spacing, spacing) {
            self.relayout();
        }
    }

    pub fn line_spacing(&self) -> f64 {
        self.line_spacing
    }

    /// Gap between consecutive lines.
    pub fn set_line_spacing(&mut self, spacing: f64) {
        if check_length("lineSpacing", spacing) && set_field(&mut self.line_spacing, spacing) {
            self.relayout();
        }
    }

    pub fn justify(&self) -> Justify {
        self.justify
    }

    pub fn set_justify(&mut self, justify: Justify) {
        if set_field(&mut self.justify, justify) {
            self.relayout();
        }
    }

    pub fn justify_lines(&self) -> Option<Justify> {
        self.justify_lines
    }

    /// `None` stretches lines to fill the cross axis.
    pub fn set_justify_lines(&mut self, justify: Option<Justify>) {
        if set_field(&mut self.justify_lines, justify) {
            self.relayout();
        }
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        if set_field(&mut self.wrap, wrap) {
            self.relayout();
        }
    }

    pub fn exclude_invisible(&self) -> bool {
        self.exclude_invisible
    }

    pub fn set_exclude_invisible(&mut self, exclude: bool) {
        if set_field(&mut self.exclude_invisible, exclude) {
            self.relayout();
        }
    }

    fn update_separators(&mut self) {
        let slots: Vec<SeparatorSlot> = self.cells.iter().map(|cell| cell.separator_slot()).collect();
        if !slots.iter().any(|slot| slot.is_separator) {
            return;
        }
        let visibility = separator_visibility(&slots);
        for (cell, visible) in self.cells.iter().zip(visibility) {
            let (Some(visible), Some(content)) = (visible, cell.content()) else {
                continue;
            };
            let mut content = content.borrow_mut();
            if content.is_visible() != visible {
                content.set_visible(visible);
            }
        }
    }
}

impl Layout for FlowBox {
    fn layout_state(&self) -> &LayoutState {
        &self.state
    }

    fn layout_state_mut(&mut self) -> &mut LayoutState {
        &mut self.state
    }

    fn run_pass(&mut self) -> LayoutResult {
        let pruned = self.cells.prune();
        if pruned > 0 {
            trace!(pruned, "dropped cells whose content is gone");
        }
        self.update_separators();

        let axis = self.orientation;
        let cross = axis.opposite();
        let origin = self.state.origin;

        let items: Vec<FlowItem<'_>> = self
            .cells
            .iter()
            .filter(|cell| cell.is_active(self.exclude_invisible))
            .filter_map(|cell| {
                let config = FlowConfig::resolve(&cell.data, &self.config);
                Some(FlowItem {
                    cell,
                    config,
                    primary: cell.measure(axis, config.margins.get(axis))?,
                    cross: cell.measure(cross, config.margins.get(cross))?,
                })
            })
            .collect();
        if items.is_empty() {
            debug!(orientation = %axis, "flow layout pass with no active cells");
            return LayoutResult::default();
        }

        let mins: Vec<f64> = items.iter().map(|item| item.primary.min).collect();
        let largest = mins.iter().copied().fold(0.0, f64::max);
        let preferred = self.state.preferred.get(axis).unwrap_or(largest).max(largest);

        let ranges = if self.wrap {
            wrap_lines(&mins, self.spacing, preferred)
        } else {
            vec![0..items.len()]
        };

        let mut lines: Vec<FlowLine> = ranges
            .into_iter()
            .map(|range| {
                let members = &items[range.clone()];
                let mut min = members.iter().map(|item| item.cross.min).fold(0.0, f64::max);
                let mut before: Option<f64> = None;
                let mut after = 0.0f64;
                for item in members.iter().filter(|item| item.config.align == Alignment::Origin) {
                    before = Some(before.unwrap_or(0.0).max(item.cross.origin_before));
                    after = after.max(item.cross.origin_after);
                }
                if let Some(before) = before {
                    min = min.max(before + after);
                }
                FlowLine {
                    range,
                    min,
                    origin_before: before.unwrap_or(0.0),
                    size: min,
                    position: 0.0,
                }
            })
            .collect();

        // Primary axis, line by line.
        let mut sizes = vec![0.0; items.len()];
        let mut positions = vec![0.0; items.len()];
        let mut longest_line = 0.0f64;
        for line in &lines {
            let members = &items[line.range.clone()];
            let count = members.len();
            let used = mins[line.range.clone()].iter().sum::<f64>()
                + self.spacing * (count - 1) as f64;
            longest_line = longest_line.max(used);

            let mut slots: Vec<GrowSlot> = members
                .iter()
                .map(|item| GrowSlot::new(item.primary.min, item.primary.max, item.config.grow))
                .collect();
            let extra = distribute(&mut slots, preferred - used, EPSILON);

            let mut position = axis.component(origin);
            for (k, slot) in slots.iter().enumerate() {
                if k > 0 {
                    position += self.spacing;
                }
                position += self.justify.spacing_before(k, count, extra);
                sizes[line.range.start + k] = slot.size;
                positions[line.range.start + k] = position;
                position += slot.size;
            }
        }

        // Cross axis: place the lines.
        let count = lines.len();
        let min_cross = lines.iter().map(|line| line.min).sum::<f64>()
            + self.line_spacing * (count - 1) as f64;
        let extra_cross = self
            .state
            .preferred
            .get(cross)
            .map_or(0.0, |preferred| (preferred - min_cross).max(0.0));
        let mut position = cross.component(origin);
        for (k, line) in lines.iter_mut().enumerate() {
            if k > 0 {
                position += self.line_spacing;
            }
            match self.justify_lines {
                None => line.size += extra_cross / count as f64,
                Some(justify) => position += justify.spacing_before(k, count, extra_cross),
            }
            line.position = position;
            position += line.size;
        }

        let mut bounds = None;
        for line in &lines {
            for index in line.range.clone() {
                let item = &items[index];
                let primary = Placement {
                    axis,
                    size: sizes[index],
                    position: positions[index],
                    stretch: true,
                    origin_offset: 0.0,
                    align: item.config.cell_align,
                };
                let secondary = Placement {
                    axis: cross,
                    size: line.size,
                    position: line.position,
                    stretch: item.config.stretch,
                    origin_offset: line.origin_before,
                    align: item.config.align,
                };
                item.cell.reposition(&primary, &item.config.margins);
                if let Some(placed) = item.cell.reposition(&secondary, &item.config.margins) {
                    bounds = union_bounds(bounds, placed);
                }
            }
        }

        let mut result = LayoutResult {
            bounds,
            ..LayoutResult::default()
        };
        result.set_min_size(axis, if self.wrap { largest } else { longest_line });
        result.set_min_size(cross, min_cross);
        debug!(
            orientation = %axis,
            cells = items.len(),
            lines = count,
            min_width = ?result.min_width,
            min_height = ?result.min_height,
            "flow layout pass"
        );
        result
    }
}
