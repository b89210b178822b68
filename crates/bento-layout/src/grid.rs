//! Grid layout: cells placed into rows and columns.
//!
//! Each axis is solved on its own, columns first. Only line indices some
//! cell actually covers produce a line; gaps in the numbering cost nothing.
//! Cells spanning several lines are reconciled after the single-line cells
//! have sized their lines.

use std::cell::RefCell;
use std::rc::Rc;

use bento_core::{
    report_config_error, union_bounds, Alignment, CellId, ConfigError, LayoutError, Orientation,
    PerAxis,
};
use tracing::{debug, trace, warn};

use crate::cell::{Cell, CellSet, Placement};
use crate::config::{set_field, ConfigKey, GridConfig, ResolvedGridConfig};
use crate::container::{Layout, LayoutResult, LayoutState};
use crate::content::LayoutContent;
use crate::grow::{distribute, GrowSlot};
use crate::options::{LayoutOptions, Spacing, GRID_CELL_KEYS, GRID_CONTAINER_KEYS, MARGIN_KEYS};

/// Tolerance of the spanning-cell loop.
const SPAN_EPSILON: f64 = 1e-9;
/// Tolerance when growing lines into the preferred size.
const GROW_EPSILON: f64 = 1e-7;

/// Where a cell sits in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub column: usize,
    pub row: usize,
    /// Number of columns covered, at least 1
    pub column_span: usize,
    /// Number of rows covered, at least 1
    pub row_span: usize,
}

impl GridPosition {
    /// A single-cell position.
    pub fn cell(column: usize, row: usize) -> Self {
        Self::spanning(column, row, 1, 1)
    }

    pub fn spanning(column: usize, row: usize, column_span: usize, row_span: usize) -> Self {
        Self {
            column,
            row,
            column_span: column_span.max(1),
            row_span: row_span.max(1),
        }
    }

    /// A position spanning `span` columns.
    pub fn span_columns(column: usize, span: usize, row: usize) -> Self {
        Self::spanning(column, row, span, 1)
    }

    /// A position spanning `span` rows.
    pub fn span_rows(column: usize, row: usize, span: usize) -> Self {
        Self::spanning(column, row, 1, span)
    }

    /// First line covered along `axis` (columns are horizontal).
    pub fn start(&self, axis: Orientation) -> usize {
        match axis {
            Orientation::Horizontal => self.column,
            Orientation::Vertical => self.row,
        }
    }

    /// Number of lines covered along `axis`, never less than 1.
    pub fn span(&self, axis: Orientation) -> usize {
        let span = match axis {
            Orientation::Horizontal => self.column_span,
            Orientation::Vertical => self.row_span,
        };
        span.max(1)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct GridSlot {
    position: GridPosition,
    config: GridConfig,
}

/// One cell's requirements along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AxisCell {
    pub start: usize,
    pub span: usize,
    pub min: f64,
    pub max: f64,
    pub grow: f64,
    /// Reach before and after the content origin, for origin-aligned cells
    pub origin: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Track {
    /// Line index in the grid numbering
    pub index: usize,
    pub max: f64,
    pub grow: f64,
    pub size: f64,
    pub position: f64,
    /// Origin position from the line start, for origin-aligned members
    pub origin_before: f64,
}

/// Resolved lines of one axis.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrackLayout {
    pub tracks: Vec<Track>,
    /// Minimum size of the axis: reconciled line sizes plus spacing
    pub min_size: f64,
}

/// Sum of tracks `first..=last` plus the spacing absorbed between them.
fn extent(tracks: &[Track], spacing: &Spacing, first: usize, last: usize) -> f64 {
    let sizes: f64 = tracks[first..=last].iter().map(|t| t.size).sum();
    let gaps: f64 = tracks[first..last].iter().map(|t| spacing.gap(t.index)).sum();
    sizes + gaps
}

impl TrackLayout {
    /// Size and position the lines of one axis.
    pub fn solve(cells: &[AxisCell], spacing: &Spacing, preferred: Option<f64>, start: f64) -> Self {
        let mut indices: Vec<usize> = cells
            .iter()
            .flat_map(|cell| cell.start..cell.start + cell.span)
            .collect();
        indices.sort_unstable();
        indices.dedup();

        let mut tracks: Vec<Track> = indices
            .iter()
            .map(|&index| Track {
                index,
                max: f64::INFINITY,
                grow: 0.0,
                size: 0.0,
                position: 0.0,
                origin_before: 0.0,
            })
            .collect();
        // Every covered index has a track, so a cell's tracks are contiguous.
        let ranges: Vec<(usize, usize)> = cells
            .iter()
            .map(|cell| {
                let first = indices.binary_search(&cell.start).unwrap_or_else(|i| i);
                (first, first + cell.span - 1)
            })
            .collect();

        for (cell, &(first, last)) in cells.iter().zip(&ranges) {
            for track in &mut tracks[first..=last] {
                track.grow = track.grow.max(cell.grow);
            }
            if first == last {
                let track = &mut tracks[first];
                track.size = track.size.max(cell.min);
                track.max = track.max.min(cell.max);
            }
        }
        for track in tracks.iter_mut() {
            track.max = track.max.max(track.size);
        }

        reconcile_spans(&mut tracks, cells, &ranges, spacing);

        let mut origins: Vec<Option<(f64, f64)>> = vec![None; tracks.len()];
        for (cell, &(first, last)) in cells.iter().zip(&ranges) {
            let Some((before, after)) = cell.origin else {
                continue;
            };
            if first == last {
                let (b, a) = origins[first].unwrap_or((0.0, 0.0));
                origins[first] = Some((b.max(before), a.max(after)));
            }
        }
        for (track, origin) in tracks.iter_mut().zip(origins) {
            if let Some((before, after)) = origin {
                track.size = track.size.max(before + after);
                track.max = track.max.max(track.size);
                track.origin_before = before;
            }
        }

        let min_size = if tracks.is_empty() {
            0.0
        } else {
            extent(&tracks, spacing, 0, tracks.len() - 1)
        };

        if let Some(preferred) = preferred {
            let mut slots: Vec<GrowSlot> = tracks
                .iter()
                .map(|t| GrowSlot::new(t.size, t.max, t.grow))
                .collect();
            distribute(&mut slots, preferred - min_size, GROW_EPSILON);
            for (track, slot) in tracks.iter_mut().zip(slots) {
                track.size = slot.size;
            }
        }

        let mut position = start;
        for track in tracks.iter_mut() {
            track.position = position;
            position += track.size + spacing.gap(track.index);
        }

        Self { tracks, min_size }
    }

    fn find(&self, index: usize) -> Option<usize> {
        self.tracks.binary_search_by_key(&index, |t| t.index).ok()
    }

    /// Position, size and origin offset of the slot covering `span` lines from `start`.
    pub fn slot(&self, start: usize, span: usize) -> Option<(f64, f64, f64)> {
        let first = &self.tracks[self.find(start)?];
        let last = &self.tracks[self.find(start + span.max(1) - 1)?];
        Some((
            first.position,
            last.position + last.size - first.position,
            first.origin_before,
        ))
    }
}

/// Grow lines until every spanning cell fits, without pushing any bounded
/// cell past its maximum.
///
/// Each round either satisfies a cell, caps a line, or forbids lines whose
/// growth would overflow a bounded cell. Running out of growable lines is a
/// soft failure: the sizes reached so far stand.
fn reconcile_spans(
    tracks: &mut [Track],
    cells: &[AxisCell],
    ranges: &[(usize, usize)],
    spacing: &Spacing,
) {
    let spanning: Vec<usize> = (0..cells.len())
        .filter(|&i| ranges[i].0 != ranges[i].1)
        .collect();
    if spanning.is_empty() {
        return;
    }
    let bounded: Vec<usize> = spanning
        .iter()
        .copied()
        .filter(|&i| cells[i].max.is_finite())
        .collect();

    let mut forbidden = vec![false; tracks.len()];
    let max_rounds = 4 * (tracks.len() + cells.len()) + 8;
    for round in 0..max_rounds {
        let unsatisfied: Vec<(usize, f64)> = spanning
            .iter()
            .filter_map(|&i| {
                let (first, last) = ranges[i];
                let need = cells[i].min - extent(tracks, spacing, first, last);
                (need > SPAN_EPSILON).then_some((i, need))
            })
            .collect();
        if unsatisfied.is_empty() {
            return;
        }

        let weights = loop {
            let mut weights = vec![0.0f64; tracks.len()];
            for &(i, _) in &unsatisfied {
                let (first, last) = ranges[i];
                let growable: Vec<usize> = (first..=last)
                    .filter(|&t| !forbidden[t] && tracks[t].size < tracks[t].max - SPAN_EPSILON)
                    .collect();
                let even = growable.iter().all(|&t| tracks[t].grow <= 0.0);
                for t in growable {
                    let weight = if even { 1.0 } else { tracks[t].grow.max(0.0) };
                    weights[t] = weights[t].max(weight);
                }
            }

            let mut newly_forbidden = false;
            for &i in &bounded {
                let (first, last) = ranges[i];
                let weighted = (first..=last).any(|t| weights[t] > 0.0);
                let headroom = cells[i].max - extent(tracks, spacing, first, last);
                if weighted && headroom <= SPAN_EPSILON {
                    for t in first..=last {
                        if weights[t] > 0.0 {
                            forbidden[t] = true;
                            newly_forbidden = true;
                        }
                    }
                }
            }
            if !newly_forbidden {
                break weights;
            }
        };

        let mut multiplier = f64::INFINITY;
        for &(i, need) in &unsatisfied {
            let (first, last) = ranges[i];
            let total: f64 = weights[first..=last].iter().sum();
            if total > 0.0 {
                multiplier = multiplier.min(need / total);
            }
        }
        for (track, &weight) in tracks.iter().zip(&weights) {
            if weight > 0.0 {
                multiplier = multiplier.min((track.max - track.size) / weight);
            }
        }
        for &i in &bounded {
            let (first, last) = ranges[i];
            let total: f64 = weights[first..=last].iter().sum();
            if total > 0.0 {
                let headroom = cells[i].max - extent(tracks, spacing, first, last);
                multiplier = multiplier.min(headroom / total);
            }
        }

        if !(multiplier.is_finite() && multiplier > 0.0) {
            warn!(
                unsatisfied = unsatisfied.len(),
                "spanning cells cannot reach their minimum size without exceeding a maximum"
            );
            return;
        }
        trace!(round, multiplier, unsatisfied = unsatisfied.len(), "growing spanned lines");
        for (track, &weight) in tracks.iter_mut().zip(&weights) {
            if weight > 0.0 {
                track.size = (track.size + multiplier * weight).min(track.max);
            }
        }
    }
    warn!(rounds = max_rounds, "spanning cell reconciliation did not settle");
}

fn spacing_option(axis: Orientation) -> &'static str {
    match axis {
        Orientation::Horizontal => "xSpacing",
        Orientation::Vertical => "ySpacing",
    }
}

fn check_origin(position: &GridPosition, config: &ResolvedGridConfig) {
    for axis in Orientation::ALL {
        if *config.align.get(axis) == Alignment::Origin && position.span(axis) > 1 {
            report_config_error(&ConfigError::OriginOnSpanningCell { axis });
        }
    }
}

struct GridItem<'a> {
    cell: &'a Cell<GridSlot>,
    position: GridPosition,
    config: ResolvedGridConfig,
}

/// A grid layout container.
#[derive(Debug)]
pub struct GridBox {
    cells: CellSet<GridSlot>,
    config: GridConfig,
    spacing: PerAxis<Spacing>,
    exclude_invisible: bool,
    state: LayoutState,
}

impl Default for GridBox {
    fn default() -> Self {
        Self::new()
    }
}

impl GridBox {
    pub fn new() -> Self {
        Self {
            cells: CellSet::default(),
            config: GridConfig::base_default(),
            spacing: PerAxis::default(),
            exclude_invisible: true,
            state: LayoutState::default(),
        }
    }

    /// Create a container configured from `options`.
    pub fn with_options(options: &LayoutOptions) -> Self {
        let mut grid = Self::new();
        grid.mutate(options);
        grid
    }

    pub fn add<C: LayoutContent + 'static>(
        &mut self,
        content: &Rc<RefCell<C>>,
        position: GridPosition,
    ) -> Result<CellId, LayoutError> {
        self.insert_cell(content.clone(), position, GridConfig::default())
    }

    /// Register content with cell-level options.
    pub fn add_with<C: LayoutContent + 'static>(
        &mut self,
        content: &Rc<RefCell<C>>,
        position: GridPosition,
        options: &LayoutOptions,
    ) -> Result<CellId, LayoutError> {
        options.check(&[GRID_CELL_KEYS, MARGIN_KEYS], "grid cells");
        let mut config = GridConfig::default();
        config.apply(options);
        self.insert_cell(content.clone(), position, config)
    }

    fn insert_cell(
        &mut self,
        content: Rc<RefCell<dyn LayoutContent>>,
        position: GridPosition,
        config: GridConfig,
    ) -> Result<CellId, LayoutError> {
        check_origin(&position, &GridConfig::resolve(&config, &self.config));
        let id = self.cells.insert(None, content, GridSlot { position, config })?;
        self.relayout();
        Ok(id)
    }

    pub fn remove(&mut self, id: CellId) -> Result<(), LayoutError> {
        self.cells.remove(id)?;
        self.relayout();
        Ok(())
    }

    pub fn position(&self, id: CellId) -> Result<GridPosition, LayoutError> {
        Ok(self.cells.get(id)?.data.position)
    }

    /// Move a cell to another position.
    pub fn set_position(&mut self, id: CellId, position: GridPosition) -> Result<(), LayoutError> {
        let slot = &mut self.cells.get_mut(id)?.data;
        if !set_field(&mut slot.position, position) {
            return Ok(());
        }
        check_origin(&position, &GridConfig::resolve(&slot.config, &self.config));
        self.relayout();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.len() == 0
    }

    pub fn cell_ids(&self) -> Vec<CellId> {
        self.cells.ids().collect()
    }

    /// Apply container-level options.
    pub fn mutate(&mut self, options: &LayoutOptions) {
        options.check(
            &[GRID_CELL_KEYS, GRID_CONTAINER_KEYS, MARGIN_KEYS],
            "grid layouts",
        );
        let mut changed = self.config.apply(options);
        for axis in Orientation::ALL {
            let value = match axis {
                Orientation::Horizontal => options.x_spacing.clone(),
                Orientation::Vertical => options.y_spacing.clone(),
            };
            let Some(spacing) = value.or_else(|| options.spacing.map(Spacing::Uniform)) else {
                continue;
            };
            if spacing.check(spacing_option(axis)) {
                changed |= set_field(self.spacing.get_mut(axis), spacing);
            }
        }
        if let Some(exclude) = options.exclude_invisible {
            changed |= set_field(&mut self.exclude_invisible, exclude);
        }
        if changed {
            self.check_all_origins();
            self.relayout();
        }
    }

    /// Apply cell-level options to one cell.
    pub fn configure_cell(&mut self, id: CellId, options: &LayoutOptions) -> Result<(), LayoutError> {
        options.check(&[GRID_CELL_KEYS, MARGIN_KEYS], "grid cells");
        let slot = &mut self.cells.get_mut(id)?.data;
        if slot.config.apply(options) {
            check_origin(&slot.position, &GridConfig::resolve(&slot.config, &self.config));
            self.relayout();
        }
        Ok(())
    }

    /// Edit one cell's record. `update` returns whether anything changed.
    pub fn update_cell(
        &mut self,
        id: CellId,
        update: impl FnOnce(&mut GridConfig) -> bool,
    ) -> Result<(), LayoutError> {
        let slot = &mut self.cells.get_mut(id)?.data;
        if update(&mut slot.config) {
            check_origin(&slot.position, &GridConfig::resolve(&slot.config, &self.config));
            self.relayout();
        }
        Ok(())
    }

    /// Make one cell inherit everything except the `ignore`d fields again.
    pub fn reset_cell(&mut self, id: CellId, ignore: &[ConfigKey]) -> Result<(), LayoutError> {
        let slot = &mut self.cells.get_mut(id)?.data;
        let before = slot.config;
        slot.config.reset_to_inherit(ignore);
        if slot.config != before {
            check_origin(&slot.position, &GridConfig::resolve(&slot.config, &self.config));
            self.relayout();
        }
        Ok(())
    }

    pub fn cell_config(&self, id: CellId) -> Result<&GridConfig, LayoutError> {
        Ok(&self.cells.get(id)?.data.config)
    }

    /// The values a cell actually uses after inheritance.
    pub fn resolved_cell_config(&self, id: CellId) -> Result<ResolvedGridConfig, LayoutError> {
        Ok(GridConfig::resolve(&self.cells.get(id)?.data.config, &self.config))
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Edit the container defaults. `update` returns whether anything changed.
    pub fn update_config(&mut self, update: impl FnOnce(&mut GridConfig) -> bool) {
        if update(&mut self.config) {
            self.check_all_origins();
            self.relayout();
        }
    }

    pub fn spacing(&self, axis: Orientation) -> &Spacing {
        self.spacing.get(axis)
    }

    /// Spacing between consecutive columns (horizontal) or rows (vertical).
    pub fn set_spacing(&mut self, axis: Orientation, spacing: impl Into<Spacing>) {
        let spacing = spacing.into();
        if spacing.check(spacing_option(axis)) && set_field(self.spacing.get_mut(axis), spacing) {
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

    fn check_all_origins(&self) {
        for cell in self.cells.iter() {
            check_origin(
                &cell.data.position,
                &GridConfig::resolve(&cell.data.config, &self.config),
            );
        }
    }
}

impl Layout for GridBox {
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

        let items: Vec<GridItem<'_>> = self
            .cells
            .iter()
            .filter(|cell| cell.is_active(self.exclude_invisible))
            .map(|cell| GridItem {
                cell,
                position: cell.data.position,
                config: GridConfig::resolve(&cell.data.config, &self.config),
            })
            .collect();
        if items.is_empty() {
            debug!("grid layout pass with no active cells");
            return LayoutResult::default();
        }

        let mut result = LayoutResult::default();
        let mut lines = PerAxis::splat(0);
        let origin = self.state.origin;
        for axis in Orientation::ALL {
            // Measured after the previous axis was committed.
            let measured: Vec<(&GridItem<'_>, AxisCell)> = items
                .iter()
                .filter_map(|item| {
                    let measure = item.cell.measure(axis, item.config.margins.get(axis))?;
                    let origin = (*item.config.align.get(axis) == Alignment::Origin)
                        .then_some((measure.origin_before, measure.origin_after));
                    Some((
                        item,
                        AxisCell {
                            start: item.position.start(axis),
                            span: item.position.span(axis),
                            min: measure.min,
                            max: measure.max,
                            grow: *item.config.grow.get(axis),
                            origin,
                        },
                    ))
                })
                .collect();
            let cells: Vec<AxisCell> = measured.iter().map(|(_, cell)| *cell).collect();
            let tracks = TrackLayout::solve(
                &cells,
                self.spacing.get(axis),
                *self.state.preferred.get(axis),
                axis.component(origin),
            );
            result.set_min_size(axis, tracks.min_size);
            lines.set(axis, tracks.tracks.len());

            for (item, cell) in &measured {
                let Some((position, size, origin_offset)) = tracks.slot(cell.start, cell.span) else {
                    continue;
                };
                let placement = Placement {
                    axis,
                    size,
                    position,
                    stretch: *item.config.stretch.get(axis),
                    origin_offset,
                    align: *item.config.align.get(axis),
                };
                let placed = item.cell.reposition(&placement, &item.config.margins);
                if let (Some(placed), Orientation::Vertical) = (placed, axis) {
                    result.bounds = union_bounds(result.bounds, placed);
                }
            }
        }

        debug!(
            cells = items.len(),
            columns = lines.horizontal,
            rows = lines.vertical,
            min_width = ?result.min_width,
            min_height = ?result.min_height,
            "grid layout pass"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::BoxContent;
    use smallvec::smallvec;

    fn axis_cell(start: usize, span: usize, min: f64, grow: f64) -> AxisCell {
        AxisCell {
            start,
            span,
            min,
            max: f64::INFINITY,
            grow,
            origin: None,
        }
    }

    fn boxed(content: BoxContent) -> Rc<RefCell<BoxContent>> {
        Rc::new(RefCell::new(content))
    }

    #[test]
    fn test_span_absorbs_spacing() {
        let cells = [
            axis_cell(0, 1, 50.0, 0.0),
            axis_cell(1, 1, 30.0, 0.0),
            axis_cell(0, 2, 10.0, 0.0),
        ];
        let layout = TrackLayout::solve(&cells, &Spacing::Uniform(10.0), None, 0.0);
        let (position, size, _) = layout.slot(0, 2).unwrap();
        assert!(position.abs() < 0.001);
        assert!((size - 90.0).abs() < 0.001);
        assert!((layout.min_size - 90.0).abs() < 0.001);
    }

    #[test]
    fn test_rows_grow_into_preferred_size() {
        let cells = [axis_cell(0, 1, 40.0, 1.0), axis_cell(1, 1, 40.0, 0.0)];
        let layout = TrackLayout::solve(&cells, &Spacing::default(), Some(140.0), 0.0);
        assert!((layout.tracks[0].size - 100.0).abs() < 0.001);
        assert!((layout.tracks[1].size - 40.0).abs() < 0.001);
        assert!((layout.tracks[1].position - 100.0).abs() < 0.001);
        assert!((layout.min_size - 80.0).abs() < 0.001);
    }

    #[test]
    fn test_unoccupied_indices_produce_no_line() {
        let cells = [axis_cell(0, 1, 10.0, 0.0), axis_cell(5, 1, 20.0, 0.0)];
        let layout = TrackLayout::solve(&cells, &Spacing::Uniform(4.0), None, 0.0);
        assert_eq!(layout.tracks.len(), 2);
        let (position, size, _) = layout.slot(5, 1).unwrap();
        assert!((position - 14.0).abs() < 0.001);
        assert!((size - 20.0).abs() < 0.001);
        assert!(layout.slot(2, 1).is_none());
    }

    #[test]
    fn test_spanning_cell_grows_lines_evenly() {
        let cells = [
            axis_cell(0, 1, 10.0, 0.0),
            axis_cell(1, 1, 10.0, 0.0),
            axis_cell(0, 2, 60.0, 0.0),
        ];
        let layout = TrackLayout::solve(&cells, &Spacing::default(), None, 0.0);
        assert!((layout.tracks[0].size - 30.0).abs() < 0.001);
        assert!((layout.tracks[1].size - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_spanning_cell_prefers_growing_lines() {
        let cells = [
            axis_cell(0, 1, 10.0, 0.0),
            axis_cell(1, 1, 10.0, 2.0),
            axis_cell(0, 2, 60.0, 0.0),
        ];
        let layout = TrackLayout::solve(&cells, &Spacing::default(), None, 0.0);
        assert!((layout.tracks[0].size - 10.0).abs() < 0.001);
        assert!((layout.tracks[1].size - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_line_max_redirects_growth() {
        let mut capped = axis_cell(0, 1, 10.0, 0.0);
        capped.max = 15.0;
        let cells = [capped, axis_cell(1, 1, 10.0, 0.0), axis_cell(0, 2, 60.0, 0.0)];
        let layout = TrackLayout::solve(&cells, &Spacing::default(), None, 0.0);
        assert!((layout.tracks[0].size - 15.0).abs() < 0.001);
        assert!((layout.tracks[1].size - 45.0).abs() < 0.001);
    }

    #[test]
    fn test_bounded_span_forbids_shared_line() {
        // Columns 0..2 are needed by a wide cell, but a bounded cell over
        // columns 1..3 already sits at its maximum.
        let mut bounded = axis_cell(1, 2, 20.0, 0.0);
        bounded.max = 20.0;
        let cells = [
            axis_cell(0, 1, 10.0, 0.0),
            axis_cell(1, 1, 10.0, 0.0),
            axis_cell(2, 1, 10.0, 0.0),
            axis_cell(0, 2, 50.0, 0.0),
            bounded,
        ];
        let layout = TrackLayout::solve(&cells, &Spacing::default(), None, 0.0);
        assert!((layout.tracks[0].size - 40.0).abs() < 0.001);
        assert!((layout.tracks[1].size - 10.0).abs() < 0.001);
        assert!((layout.tracks[2].size - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_infeasible_span_keeps_best_effort() {
        let mut a = axis_cell(0, 1, 10.0, 0.0);
        a.max = 10.0;
        let mut b = axis_cell(1, 1, 10.0, 0.0);
        b.max = 10.0;
        let cells = [a, b, axis_cell(0, 2, 50.0, 0.0)];
        let layout = TrackLayout::solve(&cells, &Spacing::default(), None, 0.0);
        assert!((layout.tracks[0].size - 10.0).abs() < 0.001);
        assert!((layout.tracks[1].size - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_per_gap_spacing() {
        let cells = [
            axis_cell(0, 1, 10.0, 0.0),
            axis_cell(1, 1, 10.0, 0.0),
            axis_cell(2, 1, 10.0, 0.0),
        ];
        let layout = TrackLayout::solve(&cells, &Spacing::PerGap(smallvec![2.0, 6.0]), None, 0.0);
        assert!((layout.tracks[1].position - 12.0).abs() < 0.001);
        assert!((layout.tracks[2].position - 28.0).abs() < 0.001);
        assert!((layout.min_size - 38.0).abs() < 0.001);
    }

    #[test]
    fn test_grid_places_cells() {
        let a = boxed(BoxContent::fixed(50.0, 20.0));
        let b = boxed(BoxContent::fixed(30.0, 10.0));
        let wide = boxed(BoxContent::resizable(10.0, 10.0));
        let mut grid = GridBox::new();
        grid.lock();
        grid.set_spacing(Orientation::Horizontal, 10.0);
        grid.add(&a, GridPosition::cell(0, 0)).unwrap();
        grid.add(&b, GridPosition::cell(1, 0)).unwrap();
        let id = grid.add(&wide, GridPosition::span_columns(0, 2, 1)).unwrap();
        grid.update_cell(id, |config| config.set_stretch(Orientation::Horizontal, Some(true)))
            .unwrap();
        grid.unlock();

        assert!((b.borrow().translation().x - 60.0).abs() < 0.001);
        assert!((b.borrow().translation().y - 5.0).abs() < 0.001);
        assert!((wide.borrow().size().x - 90.0).abs() < 0.001);
        assert!((wide.borrow().translation().y - 20.0).abs() < 0.001);
        let result = grid.result();
        assert_eq!(result.min_width, Some(90.0));
        assert_eq!(result.min_height, Some(30.0));
        assert_eq!(result.bounds, Some(bento_core::Bounds::new(0.0, 0.0, 90.0, 30.0)));
    }

    #[test]
    fn test_grid_rows_grow() {
        let top = boxed(BoxContent::fixed(10.0, 40.0));
        let bottom = boxed(BoxContent::fixed(10.0, 40.0));
        let mut grid = GridBox::new();
        let id = grid.add(&top, GridPosition::cell(0, 0)).unwrap();
        grid.add(&bottom, GridPosition::cell(0, 1)).unwrap();
        grid.update_cell(id, |config| config.set_grow(Orientation::Vertical, Some(1.0)))
            .unwrap();
        grid.set_preferred_size(Orientation::Vertical, Some(140.0));

        // Top row is 100 tall and centers its 40-tall content.
        assert!((top.borrow().translation().y - 30.0).abs() < 0.001);
        assert!((bottom.borrow().translation().y - 100.0).abs() < 0.001);
        assert_eq!(grid.result().min_height, Some(80.0));
    }

    #[test]
    fn test_set_position_moves_cell() {
        let a = boxed(BoxContent::fixed(10.0, 10.0));
        let b = boxed(BoxContent::fixed(10.0, 10.0));
        let mut grid = GridBox::new();
        grid.add(&a, GridPosition::cell(0, 0)).unwrap();
        let id = grid.add(&b, GridPosition::cell(1, 0)).unwrap();
        assert!((b.borrow().translation().x - 10.0).abs() < 0.001);

        grid.set_position(id, GridPosition::cell(0, 1)).unwrap();
        assert!(b.borrow().translation().x.abs() < 0.001);
        assert!((b.borrow().translation().y - 10.0).abs() < 0.001);
        assert_eq!(grid.position(id).unwrap(), GridPosition::cell(0, 1));
    }

    #[test]
    fn test_invisible_cells_leave_no_line() {
        let a = boxed(BoxContent::fixed(10.0, 10.0));
        let hidden = boxed(BoxContent::fixed(10.0, 10.0).with_visible(false));
        let c = boxed(BoxContent::fixed(10.0, 10.0));
        let mut grid = GridBox::new();
        grid.set_spacing(Orientation::Horizontal, 5.0);
        grid.add(&a, GridPosition::cell(0, 0)).unwrap();
        grid.add(&hidden, GridPosition::cell(1, 0)).unwrap();
        grid.add(&c, GridPosition::cell(2, 0)).unwrap();
        assert!((c.borrow().translation().x - 15.0).abs() < 0.001);

        grid.set_exclude_invisible(false);
        assert!((c.borrow().translation().x - 30.0).abs() < 0.001);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "single line")]
    fn test_origin_on_spanning_cell_asserts() {
        let a = boxed(BoxContent::fixed(10.0, 10.0));
        let mut grid = GridBox::new();
        let options = LayoutOptions::new().with_y_align(Alignment::Origin);
        grid.add_with(&a, GridPosition::span_rows(0, 0, 2), &options)
            .unwrap();
    }

    #[test]
    fn test_rejected_spacing_keeps_previous_gaps() {
        let a = boxed(BoxContent::fixed(10.0, 10.0));
        let b = boxed(BoxContent::fixed(10.0, 10.0));
        let mut grid = GridBox::new();
        grid.set_spacing(Orientation::Horizontal, 5.0);
        grid.add(&a, GridPosition::cell(0, 0)).unwrap();
        grid.add(&b, GridPosition::cell(1, 0)).unwrap();
        let passes = grid.result().passes;

        let per_gap = Spacing::PerGap(smallvec![4.0, f64::NAN]);
        for spacing in [Spacing::Uniform(-3.0), per_gap] {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                grid.set_spacing(Orientation::Horizontal, spacing)
            }));
        }

        assert_eq!(grid.result().passes, passes);
        assert_eq!(grid.spacing(Orientation::Horizontal), &Spacing::Uniform(5.0));
        assert!((b.borrow().translation().x - 15.0).abs() < 0.001);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "single line")]
    fn test_reset_to_inherited_origin_asserts() {
        let a = boxed(BoxContent::fixed(10.0, 10.0));
        let mut grid = GridBox::new();
        let id = grid
            .add_with(
                &a,
                GridPosition::span_columns(0, 2, 0),
                &LayoutOptions::new().with_x_align(Alignment::Start),
            )
            .unwrap();
        grid.update_config(|config| config.set_align(Orientation::Horizontal, Some(Alignment::Origin)));
        grid.reset_cell(id, &[]).unwrap();
    }
}
