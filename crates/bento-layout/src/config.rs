//! Per-container and per-cell configuration records.
//!
//! Every field is optional, where `None` means "inherit". Values resolve
//! through three levels: the cell's record, then the container's record,
//! then the base default. Containers start from
//! [`base_default`](FlowConfig::base_default); cells start fully inheriting.

use bento_core::{report_config_error, Alignment, ConfigError, Orientation, PerAxis};

use crate::options::LayoutOptions;

/// Store `value` in `slot`, returning whether anything changed.
///
/// Containers relayout only on real changes, so setters must go through this.
pub(crate) fn set_field<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// Check that a length or weight is finite and non-negative.
///
/// Rejected values are reported and never stored.
pub(crate) fn check_length(option: &str, value: f64) -> bool {
    let valid = value.is_finite() && value >= 0.0;
    if !valid {
        report_config_error(&ConfigError::InvalidValue {
            option: option.to_string(),
            value: value.to_string(),
        });
    }
    valid
}

fn check_optional(option: &str, value: Option<f64>) -> bool {
    value.map_or(true, |value| check_length(option, value))
}

/// Fields that [`reset_to_inherit`](FlowConfig::reset_to_inherit) can leave alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Align,
    CellAlign,
    Stretch,
    Grow,
    XAlign,
    YAlign,
    XStretch,
    YStretch,
    XGrow,
    YGrow,
    Margins,
    ContentSize,
}

/// Margins and content-size overrides along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisMargins {
    /// Margin before the content (left or top)
    pub start: Option<f64>,
    /// Margin after the content (right or bottom)
    pub end: Option<f64>,
    /// Replaces the content's own minimum size
    pub min_content: Option<f64>,
    /// Replaces the content's own maximum size
    pub max_content: Option<f64>,
}

/// Fully resolved [`AxisMargins`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedMargins {
    pub start: f64,
    pub end: f64,
    pub min_content: Option<f64>,
    pub max_content: Option<f64>,
}

impl ResolvedMargins {
    pub fn total(&self) -> f64 {
        self.start + self.end
    }
}

/// Margin configuration for both axes, embedded in every record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarginConfig {
    pub axes: PerAxis<AxisMargins>,
}

impl MarginConfig {
    pub fn base_default() -> Self {
        let axis = AxisMargins {
            start: Some(0.0),
            end: Some(0.0),
            min_content: None,
            max_content: None,
        };
        Self {
            axes: PerAxis::splat(axis),
        }
    }

    pub fn set_margins(&mut self, axis: Orientation, start: Option<f64>, end: Option<f64>) -> bool {
        if !(check_optional("margin", start) && check_optional("margin", end)) {
            return false;
        }
        let margins = self.axes.get_mut(axis);
        let a = set_field(&mut margins.start, start);
        let b = set_field(&mut margins.end, end);
        a || b
    }

    pub fn set_content_range(
        &mut self,
        axis: Orientation,
        min: Option<f64>,
        max: Option<f64>,
    ) -> bool {
        if !(check_optional("minContentSize", min) && check_optional("maxContentSize", max)) {
            return false;
        }
        let margins = self.axes.get_mut(axis);
        let a = set_field(&mut margins.min_content, min);
        let b = set_field(&mut margins.max_content, max);
        a || b
    }

    fn clear_margins(&mut self) {
        for axis in Orientation::ALL {
            let margins = self.axes.get_mut(axis);
            margins.start = None;
            margins.end = None;
        }
    }

    fn clear_content_size(&mut self) {
        for axis in Orientation::ALL {
            let margins = self.axes.get_mut(axis);
            margins.min_content = None;
            margins.max_content = None;
        }
    }

    pub(crate) fn apply(&mut self, options: &LayoutOptions) -> bool {
        let mut changed = false;
        let h = Orientation::Horizontal;
        let v = Orientation::Vertical;

        let uniform = options.margin;
        let x = options.x_margin.or(uniform);
        let y = options.y_margin.or(uniform);
        let sides = [
            ("leftMargin", h, true, options.left_margin.or(x)),
            ("rightMargin", h, false, options.right_margin.or(x)),
            ("topMargin", v, true, options.top_margin.or(y)),
            ("bottomMargin", v, false, options.bottom_margin.or(y)),
        ];
        for (option, axis, is_start, value) in sides {
            if let Some(value) = value.filter(|&value| check_length(option, value)) {
                let margins = self.axes.get_mut(axis);
                let slot = if is_start { &mut margins.start } else { &mut margins.end };
                changed |= set_field(slot, Some(value));
            }
        }

        let content = [
            ("minContentWidth", h, true, options.min_content_width),
            ("minContentHeight", v, true, options.min_content_height),
            ("maxContentWidth", h, false, options.max_content_width),
            ("maxContentHeight", v, false, options.max_content_height),
        ];
        for (option, axis, is_min, value) in content {
            if let Some(value) = value.filter(|&value| check_length(option, value)) {
                let margins = self.axes.get_mut(axis);
                let slot = if is_min {
                    &mut margins.min_content
                } else {
                    &mut margins.max_content
                };
                changed |= set_field(slot, Some(value));
            }
        }
        changed
    }

    /// Resolve cell > container > zero margins.
    pub fn resolve(cell: &Self, container: &Self) -> PerAxis<ResolvedMargins> {
        let resolve_axis = |axis: Orientation| {
            let c = cell.axes.get(axis);
            let p = container.axes.get(axis);
            ResolvedMargins {
                start: c.start.or(p.start).unwrap_or(0.0),
                end: c.end.or(p.end).unwrap_or(0.0),
                min_content: c.min_content.or(p.min_content),
                max_content: c.max_content.or(p.max_content),
            }
        };
        PerAxis::new(
            resolve_axis(Orientation::Horizontal),
            resolve_axis(Orientation::Vertical),
        )
    }
}

/// Configuration for cells of a linear layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlowConfig {
    /// Cross-axis placement when the line is larger than the cell
    pub align: Option<Alignment>,
    /// Primary-axis placement inside a grow-expanded cell
    pub cell_align: Option<Alignment>,
    /// Whether resizable content fills the line's cross size
    pub stretch: Option<bool>,
    /// Share of leftover primary-axis space
    pub grow: Option<f64>,
    pub margins: MarginConfig,
}

/// Fully resolved [`FlowConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedFlowConfig {
    pub align: Alignment,
    pub cell_align: Alignment,
    pub stretch: bool,
    pub grow: f64,
    pub margins: PerAxis<ResolvedMargins>,
}

impl FlowConfig {
    /// Concrete container-level defaults.
    pub fn base_default() -> Self {
        Self {
            align: Some(Alignment::Center),
            cell_align: Some(Alignment::Start),
            stretch: Some(false),
            grow: Some(0.0),
            margins: MarginConfig::base_default(),
        }
    }

    pub fn reset_to_base_default(&mut self) {
        *self = Self::base_default();
    }

    /// Clear every field back to "inherit", except those named in `ignore`.
    pub fn reset_to_inherit(&mut self, ignore: &[ConfigKey]) {
        if !ignore.contains(&ConfigKey::Align) {
            self.align = None;
        }
        if !ignore.contains(&ConfigKey::CellAlign) {
            self.cell_align = None;
        }
        if !ignore.contains(&ConfigKey::Stretch) {
            self.stretch = None;
        }
        if !ignore.contains(&ConfigKey::Grow) {
            self.grow = None;
        }
        if !ignore.contains(&ConfigKey::Margins) {
            self.margins.clear_margins();
        }
        if !ignore.contains(&ConfigKey::ContentSize) {
            self.margins.clear_content_size();
        }
    }

    pub fn set_align(&mut self, align: Option<Alignment>) -> bool {
        set_field(&mut self.align, align)
    }

    pub fn set_cell_align(&mut self, align: Option<Alignment>) -> bool {
        if align == Some(Alignment::Origin) {
            report_config_error(&ConfigError::InvalidValue {
                option: "cellAlign".to_string(),
                value: "origin".to_string(),
            });
        }
        set_field(&mut self.cell_align, align)
    }

    pub fn set_stretch(&mut self, stretch: Option<bool>) -> bool {
        set_field(&mut self.stretch, stretch)
    }

    pub fn set_grow(&mut self, grow: Option<f64>) -> bool {
        if !check_optional("grow", grow) {
            return false;
        }
        set_field(&mut self.grow, grow)
    }

    pub(crate) fn apply(&mut self, options: &LayoutOptions) -> bool {
        let mut changed = false;
        if let Some(align) = options.align {
            changed |= self.set_align(Some(align));
        }
        if let Some(align) = options.cell_align {
            changed |= self.set_cell_align(Some(align));
        }
        if let Some(stretch) = options.stretch {
            changed |= self.set_stretch(Some(stretch));
        }
        if let Some(grow) = options.grow {
            changed |= self.set_grow(Some(grow));
        }
        changed |= self.margins.apply(options);
        changed
    }

    /// Resolve cell > container > base default.
    pub fn resolve(cell: &Self, container: &Self) -> ResolvedFlowConfig {
        let base = Self::base_default();
        ResolvedFlowConfig {
            align: cell.align.or(container.align).or(base.align).unwrap_or_default(),
            cell_align: cell
                .cell_align
                .or(container.cell_align)
                .or(base.cell_align)
                .unwrap_or_default(),
            stretch: cell.stretch.or(container.stretch).or(base.stretch).unwrap_or_default(),
            grow: cell.grow.or(container.grow).or(base.grow).unwrap_or_default(),
            margins: MarginConfig::resolve(&cell.margins, &container.margins),
        }
    }
}

/// Configuration for cells of a grid layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridConfig {
    pub align: PerAxis<Option<Alignment>>,
    pub stretch: PerAxis<Option<bool>>,
    pub grow: PerAxis<Option<f64>>,
    pub margins: MarginConfig,
}

/// Fully resolved [`GridConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedGridConfig {
    pub align: PerAxis<Alignment>,
    pub stretch: PerAxis<bool>,
    pub grow: PerAxis<f64>,
    pub margins: PerAxis<ResolvedMargins>,
}

impl GridConfig {
    /// Concrete container-level defaults.
    pub fn base_default() -> Self {
        Self {
            align: PerAxis::splat(Some(Alignment::Center)),
            stretch: PerAxis::splat(Some(false)),
            grow: PerAxis::splat(Some(0.0)),
            margins: MarginConfig::base_default(),
        }
    }

    pub fn reset_to_base_default(&mut self) {
        *self = Self::base_default();
    }

    /// Clear every field back to "inherit", except those named in `ignore`.
    pub fn reset_to_inherit(&mut self, ignore: &[ConfigKey]) {
        let fields = [
            (ConfigKey::XAlign, Orientation::Horizontal),
            (ConfigKey::YAlign, Orientation::Vertical),
        ];
        for (key, axis) in fields {
            if !ignore.contains(&key) {
                self.align.set(axis, None);
            }
        }
        let fields = [
            (ConfigKey::XStretch, Orientation::Horizontal),
            (ConfigKey::YStretch, Orientation::Vertical),
        ];
        for (key, axis) in fields {
            if !ignore.contains(&key) {
                self.stretch.set(axis, None);
            }
        }
        let fields = [
            (ConfigKey::XGrow, Orientation::Horizontal),
            (ConfigKey::YGrow, Orientation::Vertical),
        ];
        for (key, axis) in fields {
            if !ignore.contains(&key) {
                self.grow.set(axis, None);
            }
        }
        if !ignore.contains(&ConfigKey::Margins) {
            self.margins.clear_margins();
        }
        if !ignore.contains(&ConfigKey::ContentSize) {
            self.margins.clear_content_size();
        }
    }

    pub fn set_align(&mut self, axis: Orientation, align: Option<Alignment>) -> bool {
        set_field(self.align.get_mut(axis), align)
    }

    pub fn set_stretch(&mut self, axis: Orientation, stretch: Option<bool>) -> bool {
        set_field(self.stretch.get_mut(axis), stretch)
    }

    pub fn set_grow(&mut self, axis: Orientation, grow: Option<f64>) -> bool {
        let option = if axis == Orientation::Horizontal { "xGrow" } else { "yGrow" };
        if !check_optional(option, grow) {
            return false;
        }
        set_field(self.grow.get_mut(axis), grow)
    }

    pub(crate) fn apply(&mut self, options: &LayoutOptions) -> bool {
        let h = Orientation::Horizontal;
        let v = Orientation::Vertical;
        let mut changed = false;
        if let Some(align) = options.x_align {
            changed |= self.set_align(h, Some(align));
        }
        if let Some(align) = options.y_align {
            changed |= self.set_align(v, Some(align));
        }
        for (axis, value) in [
            (h, options.x_stretch.or(options.stretch)),
            (v, options.y_stretch.or(options.stretch)),
        ] {
            if let Some(stretch) = value {
                changed |= self.set_stretch(axis, Some(stretch));
            }
        }
        for (axis, value) in [
            (h, options.x_grow.or(options.grow)),
            (v, options.y_grow.or(options.grow)),
        ] {
            if let Some(grow) = value {
                changed |= self.set_grow(axis, Some(grow));
            }
        }
        changed |= self.margins.apply(options);
        changed
    }

    /// Resolve cell > container > base default.
    pub fn resolve(cell: &Self, container: &Self) -> ResolvedGridConfig {
        let base = Self::base_default();
        let align = |axis: Orientation| {
            (*cell.align.get(axis))
                .or(*container.align.get(axis))
                .or(*base.align.get(axis))
                .unwrap_or_default()
        };
        let stretch = |axis: Orientation| {
            (*cell.stretch.get(axis))
                .or(*container.stretch.get(axis))
                .or(*base.stretch.get(axis))
                .unwrap_or_default()
        };
        let grow = |axis: Orientation| {
            (*cell.grow.get(axis))
                .or(*container.grow.get(axis))
                .or(*base.grow.get(axis))
                .unwrap_or_default()
        };
        let h = Orientation::Horizontal;
        let v = Orientation::Vertical;
        ResolvedGridConfig {
            align: PerAxis::new(align(h), align(v)),
            stretch: PerAxis::new(stretch(h), stretch(v)),
            grow: PerAxis::new(grow(h), grow(v)),
            margins: MarginConfig::resolve(&cell.margins, &container.margins),
        }
    }
}
