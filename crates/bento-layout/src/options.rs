//! The caller-facing option bag.
//!
//! [`LayoutOptions`] collects every recognized option. Containers and cells
//! each accept the subset that makes sense for them; anything else is
//! reported through [`report_config_error`].

use bento_core::{report_config_error, Alignment, ConfigError, Justify, Orientation};
use smallvec::SmallVec;

use crate::config::check_length;

/// Margin and content-size option names shared by every configuration record.
pub(crate) const MARGIN_KEYS: &[&str] = &[
    "margin",
    "xMargin",
    "yMargin",
    "leftMargin",
    "rightMargin",
    "topMargin",
    "bottomMargin",
    "minContentWidth",
    "minContentHeight",
    "maxContentWidth",
    "maxContentHeight",
];

pub(crate) const FLOW_CELL_KEYS: &[&str] = &["align", "cellAlign", "stretch", "grow"];
pub(crate) const FLOW_CONTAINER_KEYS: &[&str] = &[
    "orientation",
    "spacing",
    "lineSpacing",
    "justify",
    "justifyLines",
    "wrap",
    "excludeInvisible",
];

pub(crate) const GRID_CELL_KEYS: &[&str] = &[
    "xAlign", "yAlign", "stretch", "xStretch", "yStretch", "grow", "xGrow", "yGrow",
];
pub(crate) const GRID_CONTAINER_KEYS: &[&str] = &["spacing", "xSpacing", "ySpacing", "excludeInvisible"];

/// Spacing between consecutive lines along one axis.
#[derive(Debug, Clone, PartialEq)]
pub enum Spacing {
    /// The same gap everywhere
    Uniform(f64),
    /// One gap per line index; indices past the end reuse the last gap
    PerGap(SmallVec<[f64; 4]>),
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing::Uniform(0.0)
    }
}

impl From<f64> for Spacing {
    fn from(value: f64) -> Self {
        Spacing::Uniform(value)
    }
}

impl Spacing {
    /// The gap following line `index`.
    pub fn gap(&self, index: usize) -> f64 {
        match self {
            Spacing::Uniform(value) => *value,
            Spacing::PerGap(gaps) => gaps
                .get(index)
                .or_else(|| gaps.last())
                .copied()
                .unwrap_or(0.0),
        }
    }

    /// Report any negative or non-finite gap.
    pub(crate) fn check(&self, option: &str) -> bool {
        match self {
            Spacing::Uniform(value) => check_length(option, *value),
            Spacing::PerGap(gaps) => gaps.iter().all(|&gap| check_length(option, gap)),
        }
    }
}

/// Layout options. `None` leaves the corresponding setting untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOptions {
    /// Primary axis of a linear layout
    pub orientation: Option<Orientation>,
    /// Cross-axis placement in a linear layout
    pub align: Option<Alignment>,
    pub x_align: Option<Alignment>,
    pub y_align: Option<Alignment>,
    /// Primary-axis placement inside a grow-expanded cell
    pub cell_align: Option<Alignment>,
    pub stretch: Option<bool>,
    pub x_stretch: Option<bool>,
    pub y_stretch: Option<bool>,
    pub grow: Option<f64>,
    pub x_grow: Option<f64>,
    pub y_grow: Option<f64>,
    pub spacing: Option<f64>,
    pub x_spacing: Option<Spacing>,
    pub y_spacing: Option<Spacing>,
    pub line_spacing: Option<f64>,
    pub justify: Option<Justify>,
    /// `Some(None)` restores the default stretch-to-fill line distribution
    pub justify_lines: Option<Option<Justify>>,
    pub wrap: Option<bool>,
    pub exclude_invisible: Option<bool>,
    pub margin: Option<f64>,
    pub x_margin: Option<f64>,
    pub y_margin: Option<f64>,
    pub left_margin: Option<f64>,
    pub right_margin: Option<f64>,
    pub top_margin: Option<f64>,
    pub bottom_margin: Option<f64>,
    pub min_content_width: Option<f64>,
    pub min_content_height: Option<f64>,
    pub max_content_width: Option<f64>,
    pub max_content_height: Option<f64>,
}

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }

    pub fn with_cell_align(mut self, align: Alignment) -> Self {
        self.cell_align = Some(align);
        self
    }

    pub fn with_x_align(mut self, align: Alignment) -> Self {
        self.x_align = Some(align);
        self
    }

    pub fn with_y_align(mut self, align: Alignment) -> Self {
        self.y_align = Some(align);
        self
    }

    pub fn with_stretch(mut self, stretch: bool) -> Self {
        self.stretch = Some(stretch);
        self
    }

    pub fn with_grow(mut self, grow: f64) -> Self {
        self.grow = Some(grow);
        self
    }

    pub fn with_x_grow(mut self, grow: f64) -> Self {
        self.x_grow = Some(grow);
        self
    }

    pub fn with_y_grow(mut self, grow: f64) -> Self {
        self.y_grow = Some(grow);
        self
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_line_spacing(mut self, spacing: f64) -> Self {
        self.line_spacing = Some(spacing);
        self
    }

    pub fn with_justify(mut self, justify: Justify) -> Self {
        self.justify = Some(justify);
        self
    }

    pub fn with_justify_lines(mut self, justify: Option<Justify>) -> Self {
        self.justify_lines = Some(justify);
        self
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = Some(wrap);
        self
    }

    pub fn with_exclude_invisible(mut self, exclude: bool) -> Self {
        self.exclude_invisible = Some(exclude);
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = Some(margin);
        self
    }

    /// Check that no mutually exclusive options are both set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pairs: [(&'static str, bool, &'static str, bool); 16] = [
            ("align", self.align.is_some(), "xAlign", self.x_align.is_some()),
            ("align", self.align.is_some(), "yAlign", self.y_align.is_some()),
            ("stretch", self.stretch.is_some(), "xStretch", self.x_stretch.is_some()),
            ("stretch", self.stretch.is_some(), "yStretch", self.y_stretch.is_some()),
            ("grow", self.grow.is_some(), "xGrow", self.x_grow.is_some()),
            ("grow", self.grow.is_some(), "yGrow", self.y_grow.is_some()),
            ("spacing", self.spacing.is_some(), "xSpacing", self.x_spacing.is_some()),
            ("spacing", self.spacing.is_some(), "ySpacing", self.y_spacing.is_some()),
            ("margin", self.margin.is_some(), "xMargin", self.x_margin.is_some()),
            ("margin", self.margin.is_some(), "yMargin", self.y_margin.is_some()),
            ("margin", self.margin.is_some(), "leftMargin", self.left_margin.is_some()),
            ("margin", self.margin.is_some(), "rightMargin", self.right_margin.is_some()),
            ("margin", self.margin.is_some(), "topMargin", self.top_margin.is_some()),
            ("margin", self.margin.is_some(), "bottomMargin", self.bottom_margin.is_some()),
            ("xMargin", self.x_margin.is_some(), "leftMargin", self.left_margin.is_some() || self.right_margin.is_some()),
            ("yMargin", self.y_margin.is_some(), "topMargin", self.top_margin.is_some() || self.bottom_margin.is_some()),
        ];
        for (first, has_first, second, has_second) in pairs {
            if has_first && has_second {
                return Err(ConfigError::ConflictingOptions { first, second });
            }
        }
        Ok(())
    }

    /// Report conflicts and any option outside `supported`.
    pub(crate) fn check(&self, supported: &[&[&str]], target: &'static str) {
        if let Err(err) = self.validate() {
            report_config_error(&err);
        }
        for key in self.present_keys() {
            if !supported.iter().any(|keys| keys.contains(&key)) {
                report_config_error(&ConfigError::UnsupportedOption { option: key, target });
            }
        }
    }

    /// Names of every option that is set.
    pub fn present_keys(&self) -> SmallVec<[&'static str; 8]> {
        let flags: [(&'static str, bool); 30] = [
            ("orientation", self.orientation.is_some()),
            ("align", self.align.is_some()),
            ("xAlign", self.x_align.is_some()),
            ("yAlign", self.y_align.is_some()),
            ("cellAlign", self.cell_align.is_some()),
            ("stretch", self.stretch.is_some()),
            ("xStretch", self.x_stretch.is_some()),
            ("yStretch", self.y_stretch.is_some()),
            ("grow", self.grow.is_some()),
            ("xGrow", self.x_grow.is_some()),
            ("yGrow", self.y_grow.is_some()),
            ("spacing", self.spacing.is_some()),
            ("xSpacing", self.x_spacing.is_some()),
            ("ySpacing", self.y_spacing.is_some()),
            ("lineSpacing", self.line_spacing.is_some()),
            ("justify", self.justify.is_some()),
            ("justifyLines", self.justify_lines.is_some()),
            ("wrap", self.wrap.is_some()),
            ("excludeInvisible", self.exclude_invisible.is_some()),
            ("margin", self.margin.is_some()),
            ("xMargin", self.x_margin.is_some()),
            ("yMargin", self.y_margin.is_some()),
            ("leftMargin", self.left_margin.is_some()),
            ("rightMargin", self.right_margin.is_some()),
            ("topMargin", self.top_margin.is_some()),
            ("bottomMargin", self.bottom_margin.is_some()),
            ("minContentWidth", self.min_content_width.is_some()),
            ("minContentHeight", self.min_content_height.is_some()),
            ("maxContentWidth", self.max_content_width.is_some()),
            ("maxContentHeight", self.max_content_height.is_some()),
        ];
        flags
            .into_iter()
            .filter(|(_, set)| *set)
            .map(|(key, _)| key)
            .collect()
    }

    /// Set an option from its external name and string value.
    ///
    /// Axis-relative values ("left", "top", ...) are translated against the
    /// axis the option applies to. For linear layouts that depends on the
    /// orientation: the one already in these options, else `orientation`.
    pub fn set_named(
        &mut self,
        key: &str,
        value: &str,
        orientation: Orientation,
    ) -> Result<&mut Self, ConfigError> {
        let primary = self.orientation.unwrap_or(orientation);
        match key {
            "orientation" => {
                self.orientation =
                    Some(Orientation::from_name(value).ok_or_else(|| invalid(key, value))?)
            }
            "align" => self.align = Some(Alignment::from_name(primary.opposite(), value)?),
            "xAlign" => self.x_align = Some(Alignment::from_name(Orientation::Horizontal, value)?),
            "yAlign" => self.y_align = Some(Alignment::from_name(Orientation::Vertical, value)?),
            "cellAlign" => self.cell_align = Some(Alignment::from_name(primary, value)?),
            "stretch" => self.stretch = Some(parse_bool(key, value)?),
            "xStretch" => self.x_stretch = Some(parse_bool(key, value)?),
            "yStretch" => self.y_stretch = Some(parse_bool(key, value)?),
            "grow" => self.grow = Some(parse_number(key, value)?),
            "xGrow" => self.x_grow = Some(parse_number(key, value)?),
            "yGrow" => self.y_grow = Some(parse_number(key, value)?),
            "spacing" => self.spacing = Some(parse_number(key, value)?),
            "xSpacing" => self.x_spacing = Some(parse_spacing(key, value)?),
            "ySpacing" => self.y_spacing = Some(parse_spacing(key, value)?),
            "lineSpacing" => self.line_spacing = Some(parse_number(key, value)?),
            "justify" => self.justify = Some(Justify::from_name(primary, value)?),
            "justifyLines" => {
                self.justify_lines = Some(match value {
                    "stretch" => None,
                    _ => Some(Justify::from_name(primary.opposite(), value)?),
                })
            }
            "wrap" => self.wrap = Some(parse_bool(key, value)?),
            "excludeInvisible" => self.exclude_invisible = Some(parse_bool(key, value)?),
            "margin" => self.margin = Some(parse_number(key, value)?),
            "xMargin" => self.x_margin = Some(parse_number(key, value)?),
            "yMargin" => self.y_margin = Some(parse_number(key, value)?),
            "leftMargin" => self.left_margin = Some(parse_number(key, value)?),
            "rightMargin" => self.right_margin = Some(parse_number(key, value)?),
            "topMargin" => self.top_margin = Some(parse_number(key, value)?),
            "bottomMargin" => self.bottom_margin = Some(parse_number(key, value)?),
            "minContentWidth" => self.min_content_width = Some(parse_number(key, value)?),
            "minContentHeight" => self.min_content_height = Some(parse_number(key, value)?),
            "maxContentWidth" => self.max_content_width = Some(parse_number(key, value)?),
            "maxContentHeight" => self.max_content_height = Some(parse_number(key, value)?),
            _ => {
                return Err(ConfigError::UnknownOption {
                    name: key.to_string(),
                })
            }
        }
        Ok(self)
    }

    /// Build options from `(name, value)` pairs.
    pub fn parse(pairs: &[(&str, &str)], orientation: Orientation) -> Result<Self, ConfigError> {
        let mut options = Self::new();
        // Orientation first, so axis-relative names resolve against it.
        for (key, value) in pairs.iter().filter(|(key, _)| *key == "orientation") {
            options.set_named(key, value, orientation)?;
        }
        for (key, value) in pairs.iter().filter(|(key, _)| *key != "orientation") {
            options.set_named(key, value, orientation)?;
        }
        Ok(options)
    }
}

fn invalid(option: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        option: option.to_string(),
        value: value.to_string(),
    }
}

fn parse_bool(option: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(option, value)),
    }
}

fn parse_number(option: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(option, value))
}

fn parse_spacing(option: &str, value: &str) -> Result<Spacing, ConfigError> {
    if !value.contains(',') {
        return parse_number(option, value).map(Spacing::Uniform);
    }
    value
        .split(',')
        .map(|part| parse_number(option, part))
        .collect::<Result<SmallVec<[f64; 4]>, _>>()
        .map(Spacing::PerGap)
}
