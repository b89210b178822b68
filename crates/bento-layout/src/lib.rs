//! Box layout solvers.
//!
//! This crate sizes and positions rectangular content inside layout
//! containers.
//!
//! # Architecture
//!
//! 1. **Content**: anything implementing [`LayoutContent`], held weakly by the container
//! 2. **Configuration**: per-container and per-cell records that inherit
//!    cell > container > base default
//! 3. **Linear layout**: [`FlowBox`] places cells along one axis and can wrap
//! 4. **Grid layout**: [`GridBox`] places cells into rows and columns, with spanning cells
//!
//! Every mutation relayouts synchronously. Wrap batches of changes in
//! [`Layout::lock`] / [`Layout::unlock`] to run a single pass.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use bento_layout::{BoxContent, GridBox, GridPosition, Layout, LayoutContent, Orientation};
//!
//! let label = Rc::new(RefCell::new(BoxContent::fixed(40.0, 10.0)));
//! let field = Rc::new(RefCell::new(BoxContent::resizable(60.0, 10.0)));
//!
//! let mut grid = GridBox::new();
//! grid.lock();
//! grid.set_spacing(Orientation::Horizontal, 8.0);
//! grid.add(&label, GridPosition::cell(0, 0)).unwrap();
//! grid.add(&field, GridPosition::cell(1, 0)).unwrap();
//! grid.unlock();
//!
//! assert_eq!(grid.result().min_width, Some(108.0));
//! assert_eq!(field.borrow().translation().x, 48.0);
//! ```

mod cell;
mod config;
mod container;
mod content;
mod flow;
mod grid;
mod grow;
mod options;
mod separator;

pub use bento_core::{
    Alignment, Bounds, CellId, ConfigError, Justify, LayoutError, Orientation, PerAxis,
};
pub use cell::SharedContent;
pub use config::{
    AxisMargins, ConfigKey, FlowConfig, GridConfig, MarginConfig, ResolvedFlowConfig,
    ResolvedGridConfig, ResolvedMargins,
};
pub use container::{Layout, LayoutListener, LayoutResult, LayoutState};
pub use content::{BoxContent, LayoutContent};
pub use flow::FlowBox;
pub use grid::{GridBox, GridPosition};
pub use options::{LayoutOptions, Spacing};
pub use separator::{separator_visibility, SeparatorSlot};
