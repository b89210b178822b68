//! Layout pass bookkeeping shared by every container.
//!
//! A container runs its solver synchronously from [`Layout::relayout`]. While
//! it is locked, relayout requests are only recorded; the final unlock runs
//! at most one coalesced pass.

use std::fmt;

use bento_core::{report_config_error, Bounds, ConfigError, Orientation, PerAxis};
use glam::DVec2;

use crate::config::check_length;

/// What a finished layout pass publishes to the owning container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    /// Smallest width the layout can take, `None` when there is nothing to lay out
    pub min_width: Option<f64>,
    /// Smallest height the layout can take
    pub min_height: Option<f64>,
    /// Union of every placed cell's bounds
    pub bounds: Option<Bounds>,
    /// Number of completed passes
    pub passes: u64,
}

impl LayoutResult {
    pub fn min_size(&self, axis: Orientation) -> Option<f64> {
        match axis {
            Orientation::Horizontal => self.min_width,
            Orientation::Vertical => self.min_height,
        }
    }

    pub(crate) fn set_min_size(&mut self, axis: Orientation, value: f64) {
        match axis {
            Orientation::Horizontal => self.min_width = Some(value),
            Orientation::Vertical => self.min_height = Some(value),
        }
    }
}

/// Called once per finished pass.
pub type LayoutListener = Box<dyn FnMut(&LayoutResult)>;

/// Lock, preferred size and published result of one container.
#[derive(Default)]
pub struct LayoutState {
    lock_depth: u32,
    pending: bool,
    pub(crate) preferred: PerAxis<Option<f64>>,
    pub(crate) origin: DVec2,
    result: LayoutResult,
    listeners: Vec<LayoutListener>,
}

impl fmt::Debug for LayoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutState")
            .field("lock_depth", &self.lock_depth)
            .field("pending", &self.pending)
            .field("preferred", &self.preferred)
            .field("origin", &self.origin)
            .field("result", &self.result)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl LayoutState {
    /// Try to start a pass. Returns false (and records the request) when locked.
    fn begin(&mut self) -> bool {
        if self.lock_depth > 0 {
            self.pending = true;
            return false;
        }
        self.lock_depth += 1;
        self.pending = false;
        true
    }

    fn finish(&mut self, mut result: LayoutResult) {
        self.lock_depth -= 1;
        result.passes = self.result.passes + 1;
        self.result = result;
        for listener in self.listeners.iter_mut() {
            listener(&self.result);
        }
    }

    fn lock(&mut self) {
        self.lock_depth += 1;
    }

    /// Returns true when a request arrived while locked and the lock is now free.
    fn unlock(&mut self) -> bool {
        debug_assert!(self.lock_depth > 0, "unlock without matching lock");
        self.lock_depth = self.lock_depth.saturating_sub(1);
        self.lock_depth == 0 && std::mem::take(&mut self.pending)
    }
}

/// A container that lays out its cells.
pub trait Layout {
    #[doc(hidden)]
    fn layout_state(&self) -> &LayoutState;

    #[doc(hidden)]
    fn layout_state_mut(&mut self) -> &mut LayoutState;

    /// Run the solver once. Callers go through [`Layout::relayout`].
    #[doc(hidden)]
    fn run_pass(&mut self) -> LayoutResult;

    /// Lay out now, unless locked (then the request is coalesced).
    fn relayout(&mut self) {
        if self.layout_state_mut().begin() {
            let result = self.run_pass();
            self.layout_state_mut().finish(result);
        }
    }

    /// Hold off relayouts until the matching [`Layout::unlock`]. Locks nest.
    fn lock(&mut self) {
        self.layout_state_mut().lock();
    }

    fn unlock(&mut self) {
        if self.layout_state_mut().unlock() {
            self.relayout();
        }
    }

    fn is_locked(&self) -> bool {
        self.layout_state().lock_depth > 0
    }

    /// The most recently published result.
    fn result(&self) -> &LayoutResult {
        &self.layout_state().result
    }

    fn preferred_size(&self, axis: Orientation) -> Option<f64> {
        *self.layout_state().preferred.get(axis)
    }

    /// Size the layout should fill along `axis`; `None` shrinks to fit.
    fn set_preferred_size(&mut self, axis: Orientation, size: Option<f64>) {
        let option = match axis {
            Orientation::Horizontal => "preferredWidth",
            Orientation::Vertical => "preferredHeight",
        };
        if size.is_some_and(|size| !check_length(option, size)) {
            return;
        }
        let slot = self.layout_state_mut().preferred.get_mut(axis);
        if *slot != size {
            *slot = size;
            self.relayout();
        }
    }

    fn layout_origin(&self) -> DVec2 {
        self.layout_state().origin
    }

    /// Point where the first line starts.
    fn set_layout_origin(&mut self, origin: DVec2) {
        if !origin.is_finite() {
            report_config_error(&ConfigError::InvalidValue {
                option: "layoutOrigin".to_string(),
                value: origin.to_string(),
            });
            return;
        }
        if self.layout_state().origin != origin {
            self.layout_state_mut().origin = origin;
            self.relayout();
        }
    }

    /// Register a callback run after every finished pass.
    fn on_layout(&mut self, listener: LayoutListener) {
        self.layout_state_mut().listeners.push(listener);
    }
}
