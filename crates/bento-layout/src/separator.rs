//! Separator visibility.
//!
//! A separator is shown only when it sits between two runs of visible
//! content. The rule reads nothing but content visibility, so applying it to
//! its own output changes nothing.

/// What the rule needs to know about one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparatorSlot {
    pub is_separator: bool,
    /// For content: visible with valid bounds. Ignored for separators.
    pub visible: bool,
}

impl SeparatorSlot {
    pub fn content(visible: bool) -> Self {
        Self {
            is_separator: false,
            visible,
        }
    }

    pub fn separator() -> Self {
        Self {
            is_separator: true,
            visible: true,
        }
    }
}

/// Decide which separators should be visible.
///
/// Returns one entry per slot: `Some(visible)` for separators, `None` for
/// content.
pub fn separator_visibility(slots: &[SeparatorSlot]) -> Vec<Option<bool>> {
    let mut result: Vec<Option<bool>> = slots
        .iter()
        .map(|slot| slot.is_separator.then_some(false))
        .collect();

    let Some(first) = slots
        .iter()
        .position(|slot| !slot.is_separator && slot.visible)
    else {
        return result;
    };

    let mut seen_content = false;
    for index in (first + 1..slots.len()).rev() {
        let slot = &slots[index];
        if slot.is_separator {
            result[index] = Some(seen_content);
            seen_content = false;
        } else if slot.visible {
            seen_content = true;
        }
    }
    result
}
