//! Proportional distribution of leftover space.

/// One participant in [`distribute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GrowSlot {
    pub size: f64,
    pub max: f64,
    pub grow: f64,
}

impl GrowSlot {
    pub fn new(size: f64, max: f64, grow: f64) -> Self {
        Self { size, max, grow }
    }
}

/// Hand `space` out to `slots` in proportion to their grow weights without
/// pushing any slot past its maximum. Returns the space left over.
///
/// Each round either uses up the space or caps at least one slot, so the
/// loop ends after at most `slots.len() + 1` rounds.
pub(crate) fn distribute(slots: &mut [GrowSlot], mut space: f64, epsilon: f64) -> f64 {
    while space > epsilon {
        let mut total = 0.0;
        let mut limit = f64::INFINITY;
        for slot in slots.iter() {
            if slot.grow > 0.0 && slot.size < slot.max - epsilon {
                total += slot.grow;
                limit = limit.min((slot.max - slot.size) / slot.grow);
            }
        }
        if total <= 0.0 {
            break;
        }

        let step = (space / total).min(limit);
        if step <= 0.0 {
            break;
        }
        for slot in slots.iter_mut() {
            if slot.grow > 0.0 && slot.size < slot.max - epsilon {
                slot.size = (slot.size + step * slot.grow).min(slot.max);
            }
        }
        space -= step * total;
    }
    space.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-7;

    #[test]
    fn test_proportional_growth() {
        let mut slots = [
            GrowSlot::new(10.0, f64::INFINITY, 1.0),
            GrowSlot::new(10.0, f64::INFINITY, 3.0),
        ];
        let left = distribute(&mut slots, 40.0, EPSILON);
        assert!(left.abs() < 0.001);
        assert!((slots[0].size - 20.0).abs() < 0.001);
        assert!((slots[1].size - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_capped_slot_passes_space_on() {
        let mut slots = [
            GrowSlot::new(0.0, 5.0, 1.0),
            GrowSlot::new(0.0, f64::INFINITY, 1.0),
        ];
        let left = distribute(&mut slots, 30.0, EPSILON);
        assert!(left.abs() < 0.001);
        assert!((slots[0].size - 5.0).abs() < 0.001);
        assert!((slots[1].size - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_no_growth_returns_space() {
        let mut slots = [GrowSlot::new(10.0, f64::INFINITY, 0.0)];
        let left = distribute(&mut slots, 30.0, EPSILON);
        assert!((left - 30.0).abs() < 0.001);
        assert!((slots[0].size - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_all_capped_leaves_remainder() {
        let mut slots = [GrowSlot::new(10.0, 12.0, 1.0), GrowSlot::new(10.0, 11.0, 2.0)];
        let left = distribute(&mut slots, 30.0, EPSILON);
        assert!((left - 27.0).abs() < 0.001);
    }

    #[test]
    fn test_negative_space_is_ignored() {
        let mut slots = [GrowSlot::new(10.0, f64::INFINITY, 1.0)];
        assert!(distribute(&mut slots, -5.0, EPSILON).abs() < 0.001);
        assert!((slots[0].size - 10.0).abs() < 0.001);
    }
}
