// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll distance needed to bring an item onto the selection point.

use crate::{Extents, VisibleSet};

/// Signed scroll delta that moves logical `target` onto `selection_fraction`.
///
/// If `target` is on the path the distance is measured directly from its
/// current fraction. Otherwise it is measured from the item's strip position
/// `target * spacing`. When `looping`, the visible item closest to the
/// selection point is used to count forward steps to `target` modulo the item
/// count; if that forward walk is shorter than the plain index difference, the
/// delta targets the wrapped position `closest + steps` instead.
///
/// `target` must be below `extents.item_count`.
#[must_use]
pub fn distance_to(
    target: usize,
    visible: &VisibleSet,
    selection_fraction: f64,
    offset: f64,
    extents: &Extents,
    looping: bool,
) -> f64 {
    let path = extents.path_i64() as f64;
    if let Some(item) = visible.get(target) {
        return path * item.fraction - path * selection_fraction;
    }

    let count = extents.count();
    let mut position = i64::try_from(target).unwrap_or(i64::MAX);
    if let Some(closest) = visible.closest_to(selection_fraction) {
        let closest = i64::try_from(closest.index).unwrap_or(i64::MAX);
        let mut steps = (position - closest).rem_euclid(count.max(1));
        if steps == 0 {
            steps = count;
        }
        if looping && steps < (closest - position).abs() {
            tracing::trace!(index = target, closest, steps, "scrolling forward across the wrap");
            position = closest + steps;
        }
    }
    position as f64 * extents.spacing_i64() as f64 - offset - path * selection_fraction
}

#[cfg(test)]
mod tests {
    use kurbo::BezPath;

    use super::distance_to;
    use crate::{Extents, Keyframes, ScrollMode, apply_delta, resolve_visible};

    const EXTENTS: Extents = Extents::new(10, 100, 500);

    fn line() -> Keyframes {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((500.0, 0.0));
        Keyframes::from_path(&path).unwrap()
    }

    #[test]
    fn visible_target_moves_by_fraction_gap() {
        let path = line();
        let set = resolve_visible(&path, 0.0, &EXTENTS, ScrollMode::Normal);
        // Item 4 sits at 0.8; the selection point is 0.5, so 150 units.
        let d = distance_to(4, &set, 0.5, 0.0, &EXTENTS, false);
        assert!((d - 150.0).abs() < 1e-9);
    }

    #[test]
    fn offscreen_target_uses_strip_position() {
        let path = line();
        let set = resolve_visible(&path, 0.0, &EXTENTS, ScrollMode::Normal);
        let d = distance_to(8, &set, 0.5, 0.0, &EXTENTS, false);
        assert!((d - 550.0).abs() < 1e-9);
    }

    #[test]
    fn round_trip_lands_on_selection() {
        let path = line();
        let extents = Extents::new(30, 100, 500);
        let mut offset = 0.0;
        for target in [3_usize, 17, 9, 25] {
            let set = resolve_visible(&path, offset, &extents, ScrollMode::Normal);
            let d = distance_to(target, &set, 0.5, offset, &extents, false);
            offset = apply_delta(offset, d, ScrollMode::Normal, &extents);
            let after = resolve_visible(&path, offset, &extents, ScrollMode::Normal);
            let item = after.get(target).unwrap();
            assert!((item.fraction - 0.5).abs() < 1e-9, "target {target}");
        }
    }

    #[test]
    fn loop_prefers_forward_wrap_when_shorter() {
        let path = line();
        // At offset 500 items 5..=9 are on the path, item 7 at 0.4.
        let set = resolve_visible(&path, 500.0, &EXTENTS, ScrollMode::Loop);
        assert_eq!(set.closest_to(0.4).unwrap().index, 7);

        // 7 to 1 is 4 steps forward across the wrap versus 6 back.
        let d = distance_to(1, &set, 0.4, 500.0, &EXTENTS, true);
        assert!((d - (1100.0 - 500.0 - 200.0)).abs() < 1e-9);

        // Without looping it walks back to index 1.
        let d = distance_to(1, &set, 0.4, 500.0, &EXTENTS, false);
        assert!((d - (100.0 - 500.0 - 200.0)).abs() < 1e-9);
    }

    #[test]
    fn loop_forward_target_lands_on_selection() {
        let path = line();
        let mut offset = 500.0;
        let set = resolve_visible(&path, offset, &EXTENTS, ScrollMode::Loop);
        let d = distance_to(1, &set, 0.4, offset, &EXTENTS, true);
        offset = apply_delta(offset, d, ScrollMode::Loop, &EXTENTS);
        let after = resolve_visible(&path, offset, &EXTENTS, ScrollMode::Loop);
        let item = after.get(1).unwrap();
        assert!((item.fraction - 0.4).abs() < 1e-9);
    }
}
