// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests over the pure resolvers.

use std::collections::HashSet;

use kurbo::BezPath;
use proptest::prelude::*;
use understory_path_layout::{
    Extents, Keyframes, PathSampler, ScrollMode, apply_delta, distance_to, resolve_visible,
};

fn line(length: u32) -> Keyframes {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((f64::from(length), 0.0));
    Keyframes::from_path(&path).unwrap()
}

fn mode() -> impl Strategy<Value = ScrollMode> {
    prop_oneof![
        Just(ScrollMode::Normal),
        Just(ScrollMode::Overflow),
        Just(ScrollMode::Loop),
    ]
}

proptest! {
    #[test]
    fn loop_visible_indices_stay_in_domain(
        item_count in 2_usize..200,
        spacing in 1_u32..200,
        path_length in 10_u32..2000,
        position in 0.0001_f64..=1.0,
    ) {
        let extents = Extents::new(item_count, spacing, path_length);
        prop_assume!(extents.loop_eligible());
        let sampler = line(path_length);
        prop_assert_eq!(sampler.length(), path_length);

        // Reachable loop offsets lie in (-path_length, items_total_length].
        let path = f64::from(path_length);
        let total = extents.items_total_length() as f64;
        let offset = -path + position * (total + path);

        let set = resolve_visible(&sampler, offset, &extents, ScrollMode::Loop);
        let mut seen = HashSet::new();
        for item in set.items() {
            prop_assert!(item.index < item_count);
            prop_assert!((0.0..1.0).contains(&item.fraction));
            prop_assert!(sampler.sample(item.fraction).is_some());
            prop_assert!(seen.insert(item.index), "index {} repeated", item.index);
        }
    }

    #[test]
    fn zero_delta_never_moves_the_offset(
        item_count in 0_usize..100,
        spacing in 1_u32..200,
        path_length in 1_u32..2000,
        delta in -5000.0_f64..5000.0,
        mode in mode(),
    ) {
        let extents = Extents::new(item_count, spacing, path_length);
        let offset = apply_delta(0.0, delta, mode, &extents);
        prop_assert_eq!(apply_delta(offset, 0.0, mode, &extents), offset);
    }

    #[test]
    fn distance_round_trips_onto_selection(
        item_count in 2_usize..200,
        spacing in 1_u32..100,
        path_length in 50_u32..1000,
        target_seed in any::<usize>(),
        selection in 0.0_f64..0.99,
    ) {
        let extents = Extents::new(item_count, spacing, path_length);
        let sampler = line(path_length);
        let target = target_seed % item_count;

        let before = resolve_visible(&sampler, 0.0, &extents, ScrollMode::Overflow);
        let distance = distance_to(target, &before, selection, 0.0, &extents, false);
        let offset = apply_delta(0.0, distance, ScrollMode::Overflow, &extents);

        let after = resolve_visible(&sampler, offset, &extents, ScrollMode::Overflow);
        let item = after.get(target);
        prop_assert!(item.is_some(), "item {} not on the path at {}", target, offset);
        let fraction = item.map_or(f64::NAN, |item| item.fraction);
        prop_assert!((fraction - selection).abs() < 1e-9);
    }

    #[test]
    fn full_strip_of_forward_deltas_lands_one_spacing_back(
        spacing in 1_u32..50,
        path_factor in 2_u32..=8,
        start_seed in 0_u32..400,
        steps in prop::collection::vec(1_u32..40, 1..400),
    ) {
        // Ten items loop whenever the path is at most eight spacings long.
        let extents = Extents::new(10, spacing, spacing * path_factor);
        prop_assert!(extents.loop_eligible());
        let total = extents.items_total_length();
        // Start past zero so the strip crosses the wrap point exactly once.
        let start = f64::from(1 + start_seed % u32::try_from(total - 1).unwrap());

        // Split exactly `total` into the generated chunk sizes.
        let mut remaining = total;
        let mut offset = start;
        for step in steps {
            if remaining == 0 {
                break;
            }
            let step = i64::from(step).min(remaining);
            remaining -= step;
            offset = apply_delta(offset, step as f64, ScrollMode::Loop, &extents);
        }
        if remaining > 0 {
            offset = apply_delta(offset, remaining as f64, ScrollMode::Loop, &extents);
        }
        prop_assert_eq!(offset, start - f64::from(spacing));
    }
}
