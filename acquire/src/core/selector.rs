//! Deterministic closest-object selection.

use crate::core::types::Vec3;

/// Return the valid candidate closest to `origin`.
///
/// `position_of` and `is_valid` are the per-object capabilities; ties keep the
/// first candidate encountered, so callers wanting a stable choice must supply
/// candidates in a stable order. Returns `None` for an empty or fully invalid set.
pub fn closest_by<T, I, P, V>(candidates: I, origin: Vec3, position_of: P, is_valid: V) -> Option<T>
where
    I: IntoIterator<Item = T>,
    P: Fn(&T) -> Vec3,
    V: Fn(&T) -> bool,
{
    let mut best: Option<(f64, T)> = None;
    for candidate in candidates {
        if !is_valid(&candidate) {
            continue;
        }
        let dist = position_of(&candidate).distance_squared(origin);
        match &best {
            Some((best_dist, _)) if *best_dist <= dist => {}
            _ => best = Some((dist, candidate)),
        }
    }
    best.map(|(_, candidate)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::blacklist::Blacklist;
    use crate::core::types::{EntityId, TargetSpec};
    use crate::test_support::{ScriptedWorld, item};
    use crate::world::EntityTracker;

    #[test]
    fn closest_by_picks_minimum_distance() {
        let points = vec![
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(15.0, 0.0, 0.0),
        ];
        let found = closest_by(points, Vec3::ZERO, |p| *p, |_| true);
        assert_eq!(found, Some(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn closest_by_empty_is_none() {
        let points: Vec<Vec3> = Vec::new();
        assert_eq!(closest_by(points, Vec3::ZERO, |p| *p, |_| true), None);
    }

    #[test]
    fn closest_by_ties_keep_first() {
        let points = vec![(1, Vec3::new(3.0, 0.0, 0.0)), (2, Vec3::new(-3.0, 0.0, 0.0))];
        let found = closest_by(points, Vec3::ZERO, |(_, p)| *p, |_| true);
        assert_eq!(found.map(|(id, _)| id), Some(1));
    }

    #[test]
    fn find_nearest_returns_distance_five_item() {
        let world = ScriptedWorld::new(vec![
            item(1, "x", 10.0),
            item(2, "x", 5.0),
            item(3, "x", 15.0),
        ]);
        let found = world
            .find_nearest(Vec3::ZERO, &TargetSpec::single("x", 1), &Blacklist::default())
            .expect("candidate");
        assert_eq!(found.id, EntityId(2));
    }

    #[test]
    fn find_nearest_ties_resolve_to_lowest_id() {
        let world = ScriptedWorld::new(vec![item(2, "x", 3.0), item(1, "x", -3.0)]);
        let found = world
            .find_nearest(Vec3::ZERO, &TargetSpec::single("x", 1), &Blacklist::default())
            .expect("candidate");
        assert_eq!(found.id, EntityId(1));
    }

    #[test]
    fn find_nearest_skips_dead_blacklisted_and_unmatched() {
        let mut dead = item(1, "x", 1.0);
        dead.alive = false;
        let world = ScriptedWorld::new(vec![
            dead,
            item(2, "x", 2.0),
            item(3, "y", 0.5),
            item(4, "x", 3.0),
        ]);
        let mut blacklist = Blacklist::default();
        blacklist.insert(EntityId(2));

        let found = world
            .find_nearest(Vec3::ZERO, &TargetSpec::single("x", 1), &blacklist)
            .expect("candidate");
        assert_eq!(found.id, EntityId(4));
    }

    #[test]
    fn find_nearest_without_candidates_is_none() {
        let world = ScriptedWorld::new(Vec::new());
        let found = world.find_nearest(
            Vec3::ZERO,
            &TargetSpec::single("x", 1),
            &Blacklist::default(),
        );
        assert!(found.is_none());
    }
}
