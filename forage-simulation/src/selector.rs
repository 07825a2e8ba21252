use forage_core::Arena;
use ordered_float::OrderedFloat;

use crate::cabbage::Cabbage;
use crate::goat::Goat;
use crate::CabbageId;

/// Finds the closest cabbage a goat may claim.
///
/// Linear scan in arena order skipping reserved and depleted cabbages. Exact
/// distance ties go to the cabbage seen first.
pub fn find_nearest_unreserved(goat: &Goat, cabbages: &Arena<Cabbage>) -> Option<CabbageId> {
    cabbages
        .iter()
        .filter(|(_, cabbage)| cabbage.is_available())
        .min_by_key(|(_, cabbage)| OrderedFloat(goat.position.distance_squared(cabbage.position())))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goat::GoatAttributes;
    use glam::Vec2;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn goat() -> Goat {
        Goat::new(Vec2::ZERO, GoatAttributes::default(), &mut SmallRng::seed_from_u64(0))
    }

    #[test]
    fn empty_arena_yields_nothing() {
        assert_eq!(find_nearest_unreserved(&goat(), &Arena::new()), None);
    }

    #[test]
    fn picks_minimum_distance() {
        let mut cabbages = Arena::new();
        cabbages.insert(Cabbage::new(Vec2::new(50.0, 0.0), 10.0));
        let near = cabbages.insert(Cabbage::new(Vec2::new(0.0, 30.0), 10.0));
        cabbages.insert(Cabbage::new(Vec2::new(40.0, 40.0), 10.0));

        assert_eq!(find_nearest_unreserved(&goat(), &cabbages), Some(near));
    }

    #[test]
    fn skips_reserved_and_breaks_ties_by_order() {
        let mut cabbages = Arena::new();
        cabbages.insert(Cabbage::new(Vec2::new(5.0, 0.0), 10.0));
        let first_tie = cabbages.insert(Cabbage::new(Vec2::new(3.0, 0.0), 10.0));
        let second_tie = cabbages.insert(Cabbage::new(Vec2::new(0.0, 3.0), 10.0));

        assert_eq!(find_nearest_unreserved(&goat(), &cabbages), Some(first_tie));

        cabbages.get_mut(second_tie).unwrap().reserve();
        assert_eq!(find_nearest_unreserved(&goat(), &cabbages), Some(first_tie));

        cabbages.get_mut(first_tie).unwrap().reserve();
        cabbages.get_mut(second_tie).unwrap().release();
        assert_eq!(find_nearest_unreserved(&goat(), &cabbages), Some(second_tie));
    }

    #[test]
    fn all_reserved_yields_nothing() {
        let mut cabbages = Arena::new();
        for x in [1.0, 2.0, 3.0] {
            let id = cabbages.insert(Cabbage::new(Vec2::new(x, 0.0), 10.0));
            cabbages.get_mut(id).unwrap().reserve();
        }
        assert_eq!(find_nearest_unreserved(&goat(), &cabbages), None);
    }

    #[test]
    fn never_returns_depleted_cabbage() {
        let mut cabbages = Arena::new();
        cabbages.insert(Cabbage::new(Vec2::new(1.0, 0.0), 0.0));
        let live = cabbages.insert(Cabbage::new(Vec2::new(90.0, 0.0), 10.0));
        assert_eq!(find_nearest_unreserved(&goat(), &cabbages), Some(live));
    }
}
