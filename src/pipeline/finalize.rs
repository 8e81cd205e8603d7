// src/pipeline/finalize.rs
use crate::coord::Coord;
use crate::region::{RegionId, RegionIndex};
use crate::territory::Territory;

/// Назначает зонам итоговые id начиная с 1 и снимает с них территории.
///
/// Порядок: сперва стартовые зоны, затем по возрастанию уровня, при равенстве —
/// по центру. Повторный вызов на том же индексе даёт те же id.
pub fn finalize(index: &mut RegionIndex) -> Vec<Territory> {
    let mut order: Vec<(bool, u32, Coord, RegionId)> = index
        .iter()
        .map(|r| {
            (
                !r.is_essential(),
                r.level().unwrap_or(u32::MAX),
                r.center().unwrap_or_default(),
                r.handle(),
            )
        })
        .collect();
    order.sort_unstable();

    for (id, (_, _, _, handle)) in (1..).zip(order) {
        if let Some(region) = index.get_mut(handle) {
            region.set_id(Some(id));
        }
    }

    let mut territories: Vec<Territory> = index.iter().filter_map(Territory::from_region).collect();
    territories.sort_by_key(|t| t.id);
    territories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeCategory;

    fn labeled(index: &mut RegionIndex, x: i32, essential: bool, level: u32) -> RegionId {
        let handle = index.create_with(BiomeCategory::Savanna, essential, [Coord::new(x, 0)]);
        index.get_mut(handle).unwrap().set_level(Some(level));
        handle
    }

    #[test]
    fn essential_first_then_level_then_center() {
        let mut index = RegionIndex::new();
        let deep = labeled(&mut index, 0, false, 3);
        let near_b = labeled(&mut index, 9, false, 1);
        let seed = labeled(&mut index, 20, true, 0);
        let near_a = labeled(&mut index, 5, false, 1);

        let territories = finalize(&mut index);

        let ids = |h| index.get(h).unwrap().id().unwrap();
        assert_eq!(ids(seed), 1);
        assert_eq!(ids(near_a), 2);
        assert_eq!(ids(near_b), 3);
        assert_eq!(ids(deep), 4);
        let out: Vec<u32> = territories.iter().map(|t| t.id).collect();
        assert_eq!(out, vec![1, 2, 3, 4]);
        assert_eq!(territories[0].level, 0);
        assert_eq!(territories[0].center, Coord::new(20, 0));
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut index = RegionIndex::new();
        for x in 0..6 {
            labeled(&mut index, x * 3, x == 2, (x as u32) % 3);
        }
        let first = finalize(&mut index);
        let second = finalize(&mut index);
        assert_eq!(first, second);
    }
}
