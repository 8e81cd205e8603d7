// src/pipeline/absorb.rs
use crate::coord::Coord;
use crate::region::{RegionId, RegionIndex};
use std::collections::{BTreeSet, VecDeque};

/// Поглощение рек: каждая обычная зона забирает речные чанки, примыкающие к её краю.
///
/// Проходы повторяются, пока хоть один чанк переходит из реки в соседнюю зону.
/// Один шаг обрабатывает одну обычную зону текущего прохода.
/// Реки без обычных соседей так и остаются — это допустимый итог.
#[derive(Debug, Clone, Default)]
pub struct Absorber {
    queue: VecDeque<RegionId>,
    changed: bool,
    started: bool,
    passes: usize,
    absorbed: usize,
    drained: usize,
}

impl Absorber {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Сколько чанков перешло из рек в обычные зоны
    #[must_use]
    pub fn absorbed(&self) -> usize {
        self.absorbed
    }

    /// Сколько речных зон опустело и удалено
    #[must_use]
    pub fn drained(&self) -> usize {
        self.drained
    }

    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn step(&mut self, index: &mut RegionIndex) -> bool {
        if self.queue.is_empty() {
            if self.started && !self.changed {
                return false;
            }
            self.queue = index
                .iter()
                .filter(|r| !r.category().is_boundary())
                .map(|r| r.handle())
                .collect();
            self.started = true;
            self.changed = false;
            self.passes += 1;
            if self.queue.is_empty() {
                return false;
            }
        }

        let Some(handle) = self.queue.pop_front() else {
            return false;
        };
        let Some(region) = index.get(handle) else {
            return true;
        };

        // Снимок края до изменений: за проход зона растёт на одно кольцо
        let mut taken: BTreeSet<Coord> = BTreeSet::new();
        for border in region.border_coords() {
            for nbor in border.neighbors() {
                if let Some(owner) = index.region_at(nbor)
                    && owner != handle
                    && index.get(owner).is_some_and(|o| o.category().is_boundary())
                {
                    taken.insert(nbor);
                }
            }
        }

        for coord in taken {
            if let Some(river) = index.assign(coord, handle) {
                self.absorbed += 1;
                self.changed = true;
                if index.get(river).is_some_and(|r| r.is_empty()) {
                    index.remove(river);
                    self.drained += 1;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeCategory;
    use std::collections::HashSet;

    fn run(index: &mut RegionIndex) -> Absorber {
        let mut absorber = Absorber::new();
        while absorber.step(index) {}
        absorber
    }

    #[test]
    fn river_between_two_banks_is_fully_absorbed() {
        let mut index = RegionIndex::new();
        // Лес x=0..2, река x=2..5 (три чанка в ширину), равнина x=5..7; высота 3
        let column = |x0: i32, x1: i32| {
            (x0..x1).flat_map(|x| (0..3).map(move |z| Coord::new(x, z)))
        };
        let forest = index.create_with(BiomeCategory::Forest, false, column(0, 2));
        let river = index.create_with(BiomeCategory::River, false, column(2, 5));
        let plains = index.create_with(BiomeCategory::Plains, false, column(5, 7));
        let before: HashSet<Coord> = index.owned_coords().copied().collect();

        let absorber = run(&mut index);

        assert!(!index.contains(river));
        assert_eq!(absorber.absorbed(), 9);
        assert_eq!(absorber.drained(), 1);
        assert_eq!(index.len(), 2);
        let total = index.get(forest).unwrap().size() + index.get(plains).unwrap().size();
        assert_eq!(total, 21);
        let after: HashSet<Coord> = index.owned_coords().copied().collect();
        assert_eq!(before, after);
        assert!(index.is_consistent());
    }

    #[test]
    fn long_river_needs_several_passes() {
        let mut index = RegionIndex::new();
        index.create_with(BiomeCategory::Desert, false, [Coord::new(0, 0)]);
        index.create_with(
            BiomeCategory::River,
            false,
            (1..6).map(|x| Coord::new(x, 0)),
        );
        let absorber = run(&mut index);
        assert_eq!(index.len(), 1);
        assert_eq!(absorber.absorbed(), 5);
        assert!(absorber.passes() >= 5);
    }

    #[test]
    fn boundary_only_input_terminates_with_rivers_left() {
        let mut index = RegionIndex::new();
        index.create_with(
            BiomeCategory::River,
            false,
            (0..4).map(|x| Coord::new(x, 0)),
        );
        let absorber = run(&mut index);
        assert_eq!(index.len(), 1);
        assert_eq!(absorber.absorbed(), 0);
    }
}
