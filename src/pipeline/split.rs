// src/pipeline/split.rs
//! Разрезание крупных зон
//!
//! Зона размером от `2 × preferred_size` отдаёт часть чанков новой зоне той же категории.
//! Новая зона растёт случайным обходом от крайнего чанка по длинной оси габаритов.
//! После отрезания остаток может распасться на куски, и каждый кусок становится
//! отдельной зоной.
//!
//! Генератор случайных чисел сеется от стартового чанка, поэтому при одинаковом
//! входе разрезы совпадают от запуска к запуску.

use crate::coord::{self, Bounds, Coord};
use crate::region::{self, RegionId, RegionIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
pub struct Splitter {
    preferred: usize,
    threshold: usize,
    splits: usize,
    repaired: usize,
}

impl Splitter {
    /// `threshold` — размер, начиная с которого зона режется
    /// (см. [`TerritorySettings::split_threshold`](crate::config::TerritorySettings::split_threshold))
    #[must_use]
    pub fn new(preferred: usize, threshold: usize) -> Self {
        Self {
            preferred,
            threshold,
            splits: 0,
            repaired: 0,
        }
    }

    /// Сколько раз зоны резались
    #[must_use]
    pub fn splits(&self) -> usize {
        self.splits
    }

    /// Сколько лишних кусков появилось при восстановлении связности
    #[must_use]
    pub fn repaired(&self) -> usize {
        self.repaired
    }

    /// Режет первую (по дескриптору) слишком крупную зону. `false` — таких нет.
    pub fn step(&mut self, index: &mut RegionIndex) -> bool {
        if self.preferred == 0 || self.threshold == 0 {
            return false;
        }
        let Some(parent) = index
            .iter()
            .find(|r| r.size() >= self.threshold)
            .map(|r| r.handle())
        else {
            return false;
        };
        self.split(index, parent);
        self.splits += 1;
        true
    }

    fn split(&mut self, index: &mut RegionIndex, parent: RegionId) {
        let Some(region) = index.get(parent) else {
            return;
        };
        let category = region.category();
        let size = region.size();
        let Some(start) = Bounds::of(region.coords()).and_then(|b| {
            if b.width() >= b.depth() {
                coord::min_x(region.coords())
            } else {
                coord::min_z(region.coords())
            }
        }) else {
            return;
        };

        let target = self.preferred.min(size / 2);
        let child = index.create(category);
        let mut rng = ChaCha8Rng::seed_from_u64(start.seed());
        let mut todo: Vec<Coord> = vec![start];
        let mut taken = 0;
        while !todo.is_empty() && taken < target {
            let current = todo.swap_remove(rng.gen_range(0..todo.len()));
            if index.region_at(current) != Some(parent) {
                continue;
            }
            index.assign(current, child);
            taken += 1;
            todo.extend(current.neighbors());
        }

        self.repaired += repair_connectivity(index, parent).saturating_sub(1);
    }
}

/// Разбивает несвязную зону на компоненты; каждая становится отдельной зоной
/// с той же категорией и флагом `essential`. Возвращает число компонент.
pub fn repair_connectivity(index: &mut RegionIndex, handle: RegionId) -> usize {
    let Some(region) = index.get(handle) else {
        return 0;
    };
    let components = region::connected_components(region.coords());
    if components.len() <= 1 {
        return components.len();
    }
    let category = region.category();
    let essential = region.is_essential();
    let count = components.len();
    index.remove(handle);
    for component in components {
        index.create_with(category, essential, component);
    }
    count
}
