// src/region/index.rs
//! Индекс зон: две согласованные карты `RegionId → Region` и `Coord → RegionId`
//!
//! Каждая операция, меняющая состав зоны, обновляет обе карты сразу.
//! Пустые зоны индекс сам не удаляет — это решает вызывающая стадия.

use super::{Region, RegionId};
use crate::biome::BiomeCategory;
use crate::coord::Coord;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    regions: BTreeMap<RegionId, Region>,
    owners: HashMap<Coord, RegionId>,
    next_handle: u32,
}

impl RegionIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Создаёт пустую зону
    pub fn create(&mut self, category: BiomeCategory) -> RegionId {
        let handle = RegionId(self.next_handle);
        self.next_handle += 1;
        self.regions.insert(handle, Region::new(handle, category));
        handle
    }

    /// Создаёт зону и переносит в неё координаты (от прежних владельцев, если они были)
    pub fn create_with(
        &mut self,
        category: BiomeCategory,
        essential: bool,
        coords: impl IntoIterator<Item = Coord>,
    ) -> RegionId {
        let handle = self.create(category);
        if let Some(region) = self.regions.get_mut(&handle) {
            region.set_essential(essential);
        }
        for coord in coords {
            self.assign(coord, handle);
        }
        handle
    }

    /// Переносит координату в зону `to`. Возвращает прежнего владельца.
    ///
    /// Ничего не делает, если зоны `to` нет в индексе.
    pub fn assign(&mut self, coord: Coord, to: RegionId) -> Option<RegionId> {
        if !self.regions.contains_key(&to) {
            return None;
        }
        let previous = self.owners.insert(coord, to);
        if let Some(prev) = previous
            && prev != to
            && let Some(old) = self.regions.get_mut(&prev)
        {
            old.remove_coord(coord);
        }
        if let Some(region) = self.regions.get_mut(&to) {
            region.add_coord(coord);
        }
        previous
    }

    /// Удаляет зону вместе с её координатами
    pub fn remove(&mut self, handle: RegionId) -> Option<Region> {
        let region = self.regions.remove(&handle)?;
        for coord in region.coords() {
            if self.owners.get(coord) == Some(&handle) {
                self.owners.remove(coord);
            }
        }
        Some(region)
    }

    /// Вливает зону `from` в `into`; флаг `essential` объединяется по ИЛИ
    pub fn merge_into(&mut self, from: RegionId, into: RegionId) -> bool {
        if from == into || !self.regions.contains_key(&into) {
            return false;
        }
        let Some(mut small) = self.regions.remove(&from) else {
            return false;
        };
        let coords = small.take_coords();
        if let Some(target) = self.regions.get_mut(&into) {
            target.set_essential(target.is_essential() || small.is_essential());
            for coord in coords {
                target.add_coord(coord);
                self.owners.insert(coord, into);
            }
        }
        true
    }

    #[must_use]
    pub fn region_at(&self, coord: Coord) -> Option<RegionId> {
        self.owners.get(&coord).copied()
    }

    #[must_use]
    pub fn get(&self, handle: RegionId) -> Option<&Region> {
        self.regions.get(&handle)
    }

    pub(crate) fn get_mut(&mut self, handle: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(&handle)
    }

    #[must_use]
    pub fn contains(&self, handle: RegionId) -> bool {
        self.regions.contains_key(&handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Зоны в порядке дескрипторов
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Region> {
        self.regions.values_mut()
    }

    pub fn handles(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.keys().copied()
    }

    /// Число чанков, принадлежащих хоть какой-то зоне
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.owners.len()
    }

    pub fn owned_coords(&self) -> impl Iterator<Item = &Coord> {
        self.owners.keys()
    }

    /// Зоны, граничащие с `handle` по 4-соседству
    #[must_use]
    pub fn adjacent_regions(&self, handle: RegionId) -> BTreeSet<RegionId> {
        let mut result = BTreeSet::new();
        let Some(region) = self.regions.get(&handle) else {
            return result;
        };
        for border in region.border_coords() {
            for nbor in border.neighbors() {
                if let Some(other) = self.owners.get(&nbor)
                    && *other != handle
                {
                    result.insert(*other);
                }
            }
        }
        result
    }

    /// Пересчитывает списки соседей всех зон по текущему индексу
    pub fn compute_neighbors(&mut self) {
        let handles: Vec<RegionId> = self.regions.keys().copied().collect();
        for handle in handles {
            let neighbors: Vec<RegionId> = self.adjacent_regions(handle).into_iter().collect();
            if let Some(region) = self.regions.get_mut(&handle) {
                region.neighbors = neighbors;
            }
        }
    }

    /// Наименьшая зона; при равенстве — с меньшим дескриптором
    #[must_use]
    pub fn smallest(&self) -> Option<RegionId> {
        self.regions
            .values()
            .min_by_key(|r| (r.size(), r.handle()))
            .map(Region::handle)
    }

    /// Проверка согласованности обеих карт (для тестов и отладки)
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let total: usize = self.regions.values().map(Region::size).sum();
        total == self.owners.len()
            && self.regions.values().all(|r| {
                r.coords()
                    .iter()
                    .all(|c| self.owners.get(c) == Some(&r.handle()))
            })
    }
}
