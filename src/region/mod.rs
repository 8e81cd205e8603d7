// src/region/mod.rs
//! Зоны — связные группы чанков одной категории
//!
//! Зона хранит только собственный набор координат. Обратное отображение
//! «координата → зона» живёт в [`RegionIndex`], и все изменения состава зон
//! проходят через него, чтобы обе стороны оставались согласованными.

pub mod graph;
pub mod index;

pub use graph::RegionGraph;
pub use index::RegionIndex;

use crate::biome::BiomeCategory;
use crate::coord::{self, Bounds, Coord};
use std::cell::OnceCell;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

/// Внутренний дескриптор зоны на время построения.
///
/// Не путать с итоговым `id` территории, который назначается при финализации.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Region {
    handle: RegionId,
    category: BiomeCategory,
    coords: HashSet<Coord>,
    /// Кэш центра; сбрасывается при любом изменении `coords`
    center: OnceCell<Coord>,
    essential: bool,
    level: Option<u32>,
    /// Соседи на момент последнего [`RegionIndex::compute_neighbors`]
    neighbors: Vec<RegionId>,
    id: Option<u32>,
}

impl Region {
    fn new(handle: RegionId, category: BiomeCategory) -> Self {
        Self {
            handle,
            category,
            coords: HashSet::new(),
            center: OnceCell::new(),
            essential: false,
            level: None,
            neighbors: Vec::new(),
            id: None,
        }
    }

    #[must_use]
    pub fn handle(&self) -> RegionId {
        self.handle
    }

    #[must_use]
    pub fn category(&self) -> BiomeCategory {
        self.category
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.coords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        self.coords.contains(&coord)
    }

    #[must_use]
    pub fn coords(&self) -> &HashSet<Coord> {
        &self.coords
    }

    #[must_use]
    pub fn is_essential(&self) -> bool {
        self.essential
    }

    pub(crate) fn set_essential(&mut self, essential: bool) {
        self.essential = essential;
    }

    #[must_use]
    pub fn level(&self) -> Option<u32> {
        self.level
    }

    pub(crate) fn set_level(&mut self, level: Option<u32>) {
        self.level = level;
    }

    #[must_use]
    pub fn neighbors(&self) -> &[RegionId] {
        &self.neighbors
    }

    /// Итоговый идентификатор территории (после финализации)
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Option<u32>) {
        self.id = id;
    }

    /// Чанк зоны, ближайший к середине её габаритов.
    ///
    /// Всегда принадлежит зоне, даже если зона вогнутая. `None` для пустой зоны.
    pub fn center(&self) -> Option<Coord> {
        if self.coords.is_empty() {
            return None;
        }
        Some(*self.center.get_or_init(|| self.compute_center()))
    }

    fn compute_center(&self) -> Coord {
        let bounds = Bounds::of(&self.coords);
        bounds
            .and_then(|b| coord::nearest(b.midpoint(), &self.coords))
            .unwrap_or_default()
    }

    /// Чанк на краю зоны: хотя бы один из четырёх соседей не входит в зону
    #[must_use]
    pub fn is_border(&self, coord: Coord) -> bool {
        self.coords.contains(&coord) && coord.neighbors().any(|n| !self.coords.contains(&n))
    }

    pub fn border_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords.iter().copied().filter(|c| self.is_border(*c))
    }

    /// Связна ли зона по 4-соседству (пустая считается связной)
    #[must_use]
    pub fn is_connected(&self) -> bool {
        connected_components(&self.coords).len() <= 1
    }

    fn add_coord(&mut self, coord: Coord) -> bool {
        self.center.take();
        self.coords.insert(coord)
    }

    fn remove_coord(&mut self, coord: Coord) -> bool {
        self.center.take();
        self.coords.remove(&coord)
    }

    fn take_coords(&mut self) -> HashSet<Coord> {
        self.center.take();
        std::mem::take(&mut self.coords)
    }
}

/// Компоненты 4-связности набора координат.
///
/// Компоненты упорядочены по наименьшей координате, чтобы результат
/// не зависел от порядка обхода `HashSet`.
#[must_use]
pub fn connected_components(coords: &HashSet<Coord>) -> Vec<BTreeSet<Coord>> {
    let mut pool: BTreeSet<Coord> = coords.iter().copied().collect();
    let mut components = Vec::new();
    while let Some(start) = pool.pop_first() {
        let mut component = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for nbor in current.neighbors() {
                if pool.remove(&nbor) {
                    component.insert(nbor);
                    queue.push_back(nbor);
                }
            }
        }
        components.push(component);
    }
    components
}
