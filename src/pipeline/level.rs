// src/pipeline/level.rs
//! Разметка уровней
//!
//! Уровень зоны — число переходов через границы зон от ближайшей стартовой зоны.
//! Обход в ширину запускается сразу из всех стартовых зон (уровень 0).
//! Переход в зону «свободной» категории ничего не стоит, поэтому обход ведётся
//! по схеме 0-1 BFS: бесплатные переходы кладутся в начало очереди.
//!
//! Зоны, до которых обход не дошёл, получают уровень `max + 1`.

use crate::config::LevelSettings;
use crate::error::{Result, TerritoryError};
use crate::region::{RegionGraph, RegionId, RegionIndex};
use std::collections::{HashMap, VecDeque};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Labeler {
    graph: RegionGraph,
    policy: LevelSettings,
    queue: VecDeque<(RegionId, u32)>,
    levels: HashMap<RegionId, u32>,
    unreachable: usize,
}

impl Labeler {
    /// Пересчитывает соседей, строит граф, сбрасывает уровни и ставит в очередь стартовые зоны.
    ///
    /// Ошибка [`TerritoryError::NoEssentialRegions`], если стартовых зон нет.
    pub fn new(index: &mut RegionIndex, policy: &LevelSettings) -> Result<Self> {
        index.compute_neighbors();
        let graph = RegionGraph::from_neighbors(index);

        let mut queue = VecDeque::new();
        let mut levels = HashMap::new();
        for region in index.iter_mut() {
            if region.is_essential() {
                region.set_level(Some(0));
                levels.insert(region.handle(), 0);
                queue.push_back((region.handle(), 0));
            } else {
                region.set_level(None);
            }
        }
        if queue.is_empty() {
            return Err(TerritoryError::NoEssentialRegions);
        }

        Ok(Self {
            graph,
            policy: policy.clone(),
            queue,
            levels,
            unreachable: 0,
        })
    }

    /// Зон, до которых обход не дошёл
    #[must_use]
    pub fn unreachable(&self) -> usize {
        self.unreachable
    }

    /// Обрабатывает одну зону из очереди. `false` — обход закончен.
    pub fn step(&mut self, index: &mut RegionIndex) -> bool {
        let Some((handle, level)) = self.queue.pop_front() else {
            self.label_unreachable(index);
            return false;
        };
        if self.levels.get(&handle).is_some_and(|&best| best < level) {
            return true;
        }

        let neighbors: Vec<RegionId> = self.graph.neighbors(handle).collect();
        for nbor in neighbors {
            let Some(region) = index.get_mut(nbor) else {
                continue;
            };
            let free = self.policy.is_free(region.category());
            let next = if free { level } else { level + 1 };
            if self.levels.get(&nbor).is_some_and(|&best| best <= next) {
                continue;
            }
            self.levels.insert(nbor, next);
            region.set_level(Some(next));
            if free {
                self.queue.push_front((nbor, next));
            } else {
                self.queue.push_back((nbor, next));
            }
        }
        true
    }

    fn label_unreachable(&mut self, index: &mut RegionIndex) {
        let fallback = self.levels.values().max().map_or(0, |max| max + 1);
        for region in index.iter_mut() {
            if region.level().is_none() {
                warn!(
                    "Зона {} ({}) недостижима из стартовых зон: уровень {fallback}",
                    region.handle(),
                    region.category()
                );
                region.set_level(Some(fallback));
                self.unreachable += 1;
            }
        }
    }
}
