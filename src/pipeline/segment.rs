// src/pipeline/segment.rs
use crate::coord::Coord;
use crate::grid::CellGrid;
use crate::region::RegionIndex;
use std::collections::{BTreeSet, VecDeque};

/// Поиск зон заливкой: каждая зона — максимальная 4-связная группа чанков одной категории.
///
/// Один шаг находит ровно одну зону. Разбиение не зависит от порядка выбора опорных чанков.
#[derive(Debug, Clone)]
pub struct Segmenter {
    grid: CellGrid,
    pool: BTreeSet<Coord>,
    found: usize,
}

impl Segmenter {
    #[must_use]
    pub fn new(grid: CellGrid) -> Self {
        let pool = grid.coords().copied().collect();
        Self {
            grid,
            pool,
            found: 0,
        }
    }

    /// Чанков, ещё не попавших ни в одну зону
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    #[must_use]
    pub fn found(&self) -> usize {
        self.found
    }

    /// Выделяет следующую зону. `false` — пул исчерпан.
    pub fn step(&mut self, index: &mut RegionIndex) -> bool {
        let Some(pivot) = self.pool.pop_first() else {
            return false;
        };
        let Some(category) = self.grid.get(pivot) else {
            return true;
        };

        let mut cells = vec![pivot];
        let mut queue = VecDeque::from([pivot]);
        while let Some(current) = queue.pop_front() {
            for nbor in current.neighbors() {
                if self.grid.get(nbor) == Some(category) && self.pool.remove(&nbor) {
                    cells.push(nbor);
                    queue.push_back(nbor);
                }
            }
        }

        index.create_with(category, false, cells);
        self.found += 1;
        true
    }
}
