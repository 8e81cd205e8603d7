// src/pipeline/merge.rs
use crate::region::{RegionId, RegionIndex};
use std::cmp::Reverse;
use tracing::{debug, warn};

/// Слияние мелких зон.
///
/// Каждый шаг берёт наименьшую зону. Если она больше порога — работа окончена.
/// Иначе зона вливается в соседа: сперва сосед той же категории, затем самый
/// крупный, затем с меньшим дескриптором. Зона без соседей удаляется вместе с чанками.
#[derive(Debug, Clone)]
pub struct Merger {
    floor: usize,
    merged: usize,
    deleted: usize,
}

impl Merger {
    #[must_use]
    pub fn new(floor: usize) -> Self {
        Self {
            floor,
            merged: 0,
            deleted: 0,
        }
    }

    #[must_use]
    pub fn merged(&self) -> usize {
        self.merged
    }

    #[must_use]
    pub fn deleted(&self) -> usize {
        self.deleted
    }

    pub fn step(&mut self, index: &mut RegionIndex) -> bool {
        let Some(small) = index.smallest() else {
            return false;
        };
        let Some(region) = index.get(small) else {
            return false;
        };
        if region.size() > self.floor {
            return false;
        }
        let category = region.category();

        match merge_target(index, small) {
            Some(target) => {
                debug!("Зона {small} ({category}) вливается в {target}");
                index.merge_into(small, target);
                self.merged += 1;
            }
            None => {
                if let Some(removed) = index.remove(small)
                    && removed.is_essential()
                {
                    warn!(
                        "Удалена изолированная стартовая зона {small} ({category}, {} чанков)",
                        removed.size()
                    );
                }
                self.deleted += 1;
            }
        }
        true
    }
}

/// Сосед, в которого вливается зона `small`
fn merge_target(index: &RegionIndex, small: RegionId) -> Option<RegionId> {
    let category = index.get(small)?.category();
    index
        .adjacent_regions(small)
        .into_iter()
        .filter_map(|handle| index.get(handle))
        .max_by_key(|r| (r.category() == category, r.size(), Reverse(r.handle())))
        .map(|r| r.handle())
}
