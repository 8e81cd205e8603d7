// src/pipeline/essential.rs
use crate::biome::BiomeCategory;
use crate::coord::Coord;
use crate::region::{RegionId, RegionIndex};
use std::collections::BTreeMap;
use tracing::warn;

/// Результат выбора стартовых зон
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EssentialSelection {
    /// Центр выбранной зоны для каждой обязательной категории
    pub seeds: BTreeMap<BiomeCategory, Coord>,
    /// Обязательные категории, для которых не нашлось ни одной зоны
    pub missing: Vec<BiomeCategory>,
}

/// Для каждой обязательной категории помечает одну зону как стартовую.
///
/// Предпочтение зонам размером не меньше `essential_size`; среди них (или среди
/// всех, если крупных нет) побеждает зона, чей центр ближе всего к осям мира.
/// Флаги остальных зон сбрасываются.
pub fn select_essentials(index: &mut RegionIndex, essential_size: usize) -> EssentialSelection {
    let mut chosen: BTreeMap<BiomeCategory, (bool, u32, RegionId, Coord)> = BTreeMap::new();
    for region in index.iter() {
        let category = region.category();
        if !category.is_essential() {
            continue;
        }
        let Some(center) = region.center() else {
            continue;
        };
        let candidate = (
            region.size() < essential_size,
            center.min_abs_coord(),
            region.handle(),
            center,
        );
        chosen
            .entry(category)
            .and_modify(|best| {
                if candidate < *best {
                    *best = candidate;
                }
            })
            .or_insert(candidate);
    }

    for region in index.iter_mut() {
        let selected = chosen
            .get(&region.category())
            .is_some_and(|&(_, _, handle, _)| handle == region.handle());
        region.set_essential(selected);
    }

    let missing: Vec<BiomeCategory> = BiomeCategory::ALL
        .into_iter()
        .filter(|c| c.is_essential() && !chosen.contains_key(c))
        .collect();
    for category in &missing {
        warn!("Нет ни одной зоны категории {category}: стартовая зона не выбрана");
    }

    EssentialSelection {
        seeds: chosen
            .into_iter()
            .map(|(category, (_, _, _, center))| (category, center))
            .collect(),
        missing,
    }
}
