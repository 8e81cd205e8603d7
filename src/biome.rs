// src/biome.rs
//! Укрупнённые категории биомов
//!
//! Каждый чанк мира сводится к одной категории. Категория задаёт цвет для
//! отладочных карт, человекочитаемое имя и два флага:
//! - **essential** — для категории обязательно ищется стартовая зона (уровень 0);
//! - **boundary** — зоны категории (реки) поглощаются соседними зонами.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BiomeCategory {
    Void,
    River,
    Desert,
    Birch,
    Ocean,
    WarmOcean,
    ColdOcean,
    Mountain,
    Taiga,
    Bamboo,
    Jungle,
    Savanna,
    Badlands,
    Swamp,
    DarkForest,
    Forest,
    Beach,
    Plains,
    Mushroom,
    Snowy,
    Frozen,
}

/// Правила классификации сырых имён биомов: первое совпадение подстроки побеждает.
/// Порядок важен: `FROZEN_RIVER` — это лёд, а `WARM_OCEAN` проверяется раньше `OCEAN`.
const LABEL_RULES: &[(&[&str], BiomeCategory)] = &[
    (&["FROZEN", "ICE"], BiomeCategory::Frozen),
    (&["RIVER"], BiomeCategory::River),
    (&["MUSHROOM"], BiomeCategory::Mushroom),
    (&["DESERT"], BiomeCategory::Desert),
    (&["BIRCH"], BiomeCategory::Birch),
    (&["WARM_OCEAN"], BiomeCategory::WarmOcean),
    (&["COLD_OCEAN"], BiomeCategory::ColdOcean),
    (&["OCEAN"], BiomeCategory::Ocean),
    (&["MOUNTAIN"], BiomeCategory::Mountain),
    (&["SNOWY"], BiomeCategory::Snowy),
    (&["TAIGA"], BiomeCategory::Taiga),
    (&["BAMBOO"], BiomeCategory::Bamboo),
    (&["JUNGLE"], BiomeCategory::Jungle),
    (&["BADLANDS"], BiomeCategory::Badlands),
    (&["SAVANNA"], BiomeCategory::Savanna),
    (&["SWAMP"], BiomeCategory::Swamp),
    (&["DARK_FOREST"], BiomeCategory::DarkForest),
    (&["FOREST", "WOOD"], BiomeCategory::Forest),
    (&["BEACH", "SHORE"], BiomeCategory::Beach),
    (&["PLAINS"], BiomeCategory::Plains),
];

impl BiomeCategory {
    pub const ALL: [BiomeCategory; 21] = [
        BiomeCategory::Void,
        BiomeCategory::River,
        BiomeCategory::Desert,
        BiomeCategory::Birch,
        BiomeCategory::Ocean,
        BiomeCategory::WarmOcean,
        BiomeCategory::ColdOcean,
        BiomeCategory::Mountain,
        BiomeCategory::Taiga,
        BiomeCategory::Bamboo,
        BiomeCategory::Jungle,
        BiomeCategory::Savanna,
        BiomeCategory::Badlands,
        BiomeCategory::Swamp,
        BiomeCategory::DarkForest,
        BiomeCategory::Forest,
        BiomeCategory::Beach,
        BiomeCategory::Plains,
        BiomeCategory::Mushroom,
        BiomeCategory::Snowy,
        BiomeCategory::Frozen,
    ];

    pub fn to_rgb(&self) -> [u8; 3] {
        match self {
            BiomeCategory::Void => [0, 0, 0],
            BiomeCategory::River => [0, 0, 255],
            BiomeCategory::Desert | BiomeCategory::Beach => [255, 255, 0],
            BiomeCategory::Birch => [192, 192, 192],
            BiomeCategory::Ocean => [0, 0, 128],
            BiomeCategory::WarmOcean => [0, 0, 255],
            BiomeCategory::ColdOcean => [0, 0, 64],
            BiomeCategory::Mountain => [128, 128, 128],
            BiomeCategory::Taiga => [64, 64, 64],
            BiomeCategory::Bamboo | BiomeCategory::Jungle => [255, 200, 0],
            BiomeCategory::Savanna | BiomeCategory::Badlands => [255, 0, 0],
            BiomeCategory::Swamp => [128, 64, 0],
            BiomeCategory::DarkForest => [0, 128, 0],
            BiomeCategory::Forest => [0, 255, 0],
            BiomeCategory::Plains => [255, 175, 175],
            BiomeCategory::Mushroom => [255, 0, 255],
            BiomeCategory::Snowy => [255, 255, 255],
            BiomeCategory::Frozen => [128, 128, 255],
        }
    }

    /// Имя для игроков и операторов
    #[must_use]
    pub fn human_name(&self) -> &'static str {
        match self {
            BiomeCategory::Void => "Void",
            BiomeCategory::River => "River",
            BiomeCategory::Desert => "Desert",
            BiomeCategory::Birch => "Birch Forest",
            BiomeCategory::Ocean => "Ocean",
            BiomeCategory::WarmOcean => "Warm Ocean",
            BiomeCategory::ColdOcean => "Cold Ocean",
            BiomeCategory::Mountain => "Mountains",
            BiomeCategory::Taiga => "Taiga",
            BiomeCategory::Bamboo => "Bamboo Jungle",
            BiomeCategory::Jungle => "Jungle",
            BiomeCategory::Savanna => "Savanna",
            BiomeCategory::Badlands => "Badlands",
            BiomeCategory::Swamp => "Swamp",
            BiomeCategory::DarkForest => "Dark Forest",
            BiomeCategory::Forest => "Forest",
            BiomeCategory::Beach => "Beach",
            BiomeCategory::Plains => "Plains",
            BiomeCategory::Mushroom => "Mushroom Fields",
            BiomeCategory::Snowy => "Snowy Tundra",
            BiomeCategory::Frozen => "Frozen Lands",
        }
    }

    /// Нужна ли для категории стартовая зона
    #[must_use]
    pub fn is_essential(&self) -> bool {
        matches!(
            self,
            BiomeCategory::Forest
                | BiomeCategory::Mountain
                | BiomeCategory::DarkForest
                | BiomeCategory::Swamp
                | BiomeCategory::Taiga
                | BiomeCategory::Desert
                | BiomeCategory::Jungle
                | BiomeCategory::Bamboo
                | BiomeCategory::Savanna
                | BiomeCategory::Snowy
                | BiomeCategory::Frozen
                | BiomeCategory::Ocean
                | BiomeCategory::WarmOcean
                | BiomeCategory::Mushroom
        )
    }

    /// Граничная категория (реки): поглощается соседними зонами
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        matches!(self, BiomeCategory::River)
    }

    /// Имя варианта в стиле `DARK_FOREST`
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            BiomeCategory::Void => "VOID",
            BiomeCategory::River => "RIVER",
            BiomeCategory::Desert => "DESERT",
            BiomeCategory::Birch => "BIRCH",
            BiomeCategory::Ocean => "OCEAN",
            BiomeCategory::WarmOcean => "WARM_OCEAN",
            BiomeCategory::ColdOcean => "COLD_OCEAN",
            BiomeCategory::Mountain => "MOUNTAIN",
            BiomeCategory::Taiga => "TAIGA",
            BiomeCategory::Bamboo => "BAMBOO",
            BiomeCategory::Jungle => "JUNGLE",
            BiomeCategory::Savanna => "SAVANNA",
            BiomeCategory::Badlands => "BADLANDS",
            BiomeCategory::Swamp => "SWAMP",
            BiomeCategory::DarkForest => "DARK_FOREST",
            BiomeCategory::Forest => "FOREST",
            BiomeCategory::Beach => "BEACH",
            BiomeCategory::Plains => "PLAINS",
            BiomeCategory::Mushroom => "MUSHROOM",
            BiomeCategory::Snowy => "SNOWY",
            BiomeCategory::Frozen => "FROZEN",
        }
    }

    /// Сводит сырое имя биома (`"minecraft:old_growth_birch_forest"`,
    /// `"FROZEN_RIVER"`, …) к категории. `None` — имя не распознано.
    #[must_use]
    pub fn from_label(label: &str) -> Option<BiomeCategory> {
        let upper = label
            .rsplit(':')
            .next()
            .unwrap_or(label)
            .trim()
            .to_ascii_uppercase();
        if upper.is_empty() {
            return None;
        }
        if let Some(exact) = Self::ALL.iter().find(|c| c.key() == upper) {
            return Some(*exact);
        }
        LABEL_RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| upper.contains(n)))
            .map(|(_, category)| *category)
    }
}

impl fmt::Display for BiomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_classify_by_priority() {
        assert_eq!(
            BiomeCategory::from_label("FROZEN_RIVER"),
            Some(BiomeCategory::Frozen)
        );
        assert_eq!(
            BiomeCategory::from_label("minecraft:river"),
            Some(BiomeCategory::River)
        );
        assert_eq!(
            BiomeCategory::from_label("DEEP_OCEAN"),
            Some(BiomeCategory::Ocean)
        );
        assert_eq!(
            BiomeCategory::from_label("LUKEWARM_OCEAN"),
            Some(BiomeCategory::WarmOcean)
        );
        assert_eq!(
            BiomeCategory::from_label("WARM_OCEAN"),
            Some(BiomeCategory::WarmOcean)
        );
        assert_eq!(
            BiomeCategory::from_label("old_growth_birch_forest"),
            Some(BiomeCategory::Birch)
        );
        assert_eq!(
            BiomeCategory::from_label("DARK_FOREST"),
            Some(BiomeCategory::DarkForest)
        );
        assert_eq!(
            BiomeCategory::from_label("WOODED_BADLANDS"),
            Some(BiomeCategory::Badlands)
        );
        assert_eq!(
            BiomeCategory::from_label("STONY_SHORE"),
            Some(BiomeCategory::Beach)
        );
        assert_eq!(BiomeCategory::from_label("THE_END"), None);
        assert_eq!(BiomeCategory::from_label(""), None);
    }

    #[test]
    fn exact_keys_round_trip() {
        for category in BiomeCategory::ALL {
            assert_eq!(BiomeCategory::from_label(category.key()), Some(category));
        }
    }

    #[test]
    fn only_river_is_boundary() {
        let boundary: Vec<_> = BiomeCategory::ALL
            .iter()
            .filter(|c| c.is_boundary())
            .collect();
        assert_eq!(boundary, vec![&BiomeCategory::River]);
        assert!(!BiomeCategory::River.is_essential());
        assert!(!BiomeCategory::Void.is_essential());
        assert!(BiomeCategory::Forest.is_essential());
    }

    #[test]
    fn serde_uses_screaming_keys() {
        let json = serde_json::to_string(&BiomeCategory::DarkForest).unwrap();
        assert_eq!(json, "\"DARK_FOREST\"");
        assert_eq!(BiomeCategory::WarmOcean.to_rgb(), [0, 0, 255]);
    }
}
