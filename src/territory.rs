// src/territory.rs
//! Итоговые территории и их сохранение
//!
//! Территория — неизменяемый снимок зоны после финализации. На диск каждая
//! территория пишется отдельным JSON-файлом `territory.{id}.{x}.{z}.{name}.json`.

use crate::biome::BiomeCategory;
use crate::coord::Coord;
use crate::error::{Result, TerritoryError};
use crate::region::Region;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Territory {
    pub id: u32,
    pub level: u32,
    pub center: Coord,
    pub name: String,
    pub biome: BiomeCategory,
    /// Чанки плоским списком `[x0, z0, x1, z1, …]`, отсортированы по координате
    pub chunks: Vec<i32>,
}

impl Territory {
    /// Снимок финализированной зоны. `None`, если у зоны нет id или она пуста.
    #[must_use]
    pub fn from_region(region: &Region) -> Option<Self> {
        let id = region.id()?;
        let center = region.center()?;
        let mut coords: Vec<Coord> = region.coords().iter().copied().collect();
        coords.sort_unstable();
        Some(Self {
            id,
            level: region.level().unwrap_or(0),
            center,
            name: region.category().human_name().to_string(),
            biome: region.category(),
            chunks: coords.iter().flat_map(|c| [c.x, c.z]).collect(),
        })
    }

    /// Имя для файла: нижний регистр, без пробелов, `/` и `.`
    #[must_use]
    pub fn simple_name(&self) -> String {
        self.name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/' && *c != '.')
            .flat_map(char::to_lowercase)
            .collect()
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "territory.{}.{}.{}.{}.json",
            self.id,
            self.center.x,
            self.center.z,
            self.simple_name()
        )
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len() / 2
    }

    #[must_use]
    pub fn chunk(&self, i: usize) -> Option<Coord> {
        let x = *self.chunks.get(i * 2)?;
        let z = *self.chunks.get(i * 2 + 1)?;
        Some(Coord::new(x, z))
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.chunks.chunks_exact(2).map(|p| Coord::new(p[0], p[1]))
    }
}

/// Пишет каждую территорию в свой файл внутри `dir` (каталог создаётся при необходимости)
pub fn save_territories(dir: impl AsRef<Path>, territories: &[Territory]) -> Result<usize> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| TerritoryError::io(dir, e))?;
    for territory in territories {
        let path = dir.join(territory.file_name());
        let json = serde_json::to_string_pretty(territory)?;
        fs::write(&path, json).map_err(|e| TerritoryError::io(&path, e))?;
    }
    info!("Сохранено {} территорий в {}", territories.len(), dir.display());
    Ok(territories.len())
}

/// Читает все `territory.*.json` из `dir`, упорядочивая по id
pub fn load_territories(dir: impl AsRef<Path>) -> Result<Vec<Territory>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| TerritoryError::io(dir, e))?;
    let mut territories = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| TerritoryError::io(dir, e))?.path();
        let is_territory = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("territory.") && n.ends_with(".json"));
        if !is_territory {
            continue;
        }
        let contents = fs::read_to_string(&path).map_err(|e| TerritoryError::io(&path, e))?;
        territories.push(serde_json::from_str::<Territory>(&contents)?);
    }
    territories.sort_by_key(|t| t.id);
    Ok(territories)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: u32) -> Territory {
        Territory {
            id,
            level: 2,
            center: Coord::new(-3, 7),
            name: "Dark Forest".to_string(),
            biome: BiomeCategory::DarkForest,
            chunks: vec![-3, 7, -2, 7],
        }
    }

    #[test]
    fn file_name_uses_id_center_and_simple_name() {
        assert_eq!(sample(12).file_name(), "territory.12.-3.7.darkforest.json");
    }

    #[test]
    fn chunk_accessors() {
        let t = sample(1);
        assert_eq!(t.chunk_count(), 2);
        assert_eq!(t.chunk(1), Some(Coord::new(-2, 7)));
        assert_eq!(t.chunk(2), None);
        assert_eq!(t.coords().count(), 2);
    }

    #[test]
    fn biome_serializes_as_key() {
        let json = serde_json::to_string(&sample(1)).unwrap();
        assert!(json.contains("\"DARK_FOREST\""));
    }

    #[test]
    fn save_then_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("territories");
        let saved = save_territories(&out, &[sample(2), sample(1)]).unwrap();
        assert_eq!(saved, 2);
        std::fs::write(out.join("notes.txt"), "skip me").unwrap();

        let loaded = load_territories(&out).unwrap();
        assert_eq!(loaded, vec![sample(1), sample(2)]);
    }

    #[test]
    fn load_from_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_territories(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, TerritoryError::Io { .. }));
    }
}
