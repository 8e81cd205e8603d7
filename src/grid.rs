// src/grid.rs
//! Сетка чанков с категориями биомов — вход конвейера
//!
//! ## Формат `biomes.txt`
//! Одна строка на чанк:
//! ```text
//! x,z,LABEL[:count],LABEL[:count],...
//! 1,-2,TAIGA:40,RIVER:3,FROZEN_TAIGA:13
//! ```
//! - Река среди меток побеждает всегда: территории режутся по рекам.
//! - Иначе побеждает метка с наибольшим счётчиком (без счётчиков — первая).
//! - Нераспознанные метки пропускаются и попадают в диагностику.
//! - Пустые строки и строки с `#` игнорируются.

use crate::biome::BiomeCategory;
use crate::coord::{Bounds, Coord};
use crate::error::{Result, TerritoryError};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    cells: HashMap<Coord, BiomeCategory>,
    /// Метки, которые не удалось свести к категории
    pub unknown_labels: BTreeSet<String>,
}

impl CellGrid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coord: Coord, category: BiomeCategory) {
        self.cells.insert(coord, category);
    }

    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<BiomeCategory> {
        self.cells.get(&coord).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = &Coord> {
        self.cells.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, BiomeCategory)> + '_ {
        self.cells.iter().map(|(c, b)| (*c, *b))
    }

    /// Габариты заполненной области
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(self.cells.keys())
    }

    /// Количество чанков каждой категории
    #[must_use]
    pub fn category_counts(&self) -> BTreeMap<BiomeCategory, usize> {
        let mut counts = BTreeMap::new();
        for category in self.cells.values() {
            *counts.entry(*category).or_insert(0) += 1;
        }
        counts
    }

    /// Загружает сетку из файла `biomes.txt`
    pub fn from_biomes_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| TerritoryError::io(path, e))?;
        let grid = Self::parse_biomes(&contents)?;
        info!(
            "Загружено {} чанков из {}",
            grid.len(),
            path.display()
        );
        Ok(grid)
    }

    /// Разбирает содержимое `biomes.txt`
    pub fn parse_biomes(contents: &str) -> Result<Self> {
        let mut grid = Self::new();
        for (i, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (coord, category) = parse_line(line, i + 1, &mut grid.unknown_labels)?;
            grid.insert(coord, category);
        }
        for label in &grid.unknown_labels {
            warn!("Неизвестная группа биомов: {label}");
        }
        Ok(grid)
    }
}

impl FromIterator<(Coord, BiomeCategory)> for CellGrid {
    fn from_iter<I: IntoIterator<Item = (Coord, BiomeCategory)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
            unknown_labels: BTreeSet::new(),
        }
    }
}

fn malformed(line: usize, reason: impl Into<String>) -> TerritoryError {
    TerritoryError::MalformedRecord {
        line,
        reason: reason.into(),
    }
}

fn parse_line(
    line: &str,
    line_no: usize,
    unknown: &mut BTreeSet<String>,
) -> Result<(Coord, BiomeCategory)> {
    let toks: Vec<&str> = line.split(',').map(str::trim).collect();
    if toks.len() < 3 {
        return Err(malformed(line_no, format!("expected x,z,biome..., got {} fields", toks.len())));
    }
    let x: i32 = toks[0]
        .parse()
        .map_err(|_| malformed(line_no, format!("bad x coordinate {:?}", toks[0])))?;
    let z: i32 = toks[1]
        .parse()
        .map_err(|_| malformed(line_no, format!("bad z coordinate {:?}", toks[1])))?;

    let mut is_river = false;
    let mut main: Option<(BiomeCategory, u32)> = None;
    for field in &toks[2..] {
        let (name, count) = match field.split_once(':') {
            Some((name, number)) => {
                let count: u32 = number
                    .parse()
                    .map_err(|_| malformed(line_no, format!("bad biome count {number:?}")))?;
                (name, count)
            }
            None => (*field, 0),
        };
        let Some(category) = BiomeCategory::from_label(name) else {
            unknown.insert(name.to_string());
            continue;
        };
        if category.is_boundary() {
            is_river = true;
        }
        // Строго больше: при равенстве остаётся первая метка
        if main.is_none_or(|(_, max)| count > max) {
            main = Some((category, count));
        }
    }

    let category = if is_river {
        BiomeCategory::River
    } else {
        main.map_or(BiomeCategory::Void, |(c, _)| c)
    };
    Ok((Coord::new(x, z), category))
}
