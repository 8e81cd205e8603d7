// src/pipeline/mod.rs
//! Конвейер построения территорий
//!
//! Стадии выполняются строго по порядку:
//! `Init → Segmenting → AbsorbingBoundary → Splitting → SelectingEssential →
//! Merging → Labeling → Finalizing → Done`.
//!
//! Каждый вызов [`Pipeline::step`] выполняет один ограниченный шаг текущей стадии.
//! Всё промежуточное состояние стадии хранится в её контексте внутри [`Stage`],
//! поэтому конвейер можно остановить между шагами и продолжить позже.

pub mod absorb;
pub mod essential;
pub mod finalize;
pub mod level;
pub mod merge;
pub mod segment;
pub mod split;

use crate::biome::BiomeCategory;
use crate::config::TerritorySettings;
use crate::coord::Coord;
use crate::error::{Result, TerritoryError};
use crate::grid::CellGrid;
use crate::region::RegionIndex;
use crate::territory::Territory;
use absorb::Absorber;
use level::Labeler;
use merge::Merger;
use segment::Segmenter;
use split::Splitter;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Стадия конвейера без её рабочего состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    Init,
    Segmenting,
    AbsorbingBoundary,
    Splitting,
    SelectingEssential,
    Merging,
    Labeling,
    Finalizing,
    Done,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Init => "init",
            StageKind::Segmenting => "segmenting",
            StageKind::AbsorbingBoundary => "absorbing-boundary",
            StageKind::Splitting => "splitting",
            StageKind::SelectingEssential => "selecting-essential",
            StageKind::Merging => "merging",
            StageKind::Labeling => "labeling",
            StageKind::Finalizing => "finalizing",
            StageKind::Done => "done",
        };
        f.write_str(name)
    }
}

/// Стадия вместе с её контекстом
#[derive(Debug, Clone)]
pub enum Stage {
    Init(CellGrid),
    Segmenting(Segmenter),
    AbsorbingBoundary(Absorber),
    Splitting(Splitter),
    SelectingEssential,
    Merging(Merger),
    /// Разметчик создаётся первым шагом стадии; при ошибке остаётся `None`
    Labeling(Option<Labeler>),
    Finalizing,
    Done,
}

impl Stage {
    #[must_use]
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Init(_) => StageKind::Init,
            Stage::Segmenting(_) => StageKind::Segmenting,
            Stage::AbsorbingBoundary(_) => StageKind::AbsorbingBoundary,
            Stage::Splitting(_) => StageKind::Splitting,
            Stage::SelectingEssential => StageKind::SelectingEssential,
            Stage::Merging(_) => StageKind::Merging,
            Stage::Labeling(_) => StageKind::Labeling,
            Stage::Finalizing => StageKind::Finalizing,
            Stage::Done => StageKind::Done,
        }
    }
}

/// Сводка для операторов: нехватка данных и распределение категорий
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Число чанков каждой категории по текущим зонам
    pub category_counts: BTreeMap<BiomeCategory, usize>,
    pub missing_essentials: Vec<BiomeCategory>,
    pub unknown_labels: BTreeSet<String>,
}

impl Diagnostics {
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .category_counts
            .iter()
            .map(|(category, count)| format!("{category}: {count}"))
            .collect();
        if !self.missing_essentials.is_empty() {
            let names: Vec<&str> = self.missing_essentials.iter().map(|c| c.key()).collect();
            lines.push(format!("missing essential: {}", names.join(", ")));
        }
        if !self.unknown_labels.is_empty() {
            let labels: Vec<&str> = self.unknown_labels.iter().map(String::as_str).collect();
            lines.push(format!("unknown labels: {}", labels.join(", ")));
        }
        lines
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    settings: TerritorySettings,
    stage: Stage,
    index: RegionIndex,
    input_cells: usize,
    essential_seeds: BTreeMap<BiomeCategory, Coord>,
    missing_essentials: Vec<BiomeCategory>,
    unknown_labels: BTreeSet<String>,
    territories: Vec<Territory>,
}

impl Pipeline {
    #[must_use]
    pub fn new(grid: CellGrid, settings: TerritorySettings) -> Self {
        Self {
            settings,
            input_cells: grid.len(),
            unknown_labels: grid.unknown_labels.clone(),
            stage: Stage::Init(grid),
            index: RegionIndex::new(),
            essential_seeds: BTreeMap::new(),
            missing_essentials: Vec::new(),
            territories: Vec::new(),
        }
    }

    #[must_use]
    pub fn stage(&self) -> StageKind {
        self.stage.kind()
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.stage, Stage::Done)
    }

    #[must_use]
    pub fn index(&self) -> &RegionIndex {
        &self.index
    }

    #[must_use]
    pub fn settings(&self) -> &TerritorySettings {
        &self.settings
    }

    /// Центры стартовых зон по категориям (заполняется на стадии выбора)
    #[must_use]
    pub fn essential_seeds(&self) -> &BTreeMap<BiomeCategory, Coord> {
        &self.essential_seeds
    }

    /// Итоговые территории; доступны только после завершения конвейера
    pub fn territories(&self) -> Result<&[Territory]> {
        if !self.is_done() {
            return Err(TerritoryError::NotFinalized);
        }
        Ok(&self.territories)
    }

    #[must_use]
    pub fn diagnostics(&self) -> Diagnostics {
        let mut category_counts = BTreeMap::new();
        for region in self.index.iter() {
            *category_counts.entry(region.category()).or_insert(0) += region.size();
        }
        Diagnostics {
            category_counts,
            missing_essentials: self.missing_essentials.clone(),
            unknown_labels: self.unknown_labels.clone(),
        }
    }

    /// Один шаг текущей стадии. Возвращает `true`, пока конвейер не завершён.
    ///
    /// Если разметка уровней не нашла стартовых зон, возвращается
    /// [`TerritoryError::NoEssentialRegions`], а конвейер остаётся в `Labeling`.
    pub fn step(&mut self) -> Result<bool> {
        let more = match self.stage.kind() {
            StageKind::Done => return Ok(false),
            StageKind::Init => false,
            StageKind::SelectingEssential => {
                self.select_essentials();
                false
            }
            StageKind::Finalizing => {
                self.territories = finalize::finalize(&mut self.index);
                false
            }
            _ => self.step_stage()?,
        };
        if !more {
            self.advance();
        }
        Ok(!self.is_done())
    }

    /// Шаги в пределах бюджета времени; хотя бы один шаг выполняется всегда.
    /// Возвращает `true`, если работа осталась.
    pub fn run_for(&mut self, budget: Duration) -> Result<bool> {
        let started = Instant::now();
        loop {
            if !self.step()? {
                return Ok(false);
            }
            if started.elapsed() >= budget {
                return Ok(true);
            }
        }
    }

    pub fn run_to_completion(&mut self) -> Result<&[Territory]> {
        while self.step()? {}
        self.territories()
    }

    fn step_stage(&mut self) -> Result<bool> {
        let more = match &mut self.stage {
            Stage::Segmenting(segmenter) => segmenter.step(&mut self.index),
            Stage::AbsorbingBoundary(absorber) => absorber.step(&mut self.index),
            Stage::Splitting(splitter) => splitter.step(&mut self.index),
            Stage::Merging(merger) => merger.step(&mut self.index),
            Stage::Labeling(slot) => {
                if slot.is_none() {
                    *slot = Some(Labeler::new(&mut self.index, &self.settings.level)?);
                }
                slot.as_mut().is_some_and(|labeler| labeler.step(&mut self.index))
            }
            Stage::Init(_) | Stage::SelectingEssential | Stage::Finalizing | Stage::Done => false,
        };
        Ok(more)
    }

    fn select_essentials(&mut self) {
        let selection =
            essential::select_essentials(&mut self.index, self.settings.essential_size);
        for (category, center) in &selection.seeds {
            debug!("Стартовая зона {category}: {center}");
        }
        self.essential_seeds = selection.seeds;
        self.missing_essentials = selection.missing;
    }

    fn advance(&mut self) {
        let finished = std::mem::replace(&mut self.stage, Stage::Done);
        self.stage = match finished {
            Stage::Init(grid) => {
                info!("Вход: {} чанков", self.input_cells);
                Stage::Segmenting(Segmenter::new(grid))
            }
            Stage::Segmenting(segmenter) => {
                info!("Найдено {} зон", segmenter.found());
                Stage::AbsorbingBoundary(Absorber::new())
            }
            Stage::AbsorbingBoundary(absorber) => {
                info!(
                    "Поглощено {} речных чанков за {} проходов, удалено {} рек; зон: {}",
                    absorber.absorbed(),
                    absorber.passes(),
                    absorber.drained(),
                    self.index.len()
                );
                Stage::Splitting(Splitter::new(
                    self.settings.preferred_size,
                    self.settings.split_threshold(),
                ))
            }
            Stage::Splitting(splitter) => {
                info!(
                    "Разрезов: {}, восстановлено кусков: {}; зон: {}",
                    splitter.splits(),
                    splitter.repaired(),
                    self.index.len()
                );
                Stage::SelectingEssential
            }
            Stage::SelectingEssential => {
                info!("Выбрано стартовых зон: {}", self.essential_seeds.len());
                Stage::Merging(Merger::new(self.settings.merge_floor))
            }
            Stage::Merging(merger) => {
                info!(
                    "Слито {} мелких зон, удалено {}; зон: {}, чанков: {} из {}",
                    merger.merged(),
                    merger.deleted(),
                    self.index.len(),
                    self.index.cell_count(),
                    self.input_cells
                );
                Stage::Labeling(None)
            }
            Stage::Labeling(labeler) => {
                let max = self.index.iter().filter_map(|r| r.level()).max().unwrap_or(0);
                let unreachable = labeler.as_ref().map_or(0, Labeler::unreachable);
                info!("Уровни размечены: максимум {max}, недостижимых зон {unreachable}");
                Stage::Finalizing
            }
            Stage::Finalizing => {
                info!("Готово: {} территорий", self.territories.len());
                Stage::Done
            }
            Stage::Done => Stage::Done,
        };
        debug!("Стадия: {}", self.stage.kind());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn settings(preferred: usize, essential: usize, floor: usize) -> TerritorySettings {
        TerritorySettings {
            preferred_size: preferred,
            essential_size: essential,
            merge_floor: floor,
            ..TerritorySettings::default()
        }
    }

    fn block(grid: &mut CellGrid, x0: i32, z0: i32, w: i32, d: i32, category: BiomeCategory) {
        for x in x0..x0 + w {
            for z in z0..z0 + d {
                grid.insert(Coord::new(x, z), category);
            }
        }
    }

    /// Лес и пустыня, разделённые рекой шириной в один чанк, плюс океан снизу
    fn world() -> CellGrid {
        let mut grid = CellGrid::new();
        block(&mut grid, 0, 0, 30, 20, BiomeCategory::Forest);
        block(&mut grid, 30, 0, 1, 20, BiomeCategory::River);
        block(&mut grid, 31, 0, 25, 20, BiomeCategory::Desert);
        block(&mut grid, 0, 20, 56, 6, BiomeCategory::Ocean);
        grid
    }

    fn run_stage(pipeline: &mut Pipeline, kind: StageKind) {
        while pipeline.stage() == kind {
            pipeline.step().unwrap();
        }
    }

    #[test]
    fn stages_advance_in_order() {
        let mut pipeline = Pipeline::new(world(), settings(100, 10, 20));
        let mut seen = vec![pipeline.stage()];
        while pipeline.step().unwrap() {
            if seen.last() != Some(&pipeline.stage()) {
                seen.push(pipeline.stage());
            }
        }
        seen.push(pipeline.stage());
        seen.dedup();
        assert_eq!(
            seen,
            vec![
                StageKind::Init,
                StageKind::Segmenting,
                StageKind::AbsorbingBoundary,
                StageKind::Splitting,
                StageKind::SelectingEssential,
                StageKind::Merging,
                StageKind::Labeling,
                StageKind::Finalizing,
                StageKind::Done,
            ]
        );
        assert!(!pipeline.step().unwrap());
    }

    #[test]
    fn partition_holds_after_every_stage_until_merging() {
        let grid = world();
        let input: HashSet<Coord> = grid.coords().copied().collect();
        let mut pipeline = Pipeline::new(grid, settings(100, 10, 20));
        for kind in [
            StageKind::Init,
            StageKind::Segmenting,
            StageKind::AbsorbingBoundary,
            StageKind::Splitting,
            StageKind::SelectingEssential,
            StageKind::Merging,
        ] {
            run_stage(&mut pipeline, kind);
            if kind == StageKind::Init {
                continue;
            }
            let owned: HashSet<Coord> = pipeline.index().owned_coords().copied().collect();
            assert_eq!(owned, input, "after {kind}");
            assert!(pipeline.index().is_consistent(), "after {kind}");
            assert!(
                pipeline.index().iter().all(|r| r.is_connected()),
                "after {kind}"
            );
        }
    }

    #[test]
    fn rivers_disappear_and_large_regions_are_split() {
        let mut pipeline = Pipeline::new(world(), settings(100, 10, 20));
        for kind in [
            StageKind::Init,
            StageKind::Segmenting,
            StageKind::AbsorbingBoundary,
        ] {
            run_stage(&mut pipeline, kind);
        }
        assert!(
            pipeline
                .index()
                .iter()
                .all(|r| r.category() != BiomeCategory::River)
        );
        run_stage(&mut pipeline, StageKind::Splitting);
        assert!(pipeline.index().iter().all(|r| r.size() < 200));
    }

    #[test]
    fn full_run_produces_labeled_territories() {
        let mut pipeline = Pipeline::new(world(), settings(100, 10, 20));
        let territories = pipeline.run_to_completion().unwrap().to_vec();

        assert!(!territories.is_empty());
        let ids: Vec<u32> = territories.iter().map(|t| t.id).collect();
        let expected: Vec<u32> = (1..=territories.len() as u32).collect();
        assert_eq!(ids, expected);
        assert_eq!(territories[0].level, 0);

        let seeds = pipeline.essential_seeds();
        assert!(seeds.contains_key(&BiomeCategory::Forest));
        assert!(seeds.contains_key(&BiomeCategory::Desert));
        assert!(seeds.contains_key(&BiomeCategory::Ocean));

        let diagnostics = pipeline.diagnostics();
        assert!(diagnostics.missing_essentials.contains(&BiomeCategory::Jungle));
        assert!(!diagnostics.category_counts.contains_key(&BiomeCategory::River));
        let total: usize = diagnostics.category_counts.values().sum();
        assert_eq!(total, 56 * 26);
    }

    #[test]
    fn whole_pipeline_is_deterministic() {
        let run = || {
            let mut pipeline = Pipeline::new(world(), settings(60, 10, 15));
            pipeline.run_to_completion().unwrap().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn isolated_cell_is_removed_by_merging() {
        let mut grid = CellGrid::new();
        block(&mut grid, 0, 0, 3, 3, BiomeCategory::Forest);
        grid.insert(Coord::new(10, 10), BiomeCategory::Desert);
        let mut pipeline = Pipeline::new(grid, settings(1000, 1, 2));

        for kind in [
            StageKind::Init,
            StageKind::Segmenting,
            StageKind::AbsorbingBoundary,
            StageKind::Splitting,
            StageKind::SelectingEssential,
        ] {
            run_stage(&mut pipeline, kind);
        }
        assert_eq!(pipeline.index().len(), 2);

        run_stage(&mut pipeline, StageKind::Merging);
        assert_eq!(pipeline.index().len(), 1);
        assert_eq!(pipeline.index().region_at(Coord::new(10, 10)), None);
        assert_eq!(pipeline.index().iter().next().map(|r| r.size()), Some(9));
    }

    #[test]
    fn labeling_without_seeds_fails_and_stays_put() {
        let mut grid = CellGrid::new();
        block(&mut grid, 0, 0, 4, 4, BiomeCategory::Plains);
        let mut pipeline = Pipeline::new(grid, settings(1000, 1, 0));

        let err = loop {
            match pipeline.step() {
                Ok(true) => {}
                Ok(false) => panic!("pipeline finished without seeds"),
                Err(err) => break err,
            }
        };
        assert!(matches!(err, TerritoryError::NoEssentialRegions));
        assert_eq!(pipeline.stage(), StageKind::Labeling);
        assert!(pipeline.index().iter().all(|r| r.id().is_none()));
        assert!(matches!(
            pipeline.territories(),
            Err(TerritoryError::NotFinalized)
        ));
        assert!(pipeline.step().is_err());
    }

    #[test]
    fn run_for_always_makes_progress() {
        let mut pipeline = Pipeline::new(world(), settings(100, 10, 20));
        assert!(pipeline.run_for(Duration::ZERO).unwrap());
        assert_eq!(pipeline.stage(), StageKind::Segmenting);
        while pipeline.run_for(Duration::from_millis(1)).unwrap() {}
        assert!(pipeline.is_done());
        assert!(pipeline.territories().is_ok());
    }

    #[test]
    fn cells_at_i32_edges_run_through() {
        let grid = CellGrid::parse_biomes(
            "2147483647,0,FOREST:5\n\
             2147483646,0,FOREST:5\n\
             -2147483648,-2147483648,DESERT\n",
        )
        .unwrap();
        let mut pipeline = Pipeline::new(grid, settings(1000, 1, 0));
        let territories = pipeline.run_to_completion().unwrap().to_vec();

        assert_eq!(territories.len(), 2);
        let forest = territories
            .iter()
            .find(|t| t.biome == BiomeCategory::Forest)
            .unwrap();
        assert_eq!(forest.chunk_count(), 2);
        assert_eq!(forest.center, Coord::new(i32::MAX - 1, 0));
        assert!(territories.iter().all(|t| t.level == 0));
    }

    #[test]
    fn negative_strip_center_rounds_toward_zero() {
        let mut grid = CellGrid::new();
        block(&mut grid, -3, 0, 4, 1, BiomeCategory::Forest);
        let mut pipeline = Pipeline::new(grid, settings(1000, 1, 0));
        let territories = pipeline.run_to_completion().unwrap();

        assert_eq!(territories.len(), 1);
        assert_eq!(territories[0].center, Coord::new(-1, 0));
        assert_eq!(territories[0].file_name(), "territory.1.-1.0.forest.json");
        assert_eq!(pipeline.essential_seeds().get(&BiomeCategory::Forest), Some(&Coord::new(-1, 0)));
    }

    #[test]
    fn summary_lines_report_gaps() {
        let diagnostics = Diagnostics {
            category_counts: BTreeMap::from([(BiomeCategory::Forest, 12)]),
            missing_essentials: vec![BiomeCategory::Jungle, BiomeCategory::Swamp],
            unknown_labels: BTreeSet::from(["weird_biome".to_string()]),
        };
        assert_eq!(
            diagnostics.summary_lines(),
            vec![
                "FOREST: 12".to_string(),
                "missing essential: JUNGLE, SWAMP".to_string(),
                "unknown labels: weird_biome".to_string(),
            ]
        );
    }
}
