// src/config.rs
//! Конфигурация построения территорий
//!
//! Этот модуль определяет параметры, управляющие разбиением мира на территории:
//! - Размеры зон для разрезания, слияния и выбора стартовых зон
//! - Политику разметки уровней (категории с нулевой стоимостью прохода)
//! - Бюджет времени на один такт планировщика
//! - Параметры синтетической сетки для демонстраций
//!
//! Все структуры читаются из TOML; отсутствующие поля получают значения по умолчанию.

use crate::biome::BiomeCategory;
use crate::error::{Result, TerritoryError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Политика разметки уровней
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LevelSettings {
    /// Категории с нулевой стоимостью прохода: зона такой категории получает
    /// уровень той зоны, из которой до неё дошли (открытая вода не становится барьером).
    #[serde(default)]
    pub free_categories: Vec<BiomeCategory>,
}

impl LevelSettings {
    #[must_use]
    pub fn is_free(&self, category: BiomeCategory) -> bool {
        self.free_categories.contains(&category)
    }
}

/// Параметры синтетической сетки биомов
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntheticSettings {
    /// Сид шума (детерминированная генерация)
    #[serde(default)]
    pub seed: u64,

    /// Ширина в чанках
    #[serde(default = "default_synthetic_width")]
    pub width: u32,

    /// Высота в чанках
    #[serde(default = "default_synthetic_height")]
    pub height: u32,

    /// Базовая частота шума (меньше — крупнее биомы)
    #[serde(default = "default_frequency")]
    pub frequency: f32,

    /// Полуширина полосы рек в единицах шума (0 — без рек)
    #[serde(default = "default_river_width")]
    pub river_width: f32,
}

fn default_synthetic_width() -> u32 {
    256
}
fn default_synthetic_height() -> u32 {
    256
}
fn default_frequency() -> f32 {
    0.02
}
fn default_river_width() -> f32 {
    0.02
}

impl Default for SyntheticSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 256,
            height: 256,
            frequency: 0.02,
            river_width: 0.02,
        }
    }
}

/// Основные параметры построения территорий
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerritorySettings {
    /// Желаемый размер зоны в чанках. Зоны от `2 × preferred_size` разрезаются.
    #[serde(default = "default_preferred_size")]
    pub preferred_size: usize,

    /// Минимальный размер, при котором зона предпочтительна как стартовая
    #[serde(default = "default_essential_size")]
    pub essential_size: usize,

    /// Зоны не больше этого размера вливаются в соседей
    #[serde(default = "default_merge_floor")]
    pub merge_floor: usize,

    /// Бюджет одного такта планировщика в миллисекундах
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,

    /// Фильтр логов по умолчанию (перекрывается `RUST_LOG`)
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub level: LevelSettings,

    #[serde(default)]
    pub synthetic: SyntheticSettings,
}

impl TerritorySettings {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// preferred_size = 800
    /// merge_floor = 300
    ///
    /// [level]
    /// free_categories = ["OCEAN", "WARM_OCEAN", "COLD_OCEAN"]
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| TerritoryError::io(path, e))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Порог разрезания: зона размером от этого значения делится
    #[must_use]
    pub fn split_threshold(&self) -> usize {
        self.preferred_size.saturating_mul(2)
    }

    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}

fn default_preferred_size() -> usize {
    1000
}
fn default_essential_size() -> usize {
    100
}
fn default_merge_floor() -> usize {
    500
}
fn default_tick_millis() -> u64 {
    50
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TerritorySettings {
    fn default() -> Self {
        Self {
            preferred_size: 1000,
            essential_size: 100,
            merge_floor: 500,
            tick_millis: 50,
            log_filter: "info".to_string(),
            level: LevelSettings::default(),
            synthetic: SyntheticSettings::default(),
        }
    }
}
