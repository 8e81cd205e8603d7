// src/error.rs
//! Ошибки генерации территорий

use std::path::PathBuf;

/// Ошибки, прерывающие загрузку данных или работу конвейера
#[derive(Debug, thiserror::Error)]
pub enum TerritoryError {
    /// Не удалось прочитать или записать файл
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Некорректный TOML в файле настроек
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Ошибка (де)сериализации территории
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Строка входного файла биомов имеет неверный формат
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Разметка уровней запущена без единой стартовой зоны
    #[error("no essential regions to label levels from")]
    NoEssentialRegions,

    /// Территории запрошены до завершения конвейера
    #[error("pipeline has not been finalized yet")]
    NotFinalized,
}

impl TerritoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TerritoryError>;
