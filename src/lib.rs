pub mod biome;
pub mod config;
pub mod coord;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod region;
pub mod synthetic;
pub mod territory;

pub use biome::BiomeCategory;
pub use config::{LevelSettings, SyntheticSettings, TerritorySettings};
pub use coord::Coord;
pub use error::{Result, TerritoryError};
pub use grid::CellGrid;
pub use pipeline::{Diagnostics, Pipeline, StageKind};
pub use region::{Region, RegionId, RegionIndex};
pub use synthetic::generate_grid;
pub use territory::{Territory, load_territories, save_territories};
