// src/synthetic.rs
//! Синтетическая сетка биомов для демонстраций и CLI без реального мира
//!
//! Три поля шума (высота, температура, влажность) сводятся к категории чанка.
//! Реки — тонкая полоса вдоль изолинии высоты, поэтому они вьются по суше
//! и граничат с соседними биомами с обеих сторон.

use crate::biome::BiomeCategory;
use crate::config::SyntheticSettings;
use crate::coord::Coord;
use crate::grid::CellGrid;
use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

/// Высота изолинии, вдоль которой прокладываются реки
const RIVER_LEVEL: f32 = 0.25;

fn fbm(seed: u64, frequency: f32, octaves: i32) -> FastNoiseLite {
    let mut noise = FastNoiseLite::new();
    noise.set_seed(Some(seed as i32));
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_fractal_type(Some(FractalType::FBm));
    noise.set_fractal_octaves(Some(octaves));
    noise.set_frequency(Some(frequency));
    noise
}

/// Строит сетку `width × height` чанков с началом в (0, 0)
#[must_use]
pub fn generate_grid(settings: &SyntheticSettings) -> CellGrid {
    let elevation = fbm(settings.seed, settings.frequency, 5);
    let temperature = fbm(settings.seed.wrapping_add(500), settings.frequency * 0.5, 3);
    let moisture = fbm(settings.seed.wrapping_add(1000), settings.frequency * 0.7, 3);

    let width = settings.width as usize;
    let total = width * settings.height as usize;

    let sample = |i: usize| {
        let x = (i % width) as i32;
        let z = (i / width) as i32;
        let (fx, fz) = (x as f32, z as f32);
        let e = elevation.get_noise_2d(fx, fz);
        let t = unit(temperature.get_noise_2d(fx, fz));
        let m = unit(moisture.get_noise_2d(fx, fz));
        (Coord::new(x, z), classify(e, t, m, settings.river_width))
    };

    #[cfg(feature = "parallel")]
    let cells: Vec<(Coord, BiomeCategory)> = (0..total).into_par_iter().map(sample).collect();
    #[cfg(not(feature = "parallel"))]
    let cells: Vec<(Coord, BiomeCategory)> = (0..total).map(sample).collect();

    let grid: CellGrid = cells.into_iter().collect();
    info!(
        "Синтетическая сетка {}×{} (seed {}): {} категорий",
        settings.width,
        settings.height,
        settings.seed,
        grid.category_counts().len()
    );
    grid
}

fn unit(value: f32) -> f32 {
    ((value + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// Категория по высоте `e` (−1..1), температуре `t` и влажности `m` (0..1)
fn classify(e: f32, t: f32, m: f32, river_width: f32) -> BiomeCategory {
    if e < -0.3 {
        return if t < 0.35 {
            BiomeCategory::ColdOcean
        } else if t > 0.65 {
            BiomeCategory::WarmOcean
        } else {
            BiomeCategory::Ocean
        };
    }
    if e < -0.22 {
        return BiomeCategory::Beach;
    }
    if river_width > 0.0 && (e - RIVER_LEVEL).abs() < river_width {
        return BiomeCategory::River;
    }
    if e > 0.55 {
        return if t < 0.4 { BiomeCategory::Snowy } else { BiomeCategory::Mountain };
    }

    match t {
        t if t < 0.25 => BiomeCategory::Frozen,
        t if t < 0.35 => {
            if m < 0.5 {
                BiomeCategory::Snowy
            } else {
                BiomeCategory::Taiga
            }
        }
        t if t < 0.5 => match m {
            m if m < 0.35 => BiomeCategory::Plains,
            m if m < 0.5 => BiomeCategory::Birch,
            m if m < 0.65 => BiomeCategory::Forest,
            _ => BiomeCategory::DarkForest,
        },
        t if t < 0.65 => match m {
            m if m < 0.35 => BiomeCategory::Plains,
            m if m < 0.55 => BiomeCategory::Forest,
            m if m < 0.75 => BiomeCategory::Swamp,
            _ => BiomeCategory::Mushroom,
        },
        _ => match m {
            m if m < 0.3 => BiomeCategory::Desert,
            m if m < 0.4 => BiomeCategory::Badlands,
            m if m < 0.5 => BiomeCategory::Savanna,
            m if m < 0.62 => BiomeCategory::Jungle,
            _ => BiomeCategory::Bamboo,
        },
    }
}
