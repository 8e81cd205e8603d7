// src/coord.rs
//! Координаты чанков и операции над их наборами

use serde::{Deserialize, Serialize};
use std::fmt;

/// Смещения к 4-связным соседям
pub const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Координата одного чанка на плоскости (вертикальная ось игнорируется)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub z: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Сдвиг; `None`, если результат выходит за пределы `i32`
    #[must_use]
    pub fn checked_add(self, dx: i32, dz: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.z.checked_add(dz)?))
    }

    /// Соседи в фиксированном порядке: восток, юг, запад, север.
    /// На краю диапазона `i32` несуществующие соседи пропускаются.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        DIRECTIONS
            .into_iter()
            .filter_map(move |(dx, dz)| self.checked_add(dx, dz))
    }

    /// Манхэттенское расстояние (с насыщением)
    #[must_use]
    pub fn distance_sum(self, other: Coord) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.z.abs_diff(other.z))
    }

    /// Меньшая из абсолютных координат: близость к осям мира
    #[must_use]
    pub fn min_abs_coord(self) -> u32 {
        self.x.unsigned_abs().min(self.z.unsigned_abs())
    }

    /// Детерминированный хеш координаты для засева генератора.
    ///
    /// Не зависит от `RandomState`, поэтому одинаков между запусками.
    #[must_use]
    pub fn seed(self) -> u64 {
        let packed = (u64::from(self.x as u32) << 32) | u64::from(self.z as u32);
        // splitmix64
        let mut h = packed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        h ^ (h >> 31)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

/// Ограничивающий прямоугольник набора координат
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Coord,
    pub max: Coord,
}

impl Bounds {
    /// `None` для пустого набора
    pub fn of<'a>(coords: impl IntoIterator<Item = &'a Coord>) -> Option<Self> {
        let mut iter = coords.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(
            Self {
                min: first,
                max: first,
            },
            |b, c| Self {
                min: Coord::new(b.min.x.min(c.x), b.min.z.min(c.z)),
                max: Coord::new(b.max.x.max(c.x), b.max.z.max(c.z)),
            },
        ))
    }

    /// Ширина (по X)
    #[must_use]
    pub fn width(&self) -> u32 {
        self.max.x.abs_diff(self.min.x).saturating_add(1)
    }

    /// Глубина (по Z)
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.max.z.abs_diff(self.min.z).saturating_add(1)
    }

    /// Середина прямоугольника, округление к нулю: для `-3..=0` это `-1`
    #[must_use]
    pub fn midpoint(&self) -> Coord {
        Coord::new(
            half_sum(self.min.x, self.max.x),
            half_sum(self.min.z, self.max.z),
        )
    }
}

fn half_sum(a: i32, b: i32) -> i32 {
    // Полусумма лежит между a и b, поэтому обратно в i32 помещается
    ((i64::from(a) + i64::from(b)) / 2) as i32
}

/// Самая западная координата; при равенстве — самая северная
pub fn min_x<'a>(coords: impl IntoIterator<Item = &'a Coord>) -> Option<Coord> {
    coords.into_iter().copied().min_by_key(|c| (c.x, c.z))
}

/// Самая северная координата; при равенстве — самая западная
pub fn min_z<'a>(coords: impl IntoIterator<Item = &'a Coord>) -> Option<Coord> {
    coords.into_iter().copied().min_by_key(|c| (c.z, c.x))
}

/// Ближайшая к `pivot` координата набора (манхэттенская метрика).
///
/// Равные расстояния разрешаются по порядку координат.
pub fn nearest<'a>(pivot: Coord, coords: impl IntoIterator<Item = &'a Coord>) -> Option<Coord> {
    coords
        .into_iter()
        .copied()
        .min_by_key(|c| (pivot.distance_sum(*c), *c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_are_four_connected() {
        let c = Coord::new(3, -2);
        let all: Vec<Coord> = c.neighbors().collect();
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|n| c.distance_sum(*n) == 1));
        assert_eq!(c.checked_add(1, 1), Some(Coord::new(4, -1)));
    }

    #[test]
    fn neighbors_stop_at_i32_edge() {
        let corner = Coord::new(i32::MAX, i32::MIN);
        let all: Vec<Coord> = corner.neighbors().collect();
        assert_eq!(
            all,
            vec![Coord::new(i32::MAX, i32::MIN + 1), Coord::new(i32::MAX - 1, i32::MIN)]
        );
        assert_eq!(corner.checked_add(1, 0), None);
    }

    #[test]
    fn midpoint_rounds_toward_zero() {
        let strip = [Coord::new(-3, 0), Coord::new(0, 0)];
        assert_eq!(Bounds::of(&strip).unwrap().midpoint(), Coord::new(-1, 0));
        let positive = [Coord::new(0, 1), Coord::new(3, 4)];
        assert_eq!(Bounds::of(&positive).unwrap().midpoint(), Coord::new(1, 2));
    }

    #[test]
    fn extreme_span_does_not_overflow() {
        let span = [Coord::new(i32::MIN, i32::MAX), Coord::new(i32::MAX, i32::MAX - 1)];
        let b = Bounds::of(&span).unwrap();
        assert_eq!(b.midpoint(), Coord::new(0, i32::MAX - 1));
        assert_eq!(b.width(), u32::MAX);
        assert_eq!(Coord::new(i32::MIN, 0).distance_sum(Coord::new(i32::MAX, i32::MAX)), u32::MAX);
    }

    #[test]
    fn bounds_and_midpoint() {
        let coords = [Coord::new(-3, 1), Coord::new(2, 4), Coord::new(0, -1)];
        let b = Bounds::of(&coords).unwrap();
        assert_eq!(b.width(), 6);
        assert_eq!(b.depth(), 6);
        assert_eq!(b.midpoint(), Coord::new(0, 1));
        assert!(Bounds::of(&Vec::<Coord>::new()).is_none());
    }

    #[test]
    fn extreme_picks_break_ties_on_other_axis() {
        let coords = [Coord::new(0, 5), Coord::new(0, 2), Coord::new(1, 0)];
        assert_eq!(min_x(&coords), Some(Coord::new(0, 2)));
        assert_eq!(min_z(&coords), Some(Coord::new(1, 0)));
    }

    #[test]
    fn nearest_uses_manhattan_distance() {
        let coords = [Coord::new(5, 5), Coord::new(1, 0), Coord::new(0, 1)];
        assert_eq!(nearest(Coord::new(0, 0), &coords), Some(Coord::new(0, 1)));
    }

    #[test]
    fn seed_is_stable_and_spreads() {
        let a = Coord::new(10, -4);
        assert_eq!(a.seed(), Coord::new(10, -4).seed());
        assert_ne!(a.seed(), Coord::new(-4, 10).seed());
    }

    #[test]
    fn min_abs_coord_picks_smaller_axis() {
        assert_eq!(Coord::new(-7, 3).min_abs_coord(), 3);
        assert_eq!(Coord::new(0, -100).min_abs_coord(), 0);
    }
}
