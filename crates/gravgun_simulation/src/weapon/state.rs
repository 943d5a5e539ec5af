//! Weapon state + crosshair цвета по состоянию

use bevy::prelude::*;
use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Состояние оружия (ровно одно активно)
///
/// Ядро само двигает только `NoTarget` ↔ `HasTarget` (tick) и `Dropped`
/// (pick_up/drop). `Reloading`, `OutOfAmmo`, `Holstered`: зарезервированы,
/// выставляются снаружи.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum WeaponState {
    /// Нет подходящей цели в reach
    #[default]
    NoTarget,
    /// Прицел на physics-simulated теле в reach
    HasTarget,
    Reloading,
    OutOfAmmo,
    /// Лежит в мире без владельца
    Dropped,
    Holstered,
}

impl WeaponState {
    /// Состояния, которые двигает acquisition в tick
    pub fn is_targeting(self) -> bool {
        matches!(self, WeaponState::NoTarget | WeaponState::HasTarget)
    }

    /// Extension points: только внешнее присваивание
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            WeaponState::Reloading | WeaponState::OutOfAmmo | WeaponState::Holstered
        )
    }
}

/// Таблица WeaponState → цвет прицела
///
/// Lookup для состояния без записи даёт `fallback` (прозрачный), не ошибку.
#[derive(Debug, Clone)]
pub struct CrosshairColorTable {
    colors: HashMap<WeaponState, Color>,
    fallback: Color,
}

impl CrosshairColorTable {
    /// Пустая таблица: всё прозрачное
    pub fn empty() -> Self {
        Self {
            colors: HashMap::new(),
            fallback: Color::NONE,
        }
    }

    pub fn with(mut self, state: WeaponState, color: Color) -> Self {
        self.colors.insert(state, color);
        self
    }

    pub fn color_for(&self, state: WeaponState) -> Color {
        self.colors.get(&state).copied().unwrap_or(self.fallback)
    }
}

impl Default for CrosshairColorTable {
    /// NoTarget: белый (HUD default), HasTarget: зелёный, Dropped: прозрачный
    fn default() -> Self {
        Self::empty()
            .with(WeaponState::NoTarget, Color::WHITE)
            .with(WeaponState::HasTarget, Color::srgb(0.2, 1.0, 0.2))
            .with(WeaponState::Dropped, Color::NONE)
    }
}
