//! Aim Resolver: откуда и куда целится оружие
//!
//! Приоритет:
//! 1. View owner'а (центр viewport → world ray). Origin сдвигается вперёд на
//!    `player_muzzle_offset`, чтобы визуальный луч начинался у ствола, а не у глаза.
//! 2. Fallback: muzzle оружия ("gravity center" = muzzle + forward * muzzle_offset).
//!
//! Отсутствие view (AI владелец, оружие лежит): штатная ситуация, не ошибка.

use bevy::prelude::*;

use crate::weapon::MuzzleTransform;

/// Луч прицеливания (не хранится, считается на каждый запрос)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimSample {
    pub origin: Vec3,
    pub direction: Dir3,
}

impl AimSample {
    /// Точка на луче на расстоянии `distance` от origin
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction.as_vec3() * distance
    }
}

/// Проекция центра экрана контроллера в мир
pub trait ViewProjector {
    /// `(origin, direction)` или None если viewport недоступен
    fn deproject_viewport_center(&self) -> Option<(Vec3, Dir3)>;
}

/// Player view: камера owner'а (обновляется camera системой хоста)
///
/// `viewport: None`: контроллер без экрана (headless, AI possession).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PlayerView {
    pub eye: Vec3,
    pub rotation: Quat,
    pub viewport: Option<UVec2>,
}

impl PlayerView {
    pub fn new(eye: Vec3, rotation: Quat) -> Self {
        Self {
            eye,
            rotation,
            viewport: Some(UVec2::new(1920, 1080)),
        }
    }

    /// Камера в `eye`, смотрит на `target`
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let rotation = Transform::from_translation(eye)
            .looking_at(target, Vec3::Y)
            .rotation;
        Self::new(eye, rotation)
    }
}

impl ViewProjector for PlayerView {
    fn deproject_viewport_center(&self) -> Option<(Vec3, Dir3)> {
        let viewport = self.viewport?;
        if viewport.x == 0 || viewport.y == 0 {
            return None;
        }

        // Центр perspective viewport = forward камеры
        let direction = Dir3::new(self.rotation * Vec3::NEG_Z).ok()?;
        Some((self.eye, direction))
    }
}

/// Gravity center: точка перед muzzle, вокруг которой работает оружие
pub fn gravity_center(muzzle: &MuzzleTransform, muzzle_offset: f32) -> Vec3 {
    muzzle.location + muzzle.forward().as_vec3() * muzzle_offset
}

/// Resolve aim: view owner'а, иначе muzzle оружия
pub fn resolve_aim(
    view: Option<&dyn ViewProjector>,
    muzzle: &MuzzleTransform,
    muzzle_offset: f32,
    player_muzzle_offset: f32,
) -> AimSample {
    if let Some((eye, direction)) = view.and_then(|v| v.deproject_viewport_center()) {
        return AimSample {
            origin: eye + direction.as_vec3() * player_muzzle_offset,
            direction,
        };
    }

    // Fallback: POV оружия (может быть чуть повёрнут относительно центра экрана)
    AimSample {
        origin: gravity_center(muzzle, muzzle_offset),
        direction: muzzle.forward(),
    }
}
