//! PhysicsHandle: Constraint Controller поверх sandbox тел
//!
//! Компонент живёт на entity оружия. Оружие командует (attach/target/speed),
//! `drive_physics_handles` каждый FixedUpdate тянет схваченное тело к target.

use bevy::prelude::*;

use super::{ConstraintController, SimBody};

/// Constraint handle: держит максимум одно тело
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PhysicsHandle {
    grabbed: Option<Entity>,
    target: Vec3,
    interpolation_speed: f32,
    instant: bool,
}

impl Default for PhysicsHandle {
    fn default() -> Self {
        Self {
            grabbed: None,
            target: Vec3::ZERO,
            interpolation_speed: Self::DEFAULT_INTERPOLATION_SPEED,
            instant: false,
        }
    }
}

impl PhysicsHandle {
    /// Скорость сходимости до первого `set_interpolation_speed` (1/s)
    pub const DEFAULT_INTERPOLATION_SPEED: f32 = 50.0;

    pub fn target_point(&self) -> Vec3 {
        self.target
    }

    pub fn interpolation_speed(&self) -> f32 {
        self.interpolation_speed
    }

    pub fn is_instant(&self) -> bool {
        self.instant
    }
}

impl ConstraintController for PhysicsHandle {
    fn attach(&mut self, body: Entity, grab_point: Vec3) {
        self.grabbed = Some(body);
        // Начинаем с точки захвата: тело не дёргается в первый тик
        self.target = grab_point;
    }

    fn detach(&mut self) {
        self.grabbed = None;
    }

    fn set_target_point(&mut self, point: Vec3) {
        self.target = point;
    }

    fn set_interpolation_speed(&mut self, speed: f32) {
        self.interpolation_speed = speed.max(0.0);
    }

    fn set_instant_mode(&mut self, instant: bool) {
        self.instant = instant;
    }

    fn current_grabbed_body(&self) -> Option<Entity> {
        self.grabbed
    }
}

/// Система: сходимость схваченных тел к target point
///
/// Smoothed: сдвиг на долю `interpolation_speed * dt` (clamp до 1.0).
/// Instant: центр масс ставится точно в target.
/// Скорость схваченного тела гасится: им управляет handle, не интегратор.
/// Despawned тело просто пропускается (оружие само заметит и отпустит).
pub fn drive_physics_handles(
    handles: Query<&PhysicsHandle>,
    mut bodies: Query<(&mut Transform, &mut SimBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for handle in handles.iter() {
        let Some(grabbed) = handle.grabbed else {
            continue;
        };

        let Ok((mut transform, mut body)) = bodies.get_mut(grabbed) else {
            continue;
        };

        let offset = handle.target - body.center_of_mass(&transform);
        let alpha = if handle.instant {
            1.0
        } else {
            (handle.interpolation_speed * delta).clamp(0.0, 1.0)
        };

        transform.translation += offset * alpha;
        body.velocity = Vec3::ZERO;
    }
}
