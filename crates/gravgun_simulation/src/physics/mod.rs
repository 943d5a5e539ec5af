//! Physics boundary module
//!
//! Симуляция НЕ владеет физикой: она только спрашивает (raycast, body queries)
//! и командует (impulse, constraint handle). Контракты: трейты ниже.
//!
//! Реализации:
//! - `sandbox`: headless ECS физика (SimBody + ray/sphere queries) для тестов и demo
//! - `handle`: PhysicsHandle компонент (ConstraintController поверх SimBody)

use bevy::prelude::*;

pub mod handle;
pub mod sandbox;

// Re-export основных типов
pub use handle::{drive_physics_handles, PhysicsHandle};
pub use sandbox::{
    integrate_sim_bodies, sync_velocity_to_rapier, SandboxPhysicsPlugin, SandboxScene, SandboxSettings,
    SimBody,
};

/// Результат raycast: ближайшее пересечённое тело
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Тело (generational handle: может протухнуть между тиками)
    pub body: Entity,
    /// Точка попадания (world space)
    pub point: Vec3,
    /// Расстояние от origin луча до точки попадания
    pub distance: f32,
}

/// Spatial Query Service: направленные ray queries против сцены
pub trait SpatialQuery {
    /// Ближайшее тело вдоль луча в пределах `max_distance`.
    ///
    /// Тела из `excluded` (owner и само оружие) никогда не возвращаются как hit.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        excluded: &[Entity],
    ) -> Option<RayHit>;
}

/// Доступ к rigid bodies, которыми владеет мир
///
/// Все методы терпят невалидный handle: despawned body → `false` / `None`.
pub trait RigidBodies {
    fn body_exists(&self, body: Entity) -> bool;

    /// Симулируется ли тело физикой (static/kinematic → false)
    fn is_simulating_physics(&self, body: Entity) -> bool;

    fn center_of_mass(&self, body: Entity) -> Option<Vec3>;

    /// Радиус bounding sphere
    fn bounds_radius(&self, body: Entity) -> Option<f32>;

    /// Мгновенный импульс в точке. `false` если тело не принимает импульс.
    fn apply_impulse_at(&mut self, body: Entity, impulse: Vec3, point: Vec3) -> bool;
}

/// Всё что оружию нужно от физической сцены
pub trait PhysicsScene: SpatialQuery + RigidBodies {}

impl<T: SpatialQuery + RigidBodies> PhysicsScene for T {}

/// Constraint Controller: тянет тело к target point
///
/// Smoothed mode: сходимость со скоростью `interpolation_speed`,
/// instant mode: позиция ставится напрямую.
pub trait ConstraintController {
    fn attach(&mut self, body: Entity, grab_point: Vec3);
    fn detach(&mut self);
    fn set_target_point(&mut self, point: Vec3);
    fn set_interpolation_speed(&mut self, speed: f32);
    fn set_instant_mode(&mut self, instant: bool);
    fn current_grabbed_body(&self) -> Option<Entity>;
}
