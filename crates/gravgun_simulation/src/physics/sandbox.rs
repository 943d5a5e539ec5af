//! Headless sandbox физика
//!
//! Минимальная замена физического движка для headless симуляции и тестов:
//! - SimBody = сфера (radius, mass, velocity)
//! - Raycast = аналитическое пересечение луча со сферами
//! - Impulse = мгновенное изменение velocity (без вращения)
//! - Integration = explicit Euler + linear damping
//!
//! Тела, у которых есть rapier `Velocity`, получают синхронизированную скорость
//! (внешний движок может подхватить их через rapier pipeline).

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

use super::{RayHit, RigidBodies, SpatialQuery};

/// Rigid body в sandbox мире (сфера)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SimBody {
    /// Линейная скорость (units/s)
    pub velocity: Vec3,
    /// Масса (импульс / масса = Δv)
    pub mass: f32,
    /// Радиус bounding sphere (и collision sphere)
    pub radius: f32,
    /// false = static/kinematic: блокирует лучи, но импульсы игнорирует
    pub simulate_physics: bool,
    /// Смещение центра масс от translation (local space)
    pub center_of_mass_offset: Vec3,
}

impl SimBody {
    /// Динамическое тело (физика включена)
    pub fn dynamic(radius: f32, mass: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass,
            radius,
            simulate_physics: true,
            center_of_mass_offset: Vec3::ZERO,
        }
    }

    /// Статическое тело (стены, пол, прикрученные пропы)
    pub fn fixed(radius: f32) -> Self {
        Self {
            simulate_physics: false,
            ..Self::dynamic(radius, 0.0)
        }
    }

    pub fn center_of_mass(&self, transform: &Transform) -> Vec3 {
        transform.translation + transform.rotation * self.center_of_mass_offset
    }
}

/// Параметры sandbox интегратора
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct SandboxSettings {
    /// Гравитация (units/s²). По умолчанию zero-g полигон.
    pub gravity: Vec3,
    /// Linear damping (1/s)
    pub linear_damping: f32,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::ZERO,
            linear_damping: 0.5,
        }
    }
}

/// SystemParam: sandbox сцена как Spatial Query Service + доступ к телам
#[derive(SystemParam)]
pub struct SandboxScene<'w, 's> {
    bodies: Query<'w, 's, (Entity, &'static Transform, &'static mut SimBody)>,
}

impl SpatialQuery for SandboxScene<'_, '_> {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        excluded: &[Entity],
    ) -> Option<RayHit> {
        let mut closest: Option<RayHit> = None;

        for (entity, transform, body) in self.bodies.iter() {
            if excluded.contains(&entity) {
                continue;
            }

            let Some(distance) = ray_sphere_distance(origin, direction, transform.translation, body.radius)
            else {
                continue;
            };

            if distance > max_distance {
                continue;
            }

            if closest.map_or(true, |hit| distance < hit.distance) {
                closest = Some(RayHit {
                    body: entity,
                    point: origin + direction.as_vec3() * distance,
                    distance,
                });
            }
        }

        closest
    }
}

impl RigidBodies for SandboxScene<'_, '_> {
    fn body_exists(&self, body: Entity) -> bool {
        self.bodies.contains(body)
    }

    fn is_simulating_physics(&self, body: Entity) -> bool {
        self.bodies
            .get(body)
            .map(|(_, _, b)| b.simulate_physics)
            .unwrap_or(false)
    }

    fn center_of_mass(&self, body: Entity) -> Option<Vec3> {
        let (_, transform, b) = self.bodies.get(body).ok()?;
        Some(b.center_of_mass(transform))
    }

    fn bounds_radius(&self, body: Entity) -> Option<f32> {
        self.bodies.get(body).ok().map(|(_, _, b)| b.radius)
    }

    fn apply_impulse_at(&mut self, body: Entity, impulse: Vec3, _point: Vec3) -> bool {
        let Ok((_, _, mut b)) = self.bodies.get_mut(body) else {
            return false;
        };

        if !b.simulate_physics || b.mass <= 0.0 {
            return false;
        }

        // Вращение не моделируем: точка приложения влияет только на внешний движок
        let delta_v = impulse / b.mass;
        b.velocity += delta_v;
        true
    }
}

/// Расстояние вдоль луча до первой точки сферы (0.0 если origin внутри)
fn ray_sphere_distance(origin: Vec3, direction: Dir3, center: Vec3, radius: f32) -> Option<f32> {
    let to_origin = origin - center;
    let b = to_origin.dot(direction.as_vec3());
    let c = to_origin.length_squared() - radius * radius;

    if c <= 0.0 {
        return Some(0.0);
    }

    // Сфера позади луча
    if b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    Some(-b - discriminant.sqrt())
}

/// Система интеграции velocity → position
///
/// Работает в FixedUpdate. Static тела не двигаются.
pub fn integrate_sim_bodies(
    mut bodies: Query<(&mut Transform, &mut SimBody)>,
    settings: Res<SandboxSettings>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let damping = (1.0 - settings.linear_damping * delta).max(0.0);

    for (mut transform, mut body) in bodies.iter_mut() {
        if !body.simulate_physics {
            continue;
        }

        body.velocity += settings.gravity * delta;
        body.velocity *= damping;
        transform.translation += body.velocity * delta;
    }
}

/// Система синхронизации SimBody.velocity → rapier Velocity
pub fn sync_velocity_to_rapier(mut query: Query<(&SimBody, &mut Velocity)>) {
    for (body, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}

/// Sandbox physics plugin (settings + integration systems)
pub struct SandboxPhysicsPlugin;

impl Plugin for SandboxPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SandboxSettings>().add_systems(
            FixedUpdate,
            (
                super::drive_physics_handles,
                integrate_sim_bodies,
                sync_velocity_to_rapier,
            )
                .chain()
                .in_set(crate::SimulationSet::Physics),
        );
    }
}
