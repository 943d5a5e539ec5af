//! GRAVGUN Simulation Core
//!
//! ECS-симуляция гравипушки на Bevy 0.16 (headless)
//!
//! Слои:
//! - `weapon`: generic контракт оружия (state machine, crosshair, muzzle, cues)
//! - `gravity`: GravityManipulator (acquisition, grab/pull, push)
//! - `aim`: откуда и куда целимся (view owner'а или muzzle)
//! - `physics`: контракты физики + headless sandbox реализация
//! - `gun`: ECS слой (компоненты, intents/events, systems)

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::Velocity;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod aim;
pub mod gravity;
pub mod gun;
pub mod logger;
pub mod physics;
pub mod weapon;

// Re-export базовых типов для удобства
pub use aim::{resolve_aim, AimSample, PlayerView, ViewProjector};
pub use gravity::{ConfigError, GravityManipulator, Grab, ManipulatorConfig};
pub use gun::{
    gravity_gun_bundle, spawn_gravity_gun, GravityGun, GravityGunPlugin, WeaponActionIntent,
    WeaponActionResolved, WeaponCueEvent, WeaponLifecycleIntent, WeaponStateChanged,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{PhysicsHandle, SandboxPhysicsPlugin, SandboxSettings, SimBody};
pub use weapon::{ActionCue, ActionKind, CrosshairColorTable, Weapon, WeaponCore, WeaponState};

/// Частота simulation tick (FixedUpdate)
pub const SIMULATION_HZ: f64 = 60.0;

/// Фазы FixedUpdate: сначала оружие командует, потом физика исполняет
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Intents, actions, tick гравипушек
    Weapons,
    /// Handles, интеграция, sync
    Physics,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .configure_sets(
                FixedUpdate,
                (SimulationSet::Weapons, SimulationSet::Physics).chain(),
            )
            // Подсистемы
            .add_plugins((SandboxPhysicsPlugin, GravityGunPlugin));

        // Детерминистичный RNG (seed по умолчанию), если host не поставил свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную: один `app.update()` = ровно один FixedUpdate tick
/// (первый update только инициализирует часы).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )));

    app
}

/// Разбрасывает динамические пропы перед origin (вдоль -Z) через DeterministicRng
///
/// Один seed → одна и та же сцена. Каждый проп несёт rapier `Velocity`,
/// которую sandbox держит равной `SimBody.velocity`.
pub fn scatter_props(world: &mut World, count: usize, min_distance: f32, max_distance: f32) -> Vec<Entity> {
    world.resource_scope(|world, mut rng: Mut<DeterministicRng>| {
        (0..count)
            .map(|_| {
                let distance = rng.rng.gen_range(min_distance..max_distance);
                let lateral = rng.rng.gen_range(-0.25..0.25) * distance;
                let height = rng.rng.gen_range(-0.1..0.1) * distance;
                let radius = rng.rng.gen_range(10.0..40.0);
                let mass = rng.rng.gen_range(1.0..20.0);

                world
                    .spawn((
                        Transform::from_xyz(lateral, height, -distance),
                        SimBody::dynamic(radius, mass),
                        Velocity::default(),
                    ))
                    .id()
            })
            .collect()
    })
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия через Debug)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
