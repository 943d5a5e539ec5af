//! Gravity gun компоненты и события
//!
//! # Architecture
//!
//! **Intents (input/host → ECS):**
//! - `WeaponActionIntent`: нажат WeaponPrimary / WeaponSecondary
//! - `WeaponLifecycleIntent`: pick up / drop, обрабатываются в порядке прихода
//!
//! **Результаты (ECS → presentation):**
//! - `WeaponActionResolved`: fire/use анимация только при `success`
//! - `WeaponCueEvent`: звуковые cues
//! - `WeaponStateChanged`: смена state + новый цвет прицела (HUD)

use bevy::prelude::*;

use crate::gravity::GravityManipulator;
use crate::physics::{PhysicsHandle, SimBody};
use crate::weapon::{ActionCue, ActionKind, Weapon, WeaponState};

/// Радиус собственного тела оружия (sandbox sphere)
pub const GUN_BODY_RADIUS: f32 = 20.0;
/// Масса собственного тела оружия
pub const GUN_BODY_MASS: f32 = 5.0;

/// Гравипушка на entity оружия
///
/// `grip`: где оружие сидит относительно owner'а, пока его держат.
#[derive(Component, Debug, Clone)]
pub struct GravityGun {
    pub manipulator: GravityManipulator,
    pub grip: Transform,
}

impl GravityGun {
    pub fn new(manipulator: GravityManipulator) -> Self {
        Self {
            manipulator,
            grip: Transform::IDENTITY,
        }
    }

    pub fn with_grip(mut self, grip: Transform) -> Self {
        self.grip = grip;
        self
    }
}

// ============================================================================
// Intents
// ============================================================================

/// Нажатие action binding
#[derive(Event, Clone, Copy, Debug)]
pub struct WeaponActionIntent {
    pub weapon: Entity,
    pub action: ActionKind,
}

/// Lifecycle оружия
///
/// Один event на оба intent'а: pick up и drop в одном tick'е
/// применяются ровно в том порядке, в котором их прислали.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponLifecycleIntent {
    /// Подобрать оружие (`Dropped → NoTarget`)
    PickUp { weapon: Entity, owner: Entity },
    /// Бросить оружие (`* → Dropped`, удерживаемое тело отпускается)
    Drop { weapon: Entity },
}

impl WeaponLifecycleIntent {
    pub fn weapon(&self) -> Entity {
        match *self {
            Self::PickUp { weapon, .. } | Self::Drop { weapon } => weapon,
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Результат action: host играет fire анимацию только если `success`
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct WeaponActionResolved {
    pub weapon: Entity,
    pub action: ActionKind,
    pub success: bool,
}

#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct WeaponCueEvent {
    pub weapon: Entity,
    pub cue: ActionCue,
}

/// Смена state оружия (HUD перекрашивает прицел в `crosshair`)
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct WeaponStateChanged {
    pub weapon: Entity,
    pub from: WeaponState,
    pub to: WeaponState,
    pub crosshair: Color,
}

// ============================================================================
// Spawn
// ============================================================================

/// Компоненты гравипушки, сразу подобранной `owner`'ом
///
/// Собственное тело оружия не симулируется, пока его держат.
pub fn gravity_gun_bundle(
    owner: Entity,
    mut manipulator: GravityManipulator,
    grip: Transform,
) -> (GravityGun, PhysicsHandle, Transform, SimBody) {
    manipulator.pick_up(owner);

    let mut body = SimBody::dynamic(GUN_BODY_RADIUS, GUN_BODY_MASS);
    body.simulate_physics = false;

    (
        GravityGun::new(manipulator).with_grip(grip),
        PhysicsHandle::default(),
        grip,
        body,
    )
}

/// Spawn + attach при старте (аналог BeginPlay персонажа)
pub fn spawn_gravity_gun(
    commands: &mut Commands,
    owner: Entity,
    manipulator: GravityManipulator,
    grip: Transform,
) -> Entity {
    let weapon = commands
        .spawn(gravity_gun_bundle(owner, manipulator, grip))
        .id();

    crate::logger::log(&format!("Spawned gravity gun {:?} for owner {:?}", weapon, owner));
    weapon
}
