//! Gravity gun module: ECS слой поверх GravityManipulator
//!
//! # Architecture
//!
//! **Events → Systems flow:**
//! - Input/host шлёт intents (action, pick up, drop)
//! - Systems собирают WeaponContext (owner view + sandbox scene + handle)
//! - Результаты уходят events'ами в presentation (анимация, звук, HUD)
//!
//! GravityManipulator ничего не знает про ECS: всё что ему нужно
//! приходит через WeaponContext на время одного вызова.

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Re-exports
pub use components::*;
pub use systems::*;

use crate::physics::sync_velocity_to_rapier;
use crate::SimulationSet;

/// Gravity gun plugin (events + weapon systems)
pub struct GravityGunPlugin;

impl Plugin for GravityGunPlugin {
    fn build(&self, app: &mut App) {
        app
            // Events
            .add_event::<WeaponActionIntent>()
            .add_event::<WeaponLifecycleIntent>()
            .add_event::<WeaponActionResolved>()
            .add_event::<WeaponCueEvent>()
            .add_event::<WeaponStateChanged>()
            // Фаза 1: lifecycle → actions → tick (acquisition, pull)
            .add_systems(
                FixedUpdate,
                (
                    process_lifecycle_intents,
                    process_weapon_action_intents,
                    tick_gravity_guns,
                )
                    .chain()
                    .in_set(SimulationSet::Weapons),
            )
            // Фаза 2: собственное тело оружия после интеграции
            .add_systems(
                FixedUpdate,
                sync_weapon_bodies
                    .after(sync_velocity_to_rapier)
                    .in_set(SimulationSet::Physics),
            );
    }
}
