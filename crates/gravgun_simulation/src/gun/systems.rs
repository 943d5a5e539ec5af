//! Gravity gun systems
//!
//! # Systems (FixedUpdate, SimulationSet::Weapons, chained)
//! - `process_lifecycle_intents`: lifecycle (pick_up/drop) в порядке прихода
//! - `process_weapon_action_intents`: primary/secondary actions
//! - `tick_gravity_guns`: acquisition + pull удерживаемого тела
//!
//! # Systems (FixedUpdate, SimulationSet::Physics)
//! - `sync_weapon_bodies`: собственное тело оружия (simulate flag, follow owner)

use bevy::prelude::*;

use crate::aim::{PlayerView, ViewProjector};
use crate::gravity::GravityManipulator;
use crate::logger::{log, log_warning};
use crate::physics::{PhysicsHandle, SandboxScene, SimBody};
use crate::weapon::{ActionKind, CueBuffer, Weapon, WeaponContext, WeaponState};

use super::components::*;

/// Собирает WeaponContext на один вызов и возвращает результат + cues
///
/// View берётся у owner'а (если он есть и у него есть PlayerView).
/// `weapon`: собственное тело оружия, raycast'ы его пропускают.
fn run_in_context<R>(
    gun: &mut GravityGun,
    handle: &mut PhysicsHandle,
    weapon: Entity,
    transform: Transform,
    views: &Query<&PlayerView>,
    scene: &mut SandboxScene<'_, '_>,
    call: impl FnOnce(&mut GravityManipulator, &mut WeaponContext<'_>) -> R,
) -> (R, CueBuffer) {
    let view = gun
        .manipulator
        .core()
        .owner()
        .and_then(|owner| views.get(owner).ok());

    let mut cues = CueBuffer::default();
    let mut ctx = WeaponContext {
        transform,
        weapon: Some(weapon),
        view: view.map(|v| v as &dyn ViewProjector),
        scene,
        handle,
        feedback: &mut cues,
    };

    let result = call(&mut gun.manipulator, &mut ctx);
    (result, cues)
}

/// Сливает cues + смену state в events
fn publish(
    weapon: Entity,
    from: WeaponState,
    gun: &GravityGun,
    mut cues: CueBuffer,
    cue_events: &mut EventWriter<WeaponCueEvent>,
    state_events: &mut EventWriter<WeaponStateChanged>,
) {
    for cue in cues.drain() {
        cue_events.write(WeaponCueEvent { weapon, cue });
    }

    let to = gun.manipulator.state();
    if to != from {
        state_events.write(WeaponStateChanged {
            weapon,
            from,
            to,
            crosshair: gun.manipulator.crosshair_color(),
        });
    }
}

/// Process pick up / drop intents
///
/// Intents применяются строго в порядке прихода: drop + pick up в одном
/// tick'е оставляет оружие в руках, pick up + drop оставляет его брошенным.
pub fn process_lifecycle_intents(
    mut intents: EventReader<WeaponLifecycleIntent>,
    mut guns: Query<(&mut GravityGun, &mut PhysicsHandle, &Transform)>,
    views: Query<&PlayerView>,
    mut scene: SandboxScene,
    mut cue_events: EventWriter<WeaponCueEvent>,
    mut state_events: EventWriter<WeaponStateChanged>,
) {
    for intent in intents.read() {
        let weapon = intent.weapon();
        let Ok((mut gun, mut handle, transform)) = guns.get_mut(weapon) else {
            log_warning(&format!("{:?}: {:?} is not a gravity gun", intent, weapon));
            continue;
        };

        let from = gun.manipulator.state();
        let cues = match *intent {
            WeaponLifecycleIntent::Drop { .. } => {
                let ((), cues) = run_in_context(&mut gun, &mut handle, weapon, *transform, &views, &mut scene, |gun, ctx| {
                    gun.drop(ctx)
                });
                cues
            }
            WeaponLifecycleIntent::PickUp { owner, .. } => {
                gun.manipulator.pick_up(owner);
                log(&format!("Weapon {:?} picked up by {:?}", weapon, owner));
                CueBuffer::default()
            }
        };
        publish(weapon, from, &gun, cues, &mut cue_events, &mut state_events);
    }
}

/// Process weapon action intents (WeaponPrimary / WeaponSecondary)
///
/// Брошенное оружие (без owner'а) не стреляет: resolved с `success = false`.
pub fn process_weapon_action_intents(
    mut intents: EventReader<WeaponActionIntent>,
    mut guns: Query<(&mut GravityGun, &mut PhysicsHandle, &Transform)>,
    views: Query<&PlayerView>,
    mut scene: SandboxScene,
    mut resolved: EventWriter<WeaponActionResolved>,
    mut cue_events: EventWriter<WeaponCueEvent>,
    mut state_events: EventWriter<WeaponStateChanged>,
) {
    for intent in intents.read() {
        let Ok((mut gun, mut handle, transform)) = guns.get_mut(intent.weapon) else {
            log_warning(&format!("WeaponActionIntent: {:?} is not a gravity gun", intent.weapon));
            continue;
        };

        if gun.manipulator.state() == WeaponState::Dropped {
            log_warning(&format!(
                "WeaponActionIntent: {:?} ignored ({:?} on dropped weapon)",
                intent.weapon, intent.action
            ));
            resolved.write(WeaponActionResolved {
                weapon: intent.weapon,
                action: intent.action,
                success: false,
            });
            continue;
        }

        let from = gun.manipulator.state();
        let (success, cues) = run_in_context(&mut gun, &mut handle, intent.weapon, *transform, &views, &mut scene, |gun, ctx| {
            match intent.action {
                ActionKind::Primary => gun.primary_action(ctx),
                ActionKind::Secondary => gun.secondary_action(ctx),
            }
        });

        resolved.write(WeaponActionResolved {
            weapon: intent.weapon,
            action: intent.action,
            success,
        });
        publish(intent.weapon, from, &gun, cues, &mut cue_events, &mut state_events);
    }
}

/// Per-tick update всех гравипушек (acquisition → state, pull)
pub fn tick_gravity_guns(
    mut guns: Query<(Entity, &mut GravityGun, &mut PhysicsHandle, &Transform)>,
    views: Query<&PlayerView>,
    mut scene: SandboxScene,
    time: Res<Time<Fixed>>,
    mut cue_events: EventWriter<WeaponCueEvent>,
    mut state_events: EventWriter<WeaponStateChanged>,
) {
    let delta = time.delta_secs();

    for (weapon, mut gun, mut handle, transform) in guns.iter_mut() {
        let from = gun.manipulator.state();
        let ((), cues) = run_in_context(&mut gun, &mut handle, weapon, *transform, &views, &mut scene, |gun, ctx| {
            gun.tick(delta, ctx)
        });
        publish(weapon, from, &gun, cues, &mut cue_events, &mut state_events);
    }
}

/// Собственное тело оружия
///
/// - Держат: физика выключена, тело следует за owner'ом (`owner * grip`)
/// - Брошено: физика включена, transform остаётся мировым
pub fn sync_weapon_bodies(
    mut guns: Query<(&GravityGun, &mut Transform, &mut SimBody)>,
    owners: Query<&Transform, Without<GravityGun>>,
) {
    for (gun, mut transform, mut body) in guns.iter_mut() {
        let simulate = gun.manipulator.core().simulates_physics();
        if body.simulate_physics != simulate {
            body.simulate_physics = simulate;
        }

        let Some(owner) = gun.manipulator.core().owner() else {
            continue;
        };

        if let Ok(owner_transform) = owners.get(owner) {
            *transform = owner_transform.mul_transform(gun.grip);
            body.velocity = Vec3::ZERO;
        }
    }
}
