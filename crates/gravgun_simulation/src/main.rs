//! Headless демо гравипушки
//!
//! Игрок в origin смотрит вдоль -Z, перед ним разбросаны пропы.
//! Сценарий: grab → подтянуть → бросить (push удерживаемого) → push свободного → drop.

use bevy::prelude::*;
use gravgun_simulation::{
    create_headless_app, gravity_gun_bundle, scatter_props, ActionKind, GravityManipulator, PlayerView, SimBody,
    SimulationPlugin, WeaponActionIntent, WeaponActionResolved, WeaponLifecycleIntent, WeaponStateChanged,
};

/// Скрипт: (tick, action)
const SCRIPT: &[(u32, ActionKind)] = &[
    (10, ActionKind::Secondary),
    (120, ActionKind::Primary),
    (200, ActionKind::Primary),
    (260, ActionKind::Secondary),
];

const DROP_TICK: u32 = 400;
const TICK_COUNT: u32 = 600;

fn main() {
    let seed = 42;
    println!("Starting GRAVGUN headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .add_systems(Update, (report_resolved_actions, report_state_changes));

    let player = app
        .world_mut()
        .spawn((
            Transform::from_xyz(0.0, 0.0, 0.0),
            PlayerView::new(Vec3::ZERO, Quat::IDENTITY),
        ))
        .id();

    let weapon = app
        .world_mut()
        .spawn(gravity_gun_bundle(
            player,
            GravityManipulator::with_defaults(),
            Transform::from_xyz(15.0, -20.0, -30.0),
        ))
        .id();

    let mut props = scatter_props(app.world_mut(), 8, 200.0, 1800.0);
    // Ящик прямо в прицеле + стена (static) дальше по лучу
    props.push(
        app.world_mut()
            .spawn((Transform::from_xyz(0.0, 0.0, -600.0), SimBody::dynamic(30.0, 10.0)))
            .id(),
    );
    props.push(
        app.world_mut()
            .spawn((Transform::from_xyz(0.0, 0.0, -1900.0), SimBody::fixed(80.0)))
            .id(),
    );
    println!("Spawned {} props, weapon {:?}, player {:?}", props.len(), weapon, player);

    // Первый update только запускает часы
    app.update();

    for tick in 0..TICK_COUNT {
        for (_, action) in SCRIPT.iter().filter(|(at, _)| *at == tick) {
            app.world_mut().send_event(WeaponActionIntent {
                weapon,
                action: *action,
            });
        }
        if tick == DROP_TICK {
            app.world_mut().send_event(WeaponLifecycleIntent::Drop { weapon });
        }

        app.update();

        if tick % 100 == 0 {
            report_props(app.world_mut(), tick, &props);
        }
    }

    report_props(app.world_mut(), TICK_COUNT, &props);
    println!("Simulation complete!");
}

fn report_props(world: &mut World, tick: u32, props: &[Entity]) {
    println!("Tick {}:", tick);
    for &prop in props {
        let Some(transform) = world.get::<Transform>(prop) else {
            continue;
        };
        let speed = world.get::<SimBody>(prop).map(|b| b.velocity.length()).unwrap_or(0.0);
        println!(
            "  {:?} at ({:.0}, {:.0}, {:.0}) speed {:.1}",
            prop, transform.translation.x, transform.translation.y, transform.translation.z, speed
        );
    }
}

fn report_resolved_actions(mut events: EventReader<WeaponActionResolved>) {
    for event in events.read() {
        let animation = if event.success { "play fire animation" } else { "no animation" };
        println!("{:?} {:?}: success={} ({})", event.weapon, event.action, event.success, animation);
    }
}

fn report_state_changes(mut events: EventReader<WeaponStateChanged>) {
    for event in events.read() {
        println!(
            "{:?} state {:?} → {:?}, crosshair {:?}",
            event.weapon, event.from, event.to, event.crosshair
        );
    }
}
