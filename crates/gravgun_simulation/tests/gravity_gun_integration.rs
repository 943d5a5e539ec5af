//! Integration тесты гравипушки (headless App)
//!
//! Полный цикл: intents → FixedUpdate (weapons → physics) → events.
//! Игрок в origin смотрит вдоль -Z, один update = один fixed tick.

use bevy::prelude::*;
use gravgun_simulation::{
    create_headless_app, gravity_gun_bundle, scatter_props, spawn_gravity_gun, ActionCue, ActionKind,
    CrosshairColorTable, GravityGun, GravityManipulator, ManipulatorConfig, PhysicsHandle, PlayerView, SimBody,
    SimulationPlugin, Weapon, WeaponActionIntent, WeaponActionResolved, WeaponCore, WeaponCueEvent,
    WeaponLifecycleIntent, WeaponState, WeaponStateChanged,
};
use bevy_rapier3d::prelude::Velocity;
use gravgun_simulation::physics::ConstraintController;
use gravgun_simulation::weapon::MuzzleSocket;

/// Всё что системы отправили в presentation слой
#[derive(Resource, Default)]
struct Recorded {
    resolved: Vec<WeaponActionResolved>,
    cues: Vec<ActionCue>,
    states: Vec<WeaponStateChanged>,
}

fn record_events(
    mut recorded: ResMut<Recorded>,
    mut resolved: EventReader<WeaponActionResolved>,
    mut cues: EventReader<WeaponCueEvent>,
    mut states: EventReader<WeaponStateChanged>,
) {
    recorded.resolved.extend(resolved.read().copied());
    recorded.cues.extend(cues.read().map(|e| e.cue));
    recorded.states.extend(states.read().copied());
}

struct Rig {
    app: App,
    player: Entity,
    weapon: Entity,
}

impl Rig {
    fn new() -> Self {
        Self::with_manipulator(GravityManipulator::with_defaults())
    }

    fn with_manipulator(manipulator: GravityManipulator) -> Self {
        Self::with_grip(manipulator, Transform::from_xyz(15.0, -20.0, -30.0))
    }

    fn with_grip(manipulator: GravityManipulator, grip: Transform) -> Self {
        let mut app = create_headless_app(7);
        app.add_plugins(SimulationPlugin)
            .init_resource::<Recorded>()
            .add_systems(Update, record_events);

        let player = app
            .world_mut()
            .spawn((Transform::IDENTITY, PlayerView::new(Vec3::ZERO, Quat::IDENTITY)))
            .id();

        let weapon = app
            .world_mut()
            .spawn(gravity_gun_bundle(player, manipulator, grip))
            .id();

        // Первый update только запускает часы
        app.update();

        Self { app, player, weapon }
    }

    fn spawn_body(&mut self, at: Vec3, body: SimBody) -> Entity {
        self.app.world_mut().spawn((Transform::from_translation(at), body)).id()
    }

    fn step(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.app.update();
        }
    }

    fn act(&mut self, action: ActionKind) {
        self.app.world_mut().send_event(WeaponActionIntent {
            weapon: self.weapon,
            action,
        });
        self.step(1);
    }

    fn lifecycle(&mut self, intent: WeaponLifecycleIntent) {
        self.app.world_mut().send_event(intent);
    }

    fn gun(&self) -> &GravityGun {
        self.app.world().get::<GravityGun>(self.weapon).unwrap()
    }

    fn handle(&self) -> &PhysicsHandle {
        self.app.world().get::<PhysicsHandle>(self.weapon).unwrap()
    }

    fn body(&self, entity: Entity) -> &SimBody {
        self.app.world().get::<SimBody>(entity).unwrap()
    }

    fn position(&self, entity: Entity) -> Vec3 {
        self.app.world().get::<Transform>(entity).unwrap().translation
    }

    fn recorded(&self) -> &Recorded {
        self.app.world().resource::<Recorded>()
    }
}

#[test]
fn test_target_acquisition_drives_state_and_crosshair() {
    let mut rig = Rig::new();
    rig.step(2);
    assert_eq!(rig.gun().manipulator.state(), WeaponState::NoTarget);

    rig.spawn_body(Vec3::new(0.0, 0.0, -600.0), SimBody::dynamic(30.0, 10.0));
    rig.step(2);

    assert_eq!(rig.gun().manipulator.state(), WeaponState::HasTarget);

    let change = rig.recorded().states.last().copied().unwrap();
    assert_eq!(change.weapon, rig.weapon);
    assert_eq!(change.from, WeaponState::NoTarget);
    assert_eq!(change.to, WeaponState::HasTarget);
    assert_eq!(
        change.crosshair,
        CrosshairColorTable::default().color_for(WeaponState::HasTarget)
    );
}

#[test]
fn test_static_body_is_not_a_target() {
    let mut rig = Rig::new();
    rig.spawn_body(Vec3::new(0.0, 0.0, -600.0), SimBody::fixed(80.0));
    rig.step(2);

    assert_eq!(rig.gun().manipulator.state(), WeaponState::NoTarget);

    rig.act(ActionKind::Secondary);
    assert!(!rig.gun().manipulator.is_holding());
    assert_eq!(rig.recorded().cues, vec![ActionCue::NoTarget]);
}

#[test]
fn test_grab_pulls_body_to_hold_point() {
    let mut rig = Rig::new();
    let crate_body = rig.spawn_body(Vec3::new(0.0, 0.0, -600.0), SimBody::dynamic(30.0, 10.0));
    rig.step(1);

    rig.act(ActionKind::Secondary);

    let resolved = rig.recorded().resolved[0];
    assert_eq!(resolved.action, ActionKind::Secondary);
    assert!(resolved.success);
    assert_eq!(rig.recorded().cues, vec![ActionCue::Grab]);
    assert_eq!(rig.handle().current_grabbed_body(), Some(crate_body));

    rig.step(90);

    // Hold point = eye + forward * (player_muzzle_offset + radius)
    let hold_point = Vec3::new(0.0, 0.0, -130.0);
    assert!(
        rig.position(crate_body).distance(hold_point) < 0.01,
        "crate at {:?}",
        rig.position(crate_body)
    );
    assert!(rig.gun().manipulator.grab_state().unwrap().at_rest);
    assert!(rig.handle().is_instant());
}

#[test]
fn test_held_body_follows_view() {
    let mut rig = Rig::new();
    let crate_body = rig.spawn_body(Vec3::new(0.0, 0.0, -600.0), SimBody::dynamic(30.0, 10.0));
    rig.step(1);
    rig.act(ActionKind::Secondary);
    rig.step(90);

    // Игрок повернулся на +X
    let player = rig.player;
    *rig.app.world_mut().get_mut::<PlayerView>(player).unwrap() = PlayerView::looking_at(Vec3::ZERO, Vec3::X);
    rig.step(2);

    assert!(rig.position(crate_body).distance(Vec3::new(130.0, 0.0, 0.0)) < 0.01);
}

#[test]
fn test_primary_while_holding_launches_body() {
    let mut rig = Rig::new();
    let crate_body = rig.spawn_body(Vec3::new(0.0, 0.0, -600.0), SimBody::dynamic(30.0, 10.0));
    rig.step(1);
    rig.act(ActionKind::Secondary);
    rig.step(90);

    rig.act(ActionKind::Primary);

    assert!(!rig.gun().manipulator.is_holding());
    assert_eq!(rig.handle().current_grabbed_body(), None);
    assert_eq!(rig.recorded().cues, vec![ActionCue::Grab, ActionCue::Push]);
    assert!(rig.recorded().resolved[1].success);

    // Близко к стволу → почти max push (5000 / mass 10)
    assert!(rig.body(crate_body).velocity.z < -400.0);

    let before = rig.position(crate_body).z;
    rig.step(10);
    assert!(rig.position(crate_body).z < before - 50.0);
}

#[test]
fn test_push_free_body() {
    let mut rig = Rig::new();
    let near = rig.spawn_body(Vec3::new(0.0, 0.0, -400.0), SimBody::dynamic(30.0, 10.0));
    rig.step(1);

    rig.act(ActionKind::Primary);

    assert!(rig.recorded().resolved[0].success);
    assert_eq!(rig.recorded().cues, vec![ActionCue::Push]);
    assert!(rig.body(near).velocity.z < 0.0);
    assert!(!rig.gun().manipulator.is_holding());
}

#[test]
fn test_farther_body_gets_weaker_push() {
    let mut near_rig = Rig::new();
    let near = near_rig.spawn_body(Vec3::new(0.0, 0.0, -300.0), SimBody::dynamic(30.0, 10.0));
    near_rig.step(1);
    near_rig.act(ActionKind::Primary);

    let mut far_rig = Rig::new();
    let far = far_rig.spawn_body(Vec3::new(0.0, 0.0, -1500.0), SimBody::dynamic(30.0, 10.0));
    far_rig.step(1);
    far_rig.act(ActionKind::Primary);

    let near_speed = near_rig.body(near).velocity.length();
    let far_speed = far_rig.body(far).velocity.length();
    assert!(near_speed > far_speed, "near {} far {}", near_speed, far_speed);
}

#[test]
fn test_nothing_in_reach() {
    let mut rig = Rig::new();
    // Дальше reach (2000 от aim origin)
    rig.spawn_body(Vec3::new(0.0, 0.0, -2500.0), SimBody::dynamic(30.0, 10.0));
    rig.step(1);

    rig.act(ActionKind::Primary);
    rig.act(ActionKind::Secondary);

    let resolved = &rig.recorded().resolved;
    assert_eq!(resolved.len(), 2);
    assert!(resolved.iter().all(|r| !r.success));
    assert_eq!(rig.recorded().cues, vec![ActionCue::NoTarget, ActionCue::NoTarget]);
}

#[test]
fn test_drop_and_pick_up() {
    let mut rig = Rig::new();
    rig.spawn_body(Vec3::new(0.0, 0.0, -600.0), SimBody::dynamic(30.0, 10.0));
    rig.step(1);
    rig.act(ActionKind::Secondary);
    rig.step(5);

    let weapon = rig.weapon;
    rig.lifecycle(WeaponLifecycleIntent::Drop { weapon });
    rig.step(2);

    assert_eq!(rig.gun().manipulator.state(), WeaponState::Dropped);
    assert_eq!(rig.gun().manipulator.core().owner(), None);
    assert!(!rig.gun().manipulator.is_holding());
    assert_eq!(rig.handle().current_grabbed_body(), None);
    assert!(rig.body(weapon).simulate_physics);

    let change = rig.recorded().states.last().copied().unwrap();
    assert_eq!(change.to, WeaponState::Dropped);
    assert_eq!(change.crosshair, Color::NONE);

    // Брошенное оружие не стреляет
    rig.act(ActionKind::Secondary);
    assert!(!rig.recorded().resolved.last().unwrap().success);
    assert_eq!(rig.gun().manipulator.state(), WeaponState::Dropped);

    let owner = rig.player;
    rig.lifecycle(WeaponLifecycleIntent::PickUp { weapon, owner });
    rig.step(1);

    assert_ne!(rig.gun().manipulator.state(), WeaponState::Dropped);
    assert_eq!(rig.gun().manipulator.core().owner(), Some(owner));
    assert!(!rig.body(weapon).simulate_physics);

    let change = rig.recorded().states.iter().find(|c| c.from == WeaponState::Dropped).copied().unwrap();
    assert_eq!(change.to, WeaponState::NoTarget);
}

#[test]
fn test_drop_then_pick_up_same_tick_keeps_weapon() {
    let mut rig = Rig::new();
    let (weapon, owner) = (rig.weapon, rig.player);
    rig.step(1);

    rig.lifecycle(WeaponLifecycleIntent::Drop { weapon });
    rig.lifecycle(WeaponLifecycleIntent::PickUp { weapon, owner });
    rig.step(1);

    assert_eq!(rig.gun().manipulator.state(), WeaponState::NoTarget);
    assert_eq!(rig.gun().manipulator.core().owner(), Some(owner));
    assert!(!rig.body(weapon).simulate_physics);

    let transitions: Vec<_> = rig.recorded().states.iter().map(|c| (c.from, c.to)).collect();
    assert_eq!(
        transitions,
        vec![
            (WeaponState::NoTarget, WeaponState::Dropped),
            (WeaponState::Dropped, WeaponState::NoTarget),
        ]
    );
}

#[test]
fn test_pick_up_then_drop_same_tick_leaves_weapon_dropped() {
    let mut rig = Rig::new();
    let (weapon, owner) = (rig.weapon, rig.player);
    rig.lifecycle(WeaponLifecycleIntent::Drop { weapon });
    rig.step(1);
    assert_eq!(rig.gun().manipulator.state(), WeaponState::Dropped);

    rig.lifecycle(WeaponLifecycleIntent::PickUp { weapon, owner });
    rig.lifecycle(WeaponLifecycleIntent::Drop { weapon });
    rig.step(1);

    assert_eq!(rig.gun().manipulator.state(), WeaponState::Dropped);
    assert_eq!(rig.gun().manipulator.core().owner(), None);
    assert!(rig.body(weapon).simulate_physics);
}

#[test]
fn test_weapon_body_in_front_of_view_does_not_block_aim() {
    // Оружие висит прямо на луче взгляда, дальше aim origin
    let mut rig = Rig::with_grip(GravityManipulator::with_defaults(), Transform::from_xyz(0.0, 0.0, -150.0));
    let crate_body = rig.spawn_body(Vec3::new(0.0, 0.0, -600.0), SimBody::dynamic(30.0, 10.0));
    rig.step(2);

    assert_eq!(rig.position(rig.weapon), Vec3::new(0.0, 0.0, -150.0));
    assert_eq!(rig.gun().manipulator.state(), WeaponState::HasTarget);

    rig.act(ActionKind::Secondary);
    assert!(rig.recorded().resolved[0].success);
    assert_eq!(rig.handle().current_grabbed_body(), Some(crate_body));
}

#[test]
fn test_despawned_body_is_released() {
    let mut rig = Rig::new();
    let crate_body = rig.spawn_body(Vec3::new(0.0, 0.0, -600.0), SimBody::dynamic(30.0, 10.0));
    rig.step(1);
    rig.act(ActionKind::Secondary);
    rig.step(5);

    rig.app.world_mut().despawn(crate_body);
    rig.step(1);

    assert!(!rig.gun().manipulator.is_holding());
    assert_eq!(rig.handle().current_grabbed_body(), None);
    assert_eq!(rig.gun().manipulator.state(), WeaponState::NoTarget);
}

#[test]
fn test_owner_never_hit() {
    let config = ManipulatorConfig {
        player_muzzle_offset: 0.0,
        ..Default::default()
    };
    let manipulator = GravityManipulator::new(config, WeaponCore::default()).unwrap();
    let mut rig = Rig::with_manipulator(manipulator);

    // Aim origin внутри тела owner'а
    let player = rig.player;
    rig.app.world_mut().entity_mut(player).insert(SimBody::dynamic(50.0, 80.0));
    let crate_body = rig.spawn_body(Vec3::new(0.0, 0.0, -600.0), SimBody::dynamic(30.0, 10.0));
    rig.step(1);

    rig.act(ActionKind::Primary);

    assert!(rig.recorded().resolved[0].success);
    assert_eq!(rig.body(player).velocity, Vec3::ZERO);
    assert!(rig.body(crate_body).velocity.z < 0.0);
}

#[test]
fn test_owner_without_view_aims_from_muzzle() {
    let core = WeaponCore::default().with_muzzle(MuzzleSocket {
        offset: Vec3::new(0.0, 0.0, -10.0),
        rotation: Quat::IDENTITY,
    });
    let manipulator = GravityManipulator::new(ManipulatorConfig::default(), core).unwrap();

    let mut app = create_headless_app(7);
    app.add_plugins(SimulationPlugin);

    // AI owner: без PlayerView, стоит в стороне
    let owner = app.world_mut().spawn(Transform::from_xyz(1000.0, 0.0, 0.0)).id();
    let weapon = app
        .world_mut()
        .spawn(gravity_gun_bundle(owner, manipulator, Transform::IDENTITY))
        .id();
    app.world_mut().spawn((Transform::from_xyz(0.0, 0.0, -600.0), SimBody::dynamic(30.0, 10.0)));

    for _ in 0..4 {
        app.update();
    }
    // Оружие у owner'а, в прицеле пусто
    assert_eq!(
        app.world().get::<Transform>(weapon).unwrap().translation,
        Vec3::new(1000.0, 0.0, 0.0)
    );
    assert_eq!(
        app.world().get::<GravityGun>(weapon).unwrap().manipulator.state(),
        WeaponState::NoTarget
    );

    app.world_mut().spawn((Transform::from_xyz(1000.0, 0.0, -600.0), SimBody::dynamic(30.0, 10.0)));
    for _ in 0..2 {
        app.update();
    }
    assert_eq!(
        app.world().get::<GravityGun>(weapon).unwrap().manipulator.state(),
        WeaponState::HasTarget
    );
}

#[test]
fn test_default_gun_of_ai_owner_aims_from_own_position() {
    let mut app = create_headless_app(7);
    app.add_plugins(SimulationPlugin);

    // AI owner: без PlayerView, далеко от world origin
    let owner = app.world_mut().spawn(Transform::from_xyz(500.0, 0.0, 0.0)).id();
    let weapon = app
        .world_mut()
        .spawn(gravity_gun_bundle(owner, GravityManipulator::with_defaults(), Transform::IDENTITY))
        .id();
    let in_front = app
        .world_mut()
        .spawn((Transform::from_xyz(500.0, 0.0, -300.0), SimBody::dynamic(30.0, 10.0)))
        .id();
    // Перед world origin: сюда смотрел бы gun без muzzle
    app.world_mut()
        .spawn((Transform::from_xyz(0.0, 0.0, -300.0), SimBody::dynamic(30.0, 10.0)));

    for _ in 0..4 {
        app.update();
    }
    assert_eq!(
        app.world().get::<Transform>(weapon).unwrap().translation,
        Vec3::new(500.0, 0.0, 0.0)
    );

    app.world_mut().send_event(WeaponActionIntent {
        weapon,
        action: ActionKind::Secondary,
    });
    app.update();

    let gun = app.world().get::<GravityGun>(weapon).unwrap();
    assert!(gun.manipulator.is_holding());
    assert_eq!(
        app.world().get::<PhysicsHandle>(weapon).unwrap().current_grabbed_body(),
        Some(in_front)
    );
}

#[test]
fn test_rapier_velocity_mirrors_pushed_body() {
    let mut rig = Rig::new();
    let crate_body = rig
        .app
        .world_mut()
        .spawn((
            Transform::from_xyz(0.0, 0.0, -600.0),
            SimBody::dynamic(30.0, 10.0),
            Velocity::default(),
        ))
        .id();
    rig.step(1);

    rig.act(ActionKind::Primary);
    rig.step(1);

    let body_velocity = rig.body(crate_body).velocity;
    assert!(body_velocity.z < 0.0);
    assert_eq!(rig.app.world().get::<Velocity>(crate_body).unwrap().linvel, body_velocity);
}

#[test]
fn test_scattered_props_carry_rapier_velocity() {
    let mut app = create_headless_app(3);
    app.add_plugins(SimulationPlugin);
    let props = scatter_props(app.world_mut(), 5, 200.0, 800.0);
    app.update();

    for prop in props {
        app.world_mut().get_mut::<SimBody>(prop).unwrap().velocity = Vec3::new(0.0, 0.0, -40.0);
    }
    app.update();

    let mut query = app.world_mut().query::<(&SimBody, &Velocity)>();
    let mirrored: Vec<_> = query.iter(app.world()).collect();
    assert_eq!(mirrored.len(), 5);
    for (body, velocity) in mirrored {
        assert_ne!(body.velocity, Vec3::ZERO);
        assert_eq!(velocity.linvel, body.velocity);
    }
}

#[derive(Resource)]
struct SpawnedGun {
    player: Entity,
    weapon: Entity,
}

fn spawn_player_with_gun(mut commands: Commands) {
    let player = commands
        .spawn((Transform::IDENTITY, PlayerView::new(Vec3::ZERO, Quat::IDENTITY)))
        .id();
    let weapon = spawn_gravity_gun(
        &mut commands,
        player,
        GravityManipulator::with_defaults(),
        Transform::from_xyz(15.0, -20.0, -30.0),
    );
    commands.insert_resource(SpawnedGun { player, weapon });
}

#[test]
fn test_spawn_gravity_gun_attaches_to_owner() {
    let mut app = create_headless_app(7);
    app.add_plugins(SimulationPlugin)
        .add_systems(Startup, spawn_player_with_gun);
    app.update();

    let spawned = app.world().resource::<SpawnedGun>();
    let (player, weapon) = (spawned.player, spawned.weapon);

    let gun = app.world().get::<GravityGun>(weapon).unwrap();
    assert_eq!(gun.manipulator.core().owner(), Some(player));
    assert_eq!(gun.manipulator.state(), WeaponState::NoTarget);
    assert!(!app.world().get::<SimBody>(weapon).unwrap().simulate_physics);
    assert_eq!(app.world().get::<PhysicsHandle>(weapon).unwrap().current_grabbed_body(), None);
}
