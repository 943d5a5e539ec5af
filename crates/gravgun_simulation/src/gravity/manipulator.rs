//! GravityManipulator: гравипушка
//!
//! Tick (FixedUpdate):
//! 1. Протухший grab (тело despawned) → implicit release
//! 2. Acquisition → NoTarget/HasTarget
//! 3. Pull: новый target point + interpolation speed для handle
//!
//! Actions:
//! - Primary: push удерживаемого тела (и отпустить), иначе push того, что в прицеле
//! - Secondary: toggle grab/release

use bevy::prelude::Entity;

use crate::aim::{resolve_aim, AimSample};
use crate::physics::RayHit;
use crate::weapon::{ActionCue, CrosshairColorTable, Weapon, WeaponContext, WeaponCore};

use super::{reach_falloff, ConfigError, Grab, ManipulatorConfig};

#[derive(Debug, Clone)]
pub struct GravityManipulator {
    core: WeaponCore,
    config: ManipulatorConfig,
    grab: Option<Grab>,
}

impl GravityManipulator {
    pub fn new(config: ManipulatorConfig, core: WeaponCore) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            crate::logger::log_warning(&format!("GravityManipulator: rejected config: {}", err));
            return Err(err);
        }

        Ok(Self {
            core,
            config,
            grab: None,
        })
    }

    /// Default tuning + default crosshair
    pub fn with_defaults() -> Self {
        Self {
            core: WeaponCore::new(CrosshairColorTable::default()),
            config: ManipulatorConfig::default(),
            grab: None,
        }
    }

    pub fn config(&self) -> &ManipulatorConfig {
        &self.config
    }

    pub fn grab_state(&self) -> Option<&Grab> {
        self.grab.as_ref()
    }

    pub fn is_holding(&self) -> bool {
        self.grab.is_some()
    }

    pub fn aim(&self, ctx: &WeaponContext<'_>) -> AimSample {
        let muzzle = self.core.muzzle_transform(&ctx.transform);
        resolve_aim(
            ctx.view,
            &muzzle,
            self.config.muzzle_offset,
            self.config.player_muzzle_offset,
        )
    }

    /// Ближайшее тело вдоль aim ray в пределах reach (owner и само оружие исключены)
    pub fn find_closest_object_in_reach(&self, ctx: &WeaponContext<'_>) -> Option<RayHit> {
        let aim = self.aim(ctx);
        let excluded: Vec<Entity> = self.core.owner().into_iter().chain(ctx.weapon).collect();
        ctx.scene.raycast(
            aim.origin,
            aim.direction,
            self.config.max_reach_distance,
            &excluded,
        )
    }

    /// Hit по телу, которое можно схватить/толкнуть
    fn find_simulated_target(&self, ctx: &WeaponContext<'_>) -> Option<RayHit> {
        self.find_closest_object_in_reach(ctx)
            .filter(|hit| ctx.scene.is_simulating_physics(hit.body))
    }

    /// Отпускает grab, если тело исчезло. true: grab был протухшим.
    fn drop_stale_grab(&mut self, ctx: &mut WeaponContext<'_>) -> bool {
        let Some(grab) = self.grab else {
            return false;
        };

        if ctx.scene.body_exists(grab.body) {
            return false;
        }

        self.release_invalid(ctx);
        true
    }

    fn release_invalid(&mut self, ctx: &mut WeaponContext<'_>) {
        if let Some(grab) = self.grab {
            crate::logger::log(&format!(
                "GravityManipulator: held body {:?} is no longer valid (implicit release)",
                grab.body
            ));
        }
        self.release(ctx);
    }

    pub fn grab(&mut self, ctx: &mut WeaponContext<'_>) -> bool {
        if self.grab.is_some() {
            return false;
        }

        let Some(hit) = self.find_simulated_target(ctx) else {
            return false;
        };

        let Some(center_of_mass) = ctx.scene.center_of_mass(hit.body) else {
            return false;
        };

        ctx.handle.attach(hit.body, center_of_mass);
        self.grab = Some(Grab::new(hit.body));

        crate::logger::log(&format!(
            "GravityManipulator: grabbed {:?} at {:?} (distance {:.1})",
            hit.body, center_of_mass, hit.distance
        ));
        true
    }

    pub fn release(&mut self, ctx: &mut WeaponContext<'_>) -> bool {
        let Some(grab) = self.grab.take() else {
            return false;
        };

        ctx.handle.detach();
        // Следующий grab снова начинается со smoothed сходимости
        ctx.handle.set_instant_mode(false);

        crate::logger::log(&format!("GravityManipulator: released {:?}", grab.body));
        true
    }

    /// Per-tick сходимость удерживаемого тела к точке перед прицелом
    pub fn pull_if_grabbing(&mut self, ctx: &mut WeaponContext<'_>) {
        let Some(grab) = self.grab else {
            return;
        };

        let (Some(center_of_mass), Some(radius)) = (
            ctx.scene.center_of_mass(grab.body),
            ctx.scene.bounds_radius(grab.body),
        ) else {
            self.release_invalid(ctx);
            return;
        };

        // Тело "висит" на радиус впереди aim origin, не влезая в ствол
        let aim = self.aim(ctx);
        let target = aim.point_at(radius);

        if !grab.at_rest {
            let distance = target.distance(center_of_mass);
            let speed = self.pull_speed(distance);
            ctx.handle.set_interpolation_speed(speed);

            if distance < self.config.snap_threshold {
                // Осело: дальше instant, без дрожания
                ctx.handle.set_instant_mode(true);
                self.grab = Some(Grab {
                    at_rest: true,
                    ..grab
                });
                crate::logger::log(&format!("GravityManipulator: {:?} at rest", grab.body));
            }
        }

        ctx.handle.set_target_point(target);
    }

    /// Push того, что в прицеле (не удерживаемого тела)
    pub fn push_object(&mut self, ctx: &mut WeaponContext<'_>) -> bool {
        let Some(hit) = self.find_simulated_target(ctx) else {
            return false;
        };

        let aim = self.aim(ctx);
        let distance = aim.origin.distance(hit.point);
        let force = self.push_force(distance);

        let applied = ctx
            .scene
            .apply_impulse_at(hit.body, aim.direction.as_vec3() * force, hit.point);

        if applied {
            crate::logger::log(&format!(
                "GravityManipulator: pushed {:?} with {:.1} (distance {:.1})",
                hit.body, force, distance
            ));
        }
        applied
    }

    /// Push удерживаемого тела, затем release (push и hold взаимоисключающие)
    pub fn push_grabbed_object(&mut self, ctx: &mut WeaponContext<'_>) -> bool {
        let Some(grab) = self.grab else {
            return false;
        };

        let Some(center_of_mass) = ctx.scene.center_of_mass(grab.body) else {
            self.release_invalid(ctx);
            return false;
        };

        let aim = self.aim(ctx);
        let distance = aim.origin.distance(center_of_mass);
        let force = self.push_force(distance);

        let applied = ctx.scene.apply_impulse_at(
            grab.body,
            aim.direction.as_vec3() * force,
            center_of_mass,
        );
        self.release(ctx);

        if applied {
            crate::logger::log(&format!(
                "GravityManipulator: launched held {:?} with {:.1} (distance {:.1})",
                grab.body, force, distance
            ));
        }
        applied
    }

    pub fn push_force(&self, distance: f32) -> f32 {
        reach_falloff(
            self.config.min_push_force,
            self.config.max_push_force,
            distance,
            self.config.max_reach_distance,
        )
    }

    pub fn pull_speed(&self, distance: f32) -> f32 {
        reach_falloff(
            self.config.min_pull_speed,
            self.config.max_pull_speed,
            distance,
            self.config.max_reach_distance,
        )
    }
}

impl Weapon for GravityManipulator {
    fn core(&self) -> &WeaponCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WeaponCore {
        &mut self.core
    }

    fn primary_action(&mut self, ctx: &mut WeaponContext<'_>) -> bool {
        self.drop_stale_grab(ctx);

        let pushed = if self.grab.is_some() {
            self.push_grabbed_object(ctx)
        } else {
            self.push_object(ctx)
        };

        ctx.feedback
            .play_cue(if pushed { ActionCue::Push } else { ActionCue::NoTarget });
        pushed
    }

    fn secondary_action(&mut self, ctx: &mut WeaponContext<'_>) -> bool {
        self.drop_stale_grab(ctx);

        if self.grab.is_some() {
            let released = self.release(ctx);
            if released {
                ctx.feedback.play_cue(ActionCue::Release);
            }
            return released;
        }

        let grabbed = self.grab(ctx);
        ctx.feedback
            .play_cue(if grabbed { ActionCue::Grab } else { ActionCue::NoTarget });
        grabbed
    }

    fn tick(&mut self, _delta: f32, ctx: &mut WeaponContext<'_>) {
        self.drop_stale_grab(ctx);

        let has_target = self.find_simulated_target(ctx).is_some();
        self.core.update_target(has_target);

        self.pull_if_grabbing(ctx);
    }

    fn drop(&mut self, ctx: &mut WeaponContext<'_>) {
        self.release(ctx);
        self.core.drop();
    }
}
