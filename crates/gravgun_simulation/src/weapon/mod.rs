//! Weapon domain: generic контракт оружия в руках
//!
//! Содержит:
//! - WeaponState + CrosshairColorTable (state machine + HUD цвет)
//! - WeaponCore (общий state-machine helper, owner, muzzle socket)
//! - Weapon trait (capability set: primary/secondary/tick/pick_up/drop)
//! - WeaponContext (коллабораторы на время одного вызова)
//! - ActionCue / FeedbackSink (cues для presentation слоя)
//!
//! Вариант оружия = struct с `WeaponCore` внутри + `impl Weapon`.
//! Базовые действия только играют настроенный cue.

use bevy::prelude::*;

pub mod base;
pub mod feedback;
pub mod state;


pub use base::{MuzzleSocket, MuzzleTransform, WeaponCore};
pub use feedback::{ActionCue, CueBuffer, FeedbackSink};
pub use state::{CrosshairColorTable, WeaponState};

use crate::aim::ViewProjector;
use crate::physics::{ConstraintController, PhysicsScene};

/// Какое действие нажато (WeaponPrimary / WeaponSecondary binding)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ActionKind {
    Primary,
    Secondary,
}

/// Коллабораторы оружия на время одного вызова (tick или action)
///
/// Оружие ими не владеет: сцена и handle принадлежат хосту/миру,
/// view: контроллеру owner'а (None для AI / без владельца).
pub struct WeaponContext<'a> {
    /// World transform оружия
    pub transform: Transform,
    /// Entity оружия (собственное тело), если оно есть в сцене
    pub weapon: Option<Entity>,
    pub view: Option<&'a dyn ViewProjector>,
    pub scene: &'a mut dyn PhysicsScene,
    pub handle: &'a mut dyn ConstraintController,
    pub feedback: &'a mut dyn FeedbackSink,
}

/// Контракт оружия
///
/// Actions возвращают true только если произошёл эффект в мире:
/// хост по этому решает играть ли fire/use анимацию.
pub trait Weapon {
    fn core(&self) -> &WeaponCore;
    fn core_mut(&mut self) -> &mut WeaponCore;

    fn primary_action(&mut self, ctx: &mut WeaponContext<'_>) -> bool {
        self.core().play_action_cue(ActionKind::Primary, ctx.feedback)
    }

    fn secondary_action(&mut self, ctx: &mut WeaponContext<'_>) -> bool {
        self.core().play_action_cue(ActionKind::Secondary, ctx.feedback)
    }

    /// Per-frame update (внешний scheduler)
    fn tick(&mut self, _delta: f32, _ctx: &mut WeaponContext<'_>) {}

    fn pick_up(&mut self, owner: Entity) -> &mut Self
    where
        Self: Sized,
    {
        self.core_mut().pick_up(owner);
        self
    }

    fn drop(&mut self, _ctx: &mut WeaponContext<'_>) {
        self.core_mut().drop();
    }

    fn state(&self) -> WeaponState {
        self.core().state()
    }

    fn crosshair_color(&self) -> Color {
        self.core().crosshair_color()
    }

    fn muzzle_location(&self, weapon: &Transform) -> Vec3 {
        self.core().muzzle_transform(weapon).location
    }

    fn muzzle_rotation(&self, weapon: &Transform) -> Quat {
        self.core().muzzle_transform(weapon).rotation
    }
}
