//! WeaponCore: общее состояние любого оружия (база для вариантов)
//!
//! Тонкий helper вместо базового класса:
//! - state machine (единственный mutator `transition`)
//! - owner + физика собственного тела (pick_up/drop)
//! - muzzle socket accessors
//! - crosshair lookup + базовые action cues

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ActionCue, ActionKind, CrosshairColorTable, FeedbackSink, WeaponState};

/// Muzzle socket (local space оружия)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct MuzzleSocket {
    pub offset: Vec3,
    pub rotation: Quat,
}

impl Default for MuzzleSocket {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Muzzle в world space (location + forward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuzzleTransform {
    pub location: Vec3,
    pub rotation: Quat,
}

impl MuzzleTransform {
    /// Forward = -Z (bevy convention)
    pub fn forward(&self) -> Dir3 {
        Dir3::new(self.rotation * Vec3::NEG_Z).unwrap_or(Dir3::NEG_Z)
    }
}

#[derive(Debug, Clone)]
pub struct WeaponCore {
    state: WeaponState,
    owner: Option<Entity>,
    /// Физика собственного тела оружия (true только когда лежит в мире)
    simulate_physics: bool,
    muzzle: Option<MuzzleSocket>,
    crosshair: CrosshairColorTable,
    primary_cue: Option<ActionCue>,
    secondary_cue: Option<ActionCue>,
}

impl Default for WeaponCore {
    fn default() -> Self {
        Self::new(CrosshairColorTable::default())
    }
}

impl WeaponCore {
    pub fn new(crosshair: CrosshairColorTable) -> Self {
        Self {
            state: WeaponState::NoTarget,
            owner: None,
            simulate_physics: false,
            // Socket в origin оружия: fallback aim идёт от самого оружия
            muzzle: Some(MuzzleSocket::default()),
            crosshair,
            primary_cue: None,
            secondary_cue: None,
        }
    }

    pub fn with_muzzle(mut self, socket: MuzzleSocket) -> Self {
        self.muzzle = Some(socket);
        self
    }

    /// Оружие без muzzle socket: fallback aim деградирует до world origin
    pub fn without_muzzle(mut self) -> Self {
        self.muzzle = None;
        self
    }

    pub fn with_action_cues(mut self, primary: Option<ActionCue>, secondary: Option<ActionCue>) -> Self {
        self.primary_cue = primary;
        self.secondary_cue = secondary;
        self
    }

    pub fn state(&self) -> WeaponState {
        self.state
    }

    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    pub fn simulates_physics(&self) -> bool {
        self.simulate_physics
    }

    pub fn crosshair_color(&self) -> Color {
        self.crosshair.color_for(self.state)
    }

    /// Единственная точка записи state. Возвращает true если состояние сменилось.
    fn transition(&mut self, to: WeaponState) -> bool {
        if self.state == to {
            return false;
        }

        crate::logger::log(&format!("Weapon state: {:?} → {:?}", self.state, to));
        self.state = to;
        true
    }

    /// Acquisition результат тика: NoTarget ↔ HasTarget
    ///
    /// Вне targeting состояний (Dropped, reserved) ничего не делает.
    pub fn update_target(&mut self, has_target: bool) -> bool {
        if !self.state.is_targeting() {
            return false;
        }

        let to = if has_target {
            WeaponState::HasTarget
        } else {
            WeaponState::NoTarget
        };
        self.transition(to)
    }

    /// Внешнее присваивание (reserved states, возврат в NoTarget)
    ///
    /// `Dropped` сюда не входит и отсюда не выходит: только pick_up/drop.
    pub fn assign_state(&mut self, state: WeaponState) -> bool {
        if state == WeaponState::Dropped || self.state == WeaponState::Dropped {
            crate::logger::log_warning(&format!(
                "Weapon state: rejected {:?} → {:?} (Dropped only via pick_up/drop)",
                self.state, state
            ));
            return false;
        }

        self.transition(state);
        true
    }

    pub fn pick_up(&mut self, owner: Entity) {
        self.simulate_physics = false;
        self.owner = Some(owner);
        self.transition(WeaponState::NoTarget);
    }

    pub fn drop(&mut self) {
        self.owner = None;
        self.simulate_physics = true;
        self.transition(WeaponState::Dropped);
    }

    /// Muzzle в world space; без socket: zero vector / identity
    pub fn muzzle_transform(&self, weapon: &Transform) -> MuzzleTransform {
        match self.muzzle {
            Some(socket) => MuzzleTransform {
                location: weapon.transform_point(socket.offset),
                rotation: weapon.rotation * socket.rotation,
            },
            None => MuzzleTransform {
                location: Vec3::ZERO,
                rotation: Quat::IDENTITY,
            },
        }
    }

    /// Базовое действие: только настроенный cue. Без cue: false.
    pub fn play_action_cue(&self, action: ActionKind, feedback: &mut dyn FeedbackSink) -> bool {
        let cue = match action {
            ActionKind::Primary => self.primary_cue,
            ActionKind::Secondary => self.secondary_cue,
        };

        match cue {
            Some(cue) => {
                feedback.play_cue(cue);
                true
            }
            None => false,
        }
    }
}
