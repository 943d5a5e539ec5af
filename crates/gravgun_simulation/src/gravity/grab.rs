//! Grab: что держит гравипушка

use bevy::prelude::*;

/// Удерживаемое тело
///
/// `body`: слабая ссылка: тело принадлежит миру и может исчезнуть между тиками.
/// Перед использованием проверяется через `RigidBodies::body_exists`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct Grab {
    pub body: Entity,
    /// Тело дошло до target (instant mode включён)
    pub at_rest: bool,
}

impl Grab {
    pub fn new(body: Entity) -> Self {
        Self { body, at_rest: false }
    }
}
