//! Feedback Sink: звуковые cues для presentation слоя
//!
//! Оружие не играет звук само: оно сообщает какой cue нужен.
//! Presentation слой (HUD/audio) решает что с ним делать.

use bevy::prelude::*;

/// Action cue (что проиграть после действия)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ActionCue {
    /// Базовый звук primary action (generic оружие)
    PrimarySound,
    /// Базовый звук secondary action (generic оружие)
    SecondarySound,
    /// Импульс применён
    Push,
    /// Тело схвачено
    Grab,
    /// Тело отпущено
    Release,
    /// Действие ничего не нашло
    NoTarget,
}

pub trait FeedbackSink {
    fn play_cue(&mut self, cue: ActionCue);
}

/// Буфер cues за один вызов (ECS слой сливает его в events)
#[derive(Debug, Default, Clone)]
pub struct CueBuffer {
    cues: Vec<ActionCue>,
}

impl CueBuffer {
    pub fn cues(&self) -> &[ActionCue] {
        &self.cues
    }

    pub fn drain(&mut self) -> impl Iterator<Item = ActionCue> + '_ {
        self.cues.drain(..)
    }
}

impl FeedbackSink for CueBuffer {
    fn play_cue(&mut self, cue: ActionCue) {
        self.cues.push(cue);
    }
}
