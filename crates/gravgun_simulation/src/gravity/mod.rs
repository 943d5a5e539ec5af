//! Gravity domain: гравипушка
//!
//! Содержит:
//! - ManipulatorConfig (immutable tuning) + ConfigError
//! - reach_falloff (push force / pull speed по расстоянию)
//! - Grab (удерживаемое тело, weak handle)
//! - GravityManipulator (acquisition, grab/release, pull, push)

pub mod config;
pub mod falloff;
pub mod grab;
pub mod manipulator;


pub use config::{ConfigError, ManipulatorConfig};
pub use falloff::reach_falloff;
pub use grab::Grab;
pub use manipulator::GravityManipulator;
