mod controller;
mod delete_tune;
mod error;
mod geometry;
pub mod icons;
mod listeners;
mod move_tunes;
mod scheduler;
mod settings;
mod toolbar;
mod tune;

pub use controller::*;
pub use delete_tune::*;
pub use error::*;
pub use geometry::*;
pub use listeners::*;
pub use move_tunes::*;
pub use scheduler::*;
pub use settings::*;
pub use toolbar::*;
pub use tune::*;
