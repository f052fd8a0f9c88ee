mod block;
mod bus;
mod commands;
mod config;
mod error;
mod events;
mod io_json;
mod sequence;

pub use block::*;
pub use bus::*;
pub use commands::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use io_json::*;
pub use sequence::*;
