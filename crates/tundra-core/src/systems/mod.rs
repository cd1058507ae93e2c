//! Systems - logic that operates on components

mod combat;
mod navigation;
mod needs;
mod respawn;

pub use combat::*;
pub use navigation::*;
pub use needs::*;
pub use respawn::*;
