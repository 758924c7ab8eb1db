pub mod claims;
pub mod colors;
pub mod territory;

pub use claims::*;
pub use colors::{Rgba, guild_color};
pub use territory::*;
