pub mod encoder;
pub mod types;

pub use encoder::{CommandEncoder, CommandFrame};
pub use types::{Button, ButtonState, Color, Command};
