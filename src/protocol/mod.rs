pub mod framing;
pub mod message;

pub use framing::{Frame, FrameAssembler, Frames};
pub use message::{AttachEvent, HubProperty, MessageType, PropertyOperation, Version};
