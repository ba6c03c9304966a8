//! Value types shared by commands and decoded events

use crate::config::motor::{BRAKE, MAX_SPEED};

/// Colours understood by the hub LED and reported by the colour sensor.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black = 0,
    Pink = 1,
    Purple = 2,
    Blue = 3,
    LightBlue = 4,
    Cyan = 5,
    Green = 6,
    Yellow = 7,
    Orange = 8,
    Red = 9,
    White = 10,
    /// LED off / nothing detected
    None = 255,
}

impl Color {
    /// Try to convert a byte to a Color
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Black),
            1 => Some(Self::Pink),
            2 => Some(Self::Purple),
            3 => Some(Self::Blue),
            4 => Some(Self::LightBlue),
            5 => Some(Self::Cyan),
            6 => Some(Self::Green),
            7 => Some(Self::Yellow),
            8 => Some(Self::Orange),
            9 => Some(Self::Red),
            10 => Some(Self::White),
            255 => Some(Self::None),
            _ => None,
        }
    }
}

/// Physical buttons on hubs and the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Hub or remote centre button
    Green,
    Left,
    Right,
}

/// Button states, as reported by hub properties and the remote
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Released = 0x00,
    Up = 0x01,
    Pressed = 0x02,
    Stop = 0x7f,
    Down = 0xff,
}

/// Output commands addressed to a single port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run at a speed, for `time_ms` if given and non-zero, else indefinitely
    MotorSpeed { speed: i32, time_ms: Option<u32> },

    /// Rotate by `angle` degrees; the sign of `speed` gives the direction
    MotorAngle { angle: u32, speed: i32 },

    /// Seek an absolute encoder position (Control+ motors only)
    AbsolutePosition { position: i32, speed: i32 },

    /// Make the current position absolute zero (Control+ motors only)
    ResetAbsolutePosition,
}

impl Command {
    /// Whether the caller should wait for the hub's port action feedback
    pub fn waits_for_completion(&self) -> bool {
        match self {
            Command::MotorSpeed { time_ms, .. } => time_ms.is_some_and(|time| time > 0),
            Command::MotorAngle { .. } | Command::AbsolutePosition { .. } => true,
            Command::ResetAbsolutePosition => false,
        }
    }

    /// Whether the command needs a motor with an absolute encoder
    pub fn requires_absolute_position(&self) -> bool {
        matches!(
            self,
            Command::AbsolutePosition { .. } | Command::ResetAbsolutePosition
        )
    }
}

/// Map a caller speed to the output command speed byte.
///
/// [`BRAKE`] passes through unchanged; everything else is clamped to
/// `-100..=100` and sent as a signed byte.
pub fn map_speed(speed: i32) -> u8 {
    if speed == BRAKE {
        return BRAKE as u8;
    }
    speed.clamp(-MAX_SPEED, MAX_SPEED) as i8 as u8
}
