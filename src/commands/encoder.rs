//! Outbound command encoder
//!
//! Builds the byte frames written to the hub characteristic. Every frame is
//! `[length][hub id][message type][...]` where the length counts the whole
//! frame.

use crate::commands::types::{map_speed, Color, Command};
use crate::config::message::{HUB_PROPERTY, PORT_INPUT_FORMAT_SETUP, PORT_OUTPUT};
use crate::config::motor::{END_STATE_HOLD, MAX_POWER, MAX_TIME_MS, USE_PROFILE};
use crate::config::protocol::{HUB_ID, LED_PORT, MAX_COMMAND_LEN};
use crate::hub::error::HubError;
use crate::hub::port::Port;
use crate::protocol::message::{HubProperty, PropertyOperation};
use heapless::Vec;

/// One encoded command frame
pub type CommandFrame = Vec<u8, MAX_COMMAND_LEN>;

/// Output sub-commands (byte after the startup/completion flags)
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
enum OutputCommand {
    StartSpeed = 0x01,
    StartSpeedForTime = 0x09,
    StartSpeedForDegrees = 0x0b,
    GotoAbsolutePosition = 0x0d,
    GotoAbsolutePositionCombined = 0x0e,
    WriteDirectModeData = 0x51,
}

/// Execute immediately and request command feedback
const STARTUP_AND_FEEDBACK: u8 = 0x11;

/// LED modes written through direct mode data
const LED_MODE_INDEX: u8 = 0x00;
const LED_MODE_RGB: u8 = 0x01;

/// Direct mode data preset for encoder reset
const PRESET_ENCODER: u8 = 0x02;

/// Append `[length][hub id]` and the body parts.
fn frame(parts: &[&[u8]]) -> CommandFrame {
    let body_len: usize = parts.iter().map(|part| part.len()).sum();
    let mut frame = CommandFrame::new();
    let _ = frame.push((body_len + 2) as u8);
    let _ = frame.push(HUB_ID);
    for part in parts {
        let _ = frame.extend_from_slice(part);
    }
    frame
}

/// Trailing `[max power][end state][profile]` bytes of motor commands
const MOTOR_TAIL: [u8; 3] = [MAX_POWER, END_STATE_HOLD, USE_PROFILE];

/// Encoder for hub command frames
pub struct CommandEncoder;

impl CommandEncoder {
    /// Create a new command encoder
    pub fn new() -> Self {
        Self
    }

    /// Encode a port output command.
    ///
    /// Fails with [`HubError::UnsupportedDevice`] when the command needs an
    /// absolute encoder and the port's device has none.
    pub fn encode(&self, port: &Port, command: &Command) -> Result<CommandFrame, HubError> {
        if command.requires_absolute_position()
            && !port
                .device()
                .is_some_and(|device| device.supports_absolute_position())
        {
            return Err(HubError::UnsupportedDevice);
        }

        let header = [PORT_OUTPUT, port.value(), STARTUP_AND_FEEDBACK];

        let frame = match *command {
            Command::MotorSpeed { speed, time_ms } => match time_ms.filter(|&time| time > 0) {
                Some(time) => {
                    let time = time.min(MAX_TIME_MS) as u16;
                    frame(&[
                        &header,
                        &[OutputCommand::StartSpeedForTime as u8],
                        &time.to_le_bytes(),
                        &[map_speed(speed)],
                        &MOTOR_TAIL,
                    ])
                }
                None => frame(&[
                    &header,
                    &[OutputCommand::StartSpeed as u8, map_speed(speed)],
                    &MOTOR_TAIL,
                ]),
            },
            Command::MotorAngle { angle, speed } => frame(&[
                &header,
                &[OutputCommand::StartSpeedForDegrees as u8],
                &angle.to_le_bytes(),
                &[map_speed(speed)],
                &MOTOR_TAIL,
            ]),
            Command::AbsolutePosition { position, speed } => {
                let position = position.to_le_bytes();
                if port.is_virtual() {
                    frame(&[
                        &header,
                        &[OutputCommand::GotoAbsolutePositionCombined as u8],
                        &position,
                        &position,
                        &[map_speed(speed)],
                        &MOTOR_TAIL,
                    ])
                } else {
                    frame(&[
                        &header,
                        &[OutputCommand::GotoAbsolutePosition as u8],
                        &position,
                        &[map_speed(speed)],
                        &MOTOR_TAIL,
                    ])
                }
            }
            Command::ResetAbsolutePosition => frame(&[
                &header,
                &[OutputCommand::WriteDirectModeData as u8, PRESET_ENCODER],
                &0i32.to_le_bytes(),
            ]),
        };

        Ok(frame)
    }

    /// Set the hub LED to an indexed colour.
    ///
    /// The first frame is the button updates request the hub expects before
    /// LED writes.
    pub fn led_color(&self, color: Color) -> [CommandFrame; 2] {
        [
            self.hub_property(HubProperty::Button, PropertyOperation::EnableUpdates),
            frame(&[
                &[PORT_OUTPUT, LED_PORT, STARTUP_AND_FEEDBACK],
                &[OutputCommand::WriteDirectModeData as u8, LED_MODE_INDEX, color as u8],
            ]),
        ]
    }

    /// Set the hub LED to an RGB value, switching the LED to RGB mode first.
    pub fn led_rgb(&self, red: u8, green: u8, blue: u8) -> [CommandFrame; 2] {
        [
            self.port_input_format(LED_PORT, LED_MODE_RGB, 0x01, true),
            frame(&[
                &[PORT_OUTPUT, LED_PORT, STARTUP_AND_FEEDBACK],
                &[OutputCommand::WriteDirectModeData as u8, LED_MODE_RGB, red, green, blue],
            ]),
        ]
    }

    /// Port input format setup: select a sensor mode and turn notifications on or off.
    pub fn port_input_format(&self, port: u8, mode: u8, delta: u8, notify: bool) -> CommandFrame {
        frame(&[
            &[PORT_INPUT_FORMAT_SETUP, port, mode, delta],
            &[0x00, 0x00, 0x00, notify as u8],
        ])
    }

    /// Hub property operation, e.g. requesting a battery update
    pub fn hub_property(&self, property: HubProperty, operation: PropertyOperation) -> CommandFrame {
        frame(&[&[HUB_PROPERTY, property as u8, operation as u8]])
    }
}

impl Default for CommandEncoder {
    fn default() -> Self {
        Self::new()
    }
}
