//! Inbound message identifiers
//!
//! # Frame Format
//!
//! ```text
//! [length: u8][hub id: u8][message type: u8][payload...]
//! ```
//!
//! - `length`: total frame length in bytes, including itself
//! - `hub id`: always 0x00 on current hubs
//! - `message type`: one of [`MessageType`]; anything else is ignored

use crate::config::message;

/// Inbound message types handled by the dispatcher
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Hub property update (0x01)
    ///
    /// - Payload: `[property][operation][value...]`
    HubProperty = message::HUB_PROPERTY,

    /// Port attached or detached (0x04)
    ///
    /// - Payload: `[port][event][device type lo][device type hi][...]`
    PortAttach = message::PORT_ATTACH,

    /// Sensor value in the port's current mode (0x45)
    ///
    /// - Payload: `[port][value...]`
    SensorValue = message::SENSOR_VALUE,

    /// Port output command feedback (0x82)
    ///
    /// - Payload: `[port][feedback]`, repeated
    PortAction = message::PORT_ACTION,
}

impl MessageType {
    /// Try to convert a byte to a MessageType
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            message::HUB_PROPERTY => Some(Self::HubProperty),
            message::PORT_ATTACH => Some(Self::PortAttach),
            message::SENSOR_VALUE => Some(Self::SensorValue),
            message::PORT_ACTION => Some(Self::PortAction),
            _ => None,
        }
    }
}

/// Hub properties reported through [`MessageType::HubProperty`]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubProperty {
    /// Green button state, `0x01` pressed and `0x00` released
    Button = 0x02,
    /// Firmware version, packed i32 LE
    FirmwareVersion = 0x03,
    /// Hardware version, packed i32 LE
    HardwareVersion = 0x04,
    /// Signal strength in dBm, i8
    Rssi = 0x05,
    /// Battery level in percent
    Battery = 0x06,
}

impl HubProperty {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x02 => Some(Self::Button),
            0x03 => Some(Self::FirmwareVersion),
            0x04 => Some(Self::HardwareVersion),
            0x05 => Some(Self::Rssi),
            0x06 => Some(Self::Battery),
            _ => None,
        }
    }
}

/// Operations accepted by a hub property request
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOperation {
    EnableUpdates = 0x02,
    DisableUpdates = 0x03,
    RequestUpdate = 0x05,
}

/// Event byte of a [`MessageType::PortAttach`] message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachEvent {
    Detached,
    Attached,
    /// Two physical ports combined into one virtual port
    AttachedVirtual,
}

impl AttachEvent {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Detached),
            0x01 => Some(Self::Attached),
            0x02 => Some(Self::AttachedVirtual),
            _ => None,
        }
    }

    pub fn is_attached(self) -> bool {
        !matches!(self, Self::Detached)
    }
}

/// Firmware or hardware version as reported by the hub.
///
/// Packed as `[build: u16][bugfix: u8][minor: u4][major: u4]` little-endian;
/// each field is rendered in hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub bugfix: u8,
    pub build: u16,
}

impl Version {
    pub fn from_packed(packed: i32) -> Self {
        let raw = packed as u32;
        Self {
            major: (raw >> 28) as u8,
            minor: ((raw >> 24) & 0x0f) as u8,
            bugfix: (raw >> 16) as u8,
            build: raw as u16,
        }
    }
}

impl core::fmt::Display for Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:x}.{:x}.{:02x}.{:04x}",
            self.major, self.minor, self.bugfix, self.build
        )
    }
}
