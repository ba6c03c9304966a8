//! Events produced by inbound frames

use crate::commands::types::{Button, ButtonState, Color};
use crate::devices::DeviceType;
use crate::protocol::Version;

/// Port name as declared by the hub variant, e.g. `"A"` or `"TILT"`
pub type PortId = &'static str;

/// A decoded notification.
///
/// Sensor readings carry the port they came from; hub property events
/// describe the hub itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HubEvent {
    Button {
        button: Button,
        state: ButtonState,
    },
    /// Distance in millimetres
    Distance {
        port: PortId,
        distance: i32,
    },
    Color {
        port: PortId,
        color: Color,
    },
    /// Tilt angles; `z` only on three-axis sensors
    Tilt {
        port: PortId,
        x: i32,
        y: i32,
        z: Option<i32>,
    },
    /// Cumulative motor rotation in degrees
    Rotation {
        port: PortId,
        degrees: i32,
    },
    /// Acceleration in mG
    Accelerometer {
        port: PortId,
        x: f32,
        y: f32,
        z: f32,
    },
    /// Angular rate in degrees per second
    Gyro {
        port: PortId,
        x: f32,
        y: f32,
        z: f32,
    },
    Voltage {
        port: PortId,
        volts: f32,
    },
    Current {
        port: PortId,
        milliamps: f32,
    },
    Temperature {
        port: PortId,
        celsius: f32,
    },
    Battery {
        percent: u8,
    },
    Rssi {
        dbm: i8,
    },
    FirmwareVersion(Version),
    HardwareVersion(Version),
    Attach {
        port: PortId,
        device: DeviceType,
    },
    Detach {
        port: PortId,
    },
    /// A timed or positional command on this port finished
    ActionComplete {
        port: PortId,
    },
}
