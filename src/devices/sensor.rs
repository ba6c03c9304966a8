//! Sensor value decoding
//!
//! Every device type has its own byte layout and scaling. Decoders receive
//! the sensor message payload after the port byte and return zero or more
//! events; a payload too short for the device yields nothing.

use crate::commands::types::{Button, ButtonState, Color};
use crate::devices::DeviceType;
use crate::hub::event::{HubEvent, PortId};
use heapless::Vec;

/// Events decoded from one sensor message
pub type Decoded = Vec<HubEvent, 2>;

/// Decode function for one device type
pub type DecodeFn = fn(PortId, &[u8], &Calibration) -> Decoded;

/// Raw-to-unit scaling for a hub's internal voltage and current sensors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub voltage_max_raw: f32,
    pub voltage_max_volts: f32,
    pub current_max_raw: f32,
    pub current_max_milliamps: f32,
}

/// Mapping from device type to decoder, selected by the hub variant.
pub struct DecodeTable {
    entries: &'static [(DeviceType, DecodeFn)],
    calibration: Calibration,
}

impl DecodeTable {
    pub const fn new(entries: &'static [(DeviceType, DecodeFn)], calibration: Calibration) -> Self {
        Self {
            entries,
            calibration,
        }
    }

    /// Decode a sensor payload for the given device.
    ///
    /// Devices without a decoder produce no events.
    pub fn decode(&self, device: DeviceType, port: PortId, data: &[u8]) -> Decoded {
        self.entries
            .iter()
            .find(|(kind, _)| *kind == device)
            .map(|(_, decode)| decode(port, data, &self.calibration))
            .unwrap_or_default()
    }
}

impl core::fmt::Debug for DecodeTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecodeTable")
            .field("devices", &self.entries.len())
            .field("calibration", &self.calibration)
            .finish()
    }
}

fn one(event: HubEvent) -> Decoded {
    let mut events = Decoded::new();
    let _ = events.push(event);
    events
}

fn read_i16(data: &[u8], offset: usize) -> Option<i16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(i16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// WeDo 2.0 motion sensor: one distance byte, extended past 255 by a flag
/// byte of 1. Reported in mm.
pub fn decode_motion(port: PortId, data: &[u8], _: &Calibration) -> Decoded {
    let Some(&raw) = data.first() else {
        return Decoded::new();
    };
    let mut distance = raw as i32;
    if data.get(1) == Some(&1) {
        distance += 255;
    }
    one(HubEvent::Distance {
        port,
        distance: distance * 10,
    })
}

/// Boost colour and distance sensor in its combined mode:
/// `[colour][distance][_][partial]`.
pub fn decode_color_distance(port: PortId, data: &[u8], _: &Calibration) -> Decoded {
    let mut events = Decoded::new();
    if data.len() < 4 {
        return events;
    }

    if data[0] <= 10 {
        if let Some(color) = Color::from_byte(data[0]) {
            let _ = events.push(HubEvent::Color { port, color });
        }
    }

    let mut distance = data[1] as f64;
    let partial = data[3];
    if partial > 0 {
        distance += 1.0 / partial as f64;
    }
    // Non-negative, so truncation is floor
    let distance = (distance * 25.4) as i32 - 20;
    let _ = events.push(HubEvent::Distance { port, distance });
    events
}

/// WeDo 2.0 tilt sensor (generation A encoding)
pub fn decode_tilt_wedo(port: PortId, data: &[u8], _: &Calibration) -> Decoded {
    if data.len() < 2 {
        return Decoded::new();
    }
    let (x, y) = (data[0] as i32, data[1] as i32);
    let x = if x > 160 { x - 255 } else { x - x * 2 };
    let y = if y > 160 { 255 - y } else { y - y * 2 };
    one(HubEvent::Tilt { port, x, y, z: None })
}

/// Move hub internal tilt sensor (generation B encoding)
pub fn decode_tilt_move_hub(port: PortId, data: &[u8], _: &Calibration) -> Decoded {
    if data.len() < 2 {
        return Decoded::new();
    }
    let (x, y) = (data[0] as i32, data[1] as i32);
    let x = if x > 160 { x - 255 } else { x };
    let y = if y > 160 { 255 - y } else { y - y * 2 };
    one(HubEvent::Tilt { port, x, y, z: None })
}

/// Tacho motors: cumulative degrees as i32 LE
pub fn decode_rotation(port: PortId, data: &[u8], _: &Calibration) -> Decoded {
    let Some(bytes) = data.get(..4) else {
        return Decoded::new();
    };
    let degrees = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    one(HubEvent::Rotation { port, degrees })
}

/// Powered Up remote: one state byte per button cluster
pub fn decode_remote_button(port: PortId, data: &[u8], _: &Calibration) -> Decoded {
    let button = match port {
        "LEFT" => Button::Left,
        "RIGHT" => Button::Right,
        _ => return Decoded::new(),
    };
    let state = match data.first() {
        Some(0x00) => ButtonState::Released,
        Some(0x01) => ButtonState::Up,
        Some(0x7f) => ButtonState::Stop,
        Some(0xff) => ButtonState::Down,
        _ => return Decoded::new(),
    };
    one(HubEvent::Button { button, state })
}

pub fn decode_voltage(port: PortId, data: &[u8], calibration: &Calibration) -> Decoded {
    let Some(raw) = read_u16(data, 0) else {
        return Decoded::new();
    };
    let volts = raw as f32 * calibration.voltage_max_volts / calibration.voltage_max_raw;
    one(HubEvent::Voltage { port, volts })
}

pub fn decode_current(port: PortId, data: &[u8], calibration: &Calibration) -> Decoded {
    let Some(raw) = read_u16(data, 0) else {
        return Decoded::new();
    };
    let milliamps = raw as f32 * calibration.current_max_milliamps / calibration.current_max_raw;
    one(HubEvent::Current { port, milliamps })
}

/// Tenths of a degree C, i16 LE
pub fn decode_temperature(port: PortId, data: &[u8], _: &Calibration) -> Decoded {
    let Some(raw) = read_i16(data, 0) else {
        return Decoded::new();
    };
    one(HubEvent::Temperature {
        port,
        celsius: raw as f32 / 10.0,
    })
}

fn read_axes(data: &[u8]) -> Option<(i16, i16, i16)> {
    Some((read_i16(data, 0)?, read_i16(data, 2)?, read_i16(data, 4)?))
}

pub fn decode_accelerometer(port: PortId, data: &[u8], _: &Calibration) -> Decoded {
    let Some((x, y, z)) = read_axes(data) else {
        return Decoded::new();
    };
    one(HubEvent::Accelerometer {
        port,
        x: x as f32 / 4.096,
        y: y as f32 / 4.096,
        z: z as f32 / 4.096,
    })
}

pub fn decode_gyro(port: PortId, data: &[u8], _: &Calibration) -> Decoded {
    let Some((x, y, z)) = read_axes(data) else {
        return Decoded::new();
    };
    one(HubEvent::Gyro {
        port,
        x: x as f32 * 7.0 / 400.0,
        y: y as f32 * 7.0 / 400.0,
        z: z as f32 * 7.0 / 400.0,
    })
}

/// Control+ internal tilt: axes arrive as z, y, x with z inverted
pub fn decode_tilt_control_plus(port: PortId, data: &[u8], _: &Calibration) -> Decoded {
    let Some((z, y, x)) = read_axes(data) else {
        return Decoded::new();
    };
    one(HubEvent::Tilt {
        port,
        x: x as i32,
        y: y as i32,
        z: Some(-(z as i32)),
    })
}

/// Decoders for Boost and Powered Up hubs and the remote
pub static LPF2_DECODERS: DecodeTable = DecodeTable::new(
    &[
        (DeviceType::MotionSensor, decode_motion as DecodeFn),
        (DeviceType::ColorDistanceSensor, decode_color_distance as DecodeFn),
        (DeviceType::TiltSensor, decode_tilt_wedo as DecodeFn),
        (DeviceType::MoveHubTiltSensor, decode_tilt_move_hub as DecodeFn),
        (DeviceType::InteractiveMotor, decode_rotation as DecodeFn),
        (DeviceType::MoveHubMotor, decode_rotation as DecodeFn),
        (DeviceType::ControlPlusLargeMotor, decode_rotation as DecodeFn),
        (DeviceType::ControlPlusXLargeMotor, decode_rotation as DecodeFn),
        (DeviceType::RemoteControlButton, decode_remote_button as DecodeFn),
        (DeviceType::VoltageSensor, decode_voltage as DecodeFn),
        (DeviceType::CurrentSensor, decode_current as DecodeFn),
    ],
    Calibration {
        voltage_max_raw: 3893.0,
        voltage_max_volts: 9.615,
        current_max_raw: 4095.0,
        current_max_milliamps: 2444.0,
    },
);

/// Decoders for the Control+ hub, including its internal sensors
pub static CONTROL_PLUS_DECODERS: DecodeTable = DecodeTable::new(
    &[
        (DeviceType::MotionSensor, decode_motion as DecodeFn),
        (DeviceType::ColorDistanceSensor, decode_color_distance as DecodeFn),
        (DeviceType::TiltSensor, decode_tilt_wedo as DecodeFn),
        (DeviceType::InteractiveMotor, decode_rotation as DecodeFn),
        (DeviceType::ControlPlusLargeMotor, decode_rotation as DecodeFn),
        (DeviceType::ControlPlusXLargeMotor, decode_rotation as DecodeFn),
        (DeviceType::VoltageSensor, decode_voltage as DecodeFn),
        (DeviceType::CurrentSensor, decode_current as DecodeFn),
        (DeviceType::ControlPlusTemperature, decode_temperature as DecodeFn),
        (DeviceType::ControlPlusAccelerometer, decode_accelerometer as DecodeFn),
        (DeviceType::ControlPlusGyro, decode_gyro as DecodeFn),
        (DeviceType::ControlPlusTilt, decode_tilt_control_plus as DecodeFn),
    ],
    Calibration {
        voltage_max_raw: 4095.0,
        voltage_max_volts: 9.615,
        current_max_raw: 4095.0,
        current_max_milliamps: 4175.0,
    },
);
