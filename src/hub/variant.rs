//! Hub variant configuration
//!
//! Every supported hub shares one state machine; what differs is captured
//! here as immutable data: the port map, the frames written on connect, the
//! characteristic used for traffic, small opcode differences and the
//! device and decode tables.

use crate::config::ble;
use crate::devices::sensor::{CONTROL_PLUS_DECODERS, LPF2_DECODERS};
use crate::devices::types::{CONTROL_PLUS_DEVICES, LPF2_DEVICES};
use crate::devices::{DecodeTable, DeviceTable};
use crate::hub::port::PortSpec;

/// Concrete hub models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubKind {
    MoveHub,
    PoweredUpHub,
    PoweredUpRemote,
    ControlPlusHub,
}

/// Per-variant values for otherwise identical commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeTable {
    /// Delta interval written in port input format setup
    pub input_delta: u8,
}

/// Immutable description of one hub model.
#[derive(Debug)]
pub struct HubVariant {
    pub kind: HubKind,
    pub ports: &'static [PortSpec],
    /// Frames written once, immediately after the link is established
    pub handshake: &'static [&'static [u8]],
    pub characteristic: &'static str,
    pub opcodes: OpcodeTable,
    pub devices: &'static DeviceTable,
    pub decoders: &'static DecodeTable,
}

/// Enable button updates
const BUTTON_UPDATES: &[u8] = &[0x05, 0x00, 0x01, 0x02, 0x02];

/// Enable temperature notifications on port 0x3d
const TEMPERATURE_UPDATES: &[u8] = &[0x0a, 0x00, 0x41, 0x3d, 0x00, 0x0a, 0x00, 0x00, 0x00, 0x01];

const LPF2_OPCODES: OpcodeTable = OpcodeTable { input_delta: 0x01 };
const CONTROL_PLUS_OPCODES: OpcodeTable = OpcodeTable { input_delta: 0x0a };

pub static MOVE_HUB: HubVariant = HubVariant {
    kind: HubKind::MoveHub,
    ports: &[
        PortSpec::new("A", 55),
        PortSpec::new("B", 56),
        PortSpec::combined("AB", 57),
        PortSpec::new("TILT", 58),
        PortSpec::new("C", 1),
        PortSpec::new("D", 2),
        PortSpec::new("CURRENT", 59),
        PortSpec::new("VOLTAGE", 60),
    ],
    handshake: &[BUTTON_UPDATES],
    characteristic: ble::LPF2_CHARACTERISTIC,
    opcodes: LPF2_OPCODES,
    devices: &LPF2_DEVICES,
    decoders: &LPF2_DECODERS,
};

pub static POWERED_UP_HUB: HubVariant = HubVariant {
    kind: HubKind::PoweredUpHub,
    ports: &[
        PortSpec::new("A", 55),
        PortSpec::new("B", 56),
        PortSpec::combined("AB", 57),
    ],
    handshake: &[BUTTON_UPDATES],
    characteristic: ble::LPF2_CHARACTERISTIC,
    opcodes: LPF2_OPCODES,
    devices: &LPF2_DEVICES,
    decoders: &LPF2_DECODERS,
};

pub static POWERED_UP_REMOTE: HubVariant = HubVariant {
    kind: HubKind::PoweredUpRemote,
    ports: &[PortSpec::new("LEFT", 0), PortSpec::new("RIGHT", 1)],
    handshake: &[BUTTON_UPDATES],
    characteristic: ble::LPF2_CHARACTERISTIC,
    opcodes: LPF2_OPCODES,
    devices: &LPF2_DEVICES,
    decoders: &LPF2_DECODERS,
};

pub static CONTROL_PLUS_HUB: HubVariant = HubVariant {
    kind: HubKind::ControlPlusHub,
    ports: &[
        PortSpec::new("A", 0),
        PortSpec::new("B", 1),
        PortSpec::new("C", 2),
        PortSpec::new("D", 3),
        PortSpec::new("ACCEL", 97),
        PortSpec::new("GYRO", 98),
        PortSpec::new("TILT", 99),
        PortSpec::new("CURRENT", 59),
        PortSpec::new("VOLTAGE", 60),
        PortSpec::new("TEMP", 61),
    ],
    handshake: &[BUTTON_UPDATES, TEMPERATURE_UPDATES],
    characteristic: ble::LPF2_CHARACTERISTIC,
    opcodes: CONTROL_PLUS_OPCODES,
    devices: &CONTROL_PLUS_DEVICES,
    decoders: &CONTROL_PLUS_DECODERS,
};

/// Advertisement fields used to pick a variant
#[derive(Debug, Clone, Copy, Default)]
pub struct Advertisement<'a> {
    pub local_name: Option<&'a str>,
    pub service_uuids: &'a [&'a str],
    pub manufacturer_data: &'a [u8],
}

fn uuid_digits(uuid: &str) -> impl Iterator<Item = char> + '_ {
    uuid.chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
}

/// Compare UUIDs ignoring case and dashes
fn uuid_eq(a: &str, b: &str) -> bool {
    uuid_digits(a).eq(uuid_digits(b))
}

impl HubVariant {
    /// Pick the variant for an advertising device.
    ///
    /// Returns `None` for devices that are not LPF2 hubs.
    pub fn identify(advertisement: &Advertisement<'_>) -> Option<&'static HubVariant> {
        let is_lpf2 = advertisement
            .service_uuids
            .iter()
            .any(|uuid| uuid_eq(uuid, ble::LPF2_SERVICE));
        if !is_lpf2 {
            return None;
        }

        if advertisement.manufacturer_data.get(3) == Some(&ble::CONTROL_PLUS_HUB_ID) {
            return Some(&CONTROL_PLUS_HUB);
        }

        let variant = match advertisement.local_name {
            Some(ble::POWERED_UP_HUB_NAME) => &POWERED_UP_HUB,
            Some(ble::POWERED_UP_REMOTE_NAME) => &POWERED_UP_REMOTE,
            _ => &MOVE_HUB,
        };
        Some(variant)
    }

    pub fn for_kind(kind: HubKind) -> &'static HubVariant {
        match kind {
            HubKind::MoveHub => &MOVE_HUB,
            HubKind::PoweredUpHub => &POWERED_UP_HUB,
            HubKind::PoweredUpRemote => &POWERED_UP_REMOTE,
            HubKind::ControlPlusHub => &CONTROL_PLUS_HUB,
        }
    }
}
