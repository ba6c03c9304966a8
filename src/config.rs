//! Protocol and radio constants for LPF2 hubs

/// Wire protocol constants
pub mod protocol {
    /// Smallest valid frame: length, hub id, message type
    pub const MIN_FRAME_LEN: usize = 3;

    /// Largest frame expressible with the single-byte length form
    pub const MAX_FRAME_LEN: usize = 127;

    /// Hub id byte written into every outbound frame
    pub const HUB_ID: u8 = 0x00;

    /// Largest outbound command frame
    pub const MAX_COMMAND_LEN: usize = 20;

    /// Port action feedback value meaning "command completed, port idle"
    pub const FEEDBACK_COMPLETED: u8 = 0x0a;

    /// Port number of the hub's built-in LED
    pub const LED_PORT: u8 = 0x32;
}

/// Message type bytes (frame offset 2)
pub mod message {
    pub const HUB_PROPERTY: u8 = 0x01;
    pub const PORT_ATTACH: u8 = 0x04;
    pub const PORT_INPUT_FORMAT_SETUP: u8 = 0x41;
    pub const SENSOR_VALUE: u8 = 0x45;
    pub const PORT_OUTPUT: u8 = 0x81;
    pub const PORT_ACTION: u8 = 0x82;
}

/// BLE identification data
pub mod ble {
    /// Service advertised by every LPF2 hub
    pub const LPF2_SERVICE: &str = "00001623-1212-efde-1623-785feabcd123";

    /// Characteristic carrying both commands and notifications
    pub const LPF2_CHARACTERISTIC: &str = "00001624-1212-efde-1623-785feabcd123";

    pub const POWERED_UP_HUB_NAME: &str = "HUB NO.4";
    pub const POWERED_UP_REMOTE_NAME: &str = "Handset";

    /// Manufacturer data byte 3 identifying a Control+ hub
    pub const CONTROL_PLUS_HUB_ID: u8 = 0x80;
}

/// Motor command defaults
pub mod motor {
    /// Speed value passed through unmapped, meaning brake and hold
    pub const BRAKE: i32 = 127;

    pub const MAX_SPEED: i32 = 100;

    /// Longest duration a timed speed command can encode, in ms
    pub const MAX_TIME_MS: u32 = 65_535;

    /// Speed used by angle and position commands when the caller has no preference
    pub const DEFAULT_SPEED: i32 = 100;

    /// Trailing max-power, end-state and profile bytes of every output command
    pub const MAX_POWER: u8 = 0x64;
    pub const END_STATE_HOLD: u8 = 0x7f;
    pub const USE_PROFILE: u8 = 0x03;
}

/// Runtime defaults
pub mod defaults {
    /// Enable sensor notifications as soon as a device attaches
    pub const AUTO_SUBSCRIBE: bool = true;
}
