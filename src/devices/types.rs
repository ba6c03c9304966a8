//! Device kinds reported by port attach messages

/// Semantic kind of a device attached to a hub port.
///
/// Codes are the values carried in the attach message; anything not known
/// to the hub variant resolves to [`DeviceType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Plain motor without rotation sensor (1)
    SimpleMotor,
    /// Train motor (2)
    TrainMotor,
    /// Light bricks (8)
    LightBrick,
    /// Hub internal battery voltage (20)
    VoltageSensor,
    /// Hub internal motor current (21)
    CurrentSensor,
    /// Piezo buzzer (22)
    PiezoBuzzer,
    /// Hub built-in RGB LED (23)
    HubLed,
    /// WeDo 2.0 tilt sensor, tilt encoding generation A (34)
    TiltSensor,
    /// WeDo 2.0 motion (distance) sensor (35)
    MotionSensor,
    /// Boost colour and distance sensor (37)
    ColorDistanceSensor,
    /// Boost interactive motor, with rotation sensor (38)
    InteractiveMotor,
    /// Move hub internal motor, with rotation sensor (39)
    MoveHubMotor,
    /// Move hub internal tilt sensor, tilt encoding generation B (40)
    MoveHubTiltSensor,
    /// Control+ large motor (46)
    ControlPlusLargeMotor,
    /// Control+ XL motor (47)
    ControlPlusXLargeMotor,
    /// Powered Up remote button cluster (55)
    RemoteControlButton,
    /// Control+ hub internal accelerometer (57)
    ControlPlusAccelerometer,
    /// Control+ hub internal gyro (58)
    ControlPlusGyro,
    /// Control+ hub internal tilt, three axes (59)
    ControlPlusTilt,
    /// Control+ hub internal temperature (60)
    ControlPlusTemperature,
    Unknown(u16),
}

impl DeviceType {
    /// Map an attach message device code to a device type.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::SimpleMotor,
            2 => Self::TrainMotor,
            8 => Self::LightBrick,
            20 => Self::VoltageSensor,
            21 => Self::CurrentSensor,
            22 => Self::PiezoBuzzer,
            23 => Self::HubLed,
            34 => Self::TiltSensor,
            35 => Self::MotionSensor,
            37 => Self::ColorDistanceSensor,
            38 => Self::InteractiveMotor,
            39 => Self::MoveHubMotor,
            40 => Self::MoveHubTiltSensor,
            46 => Self::ControlPlusLargeMotor,
            47 => Self::ControlPlusXLargeMotor,
            55 => Self::RemoteControlButton,
            57 => Self::ControlPlusAccelerometer,
            58 => Self::ControlPlusGyro,
            59 => Self::ControlPlusTilt,
            60 => Self::ControlPlusTemperature,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            Self::SimpleMotor => 1,
            Self::TrainMotor => 2,
            Self::LightBrick => 8,
            Self::VoltageSensor => 20,
            Self::CurrentSensor => 21,
            Self::PiezoBuzzer => 22,
            Self::HubLed => 23,
            Self::TiltSensor => 34,
            Self::MotionSensor => 35,
            Self::ColorDistanceSensor => 37,
            Self::InteractiveMotor => 38,
            Self::MoveHubMotor => 39,
            Self::MoveHubTiltSensor => 40,
            Self::ControlPlusLargeMotor => 46,
            Self::ControlPlusXLargeMotor => 47,
            Self::RemoteControlButton => 55,
            Self::ControlPlusAccelerometer => 57,
            Self::ControlPlusGyro => 58,
            Self::ControlPlusTilt => 59,
            Self::ControlPlusTemperature => 60,
            Self::Unknown(code) => code,
        }
    }

    /// Motors that can seek an absolute position
    pub fn supports_absolute_position(self) -> bool {
        matches!(self, Self::ControlPlusLargeMotor | Self::ControlPlusXLargeMotor)
    }

    /// Input mode to enable when the device attaches.
    ///
    /// `None` for devices with nothing to report.
    pub fn input_mode(self) -> Option<u8> {
        match self {
            Self::InteractiveMotor
            | Self::MoveHubMotor
            | Self::ControlPlusLargeMotor
            | Self::ControlPlusXLargeMotor => Some(0x02),
            Self::ColorDistanceSensor => Some(0x08),
            Self::MoveHubTiltSensor => Some(0x04),
            Self::TiltSensor
            | Self::MotionSensor
            | Self::VoltageSensor
            | Self::CurrentSensor
            | Self::RemoteControlButton
            | Self::ControlPlusAccelerometer
            | Self::ControlPlusGyro
            | Self::ControlPlusTilt
            | Self::ControlPlusTemperature => Some(0x00),
            Self::SimpleMotor
            | Self::TrainMotor
            | Self::LightBrick
            | Self::PiezoBuzzer
            | Self::HubLed
            | Self::Unknown(_) => None,
        }
    }
}

/// Devices one hub variant can report in attach messages.
#[derive(Debug, Clone, Copy)]
pub struct DeviceTable {
    known: &'static [DeviceType],
}

impl DeviceTable {
    pub const fn new(known: &'static [DeviceType]) -> Self {
        Self { known }
    }

    /// Resolve a device code, falling back to `Unknown` for devices the
    /// variant does not know.
    pub fn resolve(&self, code: u16) -> DeviceType {
        let device = DeviceType::from_code(code);
        if self.known.contains(&device) {
            device
        } else {
            DeviceType::Unknown(code)
        }
    }
}

/// Devices seen on Boost and Powered Up hubs and the remote
pub static LPF2_DEVICES: DeviceTable = DeviceTable::new(&[
    DeviceType::SimpleMotor,
    DeviceType::TrainMotor,
    DeviceType::LightBrick,
    DeviceType::VoltageSensor,
    DeviceType::CurrentSensor,
    DeviceType::PiezoBuzzer,
    DeviceType::HubLed,
    DeviceType::TiltSensor,
    DeviceType::MotionSensor,
    DeviceType::ColorDistanceSensor,
    DeviceType::InteractiveMotor,
    DeviceType::MoveHubMotor,
    DeviceType::MoveHubTiltSensor,
    DeviceType::ControlPlusLargeMotor,
    DeviceType::ControlPlusXLargeMotor,
    DeviceType::RemoteControlButton,
]);

/// LPF2 devices plus the Control+ hub's internal sensors
pub static CONTROL_PLUS_DEVICES: DeviceTable = DeviceTable::new(&[
    DeviceType::SimpleMotor,
    DeviceType::TrainMotor,
    DeviceType::LightBrick,
    DeviceType::VoltageSensor,
    DeviceType::CurrentSensor,
    DeviceType::PiezoBuzzer,
    DeviceType::HubLed,
    DeviceType::TiltSensor,
    DeviceType::MotionSensor,
    DeviceType::ColorDistanceSensor,
    DeviceType::InteractiveMotor,
    DeviceType::ControlPlusLargeMotor,
    DeviceType::ControlPlusXLargeMotor,
    DeviceType::ControlPlusAccelerometer,
    DeviceType::ControlPlusGyro,
    DeviceType::ControlPlusTilt,
    DeviceType::ControlPlusTemperature,
]);
