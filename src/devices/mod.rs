pub mod sensor;
pub mod types;

pub use sensor::{Calibration, DecodeFn, DecodeTable, Decoded};
pub use types::{DeviceTable, DeviceType};
