//! Inbound message dispatcher
//!
//! Routes each assembled frame on its message type byte, updates port state
//! and turns the frame into [`HubEvent`]s for the caller.

use crate::commands::types::{Button, ButtonState};
use crate::config::protocol::FEEDBACK_COMPLETED;
use crate::hub::event::HubEvent;
use crate::hub::port::PortTable;
use crate::hub::variant::HubVariant;
use crate::protocol::framing::Frame;
use crate::protocol::message::{AttachEvent, HubProperty, MessageType, Version};
use alloc::vec::Vec;

/// Message dispatcher for one hub variant
pub struct MessageDispatcher {
    variant: &'static HubVariant,
}

impl MessageDispatcher {
    /// Create a new message dispatcher
    pub fn new(variant: &'static HubVariant) -> Self {
        Self { variant }
    }

    /// Dispatch a frame and return the events it produced
    ///
    /// Unknown message types and ports produce nothing.
    pub fn dispatch(&self, frame: &Frame, ports: &mut PortTable) -> Vec<HubEvent> {
        let mut events = Vec::new();
        let payload = frame.payload();

        match MessageType::from_byte(frame.message_type()) {
            Some(MessageType::HubProperty) => self.handle_property(payload, &mut events),
            Some(MessageType::PortAttach) => self.handle_attach(payload, ports, &mut events),
            Some(MessageType::SensorValue) => self.handle_sensor(payload, ports, &mut events),
            Some(MessageType::PortAction) => self.handle_action(payload, ports, &mut events),
            None => {
                log::trace!("Ignoring message type {:#04x}", frame.message_type());
            }
        }

        events
    }

    /// Handle a hub property update: `[property][operation][value...]`
    fn handle_property(&self, payload: &[u8], events: &mut Vec<HubEvent>) {
        let Some(property) = payload.first().copied().and_then(HubProperty::from_byte) else {
            log::trace!("Ignoring hub property {:?}", payload.first());
            return;
        };
        let value = payload.get(2..).unwrap_or_default();

        let event = match property {
            HubProperty::Button => match value.first() {
                Some(0x01) => Some(HubEvent::Button {
                    button: Button::Green,
                    state: ButtonState::Pressed,
                }),
                Some(0x00) => Some(HubEvent::Button {
                    button: Button::Green,
                    state: ButtonState::Released,
                }),
                _ => None,
            },
            HubProperty::FirmwareVersion => read_i32(value)
                .map(|packed| HubEvent::FirmwareVersion(Version::from_packed(packed))),
            HubProperty::HardwareVersion => read_i32(value)
                .map(|packed| HubEvent::HardwareVersion(Version::from_packed(packed))),
            HubProperty::Rssi => value.first().map(|&dbm| HubEvent::Rssi { dbm: dbm as i8 }),
            HubProperty::Battery => value.first().map(|&percent| HubEvent::Battery { percent }),
        };

        events.extend(event);
    }

    /// Handle attach/detach: `[port][event][device type lo][device type hi]`
    fn handle_attach(&self, payload: &[u8], ports: &mut PortTable, events: &mut Vec<HubEvent>) {
        let (Some(&value), Some(&event)) = (payload.first(), payload.get(1)) else {
            return;
        };
        let Some(port) = ports.by_value_mut(value) else {
            log::trace!("Attach message for unknown port {}", value);
            return;
        };
        let Some(event) = AttachEvent::from_byte(event) else {
            log::trace!("Ignoring attach event {:#04x} on port {}", event, port.id());
            return;
        };

        if !event.is_attached() {
            log::debug!("Port {}: detached", port.id());
            port.detach();
            events.push(HubEvent::Detach { port: port.id() });
            return;
        }

        // Some firmware omits the device type; the port is still occupied
        let code = match payload.get(2..4) {
            Some(bytes) => u16::from_le_bytes([bytes[0], bytes[1]]),
            None => payload.get(2).map_or(0, |&byte| byte as u16),
        };
        let device = self.variant.devices.resolve(code);

        log::debug!("Port {}: attached {:?}", port.id(), device);
        port.attach(device);
        events.push(HubEvent::Attach {
            port: port.id(),
            device,
        });
    }

    /// Handle a sensor value: `[port][value...]`
    fn handle_sensor(&self, payload: &[u8], ports: &mut PortTable, events: &mut Vec<HubEvent>) {
        let Some((&value, data)) = payload.split_first() else {
            return;
        };
        let Some(port) = ports.by_value(value) else {
            log::trace!("Sensor value for unknown port {}", value);
            return;
        };
        let Some(device) = port.device().filter(|_| port.is_connected()) else {
            log::trace!("Sensor value for empty port {}", port.id());
            return;
        };

        events.extend(self.variant.decoders.decode(device, port.id(), data));
    }

    /// Handle port action feedback: `[port][feedback]`, repeated
    fn handle_action(&self, payload: &[u8], ports: &mut PortTable, events: &mut Vec<HubEvent>) {
        for pair in payload.chunks_exact(2) {
            let (value, feedback) = (pair[0], pair[1]);
            if feedback != FEEDBACK_COMPLETED {
                continue;
            }
            let Some(port) = ports.by_value_mut(value) else {
                log::trace!("Action feedback for unknown port {}", value);
                continue;
            };
            if port.complete() {
                log::debug!("Port {}: command complete", port.id());
                events.push(HubEvent::ActionComplete { port: port.id() });
            }
        }
    }
}

fn read_i32(data: &[u8]) -> Option<i32> {
    let bytes = data.get(..4)?;
    Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
