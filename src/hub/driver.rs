//! Per-connection hub driver
//!
//! Ties the frame assembler, dispatcher and command encoder to one
//! [`HubLink`]. Notification chunks go in through
//! [`Hub::handle_notification`]; commands go out through the `set_*`
//! methods and return a [`Completion`] that does not borrow the hub.

use crate::commands::encoder::CommandEncoder;
use crate::commands::types::{Color, Command};
use crate::config::defaults;
use crate::config::motor::DEFAULT_SPEED;
use crate::dispatcher::MessageDispatcher;
use crate::hub::completion::{Completion, CompletionError};
use crate::hub::error::HubError;
use crate::hub::event::HubEvent;
use crate::hub::port::{Port, PortTable};
use crate::hub::variant::HubVariant;
use crate::link::{HubLink, LinkError};
use crate::protocol::framing::FrameAssembler;
use crate::protocol::message::{HubProperty, PropertyOperation};
use alloc::vec::Vec;

/// Runtime options for a [`Hub`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    /// Enable sensor notifications for each device as it attaches
    pub auto_subscribe: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            auto_subscribe: defaults::AUTO_SUBSCRIBE,
        }
    }
}

/// Driver for one connected hub
pub struct Hub<L: HubLink> {
    link: L,
    variant: &'static HubVariant,
    config: HubConfig,
    ports: PortTable,
    assembler: FrameAssembler,
    dispatcher: MessageDispatcher,
    encoder: CommandEncoder,
    connected: bool,
}

impl<L: HubLink> Hub<L> {
    /// Create a driver with the default configuration
    pub fn new(link: L, variant: &'static HubVariant) -> Self {
        Self::with_config(link, variant, HubConfig::default())
    }

    pub fn with_config(link: L, variant: &'static HubVariant, config: HubConfig) -> Self {
        Self {
            link,
            variant,
            config,
            ports: PortTable::new(variant.ports),
            assembler: FrameAssembler::new(),
            dispatcher: MessageDispatcher::new(variant),
            encoder: CommandEncoder::new(),
            connected: false,
        }
    }

    pub fn variant(&self) -> &'static HubVariant {
        self.variant
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn port(&self, id: &str) -> Option<&Port> {
        self.ports.get(id)
    }

    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Write the variant's handshake, then enable notifications.
    ///
    /// Calling this on a connected hub does nothing.
    pub async fn connect(&mut self) -> Result<(), HubError> {
        if self.connected {
            return Ok(());
        }

        for frame in self.variant.handshake {
            self.link.write(self.variant.characteristic, frame).await?;
        }
        self.link.subscribe(self.variant.characteristic).await?;

        self.connected = true;
        log::debug!("Connected to {:?}", self.variant.kind);
        Ok(())
    }

    /// Feed a notification chunk and return the events it completed.
    ///
    /// Partial frames are kept until the rest arrives. Failing to enable
    /// notifications for a newly attached device does not drop its events:
    /// a write rejected by the hub is logged, and a link reporting
    /// [`LinkError::Disconnected`] is handled as [`Hub::link_lost`], which
    /// the caller can observe through [`Hub::is_connected`]. Other link
    /// failures are the link owner's to detect.
    pub async fn handle_notification(&mut self, chunk: &[u8]) -> Vec<HubEvent> {
        let mut events = Vec::new();
        for frame in self.assembler.feed(chunk) {
            events.extend(self.dispatcher.dispatch(&frame, &mut self.ports));
        }

        if self.config.auto_subscribe {
            for event in &events {
                if let HubEvent::Attach { port, device } = *event {
                    let Some(mode) = device.input_mode() else {
                        continue;
                    };
                    match self.write_input_format(port, mode, true).await {
                        Ok(()) => {}
                        Err(HubError::Link(LinkError::Disconnected)) => {
                            self.link_lost();
                            break;
                        }
                        Err(error) => {
                            log::warn!("Port {}: failed to enable notifications: {:?}", port, error);
                        }
                    }
                }
            }
        }

        events
    }

    /// Fail every in-flight command, forget attached devices and partial input.
    ///
    /// Call when the link reports a disconnect; `connect` may be called
    /// again afterwards and the hub re-reports its devices.
    pub fn link_lost(&mut self) {
        let failed = self.ports.fail_all(CompletionError::Disconnected);
        self.ports.detach_all();
        self.assembler.reset();
        self.connected = false;
        log::debug!("Link lost, {} pending commands failed", failed);
    }

    /// Run a motor at `speed` (-100..=100, or 127 to brake).
    ///
    /// With a non-zero `time_ms` the completion resolves when the hub
    /// reports the run finished; otherwise it resolves once written.
    pub async fn set_motor_speed(
        &mut self,
        port: &str,
        speed: i32,
        time_ms: Option<u32>,
    ) -> Result<Completion, HubError> {
        self.send(port, Command::MotorSpeed { speed, time_ms }).await
    }

    /// Rotate a tacho motor by `angle` degrees. Negative speeds reverse.
    pub async fn set_motor_angle(
        &mut self,
        port: &str,
        angle: u32,
        speed: Option<i32>,
    ) -> Result<Completion, HubError> {
        let speed = speed.unwrap_or(DEFAULT_SPEED);
        self.send(port, Command::MotorAngle { angle, speed }).await
    }

    /// Move a Control+ motor to an absolute encoder position
    pub async fn set_absolute_position(
        &mut self,
        port: &str,
        position: i32,
        speed: Option<i32>,
    ) -> Result<Completion, HubError> {
        let speed = speed.unwrap_or(DEFAULT_SPEED);
        self.send(port, Command::AbsolutePosition { position, speed })
            .await
    }

    /// Make a Control+ motor's current position its absolute zero
    pub async fn reset_absolute_position(&mut self, port: &str) -> Result<Completion, HubError> {
        self.send(port, Command::ResetAbsolutePosition).await
    }

    pub async fn set_led_color(&mut self, color: Color) -> Result<Completion, HubError> {
        self.ensure_connected()?;
        for frame in self.encoder.led_color(color) {
            self.link.write(self.variant.characteristic, &frame).await?;
        }
        Ok(Completion::ready())
    }

    pub async fn set_led_rgb(&mut self, red: u8, green: u8, blue: u8) -> Result<Completion, HubError> {
        self.ensure_connected()?;
        for frame in self.encoder.led_rgb(red, green, blue) {
            self.link.write(self.variant.characteristic, &frame).await?;
        }
        Ok(Completion::ready())
    }

    /// Enable value notifications from a port in the given sensor mode
    pub async fn subscribe_port(&mut self, port: &str, mode: u8) -> Result<(), HubError> {
        self.ensure_connected()?;
        self.write_input_format(port, mode, true).await
    }

    pub async fn unsubscribe_port(&mut self, port: &str, mode: u8) -> Result<(), HubError> {
        self.ensure_connected()?;
        self.write_input_format(port, mode, false).await
    }

    /// Ask the hub to report a property once
    pub async fn request_property(&mut self, property: HubProperty) -> Result<(), HubError> {
        self.property_operation(property, PropertyOperation::RequestUpdate)
            .await
    }

    /// Turn periodic updates of a property on or off
    pub async fn set_property_updates(
        &mut self,
        property: HubProperty,
        enabled: bool,
    ) -> Result<(), HubError> {
        let operation = if enabled {
            PropertyOperation::EnableUpdates
        } else {
            PropertyOperation::DisableUpdates
        };
        self.property_operation(property, operation).await
    }

    async fn property_operation(
        &mut self,
        property: HubProperty,
        operation: PropertyOperation,
    ) -> Result<(), HubError> {
        self.ensure_connected()?;
        let frame = self.encoder.hub_property(property, operation);
        self.link.write(self.variant.characteristic, &frame).await?;
        Ok(())
    }

    fn ensure_connected(&self) -> Result<(), HubError> {
        if self.connected {
            Ok(())
        } else {
            Err(HubError::NotConnected)
        }
    }

    async fn write_input_format(&mut self, port: &str, mode: u8, notify: bool) -> Result<(), HubError> {
        let value = self.ports.get(port).ok_or(HubError::UnknownPort)?.value();
        let frame = self
            .encoder
            .port_input_format(value, mode, self.variant.opcodes.input_delta, notify);
        self.link.write(self.variant.characteristic, &frame).await?;
        Ok(())
    }

    /// Encode and write a port output command.
    ///
    /// The completion slot is installed before the write so an
    /// acknowledgement can never arrive ahead of it.
    async fn send(&mut self, id: &str, command: Command) -> Result<Completion, HubError> {
        self.ensure_connected()?;
        let port = self.ports.get_mut(id).ok_or(HubError::UnknownPort)?;
        let frame = self.encoder.encode(port, &command)?;

        let waits = command.waits_for_completion();
        let completion = if waits {
            port.begin()
        } else {
            Completion::ready()
        };

        if let Err(error) = self.link.write(self.variant.characteristic, &frame).await {
            if waits {
                if let Some(port) = self.ports.get_mut(id) {
                    port.fail(CompletionError::Link);
                }
            }
            return Err(error.into());
        }

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ble::LPF2_CHARACTERISTIC;
    use crate::devices::DeviceType;
    use crate::hub::variant::{CONTROL_PLUS_HUB, MOVE_HUB, POWERED_UP_HUB, POWERED_UP_REMOTE};
    use crate::link::traits::mock::{LinkOp, MockLink};
    use futures::executor::block_on;

    const ATTACH_MOTOR_A: [u8; 7] = [0x07, 0x00, 0x04, 0x37, 0x01, 0x26, 0x00];
    const DONE_A: [u8; 5] = [0x05, 0x00, 0x82, 0x37, 0x0a];

    fn connected(variant: &'static HubVariant, config: HubConfig) -> Hub<MockLink> {
        let mut hub = Hub::with_config(MockLink::new(), variant, config);
        block_on(hub.connect()).unwrap();
        hub.link_mut().clear();
        hub
    }

    fn quiet() -> HubConfig {
        HubConfig {
            auto_subscribe: false,
        }
    }

    #[test]
    fn test_connect_writes_handshake_then_subscribes() {
        let button_updates = LinkOp::Write(LPF2_CHARACTERISTIC, vec![0x05, 0x00, 0x01, 0x02, 0x02]);
        let temperature_updates = LinkOp::Write(
            LPF2_CHARACTERISTIC,
            vec![0x0a, 0x00, 0x41, 0x3d, 0x00, 0x0a, 0x00, 0x00, 0x00, 0x01],
        );
        let subscribe = LinkOp::Subscribe(LPF2_CHARACTERISTIC);

        let cases: [(&'static HubVariant, Vec<LinkOp>); 4] = [
            (&MOVE_HUB, vec![button_updates.clone(), subscribe.clone()]),
            (&POWERED_UP_HUB, vec![button_updates.clone(), subscribe.clone()]),
            (&POWERED_UP_REMOTE, vec![button_updates.clone(), subscribe.clone()]),
            (
                &CONTROL_PLUS_HUB,
                vec![button_updates.clone(), temperature_updates, subscribe.clone()],
            ),
        ];

        for (variant, expected) in cases {
            let mut hub = Hub::new(MockLink::new(), variant);

            block_on(async {
                hub.connect().await.unwrap();
                hub.connect().await.unwrap();
            });

            assert!(hub.is_connected());
            assert_eq!(hub.link().ops(), expected.as_slice(), "{:?}", variant.kind);
        }
    }

    #[test]
    fn test_connect_failure_leaves_hub_disconnected() {
        let mut link = MockLink::new();
        link.set_next_subscribe_error(LinkError::SubscribeFailed);
        let mut hub = Hub::new(link, &MOVE_HUB);

        let result = block_on(hub.connect());

        assert_eq!(result, Err(HubError::Link(LinkError::SubscribeFailed)));
        assert!(!hub.is_connected());
    }

    #[test]
    fn test_commands_before_connect() {
        let mut hub = Hub::new(MockLink::new(), &MOVE_HUB);

        let result = block_on(hub.set_motor_speed("A", 50, None));

        assert!(matches!(result, Err(HubError::NotConnected)));
        assert!(hub.link().ops().is_empty());
    }

    #[test]
    fn test_unknown_port() {
        let mut hub = connected(&POWERED_UP_HUB, quiet());

        let result = block_on(hub.set_motor_speed("C", 50, None));

        assert!(matches!(result, Err(HubError::UnknownPort)));
        assert!(hub.link().ops().is_empty());
    }

    #[test]
    fn test_timed_command_resolves_on_acknowledgement() {
        let mut hub = connected(&MOVE_HUB, quiet());

        block_on(async {
            let mut completion = hub.set_motor_speed("A", 50, Some(2000)).await.unwrap();
            assert_eq!(
                hub.link().writes(),
                vec![vec![0x0c, 0x00, 0x81, 0x37, 0x11, 0x09, 0xd0, 0x07, 0x32, 0x64, 0x7f, 0x03]]
            );
            assert!(hub.port("A").unwrap().is_busy());
            assert_eq!(completion.try_result(), None);

            let events = hub.handle_notification(&DONE_A).await;
            assert_eq!(events, vec![HubEvent::ActionComplete { port: "A" }]);
            assert!(!hub.port("A").unwrap().is_busy());
            assert_eq!(completion.await, Ok(()));
        });
    }

    #[test]
    fn test_untimed_command_resolves_on_write() {
        let mut hub = connected(&MOVE_HUB, quiet());

        block_on(async {
            let completion = hub.set_motor_speed("B", -40, Some(0)).await.unwrap();
            assert_eq!(completion.await, Ok(()));
            assert!(!hub.port("B").unwrap().is_busy());
        });
    }

    #[test]
    fn test_second_command_supersedes_first() {
        let mut hub = connected(&MOVE_HUB, quiet());

        block_on(async {
            let first = hub.set_motor_angle("A", 90, Some(20)).await.unwrap();
            let second = hub.set_motor_angle("A", 180, None).await.unwrap();

            hub.handle_notification(&DONE_A).await;

            assert_eq!(first.await, Err(CompletionError::Superseded));
            assert_eq!(second.await, Ok(()));
        });
    }

    #[test]
    fn test_write_failure_fails_the_command() {
        let mut hub = connected(&MOVE_HUB, quiet());
        hub.link_mut().set_next_write_error(LinkError::WriteFailed);

        let result = block_on(hub.set_motor_speed("A", 50, Some(1000)));

        assert!(matches!(result, Err(HubError::Link(LinkError::WriteFailed))));
        let port = hub.port("A").unwrap();
        assert!(!port.is_busy());
        assert!(!port.has_pending());
    }

    #[test]
    fn test_absolute_position_requires_capable_motor() {
        let mut hub = connected(&CONTROL_PLUS_HUB, quiet());

        block_on(async {
            let result = hub.set_absolute_position("A", 90, None).await;
            assert!(matches!(result, Err(HubError::UnsupportedDevice)));
            assert!(hub.link().ops().is_empty());

            hub.handle_notification(&[0x07, 0x00, 0x04, 0x00, 0x01, 0x2f, 0x00])
                .await;
            let completion = hub.set_absolute_position("A", 90, Some(30)).await.unwrap();
            assert_eq!(
                hub.link().writes(),
                vec![vec![0x0e, 0x00, 0x81, 0x00, 0x11, 0x0d, 0x5a, 0x00, 0x00, 0x00, 0x1e, 0x64, 0x7f, 0x03]]
            );

            hub.handle_notification(&[0x05, 0x00, 0x82, 0x00, 0x0a]).await;
            assert_eq!(completion.await, Ok(()));

            let reset = hub.reset_absolute_position("A").await.unwrap();
            assert_eq!(reset.await, Ok(()));
        });
    }

    #[test]
    fn test_attach_auto_subscribes() {
        let mut hub = connected(&MOVE_HUB, HubConfig::default());

        let events = block_on(hub.handle_notification(&ATTACH_MOTOR_A));

        assert_eq!(
            events,
            vec![HubEvent::Attach {
                port: "A",
                device: DeviceType::InteractiveMotor
            }]
        );
        assert_eq!(
            hub.link().writes(),
            vec![vec![0x0a, 0x00, 0x41, 0x37, 0x02, 0x01, 0x00, 0x00, 0x00, 0x01]]
        );
    }

    #[test]
    fn test_auto_subscribe_failures_keep_events() {
        let mut hub = connected(&MOVE_HUB, HubConfig::default());
        hub.link_mut().set_next_write_error(LinkError::WriteFailed);

        let events = block_on(hub.handle_notification(&ATTACH_MOTOR_A));
        assert_eq!(events.len(), 1);
        assert!(hub.is_connected());

        hub.link_mut().set_next_write_error(LinkError::Disconnected);
        let events = block_on(hub.handle_notification(&[0x07, 0x00, 0x04, 0x38, 0x01, 0x26, 0x00]));
        assert_eq!(
            events,
            vec![HubEvent::Attach {
                port: "B",
                device: DeviceType::InteractiveMotor
            }]
        );
        assert!(!hub.is_connected());
        assert!(hub.link().ops().is_empty());
    }

    #[test]
    fn test_attach_without_auto_subscribe() {
        let mut hub = connected(&MOVE_HUB, quiet());

        block_on(hub.handle_notification(&ATTACH_MOTOR_A));

        assert!(hub.link().ops().is_empty());
        assert_eq!(hub.port("A").unwrap().device(), Some(DeviceType::InteractiveMotor));
    }

    #[test]
    fn test_notifications_split_across_chunks() {
        let mut hub = connected(&MOVE_HUB, quiet());

        block_on(async {
            let mut stream = ATTACH_MOTOR_A.to_vec();
            stream.extend_from_slice(&[0x08, 0x00, 0x45, 0x37, 0x5a, 0x00, 0x00, 0x00]);

            let first = hub.handle_notification(&stream[..9]).await;
            assert_eq!(first.len(), 1);

            let second = hub.handle_notification(&stream[9..]).await;
            assert_eq!(
                second,
                vec![HubEvent::Rotation {
                    port: "A",
                    degrees: 90
                }]
            );
        });
    }

    #[test]
    fn test_led_color() {
        let mut hub = connected(&POWERED_UP_HUB, quiet());

        let completion = block_on(hub.set_led_color(Color::Red)).unwrap();

        assert_eq!(block_on(completion), Ok(()));
        assert_eq!(
            hub.link().writes(),
            vec![
                vec![0x05, 0x00, 0x01, 0x02, 0x02],
                vec![0x08, 0x00, 0x81, 0x32, 0x11, 0x51, 0x00, 0x09],
            ]
        );
    }

    #[test]
    fn test_request_property() {
        let mut hub = connected(&CONTROL_PLUS_HUB, quiet());

        block_on(hub.request_property(HubProperty::Battery)).unwrap();
        block_on(hub.subscribe_port("TEMP", 0x00)).unwrap();

        assert_eq!(
            hub.link().writes(),
            vec![
                vec![0x05, 0x00, 0x01, 0x06, 0x05],
                vec![0x0a, 0x00, 0x41, 0x3d, 0x00, 0x0a, 0x00, 0x00, 0x00, 0x01],
            ]
        );
    }

    #[test]
    fn test_link_lost_fails_pending() {
        let mut hub = connected(&MOVE_HUB, quiet());

        block_on(async {
            hub.handle_notification(&[0x07, 0x00, 0x04, 0x38, 0x01, 0x26, 0x00])
                .await;
            let completion = hub.set_motor_angle("B", 360, None).await.unwrap();
            hub.handle_notification(&[0x05, 0x00]).await;

            hub.link_lost();

            assert_eq!(completion.await, Err(CompletionError::Disconnected));
            assert!(!hub.is_connected());
            let port = hub.port("B").unwrap();
            assert!(!port.is_busy());
            assert!(!port.is_connected());
            assert_eq!(port.device(), None);
        });
    }
}
