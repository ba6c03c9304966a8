//! Per-port connection, device and completion state

use crate::devices::DeviceType;
use crate::hub::completion::{Completion, CompletionError, CompletionSender};
use crate::hub::event::PortId;
use heapless::Vec;

/// Most ports declared by any hub variant
pub const MAX_PORTS: usize = 12;

/// Static description of a port in a hub variant's port map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    pub id: PortId,
    /// Port number on the wire
    pub value: u8,
    /// Two physical ports driven as one
    pub is_virtual: bool,
}

impl PortSpec {
    pub const fn new(id: PortId, value: u8) -> Self {
        Self {
            id,
            value,
            is_virtual: false,
        }
    }

    pub const fn combined(id: PortId, value: u8) -> Self {
        Self {
            id,
            value,
            is_virtual: true,
        }
    }
}

/// Live state of one port.
///
/// A port is busy while a timed or positional command is in flight, and
/// holds at most one unfired completion.
#[derive(Debug)]
pub struct Port {
    spec: PortSpec,
    connected: bool,
    device: Option<DeviceType>,
    busy: bool,
    pending: Option<CompletionSender>,
}

impl Port {
    pub fn new(spec: PortSpec) -> Self {
        Self {
            spec,
            connected: false,
            device: None,
            busy: false,
            pending: None,
        }
    }

    pub fn id(&self) -> PortId {
        self.spec.id
    }

    pub fn value(&self) -> u8 {
        self.spec.value
    }

    pub fn is_virtual(&self) -> bool {
        self.spec.is_virtual
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn device(&self) -> Option<DeviceType> {
        self.device
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn attach(&mut self, device: DeviceType) {
        self.connected = true;
        self.device = Some(device);
    }

    pub(crate) fn detach(&mut self) {
        self.connected = false;
        self.device = None;
    }

    /// Mark the port busy and install a new completion slot.
    ///
    /// A slot left over from an unfinished command is resolved with
    /// [`CompletionError::Superseded`].
    pub(crate) fn begin(&mut self) -> Completion {
        let (sender, completion) = Completion::pending();
        if let Some(previous) = self.pending.replace(sender) {
            log::warn!("Port {}: command superseded before completion", self.spec.id);
            let _ = previous.send(Err(CompletionError::Superseded));
        }
        self.busy = true;
        completion
    }

    /// Clear busy and fire the slot. Returns false if nothing was pending.
    pub(crate) fn complete(&mut self) -> bool {
        self.busy = false;
        match self.pending.take() {
            Some(sender) => {
                let _ = sender.send(Ok(()));
                true
            }
            None => false,
        }
    }

    /// Clear busy and fail the slot. Returns false if nothing was pending.
    pub(crate) fn fail(&mut self, error: CompletionError) -> bool {
        self.busy = false;
        match self.pending.take() {
            Some(sender) => {
                let _ = sender.send(Err(error));
                true
            }
            None => false,
        }
    }
}

/// All ports of one hub, in the variant's declaration order
#[derive(Debug)]
pub struct PortTable {
    ports: Vec<Port, MAX_PORTS>,
}

impl PortTable {
    /// Create one port per spec. Specs beyond [`MAX_PORTS`] are ignored.
    pub fn new(specs: &[PortSpec]) -> Self {
        let mut ports = Vec::new();
        for spec in specs {
            if ports.push(Port::new(*spec)).is_err() {
                log::warn!("Port table full, ignoring port {}", spec.id);
                break;
            }
        }
        Self { ports }
    }

    pub fn get(&self, id: &str) -> Option<&Port> {
        self.ports.iter().find(|port| port.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Port> {
        self.ports.iter_mut().find(|port| port.id() == id)
    }

    pub fn by_value(&self, value: u8) -> Option<&Port> {
        self.ports.iter().find(|port| port.value() == value)
    }

    pub fn by_value_mut(&mut self, value: u8) -> Option<&mut Port> {
        self.ports.iter_mut().find(|port| port.value() == value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    /// Forget every attached device
    pub(crate) fn detach_all(&mut self) {
        for port in self.ports.iter_mut() {
            port.detach();
        }
    }

    /// Fail every pending completion. Returns how many were failed.
    pub(crate) fn fail_all(&mut self, error: CompletionError) -> usize {
        self.ports
            .iter_mut()
            .map(|port| port.fail(error))
            .filter(|&failed| failed)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: [PortSpec; 3] = [
        PortSpec::new("A", 55),
        PortSpec::new("B", 56),
        PortSpec::combined("AB", 57),
    ];

    #[test]
    fn test_lookup_by_id_and_value() {
        let table = PortTable::new(&SPECS);

        assert_eq!(table.get("B").map(Port::value), Some(56));
        assert_eq!(table.by_value(57).map(Port::id), Some("AB"));
        assert!(table.by_value(57).unwrap().is_virtual());
        assert!(table.get("Z").is_none());
        assert!(table.by_value(1).is_none());
    }

    #[test]
    fn test_attach_and_detach() {
        let mut port = Port::new(SPECS[0]);

        port.attach(DeviceType::InteractiveMotor);
        assert!(port.is_connected());
        assert_eq!(port.device(), Some(DeviceType::InteractiveMotor));

        port.detach();
        assert!(!port.is_connected());
        assert_eq!(port.device(), None);
    }

    #[test]
    fn test_complete_fires_once() {
        let mut port = Port::new(SPECS[0]);

        let mut completion = port.begin();
        assert!(port.is_busy());
        assert!(port.has_pending());

        assert!(port.complete());
        assert!(!port.is_busy());
        assert_eq!(completion.try_result(), Some(Ok(())));

        // Second acknowledgement is a no-op
        assert!(!port.complete());
    }

    #[test]
    fn test_begin_supersedes_pending() {
        let mut port = Port::new(SPECS[0]);

        let mut first = port.begin();
        let mut second = port.begin();
        assert_eq!(first.try_result(), Some(Err(CompletionError::Superseded)));
        assert_eq!(second.try_result(), None);

        port.complete();
        assert_eq!(second.try_result(), Some(Ok(())));
    }

    #[test]
    fn test_fail_all() {
        let mut table = PortTable::new(&SPECS);

        let mut a = table.get_mut("A").unwrap().begin();
        let mut ab = table.get_mut("AB").unwrap().begin();

        assert_eq!(table.fail_all(CompletionError::Disconnected), 2);
        assert_eq!(a.try_result(), Some(Err(CompletionError::Disconnected)));
        assert_eq!(ab.try_result(), Some(Err(CompletionError::Disconnected)));
        assert!(table.iter().all(|port| !port.is_busy()));
    }

    #[test]
    fn test_detach_all() {
        let mut table = PortTable::new(&SPECS);
        table.get_mut("A").unwrap().attach(DeviceType::InteractiveMotor);
        table.get_mut("B").unwrap().attach(DeviceType::ColorDistanceSensor);

        table.detach_all();

        assert!(table
            .iter()
            .all(|port| !port.is_connected() && port.device().is_none()));
    }
}
