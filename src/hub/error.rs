use crate::link::LinkError;

/// Errors returned to callers of [`crate::hub::Hub`] commands
///
/// Everything except `Link` is reported before any bytes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubError {
    /// The link failed while sending
    Link(LinkError),
    /// No port with that name on this hub
    UnknownPort,
    /// The attached device cannot perform the command
    UnsupportedDevice,
    /// `connect` has not completed
    NotConnected,
}

impl From<LinkError> for HubError {
    fn from(error: LinkError) -> Self {
        Self::Link(error)
    }
}

impl core::fmt::Display for HubError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Link(error) => write!(f, "link error: {:?}", error),
            Self::UnknownPort => f.write_str("unknown port"),
            Self::UnsupportedDevice => f.write_str("command not supported by the attached device"),
            Self::NotConnected => f.write_str("hub not connected"),
        }
    }
}
