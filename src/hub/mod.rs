pub mod completion;
pub mod driver;
pub mod error;
pub mod event;
pub mod port;
pub mod variant;

pub use completion::{Completion, CompletionError, CompletionResult};
pub use driver::{Hub, HubConfig};
pub use error::HubError;
pub use event::{HubEvent, PortId};
pub use port::{Port, PortSpec, PortTable};
pub use variant::{Advertisement, HubKind, HubVariant};
