pub mod traits;

pub use traits::{HubLink, LinkError};
