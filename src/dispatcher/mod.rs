pub mod handler;

pub use handler::MessageDispatcher;
