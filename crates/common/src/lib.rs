pub mod config;
pub mod connection;
pub mod error;
pub mod switch;
pub mod transport;
pub mod types;

pub use config::{Config, TransportMode};
pub use connection::ConnectionString;
pub use error::{Error, Result};
pub use switch::TelemetrySwitch;
pub use transport::TelemetryTransport;
pub use types::*;
