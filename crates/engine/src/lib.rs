pub mod executor;
pub mod lifecycle;

pub use executor::TelemetryPublisher;
pub use lifecycle::{Bot, BotHandle, HostEvent};
