pub mod iothub;
pub mod recording;

pub use iothub::{sas_token, IotHubClient};
pub use recording::RecordingTransport;
