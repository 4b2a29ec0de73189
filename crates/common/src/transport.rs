use async_trait::async_trait;

use crate::{Result, TelemetryMessage};

/// One-way outbound channel for telemetry events.
///
/// `IotHubClient` implements this for the cloud endpoint.
/// `RecordingTransport` implements this for dry runs.
///
/// Delivery guarantees are the transport's business. Callers hand the message
/// over and at most log a failure; nothing upstream retries or waits on it.
#[async_trait]
pub trait TelemetryTransport: Send + Sync {
    /// Publish one event with its application properties.
    async fn send_event(&self, message: &TelemetryMessage) -> Result<()>;
}
