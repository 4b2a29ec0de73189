use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use common::{TelemetryMessage, TelemetryTransport};

/// Hands classified messages to the transport without waiting on delivery.
///
/// This is the ONLY component that calls `TelemetryTransport::send_event`.
/// A failed send is logged and dropped; there is no retry.
#[derive(Clone)]
pub struct TelemetryPublisher {
    transport: Arc<dyn TelemetryTransport>,
}

impl TelemetryPublisher {
    pub fn new(transport: Arc<dyn TelemetryTransport>) -> Self {
        Self { transport }
    }

    /// Fire and forget. Must be called from within a Tokio runtime.
    pub fn dispatch(&self, message: TelemetryMessage) -> JoinHandle<()> {
        let transport = self.transport.clone();
        tokio::spawn(async move {
            match transport.send_event(&message).await {
                Ok(()) => {
                    debug!(
                        id = %message.message_id,
                        symbol = %message.symbol_name,
                        trigger = %message.trigger,
                        "Telemetry delivered"
                    );
                }
                Err(e) => {
                    warn!(
                        id = %message.message_id,
                        symbol = %message.symbol_name,
                        trigger = %message.trigger,
                        error = %e,
                        "Telemetry send failed, dropping message"
                    );
                }
            }
        })
    }
}
