use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use common::{Result, TelemetryMessage, TelemetryTransport};

/// Dry-run transport.
///
/// Messages are logged and kept in memory. Nothing is sent to the cloud.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<RwLock<Vec<TelemetryMessage>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        info!("RecordingTransport initialized, telemetry stays local");
        Self::default()
    }

    /// Everything sent so far, oldest first.
    pub async fn sent(&self) -> Vec<TelemetryMessage> {
        self.sent.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.sent.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sent.read().await.is_empty()
    }
}

#[async_trait]
impl TelemetryTransport for RecordingTransport {
    async fn send_event(&self, message: &TelemetryMessage) -> Result<()> {
        info!(
            id = %message.message_id,
            body = %message.body_json()?,
            symbol = %message.symbol_name,
            renkomode = %message.renko_mode,
            trigger = %message.trigger,
            "Dry-run telemetry"
        );
        self.sent.write().await.push(message.clone());
        Ok(())
    }
}
