use std::sync::atomic::{AtomicBool, Ordering};

/// Telemetry enablement shared between the command router (writer) and the
/// bot (reader).
///
/// Two flags:
/// - `enabled`: send one message per completed bar while set.
/// - `send_once`: armed by `enable()`, consumed by the first price update
///   after it so the watcher gets an immediate reading.
///
/// Starts disabled and disarmed. Never persisted.
#[derive(Debug, Default)]
pub struct TelemetrySwitch {
    enabled: AtomicBool,
    send_once: AtomicBool,
}

impl TelemetrySwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disabled → Enabled, and arm the one-shot send.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
        self.send_once.store(true, Ordering::SeqCst);
    }

    /// Enabled → Disabled, and disarm the one-shot send.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        self.send_once.store(false, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn is_armed(&self) -> bool {
        self.send_once.load(Ordering::SeqCst)
    }

    /// Returns `true` exactly once per `enable()`.
    pub fn take_send_once(&self) -> bool {
        self.send_once.swap(false, Ordering::SeqCst)
    }
}
