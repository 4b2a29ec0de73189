use std::sync::Arc;

use tracing::{info, warn};

use common::{CommandRequest, CommandResponse, TelemetrySwitch};

use crate::command::{RouteError, WatcherCommand};

/// Name of the direct method the watcher invokes on every symbol bot.
pub const WATCHER_METHOD: &str = "WatcherToSymbolCommand";

/// Dispatches watcher commands and owns writes to the telemetry switch.
///
/// Every failure path collapses to `CommandResponse::nomatch()`; nothing is
/// ever propagated back to the caller beyond that sentinel.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    switch: Arc<TelemetrySwitch>,
}

impl CommandRouter {
    pub fn new(switch: Arc<TelemetrySwitch>) -> Self {
        Self { switch }
    }

    pub fn switch(&self) -> &Arc<TelemetrySwitch> {
        &self.switch
    }

    /// Handle a direct method call by name.
    pub fn invoke(&self, method: &str, payload: &[u8]) -> CommandResponse {
        if method != WATCHER_METHOD {
            return self.reject(RouteError::UnknownMethod(method.to_string()));
        }
        self.route(payload)
    }

    /// Handle a raw `{"Command": "..."}` payload.
    pub fn route(&self, payload: &[u8]) -> CommandResponse {
        self.try_route(payload).unwrap_or_else(|e| self.reject(e))
    }

    /// Handle an already-extracted command string.
    pub fn route_command(&self, command: &str) -> CommandResponse {
        command
            .parse::<WatcherCommand>()
            .map(|cmd| self.dispatch(cmd))
            .unwrap_or_else(|e| self.reject(e))
    }

    pub fn try_route(&self, payload: &[u8]) -> Result<CommandResponse, RouteError> {
        let request: CommandRequest = serde_json::from_slice(payload)?;
        let command = request.command.parse::<WatcherCommand>()?;
        Ok(self.dispatch(command))
    }

    pub fn dispatch(&self, command: WatcherCommand) -> CommandResponse {
        match command {
            WatcherCommand::TestConnection => {}
            WatcherCommand::StartTelemetry => {
                self.switch.enable();
                info!("Telemetry enabled by watcher");
            }
            WatcherCommand::StopTelemetry => {
                self.switch.disable();
                info!("Telemetry disabled by watcher");
            }
        }
        CommandResponse::ok(command.reply())
    }

    fn reject(&self, err: RouteError) -> CommandResponse {
        warn!(error = %err, "Rejected watcher command");
        CommandResponse::nomatch()
    }
}
