use std::str::FromStr;

use thiserror::Error;

/// Commands the watcher can send to a symbol bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherCommand {
    TestConnection,
    StartTelemetry,
    StopTelemetry,
}

impl WatcherCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatcherCommand::TestConnection => "testconnection",
            WatcherCommand::StartTelemetry => "starttelemetry",
            WatcherCommand::StopTelemetry => "stoptelemetry",
        }
    }

    /// Value of the `response` field on success.
    pub fn reply(&self) -> &'static str {
        match self {
            WatcherCommand::TestConnection => "connected",
            WatcherCommand::StartTelemetry => "startedtelemetry",
            WatcherCommand::StopTelemetry => "stoppedtelemetry",
        }
    }
}

impl std::fmt::Display for WatcherCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive: the watcher only ever sends lowercase names.
impl FromStr for WatcherCommand {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "testconnection" => Ok(WatcherCommand::TestConnection),
            "starttelemetry" => Ok(WatcherCommand::StartTelemetry),
            "stoptelemetry" => Ok(WatcherCommand::StopTelemetry),
            other => Err(RouteError::UnknownCommand(other.to_string())),
        }
    }
}

/// Why a direct method call was rejected. All variants map to `nomatch`/401.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("malformed command payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("unknown method '{0}'")]
    UnknownMethod(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        for cmd in [
            WatcherCommand::TestConnection,
            WatcherCommand::StartTelemetry,
            WatcherCommand::StopTelemetry,
        ] {
            assert_eq!(cmd.as_str().parse::<WatcherCommand>().unwrap(), cmd);
        }
    }

    #[test]
    fn rejects_other_spellings() {
        assert!("StartTelemetry".parse::<WatcherCommand>().is_err());
        assert!(" testconnection".parse::<WatcherCommand>().is_err());
        assert!("".parse::<WatcherCommand>().is_err());
    }
}
