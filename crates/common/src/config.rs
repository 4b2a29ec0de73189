use serde::{Deserialize, Serialize};

use crate::ConnectionString;

/// Where telemetry goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Post events to the IoT Hub.
    Live,
    /// Record events in memory and log them; nothing leaves the process.
    DryRun,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportMode::Live => write!(f, "live"),
            TransportMode::DryRun => write!(f, "dryrun"),
        }
    }
}

/// All configuration loaded from environment variables at startup.
/// Missing required variables cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    // Chart
    pub renko_chart_mode: String,
    pub symbol_name: String,
    /// Smallest price increment of the symbol; bar sizes are counted in it.
    pub pip_size: f64,

    // Cloud endpoint
    pub iothub_name: String,
    pub device_id: String,
    pub shared_access_key: String,
    pub sas_ttl_secs: u64,
    pub transport_mode: TransportMode,

    // Direct-method / host event API
    pub api_port: u16,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on any missing required variable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let transport_mode = match optional_env("TRANSPORT_MODE")
            .unwrap_or_else(|| "live".to_string())
            .to_lowercase()
            .as_str()
        {
            "live" => TransportMode::Live,
            "dryrun" | "dry-run" => TransportMode::DryRun,
            other => panic!("ERROR: TRANSPORT_MODE must be 'live' or 'dryrun', got: '{other}'"),
        };

        let pip_size = optional_env("PIP_SIZE")
            .map(|v| {
                v.parse::<f64>()
                    .unwrap_or_else(|_| panic!("PIP_SIZE is not a number: '{v}'"))
            })
            .unwrap_or(0.0001);
        if pip_size <= 0.0 {
            panic!("PIP_SIZE must be positive, got: {pip_size}");
        }

        Config {
            renko_chart_mode: required_env("RENKO_CHART_MODE"),
            symbol_name: required_env("SYMBOL_NAME"),
            pip_size,
            iothub_name: required_env("IOTHUB_NAME"),
            device_id: required_env("DEVICE_ID"),
            shared_access_key: required_env("SHARED_ACCESS_KEY"),
            sas_ttl_secs: optional_env("SAS_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            transport_mode,
            api_port: optional_env("API_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        }
    }

    pub fn connection_string(&self) -> ConnectionString {
        ConnectionString::from_parts(
            &self.iothub_name,
            self.device_id.clone(),
            self.shared_access_key.clone(),
        )
    }
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
