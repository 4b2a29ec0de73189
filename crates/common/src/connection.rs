use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Domain suffix of every IoT Hub host name.
pub const IOTHUB_DOMAIN: &str = "azure-devices.net";

/// Device connection string for the cloud endpoint:
/// `HostName=<hub>.azure-devices.net;DeviceId=<id>;SharedAccessKey=<key>`.
///
/// The core never looks inside it; the transport uses the parts to address
/// and sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub host_name: String,
    pub device_id: String,
    pub shared_access_key: String,
}

impl ConnectionString {
    pub fn from_parts(
        hub_name: &str,
        device_id: impl Into<String>,
        shared_access_key: impl Into<String>,
    ) -> Self {
        Self {
            host_name: format!("{hub_name}.{IOTHUB_DOMAIN}"),
            device_id: device_id.into(),
            shared_access_key: shared_access_key.into(),
        }
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HostName={};DeviceId={};SharedAccessKey={}",
            self.host_name, self.device_id, self.shared_access_key
        )
    }
}

// Keep the key out of logs.
impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("host_name", &self.host_name)
            .field("device_id", &self.device_id)
            .field("shared_access_key", &"<redacted>")
            .finish()
    }
}

impl FromStr for ConnectionString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut host_name = None;
        let mut device_id = None;
        let mut shared_access_key = None;

        for part in s.split(';').filter(|p| !p.trim().is_empty()) {
            // Keys are base64 and may end in '=', so split on the first one only.
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("malformed connection string segment '{part}'")))?;
            match key.trim() {
                "HostName" => host_name = Some(value.to_string()),
                "DeviceId" => device_id = Some(value.to_string()),
                "SharedAccessKey" => shared_access_key = Some(value.to_string()),
                _ => {}
            }
        }

        let missing = |name: &str| Error::Config(format!("connection string has no {name}"));
        Ok(Self {
            host_name: host_name.ok_or_else(|| missing("HostName"))?,
            device_id: device_id.ok_or_else(|| missing("DeviceId"))?,
            shared_access_key: shared_access_key.ok_or_else(|| missing("SharedAccessKey"))?,
        })
    }
}
