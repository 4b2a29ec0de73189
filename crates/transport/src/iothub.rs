use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;
use tracing::debug;

use common::{ConnectionString, Error, Result, TelemetryMessage, TelemetryTransport};

const API_VERSION: &str = "2020-03-13";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Device-to-cloud client for an Azure IoT Hub, over the HTTPS device API.
///
/// Each event is a POST of the JSON body with the message properties sent as
/// `iothub-app-*` headers, authorized with a SAS token minted per request.
pub struct IotHubClient {
    base_url: String,
    host_name: String,
    device_id: String,
    shared_access_key: String,
    sas_ttl: Duration,
    http: Client,
}

impl IotHubClient {
    pub fn new(conn: &ConnectionString, sas_ttl: Duration) -> Result<Self> {
        // Fail at startup rather than on the first bar.
        STANDARD
            .decode(&conn.shared_access_key)
            .map_err(|e| Error::Config(format!("SharedAccessKey is not valid base64: {e}")))?;

        let http = Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            base_url: format!("https://{}", conn.host_name),
            host_name: conn.host_name.clone(),
            device_id: conn.device_id.clone(),
            shared_access_key: conn.shared_access_key.clone(),
            sas_ttl,
            http,
        })
    }

    /// Point the client at another origin (tests, local gateways).
    /// The SAS resource still names the configured host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn events_url(&self) -> String {
        format!(
            "{}/devices/{}/messages/events?api-version={API_VERSION}",
            self.base_url, self.device_id
        )
    }

    fn authorization(&self) -> Result<String> {
        let resource = format!("{}/devices/{}", self.host_name, self.device_id);
        let expiry = Utc::now().timestamp() + self.sas_ttl.as_secs() as i64;
        sas_token(&resource, &self.shared_access_key, expiry)
    }
}

#[async_trait]
impl TelemetryTransport for IotHubClient {
    async fn send_event(&self, message: &TelemetryMessage) -> Result<()> {
        let body = message.body_json()?;

        let mut request = self
            .http
            .post(self.events_url())
            .header("Authorization", self.authorization()?)
            .header("Content-Type", "application/json")
            .header("iothub-messageid", message.message_id.as_str())
            .header("iothub-contenttype", "application/json")
            .header("iothub-contentencoding", "utf-8");
        for (name, value) in message.properties() {
            request = request.header(format!("iothub-app-{name}"), value);
        }

        debug!(id = %message.message_id, device = %self.device_id, "Posting device-to-cloud event");
        let resp = request
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Transport(format!("HTTP {status}: {text}")));
        }
        Ok(())
    }
}

/// Shared access signature for `resource` (host/devices/id), valid until the
/// unix time `expiry`. `key_b64` is the device key as shown in the portal.
pub fn sas_token(resource: &str, key_b64: &str, expiry: i64) -> Result<String> {
    type HmacSha256 = Hmac<Sha256>;

    let key = STANDARD
        .decode(key_b64)
        .map_err(|e| Error::Config(format!("SharedAccessKey is not valid base64: {e}")))?;
    let sr = url_encode(resource);

    let mut mac = HmacSha256::new_from_slice(&key).map_err(|e| Error::Config(e.to_string()))?;
    mac.update(format!("{sr}\n{expiry}").as_bytes());
    let sig = STANDARD.encode(mac.finalize().into_bytes());

    Ok(format!(
        "SharedAccessSignature sr={sr}&sig={}&se={expiry}",
        url_encode(&sig)
    ))
}

fn url_encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
