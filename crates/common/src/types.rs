use serde::{Deserialize, Serialize};

/// Chart kind reported on every telemetry message.
pub const CHART_KIND: &str = "renko";

/// The most recently completed bar on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Position of the bar in the host's series. Two snapshots with the same
    /// index describe the same completed period.
    pub index: u64,
    pub open: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(index: u64, open: f64, close: f64) -> Self {
        Self { index, open, close }
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// `None` for a flat (doji) bar.
    pub fn direction(&self) -> Option<BarType> {
        if self.is_bullish() {
            Some(BarType::Up)
        } else if self.is_bearish() {
            Some(BarType::Down)
        } else {
            None
        }
    }

    /// Absolute range of the bar in whole units of `unit`, truncated.
    /// A non-positive unit yields 0.
    pub fn size(&self, unit: f64) -> u32 {
        if unit <= 0.0 {
            return 0;
        }
        let units = ((self.close - self.open) / unit).abs();
        // 1.1050 - 1.1000 is 49.999... pips in binary floating point.
        (units + 1e-9).trunc() as u32
    }
}

/// Last two values of the MACD line and its signal line.
/// `prev_*` is offset 2 (one before the most recent), `last_*` is offset 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSample {
    pub prev_macd: f64,
    pub prev_signal: f64,
    pub last_macd: f64,
    pub last_signal: f64,
}

/// Everything the host supplies about the chart for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub bar: Bar,
    pub macd: IndicatorSample,
}

/// Direction of the completed bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarType {
    Up,
    Down,
}

impl std::fmt::Display for BarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BarType::Up => write!(f, "up"),
            BarType::Down => write!(f, "down"),
        }
    }
}

/// What caused the telemetry message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// MACD crossed above its signal line on a bullish bar.
    Buy,
    /// MACD crossed below its signal line on a bearish bar.
    Sell,
    /// A directional bar without a matching crossover.
    Indeterminate,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::Buy => write!(f, "buy"),
            Trigger::Sell => write!(f, "sell"),
            Trigger::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// JSON body of a telemetry event: `{"BarType":"up","BarSize":50}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenkoChartInformation {
    #[serde(rename = "BarType")]
    pub bar_type: BarType,
    #[serde(rename = "BarSize")]
    pub bar_size: u32,
}

/// One classified bar, ready to hand to a `TelemetryTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryMessage {
    pub message_id: String,
    pub bar_type: BarType,
    pub bar_size: u32,
    pub symbol_name: String,
    pub renko_mode: String,
    pub trigger: Trigger,
}

impl TelemetryMessage {
    pub fn new(
        bar_type: BarType,
        bar_size: u32,
        symbol_name: impl Into<String>,
        renko_mode: impl Into<String>,
        trigger: Trigger,
    ) -> Self {
        Self {
            message_id: uuid::Uuid::new_v4().to_string(),
            bar_type,
            bar_size,
            symbol_name: symbol_name.into(),
            renko_mode: renko_mode.into(),
            trigger,
        }
    }

    pub fn body(&self) -> RenkoChartInformation {
        RenkoChartInformation {
            bar_type: self.bar_type,
            bar_size: self.bar_size,
        }
    }

    pub fn body_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.body())
    }

    /// Application properties attached to the event, in send order.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("symbolname", self.symbol_name.clone()),
            ("chart", CHART_KIND.to_string()),
            ("renkomode", self.renko_mode.clone()),
            ("trigger", self.trigger.to_string()),
        ]
    }
}

/// Inbound direct-method payload from the watcher: `{"Command":"starttelemetry"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(rename = "Command")]
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatcherResponse {
    pub response: String,
}

/// Direct-method result returned to the watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub body: WatcherResponse,
    pub code: u16,
}

impl CommandResponse {
    pub const OK: u16 = 200;
    pub const REJECTED: u16 = 401;

    pub fn ok(response: impl Into<String>) -> Self {
        Self {
            body: WatcherResponse {
                response: response.into(),
            },
            code: Self::OK,
        }
    }

    /// The sentinel returned for unknown or unreadable commands.
    pub fn nomatch() -> Self {
        Self {
            body: WatcherResponse {
                response: "nomatch".to_string(),
            },
            code: Self::REJECTED,
        }
    }

    pub fn response(&self) -> &str {
        &self.body.response
    }
}
