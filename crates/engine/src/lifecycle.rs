use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use common::{ChartSnapshot, Error, Result, TelemetryMessage, TelemetrySwitch, TelemetryTransport};
use signal::{classify, ClassifierContext};

use crate::executor::TelemetryPublisher;

/// Chart events pushed by the host platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// A bar completed. Carries the bar that just closed and the indicator
    /// values at offsets 1 and 2.
    BarClosed(ChartSnapshot),
    /// A price update inside the forming bar. The host may attach the current
    /// snapshot; otherwise the last one seen is used.
    Tick { snapshot: Option<ChartSnapshot> },
}

/// Cloneable handle passed to other crates (API).
#[derive(Clone)]
pub struct BotHandle {
    event_tx: mpsc::Sender<HostEvent>,
    switch: Arc<TelemetrySwitch>,
}

impl BotHandle {
    pub async fn publish(&self, event: HostEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| Error::ChannelClosed("bot event channel".into()))
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.switch.is_enabled()
    }
}

/// The symbol bot: gates host events on the telemetry switch, classifies the
/// last completed bar and publishes the result.
pub struct Bot {
    ctx: ClassifierContext,
    switch: Arc<TelemetrySwitch>,
    publisher: TelemetryPublisher,
    event_rx: mpsc::Receiver<HostEvent>,
    /// Most recent chart state, used by ticks that carry none.
    last_snapshot: Option<ChartSnapshot>,
    /// Index of the last bar a message was sent for.
    last_published: Option<u64>,
}

impl Bot {
    const EVENT_BUFFER: usize = 256;

    pub fn new(
        ctx: ClassifierContext,
        switch: Arc<TelemetrySwitch>,
        transport: Arc<dyn TelemetryTransport>,
    ) -> (Self, BotHandle) {
        let (event_tx, event_rx) = mpsc::channel(Self::EVENT_BUFFER);

        let handle = BotHandle {
            event_tx,
            switch: switch.clone(),
        };

        let bot = Bot {
            ctx,
            switch,
            publisher: TelemetryPublisher::new(transport),
            event_rx,
            last_snapshot: None,
            last_published: None,
        };

        (bot, handle)
    }

    /// Run the bot until every handle is dropped. Call from `tokio::spawn`.
    pub async fn run(mut self) {
        info!(
            symbol = %self.ctx.symbol_name,
            mode = %self.ctx.renko_mode,
            enabled = self.switch.is_enabled(),
            "Bot running"
        );
        while let Some(event) = self.event_rx.recv().await {
            self.handle_event(event);
        }
        warn!("Bot event channel closed, shutting down");
    }

    /// Apply one host event. Returns the message handed to the transport, if any.
    pub fn handle_event(&mut self, event: HostEvent) -> Option<TelemetryMessage> {
        match event {
            HostEvent::BarClosed(snapshot) => {
                self.last_snapshot = Some(snapshot);
                if !self.switch.is_enabled() {
                    return None;
                }
                self.publish(snapshot)
            }
            HostEvent::Tick { snapshot } => {
                if snapshot.is_some() {
                    self.last_snapshot = snapshot;
                }
                // Leave the one-shot armed until there is something to send.
                let snapshot = self.last_snapshot?;
                if !self.switch.take_send_once() {
                    return None;
                }
                self.publish(snapshot)
            }
        }
    }

    fn publish(&mut self, snapshot: ChartSnapshot) -> Option<TelemetryMessage> {
        let bar = snapshot.bar;
        if self.last_published == Some(bar.index) {
            debug!(index = bar.index, "Bar already reported, skipping");
            return None;
        }

        let message = classify(&bar, &snapshot.macd, &self.ctx)?;
        self.last_published = Some(bar.index);

        info!(
            index = bar.index,
            bar_type = %message.bar_type,
            size = message.bar_size,
            trigger = %message.trigger,
            "Sending telemetry"
        );
        self.publisher.dispatch(message.clone());
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::{Bar, BarType, IndicatorSample, Trigger};
    use std::time::Duration;

    struct ChannelTransport(mpsc::UnboundedSender<TelemetryMessage>);

    #[async_trait]
    impl TelemetryTransport for ChannelTransport {
        async fn send_event(&self, message: &TelemetryMessage) -> Result<()> {
            let _ = self.0.send(message.clone());
            Ok(())
        }
    }

    fn make_bot() -> (
        Bot,
        BotHandle,
        Arc<TelemetrySwitch>,
        mpsc::UnboundedReceiver<TelemetryMessage>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let switch = Arc::new(TelemetrySwitch::new());
        let ctx = ClassifierContext::new("EURUSD", "ShortTerm", 0.0001);
        let (bot, handle) = Bot::new(ctx, switch.clone(), Arc::new(ChannelTransport(tx)));
        (bot, handle, switch, rx)
    }

    fn cross_up_snapshot(index: u64) -> ChartSnapshot {
        ChartSnapshot {
            bar: Bar::new(index, 1.1000, 1.1050),
            macd: IndicatorSample {
                prev_macd: -0.2,
                prev_signal: -0.1,
                last_macd: 0.1,
                last_signal: 0.05,
            },
        }
    }

    fn flat_snapshot(index: u64) -> ChartSnapshot {
        ChartSnapshot {
            bar: Bar::new(index, 1.1000, 1.1000),
            macd: IndicatorSample {
                prev_macd: 0.0,
                prev_signal: 0.0,
                last_macd: 0.0,
                last_signal: 0.0,
            },
        }
    }

    async fn next_sent(rx: &mut mpsc::UnboundedReceiver<TelemetryMessage>) -> TelemetryMessage {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("transport never called")
            .expect("transport channel closed")
    }

    #[tokio::test]
    async fn bars_are_ignored_while_disabled() {
        let (mut bot, _handle, _switch, mut rx) = make_bot();
        assert!(bot.handle_event(HostEvent::BarClosed(cross_up_snapshot(1))).is_none());
        assert!(bot.handle_event(HostEvent::Tick { snapshot: None }).is_none());
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn enabled_bar_is_sent_through_transport() {
        let (mut bot, _handle, switch, mut rx) = make_bot();
        switch.enable();

        let msg = bot
            .handle_event(HostEvent::BarClosed(cross_up_snapshot(1)))
            .unwrap();
        assert_eq!(msg.bar_type, BarType::Up);
        assert_eq!(msg.bar_size, 50);
        assert_eq!(msg.trigger, Trigger::Buy);

        let sent = next_sent(&mut rx).await;
        assert_eq!(sent, msg);
    }

    #[tokio::test]
    async fn first_tick_after_enable_sends_once() {
        let (mut bot, _handle, switch, mut rx) = make_bot();
        bot.handle_event(HostEvent::BarClosed(cross_up_snapshot(1)));

        switch.enable();
        assert!(bot.handle_event(HostEvent::Tick { snapshot: None }).is_some());
        assert!(bot.handle_event(HostEvent::Tick { snapshot: None }).is_none());
        assert!(!switch.is_armed());

        next_sent(&mut rx).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn tick_without_any_snapshot_keeps_one_shot_armed() {
        let (mut bot, _handle, switch, _rx) = make_bot();
        switch.enable();

        assert!(bot.handle_event(HostEvent::Tick { snapshot: None }).is_none());
        assert!(switch.is_armed());

        let msg = bot.handle_event(HostEvent::Tick {
            snapshot: Some(cross_up_snapshot(4)),
        });
        assert!(msg.is_some());
        assert!(!switch.is_armed());
    }

    #[tokio::test]
    async fn at_most_one_message_per_bar() {
        let (mut bot, _handle, switch, _rx) = make_bot();
        switch.enable();

        assert!(bot.handle_event(HostEvent::BarClosed(cross_up_snapshot(7))).is_some());
        // One-shot is still armed, but bar 7 was already reported.
        assert!(bot.handle_event(HostEvent::Tick { snapshot: None }).is_none());
        assert!(bot.handle_event(HostEvent::BarClosed(cross_up_snapshot(7))).is_none());
        assert!(bot.handle_event(HostEvent::BarClosed(cross_up_snapshot(8))).is_some());
    }

    #[tokio::test]
    async fn flat_bar_is_not_sent() {
        let (mut bot, _handle, switch, mut rx) = make_bot();
        switch.enable();
        assert!(bot.handle_event(HostEvent::BarClosed(flat_snapshot(3))).is_none());
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn stop_disarms_pending_one_shot() {
        let (mut bot, _handle, switch, _rx) = make_bot();
        bot.handle_event(HostEvent::BarClosed(cross_up_snapshot(1)));
        switch.enable();
        switch.disable();
        assert!(bot.handle_event(HostEvent::Tick { snapshot: None }).is_none());
        assert!(bot.handle_event(HostEvent::BarClosed(cross_up_snapshot(2))).is_none());
    }

    #[tokio::test]
    async fn run_loop_drains_handle_events() {
        let (bot, handle, switch, mut rx) = make_bot();
        switch.enable();
        let task = tokio::spawn(bot.run());

        handle
            .publish(HostEvent::BarClosed(cross_up_snapshot(1)))
            .await
            .unwrap();
        let sent = next_sent(&mut rx).await;
        assert_eq!(sent.trigger, Trigger::Buy);

        drop(handle);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[test]
    fn host_event_json_shape() {
        let ev: HostEvent = serde_json::from_str(r#"{"type":"tick","snapshot":null}"#).unwrap();
        assert_eq!(ev, HostEvent::Tick { snapshot: None });
    }
}
