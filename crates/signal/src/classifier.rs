use tracing::debug;

use common::{Bar, BarType, Config, IndicatorSample, TelemetryMessage, Trigger};

use crate::crossover::{crossover, Crossover};

/// Per-instrument fields stamped onto every message.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierContext {
    pub symbol_name: String,
    pub renko_mode: String,
    /// Unit that bar sizes are counted in.
    pub pip_size: f64,
}

impl ClassifierContext {
    pub fn new(symbol_name: impl Into<String>, renko_mode: impl Into<String>, pip_size: f64) -> Self {
        Self {
            symbol_name: symbol_name.into(),
            renko_mode: renko_mode.into(),
            pip_size,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.symbol_name.clone(), cfg.renko_chart_mode.clone(), cfg.pip_size)
    }
}

/// Classify the last completed bar against the MACD crossover.
///
/// First match wins:
/// 1. bullish bar and MACD crossed up → `buy`
/// 2. bearish bar and MACD crossed down → `sell`
/// 3. bullish bar → `indeterminate`, up
/// 4. bearish bar → `indeterminate`, down
///
/// A flat bar (open == close) yields `None`: nothing is sent for it.
pub fn classify(bar: &Bar, sample: &IndicatorSample, ctx: &ClassifierContext) -> Option<TelemetryMessage> {
    let Some(bar_type) = bar.direction() else {
        debug!(index = bar.index, price = bar.open, "Flat bar, no telemetry");
        return None;
    };

    let trigger = match (bar_type, crossover(sample)) {
        (BarType::Up, Crossover::Up) => Trigger::Buy,
        (BarType::Down, Crossover::Down) => Trigger::Sell,
        _ => Trigger::Indeterminate,
    };

    Some(TelemetryMessage::new(
        bar_type,
        bar.size(ctx.pip_size),
        ctx.symbol_name.clone(),
        ctx.renko_mode.clone(),
        trigger,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ClassifierContext {
        ClassifierContext::new("EURUSD", "ShortTerm", 0.0001)
    }

    fn sample(prev_macd: f64, prev_signal: f64, last_macd: f64, last_signal: f64) -> IndicatorSample {
        IndicatorSample {
            prev_macd,
            prev_signal,
            last_macd,
            last_signal,
        }
    }

    const CROSS_UP: (f64, f64, f64, f64) = (-0.2, -0.1, 0.1, 0.05);
    const CROSS_DOWN: (f64, f64, f64, f64) = (0.2, 0.1, -0.1, 0.05);
    const NO_CROSS: (f64, f64, f64, f64) = (0.2, 0.1, 0.3, 0.15);

    fn s(t: (f64, f64, f64, f64)) -> IndicatorSample {
        sample(t.0, t.1, t.2, t.3)
    }

    #[test]
    fn bullish_bar_with_upward_cross_is_buy() {
        let bar = Bar::new(10, 1.1000, 1.1050);
        let msg = classify(&bar, &s(CROSS_UP), &ctx()).unwrap();

        assert_eq!(msg.bar_type, BarType::Up);
        assert_eq!(msg.bar_size, 50);
        assert_eq!(msg.trigger, Trigger::Buy);
        assert_eq!(msg.symbol_name, "EURUSD");
        assert_eq!(msg.renko_mode, "ShortTerm");
    }

    #[test]
    fn bearish_bar_with_downward_cross_is_sell() {
        let bar = Bar::new(10, 1.1050, 1.1000);
        let msg = classify(&bar, &s(CROSS_DOWN), &ctx()).unwrap();

        assert_eq!(msg.bar_type, BarType::Down);
        assert_eq!(msg.bar_size, 50);
        assert_eq!(msg.trigger, Trigger::Sell);
    }

    #[test]
    fn bullish_bar_without_cross_is_indeterminate_up() {
        let bar = Bar::new(10, 1.1000, 1.1010);
        let msg = classify(&bar, &s(NO_CROSS), &ctx()).unwrap();

        assert_eq!(msg.bar_type, BarType::Up);
        assert_eq!(msg.trigger, Trigger::Indeterminate);
    }

    #[test]
    fn bearish_bar_without_cross_is_indeterminate_down() {
        let bar = Bar::new(10, 1.1010, 1.1000);
        let msg = classify(&bar, &s(NO_CROSS), &ctx()).unwrap();

        assert_eq!(msg.bar_type, BarType::Down);
        assert_eq!(msg.trigger, Trigger::Indeterminate);
    }

    #[test]
    fn cross_against_the_bar_is_indeterminate() {
        let up_bar = Bar::new(1, 1.0, 1.001);
        assert_eq!(
            classify(&up_bar, &s(CROSS_DOWN), &ctx()).unwrap().trigger,
            Trigger::Indeterminate
        );

        let down_bar = Bar::new(1, 1.001, 1.0);
        assert_eq!(
            classify(&down_bar, &s(CROSS_UP), &ctx()).unwrap().trigger,
            Trigger::Indeterminate
        );
    }

    #[test]
    fn flat_bar_produces_nothing() {
        let bar = Bar::new(10, 1.1000, 1.1000);
        assert!(classify(&bar, &s(CROSS_UP), &ctx()).is_none());
        assert!(classify(&bar, &s(CROSS_DOWN), &ctx()).is_none());
        assert!(classify(&bar, &s(NO_CROSS), &ctx()).is_none());
    }
}
