use serde::{Deserialize, Serialize};

use common::IndicatorSample;

/// Direction in which the MACD line crossed its signal line between the
/// two trailing samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crossover {
    /// MACD was below signal and is now above it.
    Up,
    /// MACD was above signal and is now below it.
    Down,
    None,
}

/// Strict comparisons on both samples: touching the signal line is not a cross.
pub fn crossover(sample: &IndicatorSample) -> Crossover {
    if sample.prev_macd < sample.prev_signal && sample.last_macd > sample.last_signal {
        Crossover::Up
    } else if sample.prev_macd > sample.prev_signal && sample.last_macd < sample.last_signal {
        Crossover::Down
    } else {
        Crossover::None
    }
}
