pub mod classifier;
pub mod crossover;

pub use classifier::{classify, ClassifierContext};
pub use crossover::{crossover, Crossover};
