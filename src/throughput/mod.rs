mod history_store;
mod mean_calculation;
mod throughput_history;
mod throughput_sample;

#[cfg(test)]
pub(crate) mod fixtures;

pub use history_store::*;
pub use mean_calculation::*;
pub use throughput_history::*;
pub use throughput_sample::*;
