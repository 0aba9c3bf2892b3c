mod provider;
mod throughput_history_settings;

pub use provider::*;
pub use throughput_history_settings::*;
