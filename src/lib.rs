//! Throughput estimation for adaptive bitrate streaming.
//!
//! Completed segment downloads become [ThroughputSample]s, kept per stream
//! type in a bounded [ThroughputHistoryStore] and combined with the
//! arithmetic or harmonic mean selected in the live settings.

mod throughput;

pub use throughput::*;

pub mod api;

/// Runtime configuration: [ThroughputHistorySettings](settings::ThroughputHistorySettings) and the [SettingsProvider](settings::SettingsProvider) port.
pub mod settings;
