/*
 *  Copyright (c) 2024 The throughput_history project authors. All Rights Reserved.
 *
 *  Use of this source code is governed by a BSD-style license
 *  that can be found in the LICENSE file in the root of the source
 *  tree.
 */

use crate::{
    api::{transport::SegmentDownloadEvent, units::TimeDelta},
    settings::{LiveSettings, SettingsProvider},
    SampleError, ThroughputHistoryStore, ThroughputSample,
};

/// Throughput estimation for each stream type of a streaming session.
///
/// The transport layer pushes every completed segment download; the ABR logic
/// asks for the average throughput of a stream type before picking a bitrate.
/// Settings are read on every call, so a mode switch mid-session changes the
/// next estimate without re-pushing anything.
pub struct ThroughputHistory<S = LiveSettings> {
    settings: S,
    store: ThroughputHistoryStore,
}

impl<S: Default + SettingsProvider> Default for ThroughputHistory<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: SettingsProvider> ThroughputHistory<S> {
    pub fn new(settings: S) -> Self {
        Self {
            settings,
            store: ThroughputHistoryStore::new(),
        }
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Measures a completed download and records it under its stream type.
    ///
    /// A download that can't be measured is returned as an error and leaves
    /// every history untouched; whether to retry is up to the caller.
    pub fn push(
        &mut self,
        event: &SegmentDownloadEvent,
        use_dead_time_latency: bool,
    ) -> Result<ThroughputSample, SampleError> {
        let sample = match ThroughputSample::from_download(event, use_dead_time_latency) {
            Ok(sample) => sample,
            Err(err) => {
                tracing::debug!(
                    "Discarding {} download: {}",
                    event.stream_type,
                    err
                );
                return Err(err);
            }
        };

        let max_measurements = self.settings.current().max_measurements;
        if let Some(latency) = event.latency() {
            self.store
                .push_latency(&event.stream_type, latency, max_measurements);
        }
        self.record(&event.stream_type, sample, max_measurements);
        Ok(sample)
    }

    /// Records a sample measured elsewhere.
    pub fn push_sample(&mut self, stream_type: &str, sample: ThroughputSample) {
        let max_measurements = self.settings.current().max_measurements;
        self.record(stream_type, sample, max_measurements);
    }

    fn record(&mut self, stream_type: &str, sample: ThroughputSample, max_measurements: usize) {
        let evicted = self.store.push(stream_type, sample, max_measurements);
        tracing::trace!(
            stream_type,
            ?sample,
            evicted,
            "Recorded throughput sample"
        );
    }

    /// Forgets everything measured for one stream type, e.g. after a seek or a
    /// track switch.
    pub fn reset(&mut self, stream_type: &str) {
        tracing::info!("Resetting {} throughput history", stream_type);
        self.store.reset(stream_type);
    }

    /// Forgets everything measured for all stream types.
    pub fn reset_all(&mut self) {
        tracing::info!("Resetting all throughput history");
        self.store.reset_all();
    }

    /// Stored samples of a stream type, oldest first.
    pub fn samples(
        &self,
        stream_type: &str,
    ) -> impl DoubleEndedIterator<Item = ThroughputSample> + ExactSizeIterator + '_ {
        self.store.samples(stream_type)
    }

    /// Average throughput of a stream type in kbps, or `None` with no samples.
    ///
    /// `is_dynamic` selects which configured sample amount applies (live or
    /// on-demand content). With the defaults both average every stored
    /// sample. The result is not rounded.
    pub fn average_throughput(&self, stream_type: &str, is_dynamic: bool) -> Option<f64> {
        let settings = self.settings.current();
        let samples = self
            .store
            .recent_samples(stream_type, settings.sample_amount(is_dynamic));
        settings.mean_mode.mean(samples)
    }

    /// Mean time to first byte over the newest latencies of a stream type.
    ///
    /// `None` with no latencies, or if their sum doesn't fit in a TimeDelta.
    pub fn average_latency(&self, stream_type: &str) -> Option<TimeDelta> {
        let amount = self.settings.current().latency_sample_amount;
        let latencies = self.store.recent_latencies(stream_type, Some(amount));
        let count = latencies.len();
        if count == 0 {
            return None;
        }
        let total = TimeDelta::checked_sum(latencies)?;
        Some(total / count as i64)
    }
}
