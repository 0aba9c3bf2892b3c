/*
 *  Copyright (c) 2024 The throughput_history project authors. All Rights Reserved.
 *
 *  Use of this source code is governed by a BSD-style license
 *  that can be found in the LICENSE file in the root of the source
 *  tree.
 */

use std::collections::{HashMap, VecDeque};

use crate::{api::units::TimeDelta, ThroughputSample};

#[derive(Debug, Default)]
struct StreamHistory {
    throughput: VecDeque<ThroughputSample>,
    latency: VecDeque<TimeDelta>,
}

impl StreamHistory {
    const fn new() -> Self {
        Self {
            throughput: VecDeque::new(),
            latency: VecDeque::new(),
        }
    }
}

static EMPTY_HISTORY: StreamHistory = StreamHistory::new();

/// Bounded, oldest-first measurement windows keyed by stream type.
///
/// Stream types are independent: pushing to or resetting one never touches
/// another. A window is created the first time something is pushed for its
/// stream type.
#[derive(Debug, Default)]
pub struct ThroughputHistoryStore {
    histories: HashMap<String, StreamHistory>,
}

impl ThroughputHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample, then evicts the oldest samples until at most
    /// `max_measurements` remain. Returns how many were evicted.
    pub fn push(
        &mut self,
        stream_type: &str,
        sample: ThroughputSample,
        max_measurements: usize,
    ) -> usize {
        let history = self.history_mut(stream_type);
        push_bounded(&mut history.throughput, sample, max_measurements)
    }

    /// Appends a request latency, bounded like [push](Self::push).
    pub fn push_latency(
        &mut self,
        stream_type: &str,
        latency: TimeDelta,
        max_measurements: usize,
    ) -> usize {
        let history = self.history_mut(stream_type);
        push_bounded(&mut history.latency, latency, max_measurements)
    }

    /// Clears both windows of one stream type.
    pub fn reset(&mut self, stream_type: &str) {
        if let Some(history) = self.histories.get_mut(stream_type) {
            history.throughput.clear();
            history.latency.clear();
        }
    }

    pub fn reset_all(&mut self) {
        self.histories.clear();
    }

    /// Stored samples, oldest first. Empty for an unknown stream type.
    pub fn samples(
        &self,
        stream_type: &str,
    ) -> impl DoubleEndedIterator<Item = ThroughputSample> + ExactSizeIterator + '_ {
        self.recent_samples(stream_type, None)
    }

    /// The newest `amount` samples (all of them for `None`), oldest first.
    pub fn recent_samples(
        &self,
        stream_type: &str,
        amount: Option<usize>,
    ) -> impl DoubleEndedIterator<Item = ThroughputSample> + ExactSizeIterator + '_ {
        newest(&self.history(stream_type).throughput, amount)
    }

    /// The newest `amount` latencies (all of them for `None`), oldest first.
    pub fn recent_latencies(
        &self,
        stream_type: &str,
        amount: Option<usize>,
    ) -> impl DoubleEndedIterator<Item = TimeDelta> + ExactSizeIterator + '_ {
        newest(&self.history(stream_type).latency, amount)
    }

    pub fn is_empty(&self, stream_type: &str) -> bool {
        self.history(stream_type).throughput.is_empty()
    }

    /// Stream types that have been pushed to since the last global reset.
    pub fn stream_types(&self) -> impl Iterator<Item = &str> {
        self.histories.keys().map(String::as_str)
    }

    fn history(&self, stream_type: &str) -> &StreamHistory {
        self.histories.get(stream_type).unwrap_or(&EMPTY_HISTORY)
    }

    fn history_mut(&mut self, stream_type: &str) -> &mut StreamHistory {
        self.histories.entry(stream_type.to_string()).or_default()
    }
}

fn push_bounded<T>(window: &mut VecDeque<T>, value: T, max_len: usize) -> usize {
    window.push_back(value);
    let max_len = max_len.max(1);
    let mut evicted = 0;
    while window.len() > max_len {
        window.pop_front();
        evicted += 1;
    }
    evicted
}

fn newest<T: Copy>(
    window: &VecDeque<T>,
    amount: Option<usize>,
) -> impl DoubleEndedIterator<Item = T> + ExactSizeIterator + '_ {
    // Zero is not a window size: it means everything, like `None`.
    let skip = amount
        .filter(|&amount| amount > 0)
        .map_or(0, |amount| window.len().saturating_sub(amount));
    window.iter().skip(skip).copied()
}
