/*
 *  Copyright (c) 2024 The throughput_history project authors. All Rights Reserved.
 *
 *  Use of this source code is governed by a BSD-style license
 *  that can be found in the LICENSE file in the root of the source
 *  tree.
 */

use crate::api::units::{DataSize, TimeDelta, Timestamp};

/// One progress interval of an HTTP download.
///
/// The transport layer emits a point every time it observes progress. The
/// first point starts at the request start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracePoint {
    /// When the interval started (the previous point's end).
    pub start: Timestamp,
    /// Time elapsed since the previous point.
    pub duration: TimeDelta,
    /// Bytes received during the interval. Some loaders report more than one
    /// count per progress event; all of them are payload.
    pub bytes: Vec<DataSize>,
}

impl TracePoint {
    pub fn new(start: Timestamp, duration: TimeDelta, bytes: DataSize) -> Self {
        Self {
            start,
            duration,
            bytes: vec![bytes],
        }
    }

    /// Bytes received during the interval, or `None` if a count is infinite
    /// or the total overflows.
    pub fn total_bytes(&self) -> Option<DataSize> {
        DataSize::checked_sum(self.bytes.iter().copied())
    }
}

/// A completed media segment download, as reported by the transport layer.
///
/// Treated as an immutable snapshot: nothing in this crate mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDownloadEvent {
    /// Stream type the segment belongs to, e.g. "video" or "audio". Any token
    /// is accepted.
    pub stream_type: String,
    /// When the request was issued.
    pub request_start: Timestamp,
    /// When the first byte of the response arrived.
    pub first_byte: Timestamp,
    /// HTTP status, if the transport reported one.
    pub response_code: Option<u16>,
    pub trace: Vec<TracePoint>,
}

impl SegmentDownloadEvent {
    /// Bytes received over the whole transfer, including any that arrived
    /// before `first_byte` was recorded. `None` when the trace carries an
    /// infinite count or the total overflows.
    pub fn total_bytes(&self) -> Option<DataSize> {
        self.trace.iter().try_fold(DataSize::zero(), |total, point| {
            total.checked_add(point.total_bytes()?)
        })
    }

    /// Sum of the per-point elapsed durations, or `None` when a duration is
    /// infinite or the sum overflows.
    pub fn trace_duration(&self) -> Option<TimeDelta> {
        TimeDelta::checked_sum(self.trace.iter().map(|point| point.duration))
    }

    /// Time spent waiting for the server to start responding. Negative when
    /// the timestamps are inconsistent, `None` when either is infinite.
    pub fn latency(&self) -> Option<TimeDelta> {
        self.first_byte.checked_since(self.request_start)
    }

    /// Whether the response code, if any, is a 2xx.
    pub fn is_successful(&self) -> bool {
        self.response_code
            .map_or(true, |code| (200..300).contains(&code))
    }
}
