/*
 *  Copyright (c) 2024 The throughput_history project authors. All Rights Reserved.
 *
 *  Use of this source code is governed by a BSD-style license
 *  that can be found in the LICENSE file in the root of the source
 *  tree.
 */

use crate::api::{
    transport::{SegmentDownloadEvent, TracePoint},
    units::{DataSize, TimeDelta, Timestamp},
};

// 2021-07-14T12:18:49.000Z
pub const REQUEST_START_MS: i64 = 1_626_265_129_000;

/// A successful download whose first byte arrives 20ms after the request,
/// traced as 20ms + 200ms + 300ms progress intervals.
pub fn video_download(bytes: [i64; 3]) -> SegmentDownloadEvent {
    download("video", &bytes, &[20, 200, 300], 20)
}

pub fn download(
    stream_type: &str,
    bytes: &[i64],
    durations_ms: &[i64],
    latency_ms: i64,
) -> SegmentDownloadEvent {
    let request_start = Timestamp::from_millis(REQUEST_START_MS);
    let mut start = request_start;
    let trace = bytes
        .iter()
        .zip(durations_ms)
        .map(|(&bytes, &duration_ms)| {
            let duration = TimeDelta::from_millis(duration_ms);
            let point = TracePoint::new(start, duration, DataSize::from_bytes(bytes));
            start += duration;
            point
        })
        .collect();

    SegmentDownloadEvent {
        stream_type: stream_type.to_string(),
        request_start,
        first_byte: request_start + TimeDelta::from_millis(latency_ms),
        response_code: Some(200),
        trace,
    }
}

/// Three video segments measuring 15200, 5280 and 9600 kbps once the 20ms
/// of latency is discounted.
pub fn reference_downloads() -> [SegmentDownloadEvent; 3] {
    [
        video_download([50000, 700000, 200000]),
        video_download([50000, 200000, 80000]),
        video_download([100000, 400000, 100000]),
    ]
}
