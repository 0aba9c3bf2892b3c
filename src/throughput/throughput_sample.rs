/*
 *  Copyright (c) 2024 The throughput_history project authors. All Rights Reserved.
 *
 *  Use of this source code is governed by a BSD-style license
 *  that can be found in the LICENSE file in the root of the source
 *  tree.
 */

use std::fmt;

use crate::api::{
    transport::SegmentDownloadEvent,
    units::{DataSize, TimeDelta},
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SampleError {
    #[error("download trace is empty")]
    EmptyTrace,

    #[error("request failed with response code {0}")]
    FailedResponse(u16),

    #[error("request timestamps are not finite")]
    InvalidTimestamps,

    #[error("invalid request latency of {0:?}")]
    InvalidLatency(TimeDelta),

    #[error("download trace totals are not finite")]
    MalformedTrace,

    #[error("download trace spans {0:?}")]
    NonPositiveDuration(TimeDelta),

    #[error("download trace carries no payload")]
    NoPayload,

    #[error("invalid throughput of {0} kbps")]
    InvalidRate(f64),
}

/// Throughput measured over one completed segment download, in kilobits per
/// second.
///
/// Always finite and strictly positive, so both means are defined over any
/// set of samples.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct ThroughputSample(f64);

impl ThroughputSample {
    // Floor for the transfer time once latency has been discounted.
    const MIN_EFFECTIVE_DURATION: TimeDelta = TimeDelta::from_millis(1);

    pub fn from_kbps(kbps: f64) -> Result<Self, SampleError> {
        // Subnormal rates would overflow once inverted by the harmonic mean.
        if !kbps.is_normal() || kbps < 0.0 {
            return Err(SampleError::InvalidRate(kbps));
        }
        Ok(Self(kbps))
    }

    /// Builds the sample for a completed download.
    ///
    /// With `use_dead_time_latency` the time to first byte is taken out of the
    /// transfer time, as it reflects request setup rather than link rate. The
    /// bytes are never reduced: anything received during that window still
    /// counts.
    pub fn from_download(
        event: &SegmentDownloadEvent,
        use_dead_time_latency: bool,
    ) -> Result<Self, SampleError> {
        if event.trace.is_empty() {
            return Err(SampleError::EmptyTrace);
        }
        if let Some(code) = event.response_code.filter(|_| !event.is_successful()) {
            return Err(SampleError::FailedResponse(code));
        }

        let latency = event.latency().ok_or(SampleError::InvalidTimestamps)?;
        if latency < TimeDelta::zero() {
            return Err(SampleError::InvalidLatency(latency));
        }

        let duration = event.trace_duration().ok_or(SampleError::MalformedTrace)?;
        if duration <= TimeDelta::zero() {
            return Err(SampleError::NonPositiveDuration(duration));
        }

        let size = event.total_bytes().ok_or(SampleError::MalformedTrace)?;
        if size.is_zero() {
            return Err(SampleError::NoPayload);
        }

        let effective_duration = if use_dead_time_latency {
            (duration - latency).max(Self::MIN_EFFECTIVE_DURATION)
        } else {
            duration
        };

        Self::from_transfer(size, effective_duration)
    }

    /// Rate of `size` bytes moved in `duration`.
    pub fn from_transfer(size: DataSize, duration: TimeDelta) -> Result<Self, SampleError> {
        if !duration.is_finite() || duration <= TimeDelta::zero() {
            return Err(SampleError::NonPositiveDuration(duration));
        }
        // Bits per millisecond are kilobits per second.
        Self::from_kbps(size.bits_float() / duration.ms_float())
    }

    pub fn kbps(&self) -> f64 {
        self.0
    }

    pub fn bps(&self) -> f64 {
        self.0 * 1000.0
    }
}

impl fmt::Debug for ThroughputSample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} kbps", self.0)
    }
}

impl fmt::Display for ThroughputSample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.0} kbps", self.0)
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;
    use crate::api::units::Timestamp;
    use crate::throughput::fixtures::{download, reference_downloads, video_download};

    #[test]
    fn reference_downloads_with_dead_time_correction() {
        let kbps: Vec<f64> = reference_downloads()
            .iter()
            .map(|event| ThroughputSample::from_download(event, true).unwrap().kbps())
            .collect();
        assert_eq!(kbps, vec![15200.0, 5280.0, 9600.0]);
    }

    #[test]
    fn without_correction_uses_whole_trace() {
        let event = video_download([50000, 700000, 200000]);
        let sample = ThroughputSample::from_download(&event, false).unwrap();
        assert_relative_eq!(sample.kbps(), 950000.0 * 8.0 / 520.0);
        assert!(sample < ThroughputSample::from_download(&event, true).unwrap());
    }

    #[test]
    fn bytes_received_during_latency_still_count() {
        // All payload arrives in the first 20ms, which is entirely latency.
        let event = download("audio", &[8000, 0], &[20, 80], 20);
        let sample = ThroughputSample::from_download(&event, true).unwrap();
        assert_relative_eq!(sample.kbps(), 8000.0 * 8.0 / 80.0);
    }

    #[test]
    fn latency_covering_the_trace_is_clamped() {
        let event = download("video", &[1000], &[20], 50);
        let sample = ThroughputSample::from_download(&event, true).unwrap();
        assert!(sample.kbps().is_finite());
        assert_relative_eq!(sample.kbps(), 1000.0 * 8.0 / 1.0);
    }

    #[test]
    fn rejects_empty_trace() {
        let event = download("video", &[], &[], 20);
        assert_eq!(
            ThroughputSample::from_download(&event, true),
            Err(SampleError::EmptyTrace)
        );
    }

    #[test]
    fn rejects_failed_response() {
        let mut event = video_download([50000, 700000, 200000]);
        event.response_code = Some(503);
        assert_eq!(
            ThroughputSample::from_download(&event, true),
            Err(SampleError::FailedResponse(503))
        );

        event.response_code = None;
        assert!(ThroughputSample::from_download(&event, true).is_ok());
    }

    #[test]
    fn rejects_zero_duration() {
        let event = download("video", &[1000, 2000], &[0, 0], 0);
        assert_eq!(
            ThroughputSample::from_download(&event, false),
            Err(SampleError::NonPositiveDuration(TimeDelta::zero()))
        );
        assert_eq!(
            ThroughputSample::from_download(&event, true),
            Err(SampleError::NonPositiveDuration(TimeDelta::zero()))
        );
    }

    #[test]
    fn rejects_negative_duration() {
        let event = download("video", &[1000], &[-5], 0);
        assert_eq!(
            ThroughputSample::from_download(&event, false),
            Err(SampleError::NonPositiveDuration(TimeDelta::from_millis(-5)))
        );
    }

    #[test]
    fn rejects_first_byte_before_request() {
        let mut event = video_download([50000, 700000, 200000]);
        event.first_byte = event.request_start - TimeDelta::from_millis(5);
        assert_eq!(
            ThroughputSample::from_download(&event, false),
            Err(SampleError::InvalidLatency(TimeDelta::from_millis(-5)))
        );

        event.first_byte = Timestamp::plus_infinity();
        assert_eq!(
            ThroughputSample::from_download(&event, true),
            Err(SampleError::InvalidTimestamps)
        );
    }

    #[test]
    fn rejects_infinite_timestamps() {
        let mut event = video_download([50000, 700000, 200000]);
        for timestamp in [Timestamp::plus_infinity(), Timestamp::minus_infinity()] {
            event.request_start = timestamp;
            event.first_byte = timestamp;
            for use_dead_time_latency in [true, false] {
                assert_eq!(
                    ThroughputSample::from_download(&event, use_dead_time_latency),
                    Err(SampleError::InvalidTimestamps)
                );
            }
        }
    }

    #[test]
    fn rejects_infinite_trace_durations() {
        let mut event = video_download([50000, 700000, 200000]);
        event.trace[0].duration = TimeDelta::plus_infinity();
        event.trace[1].duration = TimeDelta::minus_infinity();
        assert_eq!(
            ThroughputSample::from_download(&event, true),
            Err(SampleError::MalformedTrace)
        );

        event.trace[1].duration = TimeDelta::from_millis(200);
        assert_eq!(
            ThroughputSample::from_download(&event, false),
            Err(SampleError::MalformedTrace)
        );
    }

    #[test]
    fn rejects_overflowing_trace_totals() {
        let mut event = video_download([50000, 700000, 200000]);
        event.trace[1].duration = TimeDelta::from_micros(i64::MAX / 2 + 1);
        event.trace[2].duration = TimeDelta::from_micros(i64::MAX / 2 + 1);
        assert_eq!(
            ThroughputSample::from_download(&event, true),
            Err(SampleError::MalformedTrace)
        );

        let mut event = video_download([50000, 700000, 200000]);
        event.trace[1].bytes = vec![DataSize::from_bytes(i64::MAX - 1)];
        assert_eq!(
            ThroughputSample::from_download(&event, true),
            Err(SampleError::MalformedTrace)
        );
    }

    #[test]
    fn rejects_empty_payload() {
        let event = download("text", &[0, 0], &[10, 10], 5);
        assert_eq!(
            ThroughputSample::from_download(&event, true),
            Err(SampleError::NoPayload)
        );
    }

    #[test]
    fn from_kbps_rejects_degenerate_rates() {
        assert_eq!(ThroughputSample::from_kbps(0.0), Err(SampleError::InvalidRate(0.0)));
        assert_eq!(ThroughputSample::from_kbps(-1.0), Err(SampleError::InvalidRate(-1.0)));
        assert!(ThroughputSample::from_kbps(f64::INFINITY).is_err());
        assert!(ThroughputSample::from_kbps(f64::NAN).is_err());
        assert_eq!(
            ThroughputSample::from_kbps(1e-320),
            Err(SampleError::InvalidRate(1e-320))
        );
        assert!(ThroughputSample::from_kbps(f64::MIN_POSITIVE).is_ok());
        assert_eq!(ThroughputSample::from_kbps(1500.0).unwrap().bps(), 1_500_000.0);
    }

    #[test]
    fn from_transfer() {
        let sample =
            ThroughputSample::from_transfer(DataSize::from_bytes(125_000), TimeDelta::from_millis(1000))
                .unwrap();
        assert_relative_eq!(sample.kbps(), 1000.0);
        assert!(
            ThroughputSample::from_transfer(DataSize::from_bytes(1), TimeDelta::zero()).is_err()
        );
        assert!(ThroughputSample::from_transfer(
            DataSize::from_bytes(1),
            TimeDelta::plus_infinity()
        )
        .is_err());
    }

    #[test]
    fn formats() {
        let sample = ThroughputSample::from_kbps(8348.4).unwrap();
        assert_eq!(format!("{:?}", sample), "8348.4 kbps");
        assert_eq!(sample.to_string(), "8348 kbps");
        assert_eq!(SampleError::FailedResponse(404).to_string(), "request failed with response code 404");
    }
}
