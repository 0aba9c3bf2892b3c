/*
 *  Copyright (c) 2024 The throughput_history project authors. All Rights Reserved.
 *
 *  Use of this source code is governed by a BSD-style license
 *  that can be found in the LICENSE file in the root of the source
 *  tree.
 */

use crate::{settings::MeanCalculationMode, ThroughputSample};

impl MeanCalculationMode {
    /// Combines samples into one estimate in kbps, or `None` when there are
    /// no samples.
    pub fn mean<I>(&self, samples: I) -> Option<f64>
    where
        I: IntoIterator<Item = ThroughputSample>,
    {
        match self {
            Self::ArithmeticMean => arithmetic_mean(samples),
            Self::HarmonicMean => harmonic_mean(samples),
        }
    }
}

/// `sum(samples) / count`
///
/// Kept as a running mean so large samples can't overflow the sum.
pub fn arithmetic_mean<I>(samples: I) -> Option<f64>
where
    I: IntoIterator<Item = ThroughputSample>,
{
    running_mean(samples.into_iter().map(|sample| sample.kbps()))
}

/// `count / sum(1 / sample)`
///
/// Samples are normal and strictly positive, so every reciprocal is finite.
pub fn harmonic_mean<I>(samples: I) -> Option<f64>
where
    I: IntoIterator<Item = ThroughputSample>,
{
    let reciprocal_mean = running_mean(samples.into_iter().map(|sample| 1.0 / sample.kbps()))?;
    positive(1.0 / reciprocal_mean)
}

fn running_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut count = 0usize;
    let mut mean = 0.0;
    for value in values {
        count += 1;
        mean += (value - mean) / count as f64;
    }
    if count == 0 {
        return None;
    }
    positive(mean)
}

// A mean of positive samples must itself be a positive rate.
fn positive(mean: f64) -> Option<f64> {
    Some(mean).filter(|mean| mean.is_finite() && *mean > 0.0)
}
