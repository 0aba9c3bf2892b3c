/*
 *  Copyright (c) 2024 The throughput_history project authors. All Rights Reserved.
 *
 *  Use of this source code is governed by a BSD-style license
 *  that can be found in the LICENSE file in the root of the source
 *  tree.
 */

use std::fmt;

/// How the stored samples of a stream type are combined into one estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MeanCalculationMode {
    /// `sum(samples) / count`. Dominated by fast outliers.
    #[default]
    ArithmeticMean,
    /// `count / sum(1 / sample)`. Weighs slow samples more heavily, which
    /// gives a more conservative estimate.
    HarmonicMean,
}

impl MeanCalculationMode {
    /// Reads a mode name, falling back to [ArithmeticMean](Self::ArithmeticMean)
    /// for anything unrecognized so estimation stays available.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "arithmetic_mean" | "arithmeticmean" | "arithmetic" => Self::ArithmeticMean,
            "harmonic_mean" | "harmonicmean" | "harmonic" => Self::HarmonicMean,
            _ => {
                tracing::warn!(
                    "Unknown mean calculation mode {:?}, using arithmetic mean.",
                    value
                );
                Self::ArithmeticMean
            }
        }
    }
}

impl fmt::Display for MeanCalculationMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ArithmeticMean => write!(f, "arithmetic_mean"),
            Self::HarmonicMean => write!(f, "harmonic_mean"),
        }
    }
}

// mode:arithmetic_mean,max_measurements:20,latency_sample_amount:4
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThroughputHistorySettings {
    pub mean_mode: MeanCalculationMode, // mode

    // Samples kept per stream type. Pushing beyond it evicts the oldest.
    pub max_measurements: usize, // max_measurements

    // How many of the newest samples are averaged for dynamic (live) and
    // static (on-demand) content. `None` averages everything stored.
    pub dynamic_sample_amount: Option<usize>, // dynamic_sample_amount
    pub static_sample_amount: Option<usize>,  // static_sample_amount

    // How many of the newest latencies are averaged.
    pub latency_sample_amount: usize, // latency_sample_amount
}

impl Default for ThroughputHistorySettings {
    fn default() -> Self {
        Self {
            mean_mode: MeanCalculationMode::ArithmeticMean,
            max_measurements: Self::DEFAULT_MAX_MEASUREMENTS,
            dynamic_sample_amount: None,
            static_sample_amount: None,
            latency_sample_amount: Self::DEFAULT_LATENCY_SAMPLE_AMOUNT,
        }
    }
}

impl ThroughputHistorySettings {
    pub const DEFAULT_MAX_MEASUREMENTS: usize = 20;
    pub const DEFAULT_LATENCY_SAMPLE_AMOUNT: usize = 4;
    const MAX_MEASUREMENTS_LIMIT: usize = 1000;

    /// Parses a `key:value,key:value` settings string on top of the defaults.
    ///
    /// Unknown keys and malformed values are logged and skipped; the result is
    /// always usable.
    pub fn parse(settings: &str) -> Self {
        let mut parsed = Self::default();

        for entry in settings.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Some((key, value)) = entry.split_once(':') else {
                tracing::warn!("Ignoring malformed throughput history setting {:?}", entry);
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "mode" => parsed.mean_mode = MeanCalculationMode::parse(value),
                "max_measurements" => {
                    if let Some(amount) = parse_amount(key, value) {
                        parsed.max_measurements = amount;
                    }
                }
                "dynamic_sample_amount" => {
                    parsed.dynamic_sample_amount = parse_optional_amount(key, value)
                }
                "static_sample_amount" => {
                    parsed.static_sample_amount = parse_optional_amount(key, value)
                }
                "latency_sample_amount" => {
                    if let Some(amount) = parse_amount(key, value) {
                        parsed.latency_sample_amount = amount;
                    }
                }
                _ => tracing::warn!("Ignoring unknown throughput history setting {:?}", key),
            }
        }

        parsed.validate();
        parsed
    }

    pub fn validate(&mut self) {
        if self.max_measurements < 1 || Self::MAX_MEASUREMENTS_LIMIT < self.max_measurements {
            tracing::warn!("Max measurements must be between 1 and 1000");
            self.max_measurements = Self::DEFAULT_MAX_MEASUREMENTS;
        }
        if self.dynamic_sample_amount == Some(0) {
            tracing::warn!("Dynamic sample amount must be positive, averaging all samples");
            self.dynamic_sample_amount = None;
        }
        if self.static_sample_amount == Some(0) {
            tracing::warn!("Static sample amount must be positive, averaging all samples");
            self.static_sample_amount = None;
        }
        if self.latency_sample_amount < 1 {
            tracing::warn!("Latency sample amount must be positive");
            self.latency_sample_amount = Self::DEFAULT_LATENCY_SAMPLE_AMOUNT;
        }
    }

    /// Number of newest samples to average, or `None` for all of them.
    pub fn sample_amount(&self, is_dynamic: bool) -> Option<usize> {
        if is_dynamic {
            self.dynamic_sample_amount
        } else {
            self.static_sample_amount
        }
    }
}

fn parse_amount(key: &str, value: &str) -> Option<usize> {
    match value.parse::<usize>() {
        Ok(amount) => Some(amount),
        Err(err) => {
            tracing::warn!("Ignoring {}:{:?}: {}", key, value, err);
            None
        }
    }
}

// "all" clears the amount.
fn parse_optional_amount(key: &str, value: &str) -> Option<usize> {
    if value.eq_ignore_ascii_case("all") {
        return None;
    }
    parse_amount(key, value)
}
