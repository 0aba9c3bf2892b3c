/*
 *  Copyright (c) 2024 The throughput_history project authors. All Rights Reserved.
 *
 *  Use of this source code is governed by a BSD-style license
 *  that can be found in the LICENSE file in the root of the source
 *  tree.
 */

use std::sync::{Arc, PoisonError, RwLock};

use super::ThroughputHistorySettings;

/// Source of the settings a [ThroughputHistory](crate::ThroughputHistory) runs with.
///
/// `current` is called on every push and query, so changes made by the owner
/// of the settings apply to the next call without re-pushing any samples.
pub trait SettingsProvider {
    fn current(&self) -> ThroughputHistorySettings;
}

/// Fixed settings, validated on every read.
impl SettingsProvider for ThroughputHistorySettings {
    fn current(&self) -> ThroughputHistorySettings {
        let mut settings = self.clone();
        settings.validate();
        settings
    }
}

impl<T: SettingsProvider + ?Sized> SettingsProvider for &T {
    fn current(&self) -> ThroughputHistorySettings {
        (**self).current()
    }
}

/// Settings shared with whoever owns the player configuration.
///
/// Clones refer to the same settings.
#[derive(Clone, Debug, Default)]
pub struct LiveSettings {
    inner: Arc<RwLock<ThroughputHistorySettings>>,
}

impl LiveSettings {
    pub fn new(mut settings: ThroughputHistorySettings) -> Self {
        settings.validate();
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Modifies the settings in place. The result is validated.
    pub fn update(&self, f: impl FnOnce(&mut ThroughputHistorySettings)) {
        let mut settings = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut settings);
        settings.validate();
    }

    pub fn replace(&self, settings: ThroughputHistorySettings) {
        self.update(|current| *current = settings);
    }

    /// Restores the defaults.
    pub fn reset(&self) {
        self.replace(ThroughputHistorySettings::default());
    }
}

impl SettingsProvider for LiveSettings {
    fn current(&self) -> ThroughputHistorySettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
