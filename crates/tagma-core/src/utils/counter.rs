// Copyright 2025 tagma contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A counter that wraps back to zero at a threshold.

/// A monotonically incrementing counter that wraps to zero at a threshold.
///
/// Frame ids only matter modulo the prediction interval, so the session
/// wraps them at a small threshold rather than letting them grow without
/// bound over a long capture. The threshold must be a multiple of every
/// sampling interval in use for the modulo to stay aligned across a wrap;
/// the default of 600 divides evenly by all supported intervals (1..=60).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappingCounter {
    value: u64,
    threshold: u64,
}

impl WrappingCounter {
    /// The default wrap threshold.
    pub const DEFAULT_THRESHOLD: u64 = 600;

    /// Creates a counter at zero that wraps when it reaches `threshold`.
    ///
    /// A zero threshold is treated as 1 (the counter pins at zero).
    pub fn new(threshold: u64) -> Self {
        Self {
            value: 0,
            threshold: threshold.max(1),
        }
    }

    /// The current value, always `< threshold`.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Returns the current value, then advances (wrapping at the threshold).
    pub fn next(&mut self) -> u64 {
        let current = self.value;
        self.value = (self.value + 1) % self.threshold;
        current
    }

    /// Resets the counter to zero.
    pub fn reset(&mut self) {
        self.value = 0;
    }
}

impl Default for WrappingCounter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}
