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

//! A simple stopwatch for measuring elapsed time.

use std::time::Instant;

/// Measures wall-clock time between its creation (or last restart) and now.
///
/// Used by the telemetry crate's scoped timers to record inference and
/// compile latencies.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started_at: Option<Instant>,
}

impl Stopwatch {
    /// Creates a stopwatch and starts it immediately.
    pub fn new() -> Self {
        Self {
            started_at: Some(Instant::now()),
        }
    }

    /// Creates a stopwatch that has not been started.
    pub fn unstarted() -> Self {
        Self { started_at: None }
    }

    /// Starts (or restarts) the stopwatch.
    pub fn restart(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Returns the elapsed time in seconds, or `None` if never started.
    pub fn elapsed_secs_f64(&self) -> Option<f64> {
        self.started_at.map(|t| t.elapsed().as_secs_f64())
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
