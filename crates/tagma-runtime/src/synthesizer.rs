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

//! A speech synthesizer that logs instead of speaking.

use tagma_core::speech::SpeechSynthesizer;

/// Stands in for the platform TTS in headless runs.
#[derive(Debug, Default)]
pub struct LogSynthesizer {
    speaking: bool,
}

impl LogSynthesizer {
    /// Creates the synthesizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an utterance is notionally in progress.
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }
}

impl SpeechSynthesizer for LogSynthesizer {
    fn speak(&mut self, text: &str) {
        self.speaking = true;
        log::info!("[TTS] {text}");
    }

    fn stop(&mut self) {
        if self.speaking {
            log::debug!("[TTS] interrupted");
        }
        self.speaking = false;
    }
}
