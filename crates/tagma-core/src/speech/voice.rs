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

//! Seams for the platform audio collaborators.
//!
//! Speech-to-text and text-to-speech are external concerns: the pipeline
//! consumes transcript snapshots and emits utterances through these traits
//! without knowing what produces or renders them.

/// A source of cumulative speech transcriptions.
pub trait Transcriber: Send {
    /// Polls for a new cumulative transcript snapshot.
    ///
    /// Returns `None` when nothing new has been recognized since the last
    /// poll. Each returned string contains the *entire* transcript so far,
    /// not a delta.
    fn poll_transcription(&mut self) -> Option<String>;

    /// Discards the accumulated transcript and starts fresh.
    fn reset(&mut self);
}

/// A sink for spoken responses.
pub trait SpeechSynthesizer: Send {
    /// Queues an utterance for speaking.
    fn speak(&mut self, utterance: &str);

    /// Interrupts and discards any in-flight utterance.
    fn stop(&mut self);
}
