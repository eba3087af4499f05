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

//! Defines the SpeechAgent, the orchestrator for the transcription stream.

use tagma_core::speech::{SpeechText, Transcriber};
use tagma_telemetry::metrics::registry::{CounterHandle, MetricsRegistry};

use super::command::{CommandInterpreter, VoiceCommand};

/// One transcript update, with any commands it newly contains.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechUpdate {
    /// The cumulative transcript snapshot.
    pub text: SpeechText,
    /// Commands recognized in this update; empty while not live.
    pub commands: Vec<VoiceCommand>,
}

/// Holds telemetry handles for the speech subsystem.
struct SpeechMetrics {
    transcript_updates: CounterHandle,
    commands_recognized: CounterHandle,
}

/// The agent responsible for the transcription stream.
///
/// It polls the transcriber for cumulative snapshots, tracks the latest
/// transcription, and runs the command interpreter while live. Outside
/// live mode transcripts still flow (for display) but commands do not.
pub struct SpeechAgent {
    transcriber: Box<dyn Transcriber>,
    interpreter: CommandInterpreter,
    latest: SpeechText,
    live: bool,
    metrics: Option<SpeechMetrics>,
}

impl SpeechAgent {
    /// Creates a new `SpeechAgent` with a given transcriber.
    pub fn new(transcriber: Box<dyn Transcriber>) -> Self {
        Self {
            transcriber,
            interpreter: CommandInterpreter::new(),
            latest: SpeechText::default(),
            live: false,
            metrics: None,
        }
    }

    /// Attaches a metrics registry to the agent for observability.
    pub fn with_telemetry(mut self, registry: &MetricsRegistry) -> Self {
        let metrics = SpeechMetrics {
            transcript_updates: registry
                .register_counter("speech", "transcript_updates", "Transcript snapshots consumed")
                .unwrap(),
            commands_recognized: registry
                .register_counter("speech", "commands_recognized", "Voice commands recognized")
                .unwrap(),
        };
        self.metrics = Some(metrics);
        self
    }

    /// Whether the agent currently reacts to commands.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Toggles live mode.
    ///
    /// Going live restarts the transcriber and forgets command history,
    /// so stale keywords from before cannot fire.
    pub fn set_live(&mut self, live: bool) {
        if live && !self.live {
            self.transcriber.reset();
            self.interpreter.reset();
            self.latest = SpeechText::default();
        }
        self.live = live;
    }

    /// The most recent transcription.
    pub fn latest(&self) -> &SpeechText {
        &self.latest
    }

    /// Polls the transcriber, returning an update when the transcript changed.
    pub fn poll(&mut self) -> Option<SpeechUpdate> {
        let raw = self.transcriber.poll_transcription()?;
        let text = SpeechText::new(&raw);
        if text == self.latest {
            return None;
        }
        self.latest = text.clone();

        let commands = if self.live {
            self.interpreter.interpret(&text)
        } else {
            Vec::new()
        };

        if let Some(metrics) = &self.metrics {
            let _ = metrics.transcript_updates.increment();
            let _ = metrics.commands_recognized.add(commands.len() as u64);
        }
        if !commands.is_empty() {
            log::info!("[SpeechAgent] recognized {:?}", commands);
        }

        Some(SpeechUpdate { text, commands })
    }
}
