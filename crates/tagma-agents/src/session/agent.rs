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

//! Defines the PerceptionSession, the central orchestrator for stream fusion.

use tagma_core::detection::{HandModel, ImageFrame, TagmaModel};
use tagma_core::event::EventBus;
use tagma_core::speech::Transcriber;
use tagma_core::utils::counter::WrappingCounter;
use tagma_telemetry::metrics::registry::{CounterHandle, MetricsRegistry};

use super::config::{SessionConfig, SessionEvent};
use crate::compiler::DetectionCompiler;
use crate::hand_agent::HandAgent;
use crate::speech_agent::{SpeechAgent, VoiceCommand};
use crate::vision_agent::VisionAgent;

/// Holds telemetry handles for the session.
struct SessionMetrics {
    frames_ingested: CounterHandle,
    frames_skipped: CounterHandle,
    answers_spoken: CounterHandle,
}

/// Fuses the three perception streams into spoken answers.
///
/// The session assigns wrapping frame ids, feeds every frame to the
/// hand agent and every Nth frame to the vision agent, joins the two
/// through the detection compiler, and resolves voice commands against
/// compiled results. All calls happen on one thread; output crosses to
/// the embedding application through the event bus only.
pub struct PerceptionSession {
    config: SessionConfig,
    vision: VisionAgent,
    hands: HandAgent,
    speech: SpeechAgent,
    compiler: DetectionCompiler,
    frame_counter: WrappingCounter,
    /// A command waiting for the next compiled result.
    loaded_command: Option<VoiceCommand>,
    events: EventBus<SessionEvent>,
    metrics: Option<SessionMetrics>,
}

impl PerceptionSession {
    /// Creates a session over concrete model and transcriber providers.
    pub fn new(
        config: SessionConfig,
        tagma_model: Box<dyn TagmaModel>,
        hand_model: Box<dyn HandModel>,
        transcriber: Box<dyn Transcriber>,
    ) -> Self {
        let vision = VisionAgent::new(tagma_model)
            .with_strategy(config.strategy)
            .with_interval(config.prediction_interval);
        let hands = HandAgent::new(hand_model);
        let mut speech = SpeechAgent::new(transcriber);
        speech.set_live(config.live);

        Self {
            config,
            vision,
            hands,
            speech,
            compiler: DetectionCompiler::new(config.compiler),
            frame_counter: WrappingCounter::new(config.frame_wrap),
            loaded_command: None,
            events: EventBus::new(),
            metrics: None,
        }
    }

    /// Attaches a metrics registry to the session and its agents.
    pub fn with_telemetry(mut self, registry: &MetricsRegistry) -> Self {
        self.vision = self.vision.with_telemetry(registry);
        self.hands = self.hands.with_telemetry(registry);
        self.speech = self.speech.with_telemetry(registry);
        self.compiler = self.compiler.with_telemetry(registry);
        self.metrics = Some(SessionMetrics {
            frames_ingested: registry
                .register_counter("session", "frames_ingested", "Frames accepted for processing")
                .unwrap(),
            frames_skipped: registry
                .register_counter(
                    "session",
                    "frames_skipped",
                    "Frames skipped while no command was loaded",
                )
                .unwrap(),
            answers_spoken: registry
                .register_counter("session", "answers_spoken", "Spoken answers published")
                .unwrap(),
        });
        self
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The output event bus.
    pub fn events(&self) -> &EventBus<SessionEvent> {
        &self.events
    }

    /// Collects all pending output events.
    pub fn drain_events(&self) -> Vec<SessionEvent> {
        self.events.drain()
    }

    /// Whether a command is waiting for a compiled result.
    pub fn has_loaded_command(&self) -> bool {
        self.loaded_command.is_some()
    }

    /// Whether the session reacts to voice commands.
    pub fn is_live(&self) -> bool {
        self.speech.is_live()
    }

    /// Toggles live mode.
    ///
    /// Entering live mode discards the loaded command and all compiler
    /// evidence; answers must come from what happens after going live.
    pub fn set_live(&mut self, live: bool) {
        if live != self.speech.is_live() {
            self.loaded_command = None;
            self.compiler.clear_outcomes();
            self.events.publish(SessionEvent::StopSpeaking);
        }
        self.speech.set_live(live);
    }

    /// Polls the transcription stream and resolves any new commands.
    pub fn poll_speech(&mut self) {
        let Some(update) = self.speech.poll() else {
            return;
        };
        self.events
            .publish(SessionEvent::TranscriptionChanged(update.text.text().to_owned()));

        for command in update.commands {
            self.handle_command(command);
        }
    }

    /// Ingests one captured frame.
    ///
    /// The frame's id is overwritten with the session's wrapping
    /// counter; capture sources do not need to number frames.
    pub fn ingest_frame(&mut self, frame: &ImageFrame) {
        // In live mode, frames only matter while an answer is pending.
        if self.speech.is_live() && self.loaded_command.is_none() {
            if let Some(metrics) = &self.metrics {
                let _ = metrics.frames_skipped.increment();
            }
            return;
        }

        let mut frame = frame.clone();
        frame.id = self.frame_counter.next();
        if let Some(metrics) = &self.metrics {
            let _ = metrics.frames_ingested.increment();
        }

        self.hands.process_frame(&frame);

        if let Some(outcome) = self.vision.process_frame(&frame) {
            self.compiler.add_outcome(&outcome, self.hands.latest());
        }

        if self.compiler.results_ready() {
            let results = self.compiler.retrieve_results();
            log::debug!(
                "[PerceptionSession] compiled {:?} at frame {}",
                results.held_tagmata,
                frame.id
            );
            self.events
                .publish(SessionEvent::ResultsCompiled(results.clone()));

            if let (Some(command), Some(tagma)) = (self.loaded_command.take(), results.best()) {
                // Test never loads; only the detection-backed commands get here.
                let answer = match command {
                    VoiceCommand::Information => tagma.description(),
                    _ => tagma.name(),
                };
                if let Some(metrics) = &self.metrics {
                    let _ = metrics.answers_spoken.increment();
                }
                self.events.publish(SessionEvent::Speak(answer.to_owned()));
            }
        }
    }

    fn handle_command(&mut self, command: VoiceCommand) {
        log::info!("[PerceptionSession] command {:?}", command);
        self.events.publish(SessionEvent::StopSpeaking);

        if command.needs_detection() {
            // Answer from fresh evidence only.
            self.compiler.clear_outcomes();
            self.loaded_command = Some(command);
        } else {
            self.events
                .publish(SessionEvent::Speak("Speech recognition is working.".to_owned()));
        }
    }
}
