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

//! Voice commands and the occurrence-counting interpreter.

use std::collections::HashMap;

use tagma_core::speech::SpeechText;

/// The spoken commands the pipeline reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceCommand {
    /// Speak the name of the held object.
    Name,
    /// Speak the information text for the held object.
    Information,
    /// Confirm that speech recognition is working.
    Test,
}

impl VoiceCommand {
    /// Every recognized command.
    pub const ALL: [VoiceCommand; 3] =
        [VoiceCommand::Name, VoiceCommand::Information, VoiceCommand::Test];

    /// The keyword that triggers this command.
    pub fn keyword(&self) -> &'static str {
        match self {
            VoiceCommand::Name => "name",
            VoiceCommand::Information => "information",
            VoiceCommand::Test => "test",
        }
    }

    /// `true` when the command needs a held object to answer.
    pub fn needs_detection(&self) -> bool {
        !matches!(self, VoiceCommand::Test)
    }
}

/// Recognizes newly spoken commands in a cumulative transcript.
///
/// Speech backends deliver the whole transcript on every update, so a
/// keyword spoken once keeps appearing in every snapshot. The
/// interpreter remembers how many occurrences of each keyword it has
/// already handled and fires only for the surplus, making each spoken
/// keyword trigger exactly once.
#[derive(Debug, Default)]
pub struct CommandInterpreter {
    handled: HashMap<VoiceCommand, usize>,
}

impl CommandInterpreter {
    /// Creates an interpreter with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the commands newly present in this transcript snapshot.
    pub fn interpret(&mut self, text: &SpeechText) -> Vec<VoiceCommand> {
        let mut fired = Vec::new();
        for command in VoiceCommand::ALL {
            let seen = text.occurrences(command.keyword());
            let handled = self.handled.entry(command).or_insert(0);
            if seen < *handled {
                // The transcriber restarted; realign with the new transcript.
                *handled = seen;
                continue;
            }
            while *handled < seen {
                fired.push(command);
                *handled += 1;
            }
        }
        fired
    }

    /// Clears the handled-occurrence history.
    pub fn reset(&mut self) {
        self.handled.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_fires_once_per_occurrence() {
        let mut interpreter = CommandInterpreter::new();

        let fired = interpreter.interpret(&SpeechText::new("what is the name"));
        assert_eq!(fired, vec![VoiceCommand::Name]);

        // Same transcript again: already handled.
        let fired = interpreter.interpret(&SpeechText::new("what is the name"));
        assert!(fired.is_empty());

        // The keyword spoken a second time fires again.
        let fired = interpreter.interpret(&SpeechText::new("what is the name tell me the name"));
        assert_eq!(fired, vec![VoiceCommand::Name]);
    }

    #[test]
    fn multiple_commands_in_one_update() {
        let mut interpreter = CommandInterpreter::new();
        let fired = interpreter.interpret(&SpeechText::new("test then give me information"));
        assert_eq!(fired, vec![VoiceCommand::Information, VoiceCommand::Test]);
    }

    #[test]
    fn reset_forgets_history() {
        let mut interpreter = CommandInterpreter::new();
        interpreter.interpret(&SpeechText::new("name"));
        interpreter.reset();

        let fired = interpreter.interpret(&SpeechText::new("name"));
        assert_eq!(fired, vec![VoiceCommand::Name]);
    }

    #[test]
    fn shrunken_transcript_realigns_history() {
        let mut interpreter = CommandInterpreter::new();
        interpreter.interpret(&SpeechText::new("name name"));

        // Backend restarted with a fresh, shorter transcript.
        let fired = interpreter.interpret(&SpeechText::new("name"));
        assert!(fired.is_empty());

        let fired = interpreter.interpret(&SpeechText::new("name name"));
        assert_eq!(fired, vec![VoiceCommand::Name]);
    }

    #[test]
    fn empty_transcript_fires_nothing() {
        let mut interpreter = CommandInterpreter::new();
        assert!(interpreter.interpret(&SpeechText::new("")).is_empty());
    }
}
