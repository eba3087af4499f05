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

//! Immutable transcription snapshots.

/// An immutable snapshot of a speech transcription.
///
/// Transcribers deliver *cumulative* text: each update contains everything
/// recognized since recording started. A new `SpeechText` is created per
/// update; the command interpreter compares occurrence counts across
/// snapshots to detect newly spoken keywords.
///
/// Text is lowercased on construction so all matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechText {
    text: String,
    words: Vec<String>,
}

impl SpeechText {
    /// Creates a snapshot from raw transcriber output.
    pub fn new(text: &str) -> Self {
        let text = text.to_lowercase();
        let words = text.split_whitespace().map(str::to_owned).collect();
        Self { text, words }
    }

    /// The full lowercased transcription.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The transcription tokenized into whitespace-separated words.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The most recently recognized word, if any.
    pub fn last_word(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }

    /// Returns `true` when nothing has been recognized yet.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Case-insensitive substring test.
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(&needle.to_lowercase())
    }

    /// Counts non-overlapping, case-insensitive occurrences of `needle`.
    ///
    /// An empty needle occurs zero times.
    pub fn occurrences(&self, needle: &str) -> usize {
        let needle = needle.to_lowercase();
        if needle.is_empty() {
            return 0;
        }
        self.text.matches(needle.as_str()).count()
    }
}

impl Default for SpeechText {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_tokenizes() {
        let speech = SpeechText::new("Tell me the NAME of this");
        assert_eq!(speech.text(), "tell me the name of this");
        assert_eq!(speech.words().len(), 6);
        assert_eq!(speech.last_word(), Some("this"));
    }

    #[test]
    fn test_empty_transcription() {
        let speech = SpeechText::default();
        assert!(speech.is_empty());
        assert_eq!(speech.last_word(), None);
        assert_eq!(speech.occurrences("name"), 0);
        assert!(!speech.contains("name"));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let speech = SpeechText::new("give me some Information please");
        assert!(speech.contains("INFORMATION"));
        assert!(speech.contains("info"));
        assert!(!speech.contains("name"));
    }

    #[test]
    fn test_occurrences_counts_repeats() {
        let speech = SpeechText::new("name the name of the name");
        assert_eq!(speech.occurrences("name"), 3);
        assert_eq!(speech.occurrences("the"), 2);
        assert_eq!(speech.occurrences("information"), 0);
        assert_eq!(speech.occurrences(""), 0);
    }
}
