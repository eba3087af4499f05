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

//! The object classes the detection models are trained to recognize.

use serde::{Deserialize, Serialize};

/// A tagma: one of the anatomical body segments the pipeline recognizes.
///
/// The detection models label each bounding box with one of these classes.
/// The spoken answers for the "name" and "information" voice commands come
/// from [`Tagma::name`] and [`Tagma::description`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tagma {
    /// The head segment, carrying the antennae and mouthparts.
    Head,
    /// The thorax, the middle segment that bears the legs and wings.
    Thorax,
    /// The abdomen, the rear segment housing digestion and reproduction.
    Abdomen,
    /// The wings, attached to the thorax.
    Wings,
    /// The legs, three pairs attached to the thorax.
    Legs,
}

impl Tagma {
    /// Every recognizable class, in model-output order.
    pub const ALL: [Tagma; 5] = [
        Tagma::Head,
        Tagma::Thorax,
        Tagma::Abdomen,
        Tagma::Wings,
        Tagma::Legs,
    ];

    /// The spoken label for this class, as answered to the "name" command.
    pub fn name(&self) -> &'static str {
        match self {
            Tagma::Head => "head",
            Tagma::Thorax => "thorax",
            Tagma::Abdomen => "abdomen",
            Tagma::Wings => "wings",
            Tagma::Legs => "legs",
        }
    }

    /// The spoken information text for this class, as answered to the
    /// "information" command.
    pub fn description(&self) -> &'static str {
        match self {
            Tagma::Head => {
                "The head is the anterior tagma. It carries the compound eyes, \
                 the antennae, and the mouthparts used for feeding."
            }
            Tagma::Thorax => {
                "The thorax is the middle tagma. It is built from three fused \
                 segments and bears the legs and, where present, the wings."
            }
            Tagma::Abdomen => {
                "The abdomen is the posterior tagma. It contains most of the \
                 digestive, respiratory, and reproductive organs."
            }
            Tagma::Wings => {
                "The wings are membranous flight surfaces attached to the \
                 second and third thoracic segments."
            }
            Tagma::Legs => {
                "The legs are jointed walking limbs. Three pairs attach to the \
                 thorax, one pair per thoracic segment."
            }
        }
    }

    /// Parses a raw model label string into a class.
    ///
    /// Matching is case-insensitive and tolerant of singular/plural wing and
    /// leg labels. Unknown labels yield `None` and the detection is dropped
    /// by the caller.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "head" => Some(Tagma::Head),
            "thorax" => Some(Tagma::Thorax),
            "abdomen" => Some(Tagma::Abdomen),
            "wing" | "wings" => Some(Tagma::Wings),
            "leg" | "legs" => Some(Tagma::Legs),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tagma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for tagma in Tagma::ALL {
            assert_eq!(Tagma::from_label(tagma.name()), Some(tagma));
        }
    }

    #[test]
    fn test_label_parsing_is_case_insensitive() {
        assert_eq!(Tagma::from_label("Thorax"), Some(Tagma::Thorax));
        assert_eq!(Tagma::from_label("  HEAD "), Some(Tagma::Head));
        assert_eq!(Tagma::from_label("wing"), Some(Tagma::Wings));
        assert_eq!(Tagma::from_label("leg"), Some(Tagma::Legs));
        assert_eq!(Tagma::from_label("mandible"), None);
        assert_eq!(Tagma::from_label(""), None);
    }

    #[test]
    fn test_every_class_has_distinct_spoken_text() {
        for tagma in Tagma::ALL {
            assert!(!tagma.name().is_empty());
            assert!(tagma.description().len() > tagma.name().len());
        }
    }
}
