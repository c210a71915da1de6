//! Analysis kind identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CatalogError;

/// One named unit of analysis work.
///
/// The set is closed; the declaration order is the catalog order used when a
/// client asks for every analysis at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Transcription,
    Audio,
    AudioGaps,
    NoiseDetection,
    Silence,
    Volume,
    BackgroundPeople,
    ExcessiveGestures,
    Metrics,
    LanguageComplexity,
    LanguageErrors,
    EmotionalAnalysis,
    TargetGroup,
    TopicChange,
    Jargon,
    Numbers,
    DifficultWords,
    LongSentences,
    Repetition,
    QualitySummary,
}

impl AnalysisKind {
    /// Every kind, in catalog order.
    pub const ALL: [AnalysisKind; 20] = [
        AnalysisKind::Transcription,
        AnalysisKind::Audio,
        AnalysisKind::AudioGaps,
        AnalysisKind::NoiseDetection,
        AnalysisKind::Silence,
        AnalysisKind::Volume,
        AnalysisKind::BackgroundPeople,
        AnalysisKind::ExcessiveGestures,
        AnalysisKind::Metrics,
        AnalysisKind::LanguageComplexity,
        AnalysisKind::LanguageErrors,
        AnalysisKind::EmotionalAnalysis,
        AnalysisKind::TargetGroup,
        AnalysisKind::TopicChange,
        AnalysisKind::Jargon,
        AnalysisKind::Numbers,
        AnalysisKind::DifficultWords,
        AnalysisKind::LongSentences,
        AnalysisKind::Repetition,
        AnalysisKind::QualitySummary,
    ];

    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Transcription => "transcription",
            AnalysisKind::Audio => "audio",
            AnalysisKind::AudioGaps => "audio_gaps",
            AnalysisKind::NoiseDetection => "noise_detection",
            AnalysisKind::Silence => "silence",
            AnalysisKind::Volume => "volume",
            AnalysisKind::BackgroundPeople => "background_people",
            AnalysisKind::ExcessiveGestures => "excessive_gestures",
            AnalysisKind::Metrics => "metrics",
            AnalysisKind::LanguageComplexity => "language_complexity",
            AnalysisKind::LanguageErrors => "language_errors",
            AnalysisKind::EmotionalAnalysis => "emotional_analysis",
            AnalysisKind::TargetGroup => "target_group",
            AnalysisKind::TopicChange => "topic_change",
            AnalysisKind::Jargon => "jargon",
            AnalysisKind::Numbers => "numbers",
            AnalysisKind::DifficultWords => "difficult_words",
            AnalysisKind::LongSentences => "long_sentences",
            AnalysisKind::Repetition => "repetition",
            AnalysisKind::QualitySummary => "quality_summary",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownAnalysisKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kind() {
        assert_eq!(
            "background_people".parse::<AnalysisKind>().unwrap(),
            AnalysisKind::BackgroundPeople
        );
        assert_eq!(
            "quality_summary".parse::<AnalysisKind>().unwrap(),
            AnalysisKind::QualitySummary
        );
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = "lip_reading".parse::<AnalysisKind>().unwrap_err();
        assert!(matches!(err, CatalogError::UnknownAnalysisKind(ref name) if name == "lip_reading"));
    }

    #[test]
    fn test_wire_name_matches_serde() {
        for kind in AnalysisKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_all_is_in_declaration_order() {
        let mut sorted = AnalysisKind::ALL;
        sorted.sort();
        assert_eq!(sorted, AnalysisKind::ALL);
    }
}
