//! Placeholder results for completed analyses.
//!
//! No real audio or video processing happens here. Every kind maps to a fixed
//! result derived from one sample transcript, so repeated runs and repeated
//! tickets always report the same data.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{json, Value};

use super::kind::AnalysisKind;

const SAMPLE_TEXT: &str = "Informujemy, że awaria infrastruktury IT została naprawiona. \
Wszystkie usługi resortu są już dostępne, a dane podatników niezagrożone. \
Sytuacja była spowodowana problemami technicznymi. \
Centrum informatyki zdiagnozowało przyczynę i rozwiązało problem.";

/// Offset of the first spoken word, in seconds.
const SPEECH_START: f64 = 10.5;

/// Base duration of a spoken word, in seconds.
const WORD_DURATION: f64 = 0.46;

/// Words at least this long count as difficult.
const DIFFICULT_WORD_CHARS: usize = 12;

/// Sentences with more words than this count as long.
const LONG_SENTENCE_WORDS: usize = 8;

/// A transcribed word with its time span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// A time range within the video, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gap {
    pub start: f64,
    pub end: f64,
}

impl Gap {
    const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Word timings vary with word length instead of randomly, within +-0.1s.
fn sample_words() -> Vec<TimedWord> {
    let mut current = SPEECH_START;
    SAMPLE_TEXT
        .split_whitespace()
        .map(|word| {
            let start = current;
            let jitter = (word.chars().count() % 5) as f64 * 0.05 - 0.1;
            current = round2(current + WORD_DURATION + jitter);
            TimedWord {
                word: word.to_string(),
                start,
                end: current,
            }
        })
        .collect()
}

fn normalize(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

fn ends_sentence(word: &str) -> bool {
    word.ends_with(['.', '!', '?'])
}

fn spans(words: &[TimedWord], predicate: impl Fn(&TimedWord) -> bool) -> Vec<Gap> {
    words
        .iter()
        .filter(|w| predicate(w))
        .map(|w| Gap::new(w.start, w.end))
        .collect()
}

/// First word of every sentence after the opening one.
fn sentence_starts(words: &[TimedWord]) -> Vec<Gap> {
    words
        .windows(2)
        .filter(|pair| ends_sentence(&pair[0].word))
        .map(|pair| Gap::new(pair[1].start, pair[1].end))
        .collect()
}

fn difficult_words(words: &[TimedWord]) -> Vec<Gap> {
    spans(words, |w| {
        normalize(&w.word).chars().count() >= DIFFICULT_WORD_CHARS
    })
}

fn long_sentences(words: &[TimedWord]) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let mut sentence: Vec<&TimedWord> = Vec::new();
    for word in words {
        sentence.push(word);
        if ends_sentence(&word.word) {
            if sentence.len() > LONG_SENTENCE_WORDS {
                if let (Some(first), Some(last)) = (sentence.first(), sentence.last()) {
                    gaps.push(Gap::new(first.start, last.end));
                }
            }
            sentence.clear();
        }
    }
    gaps
}

fn repetitions(words: &[TimedWord]) -> Vec<Gap> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in words {
        *counts.entry(normalize(&word.word)).or_default() += 1;
    }
    words
        .iter()
        .filter(|w| {
            let key = normalize(&w.word);
            key.chars().count() > 3 && counts.get(&key).copied().unwrap_or(0) > 1
        })
        .map(|w| Gap::new(w.start, w.end))
        .collect()
}

fn gaps(ranges: &[Gap]) -> Value {
    json!({ "gaps": ranges })
}

fn build_payloads() -> HashMap<AnalysisKind, Value> {
    let words = sample_words();
    let text = words
        .iter()
        .map(|w| w.word.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let speech_end = words.last().map_or(SPEECH_START, |w| w.end);
    let speech_secs = speech_end - SPEECH_START;
    let duration = round2(speech_end + 2.0);

    let mut payloads = HashMap::new();
    for kind in AnalysisKind::ALL {
        let payload = match kind {
            AnalysisKind::Transcription => json!({ "words": words, "text": text }),
            AnalysisKind::Audio => json!({
                "sample_rate": 48_000,
                "channels": 2,
                "duration": duration,
            }),
            AnalysisKind::AudioGaps => gaps(&[Gap::new(0.0, SPEECH_START)]),
            AnalysisKind::NoiseDetection => json!({
                "noise_level": 0.2,
                "gaps": [Gap::new(4.0, 6.5)],
            }),
            AnalysisKind::Silence => gaps(&[
                Gap::new(0.0, SPEECH_START),
                Gap::new(speech_end, duration),
            ]),
            AnalysisKind::Volume => gaps(&[Gap::new(14.0, 15.2)]),
            AnalysisKind::BackgroundPeople => gaps(&[Gap::new(0.0, 1.0), Gap::new(2.0, 3.0)]),
            AnalysisKind::ExcessiveGestures => gaps(&[Gap::new(12.3, 13.9)]),
            AnalysisKind::Metrics => json!({
                "word_count": words.len(),
                "duration": round2(speech_secs),
                "words_per_minute": round2(words.len() as f64 * 60.0 / speech_secs),
            }),
            AnalysisKind::LanguageComplexity => json!({ "tier": "B2" }),
            AnalysisKind::LanguageErrors => json!({
                "errors": [
                    "Word 'are' should be replaced with 'is' in the sentence 'There are not many of them'.",
                    "Word 'important' can be replaced with 'crucial' in the sentence 'They are very important' to better convey the message.",
                ],
            }),
            AnalysisKind::EmotionalAnalysis => json!({
                "emotions": { "anger": 0.1, "happiness": 0.9 },
            }),
            AnalysisKind::TargetGroup => json!({ "age_range": [18, 35] }),
            AnalysisKind::TopicChange => gaps(&sentence_starts(&words)),
            AnalysisKind::Jargon => gaps(&spans(&words, |w| normalize(&w.word) == "it")),
            AnalysisKind::Numbers => gaps(&spans(&words, |w| {
                w.word.chars().any(|c| c.is_ascii_digit())
            })),
            AnalysisKind::DifficultWords => gaps(&difficult_words(&words)),
            AnalysisKind::LongSentences => gaps(&long_sentences(&words)),
            AnalysisKind::Repetition => gaps(&repetitions(&words)),
            AnalysisKind::QualitySummary => json!({
                "transcription": 0.9,
                "audio_gaps": 0.5,
                "noise_detection": 0.8,
            }),
        };
        payloads.insert(kind, payload);
    }
    payloads
}

static PAYLOADS: Lazy<HashMap<AnalysisKind, Value>> = Lazy::new(build_payloads);

/// Completed result for `kind`.
pub fn payload_for(kind: AnalysisKind) -> Value {
    PAYLOADS.get(&kind).cloned().unwrap_or_else(|| json!({}))
}
