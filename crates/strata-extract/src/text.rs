//! Text content analysis.
//!
//! Provides simple statistics over prose:
//! - Line, word, character and sentence counts
//! - Most frequent keywords
//! - Flesch-Kincaid grade and Gunning fog index

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strata_core::{KeywordFrequency, ReadabilityScores, TextAnalysis};

use crate::error::ExtractError;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "to", "of", "in", "on", "at", "for", "and",
    "it", "this", "that", "with", "by", "as",
];

/// Configuration for text analysis.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct TextConfig {
    /// Number of keywords to keep.
    #[builder(default = "10")]
    pub top_keywords: usize,

    /// Keywords must be longer than this many characters.
    #[builder(default = "2")]
    pub min_keyword_len: usize,

    /// Words never counted as keywords.
    #[builder(default = "Self::default_stopwords()")]
    pub stopwords: Vec<String>,
}

impl TextConfigBuilder {
    fn default_stopwords() -> Vec<String> {
        STOPWORDS.iter().map(|w| w.to_string()).collect()
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            top_keywords: 10,
            min_keyword_len: 2,
            stopwords: TextConfigBuilder::default_stopwords(),
        }
    }
}

impl TextConfig {
    /// Create a new config builder.
    pub fn builder() -> TextConfigBuilder {
        TextConfigBuilder::default()
    }
}

/// Analyze text with the default configuration.
pub fn analyze_text(content: &str) -> TextAnalysis {
    TextAnalyzer::new().analyze(content)
}

/// Read a file and analyze it as text.
pub fn read_text(path: impl AsRef<Path>) -> Result<TextAnalysis, ExtractError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| ExtractError::io(path, e))?;
    if is_binary(&bytes) {
        return Err(ExtractError::Binary {
            path: path.to_path_buf(),
        });
    }
    Ok(analyze_text(&String::from_utf8_lossy(&bytes)))
}

/// Content is treated as binary when it holds a NUL byte.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.contains(&0)
}

/// Text analyzer.
#[derive(Debug, Default)]
pub struct TextAnalyzer {
    config: TextConfig,
}

impl TextAnalyzer {
    /// Create a new analyzer with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with custom config.
    pub fn with_config(config: TextConfig) -> Self {
        Self { config }
    }

    /// Analyze a piece of text.
    pub fn analyze(&self, content: &str) -> TextAnalysis {
        let words: Vec<&str> = content.split_whitespace().collect();
        let word_count = words.len() as u64;
        let sentence_count = count_sentences(content);

        let mut analysis = TextAnalysis {
            line_count: content.split('\n').count() as u64,
            word_count,
            char_count: content.chars().count() as u64,
            sentence_count,
            keywords: self.keywords(&words),
            is_binary: is_binary(content.as_bytes()),
            ..Default::default()
        };

        if words.is_empty() {
            return analysis;
        }

        // Trailing text without a terminator still reads as one sentence.
        let sentences = sentence_count.max(1) as f64;
        let word_total = word_count as f64;
        let letters: usize = words
            .iter()
            .map(|w| w.chars().filter(|c| c.is_alphanumeric()).count())
            .sum();
        analysis.average_word_length = letters as f64 / word_total;
        analysis.average_sentence_length = word_total / sentences;

        let syllables: Vec<u32> = words.iter().map(|w| estimate_syllables(w)).collect();
        let syllable_total: u32 = syllables.iter().sum();
        let complex = syllables.iter().filter(|&&s| s >= 3).count();
        let words_per_sentence = word_total / sentences;

        analysis.readability = Some(ReadabilityScores {
            flesch_kincaid_grade: 0.39 * words_per_sentence
                + 11.8 * (f64::from(syllable_total) / word_total)
                - 15.59,
            gunning_fog: 0.4 * (words_per_sentence + 100.0 * (complex as f64 / word_total)),
        });
        analysis
    }

    /// Most frequent keywords, ties broken alphabetically.
    fn keywords(&self, words: &[&str]) -> Vec<KeywordFrequency> {
        let stopwords: HashSet<&str> = self.config.stopwords.iter().map(String::as_str).collect();
        let mut counts: HashMap<String, u32> = HashMap::new();

        for word in words {
            let cleaned: String = word
                .to_lowercase()
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect();
            if cleaned.chars().count() > self.config.min_keyword_len
                && !stopwords.contains(cleaned.as_str())
            {
                *counts.entry(cleaned).or_default() += 1;
            }
        }

        let mut keywords: Vec<_> = counts
            .into_iter()
            .map(|(keyword, count)| KeywordFrequency::new(keyword, count))
            .collect();
        keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
        keywords.truncate(self.config.top_keywords);
        keywords
    }
}

/// Count runs of text terminated by `.`, `!` or `?`.
fn count_sentences(content: &str) -> u64 {
    let mut count = 0;
    let mut in_sentence = false;
    for c in content.chars() {
        if matches!(c, '.' | '!' | '?') {
            if in_sentence {
                count += 1;
                in_sentence = false;
            }
        } else if !c.is_whitespace() {
            in_sentence = true;
        }
    }
    count
}

/// Estimate syllables by counting vowel groups.
fn estimate_syllables(word: &str) -> u32 {
    let word: String = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();
    if word.is_empty() {
        return 0;
    }

    let mut groups = 0;
    let mut previous_vowel = false;
    for c in word.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !previous_vowel {
            groups += 1;
        }
        previous_vowel = vowel;
    }

    // Silent trailing 'e', as in "make", but not "table".
    if groups > 1 && word.ends_with('e') && !word.ends_with("le") {
        groups -= 1;
    }
    groups.max(1)
}
