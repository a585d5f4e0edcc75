//! Text analysis records.

use serde::{Deserialize, Serialize};

/// A keyword and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFrequency {
    pub keyword: String,
    pub count: u32,
}

impl KeywordFrequency {
    pub fn new(keyword: impl Into<String>, count: u32) -> Self {
        Self {
            keyword: keyword.into(),
            count,
        }
    }
}

/// Readability metrics for prose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityScores {
    /// Flesch-Kincaid grade level.
    pub flesch_kincaid_grade: f64,
    /// Gunning fog index.
    pub gunning_fog: f64,
}

/// Summary of a piece of text content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    /// Number of `\n`-separated segments.
    pub line_count: u64,
    /// Number of whitespace-separated words.
    pub word_count: u64,
    /// Number of Unicode scalar values.
    pub char_count: u64,
    /// Number of sentences terminated by `.`, `!` or `?`.
    pub sentence_count: u64,
    /// Most frequent keywords, most frequent first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<KeywordFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readability: Option<ReadabilityScores>,
    /// Content contains a NUL byte.
    pub is_binary: bool,
    pub average_word_length: f64,
    pub average_sentence_length: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
}

impl TextAnalysis {
    /// Most frequent keyword, if any.
    pub fn top_keyword(&self) -> Option<&KeywordFrequency> {
        self.keywords.first()
    }
}
