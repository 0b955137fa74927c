//! Tokenization and sentence annotation.
//!
//! An [`AnnotatedDocument`] is built once per text and reused by every
//! analyzer operation, so lemmatization and stopword lookups happen exactly
//! once per token.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::LanguageModel;

/// Word, number, or single punctuation mark. Apostrophe contractions
/// ("don't") stay one token.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)*|[0-9]+(?:\.[0-9]+)?|[^\sA-Za-z0-9]").unwrap()
});

/// One token of the source text with its precomputed annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token exactly as it appeared in the text.
    pub text: String,
    /// Lowercased form.
    pub lower: String,
    /// Dictionary base form (equals `lower` for non-alphabetic tokens).
    pub lemma: String,
    /// True when every character is alphabetic.
    pub is_alpha: bool,
    /// True when the lowercased form is in the model's stopword set.
    pub is_stop: bool,
    /// Zero-based index of the sentence this token belongs to.
    pub sentence: usize,
}

/// A text parsed into annotated tokens grouped by sentence.
#[derive(Debug, Clone)]
pub struct AnnotatedDocument {
    tokens: Vec<Token>,
    sentence_count: usize,
}

impl AnnotatedDocument {
    /// Tokenize and annotate `text` against the given model.
    pub fn parse(text: &str, model: &LanguageModel) -> Self {
        let mut tokens = Vec::new();
        let mut sentence_count = 0;

        for raw_sentence in split_sentences(text) {
            let before = tokens.len();
            for m in TOKEN_PATTERN.find_iter(raw_sentence) {
                let original = m.as_str();
                let lower = original.to_lowercase();
                let is_alpha = !original.is_empty() && original.chars().all(char::is_alphabetic);
                let is_stop = model.is_stopword(&lower);
                let lemma = if is_alpha {
                    model.lemmatize(&lower)
                } else {
                    lower.clone()
                };
                tokens.push(Token {
                    text: original.to_string(),
                    lower,
                    lemma,
                    is_alpha,
                    is_stop,
                    sentence: sentence_count,
                });
            }
            // Sentences without any token (stray whitespace) do not count.
            if tokens.len() > before {
                sentence_count += 1;
            }
        }

        Self {
            tokens,
            sentence_count,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn sentence_count(&self) -> usize {
        self.sentence_count
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Split on `.` `!` `?` followed by whitespace; the remainder is one sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, c) in text.char_indices() {
        if (c == '.' || c == '!' || c == '?') && i + 1 < text.len() {
            let next = bytes.get(i + 1).copied().unwrap_or(0);
            if next == b' ' || next == b'\n' {
                result.push(&text[start..=i]);
                start = i + 1;
            }
        }
    }
    if start < text.len() {
        result.push(&text[start..]);
    }
    result
}
