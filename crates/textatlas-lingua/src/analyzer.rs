//! Per-document linguistic statistics.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use textatlas_core::error::{AtlasError, Result};

use crate::document::{AnnotatedDocument, Token};
use crate::keywords;
use crate::model::LanguageModel;

/// Positions within this distance form a co-occurrence edge.
const KEYWORD_WINDOW: usize = 10;

/// Computes ranking and readability statistics for one text.
///
/// The text is parsed once on construction; every operation below reads the
/// same annotated document, so repeated calls are cheap and consistent.
pub struct TextAnalyzer {
    model: Arc<LanguageModel>,
    doc: AnnotatedDocument,
}

impl TextAnalyzer {
    pub fn new(text: &str, model: Arc<LanguageModel>) -> Self {
        let doc = AnnotatedDocument::parse(text, &model);
        debug!(
            tokens = doc.tokens().len(),
            sentences = doc.sentence_count(),
            "Parsed document"
        );
        Self { model, doc }
    }

    /// The parsed document backing this analyzer.
    pub fn document(&self) -> &AnnotatedDocument {
        &self.doc
    }

    /// Top noun-phrase spans: maximal runs of two or more consecutive
    /// alphabetic non-stopword tokens within one sentence (leading
    /// determiners drop out as stopwords).
    ///
    /// The value for a phrase is its span length in tokens, not its
    /// frequency; duplicate renderings collapse into the first occurrence.
    pub fn top_noun_phrases(&self, k: usize) -> Vec<(String, usize)> {
        let mut spans: Vec<(String, usize)> = Vec::new();
        let mut run: Vec<&str> = Vec::new();
        let mut run_sentence = 0;
        for token in self.doc.tokens() {
            if token.is_alpha
                && !token.is_stop
                && (run.is_empty() || token.sentence == run_sentence)
            {
                if run.is_empty() {
                    run_sentence = token.sentence;
                }
                run.push(&token.text);
                continue;
            }
            if run.len() >= 2 {
                spans.push((run.join(" "), run.len()));
            }
            run.clear();
            if token.is_alpha && !token.is_stop {
                run_sentence = token.sentence;
                run.push(&token.text);
            }
        }
        if run.len() >= 2 {
            spans.push((run.join(" "), run.len()));
        }

        let mut seen = HashSet::new();
        let mut phrases: Vec<(String, usize)> = Vec::new();
        for (text, len) in spans {
            if seen.insert(text.clone()) {
                phrases.push((text, len));
            }
        }
        take_top_k(phrases, k)
    }

    /// Top out-of-vocabulary words: alphabetic non-stopword tokens whose
    /// lemma is unknown to the model, keyed by the token's original text.
    pub fn top_oov_words(&self, k: usize) -> Vec<(String, usize)> {
        let counts = tally(
            self.doc
                .tokens()
                .iter()
                .filter(|t| t.is_alpha && !t.is_stop && !self.model.in_vocabulary(&t.lemma))
                .map(|t| t.text.clone()),
        );
        take_top_k(counts, k)
    }

    /// Top lowercased alphabetic non-stopword tokens by count.
    pub fn top_words(&self, k: usize) -> Vec<(String, usize)> {
        let counts = tally(
            self.doc
                .tokens()
                .iter()
                .filter(|t| t.is_alpha && !t.is_stop)
                .map(|t| t.lower.clone()),
        );
        take_top_k(counts, k)
    }

    /// Keywords by graph centrality, re-ranked by raw occurrence count.
    ///
    /// Candidate terms are the lemmas of alphabetic non-stopword tokens. The
    /// top `k` terms by centrality score are kept, then sorted by how often
    /// the lemma occurs anywhere in the document, descending, stable.
    ///
    /// Fails with [`AtlasError::Extraction`] when the text yields no
    /// candidate terms.
    pub fn keywords(&self, k: usize) -> Result<Vec<(String, usize)>> {
        let candidates: Vec<String> = self
            .doc
            .tokens()
            .iter()
            .filter(|t| t.is_alpha && !t.is_stop)
            .map(|t| t.lemma.clone())
            .collect();
        if candidates.is_empty() {
            return Err(AtlasError::Extraction(
                "no candidate terms for keyword extraction".to_string(),
            ));
        }

        let mut ranked = keywords::rank_terms(&candidates, KEYWORD_WINDOW);
        ranked.truncate(k);

        let mut counted: Vec<(String, usize)> = ranked
            .into_iter()
            .map(|(term, _)| {
                let count = self
                    .doc
                    .tokens()
                    .iter()
                    .filter(|t| t.lemma == term)
                    .count();
                (term, count)
            })
            .collect();
        counted.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(counted)
    }

    /// Flesch-Kincaid grade level:
    /// `0.39 * (words / sentences) + 11.8 * (syllables / words) - 15.59`.
    ///
    /// Words are alphabetic tokens; syllables come from a vowel-group
    /// heuristic. Returns 0.0 for a document with no words.
    pub fn flesch_kincaid_grade(&self) -> f64 {
        let words: Vec<&Token> = self.doc.tokens().iter().filter(|t| t.is_alpha).collect();
        if words.is_empty() {
            return 0.0;
        }
        let word_count = words.len() as f64;
        let sentence_count = self.doc.sentence_count().max(1) as f64;
        let syllable_count: usize = words.iter().map(|t| count_syllables(&t.lower)).sum();

        0.39 * (word_count / sentence_count) + 11.8 * (syllable_count as f64 / word_count)
            - 15.59
    }

    /// Distinct lowercased alphabetic tokens over total alphabetic tokens,
    /// in [0, 1]. Returns 0.0 for a document with no words.
    pub fn type_token_ratio(&self) -> f64 {
        let mut total = 0usize;
        let mut distinct: HashSet<&str> = HashSet::new();
        for token in self.doc.tokens().iter().filter(|t| t.is_alpha) {
            total += 1;
            distinct.insert(token.lower.as_str());
        }
        if total == 0 {
            return 0.0;
        }
        distinct.len() as f64 / total as f64
    }
}

/// Count items, preserving first-appearance order so ties stay stable.
fn tally<I: IntoIterator<Item = String>>(items: I) -> Vec<(String, usize)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for item in items {
        match index.get(&item) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts
}

/// Stable sort by value descending, truncated to `k`.
fn take_top_k(mut entries: Vec<(String, usize)>, k: usize) -> Vec<(String, usize)> {
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(k);
    entries
}

/// Vowel-group syllable count with a silent final "e" adjustment, minimum 1.
fn count_syllables(word: &str) -> usize {
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0;
    let mut prev_vowel = false;
    for c in word.chars() {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    // "make" drops its final e; consonant-le endings ("table") keep theirs.
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    if count > 1
        && n >= 2
        && chars[n - 1] == 'e'
        && !(n >= 3 && chars[n - 2] == 'l' && !is_vowel(chars[n - 3]))
    {
        count -= 1;
    }
    count.max(1)
}
