//! Textatlas lingua crate - language model, tokenization, and per-document statistics.
//!
//! Provides the linguistic feature extraction stage:
//! - Lexicon loading (built-in English or custom word lists)
//! - Sentence-aware tokenization with lemmas and stopword flags
//! - Top words, noun-phrase spans, and out-of-vocabulary rankings
//! - Graph-based keyword extraction
//! - Readability and lexical diversity metrics

pub mod analyzer;
pub mod document;
pub mod keywords;
pub mod model;

pub use analyzer::TextAnalyzer;
pub use document::{AnnotatedDocument, Token};
pub use model::LanguageModel;
