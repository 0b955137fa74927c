//! Cluster labeling via language-model completions.
//!
//! - [`CompletionService`]: async trait over the completion backend, with an
//!   object-safe [`DynCompletionService`] twin and a [`MockCompletion`] for
//!   tests
//! - [`ClusterLabeler`]: turns a cluster membership map into short labels,
//!   one bounded-concurrency request per cluster

pub mod labeler;
pub mod service;

pub use labeler::ClusterLabeler;
pub use service::{CompletionService, DynCompletionService, MockCompletion};
