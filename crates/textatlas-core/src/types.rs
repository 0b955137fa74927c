use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Identity and coordinates
// =============================================================================

/// Identifier assigned to a point by the density clusterer.
///
/// Non-negative values name discovered clusters; `ClusterId::NOISE` (-1)
/// marks points that fall below the density threshold. Ids may have gaps
/// after noise removal; no contiguity is guaranteed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterId(pub i32);

impl ClusterId {
    /// Sentinel for points not assigned to any cluster.
    pub const NOISE: ClusterId = ClusterId(-1);

    pub fn is_noise(&self) -> bool {
        *self == Self::NOISE
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 2D coordinate produced by the dimensionality reducer.
///
/// One per text chunk, recomputed per run; never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub x: f32,
    pub y: f32,
}

impl Projection {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// =============================================================================
// Entity structs
// =============================================================================

/// A unit of text treated as the atomic item for embedding and clustering.
///
/// Immutable once created; segmentation happens upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    pub id: Uuid,
    pub text: String,
    pub source_document_id: Option<Uuid>,
}

impl TextChunk {
    /// Create a chunk with a fresh id and no source document.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            source_document_id: None,
        }
    }

    /// Attach the originating document's id.
    pub fn with_source(mut self, document_id: Uuid) -> Self {
        self.source_document_id = Some(document_id);
        self
    }
}

/// A discovered cluster and its membership.
///
/// `label` is `None` until the labeler has run; the noise record carries
/// "Noise" by convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub cluster_id: ClusterId,
    pub member_chunk_ids: Vec<Uuid>,
    pub label: Option<String>,
}

/// One row of the tabular dataset handed to the visualization sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationRow {
    pub chunk_id: Uuid,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub cluster_id: ClusterId,
    pub cluster_label: String,
}

/// The complete output of one exploration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationResult {
    /// One row per input chunk, in input order.
    pub rows: Vec<ExplorationRow>,
    /// Cluster membership records, ascending by cluster id (noise first).
    pub clusters: Vec<ClusterRecord>,
    /// Number of real (non-noise) clusters discovered.
    pub cluster_count: usize,
    /// Number of points assigned the noise sentinel.
    pub noise_count: usize,
    pub generated_at: DateTime<Utc>,
}

// =============================================================================
// Tests
// =============================================================================
