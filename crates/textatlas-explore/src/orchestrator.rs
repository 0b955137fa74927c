//! End-to-end exploration of a text corpus.
//!
//! The Explorer wires the pipeline stages together and owns their
//! configuration. A run either yields a complete [`ExplorationResult`] or an
//! error; partial results are never surfaced.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use textatlas_core::config::AtlasConfig;
use textatlas_core::error::{AtlasError, Result};
use textatlas_core::types::{
    ClusterId, ClusterRecord, ExplorationResult, ExplorationRow, TextChunk,
};
use textatlas_label::{ClusterLabeler, CompletionService};
use textatlas_map::{DensityClusterer, Projector};

use crate::embedding::EmbeddingService;

/// The exploration pipeline.
///
/// Processes a batch of text chunks through:
/// 1. Embedding via the [`EmbeddingService`]
/// 2. 2D projection of the embeddings
/// 3. Density clustering of the projected points
/// 4. Cluster labeling via the completion service
pub struct Explorer<E: EmbeddingService, C: CompletionService + 'static> {
    embedder: E,
    projector: Projector,
    clusterer: DensityClusterer,
    labeler: ClusterLabeler<C>,
}

impl<E: EmbeddingService, C: CompletionService + 'static> Explorer<E, C> {
    /// Create an explorer with the given services and configuration.
    pub fn new(embedder: E, completion: C, config: AtlasConfig) -> Self {
        Self {
            embedder,
            projector: Projector::new(config.projection),
            clusterer: DensityClusterer::new(config.clustering),
            labeler: ClusterLabeler::new(Arc::new(completion), config.labeling),
        }
    }

    /// Create an explorer with the default configuration.
    pub fn with_defaults(embedder: E, completion: C) -> Self {
        Self::new(embedder, completion, AtlasConfig::default())
    }

    /// Run the full pipeline over the chunks.
    ///
    /// Fails on the first stage error: an embedding shape mismatch, a batch
    /// too small to project (fewer than 2 chunks), invalid clustering input,
    /// or any failed label request. Row order matches input chunk order.
    pub async fn explore(&self, chunks: Vec<TextChunk>) -> Result<ExplorationResult> {
        info!(chunks = chunks.len(), "Starting exploration run");

        // Stage 1: embed all chunk texts.
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(AtlasError::Embedding(format!(
                "embedding count mismatch: {} texts, {} vectors",
                chunks.len(),
                embeddings.len()
            )));
        }
        let expected_dims = self.embedder.dimensions();
        for (index, vector) in embeddings.iter().enumerate() {
            if vector.len() != expected_dims {
                return Err(AtlasError::Embedding(format!(
                    "embedding dimension mismatch at index {}: expected {}, got {}",
                    index,
                    expected_dims,
                    vector.len()
                )));
            }
        }
        info!(
            vectors = embeddings.len(),
            dimensions = expected_dims,
            "Embedded chunks"
        );

        // Stage 2: project to 2D.
        let projections = self.projector.project(&embeddings)?;

        // Stage 3: cluster the layout.
        let assignments = self.clusterer.cluster(&projections)?;

        // Stage 4: group chunk indices by cluster.
        let mut members: BTreeMap<ClusterId, Vec<usize>> = BTreeMap::new();
        for (index, &cluster_id) in assignments.iter().enumerate() {
            members.entry(cluster_id).or_default().push(index);
        }
        debug!(groups = members.len(), "Grouped chunks by cluster");

        // Stage 5: label each cluster from its member texts.
        let cluster_texts: BTreeMap<ClusterId, Vec<String>> = members
            .iter()
            .map(|(&id, indices)| {
                (id, indices.iter().map(|&i| chunks[i].text.clone()).collect())
            })
            .collect();
        let labels = self.labeler.label(&cluster_texts).await?;

        // Stage 6: assemble the result.
        let mut rows = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let cluster_id = assignments[index];
            let label = labels.get(&cluster_id).ok_or_else(|| AtlasError::Labeling {
                cluster_id: cluster_id.0,
                reason: "label missing for cluster".to_string(),
            })?;
            rows.push(ExplorationRow {
                chunk_id: chunk.id,
                text: chunk.text.clone(),
                x: projections[index].x,
                y: projections[index].y,
                cluster_id,
                cluster_label: label.clone(),
            });
        }

        let clusters: Vec<ClusterRecord> = members
            .iter()
            .map(|(&id, indices)| ClusterRecord {
                cluster_id: id,
                member_chunk_ids: indices.iter().map(|&i| chunks[i].id).collect(),
                label: labels.get(&id).cloned(),
            })
            .collect();

        let cluster_count = clusters.iter().filter(|c| !c.cluster_id.is_noise()).count();
        let noise_count = assignments.iter().filter(|a| a.is_noise()).count();
        info!(
            rows = rows.len(),
            clusters = cluster_count,
            noise = noise_count,
            "Exploration run complete"
        );

        Ok(ExplorationResult {
            rows,
            clusters,
            cluster_count,
            noise_count,
            generated_at: Utc::now(),
        })
    }
}
