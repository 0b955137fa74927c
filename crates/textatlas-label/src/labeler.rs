//! Cluster labeling via a completion service.
//!
//! Sends one summarization prompt per cluster and collects the replies into
//! a label map. Requests run concurrently under a semaphore bound; any
//! failed request fails the whole pass so callers never see a partially
//! labeled result.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{Id as TaskId, JoinSet};
use tracing::{debug, info};

use textatlas_core::config::LabelingConfig;
use textatlas_core::error::{AtlasError, Result};
use textatlas_core::types::ClusterId;

use crate::service::CompletionService;

/// Names clusters by asking a language model for a short summary of their
/// member texts.
///
/// The noise bucket is never sent out; it always maps to the literal label
/// `"Noise"`.
pub struct ClusterLabeler<C: CompletionService + 'static> {
    service: Arc<C>,
    config: LabelingConfig,
}

impl<C: CompletionService + 'static> ClusterLabeler<C> {
    pub fn new(service: Arc<C>, config: LabelingConfig) -> Self {
        Self { service, config }
    }

    pub fn with_defaults(service: Arc<C>) -> Self {
        Self::new(service, LabelingConfig::default())
    }

    /// Label every cluster in the map.
    ///
    /// Issues one completion request per non-noise cluster, at most
    /// `max_concurrent_requests` in flight at a time, each bounded by
    /// `timeout_secs`. A timed-out request, a service error, or an empty
    /// (post-trim) reply fails the pass with [`AtlasError::Labeling`] naming
    /// the cluster; there is no placeholder fallback.
    pub async fn label(
        &self,
        clusters: &BTreeMap<ClusterId, Vec<String>>,
    ) -> Result<BTreeMap<ClusterId, String>> {
        let mut labels = BTreeMap::new();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_requests.max(1)));
        let deadline = Duration::from_secs(self.config.timeout_secs);

        let mut tasks: JoinSet<(ClusterId, std::result::Result<String, String>)> = JoinSet::new();
        let mut clusters_by_task: HashMap<TaskId, ClusterId> = HashMap::new();

        for (&cluster_id, texts) in clusters {
            if cluster_id.is_noise() {
                labels.insert(cluster_id, "Noise".to_string());
                continue;
            }
            let prompt = self.build_prompt(texts);
            let service = Arc::clone(&self.service);
            let semaphore = Arc::clone(&semaphore);
            let handle = tasks.spawn(async move {
                let result = request_label(service, semaphore, prompt, deadline).await;
                (cluster_id, result)
            });
            clusters_by_task.insert(handle.id(), cluster_id);
        }

        debug!(
            model = self.service.model(),
            requests = tasks.len(),
            "Dispatching label requests"
        );

        while let Some(joined) = tasks.join_next().await {
            let (cluster_id, result) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    let cluster_id = clusters_by_task
                        .get(&e.id())
                        .copied()
                        .unwrap_or(ClusterId::NOISE);
                    return Err(AtlasError::Labeling {
                        cluster_id: cluster_id.0,
                        reason: format!("labeling task panicked: {}", e),
                    });
                }
            };
            let label = result.map_err(|reason| AtlasError::Labeling {
                cluster_id: cluster_id.0,
                reason,
            })?;
            labels.insert(cluster_id, label);
        }

        info!(labeled = labels.len(), "Cluster labeling complete");
        Ok(labels)
    }

    /// Join the member texts and wrap them in the summarization prompt.
    ///
    /// The joined content is hard-truncated to `max_prompt_chars` characters
    /// before templating; the cut is not token-aware.
    fn build_prompt(&self, texts: &[String]) -> String {
        let joined = texts.join(" ");
        let content: String = joined.chars().take(self.config.max_prompt_chars).collect();
        format!(
            "Provide a concise 2-3 word label that summarizes the following texts:\n\n{}\n\nLabel:",
            content
        )
    }
}

async fn request_label<C: CompletionService>(
    service: Arc<C>,
    semaphore: Arc<Semaphore>,
    prompt: String,
    deadline: Duration,
) -> std::result::Result<String, String> {
    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => return Err("request limiter closed".to_string()),
    };
    match tokio::time::timeout(deadline, service.complete(&prompt)).await {
        Err(_) => Err(format!(
            "request timed out after {}s",
            deadline.as_secs()
        )),
        Ok(Err(e)) => Err(e.to_string()),
        Ok(Ok(reply)) => {
            let trimmed = reply.trim();
            if trimmed.is_empty() {
                Err("empty completion response".to_string())
            } else {
                Ok(trimmed.to_string())
            }
        }
    }
}
