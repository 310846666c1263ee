use chrono::{DateTime, Utc};
use solar_analysis::{AnalysisOutput, AnalysisParams, Artifact, Metrics};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// One finished analysis
#[derive(Debug)]
pub struct AnalysisRecord {
    pub id: Uuid,
    /// Sanitized upload name
    pub filename: String,
    pub params: AnalysisParams,
    pub output: AnalysisOutput,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(filename: String, params: AnalysisParams, output: AnalysisOutput) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            params,
            output,
            created_at: Utc::now(),
        }
    }

    pub fn metrics(&self) -> Metrics {
        self.output.metrics
    }

    /// PNG bytes of one artifact
    pub fn artifact(&self, artifact: Artifact) -> &[u8] {
        self.output.artifact(artifact)
    }
}

#[derive(Default)]
struct Entries {
    by_id: HashMap<Uuid, Arc<AnalysisRecord>>,
    /// Insertion order, oldest first
    order: VecDeque<Uuid>,
}

/// Bounded in-memory store of recent analyses, keyed by id
pub struct ResultStore {
    capacity: usize,
    entries: RwLock<Entries>,
}

impl ResultStore {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(Entries::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store a record, evicting the oldest ones beyond capacity
    pub async fn insert(&self, record: AnalysisRecord) -> Arc<AnalysisRecord> {
        let record = Arc::new(record);
        let mut entries = self.entries.write().await;

        entries.by_id.insert(record.id, record.clone());
        entries.order.push_back(record.id);

        while entries.order.len() > self.capacity {
            if let Some(evicted) = entries.order.pop_front() {
                entries.by_id.remove(&evicted);
                tracing::debug!(id = %evicted, "Evicted analysis from result store");
            }
        }

        record
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<AnalysisRecord>> {
        let entries = self.entries.read().await;
        entries.by_id.get(id).cloned()
    }

    /// Up to `limit` records, newest first
    pub async fn recent(&self, limit: usize) -> Vec<Arc<AnalysisRecord>> {
        let entries = self.entries.read().await;
        entries
            .order
            .iter()
            .rev()
            .take(limit)
            .filter_map(|id| entries.by_id.get(id).cloned())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> AnalysisRecord {
        AnalysisRecord::new(
            name.to_string(),
            AnalysisParams::default(),
            AnalysisOutput {
                metrics: Metrics::ZERO,
                original: vec![1],
                segmented: vec![2],
                shadow_overlay: vec![3],
                edges: vec![4],
            },
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = ResultStore::new(4);
        let stored = store.insert(record("a.png")).await;

        let found = store.get(&stored.id).await.unwrap();
        assert_eq!(found.filename, "a.png");
        assert_eq!(found.artifact(Artifact::Edges), &[4]);
        assert!(store.get(&Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_oldest_evicted() {
        let store = ResultStore::new(2);
        let first = store.insert(record("1.png")).await;
        let second = store.insert(record("2.png")).await;
        let third = store.insert(record("3.png")).await;

        assert_eq!(store.len().await, 2);
        assert!(store.get(&first.id).await.is_none());
        assert!(store.get(&second.id).await.is_some());
        assert!(store.get(&third.id).await.is_some());
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let store = ResultStore::new(8);
        for name in ["1.png", "2.png", "3.png"] {
            store.insert(record(name)).await;
        }

        let names: Vec<String> = store
            .recent(2)
            .await
            .iter()
            .map(|r| r.filename.clone())
            .collect();
        assert_eq!(names, vec!["3.png", "2.png"]);
    }

    #[tokio::test]
    async fn test_zero_capacity_keeps_latest() {
        let store = ResultStore::new(0);
        assert_eq!(store.capacity(), 1);
        store.insert(record("1.png")).await;
        let last = store.insert(record("2.png")).await;
        assert_eq!(store.len().await, 1);
        assert!(store.get(&last.id).await.is_some());
    }
}
