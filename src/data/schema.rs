//! Raw payload schema and boundary validation.
//!
//! Everything arriving from the fetcher is parsed into these typed structs
//! before any domain object is constructed. A payload that fails to parse or
//! that carries no centroid is rejected here, so partial or corrupt data
//! never reaches the Graph aggregate.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to parse payload JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("payload {index} declares no centroid")]
    MissingCentroid { index: usize },
}

/// Top-level wrapper as delivered by the concept API:
/// `{ "data": { "centroids": [...], "nodes": [...], "edges": [...] } }`.
#[derive(Debug, Clone, Deserialize)]
struct RawPayload {
    data: RawDataset,
}

/// One per-primary-concept adjacency-list dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDataset {
    #[serde(default)]
    pub centroids: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

impl RawDataset {
    /// The primary concept that owns this dataset (first centroid).
    pub fn centroid(&self) -> Option<&str> {
        self.centroids.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    #[serde(rename = "cId")]
    pub c_id: String,
    /// Missing titles degrade to empty labels rather than erroring.
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
    pub similarity: f64,
}

impl RawEdge {
    /// True when both edges connect the same endpoints, in either direction.
    pub fn same_pair(&self, other: &RawEdge) -> bool {
        (self.source == other.source && self.target == other.target)
            || (self.source == other.target && self.target == other.source)
    }
}

/// Parse a single payload and check it carries a centroid.
pub fn parse_dataset(json: &str) -> Result<RawDataset, DataError> {
    let payload: RawPayload = serde_json::from_str(json)?;
    if payload.data.centroid().is_none() {
        return Err(DataError::MissingCentroid { index: 0 });
    }
    Ok(payload.data)
}

/// Parse a batch of payloads (one per primary concept, already joined by the
/// fetcher). All-or-nothing: the first bad payload fails the whole batch, so
/// a failed fetch never yields a partially merged graph.
pub fn parse_dataset_batch(json: &str) -> Result<Vec<RawDataset>, DataError> {
    let payloads: Vec<RawPayload> = serde_json::from_str(json)?;
    let mut datasets = Vec::with_capacity(payloads.len());
    for (index, payload) in payloads.into_iter().enumerate() {
        if payload.data.centroid().is_none() {
            return Err(DataError::MissingCentroid { index });
        }
        datasets.push(payload.data);
    }
    Ok(datasets)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "data": {
            "centroids": ["c1"],
            "nodes": [
                {"cId": "c1", "title": "Physics"},
                {"cId": "n1"}
            ],
            "edges": [
                {"source": "c1", "target": "n1", "similarity": 0.997}
            ]
        }
    }"#;

    #[test]
    fn test_parse_dataset() {
        let ds = parse_dataset(PAYLOAD).unwrap();
        assert_eq!(ds.centroid(), Some("c1"));
        assert_eq!(ds.nodes.len(), 2);
        assert_eq!(ds.edges.len(), 1);
        assert_eq!(ds.nodes[0].title, "Physics");
    }

    #[test]
    fn test_missing_title_defaults_to_empty() {
        let ds = parse_dataset(PAYLOAD).unwrap();
        assert_eq!(ds.nodes[1].title, "");
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(matches!(parse_dataset("{not json"), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_missing_centroid_rejected() {
        let json = r#"{"data": {"centroids": [], "nodes": [], "edges": []}}"#;
        assert!(matches!(
            parse_dataset(json),
            Err(DataError::MissingCentroid { index: 0 })
        ));
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let good = PAYLOAD;
        let bad = r#"{"data": {"centroids": [], "nodes": [], "edges": []}}"#;
        let batch = format!("[{good},{bad}]");
        assert!(matches!(
            parse_dataset_batch(&batch),
            Err(DataError::MissingCentroid { index: 1 })
        ));

        let batch = format!("[{good},{good}]");
        assert_eq!(parse_dataset_batch(&batch).unwrap().len(), 2);
    }

    #[test]
    fn test_same_pair_is_unordered() {
        let a = RawEdge { source: "x".into(), target: "y".into(), similarity: 1.0 };
        let b = RawEdge { source: "y".into(), target: "x".into(), similarity: 0.5 };
        let c = RawEdge { source: "x".into(), target: "z".into(), similarity: 1.0 };
        assert!(a.same_pair(&b));
        assert!(a.same_pair(&a));
        assert!(!a.same_pair(&c));
    }
}
