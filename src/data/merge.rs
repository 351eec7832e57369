//! Data Merger: combines per-primary-concept datasets into one node/edge set.
//!
//! Each payload's nodes are tagged with the payload's centroid before the
//! lists are concatenated, so every node knows which primary concept owns it.
//! Node deduplication happens here (first occurrence wins, including its
//! owner tag); edge filtering is a separate pass in `graph::filter`.

use std::collections::HashSet;

use crate::data::{RawDataset, RawEdge};
use crate::graph::ConceptNode;

/// Result of merging: deduplicated nodes, concatenated (unfiltered) edges,
/// and the primary-concept ids in payload order.
#[derive(Debug, Clone, Default)]
pub struct MergedData {
    pub nodes: Vec<ConceptNode>,
    pub edges: Vec<RawEdge>,
    pub primary_cids: Vec<String>,
}

/// Merge an ordered sequence of datasets. Order within a payload is
/// preserved; cross-payload order is concatenation order. An empty input
/// yields an empty merged graph, not an error.
pub fn merge_datasets(datasets: &[RawDataset]) -> MergedData {
    let mut merged = MergedData::default();
    let mut seen: HashSet<String> = HashSet::new();

    for dataset in datasets {
        // Validated at the schema boundary; datasets without a centroid
        // cannot get this far.
        let Some(centroid) = dataset.centroid() else { continue };
        merged.primary_cids.push(centroid.to_string());

        for node in &dataset.nodes {
            if !seen.insert(node.c_id.clone()) {
                continue;
            }
            merged.nodes.push(ConceptNode::new(
                node.c_id.clone(),
                node.title.clone(),
                centroid.to_string(),
                node.c_id == centroid,
            ));
        }

        merged.edges.extend(dataset.edges.iter().cloned());
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawNode;

    fn dataset(centroid: &str, node_ids: &[&str], edges: &[(&str, &str, f64)]) -> RawDataset {
        RawDataset {
            centroids: vec![centroid.to_string()],
            nodes: node_ids
                .iter()
                .map(|id| RawNode { c_id: id.to_string(), title: format!("title-{id}") })
                .collect(),
            edges: edges
                .iter()
                .map(|(s, t, sim)| RawEdge {
                    source: s.to_string(),
                    target: t.to_string(),
                    similarity: *sim,
                })
                .collect(),
        }
    }

    #[test]
    fn test_nodes_tagged_with_owning_centroid() {
        let merged = merge_datasets(&[
            dataset("a", &["a", "a1"], &[]),
            dataset("b", &["b", "b1"], &[]),
        ]);

        assert_eq!(merged.primary_cids, vec!["a", "b"]);
        for node in &merged.nodes[..2] {
            assert_eq!(node.primary_concept_cid, "a");
        }
        for node in &merged.nodes[2..] {
            assert_eq!(node.primary_concept_cid, "b");
        }
    }

    #[test]
    fn test_centroid_flag_set() {
        let merged = merge_datasets(&[dataset("a", &["a", "a1"], &[])]);
        assert!(merged.nodes[0].is_centroid);
        assert!(!merged.nodes[1].is_centroid);
    }

    #[test]
    fn test_first_occurrence_wins() {
        // "shared" appears in both payloads; the first tagging survives.
        let merged = merge_datasets(&[
            dataset("a", &["a", "shared"], &[]),
            dataset("b", &["b", "shared"], &[]),
        ]);

        assert_eq!(merged.nodes.len(), 3);
        let shared = merged.nodes.iter().find(|n| n.c_id == "shared").unwrap();
        assert_eq!(shared.primary_concept_cid, "a");
    }

    #[test]
    fn test_edge_order_is_concatenation_order() {
        let merged = merge_datasets(&[
            dataset("a", &["a"], &[("a", "x", 0.9), ("a", "y", 0.8)]),
            dataset("b", &["b"], &[("b", "z", 0.7)]),
        ]);

        let pairs: Vec<(&str, &str)> = merged
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "x"), ("a", "y"), ("b", "z")]);
    }

    #[test]
    fn test_empty_input_yields_empty_graph() {
        let merged = merge_datasets(&[]);
        assert!(merged.nodes.is_empty());
        assert!(merged.edges.is_empty());
        assert!(merged.primary_cids.is_empty());
    }
}
