//! Edge Filter: drops useless, duplicate and reciprocal edges.
//!
//! Two mutually exclusive policies, selected by the caller's mode:
//! - `PrimaryMembership` (multi-dataset): keep an edge only if at least one
//!   endpoint is a primary concept.
//! - `SimilarityThreshold` (legacy single-dataset): keep an edge only if both
//!   endpoints exist in the node set and its similarity is strictly above
//!   the threshold.
//!
//! Both policies reject an edge when an already-kept edge connects the same
//! unordered endpoint pair. The duplicate check scans all kept edges, which
//! is quadratic in kept-edge count; fine for tens of primaries with tens of
//! edges each, a known limit beyond that.

use std::collections::HashSet;

use crate::data::RawEdge;

/// Which edge-retention rule applies. The two are never combined.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterPolicy {
    /// Keep edges touching at least one primary concept.
    PrimaryMembership,
    /// Legacy: keep edges strictly above this similarity score.
    SimilarityThreshold(f64),
}

/// Multi-dataset policy: at least one endpoint must be a primary concept.
pub fn filter_by_membership(edges: &[RawEdge], primaries: &HashSet<&str>) -> Vec<RawEdge> {
    let mut kept: Vec<RawEdge> = Vec::new();
    for edge in edges {
        let touches_primary = primaries.contains(edge.source.as_str())
            || primaries.contains(edge.target.as_str());
        let is_duplicate = kept.iter().any(|k| k.same_pair(edge));
        if touches_primary && !is_duplicate {
            kept.push(edge.clone());
        }
    }
    kept
}

/// Legacy single-dataset policy: both endpoints must be known nodes and the
/// similarity must exceed the threshold. A score exactly at the threshold is
/// rejected.
pub fn filter_by_threshold(
    edges: &[RawEdge],
    node_ids: &HashSet<&str>,
    threshold: f64,
) -> Vec<RawEdge> {
    let mut kept: Vec<RawEdge> = Vec::new();
    for edge in edges {
        let endpoints_known = node_ids.contains(edge.source.as_str())
            && node_ids.contains(edge.target.as_str());
        let is_duplicate = kept.iter().any(|k| k.same_pair(edge));
        let above_threshold = edge.similarity > threshold;
        if endpoints_known && !is_duplicate && above_threshold {
            kept.push(edge.clone());
        }
    }
    kept
}
