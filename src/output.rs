//! Output types for the JS renderer.
//!
//! These structs are serialized to JSON at the wasm boundary. They carry
//! finalized positions plus the display flags the renderer applies as
//! opacity changes (label/foci/3d toggles never trigger a re-layout).

use serde::Serialize;

use crate::graph::Graph;
use crate::tree::PlacedTreeNode;

#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    pub id: String,
    pub title: String,
    /// Owning primary concept, for cluster styling.
    pub primary: String,
    pub is_centroid: bool,
    pub x: f64,
    pub y: f64,
    pub pinned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeOutput {
    pub source: String,
    pub target: String,
    pub similarity: f64,
}

/// A primary concept's focus point, drawn when the foci display is on.
#[derive(Debug, Clone, Serialize)]
pub struct FocusOutput {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Display flags flipped by the UI toggles.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DisplayFlags {
    pub labels: bool,
    pub foci: bool,
    pub three_d: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self { labels: true, foci: false, three_d: false }
    }
}

/// Error information surfaced to the activity indicator.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub foci: Vec<FocusOutput>,
    pub flags: DisplayFlags,
    /// Whether the simulation still wants ticks (interactive mode).
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl GraphOutput {
    pub fn from_graph(graph: &Graph, flags: DisplayFlags) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|n| NodeOutput {
                id: n.c_id.clone(),
                title: n.title.clone(),
                primary: n.primary_concept_cid.clone(),
                is_centroid: n.is_centroid,
                x: n.x,
                y: n.y,
                pinned: n.fx.is_some(),
            })
            .collect();
        let edges = graph
            .edges
            .iter()
            .map(|e| EdgeOutput {
                source: e.source_cid.clone(),
                target: e.target_cid.clone(),
                similarity: e.similarity,
            })
            .collect();
        let foci = graph
            .primaries
            .iter()
            .map(|p| FocusOutput { id: p.c_id.clone(), x: p.focus.x, y: p.focus.y })
            .collect();

        Self { nodes, edges, foci, flags, active: graph.is_active(), error: None }
    }

    pub fn from_error(message: String) -> Self {
        Self {
            nodes: vec![],
            edges: vec![],
            foci: vec![],
            flags: DisplayFlags::default(),
            active: false,
            error: Some(ErrorInfo { message }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<PlacedTreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RawDataset, RawEdge, RawNode};
    use crate::graph::GraphConfig;

    #[test]
    fn test_graph_output_round() {
        let mut graph = Graph::new(GraphConfig::default());
        graph.init_with(&[RawDataset {
            centroids: vec!["c".to_string()],
            nodes: vec![
                RawNode { c_id: "c".into(), title: "C".into() },
                RawNode { c_id: "n".into(), title: String::new() },
            ],
            edges: vec![RawEdge { source: "c".into(), target: "n".into(), similarity: 0.999 }],
        }]);

        let output = GraphOutput::from_graph(&graph, DisplayFlags::default());
        assert_eq!(output.nodes.len(), 2);
        assert_eq!(output.edges.len(), 1);
        assert_eq!(output.foci.len(), 1);
        assert!(!output.active);
        assert!(output.nodes[0].pinned);

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"is_centroid\":true"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_error_output_shape() {
        let output = GraphOutput::from_error("fetch failed".into());
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("fetch failed"));
        assert!(!json.contains("nodes"));
    }
}
