//! Nebula core: builds concept graphs from raw adjacency-list datasets and
//! lays them out with a pre-relaxed force simulation.
//!
//! Pipeline: raw payloads -> data::merge -> graph::filter -> graph::seed ->
//! graph::forces -> graph::simulation. The stabilized positions are handed to
//! the JS renderer through the wasm boundary in `wasm.rs`; concept-hierarchy
//! trees take the separate deterministic path in `tree.rs`.

pub mod data;
pub mod graph;
pub mod output;
pub mod tree;
pub mod wasm;

pub use data::{DataError, RawDataset, RawEdge, RawNode};
pub use graph::{ConceptEdge, ConceptNode, FilterPolicy, Graph, GraphConfig, Point, PrimaryConcept};
pub use tree::TreeNode;
