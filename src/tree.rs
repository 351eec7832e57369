//! Concept-hierarchy trees.
//!
//! Tree payloads (`{ "tree": { name, children } }`) bypass the force
//! pipeline entirely: no deduplication, no filtering, no simulation. The
//! layout is a deterministic tidy tree in the horizontal orientation the
//! renderer expects: depth runs along x, leaves are spread evenly along y,
//! and every internal node sits centered over its children.

use serde::{Deserialize, Serialize};

use crate::data::DataError;

#[derive(Debug, Clone, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTreePayload {
    tree: TreeNode,
}

pub fn parse_tree(json: &str) -> Result<TreeNode, DataError> {
    let payload: RawTreePayload = serde_json::from_str(json)?;
    Ok(payload.tree)
}

/// A laid-out tree node in pre-order. `parent` indexes an earlier entry, so
/// the renderer can draw each link against an already-emitted node.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedTreeNode {
    pub name: String,
    pub depth: usize,
    pub parent: Option<usize>,
    pub x: f64,
    pub y: f64,
    pub leaf: bool,
}

/// Lay the tree out into a `width` x `height` extent.
pub fn layout_tree(root: &TreeNode, width: f64, height: f64) -> Vec<PlacedTreeNode> {
    let mut placed: Vec<PlacedTreeNode> = Vec::new();
    let mut slots: Vec<f64> = Vec::new();
    let mut leaf_count = 0usize;
    place(root, 0, None, &mut placed, &mut slots, &mut leaf_count);

    let max_depth = placed.iter().map(|n| n.depth).max().unwrap_or(0);
    let depth_step = if max_depth > 0 { width / max_depth as f64 } else { 0.0 };
    let cross_step = if leaf_count > 1 { height / (leaf_count - 1) as f64 } else { 0.0 };

    for (node, slot) in placed.iter_mut().zip(&slots) {
        node.x = node.depth as f64 * depth_step;
        node.y = if leaf_count > 1 { slot * cross_step } else { height / 2.0 };
    }
    placed
}

/// Pre-order emit, post-order slot assignment: leaves take consecutive
/// slots, internal nodes the mean of their children's. Returns the slot.
fn place(
    node: &TreeNode,
    depth: usize,
    parent: Option<usize>,
    placed: &mut Vec<PlacedTreeNode>,
    slots: &mut Vec<f64>,
    leaf_count: &mut usize,
) -> f64 {
    let index = placed.len();
    placed.push(PlacedTreeNode {
        name: node.name.clone(),
        depth,
        parent,
        x: 0.0,
        y: 0.0,
        leaf: node.children.is_empty(),
    });
    slots.push(0.0);

    let slot = if node.children.is_empty() {
        let slot = *leaf_count as f64;
        *leaf_count += 1;
        slot
    } else {
        let sum: f64 = node
            .children
            .iter()
            .map(|child| place(child, depth + 1, Some(index), placed, slots, leaf_count))
            .sum();
        sum / node.children.len() as f64
    };
    slots[index] = slot;
    slot
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn leaf(name: &str) -> TreeNode {
        TreeNode { name: name.to_string(), children: vec![] }
    }

    fn branch(name: &str, children: Vec<TreeNode>) -> TreeNode {
        TreeNode { name: name.to_string(), children }
    }

    #[test]
    fn test_parse_tree_payload() {
        let json = r#"{"tree": {"name": "root", "children": [{"name": "a"}, {"name": "b", "children": []}]}}"#;
        let tree = parse_tree(json).unwrap();
        assert_eq!(tree.name, "root");
        assert_eq!(tree.children.len(), 2);
        assert!(tree.children[0].children.is_empty());
    }

    #[test]
    fn test_depth_maps_to_x() {
        let tree = branch("root", vec![branch("mid", vec![leaf("deep")])]);
        let placed = layout_tree(&tree, 600.0, 400.0);
        assert_relative_eq!(placed[0].x, 0.0);
        assert_relative_eq!(placed[1].x, 300.0);
        assert_relative_eq!(placed[2].x, 600.0);
    }

    #[test]
    fn test_leaves_spread_evenly_parents_centered() {
        let tree = branch("root", vec![leaf("a"), leaf("b"), leaf("c")]);
        let placed = layout_tree(&tree, 600.0, 400.0);
        assert_relative_eq!(placed[1].y, 0.0);
        assert_relative_eq!(placed[2].y, 200.0);
        assert_relative_eq!(placed[3].y, 400.0);
        // Root centered over its children.
        assert_relative_eq!(placed[0].y, 200.0);
    }

    #[test]
    fn test_single_chain_is_centered() {
        let tree = branch("root", vec![branch("mid", vec![leaf("deep")])]);
        let placed = layout_tree(&tree, 600.0, 400.0);
        for node in &placed {
            assert_relative_eq!(node.y, 200.0);
        }
    }

    #[test]
    fn test_parent_indices_point_backward() {
        let tree = branch("root", vec![branch("a", vec![leaf("a1")]), leaf("b")]);
        let placed = layout_tree(&tree, 600.0, 400.0);
        assert_eq!(placed[0].parent, None);
        for (i, node) in placed.iter().enumerate().skip(1) {
            let parent = node.parent.unwrap();
            assert!(parent < i);
            assert_eq!(placed[parent].depth + 1, node.depth);
        }
    }
}
