// Concept graph aggregate.
//
// Owns the deduplicated node list, the filtered edge list, the primary
// concepts with their polygon/focus coordinates, and the configured
// simulation. `init_with` is the single entry point: it fully clears prior
// state, then runs merge -> filter -> seed -> configure -> pre-relax, so the
// renderer always receives an already-stabilized layout.
//
// Submodules:
// - filter: edge retention policies
// - seed: deterministic starting coordinates
// - forces: the named-force pipeline
// - simulation: decay schedule, pre-relaxation, drag handling

use std::collections::{HashMap, HashSet};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::data::{MergedData, RawDataset, RawEdge, merge_datasets};

pub mod filter;
pub mod forces;
pub mod seed;
pub mod simulation;

pub use filter::FilterPolicy;
pub use simulation::{SimPhase, Simulation};

use forces::ForceSet;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A concept in the merged graph. Position and velocity are mutated by the
/// simulation; `fx`/`fy` pin the node when set.
#[derive(Debug, Clone)]
pub struct ConceptNode {
    pub c_id: String,
    pub title: String,
    /// The primary concept whose dataset this node arrived with.
    pub primary_concept_cid: String,
    pub is_centroid: bool,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

impl ConceptNode {
    pub fn new(c_id: String, title: String, primary_concept_cid: String, is_centroid: bool) -> Self {
        Self {
            c_id,
            title,
            primary_concept_cid,
            is_centroid,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            fx: None,
            fy: None,
        }
    }
}

/// A retained edge with endpoints resolved to node indices.
#[derive(Debug, Clone)]
pub struct ConceptEdge {
    pub source: usize,
    pub target: usize,
    pub source_cid: String,
    pub target_cid: String,
    pub similarity: f64,
}

/// A primary concept's anchor on the inner polygon and the focus point its
/// secondary nodes cluster around.
#[derive(Debug, Clone)]
pub struct PrimaryConcept {
    pub c_id: String,
    pub vertex: Point,
    pub focus: Point,
}

#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Viewport extents in px.
    pub width: f64,
    pub height: f64,
    /// Inner polygon radius (primary concept anchors).
    pub polygon_radius: f64,
    /// Target edge separation; also feeds the focus polygon radius.
    pub link_distance: f64,
    /// Extra spacing between the link distance and the focus polygon.
    pub focus_margin: f64,
    /// Many-body strength; negative repels.
    pub charge_strength: f64,
    /// Node visual radius used for collision avoidance.
    pub collision_radius: f64,
    /// Fractional pull toward the owning primary's focus, per axis.
    pub focus_strength: f64,
    /// Link relaxation passes per simulation step.
    pub link_iterations: usize,
    pub policy: FilterPolicy,
    /// Legacy link distance: (similarity - threshold) * scale.
    pub legacy_distance_scale: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    pub velocity_decay: f64,
    /// Jitter RNG seed; same seed + same data = same layout.
    pub seed: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            polygon_radius: 200.0,
            link_distance: 60.0,
            focus_margin: 40.0,
            charge_strength: -30.0,
            collision_radius: 10.0,
            focus_strength: 0.1,
            link_iterations: 2,
            policy: FilterPolicy::PrimaryMembership,
            legacy_distance_scale: 200_000.0,
            alpha_min: 0.001,
            alpha_decay: 0.0228,
            velocity_decay: 0.4,
            seed: 0,
        }
    }
}

impl GraphConfig {
    pub fn center(&self) -> Point {
        Point { x: self.width / 2.0, y: self.height / 2.0 }
    }
}

#[derive(Debug, Clone)]
pub struct Graph {
    pub config: GraphConfig,
    pub nodes: Vec<ConceptNode>,
    pub edges: Vec<ConceptEdge>,
    pub primaries: Vec<PrimaryConcept>,
    node_index: HashMap<String, usize>,
    simulation: Option<Simulation>,
}

impl Graph {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            primaries: Vec::new(),
            node_index: HashMap::new(),
            simulation: None,
        }
    }

    /// Drop all prior node/edge/primary state.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.primaries.clear();
        self.node_index.clear();
        self.simulation = None;
    }

    /// Build the graph from a batch of validated datasets and pre-relax it.
    /// Prior state is fully cleared first; callers guarantee the batch is
    /// complete (a failed fetch never reaches this point).
    pub fn init_with(&mut self, datasets: &[RawDataset]) {
        self.clear();

        let MergedData { mut nodes, edges, primary_cids } = merge_datasets(datasets);
        let primaries = seed::primary_concepts(&primary_cids, &self.config);

        let kept = self.filter_edges(&edges, &nodes, &primary_cids);

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        seed::seed_positions(&mut nodes, &primaries, &self.config, &mut rng);

        let node_index: HashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.c_id.clone(), i))
            .collect();
        let edges = resolve_edges(&kept, &node_index);

        let forces = ForceSet::configure(&nodes, &edges, &primaries, &self.config);
        let mut simulation = Simulation::new(
            forces,
            self.config.alpha_min,
            self.config.alpha_decay,
            self.config.velocity_decay,
        );
        let steps = simulation.pre_relax(&mut nodes);

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            primaries = primaries.len(),
            steps,
            "graph initialized"
        );

        self.nodes = nodes;
        self.edges = edges;
        self.primaries = primaries;
        self.node_index = node_index;
        self.simulation = Some(simulation);
    }

    fn filter_edges(&self, edges: &[RawEdge], nodes: &[ConceptNode], primary_cids: &[String]) -> Vec<RawEdge> {
        match self.config.policy {
            FilterPolicy::PrimaryMembership => {
                let primary_set: HashSet<&str> = primary_cids.iter().map(String::as_str).collect();
                filter::filter_by_membership(edges, &primary_set)
            }
            FilterPolicy::SimilarityThreshold(threshold) => {
                let node_set: HashSet<&str> = nodes.iter().map(|n| n.c_id.as_str()).collect();
                filter::filter_by_threshold(edges, &node_set, threshold)
            }
        }
    }

    pub fn node_by_cid(&self, c_id: &str) -> Option<&ConceptNode> {
        self.node_index.get(c_id).map(|&i| &self.nodes[i])
    }

    pub fn phase(&self) -> SimPhase {
        self.simulation.as_ref().map_or(SimPhase::Idle, |s| s.phase())
    }

    pub fn is_active(&self) -> bool {
        self.simulation.as_ref().is_some_and(|s| s.is_active())
    }

    /// Interactive mode: run up to `max_steps` while the schedule is hot.
    /// Returns the number of steps actually taken.
    pub fn tick(&mut self, max_steps: usize) -> usize {
        let Some(simulation) = self.simulation.as_mut() else { return 0 };
        let mut taken = 0;
        while taken < max_steps && simulation.is_active() {
            simulation.step(&mut self.nodes);
            taken += 1;
        }
        taken
    }

    pub fn drag_start(&mut self, c_id: &str, x: f64, y: f64) -> bool {
        let Some(&index) = self.node_index.get(c_id) else { return false };
        let Some(simulation) = self.simulation.as_mut() else { return false };
        simulation.drag_start(&mut self.nodes, index, x, y)
    }

    pub fn drag_move(&mut self, x: f64, y: f64) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.drag_move(&mut self.nodes, x, y);
        }
    }

    pub fn drag_end(&mut self) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.drag_end(&mut self.nodes);
        }
    }
}

/// Resolve retained edges to node indices. Edges naming unknown nodes and
/// self-loops are dropped rather than panicking; upstream data is not always
/// well-formed, and a zero-length spring is useless to the layout anyway.
fn resolve_edges(edges: &[RawEdge], node_index: &HashMap<String, usize>) -> Vec<ConceptEdge> {
    edges
        .iter()
        .filter_map(|edge| {
            let (Some(&source), Some(&target)) =
                (node_index.get(&edge.source), node_index.get(&edge.target))
            else {
                warn!(source = %edge.source, target = %edge.target, "dropping edge with unknown endpoint");
                return None;
            };
            if source == target {
                warn!(node = %edge.source, "dropping self-loop edge");
                return None;
            }
            Some(ConceptEdge {
                source,
                target,
                source_cid: edge.source.clone(),
                target_cid: edge.target.clone(),
                similarity: edge.similarity,
            })
        })
        .collect()
}
