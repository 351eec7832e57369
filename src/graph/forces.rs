//! Force Configurator: the named forces acting on the graph.
//!
//! Five forces, applied in order each simulation step:
//! - link: spring toward a target separation per edge
//! - charge: many-body repulsion between all node pairs
//! - collide: minimum center-to-center separation
//! - focus_x / focus_y: per-axis pull toward the owning primary's focus
//!
//! Building a `ForceSet` is pure setup; nothing moves until the simulation
//! driver steps it. All forces write into node velocities only.

use std::collections::HashSet;

use super::{ConceptEdge, ConceptNode, FilterPolicy, GraphConfig, PrimaryConcept};

/// Fallback displacement when two nodes coincide exactly.
const EPSILON: f64 = 1e-6;

/// How a link's target separation is derived.
#[derive(Debug, Clone, Copy)]
pub enum LinkDistance {
    Fixed(f64),
    /// Legacy mode: distance grows with how far the similarity sits above
    /// the filter threshold.
    SimilarityScaled { threshold: f64, scale: f64 },
}

impl LinkDistance {
    fn resolve(&self, similarity: f64) -> f64 {
        match *self {
            LinkDistance::Fixed(d) => d,
            LinkDistance::SimilarityScaled { threshold, scale } => {
                (similarity - threshold) * scale
            }
        }
    }
}

#[derive(Debug, Clone)]
struct ResolvedLink {
    source: usize,
    target: usize,
    distance: f64,
    /// 1 / min(degree(source), degree(target)): heavily connected endpoints
    /// get weaker springs so hubs stay stable.
    strength: f64,
    /// degree(source) / (degree(source) + degree(target)): the less
    /// connected endpoint absorbs more of the correction.
    bias: f64,
}

/// Spring force pulling each edge's endpoints toward a target separation.
/// Runs multiple relaxation passes per step for stability.
#[derive(Debug, Clone)]
pub struct LinkForce {
    links: Vec<ResolvedLink>,
    iterations: usize,
}

impl LinkForce {
    pub fn new(
        edges: &[ConceptEdge],
        node_count: usize,
        distance: LinkDistance,
        iterations: usize,
    ) -> Self {
        let mut degree = vec![0usize; node_count];
        for edge in edges {
            degree[edge.source] += 1;
            degree[edge.target] += 1;
        }

        let links = edges
            .iter()
            .map(|edge| {
                let ds = degree[edge.source] as f64;
                let dt = degree[edge.target] as f64;
                ResolvedLink {
                    source: edge.source,
                    target: edge.target,
                    distance: distance.resolve(edge.similarity),
                    strength: 1.0 / ds.min(dt),
                    bias: ds / (ds + dt),
                }
            })
            .collect();

        Self { links, iterations: iterations.max(1) }
    }

    fn apply(&self, nodes: &mut [ConceptNode], alpha: f64) {
        for _ in 0..self.iterations {
            for link in &self.links {
                let s = &nodes[link.source];
                let t = &nodes[link.target];
                let mut dx = (t.x + t.vx) - (s.x + s.vx);
                let mut dy = (t.y + t.vy) - (s.y + s.vy);
                if dx == 0.0 && dy == 0.0 {
                    dx = EPSILON;
                }
                let l = (dx * dx + dy * dy).sqrt();
                let k = (l - link.distance) / l * alpha * link.strength;
                dx *= k;
                dy *= k;

                nodes[link.target].vx -= dx * link.bias;
                nodes[link.target].vy -= dy * link.bias;
                nodes[link.source].vx += dx * (1.0 - link.bias);
                nodes[link.source].vy += dy * (1.0 - link.bias);
            }
        }
    }
}

/// Many-body force: every node repels every other node (negative strength).
/// All-pairs evaluation; fine for the hundreds of nodes this runs on.
#[derive(Debug, Clone, Copy)]
pub struct ChargeForce {
    pub strength: f64,
    /// Squared distance floor, prevents force blow-up at close range.
    pub min_distance2: f64,
}

impl ChargeForce {
    pub fn new(strength: f64) -> Self {
        Self { strength, min_distance2: 1.0 }
    }

    fn apply(&self, nodes: &mut [ConceptNode], alpha: f64) {
        let n = nodes.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let mut dx = nodes[j].x - nodes[i].x;
                let mut dy = nodes[j].y - nodes[i].y;
                if dx == 0.0 && dy == 0.0 {
                    dx = EPSILON;
                }
                let l2 = (dx * dx + dy * dy).max(self.min_distance2);
                let w = self.strength * alpha / l2;
                // Negative strength pushes the pair apart.
                nodes[i].vx += dx * w;
                nodes[i].vy += dy * w;
                nodes[j].vx -= dx * w;
                nodes[j].vy -= dy * w;
            }
        }
    }
}

/// Collision force: enforces a minimum center-to-center separation of twice
/// the node radius between any two nodes.
#[derive(Debug, Clone, Copy)]
pub struct CollideForce {
    pub radius: f64,
}

impl CollideForce {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    fn apply(&self, nodes: &mut [ConceptNode]) {
        let n = nodes.len();
        let min_sep = self.radius * 2.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let mut dx = (nodes[i].x + nodes[i].vx) - (nodes[j].x + nodes[j].vx);
                let mut dy = (nodes[i].y + nodes[i].vy) - (nodes[j].y + nodes[j].vy);
                if dx == 0.0 && dy == 0.0 {
                    dx = EPSILON;
                }
                let l = (dx * dx + dy * dy).sqrt();
                if l < min_sep {
                    let k = (min_sep - l) / l;
                    dx *= k;
                    dy *= k;
                    // Equal radii: split the correction evenly.
                    nodes[i].vx += dx * 0.5;
                    nodes[i].vy += dy * 0.5;
                    nodes[j].vx -= dx * 0.5;
                    nodes[j].vy -= dy * 0.5;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Per-axis centering toward a per-node target with fractional strength.
/// Primary concepts carry no target (they are pinned by the seeder) and
/// receive zero pull.
#[derive(Debug, Clone)]
pub struct AxisForce {
    axis: Axis,
    strength: f64,
    targets: Vec<Option<f64>>,
}

impl AxisForce {
    pub fn new(axis: Axis, strength: f64, targets: Vec<Option<f64>>) -> Self {
        Self { axis, strength, targets }
    }

    fn apply(&self, nodes: &mut [ConceptNode], alpha: f64) {
        for (node, target) in nodes.iter_mut().zip(&self.targets) {
            let Some(target) = target else { continue };
            match self.axis {
                Axis::X => node.vx += (target - node.x) * self.strength * alpha,
                Axis::Y => node.vy += (target - node.y) * self.strength * alpha,
            }
        }
    }
}

/// The full named-force pipeline for one graph.
#[derive(Debug, Clone)]
pub struct ForceSet {
    pub link: LinkForce,
    pub charge: ChargeForce,
    pub collide: CollideForce,
    pub focus_x: AxisForce,
    pub focus_y: AxisForce,
}

impl ForceSet {
    /// Wire all forces against the merged node list and filtered edge list.
    pub fn configure(
        nodes: &[ConceptNode],
        edges: &[ConceptEdge],
        primaries: &[PrimaryConcept],
        cfg: &GraphConfig,
    ) -> Self {
        let distance = match cfg.policy {
            FilterPolicy::PrimaryMembership => LinkDistance::Fixed(cfg.link_distance),
            FilterPolicy::SimilarityThreshold(threshold) => LinkDistance::SimilarityScaled {
                threshold,
                scale: cfg.legacy_distance_scale,
            },
        };

        let primary_set: HashSet<&str> = primaries.iter().map(|p| p.c_id.as_str()).collect();
        let focus_of = |node: &ConceptNode| {
            if primary_set.contains(node.c_id.as_str()) {
                return None;
            }
            primaries
                .iter()
                .find(|p| p.c_id == node.primary_concept_cid)
                .map(|p| p.focus)
        };
        let targets_x: Vec<Option<f64>> = nodes.iter().map(|n| focus_of(n).map(|f| f.x)).collect();
        let targets_y: Vec<Option<f64>> = nodes.iter().map(|n| focus_of(n).map(|f| f.y)).collect();

        Self {
            link: LinkForce::new(edges, nodes.len(), distance, cfg.link_iterations),
            charge: ChargeForce::new(cfg.charge_strength),
            collide: CollideForce::new(cfg.collision_radius),
            focus_x: AxisForce::new(Axis::X, cfg.focus_strength, targets_x),
            focus_y: AxisForce::new(Axis::Y, cfg.focus_strength, targets_y),
        }
    }

    /// Apply every force once, in pipeline order, at the given energy level.
    pub fn apply(&self, nodes: &mut [ConceptNode], alpha: f64) {
        self.link.apply(nodes, alpha);
        self.charge.apply(nodes, alpha);
        self.collide.apply(nodes);
        self.focus_x.apply(nodes, alpha);
        self.focus_y.apply(nodes, alpha);
    }
}
