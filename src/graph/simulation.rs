//! Simulation Driver: steps the force pipeline on a decay schedule.
//!
//! The schedule follows the usual alpha model: each step moves alpha toward
//! `alpha_target` by `alpha_decay`, forces are evaluated at the current
//! alpha, and velocities are damped before integration. Pinned nodes copy
//! their fixed coordinates and drop their velocity.
//!
//! Pre-relaxation runs the exact number of steps the schedule needs to fall
//! under `alpha_min`, synchronously, so the graph is rendered already near
//! equilibrium instead of visibly untangling itself. The loop is a tight one
//! on purpose; at hundreds of nodes it fits a frame budget, beyond that it
//! would need a cooperative yielding variant.

use tracing::debug;

use super::ConceptNode;
use super::forces::ForceSet;

/// Energy target while a drag is in progress.
const REHEAT_TARGET: f64 = 0.3;

/// Interactive lifecycle of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// Energy target zero and the schedule has cooled below the minimum.
    Idle,
    /// A drag raised the energy target; stepping continuously.
    Reheated,
    /// Drag released; target back to zero, still cooling toward rest.
    Cooling,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    pub alpha: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    pub alpha_target: f64,
    pub velocity_decay: f64,
    forces: ForceSet,
    /// Index of the node currently being dragged, if any. One at a time.
    dragging: Option<usize>,
}

impl Simulation {
    pub fn new(forces: ForceSet, alpha_min: f64, alpha_decay: f64, velocity_decay: f64) -> Self {
        Self {
            alpha: 1.0,
            alpha_min,
            alpha_decay,
            alpha_target: 0.0,
            velocity_decay,
            forces,
            dragging: None,
        }
    }

    /// One synchronous step: advance the schedule, evaluate all forces,
    /// damp and integrate.
    pub fn step(&mut self, nodes: &mut [ConceptNode]) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.forces.apply(nodes, self.alpha);

        let damping = 1.0 - self.velocity_decay;
        for node in nodes.iter_mut() {
            match (node.fx, node.fy) {
                (Some(fx), Some(fy)) => {
                    node.x = fx;
                    node.y = fy;
                    node.vx = 0.0;
                    node.vy = 0.0;
                }
                _ => {
                    node.vx *= damping;
                    node.vy *= damping;
                    node.x += node.vx;
                    node.y += node.vy;
                }
            }
        }
    }

    /// Steps required for the decay schedule to cross `alpha_min`:
    /// `ceil(log(alpha_min) / log(1 - alpha_decay))`. Deterministic for
    /// fixed parameters.
    pub fn pre_relaxation_steps(&self) -> usize {
        (self.alpha_min.ln() / (1.0 - self.alpha_decay).ln()).ceil() as usize
    }

    /// Run the schedule to convergence before first render. Returns the
    /// number of steps executed.
    pub fn pre_relax(&mut self, nodes: &mut [ConceptNode]) -> usize {
        let steps = self.pre_relaxation_steps();
        for _ in 0..steps {
            self.step(nodes);
        }
        debug!(steps, alpha = self.alpha, "pre-relaxation complete");
        steps
    }

    /// Whether an interactive host should keep stepping.
    pub fn is_active(&self) -> bool {
        self.alpha_target > 0.0 || self.alpha >= self.alpha_min
    }

    pub fn phase(&self) -> SimPhase {
        if self.alpha_target > 0.0 {
            SimPhase::Reheated
        } else if self.alpha >= self.alpha_min {
            SimPhase::Cooling
        } else {
            SimPhase::Idle
        }
    }

    /// Raise the energy target so the layout visibly resumes motion.
    pub fn reheat(&mut self) {
        self.alpha_target = REHEAT_TARGET;
    }

    /// Drop the target back to zero; the schedule cools to rest on its own.
    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    /// Begin dragging a node: pin it at the pointer and reheat. Returns
    /// false if another drag is already in progress.
    pub fn drag_start(&mut self, nodes: &mut [ConceptNode], index: usize, x: f64, y: f64) -> bool {
        if self.dragging.is_some() || index >= nodes.len() {
            return false;
        }
        self.dragging = Some(index);
        nodes[index].fx = Some(x);
        nodes[index].fy = Some(y);
        self.reheat();
        true
    }

    pub fn drag_move(&mut self, nodes: &mut [ConceptNode], x: f64, y: f64) {
        if let Some(index) = self.dragging {
            nodes[index].fx = Some(x);
            nodes[index].fy = Some(y);
        }
    }

    /// End the drag: release the pin (primary concepts stay pinned where
    /// the user left them) and let the simulation cool.
    pub fn drag_end(&mut self, nodes: &mut [ConceptNode]) {
        if let Some(index) = self.dragging.take() {
            if !nodes[index].is_centroid {
                nodes[index].fx = None;
                nodes[index].fy = None;
            }
            self.cool();
        }
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    /// Sum of squared velocities; the residual-motion measure used to check
    /// convergence.
    pub fn kinetic_energy(nodes: &[ConceptNode]) -> f64 {
        nodes.iter().map(|n| n.vx * n.vx + n.vy * n.vy).sum()
    }
}
