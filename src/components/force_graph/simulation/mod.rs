//! Force simulation driving node positions.
//!
//! Each tick cools `alpha` toward its target, accumulates spring, charge and
//! centering forces into node velocities, then integrates. Pinned nodes are
//! held at their pin. Simulated positions are never clamped to the viewport;
//! nodes that drift off-screen keep exerting forces from where they really are.

mod forces;
mod quadtree;

use std::f64::consts::PI;

use log::debug;

use super::model::Graph;
use crate::config::SimulationConfig;
use forces::{Jiggle, LinkParams, apply_center, apply_charge, apply_links, link_params};

/// Radius step of the initial phyllotaxis placement.
const INITIAL_RADIUS: f64 = 10.0;

/// Lifecycle of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Constructed, never ticked.
	Cold,
	/// Alpha above the settling threshold; ticks move nodes.
	Running,
	/// Alpha has decayed away; ticks are no-ops until reheated.
	Settled,
}

/// D3-style force layout driven one tick per animation frame.
///
/// Holds alpha, the phase and per-edge spring parameters; node positions and
/// velocities live on the [`Graph`].
pub struct Simulation {
	config: SimulationConfig,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	phase: Phase,
	links: Vec<LinkParams>,
	positions: Vec<(f64, f64)>,
	jiggle: Jiggle,
}

impl Simulation {
	/// Create a simulation for `graph` centred on `center`, seeding every node
	/// on a phyllotaxis spiral around it.
	pub fn new(graph: &mut Graph, config: SimulationConfig, center: (f64, f64)) -> Self {
		let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
		for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
			let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
			let angle = i as f64 * golden_angle;
			node.x = center.0 + radius * angle.cos();
			node.y = center.1 + radius * angle.sin();
			node.vx = 0.0;
			node.vy = 0.0;
		}

		Self {
			links: link_params(graph),
			config,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			phase: Phase::Cold,
			positions: Vec::with_capacity(graph.len()),
			jiggle: Jiggle::default(),
		}
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Current alpha, the scale applied to every force.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Value alpha is decaying toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Physics parameters in use.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Raise the alpha target and restart a settled simulation.
	pub fn reheat(&mut self, target: f64) {
		self.alpha_target = target;
		if self.phase == Phase::Settled {
			debug!("note-graph: simulation reheated (target {:.3})", target);
			self.phase = Phase::Running;
		}
	}

	/// Drop the alpha target to zero so the layout decays back to rest.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Advance one step. Returns `false` without touching the graph when the
	/// simulation has settled.
	pub fn tick(&mut self, graph: &mut Graph) -> bool {
		match self.phase {
			Phase::Settled => return false,
			Phase::Cold => {
				debug!("note-graph: simulation started with {} nodes", graph.len());
				self.phase = Phase::Running;
			}
			Phase::Running => {}
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		apply_links(
			graph,
			&self.links,
			self.config.link_distance,
			alpha,
			&mut self.jiggle,
		);
		apply_charge(
			graph.nodes_mut(),
			&mut self.positions,
			self.config.charge,
			self.config.theta,
			alpha,
			&mut self.jiggle,
		);
		apply_center(graph.nodes_mut(), self.center, self.config.center_strength);

		let retain = 1.0 - self.config.velocity_decay;
		for node in graph.nodes_mut() {
			match node.pin {
				Some((fx, fy)) => {
					node.x = fx;
					node.y = fy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				None => {
					node.vx *= retain;
					node.vy *= retain;
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}

		if self.alpha < self.config.alpha_min {
			debug!("note-graph: simulation settled");
			self.phase = Phase::Settled;
		}
		true
	}
}
