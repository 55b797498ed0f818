//! Individual forces. Each one adds to node velocities (or, for centering,
//! shifts positions) and leaves integration to the caller.

use super::super::model::{Graph, Node};
use super::quadtree::QuadNode;

/// Minimum squared distance used by the charge force, avoiding the singularity
/// at zero separation.
const CHARGE_DISTANCE_MIN_SQ: f64 = 1.0;

/// Deterministic linear congruential generator used to separate coincident
/// nodes.
#[derive(Clone, Debug)]
pub(super) struct Jiggle {
	state: u32,
}

impl Default for Jiggle {
	fn default() -> Self {
		Self { state: 1 }
	}
}

impl Jiggle {
	/// A tiny offset in `[-5e-7, 5e-7)`.
	pub(super) fn next(&mut self) -> f64 {
		self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		(f64::from(self.state) / 4_294_967_296.0 - 0.5) * 1e-6
	}
}

/// Per-edge spring parameters derived from node degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct LinkParams {
	/// Spring stiffness; weaker for edges touching busy nodes.
	pub(super) strength: f64,
	/// Share of the correction applied to the target (the rest moves the source).
	pub(super) bias: f64,
}

pub(super) fn link_params(graph: &Graph) -> Vec<LinkParams> {
	let degrees = graph.degrees();
	graph
		.edges()
		.iter()
		.map(|edge| {
			let (ds, dt) = (
				degrees[edge.source.index()] as f64,
				degrees[edge.target.index()] as f64,
			);
			LinkParams {
				strength: 1.0 / ds.min(dt).max(1.0),
				bias: ds / (ds + dt).max(1.0),
			}
		})
		.collect()
}

/// Relaxed spring per edge pulling endpoints toward `distance` apart.
pub(super) fn apply_links(
	graph: &mut Graph,
	params: &[LinkParams],
	distance: f64,
	alpha: f64,
	jiggle: &mut Jiggle,
) {
	let (edges, nodes) = graph.split_mut();

	for (edge, link) in edges.iter().zip(params) {
		let (si, ti) = (edge.source.index(), edge.target.index());
		if si == ti {
			continue;
		}

		let (source, target) = (&nodes[si], &nodes[ti]);
		let mut dx = target.x + target.vx - source.x - source.vx;
		let mut dy = target.y + target.vy - source.y - source.vy;
		if dx == 0.0 {
			dx = jiggle.next();
		}
		if dy == 0.0 {
			dy = jiggle.next();
		}

		let length = (dx * dx + dy * dy).sqrt();
		let scale = (length - distance) / length * alpha * link.strength;
		dx *= scale;
		dy *= scale;

		nodes[ti].vx -= dx * link.bias;
		nodes[ti].vy -= dy * link.bias;
		nodes[si].vx += dx * (1.0 - link.bias);
		nodes[si].vy += dy * (1.0 - link.bias);
	}
}

/// N-body charge between all nodes, approximated with a Barnes–Hut quadtree.
/// A negative `charge` repels.
pub(super) fn apply_charge(
	nodes: &mut [Node],
	positions: &mut Vec<(f64, f64)>,
	charge: f64,
	theta: f64,
	alpha: f64,
	jiggle: &mut Jiggle,
) {
	positions.clear();
	positions.extend(nodes.iter().map(Node::position));

	let Some(tree) = QuadNode::build(positions) else {
		return;
	};

	let strength = charge * alpha;
	let theta_sq = theta * theta;
	for (index, node) in nodes.iter_mut().enumerate() {
		let (mut vx, mut vy) = (0.0, 0.0);
		accumulate_charge(
			&tree,
			index,
			positions,
			strength,
			theta_sq,
			jiggle,
			&mut vx,
			&mut vy,
		);
		node.vx += vx;
		node.vy += vy;
	}
}

#[allow(clippy::too_many_arguments)]
fn accumulate_charge(
	cell: &QuadNode,
	index: usize,
	positions: &[(f64, f64)],
	strength: f64,
	theta_sq: f64,
	jiggle: &mut Jiggle,
	vx: &mut f64,
	vy: &mut f64,
) {
	if cell.mass <= 0.0 {
		return;
	}

	let point = positions[index];

	if cell.is_leaf() {
		for &other in &cell.indices {
			if other == index {
				continue;
			}
			let (fx, fy) = charge_between(point, positions[other], strength, 1.0, jiggle);
			*vx += fx;
			*vy += fy;
		}
		return;
	}

	let dx = cell.center_of_mass.0 - point.0;
	let dy = cell.center_of_mass.1 - point.1;
	let distance_sq = dx * dx + dy * dy;
	let side = cell.bounds.side_length();
	let can_approximate = !cell.bounds.contains(point) && side * side / theta_sq < distance_sq;

	if can_approximate {
		let (fx, fy) = charge_between(point, cell.center_of_mass, strength, cell.mass, jiggle);
		*vx += fx;
		*vy += fy;
		return;
	}

	for child in cell.children.iter().flatten() {
		accumulate_charge(child, index, positions, strength, theta_sq, jiggle, vx, vy);
	}
}

/// Velocity change on `point` from a charge of `weight` nodes at `other`.
fn charge_between(
	point: (f64, f64),
	other: (f64, f64),
	strength: f64,
	weight: f64,
	jiggle: &mut Jiggle,
) -> (f64, f64) {
	let mut dx = other.0 - point.0;
	let mut dy = other.1 - point.1;
	let mut distance_sq = dx * dx + dy * dy;
	if dx == 0.0 {
		dx = jiggle.next();
		distance_sq += dx * dx;
	}
	if dy == 0.0 {
		dy = jiggle.next();
		distance_sq += dy * dy;
	}
	if distance_sq < CHARGE_DISTANCE_MIN_SQ {
		distance_sq = (CHARGE_DISTANCE_MIN_SQ * distance_sq).sqrt();
	}

	let scale = strength * weight / distance_sq;
	(dx * scale, dy * scale)
}

/// Shift every node so the layout centroid moves `strength` of the way toward
/// `(cx, cy)`.
pub(super) fn apply_center(nodes: &mut [Node], (cx, cy): (f64, f64), strength: f64) {
	if nodes.is_empty() {
		return;
	}

	let count = nodes.len() as f64;
	let (sx, sy) = nodes
		.iter()
		.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
	let shift_x = (cx - sx / count) * strength;
	let shift_y = (cy - sy / count) * strength;

	for node in nodes {
		node.x += shift_x;
		node.y += shift_y;
	}
}
