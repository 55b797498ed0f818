//! Pointer gestures on node panels: drag to pin and move, click to expand.
//!
//! A press pins the node where it is and reheats the simulation. The gesture
//! only becomes a drag once the pointer travels past the click threshold;
//! releasing before that toggles the node's expansion instead.

use log::{debug, warn};

use super::model::{Graph, NodeIdx};
use super::simulation::Simulation;

/// Tracks an in-progress press on a node.
#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
	/// The pressed node.
	pub node: NodeIdx,
	/// Pointer position at press time.
	pub press: (f64, f64),
	/// Pointer position minus node position at press time, so the panel keeps
	/// its grab point under the pointer.
	pub grab_offset: (f64, f64),
	/// Set once the pointer has moved past the click threshold.
	pub dragged: bool,
}

/// What a pointer release did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
	/// No press was in progress.
	Ignored,
	/// The press never became a drag: the node's expansion was toggled.
	Click {
		/// The toggled node.
		node: NodeIdx,
		/// Expansion after the toggle.
		expanded: bool,
	},
	/// A drag finished; the node is free again.
	DragEnd {
		/// The released node.
		node: NodeIdx,
	},
}

/// Turns pointer events on panels into pins, drags and expansion toggles.
#[derive(Clone, Debug)]
pub struct InteractionController {
	click_threshold: f64,
	drag: Option<DragState>,
}

impl InteractionController {
	/// Controller treating moves within `click_threshold` pixels as a click.
	pub fn new(click_threshold: f64) -> Self {
		Self {
			click_threshold: click_threshold.max(0.0),
			drag: None,
		}
	}

	/// The press in progress, if any.
	pub fn drag(&self) -> Option<&DragState> {
		self.drag.as_ref()
	}

	/// Whether the press in progress has become a drag.
	pub fn is_dragging(&self) -> bool {
		self.drag.as_ref().is_some_and(|drag| drag.dragged)
	}

	/// Start a gesture on `node`: pin it at its current position and reheat the
	/// simulation so the rest of the layout reacts. Ignored while another
	/// gesture is in progress.
	pub fn pointer_down(
		&mut self,
		graph: &mut Graph,
		simulation: &mut Simulation,
		node: NodeIdx,
		pointer: (f64, f64),
	) -> bool {
		if self.drag.is_some() {
			return false;
		}
		let Some(target) = graph.node_mut(node) else {
			warn!("note-graph: pointer down on unknown node {:?}", node);
			return false;
		};

		target.pin = Some((target.x, target.y));
		self.drag = Some(DragState {
			node,
			press: pointer,
			grab_offset: (pointer.0 - target.x, pointer.1 - target.y),
			dragged: false,
		});
		simulation.reheat(simulation.config().drag_alpha_target);
		true
	}

	/// Move the pin with the pointer. Movement within the click threshold is
	/// ignored so a slightly shaky click still counts as a click.
	pub fn pointer_move(&mut self, graph: &mut Graph, pointer: (f64, f64)) -> bool {
		let Some(drag) = self.drag.as_mut() else {
			return false;
		};

		if !drag.dragged {
			let (dx, dy) = (pointer.0 - drag.press.0, pointer.1 - drag.press.1);
			if (dx * dx + dy * dy).sqrt() <= self.click_threshold {
				return false;
			}
			debug!("note-graph: drag started on {:?}", drag.node);
			drag.dragged = true;
		}

		let pin = (pointer.0 - drag.grab_offset.0, pointer.1 - drag.grab_offset.1);
		if let Some(node) = graph.node_mut(drag.node) {
			node.pin = Some(pin);
			node.x = pin.0;
			node.y = pin.1;
		}
		true
	}

	/// Finish the gesture: unpin the node and let the layout cool. A press that
	/// never became a drag toggles the node's expansion exactly once.
	pub fn pointer_up(&mut self, graph: &mut Graph, simulation: &mut Simulation) -> Release {
		let Some(drag) = self.release(graph, simulation) else {
			return Release::Ignored;
		};

		if drag.dragged {
			debug!("note-graph: drag ended on {:?}", drag.node);
			return Release::DragEnd { node: drag.node };
		}

		match graph.node_mut(drag.node) {
			Some(node) => {
				node.expanded = !node.expanded;
				Release::Click {
					node: drag.node,
					expanded: node.expanded,
				}
			}
			None => Release::Ignored,
		}
	}

	/// Abort the gesture (pointer cancelled or capture lost) without a click.
	pub fn pointer_cancel(&mut self, graph: &mut Graph, simulation: &mut Simulation) -> bool {
		self.release(graph, simulation).is_some()
	}

	fn release(&mut self, graph: &mut Graph, simulation: &mut Simulation) -> Option<DragState> {
		let drag = self.drag.take()?;
		if let Some(node) = graph.node_mut(drag.node) {
			node.pin = None;
		}
		simulation.cool();
		Some(drag)
	}
}

/// Collapse every expanded panel. Returns whether anything changed.
pub fn collapse_all(graph: &mut Graph) -> bool {
	let mut changed = false;
	for node in graph.nodes_mut() {
		changed |= std::mem::replace(&mut node.expanded, false);
	}
	changed
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::model::tests::graph;
	use crate::components::force_graph::simulation::Phase;
	use crate::config::SimulationConfig;

	fn setup() -> (Graph, Simulation, InteractionController) {
		let mut graph = graph(&["a", "b", "c"], &[("a", "b")]);
		let simulation = Simulation::new(&mut graph, SimulationConfig::default(), (300.0, 200.0));
		(graph, simulation, InteractionController::new(3.0))
	}

	fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
		assert!(
			(actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
			"{actual:?} != {expected:?}"
		);
	}

	fn press_point(graph: &Graph, idx: NodeIdx) -> (f64, f64) {
		let node = graph.node(idx).unwrap();
		(node.x + 12.0, node.y + 8.0)
	}

	#[test]
	fn stationary_press_toggles_once() {
		let (mut graph, mut sim, mut ctl) = setup();
		let idx = NodeIdx(1);
		let at = press_point(&graph, idx);

		assert!(ctl.pointer_down(&mut graph, &mut sim, idx, at));
		assert_eq!(
			ctl.pointer_up(&mut graph, &mut sim),
			Release::Click {
				node: idx,
				expanded: true
			}
		);
		assert!(graph.nodes()[1].expanded);

		ctl.pointer_down(&mut graph, &mut sim, idx, at);
		ctl.pointer_up(&mut graph, &mut sim);
		assert!(!graph.nodes()[1].expanded);
	}

	#[test]
	fn jitter_within_threshold_is_still_a_click() {
		let (mut graph, mut sim, mut ctl) = setup();
		let idx = NodeIdx(0);
		let (x, y) = press_point(&graph, idx);
		let before = graph.nodes()[0].position();

		ctl.pointer_down(&mut graph, &mut sim, idx, (x, y));
		assert!(!ctl.pointer_move(&mut graph, (x + 2.0, y + 1.0)));
		assert_eq!(graph.nodes()[0].position(), before);
		assert!(matches!(
			ctl.pointer_up(&mut graph, &mut sim),
			Release::Click { expanded: true, .. }
		));
	}

	#[test]
	fn drag_moves_pin_and_does_not_toggle() {
		let (mut graph, mut sim, mut ctl) = setup();
		let idx = NodeIdx(2);
		let (x, y) = press_point(&graph, idx);
		let (nx, ny) = graph.nodes()[2].position();

		ctl.pointer_down(&mut graph, &mut sim, idx, (x, y));
		assert_eq!(graph.nodes()[2].pin, Some((nx, ny)));
		assert!(ctl.pointer_move(&mut graph, (x + 40.0, y - 25.0)));
		assert!(ctl.is_dragging());
		assert_close(graph.nodes()[2].pin.unwrap(), (nx + 40.0, ny - 25.0));
		assert_close(graph.nodes()[2].position(), (nx + 40.0, ny - 25.0));

		assert_eq!(
			ctl.pointer_up(&mut graph, &mut sim),
			Release::DragEnd { node: idx }
		);
		let node = &graph.nodes()[2];
		assert!(!node.expanded);
		assert_eq!(node.pin, None);
	}

	#[test]
	fn press_reheats_and_release_cools() {
		let (mut graph, mut sim, mut ctl) = setup();
		while sim.tick(&mut graph) {}
		assert_eq!(sim.phase(), Phase::Settled);

		let at = press_point(&graph, NodeIdx(0));
		ctl.pointer_down(&mut graph, &mut sim, NodeIdx(0), at);
		assert_eq!(sim.phase(), Phase::Running);
		assert_eq!(sim.alpha_target(), sim.config().drag_alpha_target);

		ctl.pointer_up(&mut graph, &mut sim);
		assert_eq!(sim.alpha_target(), 0.0);
	}

	#[test]
	fn second_press_during_gesture_is_ignored() {
		let (mut graph, mut sim, mut ctl) = setup();
		let at = press_point(&graph, NodeIdx(0));
		assert!(ctl.pointer_down(&mut graph, &mut sim, NodeIdx(0), at));
		assert!(!ctl.pointer_down(&mut graph, &mut sim, NodeIdx(1), at));
		assert!(graph.nodes()[1].pin.is_none());
		assert_eq!(ctl.drag().unwrap().node, NodeIdx(0));
	}

	#[test]
	fn cancel_unpins_without_click() {
		let (mut graph, mut sim, mut ctl) = setup();
		let at = press_point(&graph, NodeIdx(0));
		ctl.pointer_down(&mut graph, &mut sim, NodeIdx(0), at);
		assert!(ctl.pointer_cancel(&mut graph, &mut sim));
		assert!(!graph.nodes()[0].expanded);
		assert!(graph.nodes()[0].pin.is_none());
		assert_eq!(ctl.pointer_up(&mut graph, &mut sim), Release::Ignored);
	}

	#[test]
	fn unknown_node_and_stray_events_are_ignored() {
		let (mut graph, mut sim, mut ctl) = setup();
		assert!(!ctl.pointer_down(&mut graph, &mut sim, NodeIdx(99), (0.0, 0.0)));
		assert!(!ctl.pointer_move(&mut graph, (5.0, 5.0)));
		assert_eq!(ctl.pointer_up(&mut graph, &mut sim), Release::Ignored);
	}

	#[test]
	fn clicks_only_touch_the_pressed_node() {
		let (mut graph, mut sim, mut ctl) = setup();
		let before: Vec<_> = graph
			.nodes()
			.iter()
			.map(|n| (n.position(), n.pin, n.expanded))
			.collect();
		let at = press_point(&graph, NodeIdx(1));
		ctl.pointer_down(&mut graph, &mut sim, NodeIdx(1), at);
		ctl.pointer_up(&mut graph, &mut sim);
		for (i, node) in graph.nodes().iter().enumerate() {
			if i != 1 {
				assert_eq!((node.position(), node.pin, node.expanded), before[i]);
			}
		}
	}

	#[test]
	fn collapse_all_reports_changes() {
		let (mut graph, ..) = setup();
		assert!(!collapse_all(&mut graph));
		graph.nodes_mut()[0].expanded = true;
		graph.nodes_mut()[2].expanded = true;
		assert!(collapse_all(&mut graph));
		assert!(graph.nodes().iter().all(|n| !n.expanded));
	}
}
