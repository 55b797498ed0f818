//! Single owner of the graph session.
//!
//! The animation loop and the pointer callbacks both mutate the graph. They
//! never touch it directly: each goes through one method here, and the
//! component serialises calls by holding the state in a `RefCell`.

use super::interaction::{InteractionController, Release, collapse_all};
use super::model::{Graph, NodeIdx};
use super::render::{Frame, Measurable, RenderSynchronizer, Surface, Viewport};
use super::simulation::{Phase, Simulation};
use crate::config::EngineConfig;

/// Graph, physics, gesture tracking and frame output for one loaded graph.
///
/// Created once when the view mounts and dropped with it.
pub struct ForceGraphState {
	graph: Graph,
	simulation: Simulation,
	interaction: InteractionController,
	synchronizer: RenderSynchronizer,
	/// Visual state changed outside a tick and must be re-synced.
	dirty: bool,
}

impl ForceGraphState {
	/// Seed the layout around the viewport centre and prepare the first frame.
	pub fn new(mut graph: Graph, config: &EngineConfig, viewport: Viewport) -> Self {
		let simulation = Simulation::new(&mut graph, config.simulation.clone(), viewport.center());
		Self {
			graph,
			simulation,
			interaction: InteractionController::new(config.click_threshold),
			synchronizer: RenderSynchronizer::new(viewport),
			dirty: true,
		}
	}

	/// The graph being displayed.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// Current simulation phase.
	pub fn phase(&self) -> Phase {
		self.simulation.phase()
	}

	/// Whether a press has turned into a drag.
	pub fn is_dragging(&self) -> bool {
		self.interaction.is_dragging()
	}

	/// Advance the simulation one step. Returns whether a frame must be synced,
	/// either because nodes moved or because an interaction changed visuals.
	pub fn tick(&mut self) -> bool {
		let moved = self.simulation.tick(&mut self.graph);
		let dirty = std::mem::take(&mut self.dirty);
		moved || dirty
	}

	/// Compute the frame for the current state and hand it to `surface`.
	///
	/// Expansion is applied to the surface first, so `panels` are measured at
	/// the size they will be drawn with.
	pub fn sync<M: Measurable>(&mut self, panels: &[M], surface: &impl Surface) -> &Frame {
		self.synchronizer.apply_expansion(&self.graph, surface);
		self.synchronizer.sync(&self.graph, panels);
		self.synchronizer.present(surface);
		self.synchronizer.frame()
	}

	/// Press on `node` at `pointer`. Returns whether a gesture started.
	pub fn pointer_down(&mut self, node: NodeIdx, pointer: (f64, f64)) -> bool {
		self.interaction
			.pointer_down(&mut self.graph, &mut self.simulation, node, pointer)
	}

	/// Pointer moved during a gesture. Returns whether the node moved.
	pub fn pointer_move(&mut self, pointer: (f64, f64)) -> bool {
		let moved = self.interaction.pointer_move(&mut self.graph, pointer);
		self.dirty |= moved;
		moved
	}

	/// Pointer released over the pressed panel.
	pub fn pointer_up(&mut self) -> Release {
		let release = self
			.interaction
			.pointer_up(&mut self.graph, &mut self.simulation);
		if matches!(release, Release::Click { .. }) {
			self.dirty = true;
		}
		release
	}

	/// Gesture aborted: cancelled, capture lost, or released elsewhere.
	/// Returns whether a gesture was in progress.
	pub fn pointer_cancel(&mut self) -> bool {
		self.interaction
			.pointer_cancel(&mut self.graph, &mut self.simulation)
	}

	/// Click on empty background: collapse all panels.
	pub fn background_click(&mut self) -> bool {
		let changed = collapse_all(&mut self.graph);
		self.dirty |= changed;
		changed
	}
}

#[cfg(test)]
mod tests {
	use std::cell::{Cell, RefCell};

	use super::*;
	use crate::components::force_graph::model::tests::graph;
	use crate::components::force_graph::render::{LinePlacement, PanelPlacement};

	const PANEL: (f64, f64) = (160.0, 60.0);

	struct NullSurface;

	impl Surface for NullSurface {
		fn set_expanded(&self, _: NodeIdx, _: bool) {}
		fn place_panel(&self, _: &PanelPlacement) {}
		fn place_line(&self, _: usize, _: &LinePlacement) {}
	}

	const COLLAPSED: (f64, f64) = (100.0, 40.0);
	const EXPANDED: (f64, f64) = (500.0, 400.0);

	/// Panel whose size follows the expansion the surface gave it, like a DOM
	/// element whose details section is shown or hidden by a class.
	#[derive(Default)]
	struct SizedPanel {
		expanded: Cell<bool>,
	}

	impl Measurable for SizedPanel {
		fn measure(&self) -> (f64, f64) {
			if self.expanded.get() { EXPANDED } else { COLLAPSED }
		}
	}

	struct SizedSurface {
		panels: Vec<SizedPanel>,
		placed: RefCell<Vec<(f64, f64)>>,
	}

	impl SizedSurface {
		fn new(len: usize) -> Self {
			Self {
				panels: (0..len).map(|_| SizedPanel::default()).collect(),
				placed: RefCell::new(vec![(0.0, 0.0); len]),
			}
		}
	}

	impl Surface for SizedSurface {
		fn set_expanded(&self, node: NodeIdx, expanded: bool) {
			self.panels[node.index()].expanded.set(expanded);
		}

		fn place_panel(&self, placement: &PanelPlacement) {
			self.placed.borrow_mut()[placement.node.index()] = (placement.x, placement.y);
		}

		fn place_line(&self, _: usize, _: &LinePlacement) {}
	}

	/// Run animation frames the way the component does: sync only when a tick
	/// asks for it.
	fn run_frames(state: &mut ForceGraphState, surface: &SizedSurface, frames: usize) {
		for _ in 0..frames {
			if state.tick() {
				state.sync(&surface.panels, surface);
			}
		}
	}

	fn state(ids: &[&str], pairs: &[(&str, &str)]) -> ForceGraphState {
		ForceGraphState::new(
			graph(ids, pairs),
			&EngineConfig::default(),
			Viewport::new(800.0, 600.0),
		)
	}

	fn sizes(state: &ForceGraphState) -> Vec<(f64, f64)> {
		vec![PANEL; state.graph().len()]
	}

	fn settle(state: &mut ForceGraphState) {
		for _ in 0..10_000 {
			state.tick();
			if state.phase() == Phase::Settled {
				return;
			}
		}
		panic!("never settled");
	}

	#[test]
	fn first_tick_always_syncs() {
		let mut state = state(&["a"], &[]);
		assert!(state.tick());
	}

	#[test]
	fn settled_state_only_syncs_after_interaction() {
		let mut state = state(&["a", "b"], &[("a", "b")]);
		settle(&mut state);
		assert!(!state.tick());

		let (x, y) = state.graph().nodes()[0].position();
		state.pointer_down(NodeIdx(0), (x, y));
		state.pointer_up();
		// The release toggled expansion; reheat also restarted the simulation.
		assert!(state.tick());
		assert!(state.graph().nodes()[0].expanded);
	}

	#[test]
	fn dragged_node_renders_at_clamped_pin_every_tick() {
		let mut state = state(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
		let sizes = sizes(&state);
		for _ in 0..20 {
			state.tick();
		}

		let (x, y) = state.graph().nodes()[1].position();
		assert!(state.pointer_down(NodeIdx(1), (x, y)));

		// Drag along a path that leaves the viewport on both axes.
		let path = [(250.0, 250.0), (700.0, 580.0), (-120.0, 90.0), (950.0, -40.0)];
		for &(px, py) in &path {
			assert!(state.pointer_move((px, py)));
			for _ in 0..5 {
				state.tick();
				let frame = state.sync(&sizes, &NullSurface).clone();
				let panel = frame.panels[1];
				let expected = (px.clamp(0.0, 800.0 - PANEL.0), py.clamp(0.0, 600.0 - PANEL.1));
				assert_eq!((panel.x, panel.y), expected);
				assert_eq!(state.graph().nodes()[1].position(), (px, py));
			}
		}

		assert!(matches!(state.pointer_up(), Release::DragEnd { .. }));
		assert!(!state.graph().nodes()[1].expanded);
		assert!(state.graph().nodes()[1].pin.is_none());
	}

	#[test]
	fn zero_movement_gesture_toggles_exactly_once() {
		let mut state = state(&["a", "b"], &[("a", "b")]);
		let (x, y) = state.graph().nodes()[1].position();
		state.pointer_down(NodeIdx(1), (x, y));
		assert!(!state.pointer_move((x, y)));
		assert_eq!(
			state.pointer_up(),
			Release::Click {
				node: NodeIdx(1),
				expanded: true
			}
		);
		assert!(state.graph().nodes()[1].expanded);
		assert!(!state.graph().nodes()[0].expanded);
	}

	#[test]
	fn background_click_collapses_and_marks_dirty() {
		let mut state = state(&["a", "b"], &[]);
		settle(&mut state);
		assert!(!state.background_click());

		let (x, y) = state.graph().nodes()[0].position();
		state.pointer_down(NodeIdx(0), (x, y));
		state.pointer_up();
		settle(&mut state);

		assert!(state.background_click());
		assert!(state.tick());
		assert!(!state.graph().nodes()[0].expanded);
	}

	#[test]
	fn repeated_sync_without_tick_is_stable() {
		let mut state = state(&["a", "b", "c"], &[("a", "c")]);
		let sizes = sizes(&state);
		for _ in 0..40 {
			state.tick();
		}
		let first = state.sync(&sizes, &NullSurface).clone();
		let second = state.sync(&sizes, &NullSurface).clone();
		assert_eq!(first, second);
	}

	#[test]
	fn collapsed_panel_returns_to_its_simulated_position() {
		let mut state = state(&["a", "b"], &[("a", "b")]);
		let surface = SizedSurface::new(2);
		run_frames(&mut state, &surface, 1);
		settle(&mut state);
		run_frames(&mut state, &surface, 1);

		let (x, y) = state.graph().nodes()[0].position();
		state.pointer_down(NodeIdx(0), (x, y));
		state.pointer_up();
		run_frames(&mut state, &surface, 100);
		let (x, y) = state.graph().nodes()[0].position();
		assert_eq!(
			surface.placed.borrow()[0],
			(x.clamp(0.0, 800.0 - EXPANDED.0), y.clamp(0.0, 600.0 - EXPANDED.1))
		);

		assert!(state.background_click());
		run_frames(&mut state, &surface, 100);
		let sim = state.graph().nodes()[0].position();
		assert!(!surface.panels[0].expanded.get());
		assert!((0.0..=800.0 - COLLAPSED.0).contains(&sim.0), "{sim:?}");
		assert!((0.0..=600.0 - COLLAPSED.1).contains(&sim.1), "{sim:?}");
		assert_eq!(surface.placed.borrow()[0], sim);
	}

	#[test]
	fn expanded_panel_is_measured_at_its_expanded_size() {
		let mut state = state(&["a", "b"], &[("a", "b")]);
		let surface = SizedSurface::new(2);
		run_frames(&mut state, &surface, 1);
		settle(&mut state);
		run_frames(&mut state, &surface, 1);

		let (x, y) = state.graph().nodes()[1].position();
		state.pointer_down(NodeIdx(1), (x, y));
		state.pointer_up();
		run_frames(&mut state, &surface, 100);
		assert_eq!(state.phase(), Phase::Settled);
		assert!(!state.tick());

		let (x, y) = state.graph().nodes()[1].position();
		assert!(surface.panels[1].expanded.get());
		assert_eq!(
			surface.placed.borrow()[1],
			(x.clamp(0.0, 800.0 - EXPANDED.0), y.clamp(0.0, 600.0 - EXPANDED.1))
		);
	}

	#[test]
	fn cancelled_gesture_frees_the_node_for_later_presses() {
		let mut state = state(&["a", "b"], &[("a", "b")]);
		settle(&mut state);

		let (x, y) = state.graph().nodes()[0].position();
		state.pointer_down(NodeIdx(0), (x, y));
		state.pointer_move((x + 50.0, y + 50.0));
		assert!(state.pointer_cancel());
		assert!(state.graph().nodes()[0].pin.is_none());
		assert!(!state.graph().nodes()[0].expanded);

		// A release that reaches the panel after the cancel is a no-op.
		assert_eq!(state.pointer_up(), Release::Ignored);
		settle(&mut state);

		let (x, y) = state.graph().nodes()[1].position();
		assert!(state.pointer_down(NodeIdx(1), (x, y)));
		assert!(matches!(state.pointer_up(), Release::Click { .. }));
	}
}
