//! Per-tick synchronisation from simulated positions to on-screen elements.
//!
//! The synchroniser is the only writer of visual state. It applies each node's
//! expansion to its panel, measures the panel at that size, and produces a
//! [`Frame`]: clamped panel positions plus edge line endpoints. Clamping only
//! affects the frame; simulated positions are left as they are.

use super::model::{Graph, NodeIdx};

/// Visible area in CSS pixels. Read once when the graph is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
}

impl Viewport {
	/// Viewport of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Midpoint, where the layout is centred.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

/// Anything that can report its current rendered size.
pub trait Measurable {
	/// `(width, height)` in CSS pixels.
	fn measure(&self) -> (f64, f64);
}

impl Measurable for (f64, f64) {
	fn measure(&self) -> (f64, f64) {
		*self
	}
}

/// Clamp a panel's top-left corner so the whole panel stays inside the
/// viewport. A panel larger than the viewport is pinned to the near edge.
pub fn clamp_to_viewport(
	(x, y): (f64, f64),
	(width, height): (f64, f64),
	viewport: Viewport,
) -> (f64, f64) {
	let max_x = (viewport.width - width).max(0.0);
	let max_y = (viewport.height - height).max(0.0);
	(x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

/// Where one node panel is drawn this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelPlacement {
	/// Node the panel belongs to.
	pub node: NodeIdx,
	/// Clamped left edge.
	pub x: f64,
	/// Clamped top edge.
	pub y: f64,
	/// Whether the long description is shown.
	pub expanded: bool,
}

/// Endpoints of one edge line this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePlacement {
	/// Source x.
	pub x1: f64,
	/// Source y.
	pub y1: f64,
	/// Target x.
	pub x2: f64,
	/// Target y.
	pub y2: f64,
}

/// Everything the surface needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	/// One placement per node, in node order.
	pub panels: Vec<PanelPlacement>,
	/// One line per edge, in edge order.
	pub lines: Vec<LinePlacement>,
}

/// Receives a computed [`Frame`]. Implemented by the DOM layer.
pub trait Surface {
	/// Show or hide the long description of `node`'s panel. Called before the
	/// panel is measured, so the measurement reflects the new content.
	fn set_expanded(&self, node: NodeIdx, expanded: bool);
	/// Move a panel to its clamped position.
	fn place_panel(&self, placement: &PanelPlacement);
	/// Move the `index`-th edge line.
	fn place_line(&self, index: usize, placement: &LinePlacement);
}

/// Turns graph state into [`Frame`]s for one viewport.
pub struct RenderSynchronizer {
	viewport: Viewport,
	frame: Frame,
}

impl RenderSynchronizer {
	/// Synchroniser for a fixed viewport, with an empty frame.
	pub fn new(viewport: Viewport) -> Self {
		Self {
			viewport,
			frame: Frame::default(),
		}
	}

	/// Viewport the frames are clamped to.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Last computed frame.
	pub fn frame(&self) -> &Frame {
		&self.frame
	}

	/// Push every node's expansion flag to `surface`. Run this before
	/// [`sync`](Self::sync) so panels are measured at their current size.
	pub fn apply_expansion(&self, graph: &Graph, surface: &impl Surface) {
		for (i, node) in graph.nodes().iter().enumerate() {
			surface.set_expanded(NodeIdx(i), node.expanded);
		}
	}

	/// Compute the frame for the current graph state. `panels[i]` measures the
	/// element of node `i`; nodes without an element are treated as zero-sized.
	pub fn sync<M: Measurable>(&mut self, graph: &Graph, panels: &[M]) -> &Frame {
		self.frame.panels.clear();
		self.frame.lines.clear();

		for (i, node) in graph.nodes().iter().enumerate() {
			let size = panels.get(i).map_or((0.0, 0.0), Measurable::measure);
			let (x, y) = clamp_to_viewport(node.position(), size, self.viewport);
			self.frame.panels.push(PanelPlacement {
				node: NodeIdx(i),
				x,
				y,
				expanded: node.expanded,
			});
		}

		// Lines follow live simulated positions, not the clamped panels.
		for edge in graph.edges() {
			let (source, target) = graph.endpoints(edge);
			self.frame.lines.push(LinePlacement {
				x1: source.x,
				y1: source.y,
				x2: target.x,
				y2: target.y,
			});
		}

		&self.frame
	}

	/// Push the last computed frame to `surface`.
	pub fn present(&self, surface: &impl Surface) {
		for placement in &self.frame.panels {
			surface.place_panel(placement);
		}
		for (index, line) in self.frame.lines.iter().enumerate() {
			surface.place_line(index, line);
		}
	}
}
