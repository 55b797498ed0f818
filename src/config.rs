//! Engine configuration.
//!
//! Every field has a default, so an absent or partial configuration block is
//! valid. The page may carry overrides as JSON:
//!
//! ```html
//! <script id="graph-config" type="application/json">
//!   { "renderer": "markdown", "simulation": { "link_distance": 180 } }
//! </script>
//! ```

use log::warn;
use serde::Deserialize;

use crate::content::DEFAULT_RENDERER;

/// Id of the optional `<script>` element holding configuration JSON.
pub const CONFIG_ELEMENT_ID: &str = "graph-config";

/// Physics parameters for the force simulation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Rest length of every edge spring.
	pub link_distance: f64,
	/// Pairwise charge. Negative values repel.
	pub charge: f64,
	/// Fraction of the centroid's offset from the viewport center removed each tick.
	pub center_strength: f64,
	/// Barnes–Hut opening angle. Smaller is more exact and slower.
	pub theta: f64,
	/// Alpha below which the simulation settles.
	pub alpha_min: f64,
	/// Per-tick rate at which alpha approaches its target.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 150.0,
			charge: -300.0,
			center_strength: 0.1,
			theta: 0.9,
			alpha_min,
			// Cools from 1 to alpha_min in ~300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
		}
	}
}

/// Top-level configuration passed into the graph view at construction.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	/// Base URL of the data source; `/nodes` and `/edges` are appended.
	pub api_base: String,
	/// Name of the content renderer applied to node descriptions.
	pub renderer: String,
	/// Also derive edges from `[id]` / `[title](id)` references in node content.
	pub derive_links: bool,
	/// Pointer travel in pixels beyond which a press becomes a drag, not a click.
	pub click_threshold: f64,
	/// Physics parameters.
	pub simulation: SimulationConfig,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			api_base: "/api".to_string(),
			renderer: DEFAULT_RENDERER.to_string(),
			derive_links: false,
			click_threshold: 3.0,
			simulation: SimulationConfig::default(),
		}
	}
}

impl EngineConfig {
	/// Parse configuration JSON, falling back to defaults when it is malformed.
	pub fn from_json(text: &str) -> Self {
		if text.trim().is_empty() {
			return Self::default();
		}
		match serde_json::from_str(text) {
			Ok(config) => config,
			Err(e) => {
				warn!("note-graph: ignoring malformed configuration: {}", e);
				Self::default()
			}
		}
	}

	/// URL of the node list.
	pub fn nodes_url(&self) -> String {
		format!("{}/nodes", self.api_base.trim_end_matches('/'))
	}

	/// URL of the edge list.
	pub fn edges_url(&self) -> String {
		format!("{}/edges", self.api_base.trim_end_matches('/'))
	}
}
