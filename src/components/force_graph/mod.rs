//! Force-directed note graph.
//!
//! Notes are laid out by a physics simulation and drawn as HTML panels
//! connected by SVG lines:
//! - Link, many-body and centering forces with alpha cooling
//! - Panels clamped to the viewport without disturbing the layout
//! - Drag to pin a note, click to expand its long description
//!
//! # Example
//!
//! ```ignore
//! use note_graph::components::force_graph::{ForceGraphView, Graph, NodeRecord, EdgeRecord};
//! use note_graph::content::PlainText;
//!
//! let nodes = vec![NodeRecord::new("a", "Alpha"), NodeRecord::new("b", "Beta")];
//! let edges = vec![EdgeRecord::new("a", "b")];
//! let graph = Graph::load(&nodes, &edges, &PlainText)?;
//!
//! view! { <ForceGraphView graph=graph config=EngineConfig::default() /> }
//! ```

mod component;
pub mod interaction;
pub mod links;
pub mod model;
pub mod render;
pub mod simulation;
pub mod state;
mod types;

pub use component::ForceGraphView;
pub use model::{Edge, Graph, Node, NodeIdx};
pub use render::Viewport;
pub use simulation::{Phase, Simulation};
pub use state::ForceGraphState;
pub use types::{EdgeRecord, GraphData, NodeRecord};
