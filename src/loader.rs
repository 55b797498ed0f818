//! Fetches graph data from the notes API and builds the [`Graph`].
//!
//! Loading is all-or-nothing: any transport, shape or model error aborts it
//! and is reported once; no partial graph is ever shown.

use log::info;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::components::force_graph::{EdgeRecord, Graph, GraphData, NodeRecord, links};
use crate::config::EngineConfig;
use crate::content::RendererRegistry;
use crate::error::{LoadError, Result};

/// Decode a JSON payload that must be an array of `T`.
pub fn parse_array<T: DeserializeOwned>(what: &'static str, text: &str) -> Result<Vec<T>> {
	let value: Value = serde_json::from_str(text).map_err(|e| LoadError::Shape {
		what,
		reason: e.to_string(),
	})?;
	if !value.is_array() {
		return Err(LoadError::Shape {
			what,
			reason: format!("expected an array, got {}", json_kind(&value)),
		});
	}
	serde_json::from_value(value).map_err(|e| LoadError::Shape {
		what,
		reason: e.to_string(),
	})
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// Decode both payloads into [`GraphData`].
pub fn parse_graph_data(nodes_json: &str, edges_json: &str) -> Result<GraphData> {
	Ok(GraphData {
		nodes: parse_array::<NodeRecord>("nodes", nodes_json)?,
		edges: parse_array::<EdgeRecord>("edges", edges_json)?,
	})
}

/// Resolve the configured renderer and build the graph, adding edges derived
/// from inline references when enabled.
pub fn build_graph(
	mut data: GraphData,
	config: &EngineConfig,
	registry: &RendererRegistry,
) -> Result<Graph> {
	let renderer = registry.get(&config.renderer)?;
	if config.derive_links {
		let derived = links::derive_edges(&data.nodes, &data.edges);
		info!("note-graph: derived {} edges from references", derived.len());
		data.edges.extend(derived);
	}
	Graph::load(&data.nodes, &data.edges, renderer)
}

/// Fetch nodes and edges from the configured API and build the graph.
pub async fn load_graph(config: &EngineConfig, registry: &RendererRegistry) -> Result<Graph> {
	let nodes_url = config.nodes_url();
	let edges_url = config.edges_url();
	let nodes_json = fetch_text(&nodes_url).await?;
	let edges_json = fetch_text(&edges_url).await?;

	let data = parse_graph_data(&nodes_json, &edges_json)?;
	let graph = build_graph(data, config, registry)?;
	info!(
		"note-graph: loaded {} nodes, {} edges",
		graph.len(),
		graph.edges().len()
	);
	Ok(graph)
}

async fn fetch_text(url: &str) -> Result<String> {
	let transport = |reason: String| LoadError::Transport {
		url: url.to_string(),
		reason,
	};

	let window = web_sys::window().ok_or_else(|| transport("no window".into()))?;
	let init = RequestInit::new();
	init.set_method("GET");
	let request = Request::new_with_str_and_init(url, &init).map_err(|e| transport(describe(&e)))?;
	request
		.headers()
		.set("Accept", "application/json")
		.map_err(|e| transport(describe(&e)))?;

	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| transport(describe(&e)))?
		.dyn_into()
		.map_err(|e| transport(describe(&e)))?;
	if !response.ok() {
		return Err(transport(format!(
			"HTTP {} {}",
			response.status(),
			response.status_text()
		)));
	}

	let text = JsFuture::from(response.text().map_err(|e| transport(describe(&e)))?)
		.await
		.map_err(|e| transport(describe(&e)))?;
	text.as_string()
		.ok_or_else(|| transport("response body is not text".into()))
}

/// Best-effort message from a thrown JS value.
fn describe(value: &JsValue) -> String {
	if let Some(error) = value.dyn_ref::<js_sys::Error>() {
		return String::from(error.message());
	}
	value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
