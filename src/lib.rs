//! note-graph: Interactive force-directed graph of linked notes.
//!
//! This crate provides a WASM client that fetches notes and their links from an
//! HTTP API and lays them out with a physics simulation. Each note is a panel
//! that can be dragged around or clicked to reveal its long description.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, error, info};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod config;
pub mod content;
pub mod error;
pub mod loader;

pub use components::force_graph::{EdgeRecord, ForceGraphView, Graph, GraphData, NodeRecord};
pub use config::EngineConfig;
pub use error::LoadError;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("note-graph: logging initialized");
}

/// Read the optional configuration block from a script element with
/// id="graph-config". Missing or malformed blocks yield the defaults.
fn load_config() -> EngineConfig {
	let text = (|| {
		let window: Window = web_sys::window()?;
		let document = window.document()?;
		let element = document.get_element_by_id(config::CONFIG_ELEMENT_ID)?;
		let script: HtmlScriptElement = element.dyn_into().ok()?;
		script.text().ok()
	})();
	text.map(|text| EngineConfig::from_json(&text))
		.unwrap_or_default()
}

#[derive(Clone)]
enum LoadState {
	Loading,
	Ready(Graph),
	Failed(String),
}

/// Main application component.
/// Fetches the graph once and renders it, or a single error message.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let state = RwSignal::new(LoadState::Loading);

	let load_config = config.clone();
	spawn_local(async move {
		let registry = content::RendererRegistry::default();
		match loader::load_graph(&load_config, &registry).await {
			Ok(graph) => state.set(LoadState::Ready(graph)),
			Err(e) => {
				error!("note-graph: {}", e);
				state.set(LoadState::Failed(e.to_string()));
			}
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Notes" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		{move || match state.get() {
			LoadState::Loading => view! { <p class="graph-status">"Loading notes..."</p> }.into_any(),
			LoadState::Ready(graph) => {
				view! { <ForceGraphView graph=graph config=config.clone() /> }.into_any()
			}
			LoadState::Failed(message) => {
				view! { <p class="graph-status graph-error">{message}</p> }.into_any()
			}
		}}
	}
}
