//! Leptos component that mounts the note graph into the DOM.
//!
//! Every node is an absolutely positioned panel and every edge an SVG line.
//! An animation loop runs via `requestAnimationFrame`, ticking the simulation
//! and pushing the resulting frame to the elements. Pointer handlers on the
//! panels feed the same state, so drags and clicks are applied between ticks.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::html::Div;
use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, MouseEvent, PointerEvent};

use super::interaction::Release;
use super::model::{Graph, NodeIdx};
use super::render::{LinePlacement, Measurable, PanelPlacement, Surface, Viewport};
use super::state::ForceGraphState;
use crate::config::EngineConfig;
use crate::content::Fragment;

const EXPANDED_CLASS: &str = "expanded";

impl Measurable for HtmlElement {
	fn measure(&self) -> (f64, f64) {
		(self.offset_width() as f64, self.offset_height() as f64)
	}
}

/// The mounted panel and line elements, indexed like the graph.
struct DomSurface {
	panels: Vec<HtmlElement>,
	lines: Vec<Element>,
}

impl Surface for DomSurface {
	fn set_expanded(&self, node: NodeIdx, expanded: bool) {
		if let Some(panel) = self.panels.get(node.index()) {
			let _ = panel.class_list().toggle_with_force(EXPANDED_CLASS, expanded);
		}
	}

	fn place_panel(&self, placement: &PanelPlacement) {
		let Some(panel) = self.panels.get(placement.node.index()) else {
			return;
		};
		let _ = panel.style().set_property(
			"transform",
			&format!("translate({}px, {}px)", placement.x, placement.y),
		);
	}

	fn place_line(&self, index: usize, placement: &LinePlacement) {
		let Some(line) = self.lines.get(index) else {
			return;
		};
		let _ = line.set_attribute("x1", &placement.x1.to_string());
		let _ = line.set_attribute("y1", &placement.y1.to_string());
		let _ = line.set_attribute("x2", &placement.x2.to_string());
		let _ = line.set_attribute("y2", &placement.y2.to_string());
	}
}

/// Viewport size at mount time. Later window resizes are not tracked.
fn read_viewport() -> Viewport {
	let size = web_sys::window().and_then(|window| {
		Some((
			window.inner_width().ok()?.as_f64()?,
			window.inner_height().ok()?.as_f64()?,
		))
	});
	let (width, height) = size.unwrap_or((800.0, 600.0));
	Viewport::new(width, height)
}

fn fragment_view(fragment: &Fragment, class: &'static str) -> Option<AnyView> {
	if fragment.is_empty() {
		return None;
	}
	Some(match fragment {
		Fragment::Text(text) => view! { <p class=class>{text.clone()}</p> }.into_any(),
		Fragment::Html(html) => view! { <div class=class inner_html=html.clone()></div> }.into_any(),
	})
}

fn pointer_position(ev: &PointerEvent) -> (f64, f64) {
	(ev.client_x() as f64, ev.client_y() as f64)
}

type SharedState = Rc<RefCell<ForceGraphState>>;

/// Renders `graph` as draggable, expandable note panels joined by lines.
///
/// Clicking a panel toggles its long description; dragging it pins the note
/// to the pointer until release. Clicking the background collapses all
/// panels.
#[component]
pub fn ForceGraphView(
	/// Loaded graph; the view takes ownership for its lifetime.
	graph: Graph,
	/// Engine configuration: physics and click threshold.
	config: EngineConfig,
) -> impl IntoView {
	let viewport = read_viewport();
	let panel_refs: Vec<NodeRef<Div>> = (0..graph.len()).map(|_| NodeRef::new()).collect();
	let line_refs: Vec<NodeRef<leptos::svg::Line>> =
		(0..graph.edges().len()).map(|_| NodeRef::new()).collect();

	let panels = graph
		.nodes()
		.iter()
		.enumerate()
		.map(|(i, node)| {
			(
				i,
				node.title.clone(),
				fragment_view(&node.short, "note-short"),
				fragment_view(&node.details, "note-details"),
			)
		})
		.collect::<Vec<_>>();

	let state: SharedState = Rc::new(RefCell::new(ForceGraphState::new(
		graph, &config, viewport,
	)));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));

	let alive_cleanup = alive.clone();
	on_cleanup(move || alive_cleanup.store(false, Ordering::Relaxed));

	let (state_init, panel_refs_init, line_refs_init) =
		(state.clone(), panel_refs.clone(), line_refs.clone());
	Effect::new(move |_| {
		let panels: Vec<HtmlElement> = panel_refs_init
			.iter()
			.filter_map(|r| r.get_untracked())
			.map(Into::into)
			.collect();
		let lines: Vec<Element> = line_refs_init
			.iter()
			.filter_map(|r| r.get_untracked())
			.map(Into::into)
			.collect();
		if panels.len() != panel_refs_init.len() || animate.borrow().is_some() {
			return;
		}
		let surface = DomSurface { panels, lines };

		let (state_anim, animate_inner, alive) = (state_init.clone(), animate.clone(), alive.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if !alive.load(Ordering::Relaxed) {
				debug!("note-graph: view unmounted, stopping animation loop");
				return;
			}
			{
				let mut state = state_anim.borrow_mut();
				if state.tick() {
					state.sync(&surface.panels, &surface);
				}
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), animate.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_bg = state.clone();
	let on_background = move |_: MouseEvent| {
		if state_bg.borrow_mut().background_click() {
			debug!("note-graph: collapsed all panels");
		}
	};
	// Panel releases bubble here after `pointer_up` already ended the gesture.
	// Anything still in progress was released off its panel.
	let state_release = state.clone();
	let on_background_release = move |_: PointerEvent| {
		if state_release.borrow_mut().pointer_cancel() {
			debug!("note-graph: gesture released outside its panel");
		}
	};

	let panel_views = panels
		.into_iter()
		.map(|(i, title, short, details)| {
			let idx = NodeIdx(i);
			let (state_down, state_move, state_up, state_cancel, state_lost) = (
				state.clone(),
				state.clone(),
				state.clone(),
				state.clone(),
				state.clone(),
			);

			let on_pointerdown = move |ev: PointerEvent| {
				if ev.button() != 0 {
					return;
				}
				ev.prevent_default();
				if let Some(target) = ev
					.current_target()
					.and_then(|t| t.dyn_into::<Element>().ok())
					&& let Err(e) = target.set_pointer_capture(ev.pointer_id())
				{
					warn!("note-graph: pointer capture failed: {:?}", e);
				}
				state_down
					.borrow_mut()
					.pointer_down(idx, pointer_position(&ev));
			};
			let on_pointermove = move |ev: PointerEvent| {
				state_move.borrow_mut().pointer_move(pointer_position(&ev));
			};
			let on_pointerup = move |_: PointerEvent| {
				if let Release::Click { node, expanded } = state_up.borrow_mut().pointer_up() {
					debug!("note-graph: {:?} expanded={}", node, expanded);
				}
			};
			let on_pointercancel = move |_: PointerEvent| {
				state_cancel.borrow_mut().pointer_cancel();
			};
			// Also fires after a normal release, when the gesture is already over.
			let on_lostpointercapture = move |_: PointerEvent| {
				if state_lost.borrow_mut().pointer_cancel() {
					debug!("note-graph: pointer capture lost mid-gesture");
				}
			};

			view! {
				<div
					node_ref=panel_refs[i]
					class="note-panel"
					on:pointerdown=on_pointerdown
					on:pointermove=on_pointermove
					on:pointerup=on_pointerup
					on:pointercancel=on_pointercancel
					on:lostpointercapture=on_lostpointercapture
					on:click=|ev: MouseEvent| ev.stop_propagation()
				>
					<h2 class="note-title">{title}</h2>
					{short}
					{details}
				</div>
			}
		})
		.collect_view();

	let line_views = line_refs
		.iter()
		.map(|r| view! { <line node_ref=*r class="note-edge" /> })
		.collect_view();

	view! {
		<div class="note-graph" on:click=on_background on:pointerup=on_background_release>
			<svg
				class="note-graph-edges"
				width=viewport.width.to_string()
				height=viewport.height.to_string()
			>
				{line_views}
			</svg>
			{panel_views}
		</div>
	}
}
