//! Content renderers for node descriptions.
//!
//! The graph engine treats node content as opaque: a [`Renderer`] turns the raw
//! source of a description into a [`Fragment`] once, when the node is built, and
//! the panel displays that fragment as-is.

use std::collections::HashMap;

use log::warn;
use pulldown_cmark::{Event, Options, Parser, html};

use crate::error::{LoadError, Result};

/// Name of the plain-text renderer, selected when nothing else is configured.
pub const DEFAULT_RENDERER: &str = "default";
/// Name of the CommonMark renderer.
pub const MARKDOWN_RENDERER: &str = "markdown";
/// Reserved for structured-markup rendering. Recognised, never registered.
pub const TYPST_RENDERER: &str = "typst";

/// A displayable piece of node content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
	/// Plain text, inserted as a text node.
	Text(String),
	/// Trusted markup produced by a renderer, inserted as inner HTML.
	Html(String),
}

impl Fragment {
	/// Whether there is nothing but whitespace to show.
	pub fn is_empty(&self) -> bool {
		match self {
			Fragment::Text(text) | Fragment::Html(text) => text.trim().is_empty(),
		}
	}
}

/// Turns raw description source into a [`Fragment`].
pub trait Renderer {
	/// Render one description source.
	fn render(&self, source: &str) -> Fragment;
}

impl<F> Renderer for F
where
	F: Fn(&str) -> Fragment,
{
	fn render(&self, source: &str) -> Fragment {
		self(source)
	}
}

/// Passes text through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainText;

impl Renderer for PlainText {
	fn render(&self, source: &str) -> Fragment {
		Fragment::Text(source.trim().to_string())
	}
}

/// Renders CommonMark to HTML. Raw HTML in the source is escaped rather than
/// passed through, so note content cannot inject markup into the page.
#[derive(Clone, Copy, Debug, Default)]
pub struct Markdown;

impl Renderer for Markdown {
	fn render(&self, source: &str) -> Fragment {
		let mut options = Options::empty();
		options.insert(Options::ENABLE_STRIKETHROUGH);
		options.insert(Options::ENABLE_TABLES);

		let parser = Parser::new_ext(source, options).map(|event| match event {
			Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
			other => other,
		});

		let mut out = String::with_capacity(source.len() * 3 / 2);
		html::push_html(&mut out, parser);
		Fragment::Html(out)
	}
}

/// Renderers keyed by name.
pub struct RendererRegistry {
	renderers: HashMap<String, Box<dyn Renderer>>,
}

impl Default for RendererRegistry {
	/// Registry with the built-in `default` and `markdown` renderers.
	fn default() -> Self {
		let mut registry = Self::empty();
		registry.register(DEFAULT_RENDERER, PlainText);
		registry.register(MARKDOWN_RENDERER, Markdown);
		registry
	}
}

impl RendererRegistry {
	/// Registry with nothing registered.
	pub fn empty() -> Self {
		Self {
			renderers: HashMap::new(),
		}
	}

	/// Register `renderer` under `name`, replacing any previous entry.
	pub fn register(&mut self, name: impl Into<String>, renderer: impl Renderer + 'static) {
		self.renderers.insert(name.into(), Box::new(renderer));
	}

	/// Look up a renderer by name.
	///
	/// Unknown names, including the reserved `typst`, fail with
	/// [`LoadError::RendererMissing`].
	pub fn get(&self, name: &str) -> Result<&dyn Renderer> {
		self.renderers
			.get(name)
			.map(|renderer| renderer.as_ref())
			.ok_or_else(|| {
				let mut known: Vec<&str> = self.names().collect();
				known.sort_unstable();
				warn!(
					"note-graph: no renderer `{}`, registered: {}",
					name,
					known.join(", ")
				);
				LoadError::RendererMissing {
					name: name.to_string(),
				}
			})
	}

	/// Names of the registered renderers, in no particular order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.renderers.keys().map(String::as_str)
	}
}
