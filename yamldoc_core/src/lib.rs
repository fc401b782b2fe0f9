//! `yamldoc_core` renders typed configuration values as self-documenting
//! YAML. Every field of a record becomes a key with its doc text written as a
//! comment above it, and every scalar leaf carries a trailing annotation with
//! its type and declared default. The output is meant to be shipped as the
//! example configuration of a program and loads back into the same type.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Configuration value (T: Annotated)
//!   -> Capture (T::to_value, positional record values)
//!   -> Shape (cached field descriptors, annotations scanned by the tag lexer)
//!   -> Tree builder (defaulting policy, head and line comments)
//!   -> Emitter (indented YAML text)
//! ```
//!
//! ## Annotations
//!
//! Field metadata is written in a small tag language of `key:"value"` pairs:
//!
//! - `comment` (or `describe`): doc text, wrapped into `# ` comment lines.
//! - `default`: the literal rendered when the live value is zero. `nil`
//!   means no default.
//!
//! When a field has no `comment` or `describe`, its rustdoc comment is used.
//!
//! ## Quick Start
//!
//! ```rust
//! use yamldoc_core::Annotated;
//!
//! #[derive(Annotated, Default)]
//! struct Person {
//! 	#[yamldoc(tag = r#"default:"John Doe""#)]
//! 	name: String,
//! 	#[yamldoc(tag = r#"default:"30""#)]
//! 	age: u32,
//! 	tags: Vec<String>,
//! }
//!
//! let output = yamldoc_core::to_string(&Person::default()).unwrap();
//! assert_eq!(
//! 	output,
//! 	"name: \"John Doe\" # [string, default=\"John Doe\"]\n\nage: 30 # [integer, \
//! 	 default=30]\n\ntags: []\n"
//! );
//! ```

extern crate self as yamldoc_core;

pub use builder::*;
pub use comment::*;
pub use emitter::*;
pub use error::*;
pub use node::*;
pub use options::*;
pub use shape::*;
pub use tag::*;
pub use value::*;
#[cfg(feature = "derive")]
pub use yamldoc_derive::Annotated;

mod builder;
mod comment;
pub mod defaults;
mod emitter;
#[allow(unused_assignments)]
mod error;
pub(crate) mod lexer;
mod node;
mod options;
mod shape;
mod tag;
mod value;

/// Renders values with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
	options: RenderOptions,
}

impl Renderer {
	pub fn new(options: RenderOptions) -> Self {
		Self { options }
	}

	pub fn options(&self) -> &RenderOptions {
		&self.options
	}

	/// Build the document tree without flattening it to text.
	pub fn document<T: Annotated + ?Sized>(&self, value: &T) -> YamlDocResult<Node> {
		let captured = value.to_value();
		tracing::debug!(kind = captured.kind(), "building document");
		build_document(&captured, &self.options)
	}

	pub fn render<T: Annotated + ?Sized>(&self, value: &T) -> YamlDocResult<String> {
		let document = self.document(value)?;
		Ok(emit(&document, &self.options))
	}
}

/// Build the document tree for `value`.
pub fn to_document<T: Annotated + ?Sized>(
	value: &T,
	options: &RenderOptions,
) -> YamlDocResult<Node> {
	build_document(&value.to_value(), options)
}

/// Render `value` with the default options.
pub fn to_string<T: Annotated + ?Sized>(value: &T) -> YamlDocResult<String> {
	Renderer::default().render(value)
}

pub fn to_string_with<T: Annotated + ?Sized>(
	value: &T,
	options: &RenderOptions,
) -> YamlDocResult<String> {
	Renderer::new(options.clone()).render(value)
}

/// Render `value` with the default options, as UTF-8 bytes.
pub fn to_vec<T: Annotated + ?Sized>(value: &T) -> YamlDocResult<Vec<u8>> {
	to_string(value).map(String::into_bytes)
}

#[cfg(test)]
mod __fixtures;
#[cfg(test)]
mod __tests;
