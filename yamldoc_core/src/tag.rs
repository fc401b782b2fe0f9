use thiserror::Error;

use crate::lexer::tokenize;

/// A problem found while scanning a field annotation.
///
/// In the default (lenient) mode these never surface as render errors: the
/// annotation degrades to an empty tag and the problem is reported as a
/// [`crate::ShapeDiagnostic`] on the shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AnnotationError {
	#[error("unterminated quoted value starting at byte {offset}")]
	UnterminatedQuote { offset: usize },
	#[error("key `{key}` is not followed by `:` (byte {offset})")]
	MissingColon { key: String, offset: usize },
	#[error("expected a key before `:` at byte {offset}")]
	MissingKey { offset: usize },
	#[error("expected a key but found a quoted value at byte {offset}")]
	UnexpectedValue { offset: usize },
}

/// A single `key:value` pair from an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub key: String,
	pub value: String,
}

/// The parsed attributes of a field annotation, in source order.
///
/// ```rust
/// use yamldoc_core::Tag;
///
/// let tag = Tag::parse(r#"comment:"Full name" default:"John Doe""#).unwrap();
/// assert_eq!(tag.value("comment"), "Full name");
/// assert_eq!(tag.value("default"), "John Doe");
/// assert_eq!(tag.value("missing"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
	attributes: Vec<Attribute>,
}

impl Tag {
	/// Parse an annotation, reporting the first syntax problem.
	pub fn parse(raw: &str) -> Result<Self, AnnotationError> {
		Ok(Self {
			attributes: tokenize(raw)?,
		})
	}

	/// Parse an annotation, degrading malformed input to an empty tag.
	pub fn lenient(raw: &str) -> Self {
		Self::parse(raw).unwrap_or_default()
	}

	/// The value of the first attribute named `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|attribute| attribute.key == key)
			.map(|attribute| attribute.value.as_str())
	}

	/// The value of `key`, or an empty string when it is absent.
	pub fn value(&self, key: &str) -> &str {
		self.get(key).unwrap_or_default()
	}

	pub fn is_empty(&self) -> bool {
		self.attributes.is_empty()
	}

	pub fn attributes(&self) -> &[Attribute] {
		&self.attributes
	}
}

/// Look up a single attribute of a raw annotation. Malformed annotations and
/// missing keys both yield an empty string.
pub fn tag_value(raw: &str, key: &str) -> String {
	Tag::lenient(raw).value(key).to_string()
}
