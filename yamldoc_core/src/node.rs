use crate::LogicalType;

/// The document tree produced by the builder and flattened by the emitter.
///
/// Literals and keys are stored ready to write: strings are already quoted
/// and escaped. A tree is built fresh for every render and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Scalar(Scalar),
	Sequence(Vec<Node>),
	Mapping(Vec<Entry>),
}

impl Node {
	pub fn null() -> Self {
		Self::Scalar(Scalar::new("null", None))
	}

	pub fn is_empty_composite(&self) -> bool {
		match self {
			Self::Scalar(_) => false,
			Self::Sequence(items) => items.is_empty(),
			Self::Mapping(entries) => entries.is_empty(),
		}
	}

	/// The entry rendered under `name` when this is a mapping.
	pub fn get(&self, name: &str) -> Option<&Node> {
		let Self::Mapping(entries) = self else {
			return None;
		};

		entries
			.iter()
			.find(|entry| entry.key.name == name)
			.map(|entry| &entry.value)
	}

	pub fn as_scalar(&self) -> Option<&Scalar> {
		match self {
			Self::Scalar(scalar) => Some(scalar),
			_ => None,
		}
	}
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
	/// The literal as written, e.g. `"John Doe"`, `30` or `null`.
	pub literal: String,
	/// The logical type of the literal. `None` for `null`.
	pub tag: Option<LogicalType>,
	/// Trailing same-line comment without the marker, e.g.
	/// `[string, default="John Doe"]`.
	pub line_comment: Option<String>,
}

impl Scalar {
	pub fn new(literal: impl Into<String>, tag: Option<LogicalType>) -> Self {
		Self {
			literal: literal.into(),
			tag,
			line_comment: None,
		}
	}

	#[must_use]
	pub fn with_line_comment(mut self, comment: impl Into<String>) -> Self {
		self.line_comment = Some(comment.into());
		self
	}
}

/// One `key: value` pair of a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
	pub key: Key,
	pub value: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
	/// The key as written, quoted when a plain key would be ambiguous.
	pub name: String,
	/// Comment lines written above the key, each starting with `# `.
	pub head_comment: Vec<String>,
}

impl Key {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			head_comment: vec![],
		}
	}

	#[must_use]
	pub fn with_head_comment(mut self, lines: Vec<String>) -> Self {
		self.head_comment = lines;
		self
	}
}
