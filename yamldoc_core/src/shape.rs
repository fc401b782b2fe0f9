//! Static field metadata for record types.
//!
//! A [`Shape`] is the ordered list of [`FieldDescriptor`]s for one record
//! type. Shapes are built once per type, either by `#[derive(Annotated)]` or
//! by hand through [`Shape::builder`], and cached for the lifetime of the
//! process by [`shape_of`].
//!
//! Building a shape resolves everything the renderer needs up front:
//!
//! - the wire name (an explicit rename or the declared name);
//! - the doc text and default literal, scanned out of the raw annotation by
//!   the tag parser (`comment`, then `describe`, then the rustdoc text);
//! - inline fields, which are replaced in place by the inline record's own
//!   fields so the tree builder only ever sees a flat list.
//!
//! Malformed annotations never fail the build. They degrade to an empty doc
//! text and default and are kept as [`ShapeDiagnostic`]s, which strict
//! rendering turns into errors.

use std::any::TypeId;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::OnceLock;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::AnnotationError;
use crate::Tag;
use crate::YamlDocError;
use crate::YamlDocResult;

/// The value category of a field, as far as rendering is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
	String,
	Bool,
	Integer,
	Float,
	Sequence,
	Mapping,
	Record,
}

impl LogicalType {
	/// Scalars are the only leaves that carry a trailing type annotation.
	pub fn is_scalar(self) -> bool {
		matches!(self, Self::String | Self::Bool | Self::Integer | Self::Float)
	}

	/// The canonical literal rendered for a zero value with no default.
	pub fn zero_literal(self) -> Option<&'static str> {
		match self {
			Self::String => Some("\"\""),
			Self::Bool => Some("false"),
			Self::Integer | Self::Float => Some("0"),
			Self::Sequence | Self::Mapping | Self::Record => None,
		}
	}

	/// Check whether `literal` is a valid default for this type.
	pub fn accepts_literal(self, literal: &str) -> bool {
		match self {
			Self::String => true,
			Self::Bool => matches!(literal, "true" | "false"),
			Self::Integer => literal.parse::<i128>().is_ok(),
			Self::Float => literal.parse::<f64>().is_ok(),
			Self::Sequence | Self::Mapping | Self::Record => false,
		}
	}
}

impl Display for LogicalType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::String => "string",
			Self::Bool => "boolean",
			Self::Integer => "integer",
			Self::Float => "float",
			Self::Sequence => "sequence",
			Self::Mapping => "mapping",
			Self::Record => "record",
		};
		write!(f, "{name}")
	}
}

/// Static type information for an [`crate::Annotated`] type.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
	pub logical: LogicalType,
	/// `Option<T>` and other "may be absent" wrappers.
	pub optional: bool,
	/// The record shape, for record types (and wrappers around them).
	pub shape: Option<fn() -> &'static Shape>,
}

impl TypeInfo {
	pub const fn scalar(logical: LogicalType) -> Self {
		Self {
			logical,
			optional: false,
			shape: None,
		}
	}

	pub const fn sequence() -> Self {
		Self::scalar(LogicalType::Sequence)
	}

	pub const fn mapping() -> Self {
		Self::scalar(LogicalType::Mapping)
	}

	pub fn record<T: crate::Record>() -> Self {
		Self {
			logical: LogicalType::Record,
			optional: false,
			shape: Some(<T as crate::Record>::shape),
		}
	}

	#[must_use]
	pub const fn optional(mut self) -> Self {
		self.optional = true;
		self
	}
}

/// Metadata about one record field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
	declared_name: String,
	wire_name: Option<String>,
	logical_type: LogicalType,
	doc_text: String,
	default_literal: String,
	ignored: bool,
	inline: bool,
	optional_like: bool,
	annotation: String,
	rustdoc: String,
	shape: Option<fn() -> &'static Shape>,
}

impl FieldDescriptor {
	pub fn new(declared_name: impl Into<String>, info: TypeInfo) -> Self {
		Self {
			declared_name: declared_name.into(),
			wire_name: None,
			logical_type: info.logical,
			doc_text: String::new(),
			default_literal: String::new(),
			ignored: false,
			inline: false,
			optional_like: info.optional,
			annotation: String::new(),
			rustdoc: String::new(),
			shape: info.shape,
		}
	}

	/// A field excluded from rendering. No other metadata is read for it.
	pub fn skipped(declared_name: impl Into<String>) -> Self {
		let mut descriptor = Self::new(declared_name, TypeInfo::scalar(LogicalType::String));
		descriptor.ignored = true;
		descriptor
	}

	#[must_use]
	pub fn rename(mut self, wire_name: impl Into<String>) -> Self {
		self.wire_name = Some(wire_name.into());
		self
	}

	/// The raw annotation, e.g. `comment:"Full name" default:"John Doe"`.
	#[must_use]
	pub fn annotation(mut self, raw: impl Into<String>) -> Self {
		self.annotation = raw.into();
		self
	}

	/// Fallback doc text used when the annotation has no `comment` or
	/// `describe` attribute.
	#[must_use]
	pub fn doc(mut self, rustdoc: impl Into<String>) -> Self {
		self.rustdoc = rustdoc.into();
		self
	}

	/// Splice this field's own record fields into the parent.
	#[must_use]
	pub fn inline(mut self) -> Self {
		self.inline = true;
		self
	}

	pub fn declared_name(&self) -> &str {
		&self.declared_name
	}

	pub fn wire_name(&self) -> &str {
		self.wire_name.as_deref().unwrap_or(&self.declared_name)
	}

	pub fn logical_type(&self) -> LogicalType {
		self.logical_type
	}

	pub fn doc_text(&self) -> &str {
		&self.doc_text
	}

	pub fn default_literal(&self) -> &str {
		&self.default_literal
	}

	pub fn has_default(&self) -> bool {
		!self.default_literal.is_empty()
	}

	pub fn is_ignored(&self) -> bool {
		self.ignored
	}

	pub fn is_inline(&self) -> bool {
		self.inline
	}

	pub fn is_optional(&self) -> bool {
		self.optional_like
	}

	pub fn raw_annotation(&self) -> &str {
		&self.annotation
	}

	/// The shape of the field's record type, if it is a record.
	pub fn shape(&self) -> Option<&'static Shape> {
		self.shape.map(|shape| shape())
	}

	/// Scan the annotation into doc text and default. A malformed annotation
	/// leaves both empty and returns the syntax error.
	fn resolve(&mut self) -> Option<AnnotationError> {
		let tag = match Tag::parse(&self.annotation) {
			Ok(tag) => tag,
			Err(error) => return Some(error),
		};

		self.doc_text = [tag.value("comment"), tag.value("describe"), self.rustdoc.as_str()]
			.into_iter()
			.find(|text| !text.trim().is_empty())
			.unwrap_or_default()
			.to_string();

		let default = tag.value("default");
		if default != "nil" {
			self.default_literal = default.to_string();
		}

		None
	}
}

/// A problem found while building a [`Shape`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShapeDiagnostic {
	/// The annotation could not be scanned and was ignored.
	MalformedAnnotation {
		field: String,
		error: AnnotationError,
	},
	/// Two fields render under the same key. Only the first is kept.
	DuplicateWireName { field: String, wire_name: String },
	/// The default literal is not a valid value of the field's type.
	InvalidDefault {
		field: String,
		literal: String,
		expected: LogicalType,
	},
	/// `inline` was used on a field that is not a record.
	InlineNotRecord { field: String },
}

impl ShapeDiagnostic {
	pub fn field(&self) -> &str {
		match self {
			Self::MalformedAnnotation { field, .. }
			| Self::DuplicateWireName { field, .. }
			| Self::InvalidDefault { field, .. }
			| Self::InlineNotRecord { field } => field,
		}
	}
}

impl Display for ShapeDiagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::MalformedAnnotation { error, .. } => write!(f, "{error}"),
			Self::DuplicateWireName { wire_name, .. } => {
				write!(f, "key `{wire_name}` is already used by an earlier field")
			}
			Self::InvalidDefault {
				literal, expected, ..
			} => write!(f, "default `{literal}` is not a valid {expected}"),
			Self::InlineNotRecord { .. } => write!(f, "only record fields can be inlined"),
		}
	}
}

impl From<&ShapeDiagnostic> for YamlDocError {
	fn from(diagnostic: &ShapeDiagnostic) -> Self {
		YamlDocError::MalformedAnnotation {
			field: diagnostic.field().to_string(),
			reason: diagnostic.to_string(),
		}
	}
}

/// The effective, ordered field list of a record type.
#[derive(Debug, Clone)]
pub struct Shape {
	type_name: String,
	fields: Vec<FieldDescriptor>,
	diagnostics: Vec<ShapeDiagnostic>,
}

impl Shape {
	pub fn builder(type_name: impl Into<String>) -> ShapeBuilder {
		ShapeBuilder {
			type_name: type_name.into(),
			fields: vec![],
		}
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// All fields in declaration order, inline fields already expanded.
	/// Ignored fields are kept so positions match captured record values.
	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	/// Fields that produce an entry in the rendered document.
	pub fn visible_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
		self.fields.iter().filter(|field| !field.is_ignored())
	}

	pub fn diagnostics(&self) -> &[ShapeDiagnostic] {
		&self.diagnostics
	}

	/// Fail on the first diagnostic collected while building the shape.
	pub fn validate(&self) -> YamlDocResult<()> {
		match self.diagnostics.first() {
			Some(diagnostic) => Err(diagnostic.into()),
			None => Ok(()),
		}
	}
}

/// Collects fields for a [`Shape`] in declaration order.
#[derive(Debug)]
pub struct ShapeBuilder {
	type_name: String,
	fields: Vec<FieldDescriptor>,
}

impl ShapeBuilder {
	#[must_use]
	pub fn field(mut self, field: FieldDescriptor) -> Self {
		self.fields.push(field);
		self
	}

	pub fn build(self) -> Shape {
		let mut fields = Vec::with_capacity(self.fields.len());
		let mut diagnostics = vec![];

		for mut field in self.fields {
			if field.ignored {
				fields.push(field);
				continue;
			}

			if let Some(error) = field.resolve() {
				tracing::warn!(
					shape = %self.type_name,
					field = %field.declared_name,
					%error,
					"ignoring malformed annotation"
				);
				diagnostics.push(ShapeDiagnostic::MalformedAnnotation {
					field: field.declared_name.clone(),
					error,
				});
			}

			if field.inline {
				if let Some(inner) = field.shape() {
					fields.extend(inner.fields.iter().cloned());
					diagnostics.extend(inner.diagnostics.iter().cloned());
					continue;
				}

				diagnostics.push(ShapeDiagnostic::InlineNotRecord {
					field: field.declared_name.clone(),
				});
			}

			if field.has_default() && !field.logical_type.accepts_literal(&field.default_literal) {
				diagnostics.push(ShapeDiagnostic::InvalidDefault {
					field: field.declared_name.clone(),
					literal: field.default_literal.clone(),
					expected: field.logical_type,
				});
			}

			fields.push(field);
		}

		let mut seen = HashSet::new();
		for field in fields.iter().filter(|field| !field.ignored) {
			if !seen.insert(field.wire_name()) {
				diagnostics.push(ShapeDiagnostic::DuplicateWireName {
					field: field.declared_name.clone(),
					wire_name: field.wire_name().to_string(),
				});
			}
		}

		Shape {
			type_name: self.type_name,
			fields,
			diagnostics,
		}
	}
}

/// Return the cached shape for `T`, building it with `build` on first use.
///
/// Shapes live for the rest of the process. The cache is read-mostly: after
/// the first render of each type every lookup only takes the read lock.
pub fn shape_of<T: ?Sized + 'static>(build: impl FnOnce() -> Shape) -> &'static Shape {
	static CACHE: OnceLock<RwLock<HashMap<TypeId, &'static Shape>>> = OnceLock::new();

	let cache = CACHE.get_or_init(RwLock::default);
	let id = TypeId::of::<T>();

	if let Some(shape) = cache
		.read()
		.unwrap_or_else(PoisonError::into_inner)
		.get(&id)
	{
		return *shape;
	}

	// Built outside the lock: inline fields look up their own shapes.
	let shape = build();

	let mut guard = cache.write().unwrap_or_else(PoisonError::into_inner);
	*guard
		.entry(id)
		.or_insert_with(|| Box::leak(Box::new(shape)))
}
