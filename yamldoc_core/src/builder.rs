use std::collections::HashSet;
use std::fmt::Display;

use crate::Entry;
use crate::FieldDescriptor;
use crate::Key;
use crate::LogicalType;
use crate::Node;
use crate::RecordValue;
use crate::RenderOptions;
use crate::Scalar;
use crate::Value;
use crate::YamlDocError;
use crate::YamlDocResult;
use crate::defaults;
use crate::emitter::format_key;
use crate::format_comment;

/// Build the document tree for a captured value.
///
/// Fails on the first value with no document representation. No partial tree
/// is returned.
pub fn build_document(value: &Value, options: &RenderOptions) -> YamlDocResult<Node> {
	let mut builder = TreeBuilder {
		options,
		path: vec![],
	};
	builder.value(value)
}

enum Segment {
	Field(String),
	Index(usize),
	Key(String),
}

struct Path<'a>(&'a [Segment]);

impl Display for Path<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.0.is_empty() {
			return write!(f, "<root>");
		}

		for (index, segment) in self.0.iter().enumerate() {
			match segment {
				Segment::Field(name) | Segment::Key(name) if index == 0 => write!(f, "{name}")?,
				Segment::Field(name) | Segment::Key(name) => write!(f, ".{name}")?,
				Segment::Index(position) => write!(f, "[{position}]")?,
			}
		}

		Ok(())
	}
}

struct TreeBuilder<'a> {
	options: &'a RenderOptions,
	path: Vec<Segment>,
}

impl TreeBuilder<'_> {
	fn unsupported(&self, kind: &str) -> YamlDocError {
		YamlDocError::UnsupportedValue {
			path: Path(&self.path).to_string(),
			kind: kind.to_string(),
		}
	}

	/// Build a node from the value alone, with no field metadata.
	fn value(&mut self, value: &Value) -> YamlDocResult<Node> {
		match value {
			Value::Record(record) => self.record(record),
			Value::Sequence(items) => self.sequence(items),
			Value::Mapping(entries) => self.mapping(entries),
			Value::Opaque(kind) => Err(self.unsupported(kind)),
			Value::Null => Ok(Node::null()),
			scalar => {
				let literal = defaults::live_literal(scalar).unwrap_or_else(|| "null".to_string());
				Ok(Node::Scalar(Scalar::new(literal, scalar_tag(scalar))))
			}
		}
	}

	fn record(&mut self, record: &RecordValue) -> YamlDocResult<Node> {
		let shape = record.shape();
		if self.options.strict_annotations {
			shape.validate()?;
		}

		let mut seen = HashSet::new();
		let mut entries = Vec::with_capacity(shape.fields().len());

		for (index, field) in shape.fields().iter().enumerate() {
			if field.is_ignored() {
				continue;
			}

			let wire_name = field.wire_name();
			if !seen.insert(wire_name) {
				tracing::warn!(
					shape = shape.type_name(),
					field = field.declared_name(),
					wire_name,
					"dropping field with a duplicate key"
				);
				continue;
			}

			self.path.push(Segment::Field(wire_name.to_string()));
			let value = self.field(field, record.get(index))?;
			self.path.pop();

			let mut key = Key::new(format_key(wire_name));
			if !field.doc_text().is_empty() {
				key = key.with_head_comment(format_comment(field.doc_text(), self.options.wrap_width));
			}

			entries.push(Entry { key, value });
		}

		Ok(Node::Mapping(entries))
	}

	fn field(&mut self, field: &FieldDescriptor, value: &Value) -> YamlDocResult<Node> {
		if let Value::Opaque(kind) = value {
			return Err(self.unsupported(kind));
		}

		let logical = field.logical_type();
		match value {
			Value::Sequence(_) | Value::Mapping(_) | Value::Record(_) => return self.value(value),
			Value::Null if logical == LogicalType::Sequence => return Ok(Node::Sequence(vec![])),
			Value::Null if logical == LogicalType::Mapping => return Ok(Node::Mapping(vec![])),
			// Absent records are `null` and never expanded.
			Value::Null if logical == LogicalType::Record => return Ok(Node::null()),
			_ => {}
		}

		let literal = defaults::resolve(field, value);
		let tag = if literal == "null" {
			None
		} else {
			Some(logical)
		};
		let mut scalar = Scalar::new(literal, tag);
		if let Some(comment) = defaults::line_comment(field) {
			scalar = scalar.with_line_comment(comment);
		}

		Ok(Node::Scalar(scalar))
	}

	fn sequence(&mut self, items: &[Value]) -> YamlDocResult<Node> {
		let mut nodes = Vec::with_capacity(items.len());

		for (index, item) in items.iter().enumerate() {
			self.path.push(Segment::Index(index));
			nodes.push(self.value(item)?);
			self.path.pop();
		}

		Ok(Node::Sequence(nodes))
	}

	fn mapping(&mut self, pairs: &[(Value, Value)]) -> YamlDocResult<Node> {
		let mut seen = HashSet::new();
		let mut entries = Vec::with_capacity(pairs.len());

		for (key, value) in pairs {
			let name = self.key(key)?;
			if !seen.insert(name.clone()) {
				tracing::warn!(key = %name, "dropping mapping entry with a duplicate key");
				continue;
			}

			self.path.push(Segment::Key(name.clone()));
			let value = self.value(value)?;
			self.path.pop();

			entries.push(Entry {
				key: Key::new(name),
				value,
			});
		}

		Ok(Node::Mapping(entries))
	}

	fn key(&self, key: &Value) -> YamlDocResult<String> {
		match key {
			Value::String(name) => Ok(format_key(name)),
			Value::Null => Ok("null".to_string()),
			Value::Bool(_) | Value::Integer(_) | Value::Unsigned(_) | Value::Float(_) => {
				Ok(defaults::live_literal(key).unwrap_or_default())
			}
			Value::Sequence(_) | Value::Mapping(_) | Value::Record(_) => {
				Err(self.unsupported(&format!("{} key", key.kind())))
			}
			Value::Opaque(kind) => Err(self.unsupported(kind)),
		}
	}
}

fn scalar_tag(value: &Value) -> Option<LogicalType> {
	match value {
		Value::Bool(_) => Some(LogicalType::Bool),
		Value::Integer(_) | Value::Unsigned(_) => Some(LogicalType::Integer),
		Value::Float(_) => Some(LogicalType::Float),
		Value::String(_) => Some(LogicalType::String),
		_ => None,
	}
}
