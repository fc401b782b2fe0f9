//! The rule choosing between the live value, the declared default and the
//! zero literal for a scalar leaf.

use crate::FieldDescriptor;
use crate::LogicalType;
use crate::Value;
use crate::emitter::format_float;
use crate::emitter::quote_string;

/// The literal to render for a scalar field.
///
/// 1. A present, non-zero live value renders as itself.
/// 2. Otherwise a declared default renders in its place, quoted for string
///    fields.
/// 3. Otherwise an absent optional value renders as `null`.
/// 4. Otherwise the zero literal of the field's type: `""`, `false` or `0`.
pub fn resolve(field: &FieldDescriptor, value: &Value) -> String {
	if !value.is_zero() {
		if let Some(literal) = live_literal(value) {
			return literal;
		}
	}

	if field.has_default() {
		return default_literal(field);
	}

	if field.is_optional() && *value == Value::Null {
		return "null".to_string();
	}

	field
		.logical_type()
		.zero_literal()
		.unwrap_or("null")
		.to_string()
}

/// The literal for a scalar value, `None` for `null` and composites.
pub fn live_literal(value: &Value) -> Option<String> {
	let literal = match value {
		Value::Bool(value) => value.to_string(),
		Value::Integer(value) => value.to_string(),
		Value::Unsigned(value) => value.to_string(),
		Value::Float(value) => format_float(*value),
		Value::String(value) => quote_string(value),
		Value::Null
		| Value::Sequence(_)
		| Value::Mapping(_)
		| Value::Record(_)
		| Value::Opaque(_) => return None,
	};

	Some(literal)
}

/// The declared default, written the way it renders in the document.
pub fn default_literal(field: &FieldDescriptor) -> String {
	match field.logical_type() {
		LogicalType::String => quote_string(field.default_literal()),
		_ => field.default_literal().to_string(),
	}
}

/// The trailing `[type]` or `[type, default=literal]` annotation of a scalar
/// field. Composite fields have none.
pub fn line_comment(field: &FieldDescriptor) -> Option<String> {
	let logical = field.logical_type();
	if !logical.is_scalar() {
		return None;
	}

	if field.has_default() {
		Some(format!("[{logical}, default={}]", default_literal(field)))
	} else {
		Some(format!("[{logical}]"))
	}
}
