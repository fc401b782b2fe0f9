use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::hash::BuildHasher;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc;

use indexmap::IndexMap;

use crate::LogicalType;
use crate::Shape;
use crate::TypeInfo;

/// A live configuration value, captured for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// An absent optional value.
	Null,
	Bool(bool),
	Integer(i64),
	Unsigned(u64),
	Float(f64),
	String(String),
	Sequence(Vec<Value>),
	/// Dynamic key/value pairs, in the order they will be rendered.
	Mapping(Vec<(Value, Value)>),
	Record(RecordValue),
	/// A value with no document representation, e.g. a callback or channel.
	/// Rendering one fails with [`crate::YamlDocError::UnsupportedValue`].
	Opaque(&'static str),
}

impl Value {
	/// Whether this is the zero value of its type. `Null` counts as zero.
	pub fn is_zero(&self) -> bool {
		match self {
			Self::Null => true,
			Self::Bool(value) => !value,
			Self::Integer(value) => *value == 0,
			Self::Unsigned(value) => *value == 0,
			Self::Float(value) => *value == 0.0,
			Self::String(value) => value.is_empty(),
			Self::Sequence(items) => items.is_empty(),
			Self::Mapping(entries) => entries.is_empty(),
			Self::Record(_) | Self::Opaque(_) => false,
		}
	}

	/// A short name for the kind of value, used in error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "boolean",
			Self::Integer(_) | Self::Unsigned(_) => "integer",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::Sequence(_) => "sequence",
			Self::Mapping(_) => "mapping",
			Self::Record(_) => "record",
			Self::Opaque(kind) => kind,
		}
	}

	/// Ordering used for containers without a stable iteration order.
	/// Numbers compare numerically, strings lexically, and mixed kinds by
	/// kind name.
	pub fn key_cmp(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Self::String(a), Self::String(b)) => a.cmp(b),
			(Self::Integer(a), Self::Integer(b)) => a.cmp(b),
			(Self::Unsigned(a), Self::Unsigned(b)) => a.cmp(b),
			(Self::Integer(a), Self::Unsigned(b)) => i128::from(*a).cmp(&i128::from(*b)),
			(Self::Unsigned(a), Self::Integer(b)) => i128::from(*a).cmp(&i128::from(*b)),
			(Self::Float(a), Self::Float(b)) => a.total_cmp(b),
			(Self::Bool(a), Self::Bool(b)) => a.cmp(b),
			(a, b) => a.kind().cmp(b.kind()),
		}
	}
}

/// The captured fields of a record, positionally matching
/// [`Shape::fields`].
#[derive(Debug, Clone)]
pub struct RecordValue {
	shape: &'static Shape,
	values: Vec<Value>,
}

impl PartialEq for RecordValue {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self.shape, other.shape) && self.values == other.values
	}
}

impl RecordValue {
	pub fn new(shape: &'static Shape) -> Self {
		Self {
			shape,
			values: Vec::with_capacity(shape.fields().len()),
		}
	}

	pub fn shape(&self) -> &'static Shape {
		self.shape
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}

	/// The value of the field at `index`, `Null` when it was never pushed.
	pub fn get(&self, index: usize) -> &Value {
		self.values.get(index).unwrap_or(&Value::Null)
	}

	pub fn push(&mut self, value: Value) {
		self.values.push(value);
	}

	/// Placeholder for an ignored field.
	pub fn push_skipped(&mut self) {
		self.values.push(Value::Null);
	}

	/// Capture an inline field. Its record values are spliced in place so
	/// they line up with the expanded fields of the parent shape.
	pub fn splice<T: Annotated>(&mut self, value: &T) {
		let Some(shape) = T::type_info().shape else {
			self.values.push(value.to_value());
			return;
		};

		let width = shape().fields().len();
		let mut values = match value.to_value() {
			Value::Record(record) => record.values,
			_ => vec![],
		};
		values.resize(width, Value::Null);
		self.values.extend(values);
	}
}

/// A type that can be rendered as an annotated document.
///
/// Implemented for the standard scalar, sequence and mapping types. Records
/// implement it through `#[derive(Annotated)]`, or by hand together with
/// [`Record`].
pub trait Annotated {
	/// Static description of the type.
	fn type_info() -> TypeInfo;

	/// Capture the live value.
	fn to_value(&self) -> Value;
}

/// A record type with a field shape.
pub trait Record: Annotated {
	fn shape() -> &'static Shape;
}

macro_rules! impl_scalar {
	($logical:ident, $variant:ident, $target:ty; $($ty:ty),+ $(,)?) => {
		$(
			impl Annotated for $ty {
				fn type_info() -> TypeInfo {
					TypeInfo::scalar(LogicalType::$logical)
				}

				fn to_value(&self) -> Value {
					Value::$variant(<$target>::from(*self))
				}
			}
		)+
	};
}

impl_scalar!(Integer, Integer, i64; i8, i16, i32, i64);
impl_scalar!(Integer, Unsigned, u64; u8, u16, u32, u64);
impl_scalar!(Float, Float, f64; f64);
impl_scalar!(Bool, Bool, bool; bool);

impl Annotated for f32 {
	fn type_info() -> TypeInfo {
		TypeInfo::scalar(LogicalType::Float)
	}

	/// Widened through the shortest decimal form so `0.1_f32` renders as `0.1`.
	fn to_value(&self) -> Value {
		Value::Float(self.to_string().parse().unwrap_or(f64::from(*self)))
	}
}

impl Annotated for isize {
	fn type_info() -> TypeInfo {
		TypeInfo::scalar(LogicalType::Integer)
	}

	fn to_value(&self) -> Value {
		Value::Integer(*self as i64)
	}
}

impl Annotated for usize {
	fn type_info() -> TypeInfo {
		TypeInfo::scalar(LogicalType::Integer)
	}

	fn to_value(&self) -> Value {
		Value::Unsigned(*self as u64)
	}
}

macro_rules! impl_string {
	($($ty:ty),+ $(,)?) => {
		$(
			impl Annotated for $ty {
				fn type_info() -> TypeInfo {
					TypeInfo::scalar(LogicalType::String)
				}

				fn to_value(&self) -> Value {
					Value::String(self.to_string())
				}
			}
		)+
	};
}

impl_string!(str, String, char, Cow<'_, str>);

impl Annotated for Path {
	fn type_info() -> TypeInfo {
		TypeInfo::scalar(LogicalType::String)
	}

	fn to_value(&self) -> Value {
		Value::String(self.display().to_string())
	}
}

impl Annotated for PathBuf {
	fn type_info() -> TypeInfo {
		TypeInfo::scalar(LogicalType::String)
	}

	fn to_value(&self) -> Value {
		Value::String(self.display().to_string())
	}
}

macro_rules! impl_pointer {
	($($ty:ident),+) => {
		$(
			impl<T: Annotated + ?Sized> Annotated for $ty<T> {
				fn type_info() -> TypeInfo {
					T::type_info()
				}

				fn to_value(&self) -> Value {
					(**self).to_value()
				}
			}
		)+
	};
}

impl_pointer!(Box, Rc, Arc);

impl<T: Annotated + ?Sized> Annotated for &T {
	fn type_info() -> TypeInfo {
		T::type_info()
	}

	fn to_value(&self) -> Value {
		(**self).to_value()
	}
}

impl<T: Annotated> Annotated for Option<T> {
	fn type_info() -> TypeInfo {
		T::type_info().optional()
	}

	fn to_value(&self) -> Value {
		self.as_ref().map_or(Value::Null, Annotated::to_value)
	}
}

impl<T: Annotated> Annotated for [T] {
	fn type_info() -> TypeInfo {
		TypeInfo::sequence()
	}

	fn to_value(&self) -> Value {
		Value::Sequence(self.iter().map(Annotated::to_value).collect())
	}
}

impl<T: Annotated, const N: usize> Annotated for [T; N] {
	fn type_info() -> TypeInfo {
		TypeInfo::sequence()
	}

	fn to_value(&self) -> Value {
		Value::Sequence(self.iter().map(Annotated::to_value).collect())
	}
}

macro_rules! impl_sequence {
	($($ty:ident),+) => {
		$(
			impl<T: Annotated> Annotated for $ty<T> {
				fn type_info() -> TypeInfo {
					TypeInfo::sequence()
				}

				fn to_value(&self) -> Value {
					Value::Sequence(self.iter().map(Annotated::to_value).collect())
				}
			}
		)+
	};
}

impl_sequence!(Vec, VecDeque, BTreeSet);

impl<K: Annotated, V: Annotated> Annotated for BTreeMap<K, V> {
	fn type_info() -> TypeInfo {
		TypeInfo::mapping()
	}

	fn to_value(&self) -> Value {
		Value::Mapping(
			self.iter()
				.map(|(key, value)| (key.to_value(), value.to_value()))
				.collect(),
		)
	}
}

impl<K: Annotated, V: Annotated, S> Annotated for IndexMap<K, V, S> {
	fn type_info() -> TypeInfo {
		TypeInfo::mapping()
	}

	fn to_value(&self) -> Value {
		Value::Mapping(
			self.iter()
				.map(|(key, value)| (key.to_value(), value.to_value()))
				.collect(),
		)
	}
}

/// `HashMap` has no stable iteration order, so entries are sorted by key.
impl<K: Annotated, V: Annotated, S: BuildHasher> Annotated for HashMap<K, V, S> {
	fn type_info() -> TypeInfo {
		TypeInfo::mapping()
	}

	fn to_value(&self) -> Value {
		let mut entries: Vec<(Value, Value)> = self
			.iter()
			.map(|(key, value)| (key.to_value(), value.to_value()))
			.collect();
		entries.sort_by(|(a, _), (b, _)| a.key_cmp(b));
		Value::Mapping(entries)
	}
}

macro_rules! impl_opaque {
	($kind:literal; $($ty:ty => [$($generic:ident),*]),+ $(,)?) => {
		$(
			impl<$($generic),*> Annotated for $ty {
				fn type_info() -> TypeInfo {
					TypeInfo::scalar(LogicalType::String)
				}

				fn to_value(&self) -> Value {
					Value::Opaque($kind)
				}
			}
		)+
	};
}

impl_opaque!("function"; fn() -> R => [R], fn(A) -> R => [A, R], fn(A, B) -> R => [A, B, R]);
impl_opaque!(
	"channel";
	mpsc::Sender<T> => [T],
	mpsc::SyncSender<T> => [T],
	mpsc::Receiver<T> => [T],
);
