use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::Annotated;
use crate::FieldDescriptor;
use crate::Record;
use crate::RecordValue;
use crate::Shape;
use crate::TypeInfo;
use crate::Value;
use crate::shape_of;

#[derive(Annotated, Debug, Default, Deserialize, PartialEq)]
pub struct Person {
	#[yamldoc(tag = r#"default:"John Doe""#)]
	pub name: String,
	#[yamldoc(tag = r#"default:"30""#)]
	pub age: u32,
	pub tags: Vec<String>,
}

#[derive(Annotated, Debug, Default, Deserialize, PartialEq)]
pub struct Address {
	#[yamldoc(tag = r#"comment:"Street and number""#)]
	pub street: String,
	pub city: String,
	#[yamldoc(tag = r#"default:"00000""#)]
	pub zip: String,
}

#[derive(Annotated, Debug, Default, Deserialize, PartialEq)]
pub struct Customer {
	pub name: String,
	#[yamldoc(tag = r#"comment:"Physical address""#)]
	pub address: Address,
}

pub fn customer() -> Customer {
	Customer {
		name: "Acme".into(),
		address: Address {
			street: "1 Main St".into(),
			..Address::default()
		},
	}
}

#[derive(Annotated, Debug, Default)]
pub struct Malformed {
	#[yamldoc(tag = r#"comment:"unterminated"#)]
	pub broken: String,
	pub ok: bool,
}

#[derive(Annotated, Debug, Default)]
pub struct WithSecret {
	pub user: String,
	#[yamldoc(skip)]
	pub password: String,
}

#[derive(Annotated, Debug, Default, Deserialize, PartialEq)]
pub struct Metadata {
	pub owner: String,
	#[yamldoc(tag = r#"default:"1""#)]
	pub revision: u32,
}

#[derive(Annotated, Debug, Default, Deserialize, PartialEq)]
pub struct Service {
	pub name: String,
	#[yamldoc(inline)]
	#[serde(flatten)]
	pub metadata: Metadata,
	pub port: u16,
}

#[derive(Annotated, Debug, Default)]
pub struct Labels {
	pub hashed: HashMap<String, String>,
	pub ordered: IndexMap<String, u32>,
}

pub fn noop() {}

#[derive(Annotated)]
pub struct Hooks {
	pub name: String,
	pub on_load: fn(),
}

#[derive(Annotated)]
pub struct HookList {
	pub hooks: Vec<fn()>,
}

#[derive(Annotated)]
pub struct NestedHooks {
	pub inner: Hooks,
}

#[derive(Annotated, Debug, Default, Deserialize, PartialEq)]
pub struct Optionals {
	pub nickname: Option<String>,
	#[yamldoc(tag = r#"default:"8080""#)]
	pub port: Option<u16>,
	pub address: Option<Address>,
	pub aliases: Option<Vec<String>>,
}

#[derive(Annotated, Debug, Default, Deserialize, PartialEq)]
pub struct Tree {
	pub name: String,
	#[yamldoc(tag = r#"comment:"Nested subtree""#)]
	pub child: Option<Box<Tree>>,
}

#[derive(Annotated, Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[yamldoc(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Debug,
	#[default]
	Info,
	#[yamldoc(rename = "warn")]
	#[serde(rename = "warn")]
	Warning,
}

#[derive(Annotated, Debug, Default)]
pub struct Tuning {
	pub ratio: f64,
	pub level: Level,
	pub limit: f64,
}

#[derive(Annotated, Debug, Default)]
pub struct Duplicate {
	#[yamldoc(rename = "name")]
	pub first: String,
	pub name: String,
}

#[derive(Annotated, Debug, Default)]
pub struct Documented {
	/// The port to listen on.
	pub port: u16,
	/// Not used: the annotation wins.
	#[yamldoc(tag = r#"describe:"Host name""#)]
	pub host: String,
}

#[derive(Annotated, Debug, Default, Deserialize, PartialEq)]
pub struct Member {
	#[yamldoc(tag = r#"comment:"Member name""#)]
	pub name: String,
	pub role: String,
}

#[derive(Annotated, Debug, Default, Deserialize, PartialEq)]
pub struct Team {
	pub members: Vec<Member>,
	pub grid: Vec<Vec<u8>>,
}

pub fn team() -> Team {
	Team {
		members: vec![
			Member {
				name: "ada".into(),
				role: "lead".into(),
			},
			Member {
				name: "bob".into(),
				role: String::new(),
			},
		],
		grid: vec![vec![1, 2], vec![]],
	}
}

#[derive(Annotated, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Renamed {
	pub api_key: String,
	#[serde(rename = "APIVersion", default)]
	pub api_version: u8,
	#[serde(skip)]
	pub cache: Vec<String>,
}

#[derive(Annotated, Debug, Default)]
pub struct BadDefault {
	#[yamldoc(tag = r#"default:"abc""#)]
	pub count: u32,
}

#[derive(Annotated, Debug, Default)]
pub struct Port(pub u16);

#[derive(Annotated, Debug, Default)]
pub struct Wrapped<T> {
	pub inner: T,
	pub port: Port,
}

/// A record described by hand instead of through the derive.
pub struct Manual {
	pub title: String,
	pub retries: u8,
}

impl Record for Manual {
	fn shape() -> &'static Shape {
		shape_of::<Self>(|| {
			Shape::builder("Manual")
				.field(
					FieldDescriptor::new("title", <String as Annotated>::type_info())
						.annotation(r#"comment:"Window title" default:"untitled""#),
				)
				.field(
					FieldDescriptor::new("retries", <u8 as Annotated>::type_info())
						.rename("max-retries"),
				)
				.build()
		})
	}
}

impl Annotated for Manual {
	fn type_info() -> TypeInfo {
		TypeInfo::record::<Self>()
	}

	fn to_value(&self) -> Value {
		let mut record = RecordValue::new(Self::shape());
		record.push(self.title.to_value());
		record.push(self.retries.to_value());
		Value::Record(record)
	}
}
