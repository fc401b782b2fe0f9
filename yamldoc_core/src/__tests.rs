use std::collections::BTreeMap;
use std::collections::HashMap;

use rstest::rstest;
use similar_asserts::assert_eq;

use super::__fixtures::*;
use super::*;

#[rstest]
#[case::comment(r#"comment:"Full name" default:"John Doe""#, "comment", "Full name")]
#[case::default(r#"comment:"Full name" default:"John Doe""#, "default", "John Doe")]
#[case::unquoted("default:30", "default", "30")]
#[case::single_quoted("describe:'spaced out'", "describe", "spaced out")]
#[case::space_after_colon(r#"comment: "spaced""#, "comment", "spaced")]
#[case::escapes(r#"comment:"line\nbreak \"quoted\"""#, "comment", "line\nbreak \"quoted\"")]
#[case::unknown_escape(r#"comment:"keep \q""#, "comment", r"keep \q")]
#[case::colon_in_value("url:http://example.com/a", "url", "http://example.com/a")]
#[case::first_wins(r#"comment:"first" comment:"second""#, "comment", "first")]
#[case::skips_other_keys(r#"yaml:"name,inline" comment:"found""#, "comment", "found")]
#[case::empty_value("comment:", "comment", "")]
#[case::missing_key(r#"comment:"x""#, "default", "")]
#[case::empty_input("", "comment", "")]
#[case::apostrophe("comment:don't default:x", "comment", "don't")]
#[case::after_apostrophe("comment:don't default:x", "default", "x")]
#[case::quote_inside_word(r#"comment:say"hi" default:"a b""#, "default", "a b")]
fn tag_value_lookup(#[case] raw: &str, #[case] key: &str, #[case] expected: &str) {
	assert_eq!(tag_value(raw, key), expected);
}

#[rstest]
#[case::unterminated_quote(r#"comment:"open"#, AnnotationError::UnterminatedQuote { offset: 8 })]
#[case::missing_colon(r#"comment "x""#, AnnotationError::MissingColon { key: "comment".into(), offset: 7 })]
#[case::key_at_end("comment", AnnotationError::MissingColon { key: "comment".into(), offset: 7 })]
#[case::missing_key(":x", AnnotationError::MissingKey { offset: 0 })]
#[case::value_without_key(r#""x""#, AnnotationError::UnexpectedValue { offset: 0 })]
fn malformed_tags(#[case] raw: &str, #[case] expected: AnnotationError) {
	assert_eq!(Tag::parse(raw), Err(expected));
	assert!(Tag::lenient(raw).is_empty());
	assert_eq!(tag_value(raw, "comment"), "");
}

#[test]
fn tag_keeps_attribute_order() -> Result<(), AnnotationError> {
	let tag = Tag::parse(r#"b:"2" a:1 b:3"#)?;
	let keys: Vec<_> = tag.attributes().iter().map(|a| a.key.as_str()).collect();
	assert_eq!(keys, ["b", "a", "b"]);
	assert_eq!(tag.get("b"), Some("2"));
	assert_eq!(tag.get("c"), None);

	Ok(())
}

#[rstest]
#[case::empty("", 100, vec![])]
#[case::single_line("hello world", 100, vec!["# hello world"])]
#[case::blank_lines_dropped("a\n\n   \n  b  ", 100, vec!["# a", "# b"])]
#[case::explicit_breaks("first line\nsecond line", 100, vec!["# first line", "# second line"])]
#[case::greedy("The name of the post\ntemplate", 14, vec!["# The name of", "# the post", "# template"])]
#[case::hard_cut("abcdefghij", 6, vec!["# abcd", "# efgh", "# ij"])]
#[case::hard_cut_between_words("hi abcdefghij yo", 6, vec!["# hi", "# abcd", "# efgh", "# ij", "# yo"])]
#[case::tiny_width("abc", 0, vec!["# a", "# b", "# c"])]
fn comment_formatting(#[case] doc: &str, #[case] width: usize, #[case] expected: Vec<&str>) {
	assert_eq!(format_comment(doc, width), expected);
}

#[test]
fn long_doc_wraps_without_losing_words() {
	let doc = "configuration ".repeat(18);
	let doc = doc.trim_end();
	assert_eq!(doc.len(), 251);

	let lines = format_comment(doc, DEFAULT_WRAP_WIDTH);
	assert!(lines.len() >= 3, "expected at least 3 lines, got {lines:?}");
	for line in &lines {
		assert!(line.starts_with("# "));
		assert!(line.chars().count() <= 100, "line too long: {line}");
	}

	let words: Vec<&str> = lines
		.iter()
		.flat_map(|line| line.trim_start_matches("# ").split(' '))
		.collect();
	let expected: Vec<&str> = doc.split(' ').collect();
	assert_eq!(words, expected);

	assert_eq!(format_comment(doc, 100), lines);
}

#[test]
fn zero_value_uses_declared_defaults() -> YamlDocResult<()> {
	let output = to_string(&Person::default())?;
	assert_eq!(
		output,
		"name: \"John Doe\" # [string, default=\"John Doe\"]\n\nage: 30 # [integer, \
		 default=30]\n\ntags: []\n"
	);

	Ok(())
}

#[test]
fn live_values_win_over_defaults() -> AnyEmptyResult {
	let person = Person {
		name: "Ada".into(),
		age: 36,
		tags: vec!["math".into(), "engines".into()],
	};
	let output = to_string(&person)?;
	assert_eq!(
		output,
		"name: \"Ada\" # [string, default=\"John Doe\"]\n\nage: 36 # [integer, \
		 default=30]\n\ntags:\n  - \"math\"\n  - \"engines\"\n"
	);

	let parsed: Person = serde_yaml_ng::from_str(&output)?;
	assert_eq!(parsed, person);

	Ok(())
}

#[test]
fn nested_record_has_head_comment() -> YamlDocResult<()> {
	let output = to_string(&customer())?;
	insta::assert_snapshot!(output, @r#"
	name: "Acme" # [string]

	# Physical address
	address:
	  # Street and number
	  street: "1 Main St" # [string]

	  city: "" # [string]

	  zip: "00000" # [string, default="00000"]
	"#);

	Ok(())
}

#[test]
fn rendered_document_loads_back() -> AnyEmptyResult {
	let output = to_string(&customer())?;
	let parsed: Customer = serde_yaml_ng::from_str(&output)?;
	let mut expected = customer();
	expected.address.zip = "00000".into();
	assert_eq!(parsed, expected);

	let output = to_string(&team())?;
	let parsed: Team = serde_yaml_ng::from_str(&output)?;
	assert_eq!(parsed, team());

	Ok(())
}

#[test]
fn long_doc_text_renders_as_wrapped_head_comment() -> YamlDocResult<()> {
	struct Long {
		value: String,
	}

	impl Record for Long {
		fn shape() -> &'static Shape {
			shape_of::<Self>(|| {
				let doc = "word ".repeat(50);
				Shape::builder("Long")
					.field(
						FieldDescriptor::new("value", <String as Annotated>::type_info())
							.doc(doc.trim_end()),
					)
					.build()
			})
		}
	}

	impl Annotated for Long {
		fn type_info() -> TypeInfo {
			TypeInfo::record::<Self>()
		}

		fn to_value(&self) -> Value {
			let mut record = RecordValue::new(Self::shape());
			record.push(self.value.to_value());
			Value::Record(record)
		}
	}

	let output = to_string(&Long {
		value: "x".into(),
	})?;
	let comments: Vec<&str> = output.lines().filter(|line| line.starts_with('#')).collect();
	assert_eq!(comments.len(), 3);
	assert!(comments.iter().all(|line| line.len() <= 100));
	assert!(output.ends_with("value: \"x\" # [string]\n"));

	Ok(())
}

#[test]
fn malformed_annotation_degrades() -> YamlDocResult<()> {
	let shape = Malformed::shape();
	let broken = &shape.fields()[0];
	assert_eq!(broken.doc_text(), "");
	assert_eq!(broken.default_literal(), "");
	assert_eq!(
		shape.diagnostics(),
		[ShapeDiagnostic::MalformedAnnotation {
			field: "broken".into(),
			error: AnnotationError::UnterminatedQuote { offset: 8 },
		}]
	);

	let output = to_string(&Malformed::default())?;
	assert_eq!(output, "broken: \"\" # [string]\n\nok: false # [boolean]\n");

	Ok(())
}

#[test]
fn strict_mode_rejects_malformed_annotation() {
	let options = RenderOptions::default().with_strict_annotations(true);
	match to_string_with(&Malformed::default(), &options) {
		Err(YamlDocError::MalformedAnnotation { field, reason }) => {
			assert_eq!(field, "broken");
			assert!(reason.contains("unterminated"), "{reason}");
		}
		other => panic!("expected a malformed annotation error, got {other:?}"),
	}
}

#[tracing_test::traced_test]
#[test]
fn malformed_annotation_is_logged() {
	#[derive(Annotated)]
	struct LoggedOnce {
		#[yamldoc(tag = "comment")]
		field: String,
	}

	let shape = LoggedOnce::shape();
	assert_eq!(shape.diagnostics().len(), 1);
	assert!(logs_contain("ignoring malformed annotation"));
}

#[test]
fn ignored_fields_are_never_rendered() -> YamlDocResult<()> {
	let value = WithSecret {
		user: "admin".into(),
		password: "hunter2".into(),
	};
	let output = to_string(&value)?;
	assert_eq!(output, "user: \"admin\" # [string]\n");
	assert!(!output.contains("password"));
	assert!(!output.contains("hunter2"));

	Ok(())
}

#[test]
fn inline_fields_are_spliced_in_place() -> YamlDocResult<()> {
	let service = Service {
		name: "api".into(),
		metadata: Metadata {
			owner: "ops".into(),
			revision: 0,
		},
		port: 8080,
	};

	let names: Vec<_> = Service::shape()
		.visible_fields()
		.map(FieldDescriptor::wire_name)
		.collect();
	assert_eq!(names, ["name", "owner", "revision", "port"]);

	let output = to_string(&service)?;
	assert_eq!(
		output,
		"name: \"api\" # [string]\n\nowner: \"ops\" # [string]\n\nrevision: 1 # [integer, \
		 default=1]\n\nport: 8080 # [integer]\n"
	);
	assert!(!output.contains("metadata"));

	Ok(())
}

#[test]
fn dynamic_mappings_have_a_stable_order() -> YamlDocResult<()> {
	let mut hashed = HashMap::new();
	hashed.insert("b".to_string(), "2".to_string());
	hashed.insert("c".to_string(), "3".to_string());
	hashed.insert("a".to_string(), "1".to_string());

	let mut ordered = indexmap::IndexMap::new();
	ordered.insert("z".to_string(), 1);
	ordered.insert("a".to_string(), 2);

	let output = to_string(&Labels { hashed, ordered })?;
	assert_eq!(
		output,
		"hashed:\n  a: \"1\"\n\n  b: \"2\"\n\n  c: \"3\"\n\nordered:\n  z: 1\n\n  a: 2\n"
	);

	Ok(())
}

#[test]
fn map_keys_are_quoted_when_ambiguous() -> YamlDocResult<()> {
	let mut map = BTreeMap::new();
	map.insert("plain".to_string(), 1);
	map.insert("two words".to_string(), 2);
	map.insert("true".to_string(), 3);

	let output = to_string(&map)?;
	assert_eq!(output, "plain: 1\n\n\"true\": 3\n\n\"two words\": 2\n");

	let mut numbers = BTreeMap::new();
	numbers.insert(2_u8, "b");
	numbers.insert(1_u8, "a");
	assert_eq!(to_string(&numbers)?, "1: \"a\"\n\n2: \"b\"\n");

	Ok(())
}

#[rstest]
#[case::field(
	to_document(&Hooks { name: "x".into(), on_load: noop }, &RenderOptions::default()),
	"on_load",
	"function"
)]
#[case::sequence_item(
	to_document(&HookList { hooks: vec![noop as fn(), noop] }, &RenderOptions::default()),
	"hooks[0]",
	"function"
)]
#[case::nested(
	to_document(&NestedHooks { inner: Hooks { name: "x".into(), on_load: noop } }, &RenderOptions::default()),
	"inner.on_load",
	"function"
)]
fn opaque_values_abort_the_render(
	#[case] result: YamlDocResult<Node>,
	#[case] expected_path: &str,
	#[case] expected_kind: &str,
) {
	match result {
		Err(YamlDocError::UnsupportedValue { path, kind }) => {
			assert_eq!(path, expected_path);
			assert_eq!(kind, expected_kind);
		}
		other => panic!("expected an unsupported value error, got {other:?}"),
	}
}

#[test]
fn channels_are_unsupported() {
	let (sender, _receiver) = std::sync::mpsc::channel::<u8>();
	match to_string(&vec![sender]) {
		Err(YamlDocError::UnsupportedValue { path, kind }) => {
			assert_eq!(path, "[0]");
			assert_eq!(kind, "channel");
		}
		other => panic!("expected an unsupported value error, got {other:?}"),
	}
}

#[test]
fn composite_map_keys_are_unsupported() {
	let mut map = BTreeMap::new();
	map.insert(vec![1_u8], "one");
	match to_string(&map) {
		Err(YamlDocError::UnsupportedValue { path, kind }) => {
			assert_eq!(path, "<root>");
			assert_eq!(kind, "sequence key");
		}
		other => panic!("expected an unsupported value error, got {other:?}"),
	}
}

#[test]
fn absent_optionals() -> AnyEmptyResult {
	let output = to_string(&Optionals::default())?;
	assert_eq!(
		output,
		"nickname: null # [string]\n\nport: 8080 # [integer, default=8080]\n\naddress: \
		 null\n\naliases: []\n"
	);

	let parsed: Optionals = serde_yaml_ng::from_str(&output)?;
	assert_eq!(
		parsed,
		Optionals {
			nickname: None,
			port: Some(8080),
			address: None,
			aliases: Some(vec![]),
		}
	);

	Ok(())
}

#[test]
fn absent_self_referencing_record_is_null() -> AnyEmptyResult {
	let tree = Tree {
		name: "root".into(),
		child: Some(Box::new(Tree {
			name: "leaf".into(),
			child: None,
		})),
	};
	let output = to_string(&tree)?;
	insta::assert_snapshot!(output, @r#"
	name: "root" # [string]

	# Nested subtree
	child:
	  name: "leaf" # [string]

	  # Nested subtree
	  child: null
	"#);

	let parsed: Tree = serde_yaml_ng::from_str(&output)?;
	assert_eq!(parsed, tree);

	Ok(())
}

#[test]
fn present_optionals_render_their_value() -> YamlDocResult<()> {
	let value = Optionals {
		nickname: Some("ace".into()),
		port: Some(0),
		..Optionals::default()
	};
	let document = to_document(&value, &RenderOptions::default())?;

	let nickname = document.get("nickname").and_then(Node::as_scalar);
	assert_eq!(nickname.map(|s| s.literal.as_str()), Some("\"ace\""));

	// Zero live values still fall back to the default.
	let port = document.get("port").and_then(Node::as_scalar);
	assert_eq!(port.map(|s| s.literal.as_str()), Some("8080"));

	assert_eq!(document.get("address"), Some(&Node::null()));
	assert_eq!(
		document.get("aliases").map(Node::is_empty_composite),
		Some(true)
	);
	assert!(!document.is_empty_composite());

	Ok(())
}

#[test]
fn scalars_floats_and_enums() -> YamlDocResult<()> {
	let zero = to_string(&Tuning::default())?;
	assert_eq!(
		zero,
		"ratio: 0 # [float]\n\nlevel: \"info\" # [string]\n\nlimit: 0 # [float]\n"
	);

	let value = Tuning {
		ratio: 1.0,
		level: Level::Warning,
		limit: f64::NEG_INFINITY,
	};
	assert_eq!(
		to_string(&value)?,
		"ratio: 1.0 # [float]\n\nlevel: \"warn\" # [string]\n\nlimit: -.inf # [float]\n"
	);

	Ok(())
}

#[tracing_test::traced_test]
#[test]
fn duplicate_keys_keep_the_first_field() -> YamlDocResult<()> {
	let value = Duplicate {
		first: "first".into(),
		name: "second".into(),
	};
	let output = to_string(&value)?;
	assert_eq!(output, "name: \"first\" # [string]\n");
	assert!(logs_contain("dropping field with a duplicate key"));

	assert!(matches!(
		Duplicate::shape().diagnostics(),
		[ShapeDiagnostic::DuplicateWireName { field, wire_name }] if field == "name" && wire_name == "name"
	));

	let strict = RenderOptions::default().with_strict_annotations(true);
	assert!(to_string_with(&value, &strict).is_err());

	Ok(())
}

#[test]
fn doc_text_falls_back_to_rustdoc() -> YamlDocResult<()> {
	let output = to_string(&Documented::default())?;
	assert_eq!(
		output,
		"# The port to listen on.\nport: 0 # [integer]\n\n# Host name\nhost: \"\" # [string]\n"
	);

	Ok(())
}

#[test]
fn sequences_of_records_and_sequences() -> YamlDocResult<()> {
	let output = to_string(&team())?;
	insta::assert_snapshot!(output, @r#"
	members:
	  - # Member name
	    name: "ada" # [string]
	    role: "lead" # [string]
	  - # Member name
	    name: "bob" # [string]
	    role: "" # [string]

	grid:
	  - - 1
	    - 2
	  - []
	"#);

	Ok(())
}

#[test]
fn serde_attributes_are_honoured() -> AnyEmptyResult {
	let value = Renamed {
		api_key: "secret".into(),
		api_version: 2,
		cache: vec!["ignored".into()],
	};
	let output = to_string(&value)?;
	assert_eq!(output, "ApiKey: \"secret\" # [string]\n\nAPIVersion: 2 # [integer]\n");

	let parsed: Renamed = serde_yaml_ng::from_str(&output)?;
	assert_eq!(
		parsed,
		Renamed {
			cache: vec![],
			..value
		}
	);

	Ok(())
}

#[test]
fn invalid_defaults_are_diagnosed() -> YamlDocResult<()> {
	assert_eq!(
		BadDefault::shape().diagnostics(),
		[ShapeDiagnostic::InvalidDefault {
			field: "count".into(),
			literal: "abc".into(),
			expected: LogicalType::Integer,
		}]
	);
	assert_eq!(to_string(&BadDefault::default())?, "count: abc # [integer, default=abc]\n");

	Ok(())
}

#[test]
fn newtypes_and_generics() -> YamlDocResult<()> {
	let value = Wrapped {
		inner: vec![true, false],
		port: Port(443),
	};
	assert_eq!(
		to_string(&value)?,
		"inner:\n  - true\n  - false\n\nport: 443 # [integer]\n"
	);
	assert!(!std::ptr::eq(Wrapped::<bool>::shape(), Wrapped::<String>::shape()));

	Ok(())
}

#[test]
fn manual_shapes() -> YamlDocResult<()> {
	let value = Manual {
		title: String::new(),
		retries: 3,
	};
	assert_eq!(
		to_string(&value)?,
		"# Window title\ntitle: \"untitled\" # [string, default=\"untitled\"]\n\nmax-retries: 3 # \
		 [integer]\n"
	);
	assert!(std::ptr::eq(Manual::shape(), Manual::shape()));
	assert_eq!(
		Manual::shape().fields()[0].raw_annotation(),
		r#"comment:"Window title" default:"untitled""#
	);

	Ok(())
}

#[rstest]
#[case::sequence(to_string(&vec![1, 2]), "- 1\n- 2\n")]
#[case::empty_sequence(to_string(&Vec::<String>::new()), "[]\n")]
#[case::empty_mapping(to_string(&BTreeMap::<String, u8>::new()), "{}\n")]
#[case::string(to_string("hi \"there\""), "\"hi \\\"there\\\"\"\n")]
#[case::bytes(to_vec(&true).map(|bytes| String::from_utf8_lossy(&bytes).into_owned()), "true\n")]
#[case::option(to_string(&None::<u8>), "null\n")]
fn root_values(#[case] result: YamlDocResult<String>, #[case] expected: &str) -> YamlDocResult<()> {
	assert_eq!(result?, expected);

	Ok(())
}

#[test]
fn render_options_change_the_layout() -> YamlDocResult<()> {
	let options = RenderOptions {
		indent: 4,
		blank_lines: false,
		..RenderOptions::default()
	};
	let renderer = Renderer::new(options.clone());
	assert_eq!(renderer.options(), &options);
	let output = renderer.render(&customer())?;
	assert_eq!(
		output,
		"name: \"Acme\" # [string]\n# Physical address\naddress:\n    # Street and number\n    \
		 street: \"1 Main St\" # [string]\n    city: \"\" # [string]\n    zip: \"00000\" # [string, \
		 default=\"00000\"]\n"
	);

	let narrow = RenderOptions::default().with_wrap_width(12);
	let output = to_string_with(&customer(), &narrow)?;
	assert!(output.contains("# Physical\n# address\naddress:\n"), "{output}");
	assert!(output.contains("  # Street and\n  # number\n"), "{output}");

	Ok(())
}

#[rstest]
#[case::plain("hello", "\"hello\"")]
#[case::quotes(r#"he said "hi""#, r#""he said \"hi\"""#)]
#[case::backslash(r"C:\dir", r#""C:\\dir""#)]
#[case::newline("a\nb", r#""a\nb""#)]
#[case::tab("a\tb", r#""a\tb""#)]
#[case::control("\u{1}", r#""\x01""#)]
#[case::unicode("héllo", "\"héllo\"")]
fn string_quoting(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(quote_string(input), expected);
}

#[rstest]
#[case::plain("name", "name")]
#[case::pascal("ApiKey", "ApiKey")]
#[case::kebab("max-retries", "max-retries")]
#[case::dotted("a.b", "a.b")]
#[case::spaces("two words", "\"two words\"")]
#[case::number("123", "\"123\"")]
#[case::boolean("True", "\"True\"")]
#[case::null("null", "\"null\"")]
#[case::empty("", "\"\"")]
#[case::leading_dash("-x", "\"-x\"")]
fn key_quoting(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(format_key(input), expected);
}

#[rstest]
#[case::whole(1.0, "1.0")]
#[case::fraction(0.5, "0.5")]
#[case::negative(-2.0, "-2.0")]
#[case::nan(f64::NAN, ".nan")]
#[case::infinity(f64::INFINITY, ".inf")]
#[case::negative_infinity(f64::NEG_INFINITY, "-.inf")]
fn float_literals(#[case] input: f64, #[case] expected: &str) {
	assert_eq!(format_float(input), expected);
}

#[test]
fn f32_values_use_their_shortest_form() {
	assert_eq!(0.1_f32.to_value(), Value::Float(0.1));
}

#[test]
fn defaulting_policy() {
	let plain = FieldDescriptor::new("flag", <bool as Annotated>::type_info());
	let optional = FieldDescriptor::new("flag", <Option<bool> as Annotated>::type_info());

	assert_eq!(defaults::resolve(&plain, &Value::Bool(false)), "false");
	assert_eq!(defaults::resolve(&plain, &Value::Bool(true)), "true");
	assert_eq!(defaults::resolve(&plain, &Value::Null), "false");
	assert_eq!(defaults::resolve(&optional, &Value::Null), "null");
	assert_eq!(defaults::resolve(&optional, &Value::Bool(false)), "false");
	assert_eq!(defaults::line_comment(&plain).as_deref(), Some("[boolean]"));

	let list = FieldDescriptor::new("list", <Vec<u8> as Annotated>::type_info());
	assert_eq!(defaults::line_comment(&list), None);
}

#[test]
fn options_load_from_root() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	assert_eq!(RenderOptions::load(tmp.path())?, None);

	std::fs::write(tmp.path().join(".yamldoc.toml"), "indent = 4\n")?;
	let options = RenderOptions::load(tmp.path())?.unwrap_or_default();
	assert_eq!(options.indent, 4);
	assert_eq!(options.wrap_width, 100);

	std::fs::write(
		tmp.path().join("yamldoc.toml"),
		"wrap_width = 80\nstrict_annotations = true\n",
	)?;
	let options = RenderOptions::load(tmp.path())?.unwrap_or_default();
	assert_eq!(
		options,
		RenderOptions {
			wrap_width: 80,
			strict_annotations: true,
			..RenderOptions::default()
		}
	);

	std::fs::write(tmp.path().join("yamldoc.toml"), "wrap_width = \"wide\"\n")?;
	assert!(matches!(
		RenderOptions::load(tmp.path()),
		Err(YamlDocError::OptionsParse(_))
	));

	Ok(())
}
