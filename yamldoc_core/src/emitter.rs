use crate::Entry;
use crate::Node;
use crate::RenderOptions;
use crate::Scalar;

/// Flatten a document tree into YAML text.
///
/// The output always ends with exactly one newline.
pub fn emit(node: &Node, options: &RenderOptions) -> String {
	let emitter = Emitter {
		step: options.indent.max(1),
		blank_lines: options.blank_lines,
	};
	let mut lines = vec![];

	match node {
		Node::Scalar(scalar) => lines.push(scalar_text(scalar)),
		Node::Sequence(items) if items.is_empty() => lines.push("[]".to_string()),
		Node::Mapping(entries) if entries.is_empty() => lines.push("{}".to_string()),
		Node::Sequence(items) => emitter.sequence(items, 0, &mut lines),
		Node::Mapping(entries) => emitter.mapping(entries, 0, true, &mut lines),
	}

	let mut output = lines.join("\n");
	output.truncate(output.trim_end().len());
	output.push('\n');
	output
}

struct Emitter {
	step: usize,
	blank_lines: bool,
}

impl Emitter {
	fn mapping(&self, entries: &[Entry], indent: usize, spaced: bool, lines: &mut Vec<String>) {
		let pad = " ".repeat(indent);

		for (index, entry) in entries.iter().enumerate() {
			if index > 0 && spaced && self.blank_lines {
				lines.push(String::new());
			}

			for comment in &entry.key.head_comment {
				lines.push(format!("{pad}{comment}"));
			}

			let key = &entry.key.name;
			match &entry.value {
				Node::Scalar(scalar) => lines.push(format!("{pad}{key}: {}", scalar_text(scalar))),
				Node::Sequence(items) if items.is_empty() => lines.push(format!("{pad}{key}: []")),
				Node::Mapping(nested) if nested.is_empty() => lines.push(format!("{pad}{key}: {{}}")),
				Node::Sequence(items) => {
					lines.push(format!("{pad}{key}:"));
					self.sequence(items, indent + self.step, lines);
				}
				Node::Mapping(nested) => {
					lines.push(format!("{pad}{key}:"));
					self.mapping(nested, indent + self.step, true, lines);
				}
			}
		}
	}

	/// Items are written as `- ` blocks. A composite item's first line is
	/// pulled up after the dash and the rest is aligned beneath it.
	fn sequence(&self, items: &[Node], indent: usize, lines: &mut Vec<String>) {
		let pad = " ".repeat(indent);
		let inner = indent + self.step;

		for item in items {
			let mut nested = vec![];
			match item {
				Node::Scalar(scalar) => {
					lines.push(format!("{pad}- {}", scalar_text(scalar)));
					continue;
				}
				Node::Sequence(items) if items.is_empty() => {
					lines.push(format!("{pad}- []"));
					continue;
				}
				Node::Mapping(entries) if entries.is_empty() => {
					lines.push(format!("{pad}- {{}}"));
					continue;
				}
				Node::Sequence(items) => self.sequence(items, inner, &mut nested),
				Node::Mapping(entries) => self.mapping(entries, inner, false, &mut nested),
			}

			let mut nested = nested.into_iter();
			if let Some(first) = nested.next() {
				let dash = format!("{pad}-");
				let first = first.get(inner..).unwrap_or_default();
				lines.push(format!("{dash:<inner$}{first}"));
			}
			lines.extend(nested);
		}
	}
}

fn scalar_text(scalar: &Scalar) -> String {
	match &scalar.line_comment {
		Some(comment) => format!("{} # {comment}", scalar.literal),
		None => scalar.literal.clone(),
	}
}

/// Write a string as a double-quoted YAML scalar.
pub fn quote_string(value: &str) -> String {
	let mut quoted = String::with_capacity(value.len() + 2);
	quoted.push('"');

	for ch in value.chars() {
		match ch {
			'"' => quoted.push_str("\\\""),
			'\\' => quoted.push_str("\\\\"),
			'\n' => quoted.push_str("\\n"),
			'\r' => quoted.push_str("\\r"),
			'\t' => quoted.push_str("\\t"),
			'\0' => quoted.push_str("\\0"),
			ch if u32::from(ch) < 0x20 || ch == '\u{7f}' => {
				quoted.push_str(&format!("\\x{:02x}", u32::from(ch)));
			}
			ch => quoted.push(ch),
		}
	}

	quoted.push('"');
	quoted
}

/// Write a mapping key, plain when it cannot be mistaken for anything but a
/// string and double-quoted otherwise.
pub fn format_key(name: &str) -> String {
	if is_plain_key(name) {
		name.to_string()
	} else {
		quote_string(name)
	}
}

fn is_plain_key(name: &str) -> bool {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return false;
	};

	if !(first.is_ascii_alphabetic() || first == '_') {
		return false;
	}

	if !chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.')) {
		return false;
	}

	!matches!(
		name.to_ascii_lowercase().as_str(),
		"true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n" | "null"
	)
}

/// Write a float so that it reads back as a float: finite values always carry
/// a decimal point and non-finite ones use the YAML spellings.
pub fn format_float(value: f64) -> String {
	if value.is_nan() {
		return ".nan".to_string();
	}

	if value.is_infinite() {
		return if value > 0.0 { ".inf" } else { "-.inf" }.to_string();
	}

	let text = value.to_string();
	if text.contains(['.', 'e', 'E']) {
		text
	} else {
		format!("{text}.0")
	}
}
