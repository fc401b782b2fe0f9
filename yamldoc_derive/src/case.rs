/// Case conventions accepted by `rename_all`, using serde's spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenameRule {
	Lower,
	Upper,
	Pascal,
	Camel,
	Snake,
	ScreamingSnake,
	Kebab,
	ScreamingKebab,
}

impl RenameRule {
	pub(crate) const NAMES: [&'static str; 8] = [
		"lowercase",
		"UPPERCASE",
		"PascalCase",
		"camelCase",
		"snake_case",
		"SCREAMING_SNAKE_CASE",
		"kebab-case",
		"SCREAMING-KEBAB-CASE",
	];

	pub(crate) fn from_name(name: &str) -> Option<Self> {
		let rule = match name {
			"lowercase" => Self::Lower,
			"UPPERCASE" => Self::Upper,
			"PascalCase" => Self::Pascal,
			"camelCase" => Self::Camel,
			"snake_case" => Self::Snake,
			"SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
			"kebab-case" => Self::Kebab,
			"SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
			_ => return None,
		};

		Some(rule)
	}

	/// Rename a `snake_case` field name.
	pub(crate) fn apply_to_field(self, field: &str) -> String {
		match self {
			Self::Lower | Self::Snake => field.to_string(),
			Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
			Self::Pascal => {
				let mut pascal = String::with_capacity(field.len());
				let mut capitalize = true;
				for ch in field.chars() {
					if ch == '_' {
						capitalize = true;
					} else if capitalize {
						pascal.push(ch.to_ascii_uppercase());
						capitalize = false;
					} else {
						pascal.push(ch);
					}
				}
				pascal
			}
			Self::Camel => lower_first(&Self::Pascal.apply_to_field(field)),
			Self::Kebab => field.replace('_', "-"),
			Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
		}
	}

	/// Rename a `PascalCase` variant name.
	pub(crate) fn apply_to_variant(self, variant: &str) -> String {
		match self {
			Self::Pascal => variant.to_string(),
			Self::Lower => variant.to_ascii_lowercase(),
			Self::Upper => variant.to_ascii_uppercase(),
			Self::Camel => lower_first(variant),
			Self::Snake => {
				let mut snake = String::with_capacity(variant.len() + 4);
				for (index, ch) in variant.char_indices() {
					if index > 0 && ch.is_uppercase() {
						snake.push('_');
					}
					snake.push(ch.to_ascii_lowercase());
				}
				snake
			}
			Self::ScreamingSnake => Self::Snake.apply_to_variant(variant).to_ascii_uppercase(),
			Self::Kebab => Self::Snake.apply_to_variant(variant).replace('_', "-"),
			Self::ScreamingKebab => Self::ScreamingSnake.apply_to_variant(variant).replace('_', "-"),
		}
	}
}

fn lower_first(name: &str) -> String {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) => first.to_lowercase().chain(chars).collect(),
		None => String::new(),
	}
}
