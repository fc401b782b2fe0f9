use syn::Attribute;
use syn::Expr;
use syn::ExprLit;
use syn::Lit;
use syn::LitStr;
use syn::Meta;
use syn::Token;
use syn::meta::ParseNestedMeta;

use crate::case::RenameRule;

/// `#[yamldoc(...)]` on a struct or enum, with `#[serde(rename_all)]` as a
/// fallback.
#[derive(Debug, Default)]
pub(crate) struct ContainerAttrs {
	pub rename_all: Option<RenameRule>,
}

/// `#[yamldoc(...)]` on a field or variant. Where it makes sense the matching
/// serde attribute is honoured too, so a type that derives both renders the
/// same keys it deserializes.
#[derive(Debug, Default)]
pub(crate) struct FieldAttrs {
	pub rename: Option<String>,
	pub tag: Option<String>,
	pub skip: bool,
	pub inline: bool,
	/// Rustdoc text, one entry per `///` line.
	pub doc: String,
}

pub(crate) fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
	let mut own = None;
	let mut serde = None;

	for attr in attrs {
		if attr.path().is_ident("yamldoc") {
			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("rename_all") {
					own = Some(parse_rename_rule(&meta)?);
					return Ok(());
				}

				Err(meta.error("unsupported yamldoc attribute, expected `rename_all`"))
			})?;
		} else if attr.path().is_ident("serde") {
			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("rename_all") && meta.input.peek(Token![=]) {
					serde = Some(parse_rename_rule(&meta)?);
					return Ok(());
				}

				skip_meta(&meta)
			})?;
		}
	}

	Ok(ContainerAttrs {
		rename_all: own.or(serde),
	})
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
	let mut own = FieldAttrs::default();
	let mut serde = FieldAttrs::default();
	let mut doc_lines = vec![];

	for attr in attrs {
		if attr.path().is_ident("doc") {
			if let Some(line) = doc_line(attr) {
				doc_lines.push(line);
			}
		} else if attr.path().is_ident("yamldoc") {
			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("rename") {
					own.rename = Some(meta.value()?.parse::<LitStr>()?.value());
				} else if meta.path.is_ident("tag") {
					own.tag = Some(meta.value()?.parse::<LitStr>()?.value());
				} else if meta.path.is_ident("skip") {
					own.skip = true;
				} else if meta.path.is_ident("inline") {
					own.inline = true;
				} else {
					return Err(meta.error(
						"unsupported yamldoc attribute, expected one of `rename`, `tag`, `skip`, \
						 `inline`",
					));
				}

				Ok(())
			})?;
		} else if attr.path().is_ident("serde") {
			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
					serde.rename = Some(meta.value()?.parse::<LitStr>()?.value());
				} else if meta.path.is_ident("skip") {
					serde.skip = true;
				} else if meta.path.is_ident("flatten") {
					serde.inline = true;
				} else {
					return skip_meta(&meta);
				}

				Ok(())
			})?;
		}
	}

	Ok(FieldAttrs {
		rename: own.rename.or(serde.rename),
		tag: own.tag,
		skip: own.skip || serde.skip,
		inline: own.inline || serde.inline,
		doc: doc_lines.join("\n").trim().to_string(),
	})
}

fn parse_rename_rule(meta: &ParseNestedMeta<'_>) -> syn::Result<RenameRule> {
	let name: LitStr = meta.value()?.parse()?;
	RenameRule::from_name(&name.value()).ok_or_else(|| {
		syn::Error::new(
			name.span(),
			format!(
				"unknown rename rule `{}`, expected one of {}",
				name.value(),
				RenameRule::NAMES.join(", ")
			),
		)
	})
}

/// Consume an attribute this crate does not interpret, e.g. `default = "x"`
/// or `rename(serialize = "a")`.
fn skip_meta(meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
	if meta.input.peek(Token![=]) {
		meta.value()?.parse::<Expr>()?;
	} else if meta.input.peek(syn::token::Paren) {
		meta.parse_nested_meta(|nested| skip_meta(&nested))?;
	}

	Ok(())
}

fn doc_line(attr: &Attribute) -> Option<String> {
	let Meta::NameValue(name_value) = &attr.meta else {
		return None;
	};

	let Expr::Lit(ExprLit {
		lit: Lit::Str(text), ..
	}) = &name_value.value
	else {
		return None;
	};

	let line = text.value();
	Some(line.strip_prefix(' ').unwrap_or(&line).trim_end().to_string())
}
