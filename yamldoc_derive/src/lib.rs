//! `#[derive(Annotated)]` for `yamldoc_core`.
//!
//! Structs with named fields become records: the derive builds their field
//! shape once and captures field values in declaration order. Newtype structs
//! render as their inner value and enums with only unit variants render as
//! the variant name.
//!
//! Field attributes:
//!
//! - `#[yamldoc(rename = "Name")]` sets the key written for the field.
//! - `#[yamldoc(tag = r#"comment:"Doc text" default:"abc""#)]` is the raw
//!   annotation scanned for `comment`, `describe` and `default`.
//! - `#[yamldoc(skip)]` leaves the field out of the document.
//! - `#[yamldoc(inline)]` splices a record field's own fields into the parent.
//!
//! `#[yamldoc(rename_all = "PascalCase")]` on the container renames every
//! field or variant. The serde equivalents (`rename`, `rename_all`, `skip`
//! and `flatten`) are read as fallbacks. A field's `///` comment is used as
//! its doc text when the annotation has none.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::Data;
use syn::DataEnum;
use syn::DeriveInput;
use syn::Fields;
use syn::FieldsNamed;
use syn::Generics;
use syn::Index;
use syn::ext::IdentExt;
use syn::parse_macro_input;
use syn::parse_quote;

use crate::attr::ContainerAttrs;
use crate::attr::parse_container_attrs;
use crate::attr::parse_field_attrs;

mod attr;
mod case;

#[proc_macro_derive(Annotated, attributes(yamldoc))]
pub fn derive_annotated(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	expand(&input)
		.unwrap_or_else(syn::Error::into_compile_error)
		.into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
	if let Some(lifetime) = input.generics.lifetimes().next() {
		return Err(syn::Error::new_spanned(
			lifetime,
			"`Annotated` cannot be derived for types with lifetime parameters",
		));
	}

	let container = parse_container_attrs(&input.attrs)?;

	match &input.data {
		Data::Struct(data) => {
			match &data.fields {
				Fields::Named(fields) => expand_record(input, &container, fields),
				Fields::Unnamed(fields) if fields.unnamed.len() == 1 => expand_newtype(input),
				_ => {
					Err(syn::Error::new_spanned(
						&input.ident,
						"`Annotated` can only be derived for structs with named fields or newtype \
						 structs",
					))
				}
			}
		}
		Data::Enum(data) => expand_unit_enum(input, &container, data),
		Data::Union(_) => {
			Err(syn::Error::new_spanned(
				&input.ident,
				"`Annotated` cannot be derived for unions",
			))
		}
	}
}

/// Every type parameter must itself be annotated, and shapes are cached per
/// concrete type so parameters must be `'static`.
fn bounded_generics(generics: &Generics) -> Generics {
	let mut generics = generics.clone();
	for param in generics.type_params_mut() {
		param
			.bounds
			.push(parse_quote!(::yamldoc_core::Annotated));
		param.bounds.push(parse_quote!('static));
	}
	generics
}

fn expand_record(
	input: &DeriveInput,
	container: &ContainerAttrs,
	fields: &FieldsNamed,
) -> syn::Result<TokenStream2> {
	let ident = &input.ident;
	let type_name = ident.to_string();
	let generics = bounded_generics(&input.generics);
	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

	let mut descriptors = vec![];
	let mut captures = vec![];

	for field in &fields.named {
		let Some(member) = &field.ident else {
			continue;
		};
		let attrs = parse_field_attrs(&field.attrs)?;
		let declared = member.unraw().to_string();
		let ty = &field.ty;

		if attrs.skip {
			descriptors.push(quote! {
				::yamldoc_core::FieldDescriptor::skipped(#declared)
			});
			captures.push(quote! { record.push_skipped(); });
			continue;
		}

		let mut descriptor = quote! {
			::yamldoc_core::FieldDescriptor::new(
				#declared,
				<#ty as ::yamldoc_core::Annotated>::type_info(),
			)
		};

		let wire = attrs.rename.or_else(|| {
			container
				.rename_all
				.map(|rule| rule.apply_to_field(&declared))
		});
		if let Some(wire) = wire.filter(|wire| *wire != declared) {
			descriptor.extend(quote! { .rename(#wire) });
		}
		if let Some(tag) = &attrs.tag {
			descriptor.extend(quote! { .annotation(#tag) });
		}
		if !attrs.doc.is_empty() {
			let doc = &attrs.doc;
			descriptor.extend(quote! { .doc(#doc) });
		}

		if attrs.inline {
			descriptor.extend(quote! { .inline() });
			captures.push(quote! { record.splice(&self.#member); });
		} else {
			captures.push(quote! {
				record.push(::yamldoc_core::Annotated::to_value(&self.#member));
			});
		}

		descriptors.push(descriptor);
	}

	Ok(quote! {
		#[automatically_derived]
		impl #impl_generics ::yamldoc_core::Record for #ident #ty_generics #where_clause {
			fn shape() -> &'static ::yamldoc_core::Shape {
				::yamldoc_core::shape_of::<Self>(|| {
					::yamldoc_core::Shape::builder(#type_name)
						#(.field(#descriptors))*
						.build()
				})
			}
		}

		#[automatically_derived]
		impl #impl_generics ::yamldoc_core::Annotated for #ident #ty_generics #where_clause {
			fn type_info() -> ::yamldoc_core::TypeInfo {
				::yamldoc_core::TypeInfo::record::<Self>()
			}

			fn to_value(&self) -> ::yamldoc_core::Value {
				let mut record = ::yamldoc_core::RecordValue::new(
					<Self as ::yamldoc_core::Record>::shape(),
				);
				#(#captures)*
				::yamldoc_core::Value::Record(record)
			}
		}
	})
}

fn expand_newtype(input: &DeriveInput) -> syn::Result<TokenStream2> {
	let ident = &input.ident;
	let generics = bounded_generics(&input.generics);
	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
	let Data::Struct(data) = &input.data else {
		return Err(syn::Error::new_spanned(ident, "expected a newtype struct"));
	};
	let Some(inner) = data.fields.iter().next() else {
		return Err(syn::Error::new_spanned(ident, "expected a newtype struct"));
	};
	let ty = &inner.ty;
	let index = Index::from(0);

	Ok(quote! {
		#[automatically_derived]
		impl #impl_generics ::yamldoc_core::Annotated for #ident #ty_generics #where_clause {
			fn type_info() -> ::yamldoc_core::TypeInfo {
				<#ty as ::yamldoc_core::Annotated>::type_info()
			}

			fn to_value(&self) -> ::yamldoc_core::Value {
				::yamldoc_core::Annotated::to_value(&self.#index)
			}
		}
	})
}

fn expand_unit_enum(
	input: &DeriveInput,
	container: &ContainerAttrs,
	data: &DataEnum,
) -> syn::Result<TokenStream2> {
	let ident = &input.ident;
	let generics = bounded_generics(&input.generics);
	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
	let mut arms = vec![];

	for variant in &data.variants {
		if !matches!(variant.fields, Fields::Unit) {
			return Err(syn::Error::new_spanned(
				variant,
				"`Annotated` can only be derived for enums whose variants are all unit variants",
			));
		}

		let attrs = parse_field_attrs(&variant.attrs)?;
		let name = &variant.ident;
		let declared = name.unraw().to_string();
		let wire = attrs.rename.unwrap_or_else(|| {
			container
				.rename_all
				.map_or_else(|| declared.clone(), |rule| rule.apply_to_variant(&declared))
		});

		arms.push(quote! {
			Self::#name => ::yamldoc_core::Value::String(::std::string::String::from(#wire)),
		});
	}

	Ok(quote! {
		#[automatically_derived]
		impl #impl_generics ::yamldoc_core::Annotated for #ident #ty_generics #where_clause {
			fn type_info() -> ::yamldoc_core::TypeInfo {
				::yamldoc_core::TypeInfo::scalar(::yamldoc_core::LogicalType::String)
			}

			fn to_value(&self) -> ::yamldoc_core::Value {
				match *self {
					#(#arms)*
				}
			}
		}
	})
}
