//! Derive macro for the `Selectable` trait.
//!
//! Generates static field metadata and typed field accessors from a struct's
//! definition, honoring serde's renaming and skipping rules so that masks use
//! the same names as the wire format.
//!
//! # Usage
//!
//! ```ignore
//! use fieldmask::Selectable;
//!
//! #[derive(Serialize, Deserialize, Selectable)]
//! #[serde(rename_all = "camelCase")]
//! pub struct FileList {
//!     pub etag: Option<String>,
//!     pub next_page_token: Option<String>,
//!     pub items: Vec<File>,
//!     #[serde(skip)]
//!     pub kind: String,
//! }
//! ```
//!
//! Generates `impl Selectable`, `impl Record`, `impl Nested` and a
//! `FileListFields` type whose `next_page_token()` returns
//! `FieldPath<FileList, Option<String>>` named `nextPageToken` on the wire.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::punctuated::Punctuated;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Expr, ExprLit, Fields,
    GenericParam, Lit, LitStr, Meta, Token,
};

/// Derive `Selectable`, `Record` and `Nested` for a struct with named fields.
///
/// Recognized attributes:
/// - `#[serde(rename_all = "...")]` on the struct
/// - `#[serde(rename = "...")]` on a field
/// - `#[serde(skip)]`, `#[serde(skip_serializing)]`, `#[serde(skip_deserializing)]`
///   on a field: the field never reaches the wire and cannot be selected
/// - `#[fieldmask(scalar)]` on a field: treat the value as a leaf even if its
///   type does not implement `Selectable`
#[proc_macro_derive(Selectable, attributes(fieldmask, serde))]
pub fn derive_selectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let vis = &input.vis;
    let type_name = name.to_string();
    let fields_name = format_ident!("{}Fields", name);

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Selectable can only be derived on structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Selectable can only be derived on structs",
            ))
        }
    };

    let rename_all = container_rename_rule(&input.attrs)?;

    let mut literals = Vec::new();
    let mut accessors = Vec::new();

    for field in fields {
        let ident = field.ident.as_ref().expect("named field should have ident");
        let ty = &field.ty;
        let field_vis = &field.vis;

        // Handle raw identifiers (r#type → type).
        let rust_name = ident.to_string();
        let member_name = rust_name.strip_prefix("r#").unwrap_or(&rust_name).to_string();

        let serde = field_serde_options(&field.attrs)?;
        let scalar = has_fieldmask_flag(&field.attrs, "scalar")?;

        let serialized_name = if serde.skip {
            quote!(::core::option::Option::None)
        } else {
            let wire = match serde.rename {
                Some(rename) => rename,
                None => match &rename_all {
                    Some(rule) => rule.apply(&member_name),
                    None => member_name.clone(),
                },
            };
            quote!(::core::option::Option::Some(#wire))
        };

        let shape = if scalar {
            quote!(::fieldmask::Shape::scalar)
        } else {
            quote!(<#ty as ::fieldmask::Selectable>::shape)
        };

        let literal = quote! {
            ::fieldmask::Field {
                name: #member_name,
                serialized_name: #serialized_name,
                declaring_type: #type_name,
                shape: #shape,
            }
        };

        let doc = format!("Path to `{}::{}`.", type_name, member_name);
        let (_, ty_generics, _) = input.generics.split_for_impl();
        accessors.push(quote! {
            #[doc = #doc]
            #field_vis fn #ident(&self) -> ::fieldmask::FieldPath<#name #ty_generics, #ty> {
                ::fieldmask::FieldPath::member(#literal)
            }
        });
        literals.push(literal);
    }

    // Every type parameter must itself be selectable for the field shapes to resolve.
    let mut bounded = input.generics.clone();
    for param in bounded.params.iter_mut() {
        if let GenericParam::Type(type_param) = param {
            type_param.bounds.push(parse_quote!(::fieldmask::Selectable));
        }
    }
    let (impl_generics, ty_generics, where_clause) = bounded.split_for_impl();

    // The companion type keeps the original declaration so its phantom stays well-formed.
    let declared = &input.generics;
    let (plain_impl, _, plain_where) = declared.split_for_impl();

    let fields_doc = format!("Typed field accessors for [`{}`].", type_name);

    Ok(quote! {
        #[doc = #fields_doc]
        #vis struct #fields_name #declared (::core::marker::PhantomData<fn() -> #name #ty_generics>) #plain_where;

        impl #plain_impl ::core::clone::Clone for #fields_name #ty_generics #plain_where {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl #plain_impl ::core::marker::Copy for #fields_name #ty_generics #plain_where {}

        impl #plain_impl ::core::fmt::Debug for #fields_name #ty_generics #plain_where {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(::core::stringify!(#fields_name))
            }
        }

        impl #impl_generics #fields_name #ty_generics #where_clause {
            #(#accessors)*
        }

        impl #impl_generics ::fieldmask::Selectable for #name #ty_generics #where_clause {
            fn shape() -> ::fieldmask::Shape {
                ::fieldmask::Shape::Object(<Self as ::fieldmask::Record>::schema)
            }
        }

        impl #impl_generics ::fieldmask::Record for #name #ty_generics #where_clause {
            type Fields = #fields_name #ty_generics;

            fn schema() -> ::fieldmask::Schema {
                ::fieldmask::Schema {
                    name: #type_name,
                    type_name: ::core::any::type_name::<Self>(),
                    fields: ::std::vec![#(#literals),*],
                }
            }

            fn fields() -> Self::Fields {
                #fields_name(::core::marker::PhantomData)
            }
        }

        impl #impl_generics ::fieldmask::Nested for #name #ty_generics #where_clause {
            type Target = Self;
        }
    })
}

/// serde's `rename_all` rules as applied to struct fields.
enum RenameRule {
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
    fn parse(lit: &LitStr) -> syn::Result<Self> {
        Ok(match lit.value().as_str() {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            other => {
                return Err(syn::Error::new(
                    lit.span(),
                    format!("unknown rename rule `{}`", other),
                ))
            }
        })
    }

    /// Same output as serde's own field renaming, which assumes snake_case
    /// input and leaves the casing of everything but word starts alone
    /// (`myURL` stays `myURL` under camelCase).
    fn apply(&self, field: &str) -> String {
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
            Self::Camel => {
                let pascal = Self::Pascal.apply(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

#[derive(Default)]
struct SerdeOptions {
    rename: Option<String>,
    skip: bool,
}

fn serde_metas(attrs: &[Attribute]) -> syn::Result<Vec<Meta>> {
    let mut metas = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let nested = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        metas.extend(nested);
    }
    Ok(metas)
}

/// `name = "x"` or `name(serialize = "x", ...)`: the serialize-side string.
fn serialize_side(meta: &Meta) -> syn::Result<Option<LitStr>> {
    match meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Ok(Some(s.clone())),
            other => Err(syn::Error::new_spanned(other, "expected a string literal")),
        },
        Meta::List(list) => {
            let inner = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
            for meta in inner {
                if meta.path().is_ident("serialize") {
                    return serialize_side(&meta);
                }
            }
            Ok(None)
        }
        Meta::Path(path) => Err(syn::Error::new_spanned(path, "expected a value")),
    }
}

fn container_rename_rule(attrs: &[Attribute]) -> syn::Result<Option<RenameRule>> {
    for meta in serde_metas(attrs)? {
        if meta.path().is_ident("rename_all") {
            return match serialize_side(&meta)? {
                Some(lit) => RenameRule::parse(&lit).map(Some),
                None => Ok(None),
            };
        }
    }
    Ok(None)
}

fn field_serde_options(attrs: &[Attribute]) -> syn::Result<SerdeOptions> {
    let mut options = SerdeOptions::default();
    for meta in serde_metas(attrs)? {
        let path = meta.path();
        if path.is_ident("rename") {
            options.rename = serialize_side(&meta)?.map(|lit| lit.value());
        } else if path.is_ident("skip")
            || path.is_ident("skip_serializing")
            || path.is_ident("skip_deserializing")
        {
            options.skip = true;
        } else if path.is_ident("flatten") {
            return Err(syn::Error::new_spanned(
                path,
                "Selectable does not support #[serde(flatten)]",
            ));
        }
    }
    Ok(options)
}

fn has_fieldmask_flag(attrs: &[Attribute], flag: &str) -> syn::Result<bool> {
    let mut found = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("fieldmask")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(flag) {
                found = true;
                Ok(())
            } else {
                Err(meta.error("unknown fieldmask attribute"))
            }
        })?;
    }
    Ok(found)
}
