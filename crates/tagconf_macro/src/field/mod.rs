//! Per-field code generation.
//!
//! Every named field of the derived struct becomes a [`FieldGenerator`]:
//!
//! | `#[config(...)]` | Generator | Visitor call |
//! |------------------|-----------|--------------|
//! | value options | [`ValueField`] | `visit_value` |
//! | `nested` | [`NestedField`] | `visit_nested` / `visit_optional` / `visit_element` |
//! | none | [`PlainField`] | none |
//!
//! Fields with a `#[config(...)]` attribute own one slot in the descriptor
//! table; the generated `visit_fields` refers to it by index.

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Field, GenericArgument, Ident, PathArguments, Result as SynResult, Type};

use crate::parse::{FieldConfig, Parser};

mod nested;
mod value;

pub use nested::{NestedField, NestedKind};
pub use value::ValueField;

// ============================================================================
// FieldGenerator Trait
// ============================================================================

/// Code generation strategy of one field.
pub trait FieldGenerator {
    /// The field identifier.
    fn name(&self) -> &Ident;

    /// The `FieldTags` constructor expression, for fields in the table.
    fn tags(&self) -> Option<QuoteStream>;

    /// The `visit_fields` statement for the field, given the static table
    /// and the field's index in it.
    fn generate_visit(&self, table: &Ident, index: usize) -> QuoteStream;

    /// Masked in `Debug`.
    fn is_secret(&self) -> bool {
        false
    }

    /// The field's type carries its own redacting `Debug`.
    fn is_secrecy_type(&self) -> bool {
        false
    }
}

/// Name recorded in the table: the identifier without any `r#` prefix.
fn field_name(name: &Ident) -> String {
    name.unraw().to_string()
}

// ============================================================================
// PlainField
// ============================================================================

/// A field without `#[config(...)]`: absent from the table, never visited.
pub struct PlainField {
    pub name: Ident,
    pub ty: Type,
}

impl FieldGenerator for PlainField {
    fn name(&self) -> &Ident {
        &self.name
    }

    fn tags(&self) -> Option<QuoteStream> {
        None
    }

    fn generate_visit(&self, _table: &Ident, _index: usize) -> QuoteStream {
        quote! {}
    }

    fn is_secrecy_type(&self) -> bool {
        FieldFactory::is_secrecy_type(&self.ty)
    }
}

// ============================================================================
// FieldFactory
// ============================================================================

/// Builds the generator of a field from its attribute and type.
pub struct FieldFactory;

impl FieldFactory {
    pub fn parse_field(field: &Field) -> SynResult<Box<dyn FieldGenerator>> {
        let Some(name) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let ty = field.ty.clone();

        match Parser::parse_field_config(field)? {
            None => Ok(Box::new(PlainField { name, ty })),

            Some(FieldConfig::Value(attr)) => Ok(Box::new(ValueField { name, ty, attr })),

            Some(FieldConfig::Nested { ignored }) => {
                let kind = if Self::extract_wrapper_inner(&ty, "Option").is_some() {
                    NestedKind::Optional
                } else if Self::extract_wrapper_inner(&ty, "Vec").is_some() {
                    NestedKind::Sequence
                } else {
                    NestedKind::Direct
                };

                Ok(Box::new(NestedField {
                    name,
                    kind,
                    ignored,
                }))
            }
        }
    }

    /// `SecretString` and `SecretBox<T>` already redact in `Debug`.
    pub fn is_secrecy_type(ty: &Type) -> bool {
        let Type::Path(type_path) = ty else {
            return false;
        };

        type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "SecretString" || segment.ident == "SecretBox")
    }

    /// The `T` of `Wrapper<T>`, matching on the last path segment so that
    /// `std::option::Option<T>` is recognized as well as `Option<T>`.
    pub fn extract_wrapper_inner<'t>(ty: &'t Type, wrapper: &str) -> Option<&'t Type> {
        let Type::Path(type_path) = ty else {
            return None;
        };

        let segment = type_path.path.segments.last()?;
        if segment.ident != wrapper {
            return None;
        }

        let PathArguments::AngleBracketed(args) = &segment.arguments else {
            return None;
        };

        let GenericArgument::Type(inner) = args.args.first()? else {
            return None;
        };

        Some(inner)
    }
}
