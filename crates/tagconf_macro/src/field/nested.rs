//! Nested configurable structs.

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::Ident;

use super::{FieldGenerator, field_name};

/// How the nested struct is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NestedKind {
    /// `T` or `Box<T>`.
    Direct,

    /// `Option<T>` or `Option<Box<T>>`, allocated when absent.
    Optional,

    /// `Vec<T>` or `Vec<Box<T>>`, every element visited.
    Sequence,
}

/// A `#[config(nested)]` field.
pub struct NestedField {
    pub name: Ident,
    pub kind: NestedKind,
    pub ignored: bool,
}

impl FieldGenerator for NestedField {
    fn name(&self) -> &Ident {
        &self.name
    }

    fn tags(&self) -> Option<QuoteStream> {
        let name = field_name(&self.name);
        let ignored = self.ignored.then(|| quote! { .ignored() });

        Some(quote! {
            ::tagconf::FieldTags::new(#name).nested() #ignored
        })
    }

    fn generate_visit(&self, table: &Ident, index: usize) -> QuoteStream {
        if self.ignored {
            return quote! {};
        }

        let name = &self.name;
        match self.kind {
            NestedKind::Direct => quote! {
                visitor.visit_nested(&#table[#index], &mut self.#name)?;
            },

            NestedKind::Optional => quote! {
                visitor.visit_optional(&#table[#index], &mut self.#name)?;
            },

            NestedKind::Sequence => quote! {
                for (position, item) in self.#name.iter_mut().enumerate() {
                    visitor.visit_element(&#table[#index], position, item)?;
                }
            },
        }
    }
}
