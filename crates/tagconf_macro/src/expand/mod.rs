//! Code generation orchestration for the `Configure` derive.
//!
//! The [`Expander`] validates the input, turns each field into a
//! [`FieldGenerator`](crate::field::FieldGenerator) and assembles the
//! generated impls:
//!
//! | Item | Generator Function |
//! |------|-------------------|
//! | `impl Configure` | [`configure::generate_configure_impl`] |
//! | `impl Debug` | [`debug::generate_debug_impl`] |

use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Data, DeriveInput, Error as SynError, Field, Fields, Result as SynResult};

use crate::field::{FieldFactory, FieldGenerator};
use crate::parse::ConfigureAttr;

pub mod configure;
pub mod debug;

/// The main orchestrator for macro expansion.
pub struct Expander;

impl Expander {
    /// Main entry point for expanding the derive macro.
    pub fn expand(input: &DeriveInput) -> SynResult<TokenStream> {
        let struct_name = &input.ident;
        let generics = &input.generics;

        let configure_attr = ConfigureAttr::parse_from_struct(input)?;

        let fields = Self::extract_struct_fields(input)?;

        let generators: Vec<Box<dyn FieldGenerator>> = fields
            .iter()
            .map(FieldFactory::parse_field)
            .collect::<SynResult<Vec<_>>>()?;

        let configure_impl =
            configure::generate_configure_impl(struct_name, generics, &generators, &configure_attr);

        let debug_impl = debug::generate_debug_impl(struct_name, generics, &generators);

        let combined = quote! {
            #configure_impl
            #debug_impl
        };

        Ok(combined.into())
    }

    /// Extract named fields from the struct, rejecting invalid types.
    fn extract_struct_fields(input: &DeriveInput) -> SynResult<&Punctuated<Field, Comma>> {
        match &input.data {
            Data::Struct(data_struct) => match &data_struct.fields {
                Fields::Named(fields_named) => Ok(&fields_named.named),

                Fields::Unnamed(_) => Err(SynError::new_spanned(
                    input,
                    "Configure does not support tuple structs",
                )),

                Fields::Unit => Err(SynError::new_spanned(
                    input,
                    "Configure does not support unit structs",
                )),
            },

            Data::Enum(_) => Err(SynError::new_spanned(
                input,
                "Configure can only be derived for structs, not enums",
            )),

            Data::Union(_) => Err(SynError::new_spanned(
                input,
                "Configure can only be derived for structs, not unions",
            )),
        }
    }
}
