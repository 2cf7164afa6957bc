//! `impl Configure` code generation.
//!
//! # Generated Implementation
//!
//! ```rust,ignore
//! const _: () = {
//!     static FIELDS: [::tagconf::FieldTags; 2] = [
//!         ::tagconf::FieldTags::new("port").envconfig("PORT").with_default("8080"),
//!         ::tagconf::FieldTags::new("db").nested(),
//!     ];
//!
//!     impl ::tagconf::Configure for Config {
//!         fn fields() -> &'static [::tagconf::FieldTags] {
//!             &FIELDS
//!         }
//!
//!         fn visit_fields(&mut self, visitor: &mut dyn ::tagconf::FieldVisitor)
//!             -> Result<(), ::tagconf::Error>
//!         {
//!             visitor.visit_value(&FIELDS[0], &mut self.port)?;
//!             visitor.visit_nested(&FIELDS[1], &mut self.db)?;
//!             Ok(())
//!         }
//!
//!         // lifecycle() / initializer() only with #[configure(...)]
//!     }
//! };
//! ```
//!
//! The table lives in an unnamed const block so that several derives in
//! one module do not collide.

use proc_macro2::TokenStream as QuoteStream;
use quote::{format_ident, quote};
use syn::{Generics, Ident};

use crate::field::FieldGenerator;
use crate::parse::{ConfigureAttr, Hooks};

pub fn generate_configure_impl(
    struct_name: &Ident,
    generics: &Generics,
    fields: &[Box<dyn FieldGenerator>],
    attr: &ConfigureAttr,
) -> QuoteStream {
    let (impl_generics, type_generics, where_clause) = generics.split_for_impl();
    let table = format_ident!("FIELDS");

    let mut tags = Vec::new();
    let mut visits = Vec::new();

    for field in fields {
        let Some(tag) = field.tags() else {
            continue;
        };

        visits.push(field.generate_visit(&table, tags.len()));
        tags.push(tag);
    }

    let count = tags.len();

    let lifecycle = match attr.hooks {
        Hooks::Plain => quote! {},
        Hooks::Prepare => quote! {
            fn lifecycle(&mut self) -> ::tagconf::Lifecycle<'_> {
                ::tagconf::Lifecycle::Single(self)
            }
        },
        Hooks::PrepareWith => quote! {
            fn lifecycle(&mut self) -> ::tagconf::Lifecycle<'_> {
                ::tagconf::Lifecycle::TwoPhase(self)
            }
        },
    };

    let initializer = attr.init_with.then(|| {
        quote! {
            fn initializer(&mut self) -> ::core::option::Option<&mut dyn ::tagconf::InitWith> {
                ::core::option::Option::Some(self)
            }
        }
    });

    quote! {
        const _: () = {
            static #table: [::tagconf::FieldTags; #count] = [#(#tags),*];

            #[automatically_derived]
            impl #impl_generics ::tagconf::Configure for #struct_name #type_generics #where_clause {
                fn fields() -> &'static [::tagconf::FieldTags] {
                    &#table
                }

                #[allow(unused_variables)]
                fn visit_fields(
                    &mut self,
                    visitor: &mut dyn ::tagconf::FieldVisitor,
                ) -> ::core::result::Result<(), ::tagconf::Error> {
                    #(#visits)*
                    ::core::result::Result::Ok(())
                }

                #lifecycle

                #initializer
            }
        };
    }
}
