//! Debug implementation code generation.
//!
//! Fields tagged `secret` print as `[REDACTED]`:
//!
//! ```rust,ignore
//! #[derive(Configure)]
//! struct Config {
//!     #[config(envconfig = "PORT")]
//!     port: u16,
//!
//!     #[config(envconfig = "API_KEY", secret)]
//!     api_key: String,
//! }
//!
//! // Config { port: 8080, api_key: "[REDACTED]" }
//! ```
//!
//! `SecretString` and `SecretBox<T>` fields use their own `Debug`, which
//! already redacts.

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Generics, Ident};

use crate::field::FieldGenerator;

/// Generate a custom `Debug` implementation with secret masking.
pub fn generate_debug_impl(
    struct_name: &Ident,
    generics: &Generics,
    fields: &[Box<dyn FieldGenerator>],
) -> QuoteStream {
    let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

    let struct_name_str = struct_name.to_string();

    let field_entries: Vec<QuoteStream> = fields
        .iter()
        .map(|f| {
            let name = f.name();
            let name_str = name.unraw().to_string();

            if f.is_secret() && !f.is_secrecy_type() {
                quote! { .field(#name_str, &"[REDACTED]") }
            } else {
                quote! { .field(#name_str, &self.#name) }
            }
        })
        .collect();

    quote! {
        #[automatically_derived]
        impl #impl_generics ::core::fmt::Debug for #struct_name #type_generics #where_clause {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(#struct_name_str)
                    #(#field_entries)*
                    .finish()
            }
        }
    }
}
