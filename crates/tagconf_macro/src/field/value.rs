//! Scalar fields.
//!
//! The field is handed to the visitor as `&mut dyn FieldSlot`, which every
//! `Coerce` type implements:
//!
//! ```rust,ignore
//! // #[config(envconfig = "PORT", default = "8080")]
//! // port: u16,
//! visitor.visit_value(&FIELDS[0], &mut self.port)?;
//! ```

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::{Ident, Type};

use super::{FieldFactory, FieldGenerator, field_name};
use crate::parse::ConfigAttr;

/// A field resolved from the environment or the secret source.
pub struct ValueField {
    pub name: Ident,
    pub ty: Type,
    pub attr: ConfigAttr,
}

impl FieldGenerator for ValueField {
    fn name(&self) -> &Ident {
        &self.name
    }

    fn tags(&self) -> Option<QuoteStream> {
        let name = field_name(&self.name);
        let attr = &self.attr;

        let key = attr.key.as_ref().map(|key| quote! { .envconfig(#key) });
        let secret_name = attr
            .secret_name
            .as_ref()
            .map(|key| quote! { .secret_name(#key) });
        let default = attr
            .default
            .as_ref()
            .map(|value| quote! { .with_default(#value) });
        let secret = attr.secret.then(|| quote! { .secret() });
        let required = attr.required.then(|| quote! { .required() });
        let ignored = attr.ignored.then(|| quote! { .ignored() });

        Some(quote! {
            ::tagconf::FieldTags::new(#name)
                #key
                #secret_name
                #default
                #secret
                #required
                #ignored
        })
    }

    fn generate_visit(&self, table: &Ident, index: usize) -> QuoteStream {
        if self.attr.ignored {
            return quote! {};
        }

        let name = &self.name;
        quote! {
            visitor.visit_value(&#table[#index], &mut self.#name)?;
        }
    }

    fn is_secret(&self) -> bool {
        self.attr.secret
    }

    fn is_secrecy_type(&self) -> bool {
        FieldFactory::is_secrecy_type(&self.ty)
    }
}
