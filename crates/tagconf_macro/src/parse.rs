//! Attribute parsing for `#[config(...)]` and `#[configure(...)]`.
//!
//! Field options are accumulated one at a time by [`Parser::parse_meta`]
//! and validated together by [`Parser::build`], so option combinations are
//! checked in one place.
//!
//! # Supported Syntax
//!
//! ## Field-level attributes
//!
//! ```ignore
//! #[config(envconfig = "PORT", default = "8080")]        // Environment with fallback
//! #[config(env = "DATABASE_DRIVER", required)]           // Missing value is an error
//! #[config(envconfig = "DB_PASSWORD", secret)]           // Secret source only
//! #[config(secret_name = "prod/db/password", secret)]    // Different secret key
//! #[config(envconfig = "DEBUG", ignored = "true")]       // Never visited
//! #[config(nested)]                                      // Nested config struct
//! ```
//!
//! ## Struct-level attributes
//!
//! ```ignore
//! #[configure(prepare)]
//! #[configure(prepare_with, init_with)]
//! ```

use std::collections::HashSet;

use syn::meta::ParseNestedMeta;
use syn::{Attribute, DeriveInput, Error as SynError, Field, Lit, LitStr, Result as SynResult};

/// Parses a boolean in any of the forms accepted at runtime.
fn parse_bool_str(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Reads a boolean option: bare (`secret`), a bool literal (`secret = true`)
/// or a string literal (`secret = "true"`).
fn parse_flag(meta: &ParseNestedMeta) -> SynResult<bool> {
    if !meta.input.peek(syn::Token![=]) {
        return Ok(true);
    }

    let lit: Lit = meta.value()?.parse()?;
    match &lit {
        Lit::Bool(b) => Ok(b.value),
        Lit::Str(s) => parse_bool_str(&s.value()).ok_or_else(|| {
            SynError::new_spanned(
                &lit,
                format!("invalid boolean `{}`, expected one of 1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False", s.value()),
            )
        }),
        _ => Err(SynError::new_spanned(&lit, "expected a boolean or a string literal")),
    }
}

/// What a `#[config(...)]` attribute declares.
pub enum FieldConfig {
    /// A scalar field resolved from the environment or the secret source.
    Value(ConfigAttr),

    /// A nested configurable struct.
    Nested {
        /// Skipped entirely.
        ignored: bool,
    },
}

/// Options of a scalar field.
#[derive(Default)]
pub struct ConfigAttr {
    /// `envconfig = "KEY"`
    pub key: Option<String>,

    /// `secret_name = "KEY"`
    pub secret_name: Option<String>,

    /// `default = "literal"`
    pub default: Option<String>,

    pub secret: bool,
    pub required: bool,
    pub ignored: bool,
}

/// Accumulates the options of one `#[config(...)]` attribute.
#[derive(Default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "one flag per boolean attribute option"
)]
pub struct Parser {
    key: Option<String>,
    secret_name: Option<String>,
    default: Option<String>,
    secret: bool,
    required: bool,
    ignored: bool,
    nested: bool,

    /// Options seen so far, keyed by canonical name (`env` counts as
    /// `envconfig`).
    seen: HashSet<&'static str>,
}

impl Parser {
    #[expect(
        clippy::needless_pass_by_value,
        reason = "ParseNestedMeta is passed by value per syn's parse_nested_meta callback signature"
    )]
    fn parse_meta(&mut self, meta: ParseNestedMeta) -> SynResult<()> {
        let ident = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("Expected Identifier"))?;
        let name = ident.to_string();

        let key: &'static str = match name.as_str() {
            "envconfig" | "env" => "envconfig",
            "secret_name" => "secret_name",
            "default" => "default",
            "secret" => "secret",
            "required" => "required",
            "ignored" => "ignored",
            "nested" => "nested",
            _ => return Err(meta.error(format!("Unknown option `{name}`"))),
        };

        if !self.seen.insert(key) {
            return Err(meta.error(format!("Duplicate option: `{key}`")));
        }

        match key {
            "envconfig" => {
                let lit_str: LitStr = meta.value()?.parse()?;
                if lit_str.value().is_empty() {
                    return Err(SynError::new_spanned(lit_str, "lookup key cannot be empty"));
                }
                self.key = Some(lit_str.value());
            }

            "secret_name" => {
                let lit_str: LitStr = meta.value()?.parse()?;
                if lit_str.value().is_empty() {
                    return Err(SynError::new_spanned(lit_str, "secret name cannot be empty"));
                }
                self.secret_name = Some(lit_str.value());
            }

            "default" => {
                let lit_str: LitStr = meta.value()?.parse()?;
                self.default = Some(lit_str.value());
            }

            "secret" => self.secret = parse_flag(&meta)?,
            "required" => self.required = parse_flag(&meta)?,
            "ignored" => self.ignored = parse_flag(&meta)?,
            "nested" => self.nested = parse_flag(&meta)?,

            _ => unreachable!(),
        }

        Ok(())
    }

    /// Validates the accumulated options.
    fn build(self, attr: &Attribute) -> SynResult<FieldConfig> {
        if self.nested {
            let incompatible: Vec<&str> = [
                self.key.is_some().then_some("envconfig"),
                self.secret_name.is_some().then_some("secret_name"),
                self.default.is_some().then_some("default"),
                self.secret.then_some("secret"),
                self.required.then_some("required"),
            ]
            .into_iter()
            .flatten()
            .collect();

            if !incompatible.is_empty() {
                return Err(SynError::new_spanned(
                    attr,
                    format!("Cannot use `{}` with `nested`", incompatible.join("`, `")),
                ));
            }

            return Ok(FieldConfig::Nested {
                ignored: self.ignored,
            });
        }

        if self.secret && self.default.is_some() {
            return Err(SynError::new_spanned(
                attr,
                "Cannot use `default` with `secret`; secret fields are only read from the secret source",
            ));
        }

        Ok(FieldConfig::Value(ConfigAttr {
            key: self.key,
            secret_name: self.secret_name,
            default: self.default,
            secret: self.secret,
            required: self.required,
            ignored: self.ignored,
        }))
    }

    /// Parses the field's `#[config(...)]` attribute.
    ///
    /// Returns `None` when the field has none.
    pub fn parse_field_config(field: &Field) -> SynResult<Option<FieldConfig>> {
        let mut attrs = field.attrs.iter().filter(|a| a.path().is_ident("config"));

        let Some(attr) = attrs.next() else {
            return Ok(None);
        };

        if let Some(extra) = attrs.next() {
            return Err(SynError::new_spanned(
                extra,
                "Only one #[config(...)] attribute is allowed per field",
            ));
        }

        let mut builder = Self::default();
        attr.parse_nested_meta(|meta: ParseNestedMeta<'_>| builder.parse_meta(meta))?;

        builder.build(attr).map(Some)
    }
}

// ============================================================================
// Struct-level Attribute Parsing (#[configure(...)])
// ============================================================================

/// Lifecycle hooks the struct implements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Hooks {
    /// None.
    #[default]
    Plain,

    /// `Prepare`.
    Prepare,

    /// `PrepareWith` (and therefore `Prepare`).
    PrepareWith,
}

/// Parsed `#[configure(...)]` attribute.
#[derive(Clone, Debug, Default)]
pub struct ConfigureAttr {
    pub hooks: Hooks,
    pub init_with: bool,
}

impl ConfigureAttr {
    pub fn parse_from_struct(input: &DeriveInput) -> SynResult<Self> {
        let mut result = Self::default();
        let mut seen = HashSet::new();

        for attr in &input.attrs {
            if !attr.path().is_ident("configure") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                let name = meta
                    .path
                    .get_ident()
                    .map(ToString::to_string)
                    .unwrap_or_default();

                if !seen.insert(name.clone()) {
                    return Err(meta.error(format!("Duplicate option: `{name}`")));
                }

                match name.as_str() {
                    "prepare" | "prepare_with" if result.hooks != Hooks::Plain => {
                        Err(meta.error("`prepare_with` already implies `prepare`"))
                    }
                    "prepare" => {
                        result.hooks = Hooks::Prepare;
                        Ok(())
                    }
                    "prepare_with" => {
                        result.hooks = Hooks::PrepareWith;
                        Ok(())
                    }
                    "init_with" => {
                        result.init_with = true;
                        Ok(())
                    }
                    _ => Err(meta.error("unknown configure option, expected `prepare`, `prepare_with` or `init_with`")),
                }
            })?;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn field_config(field: Field) -> SynResult<Option<FieldConfig>> {
        Parser::parse_field_config(&field)
    }

    #[test]
    fn test_value_options() {
        let field: Field = parse_quote! {
            #[config(env = "DB_PASSWORD", secret_name = "db/password", secret, required = "t")]
            password: String
        };

        let Some(FieldConfig::Value(attr)) = field_config(field).unwrap() else {
            panic!("expected a value field");
        };
        assert_eq!(attr.key.as_deref(), Some("DB_PASSWORD"));
        assert_eq!(attr.secret_name.as_deref(), Some("db/password"));
        assert!(attr.secret);
        assert!(attr.required);
        assert!(!attr.ignored);
    }

    #[test]
    fn test_flag_values() {
        let field: Field = parse_quote! {
            #[config(envconfig = "X", secret = false, ignored = "True")]
            x: u8
        };

        let Some(FieldConfig::Value(attr)) = field_config(field).unwrap() else {
            panic!("expected a value field");
        };
        assert!(!attr.secret);
        assert!(attr.ignored);
    }

    #[test]
    fn test_invalid_flag_value() {
        let field: Field = parse_quote! {
            #[config(envconfig = "X", required = "yes")]
            x: u8
        };

        let err = field_config(field).err().unwrap();
        assert!(err.to_string().contains("invalid boolean `yes`"));
    }

    #[test]
    fn test_untagged_field() {
        let field: Field = parse_quote! { dsn: String };
        assert!(field_config(field).unwrap().is_none());
    }

    #[test]
    fn test_unknown_and_duplicate_options() {
        let unknown: Field = parse_quote! { #[config(var = "X")] x: u8 };
        assert!(field_config(unknown).err().unwrap().to_string().contains("Unknown option `var`"));

        let duplicate: Field = parse_quote! { #[config(env = "X", envconfig = "Y")] x: u8 };
        assert!(field_config(duplicate).err().unwrap().to_string().contains("Duplicate option"));
    }

    #[test]
    fn test_nested_incompatible() {
        let field: Field = parse_quote! { #[config(nested, envconfig = "X", secret)] db: Db };
        let message = field_config(field).err().unwrap().to_string();
        assert!(message.contains("`envconfig`, `secret`"));

        let ignored: Field = parse_quote! { #[config(nested, ignored)] db: Db };
        assert!(matches!(
            field_config(ignored).unwrap(),
            Some(FieldConfig::Nested { ignored: true })
        ));
    }

    #[test]
    fn test_secret_with_default_rejected() {
        let field: Field = parse_quote! {
            #[config(envconfig = "DB_PASSWORD", secret, default = "hunter2")]
            password: String
        };
        let message = field_config(field).err().unwrap().to_string();
        assert!(message.contains("Cannot use `default` with `secret`"));

        let unset: Field = parse_quote! {
            #[config(envconfig = "DB_PASSWORD", secret = false, default = "local")]
            password: String
        };
        assert!(field_config(unset).is_ok());
    }

    #[test]
    fn test_struct_hooks() {
        let input: DeriveInput = parse_quote! {
            #[configure(prepare_with, init_with)]
            struct App {}
        };
        let attr = ConfigureAttr::parse_from_struct(&input).unwrap();
        assert_eq!(attr.hooks, Hooks::PrepareWith);
        assert!(attr.init_with);

        let both: DeriveInput = parse_quote! {
            #[configure(prepare, prepare_with)]
            struct App {}
        };
        assert!(ConfigureAttr::parse_from_struct(&both).is_err());
    }
}
