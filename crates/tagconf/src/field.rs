//! Field descriptor tables and the visitor protocol.
//!
//! `#[derive(Configure)]` generates, per struct, a static table of
//! [`FieldTags`] and a [`Configure::visit_fields`] body that hands every
//! tagged field to a [`FieldVisitor`]: scalar fields as a [`FieldSlot`],
//! nested structs as `&mut dyn Configure`, optional nested structs as a
//! [`NestedSlot`]. The walkers in [`crate::pool`] and [`crate::json`] are
//! visitors.
//!
//! The table may also be written by hand:
//!
//! ```rust
//! use tagconf::{Configure, Error, FieldTags, FieldVisitor};
//!
//! #[derive(Default)]
//! struct Server {
//!     port: u16,
//! }
//!
//! static SERVER_FIELDS: [FieldTags; 1] =
//!     [FieldTags::new("port").envconfig("PORT").with_default("8080")];
//!
//! impl Configure for Server {
//!     fn fields() -> &'static [FieldTags] {
//!         &SERVER_FIELDS
//!     }
//!
//!     fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) -> Result<(), Error> {
//!         visitor.visit_value(&SERVER_FIELDS[0], &mut self.port)
//!     }
//! }
//! ```

use std::any::type_name;

use crate::coerce::{Coerce, CoerceError, set_field};
use crate::error::Error;
use crate::lifecycle::{InitWith, Lifecycle};
use crate::report::{Origin, ResolvedField};

/// Declarative metadata of one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldTags {
    /// The declared field name.
    pub name: &'static str,

    /// Lookup key in the environment (and the secret source, unless
    /// `secret_name` is set).
    pub key: Option<&'static str>,

    /// Lookup key in the secret source.
    pub secret_name: Option<&'static str>,

    /// Literal used when the environment lookup misses.
    pub default: Option<&'static str>,

    /// Read only from the secret source.
    pub secret: bool,

    /// A missing value is an error.
    pub required: bool,

    /// Never visited.
    pub ignored: bool,

    /// A nested configurable struct rather than a scalar.
    pub nested: bool,
}

impl FieldTags {
    /// Tags for a field with no options set.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            key: None,
            secret_name: None,
            default: None,
            secret: false,
            required: false,
            ignored: false,
            nested: false,
        }
    }

    /// Sets the lookup key.
    #[must_use]
    pub const fn envconfig(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets the secret lookup key.
    #[must_use]
    pub const fn secret_name(mut self, key: &'static str) -> Self {
        self.secret_name = Some(key);
        self
    }

    /// Sets the default literal.
    #[must_use]
    pub const fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Marks the field secret.
    #[must_use]
    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Marks the field required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field ignored.
    #[must_use]
    pub const fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Marks the field as a nested struct.
    #[must_use]
    pub const fn nested(mut self) -> Self {
        self.nested = true;
        self
    }

    /// Key used against the environment.
    #[must_use]
    pub const fn env_key(&self) -> Option<&'static str> {
        self.key
    }

    /// Key used against the secret source: `secret_name`, else `envconfig`.
    #[must_use]
    pub const fn secret_key(&self) -> Option<&'static str> {
        match self.secret_name {
            Some(key) => Some(key),
            None => self.key,
        }
    }

    /// Key used for the field's configured source.
    #[must_use]
    pub const fn lookup_key(&self) -> Option<&'static str> {
        if self.secret {
            self.secret_key()
        } else {
            self.env_key()
        }
    }
}

/// A settable scalar field.
pub trait FieldSlot {
    /// Coerces `raw` into the slot.
    fn set_from_str(&mut self, raw: &str) -> Result<(), CoerceError>;

    /// The current value when it is string-like.
    fn as_str(&self) -> Option<&str>;

    /// Name of the slot's type, without module paths.
    fn type_name(&self) -> String;
}

impl<T: Coerce> FieldSlot for T {
    fn set_from_str(&mut self, raw: &str) -> Result<(), CoerceError> {
        set_field(raw, self)
    }

    fn as_str(&self) -> Option<&str> {
        self.as_raw_str()
    }

    fn type_name(&self) -> String {
        short_type_name(type_name::<T>())
    }
}

/// Strips module paths: `core::option::Option<alloc::string::String>`
/// becomes `Option<String>`.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();

    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or_default());
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or_default());

    out
}

/// An optional nested struct.
pub trait NestedSlot {
    /// The nested struct, when present.
    fn get(&mut self) -> Option<&mut dyn Configure>;

    /// The nested struct, allocating a default instance when absent.
    fn get_or_default(&mut self) -> &mut dyn Configure;
}

impl<T: Configure + Default> NestedSlot for Option<T> {
    fn get(&mut self) -> Option<&mut dyn Configure> {
        self.as_mut().map(|node| node as &mut dyn Configure)
    }

    fn get_or_default(&mut self) -> &mut dyn Configure {
        self.get_or_insert_with(T::default)
    }
}

/// Receives the fields of a [`Configure`] type in declaration order.
pub trait FieldVisitor {
    /// A scalar field.
    fn visit_value(&mut self, tags: &'static FieldTags, slot: &mut dyn FieldSlot)
    -> Result<(), Error>;

    /// A nested struct that is always present.
    fn visit_nested(&mut self, tags: &'static FieldTags, node: &mut dyn Configure)
    -> Result<(), Error>;

    /// An optional nested struct.
    ///
    /// The default allocates the struct when absent and then visits it.
    fn visit_optional(
        &mut self,
        tags: &'static FieldTags,
        slot: &mut dyn NestedSlot,
    ) -> Result<(), Error> {
        self.visit_nested(tags, slot.get_or_default())
    }

    /// One element of a nested sequence (`Vec<T>`).
    ///
    /// The default treats the element like a nested struct.
    fn visit_element(
        &mut self,
        tags: &'static FieldTags,
        index: usize,
        node: &mut dyn Configure,
    ) -> Result<(), Error> {
        let _ = index;
        self.visit_nested(tags, node)
    }
}

/// A struct whose fields can be populated from configuration sources.
///
/// Usually derived; see the crate root for the attribute syntax.
pub trait Configure {
    /// The descriptor table, in declaration order.
    fn fields() -> &'static [FieldTags]
    where
        Self: Sized;

    /// Hands every tagged, non-ignored field to `visitor`.
    fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) -> Result<(), Error>;

    /// The lifecycle hooks run after the fields are populated.
    fn lifecycle(&mut self) -> Lifecycle<'_> {
        Lifecycle::Plain
    }

    /// The hook run before the fields are visited.
    fn initializer(&mut self) -> Option<&mut dyn InitWith> {
        None
    }

    /// Name used in logs and lifecycle errors.
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

impl<T: Configure> Configure for Box<T> {
    fn fields() -> &'static [FieldTags] {
        T::fields()
    }

    fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) -> Result<(), Error> {
        (**self).visit_fields(visitor)
    }

    fn lifecycle(&mut self) -> Lifecycle<'_> {
        (**self).lifecycle()
    }

    fn initializer(&mut self) -> Option<&mut dyn InitWith> {
        (**self).initializer()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

/// One field during a walk: its tags, its slot and the raw value resolved
/// for it.
pub struct FieldDescriptor<'s> {
    tags: &'static FieldTags,
    slot: &'s mut dyn FieldSlot,
    value: Option<String>,
    origin: Origin,
}

impl<'s> FieldDescriptor<'s> {
    /// A descriptor with no resolved value.
    pub fn new(tags: &'static FieldTags, slot: &'s mut dyn FieldSlot) -> Self {
        Self {
            tags,
            slot,
            value: None,
            origin: Origin::Unset,
        }
    }

    /// Records the raw value and where it came from.
    #[must_use]
    pub fn resolved(mut self, value: String, origin: Origin) -> Self {
        self.value = Some(value);
        self.origin = origin;
        self
    }

    /// The field's tags.
    #[must_use]
    pub const fn tags(&self) -> &'static FieldTags {
        self.tags
    }

    /// The resolved raw value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Where the value came from.
    #[must_use]
    pub const fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Coerces the resolved value into the slot.
    ///
    /// Without a resolved value the slot is left untouched and the record's
    /// origin is [`Origin::Unset`]. `path` is the dotted field path used in
    /// the returned record.
    pub fn apply(self, path: String) -> Result<ResolvedField, Error> {
        let tags = self.tags;
        let key = match &self.origin {
            Origin::SecretRef(_) | Origin::Secret => tags.secret_key(),
            _ => tags.env_key(),
        };

        let Some(raw) = self.value else {
            return Ok(ResolvedField::new(path, key, Origin::Unset, None, tags.secret));
        };

        if let Err(source) = self.slot.set_from_str(&raw) {
            return Err(Error::coerce(
                path,
                key.unwrap_or(tags.name),
                &raw,
                tags.secret,
                self.slot.type_name(),
                source,
            ));
        }

        Ok(ResolvedField::new(path, key, self.origin, Some(&raw), tags.secret))
    }
}
